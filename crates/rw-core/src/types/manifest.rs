//! The bundler's build output manifest.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::ManifestError;
use crate::hash::FxHashMap;

type RawManifest = FxHashMap<String, Vec<Utf8PathBuf>>;

/// Mapping from build input key to the files the bundler emitted for it.
///
/// Produced externally (for example `ssr-manifest.json`). Every key maps to
/// a non-empty list; only the first output is consulted when reconciling
/// routes.
///
/// # Examples
///
/// ```
/// use rw_core::BuildOutputManifest;
///
/// let manifest = BuildOutputManifest::from_json_str(
///     r#"{"routes/index.svelte": ["assets/index-4f2a.js", "assets/index.css"]}"#,
/// ).unwrap();
/// assert_eq!(manifest.first_output("routes/index.svelte").unwrap(), "assets/index-4f2a.js");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawManifest", into = "RawManifest")]
pub struct BuildOutputManifest {
    entries: RawManifest,
}

impl BuildOutputManifest {
    /// Creates an empty manifest.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a manifest from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a manifest file.
    pub fn load(path: &Utf8Path) -> Result<Self, ManifestError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Adds or replaces an entry.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        outputs: Vec<Utf8PathBuf>,
    ) -> Result<(), ManifestError> {
        let key = key.into();
        if outputs.is_empty() {
            return Err(ManifestError::EmptyOutputs(key));
        }
        self.entries.insert(key, outputs);
        Ok(())
    }

    /// The first output file emitted for `key`.
    #[must_use]
    pub fn first_output(&self, key: &str) -> Option<&Utf8Path> {
        self.entries
            .get(key)
            .and_then(|outputs| outputs.first())
            .map(Utf8PathBuf::as_path)
    }

    /// Iterates over `(key, first output)` pairs in unspecified order.
    pub fn first_outputs(&self) -> impl Iterator<Item = (&str, &Utf8Path)> {
        self.entries.iter().filter_map(|(key, outputs)| {
            outputs
                .first()
                .map(|output| (key.as_str(), output.as_path()))
        })
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the manifest has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TryFrom<RawManifest> for BuildOutputManifest {
    type Error = ManifestError;

    fn try_from(entries: RawManifest) -> Result<Self, Self::Error> {
        if let Some((key, _)) = entries.iter().find(|(_, outputs)| outputs.is_empty()) {
            return Err(ManifestError::EmptyOutputs(key.clone()));
        }
        Ok(Self { entries })
    }
}

impl From<BuildOutputManifest> for RawManifest {
    fn from(manifest: BuildOutputManifest) -> Self {
        manifest.entries
    }
}
