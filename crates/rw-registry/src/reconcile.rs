//! Mapping source route files to their bundled output files.
//!
//! The bundler's manifest is keyed by source paths relative to its own
//! root, e.g. `routes/blog/index.svelte`. Routes hold paths relative to the
//! route directory, e.g. `blog/index.svelte`. Reconciliation strips the
//! route directory prefix from manifest keys and swaps each matching
//! route's `file` for the first output the bundler emitted.

use camino::{Utf8Path, Utf8PathBuf};
use rw_core::{BuildOutputManifest, FxHashMap, RouteDescriptor};
use tracing::{debug, warn};

use crate::error::RegistryError;
use crate::fs::absolutize;

/// Remaps route files through a [`BuildOutputManifest`].
#[derive(Debug, Clone)]
pub struct ManifestReconciler<'a> {
    outputs: FxHashMap<&'a str, &'a Utf8Path>,
}

impl<'a> ManifestReconciler<'a> {
    /// Indexes the manifest keys under `route_dir_name`.
    ///
    /// An empty `route_dir_name` keeps every key unchanged.
    #[must_use]
    pub fn new(manifest: &'a BuildOutputManifest, route_dir_name: &str) -> Self {
        let name = route_dir_name
            .trim_start_matches("./")
            .trim_end_matches('/');

        let outputs = manifest
            .first_outputs()
            .filter_map(|(key, output)| {
                if name.is_empty() {
                    return Some((key, output));
                }
                key.strip_prefix(name)
                    .and_then(|rest| rest.strip_prefix('/'))
                    .map(|relative| (relative, output))
            })
            .collect();

        Self { outputs }
    }

    /// The output file for a route-relative source file, if any.
    #[must_use]
    pub fn output_for(&self, file: &Utf8Path) -> Option<&'a Utf8Path> {
        self.outputs.get(file.as_str()).copied()
    }

    /// Returns a new list with every matched route pointing at its output.
    ///
    /// Unmatched routes are copied unchanged.
    #[must_use]
    pub fn reconcile(&self, routes: &[RouteDescriptor]) -> Vec<RouteDescriptor> {
        routes
            .iter()
            .map(|route| match self.output_for(&route.file) {
                Some(output) => {
                    debug!(
                        route = %route.path,
                        file = %route.file,
                        output = %output,
                        "Reconciled route"
                    );
                    route.with_file(output)
                }
                None => {
                    warn!(
                        route = %route.path,
                        file = %route.file,
                        "Route missing from build manifest"
                    );
                    route.clone()
                }
            })
            .collect()
    }

    /// Like [`reconcile`](Self::reconcile), but fails if any route is
    /// unmatched.
    pub fn reconcile_strict(
        &self,
        routes: &[RouteDescriptor],
    ) -> Result<Vec<RouteDescriptor>, RegistryError> {
        let missing: Vec<Utf8PathBuf> = routes
            .iter()
            .filter(|route| self.output_for(&route.file).is_none())
            .map(|route| route.file.clone())
            .collect();

        if !missing.is_empty() {
            return Err(RegistryError::Unreconciled { files: missing });
        }
        Ok(self.reconcile(routes))
    }
}

/// Reconciles `routes` against `manifest`, leaving unmatched routes as is.
#[must_use]
pub fn reconcile(
    routes: &[RouteDescriptor],
    manifest: &BuildOutputManifest,
    route_dir_name: &str,
) -> Vec<RouteDescriptor> {
    ManifestReconciler::new(manifest, route_dir_name).reconcile(routes)
}

/// Reconciles `routes` against `manifest`, failing on any unmatched route.
pub fn reconcile_strict(
    routes: &[RouteDescriptor],
    manifest: &BuildOutputManifest,
    route_dir_name: &str,
) -> Result<Vec<RouteDescriptor>, RegistryError> {
    ManifestReconciler::new(manifest, route_dir_name).reconcile_strict(routes)
}

/// The manifest key prefix for `route_dir`, as seen from the bundler root.
///
/// Bundlers key their manifest relative to the project root they were run
/// from, so `./routes` seen from `./` becomes `routes`.
pub fn manifest_key_prefix(
    bundle_root: &Utf8Path,
    route_dir: &Utf8Path,
) -> Result<String, RegistryError> {
    let root = absolutize(bundle_root)?;
    let dir = absolutize(route_dir)?;
    let relative = pathdiff::diff_utf8_paths(&dir, &root).ok_or_else(|| {
        RegistryError::UnresolvableImport {
            from: root.clone(),
            to: dir.clone(),
        }
    })?;
    Ok(relative
        .components()
        .map(|component| component.as_str())
        .collect::<Vec<_>>()
        .join("/"))
}
