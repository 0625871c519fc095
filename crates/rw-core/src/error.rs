//! Error types for the rw-core crate.
//!
//! [`ConfigError`] covers loading and validating `redwork.json`;
//! [`ManifestError`] covers reading the bundler's output manifest.

use camino::Utf8PathBuf;

/// Errors that can occur during configuration loading and validation.
///
/// # Examples
///
/// ```
/// use rw_core::ConfigError;
/// use camino::Utf8PathBuf;
///
/// let error = ConfigError::MissingDirectory(Utf8PathBuf::from("./routes"));
/// assert!(error.to_string().contains("./routes"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required directory does not exist.
    #[error("missing required directory: {0}")]
    MissingDirectory(Utf8PathBuf),

    /// A configuration option has an invalid value.
    #[error("invalid configuration option '{option}': {reason}")]
    InvalidOption {
        /// The name of the invalid option.
        option: String,
        /// Explanation of why the option is invalid.
        reason: String,
    },

    /// An I/O error occurred while reading configuration.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    /// Creates a new [`ConfigError::InvalidOption`] error.
    #[inline]
    pub fn invalid_option(option: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            option: option.into(),
            reason: reason.into(),
        }
    }
}

/// Errors raised while loading a [`BuildOutputManifest`](crate::BuildOutputManifest).
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// The manifest file could not be read.
    #[error("failed to read build manifest {path}: {source}")]
    Io {
        /// Manifest location.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The manifest is not a `string -> string[]` JSON object.
    #[error("failed to parse build manifest: {0}")]
    Parse(#[from] serde_json::Error),

    /// A manifest key maps to an empty output list.
    #[error("build manifest entry '{0}' has no output files")]
    EmptyOutputs(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_option_display() {
        let error = ConfigError::invalid_option("watch.debounce_ms", "must be positive");
        let msg = error.to_string();
        assert!(msg.contains("watch.debounce_ms"));
        assert!(msg.contains("must be positive"));
    }

    #[test]
    fn test_missing_directory_display() {
        let error = ConfigError::MissingDirectory(Utf8PathBuf::from("/missing/routes"));
        assert!(error.to_string().contains("/missing/routes"));
    }

    #[test]
    fn test_empty_outputs_display() {
        let error = ManifestError::EmptyOutputs("routes/index.svelte".to_owned());
        assert_eq!(
            error.to_string(),
            "build manifest entry 'routes/index.svelte' has no output files"
        );
    }
}
