//! Error types for the rw-scanner crate.
//!
//! This module provides the [`ScanError`] type for errors that can occur
//! while discovering route files and deriving their URL paths.

use camino::Utf8PathBuf;
use rw_core::RoutePathError;

/// Errors that can occur during scanning operations.
///
/// Every variant is fatal to the scan call: a scan either yields the full
/// route list or nothing.
///
/// # Examples
///
/// ```
/// use rw_scanner::ScanError;
/// use rw_core::RoutePathError;
///
/// let err = ScanError::validation("about.svelte", RoutePathError::Empty);
/// assert!(err.to_string().contains("about.svelte"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// Failed to walk the route directory.
    #[error("failed to walk directory: {0}")]
    Walk(#[from] ignore::Error),

    /// The route pattern is not a valid glob.
    #[error("invalid route pattern '{pattern}': {source}")]
    Pattern {
        /// The rejected pattern.
        pattern: String,
        /// The underlying glob error.
        #[source]
        source: globset::Error,
    },

    /// A path rule produced a route that fails the descriptor shape.
    #[error("invalid route for {file}: {reason}")]
    Validation {
        /// The route file the rule was applied to.
        file: Utf8PathBuf,
        /// What was wrong with the produced path.
        #[source]
        reason: RoutePathError,
    },

    /// Invalid scanner configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A path is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", _0.display())]
    NonUtf8Path(std::path::PathBuf),
}

impl ScanError {
    /// Creates a new [`ScanError::Validation`] error.
    #[inline]
    pub fn validation(file: impl Into<Utf8PathBuf>, reason: RoutePathError) -> Self {
        Self::Validation {
            file: file.into(),
            reason,
        }
    }

    /// Creates a new [`ScanError::Config`] error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Returns the file path associated with this error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8PathBuf> {
        match self {
            Self::Validation { file, .. } => Some(file),
            Self::Walk(_) | Self::Pattern { .. } | Self::Config(_) | Self::NonUtf8Path(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_error_validation() {
        let err = ScanError::validation(
            "users/$id.svelte",
            RoutePathError::MissingLeadingSlash("users/:id".to_owned()),
        );
        assert_eq!(err.path().map(|p| p.as_str()), Some("users/$id.svelte"));
        assert_eq!(
            err.to_string(),
            "invalid route for users/$id.svelte: route path 'users/:id' does not start with '/'"
        );
    }

    #[test]
    fn test_scan_error_config() {
        let err = ScanError::config("root path does not exist: ./routes");
        assert!(err.path().is_none());
        assert_eq!(
            err.to_string(),
            "invalid configuration: root path does not exist: ./routes"
        );
    }

    #[test]
    fn test_scan_error_non_utf8() {
        use std::path::PathBuf;
        let err = ScanError::NonUtf8Path(PathBuf::from("test"));
        assert!(err.path().is_none());
        assert!(err.to_string().contains("not valid UTF-8"));
    }
}
