//! Error types for the rw-ssg crate.

use std::time::Duration;

use camino::Utf8PathBuf;

/// Errors that abort static generation.
///
/// Every variant is fatal to the run: no partial output is kept.
#[derive(Debug, thiserror::Error)]
pub enum SsgError {
    /// A route chosen for generation rendered as not found.
    #[error("route not found during generation: {path} ({file})")]
    NotFound {
        /// URL path that was rendered.
        path: String,
        /// Module backing the route.
        file: Utf8PathBuf,
    },

    /// A render call did not finish in time.
    #[error("rendering {path} timed out after {}ms", timeout.as_millis())]
    RenderTimeout {
        /// URL path being rendered.
        path: String,
        /// The configured limit.
        timeout: Duration,
    },

    /// The renderer failed.
    #[error("failed to render {path}: {message}")]
    Render {
        /// URL path being rendered.
        path: String,
        /// Renderer diagnostics.
        message: String,
    },

    /// A route module could not be loaded.
    #[error("failed to load route module {file}: {message}")]
    Module {
        /// The compiled module.
        file: Utf8PathBuf,
        /// Loader diagnostics.
        message: String,
    },

    /// A route module exports `ssg` with a non-boolean value.
    #[error("route module {file} exports a non-boolean ssg flag: {found}")]
    InvalidSsgExport {
        /// The compiled module.
        file: Utf8PathBuf,
        /// The exported value, as JSON.
        found: String,
    },

    /// The JS runtime exited unsuccessfully.
    #[error("{program} exited with code {code}: {stderr}")]
    ProcessFailed {
        /// Program that was run.
        program: String,
        /// Exit code, `-1` when killed by a signal.
        code: i32,
        /// Captured standard error.
        stderr: String,
    },

    /// Reading or writing a file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// The file or directory involved.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl SsgError {
    /// Creates a new [`SsgError::Io`] error.
    #[inline]
    pub fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`SsgError::Render`] error.
    #[inline]
    pub fn render(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Render {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new [`SsgError::Module`] error.
    #[inline]
    pub fn module(file: impl Into<Utf8PathBuf>, message: impl Into<String>) -> Self {
        Self::Module {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Returns the file path associated with this error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8PathBuf> {
        match self {
            Self::NotFound { file, .. }
            | Self::Module { file, .. }
            | Self::InvalidSsgExport { file, .. } => Some(file),
            Self::Io { path, .. } => Some(path),
            Self::RenderTimeout { .. } | Self::Render { .. } | Self::ProcessFailed { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_path_and_file() {
        let err = SsgError::NotFound {
            path: "/about".to_owned(),
            file: "assets/about-1a2b.js".into(),
        };
        assert_eq!(
            err.to_string(),
            "route not found during generation: /about (assets/about-1a2b.js)"
        );
        assert_eq!(err.path().map(|p| p.as_str()), Some("assets/about-1a2b.js"));
    }

    #[test]
    fn test_timeout_message() {
        let err = SsgError::RenderTimeout {
            path: "/".to_owned(),
            timeout: Duration::from_millis(1500),
        };
        assert_eq!(err.to_string(), "rendering / timed out after 1500ms");
        assert!(err.path().is_none());
    }
}
