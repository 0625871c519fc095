//! Error types for the rw-registry crate.

use camino::Utf8PathBuf;

/// Errors raised while generating, reading, or reconciling registries.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Reading or writing a file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// The file being read or written.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A path is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", _0.display())]
    NonUtf8Path(std::path::PathBuf),

    /// No relative import path exists between two locations.
    #[error("cannot compute import path from {from} to {to}")]
    UnresolvableImport {
        /// Directory the import is written in.
        from: Utf8PathBuf,
        /// Target module.
        to: Utf8PathBuf,
    },

    /// A generated registry could not be parsed back.
    #[error("malformed registry at line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What was expected.
        message: String,
    },

    /// Routes with no entry in the build output manifest.
    #[error("{} route file(s) missing from build manifest: {}", .files.len(), join_paths(.files))]
    Unreconciled {
        /// Source files that were not mapped.
        files: Vec<Utf8PathBuf>,
    },
}

fn join_paths(files: &[Utf8PathBuf]) -> String {
    files
        .iter()
        .map(|file| file.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl RegistryError {
    /// Creates a new [`RegistryError::Io`] error.
    #[inline]
    pub fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`RegistryError::Parse`] error.
    #[inline]
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}
