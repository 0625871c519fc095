//! Error types for the rw-watcher crate.

use camino::Utf8PathBuf;
use rw_scanner::ScanError;

/// Errors that can occur while watching the route directory.
///
/// # Error Recovery Strategy
///
/// - **Notify errors** ([`WatchError::Notify`]): Fatal
/// - **Path not found** ([`WatchError::PathNotFound`]): Fatal
/// - **Channel closed** ([`WatchError::ChannelClosed`]): Fatal
/// - **Task failures** ([`WatchError::TaskFailed`]): Fatal, carries the panic or cancellation
/// - **Non-UTF-8 path** ([`WatchError::NonUtf8Path`]): Recoverable, the event is skipped
/// - **Scan errors** ([`WatchError::Scan`]): Recoverable, the previous route set is kept
/// - **I/O errors** ([`WatchError::Io`]): Fatal
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    /// Failed to initialize or operate the notify watcher.
    #[error("notify watcher error: {0}")]
    Notify(#[from] notify::Error),

    /// The route directory does not exist.
    #[error("path does not exist: {0}")]
    PathNotFound(Utf8PathBuf),

    /// The event channel went away.
    #[error("event channel closed unexpectedly")]
    ChannelClosed,

    /// A watcher or rescan task panicked or was cancelled.
    #[error("watch task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),

    /// A path is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", _0.display())]
    NonUtf8Path(std::path::PathBuf),

    /// Rescanning the route directory failed.
    #[error("route scan failed: {0}")]
    Scan(#[from] ScanError),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WatchError {
    /// Creates a new [`WatchError::PathNotFound`] error.
    #[inline]
    pub fn path_not_found(path: impl Into<Utf8PathBuf>) -> Self {
        Self::PathNotFound(path.into())
    }

    /// Returns `true` if watching can continue after this error.
    #[inline]
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::NonUtf8Path(_) | Self::Scan(_))
    }

    /// Returns `true` if watching must stop.
    #[inline]
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !self.is_recoverable()
    }

    /// Returns the file path associated with this error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8PathBuf> {
        match self {
            Self::PathNotFound(path) => Some(path),
            Self::Scan(err) => err.path(),
            Self::Notify(_)
            | Self::ChannelClosed
            | Self::TaskFailed(_)
            | Self::NonUtf8Path(_)
            | Self::Io(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rw_core::RoutePathError;

    #[test]
    fn test_path_not_found_is_fatal() {
        let err = WatchError::path_not_found("routes");
        assert!(err.is_fatal());
        assert_eq!(err.path().map(|p| p.as_str()), Some("routes"));
        assert_eq!(err.to_string(), "path does not exist: routes");
    }

    #[test]
    fn test_scan_error_is_recoverable() {
        let err = WatchError::from(ScanError::validation(
            camino::Utf8Path::new("bad.svelte"),
            RoutePathError::Empty,
        ));
        assert!(err.is_recoverable());
        assert_eq!(err.path().map(|p| p.as_str()), Some("bad.svelte"));
    }

    #[test]
    fn test_channel_closed() {
        let err = WatchError::ChannelClosed;
        assert!(err.is_fatal());
        assert!(err.path().is_none());
    }

    #[tokio::test]
    async fn test_panicked_task_is_fatal() {
        let join_error = tokio::spawn(async { panic!("scan blew up") })
            .await
            .unwrap_err();
        let err = WatchError::from(join_error);
        assert!(matches!(err, WatchError::TaskFailed(ref inner) if inner.is_panic()));
        assert!(err.is_fatal());
        assert!(err.to_string().starts_with("watch task failed"));
    }
}
