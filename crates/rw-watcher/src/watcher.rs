//! File watcher bridged into tokio.
//!
//! ```text
//! ┌──────────────────────── spawn_blocking ────────────────────────┐
//! │  RecommendedWatcher -> Debouncer (debounce_ms) -> filter       │
//! └──────────────────────────────────┬─────────────────────────────┘
//!                                    │ blocking_send(FileEventBatch)
//!                                    ▼
//! ┌──────────────────────── tokio runtime ─────────────────────────┐
//! │  FileWatcher::recv() -> RouteWatcher                           │
//! └────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use notify::{RecursiveMode, Watcher};
use notify_debouncer_mini::{DebounceEventResult, Debouncer, new_debouncer};
use rw_core::WatchConfig;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use crate::error::WatchError;
use crate::events::{FileEvent, FileEventBatch};
use crate::filter::FileFilter;

/// Default channel capacity, in batches.
const DEFAULT_CHANNEL_CAPACITY: usize = 100;

/// Streams debounced, filtered change batches to async code.
///
/// The notify watcher lives on tokio's blocking pool until
/// [`shutdown`](Self::shutdown) is called or the `FileWatcher` is dropped.
pub struct FileWatcher {
    shutdown_tx: Option<oneshot::Sender<()>>,
    task_handle: Option<JoinHandle<Result<(), WatchError>>>,
    event_rx: mpsc::Receiver<FileEventBatch>,
    watch_path: Utf8PathBuf,
}

impl std::fmt::Debug for FileWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWatcher")
            .field("watch_path", &self.watch_path)
            .field("is_running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl FileWatcher {
    /// Starts watching `path`.
    ///
    /// Reported paths are absolute and canonical, matching
    /// [`watch_path`](Self::watch_path).
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::PathNotFound`] if the path doesn't exist.
    pub fn new<F: FileFilter>(
        path: &Utf8Path,
        config: &WatchConfig,
        filter: F,
    ) -> Result<Self, WatchError> {
        Self::with_capacity(path, config, filter, DEFAULT_CHANNEL_CAPACITY)
    }

    /// Like [`new`](Self::new), with a custom channel capacity.
    pub fn with_capacity<F: FileFilter>(
        path: &Utf8Path,
        config: &WatchConfig,
        filter: F,
        channel_capacity: usize,
    ) -> Result<Self, WatchError> {
        if !path.exists() {
            return Err(WatchError::path_not_found(path));
        }
        let watch_path = path.canonicalize_utf8()?;

        let (event_tx, event_rx) = mpsc::channel(channel_capacity);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let task_path = watch_path.clone();
        let debounce = config.debounce();
        let recursive = config.recursive;

        let task_handle = tokio::task::spawn_blocking(move || {
            run_watcher_loop(&task_path, debounce, recursive, event_tx, shutdown_rx, filter)
        });

        Ok(Self {
            shutdown_tx: Some(shutdown_tx),
            task_handle: Some(task_handle),
            event_rx,
            watch_path,
        })
    }

    /// Receives the next batch; `None` once the watcher has stopped.
    pub async fn recv(&mut self) -> Option<FileEventBatch> {
        self.event_rx.recv().await
    }

    /// The canonical path being watched.
    #[must_use]
    pub fn watch_path(&self) -> &Utf8Path {
        &self.watch_path
    }

    /// Returns `true` while the watcher thread is alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.shutdown_tx.is_some() && self.task_handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stops the watcher thread and waits for it to exit.
    pub async fn shutdown(mut self) -> Result<(), WatchError> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }

        if let Some(handle) = self.task_handle.take() {
            handle.await??;
        }

        Ok(())
    }
}

impl Drop for FileWatcher {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

fn run_watcher_loop<F: FileFilter>(
    path: &Utf8Path,
    debounce: Duration,
    recursive: bool,
    event_tx: mpsc::Sender<FileEventBatch>,
    shutdown_rx: oneshot::Receiver<()>,
    filter: F,
) -> Result<(), WatchError> {
    let mut debouncer: Debouncer<notify::RecommendedWatcher> =
        new_debouncer(debounce, move |res: DebounceEventResult| match res {
            Ok(events) => {
                let batch: FileEventBatch = events
                    .into_iter()
                    .filter_map(|event| match Utf8PathBuf::try_from(event.path) {
                        Ok(path) => Some(path),
                        Err(err) => {
                            warn!(
                                path = %err.into_path_buf().display(),
                                "Skipping non-UTF-8 path in file event"
                            );
                            None
                        }
                    })
                    .filter(|path| {
                        let keep = filter.should_process(path);
                        if !keep {
                            trace!(path = %path, "Filtered out file event");
                        }
                        keep
                    })
                    .map(FileEvent::new)
                    .collect();

                if batch.is_empty() {
                    return;
                }
                if event_tx.blocking_send(batch).is_err() {
                    debug!("Event channel closed, dropping batch");
                }
            }
            Err(error) => warn!(error = %error, "Debouncer error"),
        })?;

    let mode = if recursive {
        RecursiveMode::Recursive
    } else {
        RecursiveMode::NonRecursive
    };
    debouncer.watcher().watch(path.as_std_path(), mode)?;

    info!(path = %path, recursive, "File watcher started");

    let _ = shutdown_rx.blocking_recv();

    info!(path = %path, "File watcher stopped");
    Ok(())
}
