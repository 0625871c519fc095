//! Keeping a route list current while files come and go.
//!
//! Every debounced batch triggers a full rescan. The callback only fires
//! when the set of route files differs from the previous scan, so saving
//! an existing route does not regenerate anything.

use std::collections::BTreeSet;
use std::future::Future;

use camino::Utf8PathBuf;
use rw_core::{RouteDescriptor, WatchConfig};
use rw_scanner::RouteScanner;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::WatchError;
use crate::events::FileEventBatch;
use crate::filter::RouteFilter;
use crate::watcher::FileWatcher;

/// Watches a route directory and reports fresh route lists.
///
/// # Examples
///
/// ```no_run
/// use rw_core::WatchConfig;
/// use rw_scanner::RouteScanner;
/// use rw_watcher::RouteWatcher;
/// use tokio_util::sync::CancellationToken;
/// use camino::Utf8Path;
///
/// # async fn example() -> Result<(), rw_watcher::WatchError> {
/// let watcher = RouteWatcher::new(RouteScanner::new(Utf8Path::new("./routes")), WatchConfig::default());
/// let cancel = CancellationToken::new();
///
/// watcher
///     .run(|routes| async move { println!("{} routes", routes.len()) }, cancel)
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RouteWatcher {
    scanner: RouteScanner,
    config: WatchConfig,
}

impl RouteWatcher {
    /// Creates a watcher over the scanner's route directory.
    #[must_use]
    pub fn new(scanner: RouteScanner, config: WatchConfig) -> Self {
        Self { scanner, config }
    }

    /// The scanner used for rescans.
    #[must_use]
    pub fn scanner(&self) -> &RouteScanner {
        &self.scanner
    }

    /// Watches until `cancel` fires, calling `on_change` with the complete
    /// route list after every change to the set of route files.
    ///
    /// Files present at startup form the baseline and are not reported.
    /// No callback starts after cancellation.
    ///
    /// # Errors
    ///
    /// Fails if the baseline scan fails or the watcher cannot start or dies.
    /// Rescan failures while watching are logged and skipped.
    pub async fn run<F, Fut>(
        &self,
        mut on_change: F,
        cancel: CancellationToken,
    ) -> Result<(), WatchError>
    where
        F: FnMut(Vec<RouteDescriptor>) -> Fut,
        Fut: Future<Output = ()>,
    {
        let root = self.scanner.root();
        if !root.exists() {
            return Err(WatchError::path_not_found(root));
        }

        let mut known = file_set(&self.rescan().await?);
        let filter = RouteFilter::new(root.canonicalize_utf8()?, self.scanner.pattern().clone());
        let mut watcher = FileWatcher::new(root, &self.config, filter)?;

        info!(root = %root, routes = known.len(), "Watching routes");

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                batch = watcher.recv() => {
                    let Some(batch) = batch else {
                        return Err(WatchError::ChannelClosed);
                    };
                    let Some(routes) = self.apply(&batch, &mut known).await? else {
                        continue;
                    };
                    if cancel.is_cancelled() {
                        break;
                    }
                    on_change(routes).await;
                }
            }
        }

        info!(root = %root, "Stopped watching routes");
        watcher.shutdown().await
    }

    /// Runs the watcher on a background task.
    pub fn start<F, Fut>(self, on_change: F) -> RouteWatchHandle
    where
        F: FnMut(Vec<RouteDescriptor>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let task = tokio::spawn(async move { self.run(on_change, token).await });
        RouteWatchHandle { cancel, task }
    }

    /// Rescans after a batch. Returns the new list if the file set changed.
    ///
    /// Recoverable rescan errors are logged and keep the previous set.
    async fn apply(
        &self,
        batch: &FileEventBatch,
        known: &mut BTreeSet<Utf8PathBuf>,
    ) -> Result<Option<Vec<RouteDescriptor>>, WatchError> {
        debug!(events = batch.len(), "Change batch received");

        let routes = match self.rescan().await {
            Ok(routes) => routes,
            Err(err) if err.is_recoverable() => {
                warn!(error = %err, "Route rescan failed; keeping previous routes");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        let current = file_set(&routes);
        if current == *known {
            debug!("Route set unchanged");
            return Ok(None);
        }

        for route in routes.iter().filter(|r| !known.contains(&r.file)) {
            info!(route = %route.path, file = %route.file, "[+] Added route");
        }
        for file in known.difference(&current) {
            match self.scanner.describe(file) {
                Ok(route) => info!(route = %route.path, file = %file, "[-] Deleted route"),
                Err(_) => info!(file = %file, "[-] Deleted route"),
            }
        }

        *known = current;
        Ok(Some(routes))
    }

    async fn rescan(&self) -> Result<Vec<RouteDescriptor>, WatchError> {
        let scanner = self.scanner.clone();
        Ok(tokio::task::spawn_blocking(move || scanner.scan()).await??)
    }
}

fn file_set(routes: &[RouteDescriptor]) -> BTreeSet<Utf8PathBuf> {
    routes.iter().map(|route| route.file.clone()).collect()
}

/// A [`RouteWatcher`] running on a background task.
#[derive(Debug)]
pub struct RouteWatchHandle {
    cancel: CancellationToken,
    task: JoinHandle<Result<(), WatchError>>,
}

impl RouteWatchHandle {
    /// Returns `true` while the watch task is alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stops watching and waits for the task to exit.
    ///
    /// A panic inside the task, including one raised by the change
    /// callback, surfaces as [`WatchError::TaskFailed`].
    pub async fn stop(self) -> Result<(), WatchError> {
        self.cancel.cancel();
        self.task.await?
    }
}
