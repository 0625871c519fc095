//! Route directory watching.
//!
//! [`FileWatcher`] bridges `notify` with `notify-debouncer-mini` into tokio,
//! delivering one [`FileEventBatch`] per debounce window. [`RouteWatcher`]
//! sits on top: each batch triggers a full rescan, and the caller's
//! callback receives the fresh route list whenever route files were added
//! or removed.
//!
//! # Lifecycle
//!
//! There is no global watcher. Either drive [`RouteWatcher::run`] with a
//! [`CancellationToken`](tokio_util::sync::CancellationToken) you own, or
//! call [`RouteWatcher::start`] and keep the returned [`RouteWatchHandle`]
//! to [`stop`](RouteWatchHandle::stop) it.
//!
//! ```no_run
//! use rw_core::WatchConfig;
//! use rw_scanner::RouteScanner;
//! use rw_watcher::RouteWatcher;
//! use camino::Utf8Path;
//!
//! # async fn example() -> Result<(), rw_watcher::WatchError> {
//! let handle = RouteWatcher::new(RouteScanner::new(Utf8Path::new("./routes")), WatchConfig::default())
//!     .start(|routes| async move { println!("now {} routes", routes.len()) });
//! // ...
//! handle.stop().await?;
//! # Ok(())
//! # }
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod error;
pub mod events;
pub mod filter;
pub mod route_watcher;
pub mod watcher;

pub use error::WatchError;
pub use events::{FileEvent, FileEventBatch};
pub use filter::{AcceptAllFilter, FileFilter, RouteFilter};
pub use route_watcher::{RouteWatchHandle, RouteWatcher};
pub use watcher::FileWatcher;
