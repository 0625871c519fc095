//! Build-time static page generation.
//!
//! [`SsgOrchestrator`] asks a [`ModuleInspector`] which routes opt in,
//! renders them concurrently through a [`Renderer`], and writes one HTML
//! file per route. Any failure fails the whole run; a not-found render of
//! a route that came from the file system means the build is broken.
//!
//! ```no_run
//! use rw_core::BuildConfig;
//! use rw_ssg::{NodeRuntime, SsgOptions, SsgOrchestrator};
//!
//! # async fn example(routes: Vec<rw_core::RouteDescriptor>) -> Result<(), rw_ssg::SsgError> {
//! let config = BuildConfig::default();
//! let runtime = NodeRuntime::new("node");
//! let orchestrator = SsgOrchestrator::new(runtime.clone(), runtime, SsgOptions::from_config(&config));
//! let report = orchestrator.generate(&routes, config.ssg).await?;
//! println!("wrote {} pages", report.pages.len());
//! # Ok(())
//! # }
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

mod error;
mod orchestrator;
mod output;
mod render;
mod runtime;

pub use error::SsgError;
pub use orchestrator::{SsgOptions, SsgOrchestrator, SsgReport};
pub use output::{SsgPage, StagedOutput, page_file_name};
pub use render::{ModuleInspector, RenderOutcome, Renderer};
pub use runtime::NodeRuntime;
