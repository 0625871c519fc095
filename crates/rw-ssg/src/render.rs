//! The seams static generation renders through.
//!
//! Both are implemented by [`NodeRuntime`](crate::NodeRuntime) for real
//! builds and by in-memory fakes in tests.

use std::future::Future;

use camino::Utf8Path;

use crate::error::SsgError;

/// What a render call produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The server entry had no route for the path.
    NotFound,
    /// The rendered document.
    Html(String),
}

impl RenderOutcome {
    /// The HTML, if the route was found.
    #[must_use]
    pub fn into_html(self) -> Option<String> {
        match self {
            Self::Html(html) => Some(html),
            Self::NotFound => None,
        }
    }
}

/// Server-side render contract: `(path, template) -> 404 | html`.
pub trait Renderer: Send + Sync {
    /// Renders `path` with the server entry at `server_entry`, filling the
    /// client HTML template at `template`.
    fn render(
        &self,
        path: &str,
        template: &Utf8Path,
        server_entry: &Utf8Path,
    ) -> impl Future<Output = Result<RenderOutcome, SsgError>> + Send;
}

/// Reads a compiled route module's optional `ssg` export.
pub trait ModuleInspector: Send + Sync {
    /// `Some(flag)` when the module exports a boolean `ssg`, `None` when it
    /// exports nothing.
    ///
    /// # Errors
    ///
    /// [`SsgError::InvalidSsgExport`] when the export is not a boolean.
    fn ssg_flag(
        &self,
        module: &Utf8Path,
    ) -> impl Future<Output = Result<Option<bool>, SsgError>> + Send;
}
