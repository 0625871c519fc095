//! Static generation: select, render, persist.

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use futures_util::future::try_join_all;
use rw_core::{BuildConfig, RouteDescriptor};
use tracing::{debug, info};

use crate::error::SsgError;
use crate::output::{SsgPage, StagedOutput};
use crate::render::{ModuleInspector, RenderOutcome, Renderer};

/// Locations and limits for a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SsgOptions {
    /// Client HTML template handed to the renderer.
    pub template: Utf8PathBuf,
    /// Server entry module exporting the render function.
    pub server_entry: Utf8PathBuf,
    /// Directory route `file`s are relative to (the server bundle).
    pub module_root: Utf8PathBuf,
    /// Final page directory.
    pub output: Utf8PathBuf,
    /// Per-render limit; `None` waits forever.
    pub render_timeout: Option<Duration>,
}

impl SsgOptions {
    /// Options for the build layout described by `config`.
    #[must_use]
    pub fn from_config(config: &BuildConfig) -> Self {
        Self {
            template: config.client_template(),
            server_entry: config.server_entry(),
            module_root: config.ssr_dir(),
            output: config.ssg_dir(),
            render_timeout: config.render_timeout(),
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SsgReport {
    /// Files written, in route order.
    pub pages: Vec<Utf8PathBuf>,
    /// Routes that opted out.
    pub skipped: usize,
}

/// Renders every route that opts in to static generation.
///
/// A route opts in when its module's `ssg` export is `true`, or when it
/// exports nothing and the global default is `true`.
#[derive(Debug)]
pub struct SsgOrchestrator<R, M> {
    renderer: R,
    inspector: M,
    options: SsgOptions,
}

impl<R: Renderer, M: ModuleInspector> SsgOrchestrator<R, M> {
    /// Creates an orchestrator.
    pub fn new(renderer: R, inspector: M, options: SsgOptions) -> Self {
        Self {
            renderer,
            inspector,
            options,
        }
    }

    /// The run's options.
    pub fn options(&self) -> &SsgOptions {
        &self.options
    }

    /// Renders the selected routes concurrently and writes the pages.
    ///
    /// `routes` must already point at compiled modules, relative to
    /// [`SsgOptions::module_root`].
    ///
    /// # Errors
    ///
    /// The first failure aborts the run and leaves no output directory
    /// behind: a module that cannot be inspected, a render error or
    /// timeout, or a selected route rendering as not found.
    pub async fn generate(
        &self,
        routes: &[RouteDescriptor],
        global_default: bool,
    ) -> Result<SsgReport, SsgError> {
        let selected = self.select(routes, global_default).await?;
        let skipped = routes.len() - selected.len();
        info!(selected = selected.len(), skipped, "Prerendering pages");

        let pages =
            try_join_all(selected.iter().map(|route| self.render_route(route))).await?;

        let written = StagedOutput::new(&self.options.output)
            .commit(&pages)
            .await?;
        info!(
            pages = written.len(),
            output = %self.options.output,
            "Static generation complete"
        );

        Ok(SsgReport {
            pages: written,
            skipped,
        })
    }

    /// Routes whose resolved flag is `true`, in input order.
    pub async fn select<'r>(
        &self,
        routes: &'r [RouteDescriptor],
        global_default: bool,
    ) -> Result<Vec<&'r RouteDescriptor>, SsgError> {
        let flags = try_join_all(
            routes
                .iter()
                .map(|route| self.resolve_flag(route, global_default)),
        )
        .await?;

        Ok(routes
            .iter()
            .zip(flags)
            .filter_map(|(route, keep)| keep.then_some(route))
            .collect())
    }

    async fn resolve_flag(
        &self,
        route: &RouteDescriptor,
        global_default: bool,
    ) -> Result<bool, SsgError> {
        let module = self.module_path(&route.file);
        let flag = self.inspector.ssg_flag(&module).await?;
        let resolved = flag.unwrap_or(global_default);
        debug!(
            route = %route.path,
            module = %module,
            ?flag,
            resolved,
            "Resolved ssg flag"
        );
        Ok(resolved)
    }

    async fn render_route(&self, route: &RouteDescriptor) -> Result<SsgPage, SsgError> {
        let path = route.path.as_str();
        let render = self
            .renderer
            .render(path, &self.options.template, &self.options.server_entry);

        let outcome = match self.options.render_timeout {
            Some(timeout) => tokio::time::timeout(timeout, render)
                .await
                .map_err(|_elapsed| SsgError::RenderTimeout {
                    path: path.to_owned(),
                    timeout,
                })??,
            None => render.await?,
        };

        match outcome {
            RenderOutcome::Html(html) => Ok(SsgPage {
                path: path.to_owned(),
                html,
            }),
            RenderOutcome::NotFound => Err(SsgError::NotFound {
                path: path.to_owned(),
                file: route.file.clone(),
            }),
        }
    }

    fn module_path(&self, file: &Utf8Path) -> Utf8PathBuf {
        self.options.module_root.join(file)
    }
}
