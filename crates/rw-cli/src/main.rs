//! CLI entry point for redwork.
//!
//! Generates the route registry from a directory of UI component files,
//! keeps it current while routes are added or removed, and prerenders
//! static pages from a bundled server entry.
//!
//! # Usage
//!
//! ```bash
//! redwork [OPTIONS] <COMMAND>
//!
//! # Write .redwork/generated/routes.ts and list the routes
//! redwork routes --print
//!
//! # Regenerate the registry whenever a route file appears or disappears
//! redwork watch
//!
//! # Resolve a URL against the generated registry
//! redwork match /users/42 --method get
//!
//! # Full build; everything after `--` is the bundler command
//! redwork build -- npm run bundle
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

use std::io::Write;

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{WrapErr, bail, eyre};
use rw_core::config::CONFIG_FILE_NAME;
use rw_core::{BuildConfig, BuildOutputManifest, Config, Method, RouteDescriptor};
use rw_registry::{
    RegistryReader, RegistryWriter, RouteTable, Scaffold, manifest_key_prefix, reconcile,
    reconcile_strict,
};
use rw_scanner::RouteScanner;
use rw_ssg::{NodeRuntime, SsgOptions, SsgOrchestrator, SsgReport};
use rw_watcher::RouteWatcher;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// File-based routing, registry generation and static prerendering.
#[derive(Parser)]
#[command(name = "redwork", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    command: Commands,

    /// Configuration file. Defaults apply when it does not exist.
    #[arg(short, long, global = true, env = "REDWORK_CONFIG", default_value = CONFIG_FILE_NAME)]
    config: Utf8PathBuf,

    /// Route directory (overrides `routes.dir`).
    #[arg(long, global = true, env = "REDWORK_ROUTES_DIR")]
    routes_dir: Option<Utf8PathBuf>,

    /// Working directory for generated sources and build output
    /// (overrides `build.root_dir`).
    #[arg(long, global = true, env = "REDWORK_ROOT_DIR")]
    root_dir: Option<Utf8PathBuf>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Scan the route directory and write the route registry.
    Routes {
        /// Also print the discovered routes.
        #[arg(short, long)]
        print: bool,
    },

    /// Write the registry, then rewrite it whenever the set of route files changes.
    Watch,

    /// Resolve a URL path against the generated registry.
    Match {
        /// URL path to resolve, e.g. `/users/42`.
        path: String,

        /// Only consider routes registered under this method.
        #[arg(short, long)]
        method: Option<Method>,
    },

    /// Write the client template and the client/server entry modules.
    Init,

    /// Prerender pages from an existing bundle.
    Ssg(SsgArgs),

    /// Clean, scaffold, write the registry, bundle, and prerender.
    Build {
        #[command(flatten)]
        ssg: SsgArgs,

        /// Bundler command producing `dist/client` and `dist/ssr`.
        ///
        /// Without it the build stops after the registry is written.
        #[arg(last = true, value_name = "BUNDLER")]
        bundler: Vec<String>,
    },
}

/// Static generation overrides.
#[derive(Args, Clone, Debug)]
struct SsgArgs {
    /// Global static generation default (overrides `build.ssg`).
    #[arg(long, value_name = "BOOL")]
    ssg: Option<bool>,

    /// Keep routes missing from the build manifest instead of failing.
    #[arg(long)]
    lenient_manifest: bool,

    /// Per-render timeout in milliseconds, 0 to disable
    /// (overrides `build.render_timeout_ms`).
    #[arg(long, value_name = "MS")]
    render_timeout_ms: Option<u64>,
}

impl SsgArgs {
    fn apply(&self, build: &mut BuildConfig) {
        if let Some(ssg) = self.ssg {
            build.ssg = ssg;
        }
        if self.lenient_manifest {
            build.strict_manifest = false;
        }
        if let Some(timeout) = self.render_timeout_ms {
            build.render_timeout_ms = timeout;
        }
    }
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// Respects `RUST_LOG` if set. Otherwise uses `debug` with `--verbose` and
/// `info` by default, with the watcher backends capped at `warn`.
fn init_tracing(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(format!("{level},mio=warn,notify=warn"))
    });

    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_ansi(use_ansi))
        .with(filter)
        .init();
}

/// Loads the configuration file and applies command-line overrides.
fn load_config(cli: &Cli) -> color_eyre::Result<Config> {
    let mut config = Config::load_or_default(&cli.config)
        .wrap_err_with(|| format!("Failed to load configuration from {}", cli.config))?;

    if let Some(dir) = &cli.routes_dir {
        config.routes.dir.clone_from(dir);
    }
    if let Some(root) = &cli.root_dir {
        config.build.root_dir.clone_from(root);
    }
    match &cli.command {
        Commands::Ssg(ssg) | Commands::Build { ssg, .. } => ssg.apply(&mut config.build),
        _ => {}
    }

    config.validate()?;
    Ok(config)
}

fn create_scanner(config: &Config) -> color_eyre::Result<RouteScanner> {
    config.require_route_dir()?;
    RouteScanner::from_config(&config.routes)
        .map_err(|e| eyre!("Failed to create scanner: {e}"))
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigterm = signal(SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result?,
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down"),
        }
    }

    #[cfg(not(unix))]
    tokio::signal::ctrl_c().await?;

    Ok(())
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

/// Scans routes and writes the registry.
fn run_routes(config: &Config) -> color_eyre::Result<Vec<RouteDescriptor>> {
    let scanner = create_scanner(config)?;
    let routes = scanner.scan()?;

    let registry = config.build.registry_path();
    RegistryWriter::new(config.routes.dir.clone()).write(&routes, &registry, None)?;
    Ok(routes)
}

/// Writes the registry, then keeps it in sync until interrupted.
async fn run_watch(config: &Config) -> color_eyre::Result<()> {
    let routes = run_routes(config)?;
    info!(routes = routes.len(), dir = %config.routes.dir, "Initial registry written");

    let watcher = RouteWatcher::new(create_scanner(config)?, config.watch);
    let writer = RegistryWriter::new(config.routes.dir.clone());
    let registry = config.build.registry_path();

    let cancel = CancellationToken::new();
    let token = cancel.clone();
    tokio::spawn(async move {
        if let Err(err) = shutdown_signal().await {
            warn!(error = %err, "Failed to listen for shutdown signals");
        }
        token.cancel();
    });

    watcher
        .run(
            |routes: Vec<RouteDescriptor>| {
                if let Err(err) = writer.write(&routes, &registry, None) {
                    error!(error = %err, registry = %registry, "Failed to rewrite route registry");
                }
                std::future::ready(())
            },
            cancel,
        )
        .await?;

    Ok(())
}

/// Looks a path up in the generated registry.
fn run_match(config: &Config, path: &str, method: Option<Method>) -> color_eyre::Result<()> {
    let registry = config.build.registry_path();
    let entries = RegistryReader::load(&registry)
        .wrap_err_with(|| format!("Failed to read {registry}; run `redwork routes` first"))?;

    let table = RouteTable::from_registry(&entries);
    let found = match method {
        Some(method) => table.find(method, path),
        None => table.find_any(path),
    };
    let Some(found) = found else {
        bail!("No route matches {path}");
    };

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{} {} -> {}", found.method, found.template, found.value)?;
    for (name, value) in &found.params {
        writeln!(handle, "  {name} = {value}")?;
    }
    Ok(())
}

/// Writes the entry scaffold.
fn run_init(config: &Config) -> color_eyre::Result<()> {
    Scaffold::new(config.build.generated_dir(), config.runtime.router_module.as_str())
        .with_registry(config.build.registry_path())
        .write()?;
    Ok(())
}

/// Reconciles routes with the server bundle and prerenders them.
async fn run_ssg(config: &Config) -> color_eyre::Result<SsgReport> {
    let routes = create_scanner(config)?.scan()?;

    let manifest_path = config.build.ssr_manifest();
    info!(manifest = %manifest_path, "Reading SSR manifest");
    let manifest = BuildOutputManifest::load(&manifest_path)?;

    let prefix = manifest_key_prefix(&config.build.ssr_dir(), &config.routes.dir)?;
    let routes = if config.build.strict_manifest {
        reconcile_strict(&routes, &manifest, &prefix)?
    } else {
        reconcile(&routes, &manifest, &prefix)
    };

    let runtime = NodeRuntime::from_config(&config.runtime);
    let orchestrator = SsgOrchestrator::new(
        runtime.clone(),
        runtime,
        SsgOptions::from_config(&config.build),
    );
    let report = orchestrator.generate(&routes, config.build.ssg).await?;
    Ok(report)
}

/// Runs the external bundler command.
async fn run_bundler(program: &str, args: &[String]) -> color_eyre::Result<()> {
    info!(program, ?args, "Bundling");
    let status = tokio::process::Command::new(program)
        .args(args)
        .status()
        .await
        .wrap_err_with(|| format!("Failed to start bundler `{program}`"))?;

    if !status.success() {
        bail!("Bundler `{program}` failed with {status}");
    }
    Ok(())
}

async fn run_build(config: &Config, bundler: &[String]) -> color_eyre::Result<()> {
    let dist = config.build.dist_dir();
    if dist.exists() {
        info!(dist = %dist, "Deleting previous dist directory");
        tokio::fs::remove_dir_all(&dist)
            .await
            .wrap_err_with(|| format!("Failed to delete {dist}"))?;
    }

    run_init(config)?;
    let routes = run_routes(config)?;
    info!(routes = routes.len(), "Generated routes");

    let Some((program, args)) = bundler.split_first() else {
        warn!("No bundler command given; bundle the generated entries, then run `redwork ssg`");
        return Ok(());
    };
    run_bundler(program, args).await?;

    let report = run_ssg(config).await?;
    info!(pages = report.pages.len(), skipped = report.skipped, "Build completed successfully");
    Ok(())
}

// =============================================================================
// OUTPUT HELPERS
// =============================================================================

fn print_routes(routes: &[RouteDescriptor]) -> color_eyre::Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    let width = routes
        .iter()
        .map(|route| route.path.as_str().len())
        .max()
        .unwrap_or(0);

    for route in routes {
        writeln!(
            handle,
            "{:<7} {:<width$}  {}",
            route.method.as_str().to_uppercase(),
            route.path.as_str(),
            route.file,
        )?;
    }
    writeln!(handle)?;
    writeln!(handle, "{} routes", routes.len())?;
    Ok(())
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Application entry point.
#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.no_color);

    let config = load_config(&cli)?;

    match &cli.command {
        Commands::Routes { print } => {
            let routes = run_routes(&config)?;
            if *print {
                print_routes(&routes)?;
            }
            Ok(())
        }
        Commands::Watch => run_watch(&config).await,
        Commands::Match { path, method } => run_match(&config, path, *method),
        Commands::Init => run_init(&config),
        Commands::Ssg(_) => {
            let report = run_ssg(&config).await?;
            info!(pages = report.pages.len(), skipped = report.skipped, "Prerendered pages");
            Ok(())
        }
        Commands::Build { bundler, .. } => run_build(&config, bundler).await,
    }
}
