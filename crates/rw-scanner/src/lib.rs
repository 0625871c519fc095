//! Route file discovery and URL path derivation.
//!
//! This crate turns a directory of UI component files into an ordered list
//! of [`RouteDescriptor`]s.
//!
//! # Overview
//!
//! The main entry point is [`RouteScanner`], which combines:
//!
//! - [`FileWalker`]: Directory traversal with directory skips
//! - [`RoutePattern`]: Glob selecting which files are routes
//! - [`PathRule`]: Pluggable file path to URL path mapping
//!   ([`DefaultPathRule`] built in)
//!
//! # Example
//!
//! ```ignore
//! use rw_scanner::RouteScanner;
//! use camino::Utf8Path;
//!
//! let scanner = RouteScanner::new(Utf8Path::new("./routes"));
//! for route in scanner.scan()? {
//!     println!("{} {} -> {}", route.method, route.path, route.file);
//! }
//! ```
//!
//! # Validation
//!
//! Every descriptor a rule produces is validated. One bad descriptor fails
//! the whole scan with [`ScanError::Validation`] naming the file; nothing is
//! silently dropped. Duplicate `{method, path}` pairs are kept in discovery
//! order and left for the matcher to resolve.

#![deny(clippy::all)]
#![warn(missing_docs)]

mod error;
mod pattern;
mod rule;
mod walker;

pub use error::ScanError;
pub use pattern::{DEFAULT_PATTERN, RoutePattern};
pub use rule::{DefaultPathRule, PathRule, RouteSpec};
pub use walker::FileWalker;

use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use rw_core::{RouteDescriptor, RoutePath, RoutesConfig};
use tracing::{debug, info};

/// Discovers route files and turns them into validated descriptors.
///
/// `RouteScanner` is cheaply cloneable; the path rule is shared via `Arc`.
/// Each [`scan`](Self::scan) is a full pass over the directory, with no
/// state carried between calls.
#[derive(Clone)]
pub struct RouteScanner {
    root: Utf8PathBuf,
    pattern: RoutePattern,
    rule: Arc<dyn PathRule>,
    skip_dirs: Vec<String>,
}

impl std::fmt::Debug for RouteScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteScanner")
            .field("root", &self.root)
            .field("pattern", &self.pattern.as_str())
            .field("skip_dirs", &self.skip_dirs)
            .finish_non_exhaustive()
    }
}

impl RouteScanner {
    /// Creates a scanner with the default pattern and path rule.
    #[must_use]
    pub fn new(root: &Utf8Path) -> Self {
        Self {
            root: root.to_owned(),
            pattern: RoutePattern::default(),
            rule: Arc::new(DefaultPathRule::default()),
            skip_dirs: Vec::new(),
        }
    }

    /// Creates a scanner from the `routes` configuration section.
    pub fn from_config(config: &RoutesConfig) -> Result<Self, ScanError> {
        Ok(Self {
            root: config.dir.clone(),
            pattern: RoutePattern::new(&config.pattern)?,
            rule: Arc::new(DefaultPathRule::new(config.extension.as_str())),
            skip_dirs: config.skip_dirs.clone(),
        })
    }

    /// Replaces the file pattern.
    #[must_use]
    pub fn with_pattern(mut self, pattern: RoutePattern) -> Self {
        self.pattern = pattern;
        self
    }

    /// Replaces the path rule.
    #[must_use]
    pub fn with_rule<R: PathRule>(mut self, rule: R) -> Self {
        self.rule = Arc::new(rule);
        self
    }

    /// Adds directory names to skip.
    #[must_use]
    pub fn with_skip_dirs<S: AsRef<str>>(mut self, dirs: &[S]) -> Self {
        self.skip_dirs
            .extend(dirs.iter().map(|dir| dir.as_ref().to_owned()));
        self
    }

    /// The route directory.
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// The route file pattern.
    #[inline]
    #[must_use]
    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    /// Applies the path rule to one root-relative file and validates it.
    pub fn describe(&self, file: &Utf8Path) -> Result<RouteDescriptor, ScanError> {
        let spec = self.rule.apply(file.as_str());
        let path = RoutePath::new(spec.path).map_err(|reason| ScanError::validation(file, reason))?;
        Ok(RouteDescriptor::new(
            file.as_str().replace('\\', "/"),
            path,
            spec.method,
        ))
    }

    /// Scans the route directory.
    ///
    /// Returns one descriptor per matching file, in discovery order.
    ///
    /// # Errors
    ///
    /// Fails as a whole if the directory cannot be walked or any descriptor
    /// fails validation.
    pub fn scan(&self) -> Result<Vec<RouteDescriptor>, ScanError> {
        info!(root = %self.root, pattern = self.pattern.as_str(), "Scanning routes");

        let files = FileWalker::new(&self.root, self.pattern.clone())?
            .with_skip_dirs(self.skip_dirs.as_slice())
            .collect_paths()?;

        let routes = files
            .iter()
            .map(|file| {
                let route = self.describe(file)?;
                debug!(
                    method = %route.method,
                    route = %route.path,
                    file = %route.file,
                    "Discovered route"
                );
                Ok(route)
            })
            .collect::<Result<Vec<_>, ScanError>>()?;

        info!(count = routes.len(), "Collected routes");
        Ok(routes)
    }
}

/// One-shot scan of `route_dir` with an explicit pattern and rule.
pub fn scan<R: PathRule>(
    route_dir: &Utf8Path,
    pattern: &str,
    rule: R,
) -> Result<Vec<RouteDescriptor>, ScanError> {
    RouteScanner::new(route_dir)
        .with_pattern(RoutePattern::new(pattern)?)
        .with_rule(rule)
        .scan()
}
