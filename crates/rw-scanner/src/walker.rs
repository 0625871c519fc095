//! Directory traversal for route files.
//!
//! [`FileWalker`] uses the `ignore` crate to walk the route directory and
//! yields paths relative to the route root that match the configured
//! [`RoutePattern`]. Ignore files and hidden entries are not filtered: every
//! matching file is a route unless it sits under a skipped directory.
//!
//! # Examples
//!
//! ```ignore
//! use rw_scanner::{FileWalker, RoutePattern};
//! use camino::Utf8Path;
//!
//! let walker = FileWalker::new(Utf8Path::new("./routes"), RoutePattern::default())?;
//! for file in walker.collect_paths()? {
//!     println!("route file: {file}");
//! }
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use ignore::WalkBuilder;

use crate::error::ScanError;
use crate::pattern::RoutePattern;

/// Directories never descended into, in addition to user skips.
const SKIP_DIRECTORIES: &[&str] = &["node_modules", ".git", ".redwork"];

/// Discovers route files under a root directory.
///
/// Paths come back in the order the walk discovers them, which depends on
/// the file system. Callers must not rely on any particular ordering.
#[derive(Debug, Clone)]
pub struct FileWalker {
    /// The root directory to walk.
    root: Utf8PathBuf,
    /// Which files count as routes.
    pattern: RoutePattern,
    /// Additional directory names to skip.
    skip_dirs: Vec<String>,
    /// Whether to follow symbolic links.
    follow_links: bool,
}

impl FileWalker {
    /// Creates a walker for `root`.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Config`] if the root path doesn't exist or
    /// isn't a directory.
    pub fn new(root: &Utf8Path, pattern: RoutePattern) -> Result<Self, ScanError> {
        if !root.exists() {
            return Err(ScanError::config(format!(
                "root path does not exist: {root}"
            )));
        }
        if !root.is_dir() {
            return Err(ScanError::config(format!(
                "root path is not a directory: {root}"
            )));
        }

        Ok(Self {
            root: root.to_owned(),
            pattern,
            skip_dirs: Vec::new(),
            follow_links: false,
        })
    }

    /// Adds directory names to skip during traversal.
    #[must_use]
    pub fn with_skip_dirs<S: AsRef<str>>(mut self, dirs: &[S]) -> Self {
        self.skip_dirs
            .extend(dirs.iter().map(|dir| dir.as_ref().to_owned()));
        self
    }

    /// Configures whether to follow symbolic links.
    #[must_use]
    pub const fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Collects root-relative paths of every matching file.
    ///
    /// Relative paths always use `/` as separator.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Walk`] if directory traversal fails and
    /// [`ScanError::NonUtf8Path`] if a non-UTF-8 path is encountered.
    pub fn collect_paths(&self) -> Result<Vec<Utf8PathBuf>, ScanError> {
        let mut paths = Vec::new();

        for result in self.build_walker() {
            let entry = result?;

            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let path = entry.path();
            let utf8_path =
                Utf8Path::from_path(path).ok_or_else(|| ScanError::NonUtf8Path(path.to_owned()))?;

            let Some(relative) = self.relative_to_root(utf8_path) else {
                continue;
            };

            if self.pattern.is_match(&relative) {
                paths.push(relative);
            }
        }

        Ok(paths)
    }

    /// Strips the root and joins the remaining components with `/`.
    fn relative_to_root(&self, path: &Utf8Path) -> Option<Utf8PathBuf> {
        let stripped = path.strip_prefix(&self.root).ok()?;
        let joined = stripped
            .components()
            .map(|component| component.as_str())
            .collect::<Vec<_>>()
            .join("/");
        Some(Utf8PathBuf::from(joined))
    }

    fn build_walker(&self) -> ignore::Walk {
        let skip_dirs = self.skip_dirs.clone();
        WalkBuilder::new(&self.root)
            .standard_filters(false)
            .follow_links(self.follow_links)
            .filter_entry(move |entry| {
                let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
                let name = entry.file_name().to_str().unwrap_or_default();
                !(is_dir
                    && entry.depth() > 0
                    && (SKIP_DIRECTORIES.contains(&name) || skip_dirs.iter().any(|d| d == name)))
            })
            .build()
    }

    /// Returns the root directory being walked.
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Returns the route pattern.
    #[inline]
    #[must_use]
    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }
}
