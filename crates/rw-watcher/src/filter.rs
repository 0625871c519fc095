//! File filtering for watch events.
//!
//! Filters run on the blocking watcher thread, before events reach the
//! channel, so irrelevant changes never wake the async side.

use camino::{Utf8Path, Utf8PathBuf};
use rw_scanner::RoutePattern;

/// Decides which changed paths are worth reporting.
///
/// # Examples
///
/// ```
/// use rw_watcher::FileFilter;
/// use camino::Utf8Path;
///
/// struct NoDrafts;
///
/// impl FileFilter for NoDrafts {
///     fn should_process(&self, path: &Utf8Path) -> bool {
///         !path.as_str().contains("/drafts/")
///     }
/// }
/// ```
pub trait FileFilter: Send + Sync + 'static {
    /// Returns `true` if a change at `path` should be reported.
    fn should_process(&self, path: &Utf8Path) -> bool;
}

/// Accepts every path.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllFilter;

impl FileFilter for AcceptAllFilter {
    fn should_process(&self, _path: &Utf8Path) -> bool {
        true
    }
}

/// Accepts paths under the route directory that match the route pattern.
///
/// Paths without an extension are accepted too: deleting or moving a
/// directory reports only the directory itself, and every route file below
/// it is gone with it.
///
/// # Examples
///
/// ```
/// use rw_scanner::RoutePattern;
/// use rw_watcher::{FileFilter, RouteFilter};
/// use camino::Utf8Path;
///
/// let filter = RouteFilter::new("/app/routes", RoutePattern::default());
/// assert!(filter.should_process(Utf8Path::new("/app/routes/blog/index.svelte")));
/// assert!(filter.should_process(Utf8Path::new("/app/routes/blog")));
/// assert!(!filter.should_process(Utf8Path::new("/app/routes/notes.md")));
/// assert!(!filter.should_process(Utf8Path::new("/app/lib/button.svelte")));
/// ```
#[derive(Debug, Clone)]
pub struct RouteFilter {
    root: Utf8PathBuf,
    pattern: RoutePattern,
}

impl RouteFilter {
    /// Creates a filter for `root`, which must be in the same form
    /// (canonical or not) as the paths the watcher reports.
    #[must_use]
    pub fn new(root: impl Into<Utf8PathBuf>, pattern: RoutePattern) -> Self {
        Self {
            root: root.into(),
            pattern,
        }
    }
}

impl FileFilter for RouteFilter {
    fn should_process(&self, path: &Utf8Path) -> bool {
        let Ok(relative) = path.strip_prefix(&self.root) else {
            return false;
        };
        if relative.as_str().is_empty() {
            return false;
        }
        let relative = relative
            .components()
            .map(|component| component.as_str())
            .collect::<Vec<_>>()
            .join("/");
        let relative = Utf8Path::new(&relative);

        relative.extension().is_none() || self.pattern.is_match(relative)
    }
}

impl<F: FileFilter + ?Sized> FileFilter for Box<F> {
    fn should_process(&self, path: &Utf8Path) -> bool {
        (**self).should_process(path)
    }
}

impl<F: FileFilter + ?Sized> FileFilter for std::sync::Arc<F> {
    fn should_process(&self, path: &Utf8Path) -> bool {
        (**self).should_process(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn filter() -> RouteFilter {
        RouteFilter::new("/app/routes", RoutePattern::default())
    }

    #[test]
    fn test_route_files_pass() {
        let filter = filter();
        assert!(filter.should_process(Utf8Path::new("/app/routes/index.svelte")));
        assert!(filter.should_process(Utf8Path::new("/app/routes/users/$id.svelte")));
    }

    #[test]
    fn test_other_files_filtered() {
        let filter = filter();
        assert!(!filter.should_process(Utf8Path::new("/app/routes/style.css")));
        assert!(!filter.should_process(Utf8Path::new("/app/routes/index.svelte.swp")));
        assert!(!filter.should_process(Utf8Path::new("/elsewhere/index.svelte")));
        assert!(!filter.should_process(Utf8Path::new("/app/routes")));
    }

    #[test]
    fn test_directories_pass() {
        assert!(filter().should_process(Utf8Path::new("/app/routes/blog")));
    }

    #[test]
    fn test_custom_pattern() {
        let filter = RouteFilter::new("/app/routes", RoutePattern::new("*.svelte").unwrap());
        assert!(filter.should_process(Utf8Path::new("/app/routes/index.svelte")));
        assert!(!filter.should_process(Utf8Path::new("/app/routes/blog/index.svelte")));
    }

    #[test]
    fn test_wrapped_filters() {
        let boxed: Box<dyn FileFilter> = Box::new(filter());
        let shared = Arc::new(filter());
        let path = Utf8Path::new("/app/routes/about.svelte");
        assert!(boxed.should_process(path));
        assert!(shared.should_process(path));
        assert!(AcceptAllFilter.should_process(Utf8Path::new("/anything")));
    }
}
