//! Glob patterns selecting route files.

use camino::Utf8Path;
use globset::{GlobBuilder, GlobMatcher};

use crate::error::ScanError;

/// Default pattern: every Svelte component at any depth.
pub const DEFAULT_PATTERN: &str = "**/*.svelte";

/// A compiled route file glob, matched against root-relative paths.
///
/// `*` does not cross directory boundaries; `**/` matches zero or more
/// directories, so the default pattern also matches files at the root.
///
/// # Examples
///
/// ```
/// use rw_scanner::RoutePattern;
/// use camino::Utf8Path;
///
/// let pattern = RoutePattern::default();
/// assert!(pattern.is_match(Utf8Path::new("index.svelte")));
/// assert!(pattern.is_match(Utf8Path::new("blog/posts/$slug.svelte")));
/// assert!(!pattern.is_match(Utf8Path::new("lib/util.ts")));
/// ```
#[derive(Debug, Clone)]
pub struct RoutePattern {
    source: String,
    matcher: GlobMatcher,
}

impl RoutePattern {
    /// Compiles a glob pattern.
    pub fn new(pattern: &str) -> Result<Self, ScanError> {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .backslash_escape(false)
            .build()
            .map_err(|source| ScanError::Pattern {
                pattern: pattern.to_owned(),
                source,
            })?;
        Ok(Self {
            source: pattern.to_owned(),
            matcher: glob.compile_matcher(),
        })
    }

    /// Returns `true` if a root-relative path matches.
    #[inline]
    #[must_use]
    pub fn is_match(&self, relative: &Utf8Path) -> bool {
        self.matcher.is_match(relative.as_str())
    }

    /// The pattern as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl Default for RoutePattern {
    fn default() -> Self {
        #[allow(clippy::expect_used)] // constant pattern, covered by tests
        Self::new(DEFAULT_PATTERN).expect("default route pattern compiles")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_root_and_nested() {
        let pattern = RoutePattern::default();
        assert!(pattern.is_match(Utf8Path::new("about.svelte")));
        assert!(pattern.is_match(Utf8Path::new("a/b/c.svelte")));
        assert!(!pattern.is_match(Utf8Path::new("about.svelte.bak")));
        assert_eq!(pattern.as_str(), DEFAULT_PATTERN);
    }

    #[test]
    fn test_single_star_stays_in_directory() {
        let pattern = RoutePattern::new("*.svelte").unwrap();
        assert!(pattern.is_match(Utf8Path::new("index.svelte")));
        assert!(!pattern.is_match(Utf8Path::new("blog/index.svelte")));
    }

    #[test]
    fn test_alternation() {
        let pattern = RoutePattern::new("**/*.{svelte,md}").unwrap();
        assert!(pattern.is_match(Utf8Path::new("docs/intro.md")));
        assert!(pattern.is_match(Utf8Path::new("index.svelte")));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = RoutePattern::new("**/*.{svelte").unwrap_err();
        assert!(matches!(err, ScanError::Pattern { .. }));
    }
}
