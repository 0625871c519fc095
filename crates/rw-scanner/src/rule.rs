//! Path rules: deriving a route's URL path and method from its file name.
//!
//! A [`PathRule`] is an opaque capability. The scanner never interprets its
//! output beyond validating the shape, so projects can swap in any mapping
//! they like, including plain closures:
//!
//! ```
//! use rw_core::Method;
//! use rw_scanner::{PathRule, RouteSpec};
//!
//! let api_rule = |file: &str| RouteSpec::new(
//!     format!("/api/{}", file.trim_end_matches(".svelte")),
//!     Method::Post,
//! );
//! assert_eq!(api_rule.apply("users.svelte").path, "/api/users");
//! ```

use rw_core::Method;

/// Output of a [`PathRule`], not yet validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSpec {
    /// URL path template. Must start with `/` to pass validation.
    pub path: String,
    /// HTTP method.
    pub method: Method,
}

impl RouteSpec {
    /// Creates a route spec.
    #[must_use]
    pub fn new(path: impl Into<String>, method: Method) -> Self {
        Self {
            path: path.into(),
            method,
        }
    }

    /// A `GET` route spec.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(path, Method::Get)
    }
}

/// Maps a route file path (relative to the route directory) to a route.
pub trait PathRule: Send + Sync + 'static {
    /// Derives the URL path and method for `file`.
    ///
    /// `file` may use either `/` or `\` as separator.
    fn apply(&self, file: &str) -> RouteSpec;
}

impl<F> PathRule for F
where
    F: Fn(&str) -> RouteSpec + Send + Sync + 'static,
{
    fn apply(&self, file: &str) -> RouteSpec {
        self(file)
    }
}

/// The built-in rule: file-system path becomes URL path, method is `GET`.
///
/// Applied in order:
///
/// 1. `\` becomes `/`
/// 2. the component extension (and a `/` right before it) is stripped
/// 3. the first `$` becomes `:` (only the first)
/// 4. a trailing `index` segment is stripped
/// 5. trailing `/` are stripped
/// 6. the result is prefixed with `/`
///
/// # Examples
///
/// ```
/// use rw_scanner::{DefaultPathRule, PathRule};
///
/// let rule = DefaultPathRule::default();
/// assert_eq!(rule.apply("index.svelte").path, "/");
/// assert_eq!(rule.apply("users/$id.svelte").path, "/users/:id");
/// assert_eq!(rule.apply("blog\\index.svelte").path, "/blog");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultPathRule {
    extension: String,
}

impl DefaultPathRule {
    /// Creates the rule for a component extension such as `.svelte`.
    #[must_use]
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
        }
    }

    /// The component extension this rule strips.
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }
}

impl Default for DefaultPathRule {
    fn default() -> Self {
        Self::new(".svelte")
    }
}

impl PathRule for DefaultPathRule {
    fn apply(&self, file: &str) -> RouteSpec {
        let normalized = file.replace('\\', "/");

        let mut stem = normalized.as_str();
        if let Some(stripped) = stem.strip_suffix(self.extension.as_str()) {
            stem = stripped.strip_suffix('/').unwrap_or(stripped);
        }

        let dynamic = stem.replacen('$', ":", 1);

        let mut trimmed = dynamic.as_str();
        if trimmed == "index" || trimmed.ends_with("/index") {
            trimmed = &trimmed[..trimmed.len() - "index".len()];
        }
        let trimmed = trimmed.trim_end_matches('/');

        RouteSpec::get(format!("/{trimmed}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_of(file: &str) -> String {
        DefaultPathRule::default().apply(file).path
    }

    #[test]
    fn test_root_index() {
        assert_eq!(
            DefaultPathRule::default().apply("index.svelte"),
            RouteSpec::get("/")
        );
    }

    #[test]
    fn test_dynamic_segment() {
        assert_eq!(
            DefaultPathRule::default().apply("users/$id.svelte"),
            RouteSpec::get("/users/:id")
        );
    }

    #[test]
    fn test_nested_index() {
        assert_eq!(
            DefaultPathRule::default().apply("blog/index.svelte"),
            RouteSpec::get("/blog")
        );
    }

    #[test]
    fn test_only_first_dollar_is_converted() {
        assert_eq!(path_of("$org/$repo.svelte"), "/:org/$repo");
    }

    #[test]
    fn test_backslashes_are_normalized() {
        assert_eq!(path_of("docs\\guide\\intro.svelte"), "/docs/guide/intro");
        assert_eq!(path_of("docs\\index.svelte"), "/docs");
    }

    #[test]
    fn test_index_must_be_whole_segment() {
        assert_eq!(path_of("reindex.svelte"), "/reindex");
        assert_eq!(path_of("index/about.svelte"), "/index/about");
    }

    #[test]
    fn test_custom_extension() {
        let rule = DefaultPathRule::new(".vue");
        assert_eq!(rule.apply("about.vue").path, "/about");
        assert_eq!(rule.apply("about.svelte").path, "/about.svelte");
        assert_eq!(rule.extension(), ".vue");
    }

    #[test]
    fn test_paths_start_with_slash_and_have_no_trailing_slash() {
        let files = [
            "index.svelte",
            "a.svelte",
            "a/b/c.svelte",
            "a/index.svelte",
            "a//index.svelte",
            "a/.svelte",
            "$slug.svelte",
            "x\\y\\index.svelte",
            "",
        ];
        for file in files {
            let path = path_of(file);
            assert!(path.starts_with('/'), "{file} -> {path}");
            assert!(path == "/" || !path.ends_with('/'), "{file} -> {path}");
        }
    }

    #[test]
    fn test_closure_rule() {
        let rule = |file: &str| RouteSpec::new(file.to_uppercase(), Method::Head);
        let spec = rule.apply("a.svelte");
        assert_eq!(spec.path, "A.SVELTE");
        assert_eq!(spec.method, Method::Head);
    }
}
