//! URL path templates and route descriptors.

use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use super::method::Method;

/// Why a string was rejected as a [`RoutePath`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoutePathError {
    /// The path is the empty string.
    #[error("route path is empty")]
    Empty,

    /// The path does not begin with `/`.
    #[error("route path '{0}' does not start with '/'")]
    MissingLeadingSlash(String),
}

/// A URL path template such as `/users/:id`.
///
/// Always non-empty and always starts with `/`. Segments prefixed with `:`
/// are parameters matching exactly one request segment.
///
/// # Examples
///
/// ```
/// use rw_core::RoutePath;
///
/// let path = RoutePath::new("/users/:id").unwrap();
/// assert_eq!(path.segments().collect::<Vec<_>>(), ["users", ":id"]);
/// assert!(RoutePath::new("users").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoutePath(String);

impl RoutePath {
    /// Validates and wraps a path template.
    pub fn new(path: impl Into<String>) -> Result<Self, RoutePathError> {
        let path = path.into();
        if path.is_empty() {
            return Err(RoutePathError::Empty);
        }
        if !path.starts_with('/') {
            return Err(RoutePathError::MissingLeadingSlash(path));
        }
        Ok(Self(path))
    }

    /// The root path `/`.
    #[must_use]
    pub fn root() -> Self {
        Self("/".to_owned())
    }

    /// The template as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for `/`.
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Non-empty segments between slashes.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|segment| !segment.is_empty())
    }

    /// Names of the `:param` segments, without the marker.
    pub fn params(&self) -> impl Iterator<Item = &str> {
        self.segments().filter_map(|segment| segment.strip_prefix(':'))
    }
}

impl fmt::Display for RoutePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RoutePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RoutePath {
    type Error = RoutePathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for RoutePath {
    type Error = RoutePathError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoutePath> for String {
    fn from(path: RoutePath) -> Self {
        path.0
    }
}

/// One servable page: file reference, URL template, and HTTP method.
///
/// `file` is relative to the route directory when produced by a scan. After
/// manifest reconciliation it is the bundler's output path instead.
///
/// # Examples
///
/// ```
/// use rw_core::{Method, RouteDescriptor, RoutePath};
///
/// let route = RouteDescriptor::new("blog/index.svelte", RoutePath::new("/blog").unwrap(), Method::Get);
/// assert_eq!(route.file, "blog/index.svelte");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteDescriptor {
    /// Route file, relative to the route directory or the build output.
    pub file: Utf8PathBuf,

    /// URL path template.
    pub path: RoutePath,

    /// HTTP method the route answers.
    pub method: Method,
}

impl RouteDescriptor {
    /// Creates a descriptor.
    #[must_use]
    pub fn new(file: impl Into<Utf8PathBuf>, path: RoutePath, method: Method) -> Self {
        Self {
            file: file.into(),
            path,
            method,
        }
    }

    /// A copy of this descriptor pointing at a different file.
    #[must_use]
    pub fn with_file(&self, file: impl Into<Utf8PathBuf>) -> Self {
        Self {
            file: file.into(),
            path: self.path.clone(),
            method: self.method,
        }
    }

    /// The file reference as a path.
    #[inline]
    #[must_use]
    pub fn file(&self) -> &Utf8Path {
        &self.file
    }
}
