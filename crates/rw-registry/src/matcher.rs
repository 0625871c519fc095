//! Runtime route lookup.
//!
//! [`RouteTable`] is a segment trie built once from a route list. Template
//! segments are one of:
//!
//! - a static segment, matched exactly (case-sensitive)
//! - `:name` or `*`, matching exactly one request segment
//! - `**` or `**:name` as the last segment, matching the rest of the path
//!   (zero or more segments)
//!
//! At each level static children are tried first, then parameters, then a
//! catch-all. When several routes share a template and method, the first
//! one registered wins.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHasher;
use rw_core::{FxHashMap, Method, RouteDescriptor, RoutePath};
use smallvec::SmallVec;

use crate::reader::RegistryEntry;

/// Captured parameters, in template order.
pub type Params = SmallVec<[(String, String); 4]>;

/// A successful lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<T> {
    /// Payload registered with the route.
    pub value: T,
    /// Template that matched.
    pub template: RoutePath,
    /// Method the route was registered under.
    pub method: Method,
    /// Parameter name/value pairs.
    pub params: Params,
}

impl<T> RouteMatch<T> {
    /// Value of the parameter `name`.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone)]
struct Leaf<T> {
    method: Method,
    template: RoutePath,
    param_names: SmallVec<[String; 4]>,
    value: T,
}

#[derive(Debug, Clone)]
struct Node<T> {
    statics: FxHashMap<String, Node<T>>,
    param: Option<Box<Node<T>>>,
    catch_all: Vec<Leaf<T>>,
    leaves: Vec<Leaf<T>>,
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Self {
            statics: FxHashMap::default(),
            param: None,
            catch_all: Vec::new(),
            leaves: Vec::new(),
        }
    }
}

enum Segment<'a> {
    Static(&'a str),
    Param(Option<&'a str>),
    CatchAll(Option<&'a str>),
}

fn classify(segment: &str) -> Segment<'_> {
    if segment == "**" {
        Segment::CatchAll(None)
    } else if let Some(name) = segment.strip_prefix("**:") {
        Segment::CatchAll(Some(name))
    } else if segment == "*" {
        Segment::Param(None)
    } else if let Some(name) = segment.strip_prefix(':') {
        Segment::Param(Some(name))
    } else {
        Segment::Static(segment)
    }
}

/// Route lookup table.
///
/// # Examples
///
/// ```
/// use rw_core::{Method, RoutePath};
/// use rw_registry::RouteTable;
///
/// let table = RouteTable::new([
///     (Method::Get, RoutePath::new("/users/:id").unwrap(), "user"),
///     (Method::Get, RoutePath::new("/users/me").unwrap(), "me"),
/// ]);
///
/// assert_eq!(table.find(Method::Get, "/users/me").unwrap().value, "me");
/// let hit = table.find(Method::Get, "/users/42").unwrap();
/// assert_eq!(hit.param("id"), Some("42"));
/// assert!(table.find(Method::Post, "/users/42").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct RouteTable<T> {
    root: Node<T>,
    len: usize,
}

impl<T> Default for RouteTable<T> {
    fn default() -> Self {
        Self {
            root: Node::default(),
            len: 0,
        }
    }
}

impl<T: Clone> RouteTable<T> {
    /// Builds a table from `(method, template, payload)` triples, in order.
    pub fn new(routes: impl IntoIterator<Item = (Method, RoutePath, T)>) -> Self {
        let mut table = Self::default();
        for (method, template, value) in routes {
            table.insert(method, template, value);
        }
        table
    }

    /// Registers a route after all previously registered ones.
    pub fn insert(&mut self, method: Method, template: RoutePath, value: T) {
        let mut node = &mut self.root;
        let mut param_names = SmallVec::new();
        let mut catch_all = false;
        let mut unnamed = 0usize;

        let segments: Vec<&str> = template.segments().collect();
        for (index, &segment) in segments.iter().enumerate() {
            match classify(segment) {
                Segment::Static(name) => {
                    node = node.statics.entry(name.to_owned()).or_default();
                }
                Segment::Param(name) => {
                    param_names.push(name.map_or_else(
                        || {
                            unnamed += 1;
                            format!("_{}", unnamed - 1)
                        },
                        str::to_owned,
                    ));
                    node = &mut **node.param.get_or_insert_with(Box::default);
                }
                Segment::CatchAll(name) if index + 1 == segments.len() => {
                    param_names.push(name.unwrap_or("_").to_owned());
                    catch_all = true;
                }
                // `**` in the middle of a template is literal.
                Segment::CatchAll(_) => {
                    node = node.statics.entry(segment.to_owned()).or_default();
                }
            }
        }

        let leaf = Leaf {
            method,
            template,
            param_names,
            value,
        };
        if catch_all {
            node.catch_all.push(leaf);
        } else {
            node.leaves.push(leaf);
        }
        self.len += 1;
    }

    /// Looks up `path` among routes registered under `method`.
    ///
    /// Query strings and fragments are ignored; empty segments are skipped,
    /// so `/blog/` matches `/blog`.
    #[must_use]
    pub fn find(&self, method: Method, path: &str) -> Option<RouteMatch<T>> {
        self.lookup(path, |leaves| leaves.iter().find(|leaf| leaf.method == method))
    }

    /// Looks up `path` regardless of method.
    #[must_use]
    pub fn find_any(&self, path: &str) -> Option<RouteMatch<T>> {
        self.lookup(path, |leaves| leaves.first())
    }

    /// Number of registered routes, duplicates included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` when no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn lookup<'t, F>(&'t self, path: &str, select: F) -> Option<RouteMatch<T>>
    where
        F: Fn(&'t [Leaf<T>]) -> Option<&'t Leaf<T>>,
    {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut captures = Vec::new();

        let leaf = walk(&self.root, &segments, &mut captures, &select)?;
        Some(RouteMatch {
            value: leaf.value.clone(),
            template: leaf.template.clone(),
            method: leaf.method,
            params: leaf.param_names.iter().cloned().zip(captures).collect(),
        })
    }
}

fn walk<'t, T, F>(
    node: &'t Node<T>,
    segments: &[&str],
    captures: &mut Vec<String>,
    select: &F,
) -> Option<&'t Leaf<T>>
where
    F: Fn(&'t [Leaf<T>]) -> Option<&'t Leaf<T>>,
{
    let Some((head, rest)) = segments.split_first() else {
        if let Some(leaf) = select(node.leaves.as_slice()) {
            return Some(leaf);
        }
        let leaf = select(node.catch_all.as_slice())?;
        captures.push(String::new());
        return Some(leaf);
    };

    if let Some(child) = node.statics.get(*head) {
        if let Some(leaf) = walk(child, rest, captures, select) {
            return Some(leaf);
        }
    }

    if let Some(child) = &node.param {
        captures.push((*head).to_owned());
        if let Some(leaf) = walk(child, rest, captures, select) {
            return Some(leaf);
        }
        captures.pop();
    }

    let leaf = select(node.catch_all.as_slice())?;
    captures.push(segments.join("/"));
    Some(leaf)
}

impl RouteTable<String> {
    /// Table over a parsed registry; payloads are import specifiers.
    #[must_use]
    pub fn from_registry(entries: &[RegistryEntry]) -> Self {
        Self::new(
            entries
                .iter()
                .map(|e| (e.method, e.path.clone(), e.import_path.clone())),
        )
    }
}

impl RouteTable<RouteDescriptor> {
    /// Table over scanned routes; payloads are the descriptors.
    #[must_use]
    pub fn from_routes(routes: &[RouteDescriptor]) -> Self {
        Self::new(
            routes
                .iter()
                .map(|route| (route.method, route.path.clone(), route.clone())),
        )
    }
}

/// One-off, method-agnostic lookup of `path` in a registry.
///
/// Builds a throwaway table; prefer [`RouteTableCache`] for repeated
/// lookups against the same registry.
#[must_use]
pub fn match_route(path: &str, entries: &[RegistryEntry]) -> Option<RouteMatch<String>> {
    RouteTable::from_registry(entries).find_any(path)
}

/// A [`RouteTable`] rebuilt only when the registry it was built from
/// changes.
#[derive(Debug, Default)]
pub struct RouteTableCache {
    inner: RwLock<Option<(u64, Arc<RouteTable<String>>)>>,
}

impl RouteTableCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The table for `entries`, reusing the cached one when unchanged.
    pub fn get(&self, entries: &[RegistryEntry]) -> Arc<RouteTable<String>> {
        let fingerprint = fingerprint(entries);

        if let Some((cached, table)) = self.inner.read().as_ref() {
            if *cached == fingerprint {
                return Arc::clone(table);
            }
        }

        let table = Arc::new(RouteTable::from_registry(entries));
        *self.inner.write() = Some((fingerprint, Arc::clone(&table)));
        table
    }

    /// Drops the cached table.
    pub fn invalidate(&self) {
        *self.inner.write() = None;
    }
}

fn fingerprint(entries: &[RegistryEntry]) -> u64 {
    let mut hasher = FxHasher::default();
    entries.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(p: &str) -> RoutePath {
        RoutePath::new(p).unwrap()
    }

    fn entry(method: Method, p: &str, import: &str) -> RegistryEntry {
        RegistryEntry {
            method,
            path: path(p),
            import_path: import.to_owned(),
        }
    }

    #[test]
    fn test_static_beats_param() {
        let table = RouteTable::new([
            (Method::Get, path("/users/:id"), 1),
            (Method::Get, path("/users/new"), 2),
        ]);
        assert_eq!(table.find(Method::Get, "/users/new").unwrap().value, 2);
        assert_eq!(table.find(Method::Get, "/users/7").unwrap().value, 1);
    }

    #[test]
    fn test_param_matches_single_segment() {
        let table = RouteTable::new([(Method::Get, path("/users/:id"), ())]);
        assert!(table.find(Method::Get, "/users").is_none());
        assert!(table.find(Method::Get, "/users/1/posts").is_none());
        let hit = table.find(Method::Get, "/users/1").unwrap();
        assert_eq!(hit.params.as_slice(), [("id".to_owned(), "1".to_owned())]);
    }

    #[test]
    fn test_backtracks_from_static_to_param() {
        let table = RouteTable::new([
            (Method::Get, path("/blog/archive"), "archive"),
            (Method::Get, path("/:section/:slug/edit"), "edit"),
        ]);
        let hit = table.find(Method::Get, "/blog/archive/edit").unwrap();
        assert_eq!(hit.value, "edit");
        assert_eq!(hit.param("section"), Some("blog"));
        assert_eq!(hit.param("slug"), Some("archive"));
    }

    #[test]
    fn test_catch_all() {
        let table = RouteTable::new([
            (Method::Get, path("/docs/**:rest"), "docs"),
            (Method::Get, path("/docs/intro"), "intro"),
        ]);
        assert_eq!(table.find(Method::Get, "/docs/intro").unwrap().value, "intro");
        let hit = table.find(Method::Get, "/docs/a/b/c").unwrap();
        assert_eq!(hit.param("rest"), Some("a/b/c"));
        assert_eq!(table.find(Method::Get, "/docs").unwrap().param("rest"), Some(""));
    }

    #[test]
    fn test_first_registered_wins() {
        let table = RouteTable::new([
            (Method::Get, path("/same"), "first"),
            (Method::Get, path("/same"), "second"),
        ]);
        assert_eq!(table.find(Method::Get, "/same").unwrap().value, "first");
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_method_filtering() {
        let table = RouteTable::new([
            (Method::Post, path("/contact"), "submit"),
            (Method::Get, path("/contact"), "form"),
        ]);
        assert_eq!(table.find(Method::Get, "/contact").unwrap().value, "form");
        assert_eq!(table.find(Method::Post, "/contact").unwrap().value, "submit");
        assert!(table.find(Method::Delete, "/contact").is_none());
        assert_eq!(table.find_any("/contact").unwrap().value, "submit");
    }

    #[test]
    fn test_root_trailing_slash_and_query() {
        let table = RouteTable::new([
            (Method::Get, path("/"), "home"),
            (Method::Get, path("/blog"), "blog"),
        ]);
        assert_eq!(table.find(Method::Get, "/").unwrap().value, "home");
        assert_eq!(table.find(Method::Get, "/blog/").unwrap().value, "blog");
        assert_eq!(table.find(Method::Get, "/blog?page=2#top").unwrap().value, "blog");
        assert!(table.find(Method::Get, "/Blog").is_none());
    }

    #[test]
    fn test_match_route_not_found_is_none() {
        let entries = [entry(Method::Get, "/", "./index.svelte")];
        assert!(match_route("/missing", &entries).is_none());
        assert_eq!(match_route("/", &entries).unwrap().value, "./index.svelte");
    }

    #[test]
    fn test_from_routes() {
        let routes = [RouteDescriptor::new("about.svelte", path("/about"), Method::Get)];
        let table = RouteTable::from_routes(&routes);
        assert_eq!(table.find_any("/about").unwrap().value.file, "about.svelte");
    }

    #[test]
    fn test_cache_reuses_until_entries_change() {
        let cache = RouteTableCache::new();
        let mut entries = vec![entry(Method::Get, "/", "./a")];

        let first = cache.get(&entries);
        let again = cache.get(&entries);
        assert!(Arc::ptr_eq(&first, &again));

        entries.push(entry(Method::Get, "/b", "./b"));
        let rebuilt = cache.get(&entries);
        assert!(!Arc::ptr_eq(&first, &rebuilt));
        assert!(rebuilt.find_any("/b").is_some());

        cache.invalidate();
        assert!(!Arc::ptr_eq(&rebuilt, &cache.get(&entries)));
    }
}
