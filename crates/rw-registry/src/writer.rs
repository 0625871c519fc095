//! Route registry code generation.
//!
//! The registry is application source, not data: each route's module is
//! referenced through a lazy `() => import(...)` thunk so the bundler keeps
//! one code-split chunk per route.
//!
//! ```text
//! // Generated by redwork. Do not edit.
//! export const routes = [
//!   { method: "get", path: "/", route: () => import("../../routes/index.svelte") },
//! ];
//! ```

use std::fmt::Write as _;

use camino::{Utf8Path, Utf8PathBuf};
use rw_core::RouteDescriptor;
use tracing::{debug, info};

use crate::error::RegistryError;
use crate::fs::{import_specifier, write_atomic};

/// First line of every generated registry.
pub const REGISTRY_HEADER: &str = "// Generated by redwork. Do not edit.";

/// Opening line of the exported route array.
pub const ROUTES_OPEN: &str = "export const routes = [";

/// Closing line of the exported route array.
pub const ROUTES_CLOSE: &str = "];";

/// Generates the route registry module.
///
/// Import paths are computed from each route's file, resolved against the
/// route directory (or an override), relative to the directory the
/// registry is written into.
#[derive(Debug, Clone)]
pub struct RegistryWriter {
    route_dir: Utf8PathBuf,
}

impl RegistryWriter {
    /// Creates a writer resolving route files against `route_dir`.
    #[must_use]
    pub fn new(route_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            route_dir: route_dir.into(),
        }
    }

    /// The directory route files are resolved against by default.
    #[must_use]
    pub fn route_dir(&self) -> &Utf8Path {
        &self.route_dir
    }

    /// Renders the registry source for `output`, without writing it.
    ///
    /// `location_override` replaces the route directory as the base that
    /// each route's `file` is resolved against. Used after reconciliation,
    /// when files point into the build output instead of the sources.
    pub fn render(
        &self,
        routes: &[RouteDescriptor],
        output: &Utf8Path,
        location_override: Option<&Utf8Path>,
    ) -> Result<String, RegistryError> {
        let base = location_override.unwrap_or(&self.route_dir);
        let output_dir = output.parent().unwrap_or_else(|| Utf8Path::new("."));

        let mut source = String::with_capacity(64 + routes.len() * 96);
        source.push_str(REGISTRY_HEADER);
        source.push('\n');
        source.push_str(ROUTES_OPEN);
        source.push('\n');

        for route in routes {
            let import = import_specifier(output_dir, &base.join(&route.file))?;
            debug!(route = %route.path, file = %route.file, import = %import, "Registry entry");
            let _ = writeln!(
                source,
                "  {{ method: {}, path: {}, route: () => import({}) }},",
                js_string(route.method.as_str()),
                js_string(route.path.as_str()),
                js_string(&import),
            );
        }

        source.push_str(ROUTES_CLOSE);
        source.push('\n');
        Ok(source)
    }

    /// Renders and atomically writes the registry to `output`.
    pub fn write(
        &self,
        routes: &[RouteDescriptor],
        output: &Utf8Path,
        location_override: Option<&Utf8Path>,
    ) -> Result<(), RegistryError> {
        let source = self.render(routes, output, location_override)?;
        write_atomic(output, &source)?;
        info!(count = routes.len(), output = %output, "Wrote route registry");
        Ok(())
    }
}

/// Quotes a string as a JSON literal, which is also a valid JS literal.
fn js_string(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rw_core::{Method, RoutePath};

    fn route(file: &str, path: &str, method: Method) -> RouteDescriptor {
        RouteDescriptor::new(file, RoutePath::new(path).unwrap(), method)
    }

    fn routes() -> Vec<RouteDescriptor> {
        vec![
            route("index.svelte", "/", Method::Get),
            route("blog/index.svelte", "/blog", Method::Get),
            route("users/$id.svelte", "/users/:id", Method::Get),
            route("api/contact.svelte", "/api/contact", Method::Post),
        ]
    }

    #[test]
    fn test_render_snapshot() {
        let writer = RegistryWriter::new("/app/routes");
        let source = writer
            .render(&routes(), Utf8Path::new("/app/.redwork/generated/routes.ts"), None)
            .unwrap();

        insta::assert_snapshot!(source, @r#"
        // Generated by redwork. Do not edit.
        export const routes = [
          { method: "get", path: "/", route: () => import("../../routes/index.svelte") },
          { method: "get", path: "/blog", route: () => import("../../routes/blog/index.svelte") },
          { method: "get", path: "/users/:id", route: () => import("../../routes/users/$id.svelte") },
          { method: "post", path: "/api/contact", route: () => import("../../routes/api/contact.svelte") },
        ];
        "#);
    }

    #[test]
    fn test_render_with_location_override() {
        let writer = RegistryWriter::new("/app/routes");
        let reconciled = vec![route("assets/index-4f2a.js", "/", Method::Get)];
        let source = writer
            .render(
                &reconciled,
                Utf8Path::new("/app/.redwork/dist/ssr/routes.js"),
                Some(Utf8Path::new("/app/.redwork/dist/ssr")),
            )
            .unwrap();
        assert!(source.contains(r#"route: () => import("./assets/index-4f2a.js")"#));
    }

    #[test]
    fn test_render_empty_list() {
        let writer = RegistryWriter::new("/app/routes");
        let source = writer
            .render(&[], Utf8Path::new("/app/routes.ts"), None)
            .unwrap();
        assert_eq!(
            source,
            format!("{REGISTRY_HEADER}\n{ROUTES_OPEN}\n{ROUTES_CLOSE}\n")
        );
    }

    #[test]
    fn test_render_escapes_quotes() {
        let writer = RegistryWriter::new("/app/routes");
        let source = writer
            .render(
                &[route("say\"hi\".svelte", "/say\"hi\"", Method::Get)],
                Utf8Path::new("/app/routes.ts"),
                None,
            )
            .unwrap();
        assert!(source.contains(r#"path: "/say\"hi\"""#));
    }

    #[test]
    fn test_write_creates_registry_file() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        let output = root.join("generated/routes.ts");

        RegistryWriter::new(root.join("routes"))
            .write(&routes(), &output, None)
            .unwrap();

        let written = std::fs::read_to_string(&output).unwrap();
        assert!(written.starts_with(REGISTRY_HEADER));
        assert_eq!(written.matches("import(").count(), 4);
    }
}
