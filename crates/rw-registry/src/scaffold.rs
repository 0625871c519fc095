//! Client and server entry scaffolding.
//!
//! The entries are the bundler's inputs: both import the generated
//! registry and resolve the current path through the router module's
//! `getRoute`, then call the matched entry's lazy `route()` loader.
//!
//! ```text
//! <generated>/
//! ├── routes.ts
//! ├── client/
//! │   ├── index.html
//! │   └── entry-client.ts
//! └── server/
//!     └── entry-server.ts
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use tracing::info;

use crate::error::RegistryError;
use crate::fs::{import_specifier, write_atomic};

/// HTML shell the client bundle is injected into and the server renderer
/// fills in.
pub const TEMPLATE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
	<head>
		<meta charset="UTF-8" />
		<meta name="viewport" content="width=device-width, initial-scale=1.0" />
	</head>
	<body>
		<div id="root"></div>
		<script type="module" src="./entry-client.ts"></script>
	</body>
</html>
"#;

/// Paths written by [`Scaffold::write`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldFiles {
    /// `client/index.html`
    pub template: Utf8PathBuf,
    /// `client/entry-client.ts`
    pub client_entry: Utf8PathBuf,
    /// `server/entry-server.ts`
    pub server_entry: Utf8PathBuf,
}

/// Writes the entry files under a generated directory.
#[derive(Debug, Clone)]
pub struct Scaffold {
    generated_dir: Utf8PathBuf,
    registry: Utf8PathBuf,
    router_module: String,
}

impl Scaffold {
    /// Scaffold for `generated_dir`, importing `getRoute` from
    /// `router_module` and the registry at `<generated_dir>/routes.ts`.
    #[must_use]
    pub fn new(generated_dir: impl Into<Utf8PathBuf>, router_module: impl Into<String>) -> Self {
        let generated_dir = generated_dir.into();
        Self {
            registry: generated_dir.join("routes.ts"),
            generated_dir,
            router_module: router_module.into(),
        }
    }

    /// Points the entries at a registry in a different location.
    #[must_use]
    pub fn with_registry(mut self, registry: impl Into<Utf8PathBuf>) -> Self {
        self.registry = registry.into();
        self
    }

    /// Where each file goes.
    #[must_use]
    pub fn files(&self) -> ScaffoldFiles {
        let client = self.generated_dir.join("client");
        ScaffoldFiles {
            template: client.join("index.html"),
            client_entry: client.join("entry-client.ts"),
            server_entry: self.generated_dir.join("server").join("entry-server.ts"),
        }
    }

    /// Renders the client entry source.
    pub fn client_entry_source(&self) -> Result<String, RegistryError> {
        let files = self.files();
        let registry = self.registry_import(&files.client_entry)?;
        Ok(format!(
            r"import {{ hydrate }} from 'svelte';
import {{ getRoute }} from '{router}';
// @ts-ignore
import {{ routes }} from '{registry}';

getRoute(window.location.pathname, routes)
	?.data.route()
	.then((module) => {{
		hydrate(module.default, {{
			target: document.getElementById('root')!,
		}});
	}});
",
            router = self.router_module,
        ))
    }

    /// Renders the server entry source.
    ///
    /// The default export has the render contract
    /// `(path, template) => Promise<404 | string>`.
    pub fn server_entry_source(&self) -> Result<String, RegistryError> {
        let files = self.files();
        let registry = self.registry_import(&files.server_entry)?;
        Ok(format!(
            r#"import {{ render }} from 'svelte/server';
import {{ getRoute }} from '{router}';
// @ts-ignore
import {{ routes }} from '{registry}';

export default async function (
	path: string,
	template: string,
): Promise<404 | string> {{
	const route = getRoute(path, routes);

	if (!route) return 404;

	const {{ body, head }} = render((await route.data.route()).default);

	return template
		.replace('</head>', `${{head}}</head>`)
		.replace('<div id="root"></div>', `<div id="root">${{body}}</div>`);
}}
"#,
            router = self.router_module,
        ))
    }

    /// Atomically writes all three files.
    pub fn write(&self) -> Result<ScaffoldFiles, RegistryError> {
        let files = self.files();
        write_atomic(&files.template, TEMPLATE_HTML)?;
        write_atomic(&files.client_entry, &self.client_entry_source()?)?;
        write_atomic(&files.server_entry, &self.server_entry_source()?)?;
        info!(dir = %self.generated_dir, "Wrote entry scaffold");
        Ok(files)
    }

    fn registry_import(&self, entry: &Utf8Path) -> Result<String, RegistryError> {
        let dir = entry.parent().unwrap_or_else(|| Utf8Path::new("."));
        import_specifier(dir, &self.registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_files_layout() {
        let files = Scaffold::new("/app/.redwork/generated", "redwork/router").files();
        assert_eq!(files.template, "/app/.redwork/generated/client/index.html");
        assert_eq!(files.client_entry, "/app/.redwork/generated/client/entry-client.ts");
        assert_eq!(files.server_entry, "/app/.redwork/generated/server/entry-server.ts");
    }

    #[test]
    fn test_entries_import_registry_and_router() {
        let scaffold = Scaffold::new("/app/gen", "@acme/router");
        let client = scaffold.client_entry_source().unwrap();
        let server = scaffold.server_entry_source().unwrap();

        for source in [&client, &server] {
            assert!(source.contains("import { getRoute } from '@acme/router';"));
            assert!(source.contains("import { routes } from '../routes.ts';"));
            assert!(source.contains("route.data.route()") || source.contains("?.data.route()"));
        }
        assert!(server.contains("if (!route) return 404;"));
        assert!(server.contains(r#"<div id="root">${body}</div>"#));
    }

    #[test]
    fn test_custom_registry_location() {
        let scaffold =
            Scaffold::new("/app/gen", "redwork/router").with_registry("/app/src/routes.gen.ts");
        let client = scaffold.client_entry_source().unwrap();
        assert!(client.contains("from '../../src/routes.gen.ts';"));
    }

    #[test]
    fn test_write_all_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();

        let files = Scaffold::new(root.join("generated"), "redwork/router")
            .write()
            .unwrap();

        assert_eq!(std::fs::read_to_string(&files.template).unwrap(), TEMPLATE_HTML);
        assert!(files.client_entry.exists());
        assert!(files.server_entry.exists());
    }
}
