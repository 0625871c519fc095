//! Configuration structures for redwork.
//!
//! This module provides configuration types for every stage of the pipeline:
//!
//! - [`RoutesConfig`] - Route directory, file pattern, component extension
//! - [`WatchConfig`] - File watcher settings (debouncing, recursion)
//! - [`BuildConfig`] - Generated/dist directories and static generation
//! - [`RuntimeConfig`] - JavaScript runtime used for SSR calls
//! - [`Config`] - Root configuration combining all settings
//!
//! Configuration is read from `redwork.json`; every section defaults, so a
//! partial file is valid.

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default name of the configuration file, looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "redwork.json";

/// Where route files live and how they are recognised.
///
/// # Examples
///
/// ```
/// use rw_core::RoutesConfig;
///
/// let config = RoutesConfig::default();
/// assert_eq!(config.pattern, "**/*.svelte");
/// assert_eq!(config.extension, ".svelte");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutesConfig {
    /// Directory containing route files.
    pub dir: Utf8PathBuf,

    /// Glob selecting route files, relative to [`dir`](Self::dir).
    pub pattern: String,

    /// UI component extension stripped by the default path rule.
    pub extension: String,

    /// Directory names never descended into.
    pub skip_dirs: Vec<String>,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            dir: Utf8PathBuf::from("./routes"),
            pattern: "**/*.svelte".to_owned(),
            extension: ".svelte".to_owned(),
            skip_dirs: vec!["node_modules".to_owned()],
        }
    }
}

/// Configuration for the route watcher.
///
/// # Examples
///
/// ```
/// use rw_core::WatchConfig;
///
/// let config = WatchConfig::default();
/// assert_eq!(config.debounce_ms, 100);
/// assert!(config.recursive);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Debounce window in milliseconds.
    ///
    /// File events within this window are delivered as one batch and cause
    /// at most one rescan.
    pub debounce_ms: u64,

    /// Whether to watch subdirectories recursively.
    pub recursive: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 100,
            recursive: true,
        }
    }
}

impl WatchConfig {
    /// The debounce window as a [`Duration`].
    #[inline]
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Build output layout and static generation settings.
///
/// All output paths are derived from [`root_dir`](Self::root_dir):
///
/// ```text
/// <root_dir>/generated/routes.ts          registry
/// <root_dir>/generated/client/            client entry + template
/// <root_dir>/generated/server/            server entry
/// <root_dir>/dist/client/index.html       built template
/// <root_dir>/dist/ssr/entry-server.js     built SSR entry
/// <root_dir>/dist/ssr/.vite/ssr-manifest.json
/// <root_dir>/dist/ssg/                    prerendered pages
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Working directory for generated sources and build output.
    pub root_dir: Utf8PathBuf,

    /// Global static generation default; a route's `ssg` export overrides it.
    pub ssg: bool,

    /// Timeout for a single SSR render call in milliseconds. `0` disables it.
    pub render_timeout_ms: u64,

    /// Fail the build when a route has no entry in the build manifest.
    pub strict_manifest: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            root_dir: Utf8PathBuf::from("./.redwork"),
            ssg: true,
            render_timeout_ms: 30_000,
            strict_manifest: true,
        }
    }
}

impl BuildConfig {
    /// Directory holding generated sources.
    #[must_use]
    pub fn generated_dir(&self) -> Utf8PathBuf {
        self.root_dir.join("generated")
    }

    /// Directory holding bundler output.
    #[must_use]
    pub fn dist_dir(&self) -> Utf8PathBuf {
        self.root_dir.join("dist")
    }

    /// Location of the generated route registry.
    #[must_use]
    pub fn registry_path(&self) -> Utf8PathBuf {
        self.generated_dir().join("routes.ts")
    }

    /// Directory of the bundled server output.
    #[must_use]
    pub fn ssr_dir(&self) -> Utf8PathBuf {
        self.dist_dir().join("ssr")
    }

    /// The built client HTML template passed to every render call.
    #[must_use]
    pub fn client_template(&self) -> Utf8PathBuf {
        self.dist_dir().join("client").join("index.html")
    }

    /// The built server entry exposing `render(path, template)`.
    #[must_use]
    pub fn server_entry(&self) -> Utf8PathBuf {
        self.ssr_dir().join("entry-server.js")
    }

    /// The bundler's output manifest for the server build.
    #[must_use]
    pub fn ssr_manifest(&self) -> Utf8PathBuf {
        self.ssr_dir().join(".vite").join("ssr-manifest.json")
    }

    /// Final directory for prerendered pages.
    #[must_use]
    pub fn ssg_dir(&self) -> Utf8PathBuf {
        self.dist_dir().join("ssg")
    }

    /// Render timeout, or `None` when disabled.
    #[must_use]
    pub const fn render_timeout(&self) -> Option<Duration> {
        if self.render_timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.render_timeout_ms))
        }
    }
}

/// The JavaScript runtime used to call into bundled modules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Program used to evaluate module scripts (`node`, `bun`, ...).
    pub program: String,

    /// Module specifier the scaffolded entries import `getRoute` from.
    pub router_module: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            program: "node".to_owned(),
            router_module: "redwork/router".to_owned(),
        }
    }
}

/// Root configuration for redwork.
///
/// # Examples
///
/// ```
/// use rw_core::Config;
///
/// let config: Config = serde_json::from_str(r#"{"routes": {"dir": "./src"}}"#).unwrap();
/// assert_eq!(config.routes.dir, "./src");
/// assert!(config.build.ssg);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Route discovery settings.
    pub routes: RoutesConfig,

    /// File watcher configuration.
    pub watch: WatchConfig,

    /// Build and static generation settings.
    pub build: BuildConfig,

    /// JavaScript runtime settings.
    pub runtime: RuntimeConfig,
}

impl Config {
    /// Reads and validates a configuration file.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `path` if it exists, otherwise returns the defaults.
    pub fn load_or_default(path: &Utf8Path) -> Result<Self, ConfigError> {
        if path.is_file() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Checks option values that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.routes.pattern.trim().is_empty() {
            return Err(ConfigError::invalid_option(
                "routes.pattern",
                "must not be empty",
            ));
        }
        if !self.routes.extension.starts_with('.') || self.routes.extension.len() < 2 {
            return Err(ConfigError::invalid_option(
                "routes.extension",
                format!("expected a leading dot, got '{}'", self.routes.extension),
            ));
        }
        if self.watch.debounce_ms == 0 {
            return Err(ConfigError::invalid_option(
                "watch.debounce_ms",
                "must be positive",
            ));
        }
        if self.runtime.program.trim().is_empty() {
            return Err(ConfigError::invalid_option(
                "runtime.program",
                "must not be empty",
            ));
        }
        Ok(())
    }

    /// Checks that the route directory exists.
    pub fn require_route_dir(&self) -> Result<(), ConfigError> {
        if self.routes.dir.is_dir() {
            Ok(())
        } else {
            Err(ConfigError::MissingDirectory(self.routes.dir.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes_config_defaults() {
        let config = RoutesConfig::default();
        assert_eq!(config.dir, "./routes");
        assert_eq!(config.pattern, "**/*.svelte");
        assert_eq!(config.extension, ".svelte");
    }

    #[test]
    fn test_build_config_paths() {
        let config = BuildConfig::default();
        assert_eq!(config.registry_path(), "./.redwork/generated/routes.ts");
        assert_eq!(config.server_entry(), "./.redwork/dist/ssr/entry-server.js");
        assert_eq!(config.client_template(), "./.redwork/dist/client/index.html");
        assert_eq!(
            config.ssr_manifest(),
            "./.redwork/dist/ssr/.vite/ssr-manifest.json"
        );
        assert_eq!(config.ssg_dir(), "./.redwork/dist/ssg");
    }

    #[test]
    fn test_render_timeout_disabled_at_zero() {
        let mut config = BuildConfig::default();
        assert_eq!(config.render_timeout(), Some(Duration::from_secs(30)));
        config.render_timeout_ms = 0;
        assert_eq!(config.render_timeout(), None);
    }

    #[test]
    fn test_config_deserialize_with_missing_fields() {
        let json = r#"{"build": {"ssg": false}, "watch": {"debounce_ms": 250}}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(!config.build.ssg);
        assert_eq!(config.watch.debounce_ms, 250);
        assert_eq!(config.routes.pattern, "**/*.svelte");
        assert_eq!(config.runtime.program, "node");
    }

    #[test]
    fn test_validate_rejects_bad_extension() {
        let mut config = Config::default();
        config.routes.extension = "svelte".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("routes.extension"));
    }

    #[test]
    fn test_validate_rejects_zero_debounce() {
        let mut config = Config::default();
        config.watch.debounce_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join(CONFIG_FILE_NAME)).unwrap();
        let config = Config::load_or_default(&path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join(CONFIG_FILE_NAME)).unwrap();
        std::fs::write(
            &path,
            r#"{"routes": {"dir": "./src", "pattern": "**/*.vue", "extension": ".vue"}}"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.routes.dir, "./src");
        assert_eq!(config.routes.extension, ".vue");
    }

    #[test]
    fn test_require_route_dir() {
        let mut config = Config::default();
        config.routes.dir = Utf8PathBuf::from("/definitely/not/here");
        assert!(matches!(
            config.require_route_dir(),
            Err(ConfigError::MissingDirectory(_))
        ));
    }
}
