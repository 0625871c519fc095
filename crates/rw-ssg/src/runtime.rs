//! Rendering through an external JavaScript runtime.
//!
//! Each call spawns `<program> --input-type=module -e <script>` with its
//! inputs in environment variables. The script prints one JSON object on
//! stdout:
//!
//! | call       | reply                                     |
//! |------------|-------------------------------------------|
//! | render     | `{"status":404}` or `{"html":"..."}`      |
//! | ssg flag   | `{"ssg":<exported value or null>}`        |

use std::process::Stdio;

use camino::{Utf8Path, Utf8PathBuf};
use rw_core::RuntimeConfig;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, trace};

use crate::error::SsgError;
use crate::render::{ModuleInspector, RenderOutcome, Renderer};

const ENV_ENTRY: &str = "REDWORK_ENTRY";
const ENV_TEMPLATE: &str = "REDWORK_TEMPLATE";
const ENV_URL: &str = "REDWORK_URL";

const RENDER_SCRIPT: &str = r"
import { pathToFileURL } from 'node:url';
import { readFile } from 'node:fs/promises';
const { default: render } = await import(pathToFileURL(process.env.REDWORK_ENTRY).href);
const template = await readFile(process.env.REDWORK_TEMPLATE, 'utf8');
const result = await render(process.env.REDWORK_URL, template);
process.stdout.write(JSON.stringify(result === 404 ? { status: 404 } : { html: String(result) }));
";

const SSG_FLAG_SCRIPT: &str = r"
import { pathToFileURL } from 'node:url';
const mod = await import(pathToFileURL(process.env.REDWORK_ENTRY).href);
process.stdout.write(JSON.stringify({ ssg: mod.ssg === undefined ? null : mod.ssg }));
";

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RenderReply {
    Html { html: String },
    Status { status: u16 },
}

#[derive(Debug, Deserialize)]
struct SsgFlagReply {
    ssg: serde_json::Value,
}

/// [`Renderer`] and [`ModuleInspector`] backed by a JS runtime process.
#[derive(Debug, Clone)]
pub struct NodeRuntime {
    program: String,
    cwd: Option<Utf8PathBuf>,
}

impl NodeRuntime {
    /// Uses `program` (e.g. `node`) from `PATH`.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            cwd: None,
        }
    }

    /// Builds the adapter from the `runtime` config section.
    #[must_use]
    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self::new(config.program.as_str())
    }

    /// Runs the process in `dir` instead of the current directory.
    #[must_use]
    pub fn with_cwd(mut self, dir: impl Into<Utf8PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// The program being spawned.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    async fn eval(&self, script: &str, envs: &[(&str, &str)]) -> Result<String, SsgError> {
        let mut command = Command::new(&self.program);
        command
            .args(["--input-type=module", "-e", script])
            .envs(envs.iter().copied())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(cwd) = &self.cwd {
            command.current_dir(cwd);
        }

        trace!(program = %self.program, "Spawning JS runtime");
        let output = command
            .output()
            .await
            .map_err(|source| SsgError::io(self.program.as_str(), source))?;

        if !output.status.success() {
            return Err(SsgError::ProcessFailed {
                program: self.program.clone(),
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for NodeRuntime {
    fn default() -> Self {
        Self::from_config(&RuntimeConfig::default())
    }
}

impl Renderer for NodeRuntime {
    async fn render(
        &self,
        path: &str,
        template: &Utf8Path,
        server_entry: &Utf8Path,
    ) -> Result<RenderOutcome, SsgError> {
        let absolute = absolute(server_entry).map_err(|err| SsgError::render(path, err))?;
        let stdout = self
            .eval(
                RENDER_SCRIPT,
                &[
                    (ENV_ENTRY, absolute.as_str()),
                    (ENV_TEMPLATE, template.as_str()),
                    (ENV_URL, path),
                ],
            )
            .await
            .map_err(|err| match err {
                SsgError::ProcessFailed { stderr, .. } => SsgError::render(path, stderr),
                other => other,
            })?;

        parse_render_reply(path, &stdout)
    }
}

impl ModuleInspector for NodeRuntime {
    async fn ssg_flag(&self, module: &Utf8Path) -> Result<Option<bool>, SsgError> {
        let absolute = absolute(module).map_err(|err| SsgError::module(module, err))?;
        let stdout = self
            .eval(SSG_FLAG_SCRIPT, &[(ENV_ENTRY, absolute.as_str())])
            .await
            .map_err(|err| match err {
                SsgError::ProcessFailed { stderr, .. } => SsgError::module(module, stderr),
                other => other,
            })?;

        parse_ssg_reply(module, &stdout)
    }
}

fn absolute(path: &Utf8Path) -> Result<Utf8PathBuf, String> {
    let absolute = std::path::absolute(path).map_err(|err| err.to_string())?;
    Utf8PathBuf::from_path_buf(absolute)
        .map_err(|path| format!("path is not valid UTF-8: {}", path.display()))
}

fn parse_render_reply(path: &str, stdout: &str) -> Result<RenderOutcome, SsgError> {
    let reply: RenderReply = serde_json::from_str(stdout.trim())
        .map_err(|err| SsgError::render(path, format!("malformed renderer reply: {err}")))?;
    match reply {
        RenderReply::Html { html } => {
            debug!(route = path, bytes = html.len(), "Rendered page");
            Ok(RenderOutcome::Html(html))
        }
        RenderReply::Status { status: 404 } => Ok(RenderOutcome::NotFound),
        RenderReply::Status { status } => Err(SsgError::render(
            path,
            format!("unexpected status {status}"),
        )),
    }
}

fn parse_ssg_reply(module: &Utf8Path, stdout: &str) -> Result<Option<bool>, SsgError> {
    let reply: SsgFlagReply = serde_json::from_str(stdout.trim())
        .map_err(|err| SsgError::module(module, format!("malformed loader reply: {err}")))?;
    match reply.ssg {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::Bool(flag) => Ok(Some(flag)),
        other => Err(SsgError::InvalidSsgExport {
            file: module.to_owned(),
            found: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_render_html() {
        let outcome = parse_render_reply("/", r#"{"html":"<h1>hi</h1>"}"#).unwrap();
        assert_eq!(outcome, RenderOutcome::Html("<h1>hi</h1>".to_owned()));
    }

    #[test]
    fn test_parse_render_not_found() {
        let outcome = parse_render_reply("/x", "{\"status\":404}\n").unwrap();
        assert_eq!(outcome, RenderOutcome::NotFound);
    }

    #[test]
    fn test_parse_render_other_status() {
        let err = parse_render_reply("/x", r#"{"status":500}"#).unwrap_err();
        assert!(err.to_string().contains("unexpected status 500"));
    }

    #[test]
    fn test_parse_render_garbage() {
        let err = parse_render_reply("/x", "Segmentation fault").unwrap_err();
        assert!(matches!(err, SsgError::Render { .. }));
    }

    #[test]
    fn test_parse_ssg_flag() {
        let module = Utf8Path::new("dist/ssr/about.js");
        assert_eq!(parse_ssg_reply(module, r#"{"ssg":null}"#).unwrap(), None);
        assert_eq!(parse_ssg_reply(module, r#"{"ssg":false}"#).unwrap(), Some(false));
        assert_eq!(parse_ssg_reply(module, r#"{"ssg":true}"#).unwrap(), Some(true));
    }

    #[test]
    fn test_parse_ssg_flag_rejects_non_boolean() {
        let err = parse_ssg_reply(Utf8Path::new("a.js"), r#"{"ssg":"yes"}"#).unwrap_err();
        match err {
            SsgError::InvalidSsgExport { file, found } => {
                assert_eq!(file, "a.js");
                assert_eq!(found, "\"yes\"");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_program_is_io_error() {
        let runtime = NodeRuntime::new("redwork-no-such-runtime");
        let err = runtime
            .ssg_flag(Utf8Path::new("module.js"))
            .await
            .unwrap_err();
        assert!(matches!(err, SsgError::Io { .. }));
    }
}
