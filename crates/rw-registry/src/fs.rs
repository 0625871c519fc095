//! Atomic file writes and import path arithmetic.

use std::io::Write;

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use tempfile::NamedTempFile;

use crate::error::RegistryError;

/// Writes `contents` to `path` so readers see either the old file or the
/// new one, never a partial write.
///
/// The temporary file is created next to the target so the final rename
/// stays on one file system. Missing parent directories are created.
pub fn write_atomic(path: &Utf8Path, contents: &str) -> Result<(), RegistryError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(|source| RegistryError::io(parent, source))?;

    let mut temp =
        NamedTempFile::new_in(parent).map_err(|source| RegistryError::io(parent, source))?;
    temp.write_all(contents.as_bytes())
        .and_then(|()| temp.as_file().sync_all())
        .map_err(|source| RegistryError::io(path, source))?;
    temp.persist(path)
        .map_err(|err| RegistryError::io(path, err.error))?;
    Ok(())
}

/// Makes `path` absolute against the working directory and folds `.` and
/// `..` components without touching the file system.
pub fn absolutize(path: &Utf8Path) -> Result<Utf8PathBuf, RegistryError> {
    let absolute = std::path::absolute(path).map_err(|source| RegistryError::io(path, source))?;
    let absolute = Utf8PathBuf::from_path_buf(absolute).map_err(RegistryError::NonUtf8Path)?;

    let mut normalized = Utf8PathBuf::new();
    for component in absolute.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_str()),
        }
    }
    Ok(normalized)
}

/// Import specifier for `target` as seen from a module inside `from_dir`.
///
/// Always uses `/` and always starts with `./` or `../`, since bare
/// specifiers resolve as packages in module loaders.
pub fn import_specifier(from_dir: &Utf8Path, target: &Utf8Path) -> Result<String, RegistryError> {
    let from = absolutize(from_dir)?;
    let to = absolutize(target)?;
    let relative = pathdiff::diff_utf8_paths(&to, &from).ok_or_else(|| {
        RegistryError::UnresolvableImport {
            from: from.clone(),
            to: to.clone(),
        }
    })?;

    let joined = relative
        .components()
        .map(|component| component.as_str())
        .collect::<Vec<_>>()
        .join("/");

    if joined.starts_with("./") || joined.starts_with("../") {
        Ok(joined)
    } else {
        Ok(format!("./{joined}"))
    }
}
