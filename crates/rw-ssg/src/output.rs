//! Page naming and staged persistence.

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

use crate::error::SsgError;

/// A rendered page ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SsgPage {
    /// URL path the page was rendered for.
    pub path: String,
    /// The document.
    pub html: String,
}

/// File name for a URL path: leading `/` stripped, `.html` appended, and
/// the root path mapped to `index.html`.
///
/// ```
/// use rw_ssg::page_file_name;
///
/// assert_eq!(page_file_name("/"), "index.html");
/// assert_eq!(page_file_name("/about"), "about.html");
/// assert_eq!(page_file_name("/blog/first-post"), "blog/first-post.html");
/// ```
#[must_use]
pub fn page_file_name(path: &str) -> Utf8PathBuf {
    let name = path.strip_prefix('/').unwrap_or(path);
    if name.trim().is_empty() {
        Utf8PathBuf::from("index.html")
    } else {
        Utf8PathBuf::from(format!("{name}.html"))
    }
}

/// Writes pages into a staging directory and moves it into place only
/// once every page is on disk.
#[derive(Debug, Clone)]
pub struct StagedOutput {
    staging: Utf8PathBuf,
    target: Utf8PathBuf,
}

impl StagedOutput {
    /// Stages into `<target parent>/.ssg-staging`.
    #[must_use]
    pub fn new(target: impl Into<Utf8PathBuf>) -> Self {
        let target = target.into();
        let parent = target.parent().unwrap_or_else(|| Utf8Path::new("."));
        Self {
            staging: parent.join(".ssg-staging"),
            target,
        }
    }

    /// Where pages end up.
    #[must_use]
    pub fn target(&self) -> &Utf8Path {
        &self.target
    }

    /// Where pages are written first.
    #[must_use]
    pub fn staging(&self) -> &Utf8Path {
        &self.staging
    }

    /// Writes every page, then replaces the target directory.
    ///
    /// On failure the staging directory is removed and any previous target
    /// is left untouched.
    pub async fn commit(&self, pages: &[SsgPage]) -> Result<Vec<Utf8PathBuf>, SsgError> {
        remove_dir_if_exists(&self.staging).await?;

        match self.write_pages(pages).await {
            Ok(written) => {
                remove_dir_if_exists(&self.target).await?;
                tokio::fs::rename(&self.staging, &self.target)
                    .await
                    .map_err(|source| SsgError::io(&self.target, source))?;
                Ok(written.into_iter().map(|name| self.target.join(name)).collect())
            }
            Err(err) => {
                self.discard().await;
                Err(err)
            }
        }
    }

    /// Removes the staging directory, ignoring errors.
    pub async fn discard(&self) {
        if let Err(err) = remove_dir_if_exists(&self.staging).await {
            debug!(error = %err, "Failed to remove SSG staging directory");
        }
    }

    async fn write_pages(&self, pages: &[SsgPage]) -> Result<Vec<Utf8PathBuf>, SsgError> {
        tokio::fs::create_dir_all(&self.staging)
            .await
            .map_err(|source| SsgError::io(&self.staging, source))?;

        let mut written = Vec::with_capacity(pages.len());
        for page in pages {
            let name = page_file_name(&page.path);
            let file = self.staging.join(&name);
            if let Some(parent) = file.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|source| SsgError::io(parent, source))?;
            }
            tokio::fs::write(&file, &page.html)
                .await
                .map_err(|source| SsgError::io(&file, source))?;
            debug!(route = %page.path, file = %name, "Wrote page");
            written.push(name);
        }
        Ok(written)
    }
}

async fn remove_dir_if_exists(dir: &Utf8Path) -> Result<(), SsgError> {
    match tokio::fs::remove_dir_all(dir).await {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(SsgError::io(dir, source)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(path: &str, html: &str) -> SsgPage {
        SsgPage {
            path: path.to_owned(),
            html: html.to_owned(),
        }
    }

    fn temp_root() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        (dir, root)
    }

    #[test]
    fn test_page_file_name_nested() {
        assert_eq!(page_file_name("/docs/guide/intro"), "docs/guide/intro.html");
        assert_eq!(page_file_name(""), "index.html");
    }

    #[tokio::test]
    async fn test_commit_writes_pages_and_replaces_target() {
        let (_dir, root) = temp_root();
        let target = root.join("ssg");
        std::fs::create_dir_all(&target).unwrap();
        std::fs::write(target.join("stale.html"), "old").unwrap();

        let output = StagedOutput::new(&target);
        let written = output
            .commit(&[page("/", "<h1>home</h1>"), page("/blog/post", "<h1>post</h1>")])
            .await
            .unwrap();

        assert_eq!(written, [target.join("index.html"), target.join("blog/post.html")]);
        assert_eq!(std::fs::read_to_string(target.join("index.html")).unwrap(), "<h1>home</h1>");
        assert!(!target.join("stale.html").exists());
        assert!(!output.staging().exists());
    }

    #[tokio::test]
    async fn test_failed_commit_keeps_previous_target() {
        let (_dir, root) = temp_root();
        let target = root.join("ssg");
        std::fs::create_dir_all(&target).unwrap();
        std::fs::write(target.join("index.html"), "previous").unwrap();
        let output = StagedOutput::new(&target);

        // `a.html` is written as a file, then needed as a directory.
        let result = output
            .commit(&[page("/a", "a"), page("/a.html/b", "b")])
            .await;

        assert!(matches!(result, Err(SsgError::Io { .. })));
        assert!(!output.staging().exists());
        assert_eq!(std::fs::read_to_string(target.join("index.html")).unwrap(), "previous");
    }
}
