//! Static resources under a fixed root directory.

use std::path::{Component, Path, PathBuf};

use anyhow::Context;

use crate::http::mime;

/// A file ready to be served.
#[derive(Debug, Clone)]
pub struct StaticFile {
    pub path: PathBuf,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a request path onto the root.
    ///
    /// `/` never maps to anything, and neither does a path that tries to
    /// climb out of the root.
    pub fn map_path(&self, request_path: &str) -> Option<PathBuf> {
        if request_path == "/" {
            return None;
        }

        let relative = Path::new(request_path.trim_start_matches('/'));
        let mut mapped = self.root.clone();
        for component in relative.components() {
            match component {
                Component::Normal(segment) => mapped.push(segment),
                Component::CurDir => {}
                _ => return None,
            }
        }
        Some(mapped)
    }

    /// Whether `request_path` names a regular file under the root.
    pub async fn exists(&self, request_path: &str) -> bool {
        match self.map_path(request_path) {
            Some(path) => tokio::fs::metadata(&path)
                .await
                .map(|m| m.is_file())
                .unwrap_or(false),
            None => false,
        }
    }

    /// Reads the file behind `request_path`, or `Ok(None)` if there is none.
    pub async fn load(&self, request_path: &str) -> anyhow::Result<Option<StaticFile>> {
        if !self.exists(request_path).await {
            return Ok(None);
        }
        let Some(path) = self.map_path(request_path) else {
            return Ok(None);
        };

        let bytes = tokio::fs::read(&path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        let content_type = mime::probe_content_type(&path).unwrap_or(mime::DEFAULT_CONTENT_TYPE);

        Ok(Some(StaticFile {
            path,
            content_type,
            bytes,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_and_traversal_are_rejected() {
        let files = StaticFiles::new("/srv/public");
        assert_eq!(files.map_path("/"), None);
        assert_eq!(files.map_path("/../etc/passwd"), None);
        assert_eq!(files.map_path("/a/../../b"), None);
        assert_eq!(
            files.map_path("/css/site.css"),
            Some(PathBuf::from("/srv/public/css/site.css"))
        );
    }
}
