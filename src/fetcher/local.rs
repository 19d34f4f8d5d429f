//! Local filesystem backend

use crate::error::FetchError;
use crate::fetcher::{EntryKind, RepoContents, RepoEntry};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Repository contents read from a local checkout
pub struct LocalContents {
    root: PathBuf,
}

impl LocalContents {
    /// Create a backend rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }

    fn map_error(&self, path: &str, e: std::io::Error) -> FetchError {
        if e.kind() == ErrorKind::NotFound {
            FetchError::path_not_found(path, "local")
        } else {
            FetchError::network_error(self.resolve(path).display().to_string(), e.to_string())
        }
    }
}

#[async_trait]
impl RepoContents for LocalContents {
    fn host(&self) -> &str {
        "local"
    }

    async fn list_directory(&self, directory: &str) -> Result<Vec<RepoEntry>, FetchError> {
        let mut reader = tokio::fs::read_dir(self.resolve(directory))
            .await
            .map_err(|e| self.map_error(directory, e))?;

        let mut entries = Vec::new();
        while let Some(entry) = reader
            .next_entry()
            .await
            .map_err(|e| self.map_error(directory, e))?
        {
            let name = entry.file_name().to_string_lossy().into_owned();
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| self.map_error(directory, e))?;
            let kind = if file_type.is_dir() {
                EntryKind::Dir
            } else if file_type.is_symlink() {
                EntryKind::Symlink
            } else {
                EntryKind::File
            };
            let path = if directory.is_empty() {
                name.clone()
            } else {
                format!("{}/{}", directory.trim_matches('/'), name)
            };
            entries.push(RepoEntry::new(name, path, kind));
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn fetch_file(&self, path: &str) -> Result<String, FetchError> {
        tokio::fs::read_to_string(self.resolve(path))
            .await
            .map_err(|e| self.map_error(path, e))
    }
}
