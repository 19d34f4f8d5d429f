//! Configuration file acquisition
//!
//! This module provides:
//! - RepoContents backends for the GitHub contents API and the local filesystem
//! - A run-scoped directory listing cache
//! - The Terraform file fetcher that filters listings by suffix

mod cache;
mod client;
mod github;
mod local;

pub use cache::ListingCache;
pub use client::HttpClient;
pub use github::GitHubContents;
pub use local::LocalContents;

use crate::domain::{ConfigFile, Ecosystem};
use crate::error::FetchError;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

/// Kind of a directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
    Submodule,
}

/// One entry of a directory listing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepoEntry {
    /// Entry name without directory
    pub name: String,
    /// Path relative to the repository root
    pub path: String,
    /// Entry kind
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl RepoEntry {
    /// Creates a new entry
    pub fn new(name: impl Into<String>, path: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind,
        }
    }

    /// Returns true if this entry is a regular file
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

/// Trait for repository content backends
#[async_trait]
pub trait RepoContents: Send + Sync {
    /// Host name used in diagnostics
    fn host(&self) -> &str;

    /// List a directory relative to the repository root
    async fn list_directory(&self, directory: &str) -> Result<Vec<RepoEntry>, FetchError>;

    /// Fetch the raw text of a file relative to the repository root
    async fn fetch_file(&self, path: &str) -> Result<String, FetchError>;
}

/// Trait for ecosystem-specific file fetchers
#[async_trait]
pub trait FileFetcher: Send + Sync {
    /// Get the ecosystem this fetcher handles
    fn ecosystem(&self) -> Ecosystem;

    /// Fetch every recognised configuration file in `directory`
    async fn fetch_files(&self, directory: &str) -> Result<Vec<ConfigFile>, FetchError>;
}

/// Create a file fetcher for the given ecosystem
pub fn create_fetcher(ecosystem: Ecosystem, contents: Box<dyn RepoContents>) -> Box<dyn FileFetcher> {
    match ecosystem {
        Ecosystem::Terraform => Box::new(TerraformFileFetcher::new(contents)),
    }
}

/// Strips `./` and surrounding slashes; the repository root becomes ""
pub fn normalize_directory(directory: &str) -> String {
    let trimmed = directory.trim().trim_matches('/');
    let trimmed = trimmed.strip_prefix("./").unwrap_or(trimmed);
    if trimmed == "." {
        String::new()
    } else {
        trimmed.trim_matches('/').to_string()
    }
}

/// Fetcher for `.tf`, `.hcl` and `.tfvars` files
pub struct TerraformFileFetcher {
    contents: Box<dyn RepoContents>,
    cache: ListingCache,
}

impl TerraformFileFetcher {
    /// Create a new fetcher over a contents backend
    pub fn new(contents: Box<dyn RepoContents>) -> Self {
        Self {
            contents,
            cache: ListingCache::new(),
        }
    }
}

#[async_trait]
impl FileFetcher for TerraformFileFetcher {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Terraform
    }

    async fn fetch_files(&self, directory: &str) -> Result<Vec<ConfigFile>, FetchError> {
        let mut files = Vec::new();

        for suffix in self.ecosystem().file_suffixes() {
            let listing = self.cache.listing(self.contents.as_ref(), directory).await?;
            for entry in listing
                .iter()
                .filter(|e| e.is_file() && e.name.ends_with(suffix))
            {
                debug!(path = %entry.path, "fetching");
                let content = self.contents.fetch_file(&entry.path).await?;
                files.push(ConfigFile::new(&entry.name, content));
            }
        }

        if files.is_empty() {
            return Err(FetchError::dependency_file_not_found(directory));
        }

        info!(
            host = self.contents.host(),
            directory,
            count = files.len(),
            "fetched configuration files"
        );
        Ok(files)
    }
}
