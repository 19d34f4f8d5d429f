//! GitHub contents API backend
//!
//! Lists directories and fetches raw files from a repository.
//! API endpoint: https://api.github.com/repos/{owner}/{repo}/contents/{path}?ref={commit}
//!
//! Directory listings use the JSON media type; file bodies are requested
//! with `application/vnd.github.raw` so no base64 decoding is needed.

use crate::error::{ConfigError, FetchError};
use crate::fetcher::{HttpClient, RepoContents, RepoEntry};
use async_trait::async_trait;

/// GitHub REST API base URL
const GITHUB_API_URL: &str = "https://api.github.com";

const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw";

/// Repository contents read through the GitHub REST API
pub struct GitHubContents {
    client: HttpClient,
    owner: String,
    repo: String,
    commit: Option<String>,
}

impl GitHubContents {
    /// Create a backend for an `owner/name` repository slug
    pub fn new(client: HttpClient, repository: &str, commit: Option<String>) -> Result<Self, ConfigError> {
        let (owner, repo) = parse_repository(repository)?;
        Ok(Self {
            client,
            owner,
            repo,
            commit,
        })
    }

    /// Build the contents URL for a repository path
    pub fn contents_url(&self, path: &str) -> String {
        let path = path.trim_matches('/');
        let mut url = format!("{}/repos/{}/{}/contents", GITHUB_API_URL, self.owner, self.repo);
        if !path.is_empty() {
            url.push('/');
            url.push_str(path);
        }
        if let Some(commit) = &self.commit {
            url.push_str("?ref=");
            url.push_str(commit);
        }
        url
    }
}

/// Split an `owner/name` slug
pub fn parse_repository(repository: &str) -> Result<(String, String), ConfigError> {
    let invalid = || ConfigError::InvalidRepository {
        value: repository.to_string(),
    };
    let (owner, repo) = repository.trim().split_once('/').ok_or_else(invalid)?;
    let repo = repo.strip_suffix(".git").unwrap_or(repo);
    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return Err(invalid());
    }
    Ok((owner.to_string(), repo.to_string()))
}

#[async_trait]
impl RepoContents for GitHubContents {
    fn host(&self) -> &str {
        "github.com"
    }

    async fn list_directory(&self, directory: &str) -> Result<Vec<RepoEntry>, FetchError> {
        let url = self.contents_url(directory);
        self.client.get_json(&url, JSON_MEDIA_TYPE).await
    }

    async fn fetch_file(&self, path: &str) -> Result<String, FetchError> {
        let url = self.contents_url(path);
        self.client.get_text(&url, RAW_MEDIA_TYPE).await
    }
}
