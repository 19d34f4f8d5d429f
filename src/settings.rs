//! Project settings and effective run configuration
//!
//! Settings are read from an optional `.tfbump.toml` in the project root:
//!
//! ```toml
//! directory = "infra"
//! ecosystem = "terragrunt"
//!
//! [[credentials]]
//! type = "git_source"
//! host = "github.com"
//! username = "x-access-token"
//! password = "..."
//! ```
//!
//! Command-line flags take precedence over settings.

use crate::cli::CliArgs;
use crate::domain::{Credential, Ecosystem};
use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Settings file name looked up in the project root
pub const SETTINGS_FILE_NAME: &str = ".tfbump.toml";

/// Directory used when neither flags nor settings name one
pub const DEFAULT_DIRECTORY: &str = "/";

/// Contents of `.tfbump.toml`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Directory holding the configuration files
    pub directory: Option<String>,
    /// Ecosystem key
    pub ecosystem: Option<Ecosystem>,
    /// Repository host credentials
    pub credentials: Vec<Credential>,
}

impl Settings {
    /// Load settings from `dir`, returning defaults if the file is absent
    pub fn from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(SETTINGS_FILE_NAME);
        match std::fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content, &path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ConfigError::InvalidSettings {
                path,
                message: e.to_string(),
            }),
        }
    }

    /// Parse settings text; `path` is used in error messages
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::InvalidSettings {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Effective configuration for one run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Local project root
    pub root: PathBuf,
    /// Directory within the project or repository
    pub directory: String,
    /// Ecosystem to dispatch on
    pub ecosystem: Ecosystem,
    /// Remote repository slug, if reading from GitHub
    pub repository: Option<String>,
    /// Commit to read from the remote repository
    pub commit: Option<String>,
    /// Credentials, command-line token first
    pub credentials: Vec<Credential>,
    /// Whether files are left untouched
    pub dry_run: bool,
}

impl RunConfig {
    /// Merge CLI flags over settings
    pub fn resolve(args: &CliArgs, settings: Settings) -> Result<Self, ConfigError> {
        args.validate()?;

        let mut credentials = Vec::new();
        if let Some(token) = &args.token {
            credentials.push(Credential::token("github.com", token));
        }
        credentials.extend(settings.credentials);

        Ok(Self {
            root: args.path.clone(),
            directory: args
                .directory
                .clone()
                .or(settings.directory)
                .unwrap_or_else(|| DEFAULT_DIRECTORY.to_string()),
            ecosystem: args.ecosystem.or(settings.ecosystem).unwrap_or_default(),
            repository: args.repo.clone(),
            commit: args.commit.clone(),
            credentials,
            dry_run: args.dry_run,
        })
    }

    /// Returns true if changed files are written back to disk
    ///
    /// Remote runs never write.
    pub fn writes_files(&self) -> bool {
        !self.dry_run && self.repository.is_none()
    }

    /// Local directory that file names are relative to
    pub fn local_directory(&self) -> PathBuf {
        self.root.join(self.directory.trim_start_matches('/'))
    }

    /// Token for a repository host
    pub fn token_for(&self, host: &str) -> Option<&str> {
        Credential::token_for_host(&self.credentials, host)
    }
}
