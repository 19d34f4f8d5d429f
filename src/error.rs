//! Application error types using thiserror
//!
//! Error hierarchy:
//! - FetchError: Issues with acquiring configuration files from a repository
//! - UpdateError: Issues with locating or rewriting a dependency requirement
//! - ConfigError: Issues with CLI configuration, settings and dependency records
//! - IoError: File system operation failures

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// File acquisition related errors
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Requirement rewrite related errors
    #[error(transparent)]
    Update(#[from] UpdateError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// IO related errors
    #[error(transparent)]
    Io(#[from] IoError),
}

/// Errors related to fetching configuration files from a repository host
#[derive(Error, Debug)]
pub enum FetchError {
    /// No file with a recognised suffix exists in the requested directory
    #[error("dependency file not found: {path}")]
    DependencyFileNotFound { path: String },

    /// A single path requested from the host does not exist
    #[error("path '{path}' not found on {host}")]
    PathNotFound { path: String, host: String },

    /// Network request failed
    #[error("failed to fetch '{url}': {message}")]
    NetworkError { url: String, message: String },

    /// Rate limit exceeded
    #[error("rate limit exceeded for {host}")]
    RateLimitExceeded { host: String },

    /// Invalid response from the host
    #[error("invalid response from '{url}': {message}")]
    InvalidResponse { url: String, message: String },

    /// Timeout
    #[error("timeout while fetching '{url}'")]
    Timeout { url: String },

    /// Authentication error
    #[error("authentication failed for {host}: {message}")]
    AuthenticationError { host: String, message: String },
}

/// Errors raised while locating and rewriting requirements
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpdateError {
    /// More than one candidate block matches, or two splices overlap
    #[error("ambiguous match for '{dependency}' in {file}: {reason}")]
    AmbiguousMatch {
        dependency: String,
        file: String,
        reason: String,
    },

    /// The dependency record cannot be turned into requirement bindings
    #[error("invalid dependency record '{dependency}': {message}")]
    InvalidDependency { dependency: String, message: String },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Unknown ecosystem key
    #[error("unknown ecosystem '{value}': expected 'terraform' or 'terragrunt'")]
    UnknownEcosystem { value: String },

    /// Invalid repository slug
    #[error("invalid repository '{value}': expected 'owner/name'")]
    InvalidRepository { value: String },

    /// Dependency record file could not be parsed
    #[error("failed to parse dependency records in {path}: {message}")]
    InvalidDependencyFile { path: PathBuf, message: String },

    /// Settings file could not be parsed
    #[error("failed to parse settings in {path}: {message}")]
    InvalidSettings { path: PathBuf, message: String },

    /// Conflicting options
    #[error("conflicting options: {message}")]
    ConflictingOptions { message: String },
}

/// Errors related to IO operations
#[derive(Error, Debug)]
pub enum IoError {
    /// Directory not found
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Refusing to write outside the project root
    #[error("refusing to write outside project root: {path}")]
    OutsideRoot { path: PathBuf },

    /// Generic IO error
    #[error("IO error at {path}: {source}")]
    Generic {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    /// Creates a new DependencyFileNotFound error for a searched directory
    pub fn dependency_file_not_found(directory: &str) -> Self {
        let directory = directory.trim_end_matches('/');
        FetchError::DependencyFileNotFound {
            path: format!("{}/<anything>.tf", directory),
        }
    }

    /// Creates a new PathNotFound error
    pub fn path_not_found(path: impl Into<String>, host: impl Into<String>) -> Self {
        FetchError::PathNotFound {
            path: path.into(),
            host: host.into(),
        }
    }

    /// Creates a new NetworkError
    pub fn network_error(url: impl Into<String>, message: impl Into<String>) -> Self {
        FetchError::NetworkError {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(url: impl Into<String>) -> Self {
        FetchError::Timeout { url: url.into() }
    }

    /// Returns true if this error means the requested path does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            FetchError::PathNotFound { .. } | FetchError::DependencyFileNotFound { .. }
        )
    }
}

impl UpdateError {
    /// Creates a new AmbiguousMatch error
    pub fn ambiguous(
        dependency: impl Into<String>,
        file: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        UpdateError::AmbiguousMatch {
            dependency: dependency.into(),
            file: file.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new InvalidDependency error
    pub fn invalid_dependency(dependency: impl Into<String>, message: impl Into<String>) -> Self {
        UpdateError::InvalidDependency {
            dependency: dependency.into(),
            message: message.into(),
        }
    }

    /// Returns the file involved, if any
    pub fn file(&self) -> Option<&str> {
        match self {
            UpdateError::AmbiguousMatch { file, .. } => Some(file),
            UpdateError::InvalidDependency { .. } => None,
        }
    }
}

impl IoError {
    /// Creates a new DirectoryNotFound error
    pub fn directory_not_found(path: impl Into<PathBuf>) -> Self {
        IoError::DirectoryNotFound { path: path.into() }
    }

    /// Creates a new Generic IO error
    pub fn generic(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IoError::Generic {
            path: path.into(),
            source,
        }
    }
}
