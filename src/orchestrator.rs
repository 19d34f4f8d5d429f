//! Update orchestrator for coordinating one run
//!
//! This module provides:
//! - Workflow coordination: load records → fetch → apply → diff → write
//! - Sequential application of dependencies to one working set of files
//! - Dry-run and remote (read-only) mode support
//! - Error handling with partial continuation

use crate::cli::CliArgs;
use crate::domain::{ConfigFile, Dependency, DependencyUpdate, FileChange, UpdateSummary};
use crate::error::{AppError, ConfigError, IoError};
use crate::fetcher::{
    create_fetcher, FileFetcher, GitHubContents, HttpClient, LocalContents, RepoContents,
};
use crate::manifest::{get_updater, ManifestWriter, WriteResult};
use crate::progress::Progress;
use crate::settings::{RunConfig, Settings};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Host whose credentials are used for remote acquisition
const GITHUB_HOST: &str = "github.com";

/// Orchestrator for coordinating the update workflow
pub struct Orchestrator {
    /// Effective configuration
    config: RunConfig,
    /// Dependency records, applied in order
    dependencies: Vec<Dependency>,
    /// Whether to draw progress on stderr
    show_progress: bool,
}

/// Result of running the orchestrator
pub struct OrchestratorResult {
    /// Per-dependency outcomes and net file changes
    pub summary: UpdateSummary,
    /// Write results for each changed local file
    pub write_results: Vec<WriteResult>,
    /// Errors that did not abort the run
    pub errors: Vec<AppError>,
}

impl OrchestratorResult {
    /// Returns true if any dependency failed or any write failed
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty() || self.summary.failures().next().is_some()
    }

    /// Every non-fatal error as a display string, update failures first
    pub fn error_messages(&self) -> Vec<String> {
        self.summary
            .failures()
            .map(|e| e.to_string())
            .chain(self.errors.iter().map(|e| e.to_string()))
            .collect()
    }
}

impl Orchestrator {
    /// Create an orchestrator from CLI arguments, settings and dependency records
    pub fn new(args: &CliArgs) -> Result<Self, AppError> {
        let settings = Settings::from_dir(&args.path)?;
        let config = RunConfig::resolve(args, settings)?;

        let dependencies = if args.dependency_from_stdin() {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .map_err(|e| ConfigError::InvalidDependencyFile {
                    path: args.dependency.clone(),
                    message: e.to_string(),
                })?;
            parse_dependencies(&input, &args.dependency)?
        } else {
            load_dependencies(&args.dependency)?
        };

        Ok(Self {
            config,
            dependencies,
            show_progress: Progress::for_output(args.quiet, args.json).is_enabled(),
        })
    }

    /// Create an orchestrator from already-resolved parts (for testing)
    pub fn with_dependencies(config: RunConfig, dependencies: Vec<Dependency>) -> Self {
        Self {
            config,
            dependencies,
            show_progress: false,
        }
    }

    /// Run the update workflow
    ///
    /// Missing files and unusable configuration abort the run. Ambiguous
    /// matches and write failures are collected in the result instead.
    pub async fn run(&self) -> Result<OrchestratorResult, AppError> {
        let mut progress = Progress::new(self.show_progress);

        progress.spinner("Fetching configuration files...");
        let fetcher = self.build_fetcher()?;
        let files = fetcher.fetch_files(&self.config.directory).await?;
        progress.clear();

        let summary = self.apply_with_progress(files, &mut progress);
        progress.clear();

        let mut result = OrchestratorResult {
            summary,
            write_results: Vec::new(),
            errors: Vec::new(),
        };

        if self.config.repository.is_none() {
            self.write_changes(&mut result);
        }

        Ok(result)
    }

    /// Apply every dependency to `files` in order and diff against the input
    pub fn apply(&self, files: Vec<ConfigFile>) -> UpdateSummary {
        self.apply_with_progress(files, &mut Progress::new(false))
    }

    fn apply_with_progress(&self, files: Vec<ConfigFile>, progress: &mut Progress) -> UpdateSummary {
        let updater = get_updater(self.config.ecosystem);
        let mut summary = UpdateSummary::new(self.config.dry_run);
        let mut working = files.clone();

        progress.dependencies(self.dependencies.len());
        for dependency in &self.dependencies {
            progress.working_on(&dependency.name);

            let update = match updater.update(&working, dependency) {
                Ok(update) => update,
                Err(e) => {
                    warn!(dependency = %dependency.name, error = %e, "dependency record rejected");
                    let mut update = DependencyUpdate::new(dependency.clone());
                    update.failures.push(e);
                    update
                }
            };

            // Later dependencies see earlier rewrites
            for changed in &update.files {
                if let Some(slot) = working.iter_mut().find(|f| f.name == changed.name) {
                    *slot = changed.clone();
                }
            }

            info!(
                dependency = %dependency.name,
                rewrites = update.rewrite_count(),
                skips = update.skip_count(),
                failures = update.failures.len(),
                "applied dependency"
            );
            summary.add_dependency(update);
            progress.advance();
        }

        summary.changes = files
            .into_iter()
            .zip(working)
            .filter(|(original, updated)| original.content != updated.content)
            .map(|(original, updated)| FileChange { original, updated })
            .collect();
        summary
    }

    fn build_fetcher(&self) -> Result<Box<dyn FileFetcher>, AppError> {
        let contents: Box<dyn RepoContents> = match &self.config.repository {
            Some(repository) => {
                let client = HttpClient::new()?
                    .with_token(self.config.token_for(GITHUB_HOST).map(str::to_string));
                debug!(
                    repository = %repository,
                    commit = ?self.config.commit,
                    authenticated = client.has_token(),
                    "reading from GitHub"
                );
                Box::new(GitHubContents::new(
                    client,
                    repository,
                    self.config.commit.clone(),
                )?)
            }
            None => {
                if !self.config.root.is_dir() {
                    return Err(IoError::directory_not_found(&self.config.root).into());
                }
                Box::new(LocalContents::new(&self.config.root))
            }
        };
        Ok(create_fetcher(self.config.ecosystem, contents))
    }

    fn write_changes(&self, result: &mut OrchestratorResult) {
        let writer = ManifestWriter::new(self.config.local_directory(), !self.config.writes_files());
        debug!(
            dry_run = writer.is_dry_run(),
            files = result.summary.changes.len(),
            "writing changes"
        );

        let updated: Vec<ConfigFile> = result
            .summary
            .changes
            .iter()
            .map(|change| change.updated.clone())
            .collect();
        let written = writer.write_all(&updated);

        for (change, outcome) in result.summary.changes.iter().zip(written) {
            match outcome {
                Ok(written) => {
                    if written.file_modified {
                        info!(path = %written.path.display(), bytes = written.bytes, "wrote file");
                    }
                    result.write_results.push(written);
                }
                Err(e) => {
                    warn!(file = change.name(), error = %e, "write failed");
                    result.errors.push(e.into());
                }
            }
        }
    }
}

/// Read dependency records from a JSON file
pub fn load_dependencies(path: &Path) -> Result<Vec<Dependency>, ConfigError> {
    let content =
        std::fs::read_to_string(path).map_err(|e| ConfigError::InvalidDependencyFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    parse_dependencies(&content, path)
}

/// Parse one dependency record or an array of them
pub fn parse_dependencies(json: &str, path: &Path) -> Result<Vec<Dependency>, ConfigError> {
    let invalid = |e: serde_json::Error| ConfigError::InvalidDependencyFile {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    if json.trim_start().starts_with('[') {
        serde_json::from_str(json).map_err(invalid)
    } else {
        serde_json::from_str::<Dependency>(json)
            .map(|dependency| vec![dependency])
            .map_err(invalid)
    }
}
