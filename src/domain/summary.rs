//! Update result summary types
//!
//! Provides structures for tracking results per dependency and per run.

use super::{BindingOutcome, ConfigFile, Dependency};
use crate::error::UpdateError;

/// Result of updating one dependency against a working set of files
#[derive(Debug, Clone, PartialEq)]
pub struct DependencyUpdate {
    /// The dependency that was reconciled
    pub dependency: Dependency,
    /// Files whose content changed; never an unmodified passthrough
    pub files: Vec<ConfigFile>,
    /// One outcome per binding that reached a file
    pub outcomes: Vec<BindingOutcome>,
    /// Ambiguous-match failures, one per affected file
    pub failures: Vec<UpdateError>,
}

impl DependencyUpdate {
    /// Creates an empty update for a dependency
    pub fn new(dependency: Dependency) -> Self {
        Self {
            dependency,
            files: Vec::new(),
            outcomes: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Returns the number of rewritten bindings
    pub fn rewrite_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_rewritten()).count()
    }

    /// Returns the number of skipped bindings
    pub fn skip_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_rewritten()).count()
    }

    /// Returns true if no file changed and nothing failed
    pub fn is_noop(&self) -> bool {
        self.files.is_empty() && self.failures.is_empty()
    }

    /// Returns true if any file failed to update
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Returns the rewritten content of a file, if it changed
    pub fn file(&self, name: &str) -> Option<&ConfigFile> {
        self.files.iter().find(|f| f.name == name)
    }
}

/// A file that differs from its fetched snapshot at the end of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    /// The snapshot as fetched
    pub original: ConfigFile,
    /// The snapshot after every dependency was applied
    pub updated: ConfigFile,
}

impl FileChange {
    /// Returns the file name
    pub fn name(&self) -> &str {
        &self.updated.name
    }
}

/// Overall summary of one run
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UpdateSummary {
    /// Results for each dependency, in input order
    pub dependencies: Vec<DependencyUpdate>,
    /// Net file changes, in fetch order
    pub changes: Vec<FileChange>,
    /// Whether this was a dry run
    pub dry_run: bool,
}

impl UpdateSummary {
    /// Creates a new UpdateSummary
    pub fn new(dry_run: bool) -> Self {
        Self {
            dependencies: Vec::new(),
            changes: Vec::new(),
            dry_run,
        }
    }

    /// Adds a dependency result
    pub fn add_dependency(&mut self, update: DependencyUpdate) {
        self.dependencies.push(update);
    }

    /// Returns the total number of files changed
    pub fn files_changed(&self) -> usize {
        self.changes.len()
    }

    /// Returns the total number of rewritten bindings
    pub fn total_rewrites(&self) -> usize {
        self.dependencies.iter().map(|d| d.rewrite_count()).sum()
    }

    /// Returns the total number of skipped bindings
    pub fn total_skips(&self) -> usize {
        self.dependencies.iter().map(|d| d.skip_count()).sum()
    }

    /// Returns all failures across dependencies
    pub fn failures(&self) -> impl Iterator<Item = &UpdateError> {
        self.dependencies.iter().flat_map(|d| d.failures.iter())
    }

    /// Returns true if any file changed
    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    /// Returns dependencies that changed nothing
    pub fn noops(&self) -> impl Iterator<Item = &DependencyUpdate> {
        self.dependencies.iter().filter(|d| d.is_noop())
    }
}
