//! Requirement locating and rewriting
//!
//! This module provides functionality to:
//! - Scan configuration text for declaration blocks
//! - Compare in-file sources with dependency descriptors
//! - Locate the one block a requirement binding refers to
//! - Rewrite it with byte-exact splices
//! - Write changed files back to a local project

mod comparator;
mod locator;
mod scanner;
mod splice;
mod terraform;
mod writer;

pub use comparator::{same_repository, source_matches};
pub use locator::{locate, Location, MatchSite};
pub use scanner::{scan_blocks, Attribute, Block, BlockScanner};
pub use splice::{apply_splices, OverlappingSplices, Splice};
pub use terraform::TerraformUpdater;
pub use writer::{ManifestWriter, WriteResult};

use crate::domain::{ConfigFile, Dependency, DependencyUpdate, Ecosystem};
use crate::error::UpdateError;

/// Trait for rewriting a dependency's requirements in configuration files
pub trait FileUpdater {
    /// Reconcile every requirement binding of `dependency` against `files`
    ///
    /// Ambiguous matches are collected in the returned update rather than
    /// aborting other files; only a malformed dependency record is an error.
    fn update(
        &self,
        files: &[ConfigFile],
        dependency: &Dependency,
    ) -> Result<DependencyUpdate, UpdateError>;

    /// Returns the ecosystem this updater handles
    fn ecosystem(&self) -> Ecosystem;
}

/// Get a file updater for the specified ecosystem
pub fn get_updater(ecosystem: Ecosystem) -> Box<dyn FileUpdater> {
    match ecosystem {
        Ecosystem::Terraform => Box::new(TerraformUpdater),
    }
}

/// Returns only the files whose content changed for `dependency`
///
/// Fails with the first ambiguous match if any file could not be updated.
pub fn updated_dependency_files(
    files: &[ConfigFile],
    dependency: &Dependency,
) -> Result<Vec<ConfigFile>, UpdateError> {
    let update = get_updater(dependency.package_manager).update(files, dependency)?;
    match update.failures.into_iter().next() {
        Some(err) => Err(err),
        None => Ok(update.files),
    }
}
