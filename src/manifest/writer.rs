//! Writing rewritten configuration files back to a local project
//!
//! This module provides:
//! - ManifestWriter for persisting changed ConfigFile snapshots
//! - Dry-run mode support (no actual file modifications)
//! - Rejection of names that would escape the project root

use crate::domain::ConfigFile;
use crate::error::IoError;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Writer that persists ConfigFile snapshots under a project root
pub struct ManifestWriter {
    /// Directory that file names are relative to
    root: PathBuf,
    /// Whether to run in dry-run mode (no file modifications)
    dry_run: bool,
}

/// Result of writing one file
#[derive(Debug)]
pub struct WriteResult {
    /// Absolute or root-joined path of the file
    pub path: PathBuf,
    /// Number of bytes in the new content
    pub bytes: usize,
    /// Whether the file was actually modified on disk
    pub file_modified: bool,
}

impl ManifestWriter {
    /// Create a new ManifestWriter
    pub fn new(root: impl Into<PathBuf>, dry_run: bool) -> Self {
        Self {
            root: root.into(),
            dry_run,
        }
    }

    /// Check if this writer is in dry-run mode
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Resolve a file name against the root, refusing absolute paths and `..`
    pub fn resolve(&self, name: &str) -> Result<PathBuf, IoError> {
        let relative = Path::new(name);
        let escapes = relative.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if escapes || name.is_empty() {
            return Err(IoError::OutsideRoot {
                path: relative.to_path_buf(),
            });
        }
        Ok(self.root.join(relative))
    }

    /// Write one file unless in dry-run mode
    pub fn write_file(&self, file: &ConfigFile) -> Result<WriteResult, IoError> {
        let path = self.resolve(&file.name)?;
        let mut result = WriteResult {
            path: path.clone(),
            bytes: file.content.len(),
            file_modified: false,
        };

        if !self.dry_run {
            fs::write(&path, &file.content).map_err(|e| IoError::generic(&path, e))?;
            result.file_modified = true;
        }

        Ok(result)
    }

    /// Write every file, continuing past individual failures
    pub fn write_all(&self, files: &[ConfigFile]) -> Vec<Result<WriteResult, IoError>> {
        files.iter().map(|file| self.write_file(file)).collect()
    }
}
