//! Configuration file snapshots

use serde::{Deserialize, Serialize};

/// Immutable snapshot of one configuration file
///
/// `name` is relative to the project root and unique within a working set.
/// A rewrite never mutates a snapshot; it produces a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Path relative to the project root
    pub name: String,
    /// Full raw text
    pub content: String,
}

impl ConfigFile {
    /// Creates a new snapshot
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Returns a new snapshot with the same name and different content
    pub fn with_content(&self, content: impl Into<String>) -> Self {
        Self {
            name: self.name.clone(),
            content: content.into(),
        }
    }

    /// Returns true if the file name ends with the given suffix
    pub fn has_suffix(&self, suffix: &str) -> bool {
        self.name.ends_with(suffix)
    }
}
