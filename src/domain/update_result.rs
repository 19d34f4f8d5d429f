//! Per-binding rewrite outcome types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reason why a requirement binding contributed no change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The binding's target file is not in the working set
    FileNotPresent,
    /// No block in the file matches the old descriptor
    NoMatch,
    /// Old and new descriptors are of different kinds
    KindMismatch,
    /// Old and new requirements name different files
    FileMismatch,
    /// The change is not expressible as a single token substitution
    UnsupportedRewrite,
    /// The matched registry block has no `version` attribute
    MissingVersionAttribute,
    /// The new registry descriptor carries no version constraint
    MissingVersionConstraint,
    /// The rewritten text equals the existing text
    Unchanged,
    /// Another binding failed on the same file, so it was left untouched
    FileFailed,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::FileNotPresent => write!(f, "file not present"),
            SkipReason::NoMatch => write!(f, "no matching declaration"),
            SkipReason::KindMismatch => write!(f, "source kind changed"),
            SkipReason::FileMismatch => write!(f, "requirement file changed"),
            SkipReason::UnsupportedRewrite => write!(f, "unsupported rewrite"),
            SkipReason::MissingVersionAttribute => write!(f, "no version attribute"),
            SkipReason::MissingVersionConstraint => write!(f, "no new version constraint"),
            SkipReason::Unchanged => write!(f, "already up to date"),
            SkipReason::FileFailed => write!(f, "file left unchanged after a failure"),
        }
    }
}

/// Result of reconciling a single requirement binding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BindingOutcome {
    /// The declaration was rewritten
    Rewritten {
        /// Requirement position within the dependency
        position: usize,
        /// File the declaration lives in
        file: String,
        /// Attribute value before the rewrite
        from: String,
        /// Attribute value after the rewrite
        to: String,
    },
    /// The binding contributed no change
    Skipped {
        /// Requirement position within the dependency
        position: usize,
        /// File the declaration lives in
        file: String,
        /// Why nothing changed
        reason: SkipReason,
    },
}

impl BindingOutcome {
    /// Creates a Rewritten outcome
    pub fn rewritten(
        position: usize,
        file: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        BindingOutcome::Rewritten {
            position,
            file: file.into(),
            from: from.into(),
            to: to.into(),
        }
    }

    /// Creates a Skipped outcome
    pub fn skipped(position: usize, file: impl Into<String>, reason: SkipReason) -> Self {
        BindingOutcome::Skipped {
            position,
            file: file.into(),
            reason,
        }
    }

    /// Returns true if this binding was rewritten
    pub fn is_rewritten(&self) -> bool {
        matches!(self, BindingOutcome::Rewritten { .. })
    }

    /// Returns the file the binding targets
    pub fn file(&self) -> &str {
        match self {
            BindingOutcome::Rewritten { file, .. } => file,
            BindingOutcome::Skipped { file, .. } => file,
        }
    }

    /// Returns the requirement position
    pub fn position(&self) -> usize {
        match self {
            BindingOutcome::Rewritten { position, .. } => *position,
            BindingOutcome::Skipped { position, .. } => *position,
        }
    }
}

impl fmt::Display for BindingOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingOutcome::Rewritten { file, from, to, .. } => {
                write!(f, "{}: {} → {}", file, from, to)
            }
            BindingOutcome::Skipped { file, reason, .. } => {
                write!(f, "{}: skipped ({})", file, reason)
            }
        }
    }
}
