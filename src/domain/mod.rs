//! Core domain models for tfbump
//!
//! This module contains the fundamental types used throughout the application:
//! - Ecosystem identifiers
//! - Configuration file snapshots
//! - Source descriptors for git and registry modules
//! - Dependency records and requirement bindings
//! - Repository host credentials
//! - Rewrite outcomes and run summaries

mod config_file;
mod credential;
mod dependency;
mod ecosystem;
mod source;
mod summary;
mod update_result;

pub use config_file::ConfigFile;
pub use credential::Credential;
pub use dependency::{ChangeKind, Dependency, PairingConflict, Requirement, RequirementBinding};
pub use ecosystem::Ecosystem;
pub use source::{SourceDescriptor, SourceKind, DEFAULT_REGISTRY_HOSTNAME};
pub use summary::{DependencyUpdate, FileChange, UpdateSummary};
pub use update_result::{BindingOutcome, SkipReason};
