//! Dependency records and requirement bindings
//!
//! A dependency record comes from an upstream resolver and carries two
//! parallel requirement sequences. Position `i` of `previous_requirements`
//! and position `i` of `requirements` together form one binding.

use super::{Ecosystem, SourceDescriptor, SourceKind};
use crate::error::UpdateError;
use semver::Version;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One declared requirement of a dependency, as reported by the resolver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    /// File the declaration lives in, relative to the project root
    pub file: String,
    /// Requirement string (registry version constraint), if any
    #[serde(default)]
    pub requirement: Option<String>,
    /// Dependency groups (unused by the rewriter, kept for round-tripping)
    #[serde(default)]
    pub groups: Vec<String>,
    /// Where the declaration points
    pub source: SourceDescriptor,
}

impl Requirement {
    /// Creates a requirement without a requirement string
    pub fn new(file: impl Into<String>, source: SourceDescriptor) -> Self {
        Self {
            file: file.into(),
            requirement: None,
            groups: Vec::new(),
            source,
        }
    }

    /// Sets the requirement string (builder pattern)
    pub fn with_requirement(mut self, requirement: impl Into<String>) -> Self {
        self.requirement = Some(requirement.into());
        self
    }

    /// Returns the effective descriptor
    ///
    /// Resolvers report a registry module's constraint in `requirement`
    /// rather than inside the source, so it is folded in here.
    pub fn descriptor(&self) -> SourceDescriptor {
        match &self.source {
            SourceDescriptor::RegistryModule {
                registry_hostname,
                module_identifier,
                version_constraint: None,
            } => SourceDescriptor::RegistryModule {
                registry_hostname: registry_hostname.clone(),
                module_identifier: module_identifier.clone(),
                version_constraint: self.requirement.clone(),
            },
            other => other.clone(),
        }
    }
}

/// One (file, old descriptor, new descriptor) triple to reconcile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementBinding {
    /// Index into the dependency's requirement sequences
    pub position: usize,
    /// File the declaration lives in
    pub target_file_name: String,
    /// Descriptor currently present in the file
    pub old_source: SourceDescriptor,
    /// Descriptor the file should carry afterwards
    pub new_source: SourceDescriptor,
}

/// Why a requirement pair cannot become a binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairingConflict {
    /// Old and new requirement name different files
    FileMismatch,
    /// Old and new descriptors are of different kinds
    KindMismatch,
}

impl RequirementBinding {
    /// Pairs an old and new requirement
    pub fn pair(
        position: usize,
        previous: &Requirement,
        current: &Requirement,
    ) -> Result<Self, PairingConflict> {
        if previous.file != current.file {
            return Err(PairingConflict::FileMismatch);
        }
        let old_source = previous.descriptor();
        let new_source = current.descriptor();
        if old_source.kind() != new_source.kind() {
            return Err(PairingConflict::KindMismatch);
        }
        Ok(Self {
            position,
            target_file_name: previous.file.clone(),
            old_source,
            new_source,
        })
    }

    /// Returns the descriptor kind shared by both sides
    pub fn kind(&self) -> SourceKind {
        self.old_source.kind()
    }

    /// Returns true if old and new descriptors are identical
    pub fn is_noop(&self) -> bool {
        self.old_source == self.new_source
    }
}

/// A logical external module with paired old/new requirement positions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Dependency name (module label for git modules, identifier for registry)
    pub name: String,
    /// Resolved new version
    #[serde(default)]
    pub version: Option<String>,
    /// Version before the update
    #[serde(default)]
    pub previous_version: Option<String>,
    /// New requirement positions
    pub requirements: Vec<Requirement>,
    /// Previous requirement positions, parallel to `requirements`
    pub previous_requirements: Vec<Requirement>,
    /// Ecosystem key the resolver ran under
    #[serde(default)]
    pub package_manager: Ecosystem,
}

impl Dependency {
    /// Creates a dependency with no versions set
    pub fn new(
        name: impl Into<String>,
        requirements: Vec<Requirement>,
        previous_requirements: Vec<Requirement>,
    ) -> Self {
        Self {
            name: name.into(),
            version: None,
            previous_version: None,
            requirements,
            previous_requirements,
            package_manager: Ecosystem::Terraform,
        }
    }

    /// Sets previous and new versions (builder pattern)
    pub fn with_versions(
        mut self,
        previous_version: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        self.previous_version = Some(previous_version.into());
        self.version = Some(version.into());
        self
    }

    /// Returns positionally paired (previous, current) requirements
    pub fn requirement_pairs(
        &self,
    ) -> Result<impl Iterator<Item = (usize, &Requirement, &Requirement)>, UpdateError> {
        if self.requirements.len() != self.previous_requirements.len() {
            return Err(UpdateError::invalid_dependency(
                &self.name,
                format!(
                    "{} requirements but {} previous requirements",
                    self.requirements.len(),
                    self.previous_requirements.len()
                ),
            ));
        }
        Ok(self
            .previous_requirements
            .iter()
            .zip(self.requirements.iter())
            .enumerate()
            .map(|(position, (previous, current))| (position, previous, current)))
    }

    /// Classifies the previous → new version change
    pub fn change_kind(&self) -> ChangeKind {
        match (&self.previous_version, &self.version) {
            (Some(old), Some(new)) => ChangeKind::from_versions(old, new),
            _ => ChangeKind::Unknown,
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.previous_version, &self.version) {
            (Some(old), Some(new)) => write!(f, "{} {} → {}", self.name, old, new),
            (None, Some(new)) => write!(f, "{} → {}", self.name, new),
            _ => write!(f, "{}", self.name),
        }
    }
}

/// Semantic version change type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// Major version change (breaking)
    Major,
    /// Minor version change (features)
    Minor,
    /// Patch version change (fixes)
    Patch,
    /// Unknown or unparseable (branch names, commit-like refs)
    Unknown,
}

impl ChangeKind {
    /// Determine the change type between two version-like strings
    pub fn from_versions(old: &str, new: &str) -> Self {
        match (lenient_version(old), lenient_version(new)) {
            (Some(old), Some(new)) => {
                if old.major != new.major {
                    ChangeKind::Major
                } else if old.minor != new.minor {
                    ChangeKind::Minor
                } else {
                    ChangeKind::Patch
                }
            }
            _ => ChangeKind::Unknown,
        }
    }

    /// Get the plain label
    pub fn label(&self) -> &'static str {
        match self {
            ChangeKind::Major => "major",
            ChangeKind::Minor => "minor",
            ChangeKind::Patch => "patch",
            ChangeKind::Unknown => "?",
        }
    }
}

/// Parses `v1.2.3`, `tags/1.2`, `0.4` and similar into a semver version
fn lenient_version(raw: &str) -> Option<Version> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix("tags/").unwrap_or(trimmed);
    let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);

    if let Ok(version) = Version::parse(trimmed) {
        return Some(version);
    }

    let core_len = trimmed
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(trimmed.len());
    let (core, rest) = trimmed.split_at(core_len);
    let parts: Vec<&str> = core.split('.').filter(|p| !p.is_empty()).collect();
    let padded = match parts.len() {
        1 => format!("{}.0.0{}", parts[0], rest),
        2 => format!("{}.{}.0{}", parts[0], parts[1], rest),
        _ => return None,
    };
    Version::parse(&padded).ok()
}
