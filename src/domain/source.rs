//! Source descriptors: where a module declaration points

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Default hostname for registry module addresses without an explicit host
pub const DEFAULT_REGISTRY_HOSTNAME: &str = "registry.terraform.io";

/// The kind of a source descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Version-control checkout
    Git,
    /// Published registry module
    Registry,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Git => write!(f, "git"),
            SourceKind::Registry => write!(f, "registry"),
        }
    }
}

/// Describes where a dependency's declaration points
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SourceDescriptor {
    /// A version-control checkout pin
    #[serde(rename = "git")]
    GitReference {
        /// Repository URL as the resolver reports it
        #[serde(rename = "url")]
        repository_url: String,
        /// Branch, when the resolver tracked one
        #[serde(default)]
        branch: Option<String>,
        /// Opaque reference token; empty means no explicit `ref` in the source
        #[serde(rename = "ref", default, deserialize_with = "nullable_string")]
        reference: String,
    },
    /// A published-module version pin
    #[serde(rename = "registry")]
    RegistryModule {
        /// Registry host, compared case-insensitively
        #[serde(default = "default_registry_hostname")]
        registry_hostname: String,
        /// `namespace/name/provider`
        module_identifier: String,
        /// Version constraint string, e.g. `0.3.1` or `~> 1.2`
        #[serde(default, skip_serializing_if = "Option::is_none")]
        version_constraint: Option<String>,
    },
}

fn default_registry_hostname() -> String {
    DEFAULT_REGISTRY_HOSTNAME.to_string()
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl SourceDescriptor {
    /// Creates a git descriptor
    pub fn git(repository_url: impl Into<String>, reference: impl Into<String>) -> Self {
        SourceDescriptor::GitReference {
            repository_url: repository_url.into(),
            branch: None,
            reference: reference.into(),
        }
    }

    /// Creates a registry descriptor on the default registry host
    pub fn registry(module_identifier: impl Into<String>, version: Option<&str>) -> Self {
        SourceDescriptor::RegistryModule {
            registry_hostname: default_registry_hostname(),
            module_identifier: module_identifier.into(),
            version_constraint: version.map(str::to_string),
        }
    }

    /// Returns the kind of this descriptor
    pub fn kind(&self) -> SourceKind {
        match self {
            SourceDescriptor::GitReference { .. } => SourceKind::Git,
            SourceDescriptor::RegistryModule { .. } => SourceKind::Registry,
        }
    }

    /// Returns the token that changes between versions (ref or constraint)
    pub fn pin(&self) -> Option<&str> {
        match self {
            SourceDescriptor::GitReference { reference, .. } if !reference.is_empty() => {
                Some(reference)
            }
            SourceDescriptor::GitReference { .. } => None,
            SourceDescriptor::RegistryModule {
                version_constraint, ..
            } => version_constraint.as_deref(),
        }
    }
}

impl fmt::Display for SourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceDescriptor::GitReference {
                repository_url,
                reference,
                ..
            } => {
                if reference.is_empty() {
                    write!(f, "{}", repository_url)
                } else {
                    write!(f, "{}?ref={}", repository_url, reference)
                }
            }
            SourceDescriptor::RegistryModule {
                registry_hostname,
                module_identifier,
                version_constraint,
            } => {
                write!(f, "{}/{}", registry_hostname, module_identifier)?;
                if let Some(version) = version_constraint {
                    write!(f, " ({})", version)?;
                }
                Ok(())
            }
        }
    }
}
