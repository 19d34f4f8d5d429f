//! Ecosystem identifiers for supported configuration languages

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported infrastructure-as-code ecosystems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Ecosystem {
    /// Terraform and Terragrunt configuration (`.tf`, `.hcl`, `.tfvars`)
    #[default]
    #[serde(alias = "terragrunt")]
    Terraform,
}

impl Ecosystem {
    /// Returns the recognised file-name suffixes, in fetch order
    pub fn file_suffixes(&self) -> &'static [&'static str] {
        match self {
            Ecosystem::Terraform => &[".tf", ".hcl", ".tfvars"],
        }
    }

    /// Returns the display name for this ecosystem
    pub fn display_name(&self) -> &'static str {
        match self {
            Ecosystem::Terraform => "Terraform",
        }
    }

    /// Returns the registry key for this ecosystem
    pub fn key(&self) -> &'static str {
        match self {
            Ecosystem::Terraform => "terraform",
        }
    }

    /// Returns all supported ecosystems
    pub fn all() -> &'static [Ecosystem] {
        &[Ecosystem::Terraform]
    }

    /// Returns true if the file name carries one of this ecosystem's suffixes
    pub fn recognises(&self, file_name: &str) -> bool {
        self.file_suffixes()
            .iter()
            .any(|suffix| file_name.ends_with(suffix))
    }
}

impl FromStr for Ecosystem {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "terraform" | "terragrunt" => Ok(Ecosystem::Terraform),
            _ => Err(ConfigError::UnknownEcosystem {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
