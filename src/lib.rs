//! tfbump - Terraform and Terragrunt module pin updater library
//!
//! Given resolved dependency records, this library locates the module
//! declarations they describe and rewrites their pins in place:
//! - Git sources (`git::https://...?ref=v1.2.3`, scp-style, shorthand hosts)
//! - Registry modules (`namespace/name/provider` with a `version` attribute)
//! - Terraform (`.tf`), Terragrunt (`.hcl`) and variable (`.tfvars`) files

pub mod cli;
pub mod domain;
pub mod error;
pub mod fetcher;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod parser;
pub mod progress;
pub mod settings;
