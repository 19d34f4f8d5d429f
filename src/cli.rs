//! CLI argument parsing module for tfbump

use crate::domain::Ecosystem;
use crate::error::ConfigError;
use clap::Parser;
use std::path::PathBuf;

/// Parse an ecosystem key (`terraform` or `terragrunt`)
fn parse_ecosystem(s: &str) -> Result<Ecosystem, String> {
    s.parse::<Ecosystem>().map_err(|e| e.to_string())
}

/// Terraform and Terragrunt module pin updater
#[derive(Parser, Debug, Clone)]
#[command(
    name = "tfbump",
    version,
    about = "Rewrite Terraform and Terragrunt module pins from resolved dependency records"
)]
pub struct CliArgs {
    /// Project root (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Dependency records as JSON (one record or an array; `-` reads stdin)
    #[arg(short = 'D', long, value_name = "FILE")]
    pub dependency: PathBuf,

    /// Directory within the project that holds the configuration files
    #[arg(long)]
    pub directory: Option<String>,

    // Remote acquisition
    /// Read files from a GitHub repository (owner/name) instead of PATH
    #[arg(long, value_name = "OWNER/NAME")]
    pub repo: Option<String>,

    /// Commit, branch or tag to read from (with --repo)
    #[arg(long)]
    pub commit: Option<String>,

    /// Access token for github.com
    #[arg(long, env = "TFBUMP_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Ecosystem key (terraform, terragrunt)
    #[arg(long, value_parser = parse_ecosystem)]
    pub ecosystem: Option<Ecosystem>,

    // General options
    /// Dry run mode - show what would be updated without making changes
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,

    // Output options
    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,

    /// Show changes in diff format
    #[arg(long)]
    pub diff: bool,
}

impl CliArgs {
    /// Check if files come from a remote repository
    pub fn is_remote(&self) -> bool {
        self.repo.is_some()
    }

    /// Check if the dependency records come from stdin
    pub fn dependency_from_stdin(&self) -> bool {
        self.dependency.as_os_str() == "-"
    }

    /// Reject option combinations that cannot work together
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.commit.is_some() && self.repo.is_none() {
            return Err(ConfigError::ConflictingOptions {
                message: "--commit requires --repo".to_string(),
            });
        }
        if self.json && self.diff {
            return Err(ConfigError::ConflictingOptions {
                message: "--json and --diff cannot be combined".to_string(),
            });
        }
        Ok(())
    }
}
