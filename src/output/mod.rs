//! Rendering of run results on stdout
//!
//! Three renderings share one trait: a per-dependency text report, a JSON
//! document for CI pipelines, and a line diff of every changed file.

mod diff;
mod json;
mod text;

pub use diff::DiffFormatter;
pub use json::JsonFormatter;
pub use text::TextFormatter;

use crate::cli::CliArgs;
use crate::domain::{DependencyUpdate, UpdateSummary};
use crate::orchestrator::OrchestratorResult;
use std::io::{IsTerminal, Write};

/// Which rendering `--json` / `--diff` selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    /// `--- a/` / `+++ b/` hunks per changed file
    Diff,
}

/// How much of the binding ledger is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Summary line only
    Quiet,
    /// Rewrites and failures
    #[default]
    Normal,
    /// Skipped bindings and no-op dependencies too
    Verbose,
}

/// Rendering choices resolved from the command line
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub verbosity: Verbosity,
    /// Summary wording says "would change" instead of "changed"
    pub dry_run: bool,
    /// ANSI colors in text output
    pub color: bool,
}

impl OutputConfig {
    /// `--json` wins over `--diff` and `--quiet` over `--verbose`; colors
    /// only for text written to a terminal
    pub fn from_args(args: &CliArgs) -> Self {
        let format = match (args.json, args.diff) {
            (true, _) => OutputFormat::Json,
            (false, true) => OutputFormat::Diff,
            (false, false) => OutputFormat::Text,
        };
        let verbosity = match (args.quiet, args.verbose) {
            (true, _) => Verbosity::Quiet,
            (false, true) => Verbosity::Verbose,
            (false, false) => Verbosity::Normal,
        };

        Self {
            format,
            verbosity,
            dry_run: args.dry_run,
            color: format == OutputFormat::Text && std::io::stdout().is_terminal(),
        }
    }
}

/// A rendering of one run
pub trait OutputFormatter {
    /// Render every dependency followed by the summary
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()>;

    /// Render the closing totals
    fn format_summary(
        &self,
        summary: &UpdateSummary,
        writer: &mut dyn Write,
    ) -> std::io::Result<()>;

    /// Render the outcomes and failures of one dependency record
    fn format_dependency(
        &self,
        update: &DependencyUpdate,
        writer: &mut dyn Write,
    ) -> std::io::Result<()>;
}

/// Picks the formatter for `config.format`
pub fn create_formatter(config: OutputConfig) -> Box<dyn OutputFormatter> {
    match config.format {
        OutputFormat::Text => Box::new(TextFormatter::with_color(
            config.verbosity,
            config.dry_run,
            config.color,
        )),
        OutputFormat::Json => Box::new(JsonFormatter::new(config.verbosity)),
        OutputFormat::Diff => Box::new(DiffFormatter::new(config.dry_run)),
    }
}
