//! Text output formatter for human-readable display
//!
//! This module provides:
//! - One block per dependency with its version change classification
//! - Rewritten declarations as `file: old → new`
//! - Skipped bindings with reasons (verbose only)
//! - Ambiguous-match failures
//! - A closing summary line

use crate::domain::{BindingOutcome, ChangeKind, DependencyUpdate, UpdateSummary};
use crate::orchestrator::OrchestratorResult;
use crate::output::{OutputFormatter, Verbosity};
use colored::Colorize;
use std::io::Write;

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether this is a dry-run
    dry_run: bool,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter without colors
    pub fn new(verbosity: Verbosity, dry_run: bool) -> Self {
        Self::with_color(verbosity, dry_run, false)
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, dry_run: bool, color: bool) -> Self {
        Self {
            verbosity,
            dry_run,
            color,
        }
    }

    fn dry_run_prefix(&self) -> String {
        match (self.dry_run, self.color) {
            (false, _) => String::new(),
            (true, true) => format!("{} ", "(dry-run)".cyan()),
            (true, false) => "(dry-run) ".to_string(),
        }
    }

    fn change_label(&self, kind: ChangeKind) -> String {
        if !self.color {
            return kind.label().to_string();
        }
        match kind {
            ChangeKind::Major => kind.label().red().bold().to_string(),
            ChangeKind::Minor => kind.label().yellow().to_string(),
            ChangeKind::Patch => kind.label().green().to_string(),
            ChangeKind::Unknown => kind.label().dimmed().to_string(),
        }
    }

    fn dependency_header(&self, update: &DependencyUpdate) -> String {
        let dependency = &update.dependency;
        let name = if self.color {
            dependency.name.bold().to_string()
        } else {
            dependency.name.clone()
        };

        match (&dependency.previous_version, &dependency.version) {
            (Some(old), Some(new)) => {
                let label = self.change_label(dependency.change_kind());
                if self.color {
                    format!("{} {} {} {} [{}]", name, old.dimmed(), "→".dimmed(), new.bright_white(), label)
                } else {
                    format!("{} {} -> {} [{}]", name, old, new, label)
                }
            }
            _ => name,
        }
    }

    fn outcome_line(&self, outcome: &BindingOutcome) -> Option<String> {
        match outcome {
            BindingOutcome::Rewritten { file, from, to, .. } => Some(if self.color {
                format!("  {} {}: {} {} {}", "✓".green(), file, from.dimmed(), "→".dimmed(), to)
            } else {
                format!("  + {}: {} -> {}", file, from, to)
            }),
            BindingOutcome::Skipped { file, reason, .. } if self.verbosity == Verbosity::Verbose => {
                let line = format!("  - {}: skipped ({})", file, reason);
                Some(if self.color {
                    line.dimmed().to_string()
                } else {
                    line
                })
            }
            BindingOutcome::Skipped { .. } => None,
        }
    }

    fn plural(count: usize, word: &str) -> String {
        if count == 1 {
            format!("{} {}", count, word)
        } else {
            format!("{} {}s", count, word)
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        if self.verbosity != Verbosity::Quiet {
            for update in &result.summary.dependencies {
                self.format_dependency(update, writer)?;
            }

            for error in &result.errors {
                if self.color {
                    writeln!(writer, "{} {}", "✗".red(), error)?;
                } else {
                    writeln!(writer, "x {}", error)?;
                }
            }

            if self.verbosity == Verbosity::Verbose {
                for written in result.write_results.iter().filter(|w| w.file_modified) {
                    writeln!(writer, "wrote {} ({} bytes)", written.path.display(), written.bytes)?;
                }
            }
        }

        self.format_summary(&result.summary, writer)
    }

    fn format_summary(
        &self,
        summary: &UpdateSummary,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let prefix = self.dry_run_prefix();
        let verb = if self.dry_run { "would change" } else { "changed" };
        let failures = summary.failures().count();

        let mut line = format!(
            "{}{} {}, {} rewritten, {} skipped",
            prefix,
            Self::plural(summary.files_changed(), "file"),
            verb,
            Self::plural(summary.total_rewrites(), "declaration"),
            summary.total_skips()
        );
        if failures > 0 {
            let failed = format!(", {} failed", failures);
            line.push_str(&if self.color {
                failed.red().to_string()
            } else {
                failed
            });
        }

        writeln!(writer, "{}", line)
    }

    fn format_dependency(
        &self,
        update: &DependencyUpdate,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let lines: Vec<String> = update
            .outcomes
            .iter()
            .filter_map(|outcome| self.outcome_line(outcome))
            .collect();

        if lines.is_empty() && update.failures.is_empty() && self.verbosity != Verbosity::Verbose {
            return Ok(());
        }

        writeln!(writer, "{}", self.dependency_header(update))?;
        for line in lines {
            writeln!(writer, "{}", line)?;
        }
        for failure in &update.failures {
            if self.color {
                writeln!(writer, "  {} {}", "✗".red(), failure)?;
            } else {
                writeln!(writer, "  x {}", failure)?;
            }
        }
        if update.outcomes.is_empty() && update.failures.is_empty() {
            writeln!(writer, "  (no requirements)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Dependency, SkipReason};
    use crate::error::UpdateError;

    fn sample_update() -> DependencyUpdate {
        let dependency =
            Dependency::new("origin_label", vec![], vec![]).with_versions("tags/0.3.7", "tags/0.4.1");
        let mut update = DependencyUpdate::new(dependency);
        update.outcomes.push(BindingOutcome::rewritten(
            0,
            "main.tf",
            "git::https://example.com/label.git?ref=tags/0.3.7",
            "git::https://example.com/label.git?ref=tags/0.4.1",
        ));
        update
            .outcomes
            .push(BindingOutcome::skipped(1, "other.tf", SkipReason::NoMatch));
        update
    }

    fn render(formatter: &TextFormatter, update: &DependencyUpdate) -> String {
        let mut out = Vec::new();
        formatter.format_dependency(update, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_format_dependency_normal() {
        let formatter = TextFormatter::new(Verbosity::Normal, false);
        let text = render(&formatter, &sample_update());

        assert!(text.starts_with("origin_label tags/0.3.7 -> tags/0.4.1 [minor]\n"));
        assert!(text.contains("  + main.tf: git::https://example.com/label.git?ref=tags/0.3.7 -> "));
        assert!(!text.contains("other.tf"));
    }

    #[test]
    fn test_format_dependency_verbose_shows_skips() {
        let formatter = TextFormatter::new(Verbosity::Verbose, false);
        let text = render(&formatter, &sample_update());
        assert!(text.contains("  - other.tf: skipped (no matching declaration)"));
    }

    #[test]
    fn test_format_dependency_hides_noop_unless_verbose() {
        let update = DependencyUpdate::new(Dependency::new("hashicorp/consul/aws", vec![], vec![]));
        let text = render(&TextFormatter::new(Verbosity::Normal, false), &update);
        assert!(text.is_empty());

        let text = render(&TextFormatter::new(Verbosity::Verbose, false), &update);
        assert!(text.contains("hashicorp/consul/aws"));
        assert!(text.contains("(no requirements)"));
    }

    #[test]
    fn test_format_dependency_failures() {
        let mut update = DependencyUpdate::new(Dependency::new("origin_label", vec![], vec![]));
        update
            .failures
            .push(UpdateError::ambiguous("origin_label", "main.tf", "2 blocks"));
        let text = render(&TextFormatter::new(Verbosity::Normal, false), &update);
        assert!(text.contains("  x "));
        assert!(text.contains("main.tf"));
    }

    #[test]
    fn test_format_summary_dry_run() {
        let mut summary = UpdateSummary::new(true);
        summary.add_dependency(sample_update());
        let formatter = TextFormatter::new(Verbosity::Normal, true);

        let mut out = Vec::new();
        formatter.format_summary(&summary, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "(dry-run) 0 files would change, 1 declaration rewritten, 1 skipped\n"
        );
    }

    #[test]
    fn test_format_quiet_prints_summary_only() {
        let mut summary = UpdateSummary::new(false);
        summary.add_dependency(sample_update());
        let result = OrchestratorResult {
            summary,
            write_results: Vec::new(),
            errors: Vec::new(),
        };

        let mut out = Vec::new();
        TextFormatter::new(Verbosity::Quiet, false)
            .format(&result, &mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("0 files changed"));
    }
}
