//! Diff output formatter for reviewing file changes
//!
//! Rewrites only ever replace a token inside one attribute value, so
//! changed files keep their line structure and a line-by-line comparison
//! is enough to produce readable hunks.

use crate::domain::{DependencyUpdate, FileChange, UpdateSummary};
use crate::orchestrator::OrchestratorResult;
use crate::output::OutputFormatter;
use std::io::Write;

/// Diff formatter for showing file changes
pub struct DiffFormatter {
    /// Whether this is a dry-run
    dry_run: bool,
}

impl DiffFormatter {
    /// Create a new diff formatter
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    fn dry_run_prefix(&self) -> &'static str {
        if self.dry_run {
            "(dry-run) "
        } else {
            ""
        }
    }

    /// Write `--- a/` / `+++ b/` headers and one hunk per changed line
    pub fn format_change(&self, change: &FileChange, writer: &mut dyn Write) -> std::io::Result<()> {
        let before: Vec<&str> = change.original.content.lines().collect();
        let after: Vec<&str> = change.updated.content.lines().collect();

        writeln!(writer, "--- a/{}", change.original.name)?;
        writeln!(writer, "+++ b/{}", change.updated.name)?;

        if before.len() != after.len() {
            writeln!(writer, "@@ -1,{} +1,{} @@", before.len(), after.len())?;
            for line in &before {
                writeln!(writer, "-{}", line)?;
            }
            for line in &after {
                writeln!(writer, "+{}", line)?;
            }
            return Ok(());
        }

        for (index, (old, new)) in before.iter().zip(after.iter()).enumerate() {
            if old != new {
                let line = index + 1;
                writeln!(writer, "@@ -{},1 +{},1 @@", line, line)?;
                writeln!(writer, "-{}", old)?;
                writeln!(writer, "+{}", new)?;
            }
        }
        Ok(())
    }
}

impl OutputFormatter for DiffFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        for change in &result.summary.changes {
            self.format_change(change, writer)?;
        }

        for failure in result.summary.failures() {
            writeln!(writer, "# error: {}", failure)?;
        }
        for error in &result.errors {
            writeln!(writer, "# error: {}", error)?;
        }

        self.format_summary(&result.summary, writer)
    }

    fn format_summary(
        &self,
        summary: &UpdateSummary,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        writeln!(
            writer,
            "{}# {} file(s) changed, {} declaration(s) rewritten",
            self.dry_run_prefix(),
            summary.files_changed(),
            summary.total_rewrites()
        )
    }

    fn format_dependency(
        &self,
        update: &DependencyUpdate,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        for outcome in update.outcomes.iter().filter(|o| o.is_rewritten()) {
            writeln!(writer, "# {} {}", update.dependency.name, outcome)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BindingOutcome, ConfigFile, Dependency};

    fn consul_change() -> FileChange {
        FileChange {
            original: ConfigFile::new(
                "main.tf",
                "module \"consul\" {\n  source  = \"hashicorp/consul/aws\"\n  version = \"0.1.0\"\n}\n",
            ),
            updated: ConfigFile::new(
                "main.tf",
                "module \"consul\" {\n  source  = \"hashicorp/consul/aws\"\n  version = \"0.3.1\"\n}\n",
            ),
        }
    }

    #[test]
    fn test_format_change_single_hunk() {
        let mut out = Vec::new();
        DiffFormatter::new(false)
            .format_change(&consul_change(), &mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(
            text,
            "--- a/main.tf\n+++ b/main.tf\n@@ -3,1 +3,1 @@\n-  version = \"0.1.0\"\n+  version = \"0.3.1\"\n"
        );
    }

    #[test]
    fn test_format_result_with_summary() {
        let mut summary = UpdateSummary::new(true);
        let mut update = DependencyUpdate::new(Dependency::new("hashicorp/consul/aws", vec![], vec![]));
        update
            .outcomes
            .push(BindingOutcome::rewritten(0, "main.tf", "0.1.0", "0.3.1"));
        summary.add_dependency(update);
        summary.changes.push(consul_change());

        let result = OrchestratorResult {
            summary,
            write_results: Vec::new(),
            errors: Vec::new(),
        };
        let mut out = Vec::new();
        DiffFormatter::new(true).format(&result, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("+  version = \"0.3.1\""));
        assert!(text.ends_with("(dry-run) # 1 file(s) changed, 1 declaration(s) rewritten\n"));
    }

    #[test]
    fn test_format_dependency_lists_rewrites() {
        let mut update = DependencyUpdate::new(Dependency::new("hashicorp/consul/aws", vec![], vec![]));
        update
            .outcomes
            .push(BindingOutcome::rewritten(0, "main.tf", "0.1.0", "0.3.1"));
        let mut out = Vec::new();
        DiffFormatter::new(false)
            .format_dependency(&update, &mut out)
            .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "# hashicorp/consul/aws main.tf: 0.1.0 → 0.3.1\n"
        );
    }
}
