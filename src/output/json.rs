//! JSON output formatter for machine processing

use crate::domain::{BindingOutcome, DependencyUpdate, UpdateSummary};
use crate::orchestrator::OrchestratorResult;
use crate::output::{OutputFormatter, Verbosity};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Verbosity level; skipped bindings are listed only when verbose
    verbosity: Verbosity,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    generated_at: DateTime<Utc>,
    dry_run: bool,
    summary: JsonSummary,
    dependencies: Vec<JsonDependency<'a>>,
    files: Vec<JsonFile<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

#[derive(Serialize)]
struct JsonSummary {
    files_changed: usize,
    rewrites: usize,
    skips: usize,
    failures: usize,
}

#[derive(Serialize)]
struct JsonDependency<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    to: Option<&'a str>,
    change: &'static str,
    outcomes: Vec<&'a BindingOutcome>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    failures: Vec<String>,
}

#[derive(Serialize)]
struct JsonFile<'a> {
    name: &'a str,
    written: bool,
}

impl JsonFormatter {
    fn summary_to_json(summary: &UpdateSummary) -> JsonSummary {
        JsonSummary {
            files_changed: summary.files_changed(),
            rewrites: summary.total_rewrites(),
            skips: summary.total_skips(),
            failures: summary.failures().count(),
        }
    }

    fn dependency_to_json<'a>(&self, update: &'a DependencyUpdate) -> JsonDependency<'a> {
        let dependency = &update.dependency;
        JsonDependency {
            name: &dependency.name,
            from: dependency.previous_version.as_deref(),
            to: dependency.version.as_deref(),
            change: dependency.change_kind().label(),
            outcomes: update
                .outcomes
                .iter()
                .filter(|o| o.is_rewritten() || self.verbosity == Verbosity::Verbose)
                .collect(),
            failures: update.failures.iter().map(|e| e.to_string()).collect(),
        }
    }

    fn write_json<T: Serialize>(value: &T, writer: &mut dyn Write) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(std::io::Error::other)?;
        writeln!(writer, "{}", json)
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        let summary = &result.summary;
        let files = summary
            .changes
            .iter()
            .map(|change| JsonFile {
                name: change.name(),
                written: result
                    .write_results
                    .iter()
                    .any(|w| w.file_modified && w.path.ends_with(change.name())),
            })
            .collect();

        let output = JsonOutput {
            generated_at: Utc::now(),
            dry_run: summary.dry_run,
            summary: Self::summary_to_json(summary),
            dependencies: summary
                .dependencies
                .iter()
                .map(|update| self.dependency_to_json(update))
                .collect(),
            files,
            errors: result.errors.iter().map(|e| e.to_string()).collect(),
        };

        Self::write_json(&output, writer)
    }

    fn format_summary(
        &self,
        summary: &UpdateSummary,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        Self::write_json(&Self::summary_to_json(summary), writer)
    }

    fn format_dependency(
        &self,
        update: &DependencyUpdate,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        Self::write_json(&self.dependency_to_json(update), writer)
    }
}
