//! Terraform / Terragrunt requirement updater
//!
//! Reconciles every requirement binding of one dependency against the
//! working set of configuration files:
//! - bindings whose file is absent are skipped, not failed
//! - all splices landing in one file are applied in a single pass
//! - an ambiguous match fails only the file it occurs in
//! - only files whose content changed are returned

use crate::domain::{
    BindingOutcome, ConfigFile, Dependency, DependencyUpdate, Ecosystem, PairingConflict,
    RequirementBinding, SkipReason,
};
use crate::error::UpdateError;
use crate::manifest::locator::{locate, Location};
use crate::manifest::splice::{apply_splices, Splice};
use crate::manifest::FileUpdater;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Updater for `.tf`, `.hcl` and `.tfvars` files
pub struct TerraformUpdater;

impl FileUpdater for TerraformUpdater {
    fn update(
        &self,
        files: &[ConfigFile],
        dependency: &Dependency,
    ) -> Result<DependencyUpdate, UpdateError> {
        let mut result = DependencyUpdate::new(dependency.clone());
        let mut pending: HashMap<&str, Vec<(Splice, BindingOutcome)>> = HashMap::new();
        let mut failed: HashSet<&str> = HashSet::new();

        for (position, previous, current) in dependency.requirement_pairs()? {
            let binding = match RequirementBinding::pair(position, previous, current) {
                Ok(binding) => binding,
                Err(conflict) => {
                    let reason = match conflict {
                        PairingConflict::FileMismatch => SkipReason::FileMismatch,
                        PairingConflict::KindMismatch => SkipReason::KindMismatch,
                    };
                    debug!(dependency = %dependency.name, position, %reason, "binding skipped");
                    result
                        .outcomes
                        .push(BindingOutcome::skipped(position, &previous.file, reason));
                    continue;
                }
            };

            let Some(file) = files.iter().find(|f| f.name == binding.target_file_name) else {
                result.outcomes.push(BindingOutcome::skipped(
                    position,
                    &binding.target_file_name,
                    SkipReason::FileNotPresent,
                ));
                continue;
            };
            if failed.contains(file.name.as_str()) {
                result
                    .outcomes
                    .push(BindingOutcome::skipped(position, &file.name, SkipReason::FileFailed));
                continue;
            }

            match locate(&file.content, &binding, &dependency.name) {
                Ok(Location::Found(site)) => {
                    let outcome =
                        BindingOutcome::rewritten(position, &file.name, site.old_value, site.new_value);
                    pending
                        .entry(file.name.as_str())
                        .or_default()
                        .push((site.splice, outcome));
                }
                Ok(Location::Skipped(reason)) => {
                    result
                        .outcomes
                        .push(BindingOutcome::skipped(position, &file.name, reason));
                }
                Err(err) => {
                    warn!("{}", err);
                    let earlier = pending.remove(file.name.as_str()).unwrap_or_default();
                    result.outcomes.extend(abandoned(earlier.into_iter().map(|(_, o)| o)));
                    result
                        .outcomes
                        .push(BindingOutcome::skipped(position, &file.name, SkipReason::FileFailed));
                    failed.insert(file.name.as_str());
                    result.failures.push(err);
                }
            }
        }

        for file in files {
            let Some(entries) = pending.remove(file.name.as_str()) else {
                continue;
            };
            let (splices, outcomes): (Vec<Splice>, Vec<BindingOutcome>) = entries.into_iter().unzip();

            match apply_splices(&file.content, splices) {
                Ok(content) if content != file.content => {
                    debug!(file = %file.name, rewrites = outcomes.len(), "file rewritten");
                    result.files.push(file.with_content(content));
                    result.outcomes.extend(outcomes);
                }
                Ok(_) => {
                    result.outcomes.extend(outcomes.into_iter().map(|o| {
                        BindingOutcome::skipped(o.position(), o.file(), SkipReason::Unchanged)
                    }));
                }
                Err(overlap) => {
                    let err = UpdateError::ambiguous(&dependency.name, &file.name, overlap.to_string());
                    warn!("{}", err);
                    result.outcomes.extend(abandoned(outcomes));
                    result.failures.push(err);
                }
            }
        }

        result.outcomes.sort_by_key(|o| o.position());
        Ok(result)
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Terraform
    }
}

/// Turns outcomes of a file that failed into skips
fn abandoned(outcomes: impl IntoIterator<Item = BindingOutcome>) -> Vec<BindingOutcome> {
    outcomes
        .into_iter()
        .map(|o| BindingOutcome::skipped(o.position(), o.file(), SkipReason::FileFailed))
        .collect()
}
