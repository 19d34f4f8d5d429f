//! Requirement locator
//!
//! Selects the single block in a file that carries a binding's old
//! descriptor and builds the splice that turns it into the new one.

use crate::domain::{RequirementBinding, SkipReason, SourceDescriptor, SourceKind};
use crate::error::UpdateError;
use crate::manifest::comparator::{same_repository, source_matches};
use crate::manifest::scanner::{scan_blocks, Block};
use crate::manifest::splice::Splice;
use crate::parser::{parse_source, GitSource};
use std::ops::Range;
use tracing::debug;

/// The located declaration and its rewrite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSite {
    /// Span of the enclosing block
    pub block_span: Range<usize>,
    /// First header label of the block
    pub label: Option<String>,
    /// Attribute value before the rewrite
    pub old_value: String,
    /// Attribute value after the rewrite
    pub new_value: String,
    /// Replacement of the full `key = "value"` assignment
    pub splice: Splice,
}

/// Result of locating one binding in one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// Exactly one block matched and the rewrite changes it
    Found(MatchSite),
    /// The binding contributes no change
    Skipped(SkipReason),
}

/// Locate the binding's old descriptor in `content`
///
/// When several blocks match, candidates are narrowed by the registry
/// block's current version equal to the old constraint, then by the
/// block label equal to `dependency_name`. More than one survivor is an
/// ambiguous match and nothing is rewritten.
pub fn locate(
    content: &str,
    binding: &RequirementBinding,
    dependency_name: &str,
) -> Result<Location, UpdateError> {
    if binding.is_noop() {
        return Ok(Location::Skipped(SkipReason::Unchanged));
    }

    let kind = binding.kind();
    let candidates: Vec<Block> = scan_blocks(content)
        .filter(|block| {
            block
                .source
                .as_ref()
                .and_then(|attr| parse_source(&attr.value, kind))
                .is_some_and(|candidate| source_matches(&candidate, &binding.old_source))
        })
        .collect();

    debug!(
        file = %binding.target_file_name,
        candidates = candidates.len(),
        "scanned for {}",
        binding.old_source
    );

    let candidates = narrow(candidates, |block| {
        kind == SourceKind::Registry
            && block.version.as_ref().map(|v| v.value.as_str()) == binding.old_source.pin()
    });
    let candidates = narrow(candidates, |block| block.label() == Some(dependency_name));

    let block = match candidates.len() {
        0 => return Ok(Location::Skipped(SkipReason::NoMatch)),
        1 => &candidates[0],
        n => {
            return Err(UpdateError::ambiguous(
                dependency_name,
                &binding.target_file_name,
                format!("{} blocks match {}", n, binding.old_source),
            ))
        }
    };

    let site = match kind {
        SourceKind::Git => git_site(content, block, binding, dependency_name)?,
        SourceKind::Registry => registry_site(content, block, binding),
    };

    Ok(match site {
        Ok(site) if site.splice.is_identity(content) => Location::Skipped(SkipReason::Unchanged),
        Ok(site) => Location::Found(site),
        Err(reason) => Location::Skipped(reason),
    })
}

/// Keeps only candidates satisfying `keep`, unless none or all do
fn narrow(candidates: Vec<Block>, keep: impl Fn(&Block) -> bool) -> Vec<Block> {
    if candidates.len() < 2 {
        return candidates;
    }
    let kept: Vec<Block> = candidates.iter().filter(|b| keep(b)).cloned().collect();
    if kept.is_empty() {
        candidates
    } else {
        kept
    }
}

fn git_site(
    content: &str,
    block: &Block,
    binding: &RequirementBinding,
    dependency_name: &str,
) -> Result<Result<MatchSite, SkipReason>, UpdateError> {
    let Some(attribute) = block.source.as_ref() else {
        return Ok(Err(SkipReason::NoMatch));
    };
    let Some(source) = GitSource::parse(&attribute.value) else {
        return Ok(Err(SkipReason::NoMatch));
    };

    if !same_repository(&binding.old_source, &binding.new_source) {
        return Err(UpdateError::ambiguous(
            dependency_name,
            &binding.target_file_name,
            "repository URL changes between old and new source",
        ));
    }

    let new_reference = match &binding.new_source {
        SourceDescriptor::GitReference { reference, .. } if !reference.is_empty() => reference,
        _ => return Ok(Err(SkipReason::UnsupportedRewrite)),
    };

    let new_value = source.with_reference(new_reference);
    debug!(
        subdirectory = ?source.subdirectory(),
        from = ?source.reference(),
        to = %new_reference,
        "git ref slot"
    );
    Ok(Ok(MatchSite {
        block_span: block.span.clone(),
        label: block.label().map(str::to_string),
        old_value: attribute.value.clone(),
        splice: Splice::for_attribute(content, attribute, &new_value),
        new_value,
    }))
}

fn registry_site(
    content: &str,
    block: &Block,
    binding: &RequirementBinding,
) -> Result<MatchSite, SkipReason> {
    if !same_repository(&binding.old_source, &binding.new_source) {
        return Err(SkipReason::UnsupportedRewrite);
    }
    let new_constraint = binding
        .new_source
        .pin()
        .ok_or(SkipReason::MissingVersionConstraint)?;
    let attribute = block
        .version
        .as_ref()
        .ok_or(SkipReason::MissingVersionAttribute)?;

    Ok(MatchSite {
        block_span: block.span.clone(),
        label: block.label().map(str::to_string),
        old_value: attribute.value.clone(),
        new_value: new_constraint.to_string(),
        splice: Splice::for_attribute(content, attribute, new_constraint),
    })
}
