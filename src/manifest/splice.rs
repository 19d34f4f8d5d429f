//! Byte-span replacements against original file content
//!
//! Every span is computed against the unmodified content. All splices for
//! one file are applied together in ascending order, so earlier
//! replacements never shift later spans.

use crate::manifest::scanner::Attribute;
use std::ops::Range;
use thiserror::Error;

/// One replacement of `span` in the original content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Splice {
    /// Byte range in the original content
    pub span: Range<usize>,
    /// Text that replaces the range
    pub replacement: String,
}

/// Two splices claim overlapping ranges of the same content
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("overlapping rewrites at bytes {first:?} and {second:?}")]
pub struct OverlappingSplices {
    pub first: Range<usize>,
    pub second: Range<usize>,
}

impl Splice {
    /// Creates a splice
    pub fn new(span: Range<usize>, replacement: impl Into<String>) -> Self {
        Self {
            span,
            replacement: replacement.into(),
        }
    }

    /// Replaces an attribute's quoted value, keeping key, spacing and quotes
    pub fn for_attribute(content: &str, attribute: &Attribute, new_value: &str) -> Self {
        let mut replacement = String::with_capacity(attribute.span.len() + new_value.len());
        replacement.push_str(&content[attribute.span.start..attribute.value_span.start]);
        replacement.push_str(new_value);
        replacement.push_str(&content[attribute.value_span.end..attribute.span.end]);
        Self::new(attribute.span.clone(), replacement)
    }

    /// Returns true if applying the splice would not change `content`
    pub fn is_identity(&self, content: &str) -> bool {
        content.get(self.span.clone()) == Some(self.replacement.as_str())
    }

    /// Returns true if the two spans share at least one byte
    pub fn overlaps(&self, other: &Splice) -> bool {
        self.span.start < other.span.end && other.span.start < self.span.end
    }
}

/// Applies all splices to `content` in one pass
pub fn apply_splices(content: &str, mut splices: Vec<Splice>) -> Result<String, OverlappingSplices> {
    splices.sort_by_key(|s| (s.span.start, s.span.end));

    for pair in splices.windows(2) {
        if pair[0].overlaps(&pair[1]) {
            return Err(OverlappingSplices {
                first: pair[0].span.clone(),
                second: pair[1].span.clone(),
            });
        }
    }

    let mut out = String::with_capacity(content.len());
    let mut cursor = 0;
    for splice in &splices {
        out.push_str(&content[cursor..splice.span.start]);
        out.push_str(&splice.replacement);
        cursor = splice.span.end;
    }
    out.push_str(&content[cursor..]);
    Ok(out)
}
