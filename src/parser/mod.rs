//! Module source address parsers
//!
//! This module provides parsers for the `source` attribute of module blocks:
//! - Git checkouts (forced `git::` getter, scp-like, host shorthand, `.git` URLs)
//! - Registry modules (`[hostname/]namespace/name/provider[//subdir]`)

mod git;
mod registry;

pub use git::{normalize_git_url, GitSource, GitSourceParser};
pub use registry::{RegistrySource, RegistrySourceParser};

use crate::domain::{SourceDescriptor, SourceKind};

/// Trait for parsing source attribute values
pub trait SourceParser {
    /// Parse a raw source value into a descriptor
    fn parse(&self, raw: &str) -> Option<SourceDescriptor>;

    /// Returns the descriptor kind this parser produces
    fn kind(&self) -> SourceKind;
}

/// Get a source parser for the specified descriptor kind
pub fn get_parser(kind: SourceKind) -> Box<dyn SourceParser> {
    match kind {
        SourceKind::Git => Box::new(GitSourceParser),
        SourceKind::Registry => Box::new(RegistrySourceParser),
    }
}

/// Parse a raw source value as the given kind
pub fn parse_source(raw: &str, kind: SourceKind) -> Option<SourceDescriptor> {
    get_parser(kind).parse(raw)
}
