//! Git module source parser
//!
//! Handles source address formats:
//! - Forced getter: `git::https://host/org/repo.git?ref=v1.2.3`
//! - scp-like: `git@github.com:org/repo.git//modules/vpc?ref=v1.2.3`
//! - Host shorthand: `github.com/org/repo?ref=v1.2.3`, `bitbucket.org/org/repo`
//! - Plain URLs ending in `.git`: `https://host/org/repo.git`
//!
//! The `ref` slot is located by scanning the query parameters, so sources
//! with other parameters (`?depth=1&ref=v1`) or none at all round-trip.

use crate::domain::{SourceDescriptor, SourceKind};
use crate::parser::SourceParser;
use std::ops::Range;

const FORCED_GETTER: &str = "git::";
const SHORTHAND_HOSTS: &[&str] = &["github.com/", "bitbucket.org/"];
const SCHEMES: &[&str] = &["https://", "http://", "ssh://", "git://"];

/// Git module source parser
pub struct GitSourceParser;

impl SourceParser for GitSourceParser {
    fn parse(&self, raw: &str) -> Option<SourceDescriptor> {
        GitSource::parse(raw).map(|source| source.to_descriptor())
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Git
    }
}

/// A git source value split into its textual parts
///
/// All ranges are byte offsets into `raw`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitSource {
    raw: String,
    address: Range<usize>,
    subdirectory: Option<Range<usize>>,
    query: Option<Range<usize>>,
    reference: Option<Range<usize>>,
}

impl GitSource {
    /// Parse a source attribute value; returns None for non-git sources
    pub fn parse(raw: &str) -> Option<Self> {
        let forced = raw.starts_with(FORCED_GETTER);
        let body_start = if forced { FORCED_GETTER.len() } else { 0 };
        let body = &raw[body_start..];

        let (location, query) = match body.find('?') {
            Some(pos) => (
                &body[..pos],
                Some(body_start + pos + 1..raw.len()),
            ),
            None => (body, None),
        };

        let scheme_end = location.find("://").map(|i| i + 3).unwrap_or(0);
        let (address, subdirectory) = match location[scheme_end..].find("//") {
            Some(pos) => {
                let split = body_start + scheme_end + pos;
                (
                    body_start..split,
                    Some(split + 2..body_start + location.len()),
                )
            }
            None => (body_start..body_start + location.len(), None),
        };

        if address.is_empty() {
            return None;
        }
        if !forced && !looks_like_git(&raw[address.clone()]) {
            return None;
        }

        let reference = query
            .as_ref()
            .and_then(|q| find_query_param(raw, q.clone(), "ref"));

        Some(Self {
            raw: raw.to_string(),
            address,
            subdirectory,
            query,
            reference,
        })
    }

    /// Repository address without forced getter, subdirectory or query
    pub fn url(&self) -> &str {
        &self.raw[self.address.clone()]
    }

    /// The `//subdirectory` suffix without its leading slashes
    pub fn subdirectory(&self) -> Option<&str> {
        self.subdirectory.clone().map(|r| &self.raw[r])
    }

    /// The value of the `ref` query parameter
    pub fn reference(&self) -> Option<&str> {
        self.reference.clone().map(|r| &self.raw[r])
    }

    /// URL form used for identity comparison
    pub fn normalized_url(&self) -> String {
        normalize_git_url(self.url())
    }

    /// Returns the raw value with only the reference token replaced
    ///
    /// When no `ref` parameter exists one is appended to the query.
    pub fn with_reference(&self, new_reference: &str) -> String {
        match (&self.reference, &self.query) {
            (Some(span), _) => {
                let mut out = String::with_capacity(self.raw.len() + new_reference.len());
                out.push_str(&self.raw[..span.start]);
                out.push_str(new_reference);
                out.push_str(&self.raw[span.end..]);
                out
            }
            (None, Some(query)) if query.is_empty() => {
                format!("{}ref={}", self.raw, new_reference)
            }
            (None, Some(_)) => format!("{}&ref={}", self.raw, new_reference),
            (None, None) => format!("{}?ref={}", self.raw, new_reference),
        }
    }

    /// Converts into a git descriptor
    pub fn to_descriptor(&self) -> SourceDescriptor {
        SourceDescriptor::GitReference {
            repository_url: self.url().to_string(),
            branch: None,
            reference: self.reference().unwrap_or_default().to_string(),
        }
    }
}

fn looks_like_git(address: &str) -> bool {
    if address.starts_with("git@") {
        return true;
    }
    if SHORTHAND_HOSTS.iter().any(|host| address.starts_with(host)) {
        return true;
    }
    SCHEMES.iter().any(|scheme| address.starts_with(scheme))
        && address.trim_end_matches('/').ends_with(".git")
}

fn find_query_param(raw: &str, query: Range<usize>, key: &str) -> Option<Range<usize>> {
    let mut offset = query.start;
    for param in raw[query.clone()].split('&') {
        let start = offset;
        offset += param.len() + 1;
        if let Some((name, _)) = param.split_once('=') {
            if name == key {
                let value_start = start + name.len() + 1;
                return Some(value_start..start + param.len());
            }
        }
    }
    None
}

/// Normalise a git URL for identity comparison
///
/// Strips the forced getter, scheme, `git@` user, query string,
/// `//subdirectory` suffix, trailing slashes and the `.git` suffix. The
/// scp-like `host:path` separator becomes `/`.
pub fn normalize_git_url(url: &str) -> String {
    let url = url.trim();
    let url = url.strip_prefix(FORCED_GETTER).unwrap_or(url);
    let url = url.split('?').next().unwrap_or(url);

    let scheme_len = SCHEMES
        .iter()
        .find(|scheme| url.starts_with(*scheme))
        .map(|scheme| scheme.len())
        .unwrap_or(0);
    let without_scheme = &url[scheme_len..];
    let without_subdir = match without_scheme.find("//") {
        Some(pos) => &without_scheme[..pos],
        None => without_scheme,
    };

    let trimmed = without_subdir.trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);

    match trimmed.strip_prefix("git@") {
        Some(rest) if scheme_len == 0 => rest.replacen(':', "/", 1),
        Some(rest) => rest.to_string(),
        None => trimmed.to_string(),
    }
}
