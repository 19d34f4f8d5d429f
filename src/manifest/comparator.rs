//! Source descriptor identity comparison

use crate::domain::SourceDescriptor;
use crate::parser::normalize_git_url;

/// Returns true if a candidate parsed from a file is the declaration the
/// descriptor describes.
///
/// Git: normalised URLs must be equal and reference tokens byte-equal.
/// Registry: identifiers must be equal and hostnames equal ignoring case;
/// the version constraint is not part of the identity.
pub fn source_matches(candidate: &SourceDescriptor, descriptor: &SourceDescriptor) -> bool {
    match (candidate, descriptor) {
        (
            SourceDescriptor::GitReference {
                repository_url: candidate_url,
                reference: candidate_ref,
                ..
            },
            SourceDescriptor::GitReference {
                repository_url,
                reference,
                ..
            },
        ) => {
            candidate_ref == reference
                && normalize_git_url(candidate_url) == normalize_git_url(repository_url)
        }
        (
            SourceDescriptor::RegistryModule {
                registry_hostname: candidate_host,
                module_identifier: candidate_id,
                ..
            },
            SourceDescriptor::RegistryModule {
                registry_hostname,
                module_identifier,
                ..
            },
        ) => {
            candidate_id == module_identifier && candidate_host.eq_ignore_ascii_case(registry_hostname)
        }
        _ => false,
    }
}

/// Returns true if two git descriptors point at the same repository,
/// ignoring the reference.
pub fn same_repository(a: &SourceDescriptor, b: &SourceDescriptor) -> bool {
    match (a, b) {
        (
            SourceDescriptor::GitReference {
                repository_url: a, ..
            },
            SourceDescriptor::GitReference {
                repository_url: b, ..
            },
        ) => normalize_git_url(a) == normalize_git_url(b),
        (
            SourceDescriptor::RegistryModule {
                registry_hostname: host_a,
                module_identifier: id_a,
                ..
            },
            SourceDescriptor::RegistryModule {
                registry_hostname: host_b,
                module_identifier: id_b,
                ..
            },
        ) => id_a == id_b && host_a.eq_ignore_ascii_case(host_b),
        _ => false,
    }
}
