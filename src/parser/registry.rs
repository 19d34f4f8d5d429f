//! Registry module source parser
//!
//! Handles source addresses of the form:
//! - `namespace/name/provider`
//! - `hostname/namespace/name/provider`
//! - either of the above followed by `//subdirectory`
//!
//! Sources without a hostname resolve against the public registry.

use crate::domain::{SourceDescriptor, SourceKind, DEFAULT_REGISTRY_HOSTNAME};
use crate::parser::SourceParser;
use regex::Regex;
use std::sync::LazyLock;

static REGISTRY_SOURCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?P<host>[0-9A-Za-z][0-9A-Za-z\-]*(?:\.[0-9A-Za-z\-]+)+(?::\d+)?)/)?(?P<namespace>[0-9A-Za-z][0-9A-Za-z_\-]{0,63})/(?P<name>[0-9A-Za-z][0-9A-Za-z_\-]{0,63})/(?P<provider>[0-9a-z]{1,64})(?://(?P<subdir>\S+))?$",
    )
    .unwrap()
});

/// Registry module source parser
pub struct RegistrySourceParser;

impl SourceParser for RegistrySourceParser {
    fn parse(&self, raw: &str) -> Option<SourceDescriptor> {
        RegistrySource::parse(raw).map(|source| source.to_descriptor(None))
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Registry
    }
}

/// A registry source address split into its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrySource {
    /// Registry host, explicit or defaulted
    pub hostname: String,
    /// Publishing namespace
    pub namespace: String,
    /// Module name
    pub name: String,
    /// Target provider
    pub provider: String,
    /// Subdirectory within the module package
    pub subdirectory: Option<String>,
}

impl RegistrySource {
    /// Parse a source attribute value; returns None for non-registry sources
    pub fn parse(raw: &str) -> Option<Self> {
        let caps = REGISTRY_SOURCE_RE.captures(raw.trim())?;
        Some(Self {
            hostname: caps
                .name("host")
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| DEFAULT_REGISTRY_HOSTNAME.to_string()),
            namespace: caps["namespace"].to_string(),
            name: caps["name"].to_string(),
            provider: caps["provider"].to_string(),
            subdirectory: caps.name("subdir").map(|m| m.as_str().to_string()),
        })
    }

    /// `namespace/name/provider`
    pub fn identifier(&self) -> String {
        format!("{}/{}/{}", self.namespace, self.name, self.provider)
    }

    /// Converts into a registry descriptor with the given constraint
    pub fn to_descriptor(&self, version_constraint: Option<&str>) -> SourceDescriptor {
        SourceDescriptor::RegistryModule {
            registry_hostname: self.hostname.clone(),
            module_identifier: self.identifier(),
            version_constraint: version_constraint.map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_public_registry() {
        let src = RegistrySource::parse("hashicorp/consul/aws").unwrap();
        assert_eq!(src.hostname, "registry.terraform.io");
        assert_eq!(src.identifier(), "hashicorp/consul/aws");
        assert_eq!(src.subdirectory, None);
    }

    #[test]
    fn test_parse_private_registry_with_port() {
        let src = RegistrySource::parse("app.terraform.io:8443/example-corp/k8s-cluster/azurerm")
            .unwrap();
        assert_eq!(src.hostname, "app.terraform.io:8443");
        assert_eq!(src.namespace, "example-corp");
        assert_eq!(src.name, "k8s-cluster");
        assert_eq!(src.provider, "azurerm");
    }

    #[test]
    fn test_parse_subdirectory() {
        let src = RegistrySource::parse("hashicorp/consul/aws//modules/consul-cluster").unwrap();
        assert_eq!(src.identifier(), "hashicorp/consul/aws");
        assert_eq!(src.subdirectory.as_deref(), Some("modules/consul-cluster"));
    }

    #[test]
    fn test_parse_rejects_other_sources() {
        assert!(RegistrySource::parse("github.com/hashicorp/example").is_none());
        assert!(RegistrySource::parse("./modules/network").is_none());
        assert!(RegistrySource::parse("../consul").is_none());
        assert!(RegistrySource::parse("git::https://example.com/vpc.git").is_none());
        assert!(RegistrySource::parse("hashicorp/consul").is_none());
        assert!(RegistrySource::parse("hashicorp/consul/AWS").is_none());
    }

    #[test]
    fn test_parser_trait() {
        let descriptor = RegistrySourceParser.parse("hashicorp/consul/aws").unwrap();
        assert_eq!(descriptor, SourceDescriptor::registry("hashicorp/consul/aws", None));
        assert_eq!(RegistrySourceParser.kind(), SourceKind::Registry);
    }
}
