//! Repository host credentials

use serde::{Deserialize, Serialize};
use std::fmt;

/// A credential for a repository host
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Credential type, e.g. `git_source`
    #[serde(rename = "type", default = "default_credential_type")]
    pub kind: String,
    /// Host the credential applies to, e.g. `github.com`
    pub host: String,
    /// Username, when the host needs one
    #[serde(default)]
    pub username: Option<String>,
    /// Password or access token
    #[serde(default)]
    pub password: Option<String>,
}

fn default_credential_type() -> String {
    "git_source".to_string()
}

impl Credential {
    /// Creates a git_source token credential for a host
    pub fn token(host: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            kind: default_credential_type(),
            host: host.into(),
            username: Some("x-access-token".to_string()),
            password: Some(token.into()),
        }
    }

    /// Finds the password for a host among git_source credentials
    pub fn token_for_host<'a>(credentials: &'a [Credential], host: &str) -> Option<&'a str> {
        credentials
            .iter()
            .filter(|c| c.kind == "git_source")
            .find(|c| c.host.eq_ignore_ascii_case(host))
            .and_then(|c| c.password.as_deref())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("kind", &self.kind)
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
