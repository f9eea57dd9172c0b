//! Challenge requests delivered by the hosting framework

use serde::{Deserialize, Serialize};

/// What the framework wants done with the challenge record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChallengeAction {
    /// Publish the TXT record
    Present,
    /// Remove the TXT record
    CleanUp,
}

impl std::fmt::Display for ChallengeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChallengeAction::Present => f.write_str("Present"),
            ChallengeAction::CleanUp => f.write_str("CleanUp"),
        }
    }
}

/// A single DNS-01 challenge request
///
/// Field names follow the ACME webhook wire form, so a request can be
/// deserialized straight from the payload the framework sends.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeRequest {
    /// Request identifier, used for log correlation only
    #[serde(default)]
    pub uid: String,

    /// Requested action
    pub action: ChallengeAction,

    /// Name the certificate is being issued for (informational)
    #[serde(default)]
    pub dns_name: String,

    /// Expected TXT record value
    pub key: String,

    /// Namespace used for the credential lookup
    #[serde(default)]
    pub resource_namespace: String,

    /// Fully-qualified record name, possibly with a trailing dot
    #[serde(rename = "resolvedFQDN")]
    pub resolved_fqdn: String,

    /// Fully-qualified zone name, possibly with a trailing dot
    pub resolved_zone: String,

    /// Opaque provider configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
}

impl ChallengeRequest {
    /// Zone name without the trailing dot
    pub fn zone(&self) -> &str {
        unfqdn(&self.resolved_zone)
    }

    /// Record FQDN without the trailing dot
    pub fn fqdn(&self) -> &str {
        unfqdn(&self.resolved_fqdn)
    }
}

/// Strip a single trailing `.` from a fully-qualified name
pub fn unfqdn(name: &str) -> &str {
    name.strip_suffix('.').unwrap_or(name)
}
