//! Configuration types for the DNS-01 solver
//!
//! Two kinds of configuration flow through the solver:
//! - [`SolverConfig`]: process-level settings, built once at startup and
//!   handed to [`crate::Dns01Solver::new`]
//! - [`ProviderConfig`]: decoded per request from the opaque JSON blob on the
//!   [`crate::ChallengeRequest`]

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default upper bound for a single credential lookup
pub const DEFAULT_CREDENTIAL_TIMEOUT: Duration = Duration::from_secs(10);

/// Process-level solver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// API group the solver is registered under (must be non-empty)
    pub group_name: String,

    /// Solver name, unique within the group
    #[serde(default = "default_solver_name")]
    pub solver_name: String,

    /// Timeout applied to the credential lookup of every request
    #[serde(default = "default_credential_timeout", with = "duration_secs")]
    pub credential_timeout: Duration,
}

impl SolverConfig {
    /// Create a configuration for the given group with defaults
    pub fn new(group_name: impl Into<String>) -> Self {
        Self {
            group_name: group_name.into(),
            solver_name: default_solver_name(),
            credential_timeout: DEFAULT_CREDENTIAL_TIMEOUT,
        }
    }

    /// Set the credential lookup timeout
    pub fn with_credential_timeout(mut self, timeout: Duration) -> Self {
        self.credential_timeout = timeout;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.group_name.trim().is_empty() {
            return Err(crate::Error::config("group name must be specified"));
        }
        if self.solver_name.trim().is_empty() {
            return Err(crate::Error::config("solver name cannot be empty"));
        }
        if self.credential_timeout.is_zero() {
            return Err(crate::Error::config("credential timeout must be > 0"));
        }
        Ok(())
    }
}

fn default_solver_name() -> String {
    "vultr".to_string()
}

fn default_credential_timeout() -> Duration {
    DEFAULT_CREDENTIAL_TIMEOUT
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

/// Reference to one key of a namespaced secret
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretKeySelector {
    /// Secret name (namespace comes from the request)
    #[serde(default)]
    pub name: String,

    /// Key within the secret holding the API key
    #[serde(default)]
    pub key: String,
}

/// Per-request provider configuration
///
/// Wire form: `{"apiKeySecretRef": {"name": "vultr", "key": "apiKey"}}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    /// Where the API key is stored
    #[serde(default)]
    pub api_key_secret_ref: SecretKeySelector,
}

impl ProviderConfig {
    /// Decode and validate the opaque configuration blob of a request
    pub fn from_request_config(raw: Option<&serde_json::Value>) -> Result<Self, crate::Error> {
        let raw = raw
            .filter(|value| !value.is_null())
            .ok_or_else(|| crate::Error::invalid_provider_config("missing vultr solver config"))?;

        let config: ProviderConfig = serde_json::from_value(raw.clone())
            .map_err(|e| crate::Error::invalid_provider_config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate that both secret reference fields are present
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.api_key_secret_ref.name.is_empty() {
            return Err(crate::Error::invalid_provider_config(
                "missing apiKeySecretRef.name",
            ));
        }
        if self.api_key_secret_ref.key.is_empty() {
            return Err(crate::Error::invalid_provider_config(
                "missing apiKeySecretRef.key",
            ));
        }
        Ok(())
    }
}
