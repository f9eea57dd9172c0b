//! Error types for the DNS-01 solver
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for solver operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DNS-01 solver
#[derive(Error, Debug)]
pub enum Error {
    /// The per-request provider configuration is missing, malformed, or
    /// lacks a required secret reference field
    #[error("Invalid provider config: {0}")]
    InvalidProviderConfig(String),

    /// The resolved API credential is empty or unusable
    #[error("Invalid provider credential: {0}")]
    InvalidProviderCredential(String),

    /// The credential resolver failed (secret missing, access denied, timeout)
    #[error("Credential lookup failed: {0}")]
    UpstreamCredential(String),

    /// Any failure reported by the remote DNS provider
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// HTTP status, when the failure came from an API response
        status: Option<u16>,
        /// Error message
        message: String,
    },

    /// Process or solver configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create an invalid provider config error
    pub fn invalid_provider_config(msg: impl Into<String>) -> Self {
        Self::InvalidProviderConfig(msg.into())
    }

    /// Create an invalid provider credential error
    pub fn invalid_provider_credential(msg: impl Into<String>) -> Self {
        Self::InvalidProviderCredential(msg.into())
    }

    /// Create an upstream credential error
    pub fn upstream_credential(msg: impl Into<String>) -> Self {
        Self::UpstreamCredential(msg.into())
    }

    /// Create a provider error without an HTTP status (transport, decoding)
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            status: None,
            message: message.into(),
        }
    }

    /// Create a provider error carrying the HTTP status of the failed call
    pub fn provider_status(
        provider: impl Into<String>,
        status: u16,
        message: impl Into<String>,
    ) -> Self {
        Self::Provider {
            provider: provider.into(),
            status: Some(status),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// HTTP status of a provider error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Provider { status, .. } => *status,
            _ => None,
        }
    }

    /// Whether the provider reported that the zone or record does not exist
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Whether a later re-invocation has a reasonable chance of succeeding
    ///
    /// Transport failures, rate limiting and provider 5xx responses are
    /// transient. Configuration and credential problems are not, including a
    /// missing or unreadable secret: the issuing resource or the referenced
    /// secret has to be fixed first.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Provider { status: None, .. } => true,
            Self::Provider {
                status: Some(status),
                ..
            } => *status == 429 || (500..=599).contains(status),
            _ => false,
        }
    }
}
