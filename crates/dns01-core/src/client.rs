//! Provider client factory
//!
//! Turns a challenge request into an authenticated [`DnsProvider`] handle:
//!
//! 1. Decode the request's provider configuration
//! 2. Resolve the referenced API key (bounded by a timeout)
//! 3. Trim it and hand it to the provider factory
//!
//! Nothing here touches remote DNS state.

use std::time::Duration;

use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use crate::request::ChallengeRequest;
use crate::traits::{DnsProvider, DnsProviderFactory, SecretResolver};

/// Build an authenticated provider handle for one request
///
/// # Errors
///
/// - [`Error::InvalidProviderConfig`]: config blob missing or malformed, a
///   secret reference field is empty, or the secret has no such key
/// - [`Error::UpstreamCredential`]: the lookup timed out; other resolver
///   failures are returned exactly as the resolver reported them
/// - [`Error::InvalidProviderCredential`]: the key is empty after trimming or
///   not valid UTF-8
/// - whatever the factory returns when it cannot build a handle
pub async fn build_client(
    resolver: &dyn SecretResolver,
    factory: &dyn DnsProviderFactory,
    request: &ChallengeRequest,
    credential_timeout: Duration,
) -> Result<Box<dyn DnsProvider>> {
    let config = ProviderConfig::from_request_config(request.config.as_ref())?;

    let namespace = request.resource_namespace.as_str();
    let secret_name = config.api_key_secret_ref.name.as_str();
    let secret_key = config.api_key_secret_ref.key.as_str();

    let lookup = resolver.resolve(namespace, secret_name, secret_key);
    let data = match tokio::time::timeout(credential_timeout, lookup).await {
        Ok(result) => result?,
        Err(_) => {
            return Err(Error::upstream_credential(format!(
                "lookup of secret {}/{} timed out after {:?}",
                namespace, secret_name, credential_timeout
            )));
        }
    };

    let data = data.ok_or_else(|| Error::invalid_provider_config("api key not set"))?;
    let api_key = parse_api_key(&data)?;

    tracing::debug!(
        provider = factory.provider_name(),
        namespace,
        secret = secret_name,
        "Resolved provider credential"
    );

    factory.create(api_key)
}

fn parse_api_key(data: &[u8]) -> Result<&str> {
    let text = std::str::from_utf8(data)
        .map_err(|_| Error::invalid_provider_credential("api key is not valid UTF-8"))?;
    let api_key = text.trim();
    if api_key.is_empty() {
        return Err(Error::invalid_provider_credential("api key is empty"));
    }
    Ok(api_key)
}
