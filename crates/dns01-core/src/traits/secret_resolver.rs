// # Secret Resolver Trait
//
// Defines the interface to the credential-resolution collaborator.
//
// ## Purpose
//
// Provider API keys are not part of the challenge request. The request's
// provider configuration only names where the key lives (a secret name and a
// key inside it); the namespace comes from the request itself. A resolver
// turns that reference into the raw key bytes.
//
// ## Implementations
//
// - In-memory: `secrets::MemorySecretResolver`
// - Mounted secret directories: `secrets::FileSecretResolver`
//
// ## Usage
//
// ```rust,ignore
// use dns01_core::traits::SecretResolver;
//
// async fn api_key(resolver: &dyn SecretResolver) -> dns01_core::Result<Option<Vec<u8>>> {
//     resolver.resolve("cert-manager", "vultr-credentials", "apiKey").await
// }
// ```

use async_trait::async_trait;

/// Trait for credential resolvers
///
/// # Thread Safety
///
/// All methods must be safe to call concurrently from multiple tasks.
///
/// # Contract
///
/// - `Ok(Some(bytes))`: the secret exists and holds the key
/// - `Ok(None)`: the secret exists but has no such key
/// - `Err(Error)`: the lookup itself failed (secret missing, access denied,
///   backend unavailable). Resolvers report these as
///   [`crate::Error::UpstreamCredential`]; the solver passes them through
///   unchanged.
///
/// Resolvers never cache beyond a single call and never log secret values.
/// The solver bounds every call with its configured credential timeout.
#[async_trait]
pub trait SecretResolver: Send + Sync {
    /// Resolve one key of a namespaced secret
    ///
    /// # Parameters
    ///
    /// - `namespace`: Namespace of the requesting resource
    /// - `name`: Secret name
    /// - `key`: Key within the secret
    async fn resolve(
        &self,
        namespace: &str,
        name: &str,
        key: &str,
    ) -> Result<Option<Vec<u8>>, crate::Error>;
}
