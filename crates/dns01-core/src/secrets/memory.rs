// # Memory Secret Resolver
//
// In-memory implementation of SecretResolver.
//
// ## Purpose
//
// Holds secrets in a map keyed by namespace and secret name. Useful for
// tests and for embedding the solver in a process that already holds the
// API key.
//
// ## Behavior
//
// - Unknown namespace/name: upstream error ("secret not found")
// - Known secret, unknown key: `Ok(None)`

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::Error;
use crate::traits::SecretResolver;

type SecretData = HashMap<String, Vec<u8>>;

/// In-memory secret resolver
///
/// # Example
///
/// ```rust,no_run
/// use dns01_core::secrets::MemorySecretResolver;
/// use dns01_core::traits::SecretResolver;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let resolver = MemorySecretResolver::new();
///     resolver.insert("cert-manager", "vultr", "apiKey", "secret-key").await;
///
///     let value = resolver.resolve("cert-manager", "vultr", "apiKey").await?;
///     assert_eq!(value, Some(b"secret-key".to_vec()));
///
///     Ok(())
/// }
/// ```
#[derive(Clone, Default)]
pub struct MemorySecretResolver {
    inner: Arc<RwLock<HashMap<(String, String), SecretData>>>,
}

impl MemorySecretResolver {
    /// Create a new empty resolver
    pub fn new() -> Self {
        Self::default()
    }

    /// Store one key of a secret, creating the secret if needed
    pub async fn insert(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<Vec<u8>>,
    ) {
        let mut guard = self.inner.write().await;
        guard
            .entry((namespace.into(), name.into()))
            .or_default()
            .insert(key.into(), value.into());
    }

    /// Remove a whole secret
    pub async fn remove(&self, namespace: &str, name: &str) {
        let mut guard = self.inner.write().await;
        guard.remove(&(namespace.to_string(), name.to_string()));
    }

    /// Number of secrets held
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Check if the resolver holds no secrets
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

// Secret values stay out of Debug output
impl std::fmt::Debug for MemorySecretResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemorySecretResolver")
            .field("secrets", &"<REDACTED>")
            .finish()
    }
}

#[async_trait]
impl SecretResolver for MemorySecretResolver {
    async fn resolve(
        &self,
        namespace: &str,
        name: &str,
        key: &str,
    ) -> Result<Option<Vec<u8>>, Error> {
        let guard = self.inner.read().await;
        let secret = guard
            .get(&(namespace.to_string(), name.to_string()))
            .ok_or_else(|| {
                Error::upstream_credential(format!("secret {}/{} not found", namespace, name))
            })?;
        Ok(secret.get(key).cloned())
    }
}
