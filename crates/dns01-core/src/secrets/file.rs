// # File Secret Resolver
//
// Filesystem implementation of SecretResolver for mounted secrets.
//
// ## Layout
//
// Every secret is a directory and every key a file inside it, the way
// container runtimes project secrets into a volume:
//
// ```text
// <root>/
//   cert-manager/            <- namespace
//     vultr-credentials/     <- secret name
//       apiKey               <- key, file content is the value
// ```
//
// ## Behavior
//
// - Secret directory missing: upstream error ("secret not found")
// - Key file missing: `Ok(None)`
// - Path components containing separators or `..`: upstream error
//
// Values are returned byte-for-byte; trimming is the caller's job.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::Error;
use crate::traits::SecretResolver;

/// Mounted-secret directory resolver
///
/// # Example
///
/// ```rust,no_run
/// use dns01_core::secrets::FileSecretResolver;
/// use dns01_core::traits::SecretResolver;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let resolver = FileSecretResolver::new("/var/run/secrets/dns01");
///     let api_key = resolver.resolve("cert-manager", "vultr-credentials", "apiKey").await?;
///     assert!(api_key.is_some());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FileSecretResolver {
    root: PathBuf,
}

impl FileSecretResolver {
    /// Create a resolver rooted at `root`
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory of the secret tree
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn secret_dir(&self, namespace: &str, name: &str) -> Result<PathBuf, Error> {
        for component in [namespace, name] {
            Self::check_component(component)?;
        }
        Ok(self.root.join(namespace).join(name))
    }

    fn check_component(component: &str) -> Result<(), Error> {
        if component.is_empty()
            || component == "."
            || component == ".."
            || component.contains('/')
            || component.contains('\\')
        {
            return Err(Error::upstream_credential(format!(
                "invalid secret path component: {:?}",
                component
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl SecretResolver for FileSecretResolver {
    async fn resolve(
        &self,
        namespace: &str,
        name: &str,
        key: &str,
    ) -> Result<Option<Vec<u8>>, Error> {
        let dir = self.secret_dir(namespace, name)?;
        Self::check_component(key)?;

        match fs::metadata(&dir).await {
            Ok(metadata) if metadata.is_dir() => {}
            Ok(_) => {
                return Err(Error::upstream_credential(format!(
                    "secret {}/{} is not a directory",
                    namespace, name
                )));
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::upstream_credential(format!(
                    "secret {}/{} not found",
                    namespace, name
                )));
            }
            Err(e) => {
                return Err(Error::upstream_credential(format!(
                    "failed to read secret {}/{}: {}",
                    namespace, name, e
                )));
            }
        }

        match fs::read(dir.join(key)).await {
            Ok(data) => {
                tracing::debug!(namespace, name, key, "Resolved secret key from file");
                Ok(Some(data))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::upstream_credential(format!(
                "failed to read secret {}/{} key {}: {}",
                namespace, name, key, e
            ))),
        }
    }
}
