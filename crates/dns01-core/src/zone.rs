//! Zone precondition check

use crate::error::Result;
use crate::traits::DnsProvider;

/// Confirm that `zone` is administrable with the given handle
///
/// Issues one read-only lookup. Any provider error, "not found" included, is
/// returned as-is; the check is never retried here.
pub async fn zone_exists(provider: &dyn DnsProvider, zone: &str) -> Result<()> {
    let found = provider.get_zone(zone).await?;
    tracing::debug!(zone = %found.name, provider = provider.provider_name(), "Zone exists");
    Ok(())
}
