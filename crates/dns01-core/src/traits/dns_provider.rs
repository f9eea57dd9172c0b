// # DNS Provider Trait
//
// Defines the interface to a provider's zone-record API.
//
// ## Implementations
//
// - Vultr: `dns01-provider-vultr` crate
//
// ## Usage
//
// ```rust,ignore
// use dns01_core::traits::{DnsProvider, ListOptions};
//
// async fn first_page(provider: &dyn DnsProvider) -> dns01_core::Result<()> {
//     provider.get_zone("example.com").await?;
//     let page = provider.list_records("example.com", &ListOptions::new(100)).await?;
//     for record in page.records {
//         println!("{} {} {}", record.name, record.record_type, record.data);
//     }
//     Ok(())
// }
// ```

use async_trait::async_trait;

/// TXT record type discriminator
pub const TXT_RECORD_TYPE: &str = "TXT";

/// A zone as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    /// Zone name (no trailing dot)
    pub name: String,
    /// Provider-specific extras
    pub extra: serde_json::Value,
}

/// One record as returned by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRecord {
    /// Provider-assigned identifier, required for deletion
    pub id: String,
    /// Name relative to the zone (zone suffix stripped, `""` for the apex)
    pub name: String,
    /// Record type discriminator (e.g. "TXT")
    pub record_type: String,
    /// Record payload exactly as the provider stores it
    ///
    /// TXT payloads come back wrapped in double quotes.
    pub data: String,
    /// Time-to-live in seconds
    pub ttl: Option<u32>,
    /// Priority (MX/SRV only)
    pub priority: Option<u32>,
}

/// Record to create
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    /// Record name as sent to the provider
    pub name: String,
    /// Record type discriminator
    pub record_type: String,
    /// Raw payload (unquoted for TXT)
    pub data: String,
    /// Time-to-live in seconds
    pub ttl: u32,
}

impl NewRecord {
    /// Build a TXT record
    pub fn txt(name: impl Into<String>, data: impl Into<String>, ttl: u32) -> Self {
        Self {
            name: name.into(),
            record_type: TXT_RECORD_TYPE.to_string(),
            data: data.into(),
            ttl,
        }
    }
}

/// Pagination options for [`DnsProvider::list_records`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Records per page
    pub per_page: u32,
    /// Cursor returned with the previous page, `None` for the first page
    pub cursor: Option<String>,
}

impl ListOptions {
    /// Options for the first page
    pub fn new(per_page: u32) -> Self {
        Self {
            per_page,
            cursor: None,
        }
    }
}

/// One page of records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordPage {
    /// Records on this page
    pub records: Vec<RemoteRecord>,
    /// Cursor for the next page as returned by the provider
    pub next: Option<String>,
}

impl RecordPage {
    /// Cursor for the next page; `None` on the final page
    ///
    /// Providers signal the last page either by omitting the cursor or by
    /// sending an empty one. Both mean "done".
    pub fn next_cursor(&self) -> Option<&str> {
        self.next.as_deref().filter(|cursor| !cursor.is_empty())
    }
}

/// Trait for a provider's zone-record API
///
/// One instance is an authenticated handle scoped to a single Present or
/// CleanUp call. It is created by a [`DnsProviderFactory`] and dropped when
/// the call returns; it is never pooled or shared between requests.
///
/// # Trust Level: Untrusted
///
/// Providers are external integrations:
/// - Perform API calls to their own endpoints only
/// - Return success or failure; the framework owns retries
/// - Keep no state beyond the request
/// - Never decide whether a mutation is needed (owned by `Dns01Solver`)
///
/// Every method issues at most one API call.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Look up a zone by name
    ///
    /// Fails with a provider error (status 404 when the provider says so)
    /// if the zone is not administrable with the current credential.
    async fn get_zone(&self, zone: &str) -> Result<Zone, crate::Error>;

    /// Fetch one page of the zone's records
    async fn list_records(
        &self,
        zone: &str,
        options: &ListOptions,
    ) -> Result<RecordPage, crate::Error>;

    /// Create a record in the zone
    async fn create_record(
        &self,
        zone: &str,
        record: &NewRecord,
    ) -> Result<RemoteRecord, crate::Error>;

    /// Delete a record by its provider-assigned identifier
    async fn delete_record(&self, zone: &str, record_id: &str) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

/// Helper trait for constructing authenticated provider handles
///
/// The factory receives the already resolved and trimmed API key.
pub trait DnsProviderFactory: Send + Sync {
    /// Create a DnsProvider handle authenticated with `api_key`
    fn create(&self, api_key: &str) -> Result<Box<dyn DnsProvider>, crate::Error>;

    /// Name of the provider this factory builds
    fn provider_name(&self) -> &'static str;
}
