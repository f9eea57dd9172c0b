// # Vultr DNS Provider
//
// This crate provides the Vultr implementation of the solver's provider
// traits, over the Vultr API v2.
//
// ## Behavior
//
// - One HTTP request per trait call; nothing is retried here
// - HTTP timeout of 30 seconds on every request
// - Status codes mapped to provider errors with the status retained
//   (401/403, 404, 429, 5xx)
// - Every request carries `User-Agent: cert-manager-vultr` and bearer auth
// - No caching: each handle serves exactly one challenge request
//
// ## Security Requirements
//
// - API key NEVER appears in logs or Debug output
// - Provider fails fast if the key is empty
//
// ## API Reference
//
// - Vultr API v2: https://www.vultr.com/api/#tag/dns
// - Get Domain: GET `/domains/{dns-domain}`
// - List Records: GET `/domains/{dns-domain}/records?per_page=&cursor=`
// - Create Record: POST `/domains/{dns-domain}/records`
// - Delete Record: DELETE `/domains/{dns-domain}/records/{record-id}`

use async_trait::async_trait;
use dns01_core::traits::{
    DnsProvider, DnsProviderFactory, ListOptions, NewRecord, RecordPage, RemoteRecord, Zone,
};
use dns01_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Vultr API base URL
pub const VULTR_API_BASE: &str = "https://api.vultr.com/v2";

/// User-Agent sent with every request
pub const USER_AGENT: &str = "cert-manager-vultr";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

const PROVIDER_NAME: &str = "vultr";

/// Vultr DNS provider
///
/// Holds one authenticated HTTP client. Stateless beyond that: the zone is
/// re-read from the API on every call.
pub struct VultrProvider {
    /// Vultr API key
    /// ⚠️ NEVER log this value
    api_key: String,

    /// API base URL without trailing slash
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the API key
impl std::fmt::Debug for VultrProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VultrProvider")
            .field("api_key", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl VultrProvider {
    /// Create a provider against the public Vultr API
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidProviderCredential`] if `api_key` is empty
    /// - [`Error::Provider`] if the HTTP client cannot be built
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, VULTR_API_BASE)
    }

    /// Create a provider against a custom API base URL
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(Error::invalid_provider_credential(
                "Vultr API key cannot be empty",
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                Error::provider(PROVIDER_NAME, format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn records_url(&self, zone: &str) -> String {
        format!("{}/domains/{}/records", self.base_url, zone)
    }

    /// Send a request, mapping transport failures and non-2xx statuses
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        operation: &str,
    ) -> Result<reqwest::Response> {
        let response = request
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::provider(PROVIDER_NAME, format!("{}: request timed out", operation))
                } else {
                    Error::provider(PROVIDER_NAME, format!("{}: HTTP request failed: {}", operation, e))
                }
            })?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(status_error(operation, status, &body))
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
        operation: &str,
    ) -> Result<T> {
        response.json().await.map_err(|e| {
            Error::provider(
                PROVIDER_NAME,
                format!("{}: failed to parse response: {}", operation, e),
            )
        })
    }
}

/// Map a non-2xx response to a provider error carrying the status
pub fn status_error(operation: &str, status: u16, body: &str) -> Error {
    let detail = api_error_message(body);
    let message = match status {
        401 | 403 => format!(
            "{}: authentication failed, invalid API key or insufficient permissions ({})",
            operation, detail
        ),
        404 => format!("{}: not found ({})", operation, detail),
        429 => format!("{}: rate limit exceeded ({})", operation, detail),
        500..=599 => format!("{}: Vultr server error ({})", operation, detail),
        _ => format!("{}: unexpected status {} ({})", operation, status, detail),
    };
    Error::provider_status(PROVIDER_NAME, status, message)
}

/// Extract Vultr's `{"error": "..."}` message, falling back to the raw body
fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<ApiError>(body) {
        Ok(err) if !err.error.is_empty() => err.error,
        _ if body.trim().is_empty() => "empty response body".to_string(),
        _ => body.trim().to_string(),
    }
}

#[async_trait]
impl DnsProvider for VultrProvider {
    /// ```http
    /// GET /domains/{zone}
    /// ```
    async fn get_zone(&self, zone: &str) -> Result<Zone> {
        tracing::debug!(zone, "Getting Vultr domain");

        let url = format!("{}/domains/{}", self.base_url, zone);
        let response = self.send(self.client.get(&url), "get domain").await?;
        let body: DomainResponse = Self::decode(response, "get domain").await?;

        Ok(Zone {
            name: body.domain.domain,
            extra: body.domain.extra,
        })
    }

    /// ```http
    /// GET /domains/{zone}/records?per_page=100&cursor=...
    /// ```
    async fn list_records(&self, zone: &str, options: &ListOptions) -> Result<RecordPage> {
        tracing::debug!(
            zone,
            per_page = options.per_page,
            cursor = options.cursor.as_deref().unwrap_or(""),
            "Listing Vultr domain records"
        );

        let mut query = vec![("per_page", options.per_page.to_string())];
        if let Some(cursor) = options.cursor.as_deref().filter(|c| !c.is_empty()) {
            query.push(("cursor", cursor.to_string()));
        }

        let request = self.client.get(self.records_url(zone)).query(&query);
        let response = self.send(request, "list records").await?;
        let body: RecordsResponse = Self::decode(response, "list records").await?;

        Ok(RecordPage {
            records: body.records.into_iter().map(RemoteRecord::from).collect(),
            next: body.meta.and_then(|meta| meta.links).map(|links| links.next),
        })
    }

    /// ```http
    /// POST /domains/{zone}/records
    /// {"name": "...", "type": "TXT", "data": "...", "ttl": 60}
    /// ```
    async fn create_record(&self, zone: &str, record: &NewRecord) -> Result<RemoteRecord> {
        tracing::debug!(
            zone,
            name = %record.name,
            record_type = %record.record_type,
            ttl = record.ttl,
            "Creating Vultr domain record"
        );

        let payload = CreateRecordRequest {
            name: &record.name,
            record_type: &record.record_type,
            data: &record.data,
            ttl: record.ttl,
        };
        let request = self.client.post(self.records_url(zone)).json(&payload);
        let response = self.send(request, "create record").await?;
        let body: RecordResponse = Self::decode(response, "create record").await?;

        Ok(body.record.into())
    }

    /// ```http
    /// DELETE /domains/{zone}/records/{record_id}
    /// ```
    async fn delete_record(&self, zone: &str, record_id: &str) -> Result<()> {
        tracing::debug!(zone, record_id, "Deleting Vultr domain record");

        let url = format!("{}/{}", self.records_url(zone), record_id);
        self.send(self.client.delete(&url), "delete record").await?;
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

/// Factory for creating Vultr providers
#[derive(Debug, Clone, Default)]
pub struct VultrFactory {
    /// Overrides [`VULTR_API_BASE`] when set
    base_url: Option<String>,
}

impl VultrFactory {
    /// Factory for the public Vultr API
    pub fn new() -> Self {
        Self::default()
    }

    /// Factory whose handles talk to `base_url` instead
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
        }
    }
}

impl DnsProviderFactory for VultrFactory {
    fn create(&self, api_key: &str) -> Result<Box<dyn DnsProvider>> {
        let base_url = self.base_url.as_deref().unwrap_or(VULTR_API_BASE);
        Ok(Box::new(VultrProvider::with_base_url(api_key, base_url)?))
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

// Vultr API v2 wire types

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    error: String,
}

#[derive(Debug, Deserialize)]
struct DomainResponse {
    domain: ApiDomain,
}

#[derive(Debug, Deserialize)]
struct ApiDomain {
    domain: String,
    #[serde(flatten)]
    extra: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct RecordsResponse {
    #[serde(default)]
    records: Vec<ApiRecord>,
    meta: Option<ApiMeta>,
}

#[derive(Debug, Deserialize)]
struct RecordResponse {
    record: ApiRecord,
}

#[derive(Debug, Deserialize)]
struct ApiMeta {
    links: Option<ApiLinks>,
}

#[derive(Debug, Deserialize)]
struct ApiLinks {
    #[serde(default)]
    next: String,
}

#[derive(Debug, Deserialize)]
struct ApiRecord {
    id: String,
    #[serde(rename = "type")]
    record_type: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    data: String,
    ttl: Option<u32>,
    /// -1 for record types without a priority
    priority: Option<i64>,
}

impl From<ApiRecord> for RemoteRecord {
    fn from(record: ApiRecord) -> Self {
        RemoteRecord {
            id: record.id,
            name: record.name,
            record_type: record.record_type,
            data: record.data,
            ttl: record.ttl,
            priority: record.priority.and_then(|p| u32::try_from(p).ok()),
        }
    }
}

#[derive(Debug, Serialize)]
struct CreateRecordRequest<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    record_type: &'a str,
    data: &'a str,
    ttl: u32,
}
