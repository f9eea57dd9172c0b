//! Record locator
//!
//! Scans a zone's records page by page for the TXT record carrying a given
//! challenge value.
//!
//! ## Matching
//!
//! A record matches when all three hold:
//! - its type is `TXT`
//! - its relative name equals the FQDN with the zone suffix stripped
//! - its data equals the challenge key wrapped in double quotes
//!
//! Providers return TXT payloads quoted (`"abc"`), while the value sent on
//! creation is unquoted (`abc`). The comparison keeps the quotes: an
//! unquoted `abc` in the zone is a different record and does not match.
//!
//! ## Pagination
//!
//! Pages of [`RECORDS_PAGE_SIZE`] are fetched sequentially until the provider
//! stops returning a cursor. The scan stops at the first match. An error on
//! any page aborts the scan and wins over anything seen on earlier pages.

use crate::error::Result;
use crate::traits::{DnsProvider, ListOptions, RemoteRecord, TXT_RECORD_TYPE};

/// Records requested per page
pub const RECORDS_PAGE_SIZE: u32 = 100;

/// Record name relative to `zone`
///
/// `_acme-challenge.example.com` in `example.com` is `_acme-challenge`; the
/// zone itself is the apex `""`. A name outside the zone is returned as-is.
pub fn relative_name<'a>(fqdn: &'a str, zone: &str) -> &'a str {
    if fqdn == zone {
        return "";
    }
    fqdn.strip_suffix(zone)
        .and_then(|prefix| prefix.strip_suffix('.'))
        .unwrap_or(fqdn)
}

/// TXT payload as the provider stores it
pub fn quoted_txt_value(key: &str) -> String {
    format!("\"{}\"", key)
}

/// Whether `record` is the challenge record for `subdomain` and `key`
pub fn is_challenge_record(record: &RemoteRecord, subdomain: &str, quoted_key: &str) -> bool {
    record.record_type == TXT_RECORD_TYPE && record.name == subdomain && record.data == quoted_key
}

/// Find the TXT record at `fqdn` whose value is `key`
///
/// # Returns
///
/// - `Ok(Some(record))`: first matching record
/// - `Ok(None)`: all pages scanned, no match
/// - `Err(Error)`: a page fetch failed
pub async fn find_txt_record(
    provider: &dyn DnsProvider,
    zone: &str,
    fqdn: &str,
    key: &str,
) -> Result<Option<RemoteRecord>> {
    let subdomain = relative_name(fqdn, zone);
    let quoted_key = quoted_txt_value(key);

    let mut options = ListOptions::new(RECORDS_PAGE_SIZE);
    let mut pages = 0usize;
    loop {
        let page = provider.list_records(zone, &options).await?;
        pages += 1;

        let next = page.next_cursor().map(str::to_string);
        if let Some(record) = page
            .records
            .into_iter()
            .find(|record| is_challenge_record(record, subdomain, &quoted_key))
        {
            tracing::debug!(zone, subdomain, record_id = %record.id, pages, "Found TXT record");
            return Ok(Some(record));
        }

        match next {
            Some(cursor) => options.cursor = Some(cursor),
            None => break,
        }
    }

    tracing::debug!(zone, subdomain, pages, "No matching TXT record");
    Ok(None)
}
