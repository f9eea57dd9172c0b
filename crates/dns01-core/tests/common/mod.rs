//! Test doubles and common utilities for solver contract tests
//!
//! This module provides an in-memory zone that behaves like a paginated
//! provider API, plus call-counting factories and resolvers.

#![allow(dead_code)]

use dns01_core::error::{Error, Result};
use dns01_core::locator::relative_name;
use dns01_core::traits::{
    DnsProvider, DnsProviderFactory, ListOptions, NewRecord, RecordPage, RemoteRecord,
    SecretResolver, Zone,
};
use dns01_core::{
    ChallengeAction, ChallengeRequest, Dns01Solver, MemorySecretResolver, SolverConfig,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const ZONE: &str = "example.com";
pub const FQDN: &str = "_acme-challenge.example.com";
pub const NAMESPACE: &str = "cert-manager";
pub const SECRET_NAME: &str = "vultr-credentials";
pub const SECRET_KEY: &str = "apiKey";
pub const API_KEY: &str = "test-api-key";

#[derive(Default)]
struct FakeZoneState {
    records: Mutex<Vec<RemoteRecord>>,
    next_id: AtomicUsize,
    get_zone_calls: AtomicUsize,
    list_calls: AtomicUsize,
    create_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    zone_missing: Mutex<bool>,
    fail_list_on_call: Mutex<Option<usize>>,
    fail_create: Mutex<bool>,
    fail_delete: Mutex<bool>,
}

/// An in-memory zone served through the DnsProvider trait
///
/// Behaves like the real API where it matters to the solver:
/// - records are paged by `per_page` with an opaque cursor
/// - the final page carries an empty cursor
/// - created TXT payloads are stored wrapped in quotes
/// - created names are stored relative to the zone
#[derive(Clone)]
pub struct FakeZone {
    zone: String,
    state: Arc<FakeZoneState>,
}

impl FakeZone {
    pub fn new(zone: &str) -> Self {
        Self {
            zone: zone.to_string(),
            state: Arc::new(FakeZoneState::default()),
        }
    }

    /// Seed a record exactly as the provider would return it
    pub fn with_record(self, name: &str, record_type: &str, data: &str) -> Self {
        let id = self.next_id();
        self.state.records.lock().unwrap().push(RemoteRecord {
            id,
            name: name.to_string(),
            record_type: record_type.to_string(),
            data: data.to_string(),
            ttl: Some(300),
            priority: None,
        });
        self
    }

    /// Seed `count` unrelated A records
    pub fn with_filler(mut self, count: usize) -> Self {
        for i in 0..count {
            self = self.with_record(&format!("host-{}", i), "A", "192.0.2.1");
        }
        self
    }

    /// Make get_zone fail with 404
    pub fn with_zone_missing(self) -> Self {
        *self.state.zone_missing.lock().unwrap() = true;
        self
    }

    /// Make the n-th list call (1-based) fail
    pub fn with_list_failure_on_call(self, call: usize) -> Self {
        *self.state.fail_list_on_call.lock().unwrap() = Some(call);
        self
    }

    pub fn with_create_failure(self) -> Self {
        *self.state.fail_create.lock().unwrap() = true;
        self
    }

    pub fn with_delete_failure(self) -> Self {
        *self.state.fail_delete.lock().unwrap() = true;
        self
    }

    fn next_id(&self) -> String {
        format!("rec-{}", self.state.next_id.fetch_add(1, Ordering::SeqCst))
    }

    pub fn records(&self) -> Vec<RemoteRecord> {
        self.state.records.lock().unwrap().clone()
    }

    pub fn txt_records(&self) -> Vec<RemoteRecord> {
        self.records()
            .into_iter()
            .filter(|r| r.record_type == "TXT")
            .collect()
    }

    pub fn get_zone_calls(&self) -> usize {
        self.state.get_zone_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.state.list_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.state.create_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.state.delete_calls.load(Ordering::SeqCst)
    }

    pub fn mutation_calls(&self) -> usize {
        self.create_calls() + self.delete_calls()
    }

    pub fn network_calls(&self) -> usize {
        self.get_zone_calls() + self.list_calls() + self.mutation_calls()
    }
}

#[async_trait::async_trait]
impl DnsProvider for FakeZone {
    async fn get_zone(&self, zone: &str) -> Result<Zone> {
        self.state.get_zone_calls.fetch_add(1, Ordering::SeqCst);
        if *self.state.zone_missing.lock().unwrap() || zone != self.zone {
            return Err(Error::provider_status("fake", 404, "zone not found"));
        }
        Ok(Zone {
            name: zone.to_string(),
            extra: serde_json::Value::Null,
        })
    }

    async fn list_records(&self, zone: &str, options: &ListOptions) -> Result<RecordPage> {
        let call = self.state.list_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if *self.state.fail_list_on_call.lock().unwrap() == Some(call) {
            return Err(Error::provider_status("fake", 500, "list failed"));
        }
        if zone != self.zone {
            return Err(Error::provider_status("fake", 404, "zone not found"));
        }

        let offset = match &options.cursor {
            None => 0,
            Some(cursor) => cursor
                .strip_prefix("offset:")
                .and_then(|n| n.parse::<usize>().ok())
                .ok_or_else(|| Error::provider_status("fake", 400, "invalid cursor"))?,
        };
        let per_page = options.per_page as usize;

        let records = self.state.records.lock().unwrap();
        let end = (offset + per_page).min(records.len());
        let page = records[offset.min(end)..end].to_vec();
        let next = if end < records.len() {
            format!("offset:{}", end)
        } else {
            String::new()
        };

        Ok(RecordPage {
            records: page,
            next: Some(next),
        })
    }

    async fn create_record(&self, zone: &str, record: &NewRecord) -> Result<RemoteRecord> {
        self.state.create_calls.fetch_add(1, Ordering::SeqCst);
        if *self.state.fail_create.lock().unwrap() {
            return Err(Error::provider_status("fake", 500, "create failed"));
        }

        let data = if record.record_type == "TXT" {
            format!("\"{}\"", record.data)
        } else {
            record.data.clone()
        };
        let created = RemoteRecord {
            id: self.next_id(),
            name: relative_name(&record.name, zone).to_string(),
            record_type: record.record_type.clone(),
            data,
            ttl: Some(record.ttl),
            priority: None,
        };
        self.state.records.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn delete_record(&self, _zone: &str, record_id: &str) -> Result<()> {
        self.state.delete_calls.fetch_add(1, Ordering::SeqCst);
        if *self.state.fail_delete.lock().unwrap() {
            return Err(Error::provider_status("fake", 500, "delete failed"));
        }

        let mut records = self.state.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.id != record_id);
        if records.len() == before {
            return Err(Error::provider_status("fake", 404, "record not found"));
        }
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}

/// A factory that hands out handles onto one FakeZone and counts calls
pub struct MockProviderFactory {
    zone: FakeZone,
    create_call_count: Arc<AtomicUsize>,
    api_keys: Arc<Mutex<Vec<String>>>,
}

impl MockProviderFactory {
    pub fn new(zone: FakeZone) -> Self {
        Self {
            zone,
            create_call_count: Arc::new(AtomicUsize::new(0)),
            api_keys: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of handles built
    pub fn create_call_count(&self) -> usize {
        self.create_call_count.load(Ordering::SeqCst)
    }

    /// API keys the handles were built with
    pub fn api_keys(&self) -> Vec<String> {
        self.api_keys.lock().unwrap().clone()
    }

    /// Create a new factory that shares counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            zone: other.zone.clone(),
            create_call_count: Arc::clone(&other.create_call_count),
            api_keys: Arc::clone(&other.api_keys),
        }
    }
}

impl DnsProviderFactory for MockProviderFactory {
    fn create(&self, api_key: &str) -> Result<Box<dyn DnsProvider>> {
        self.create_call_count.fetch_add(1, Ordering::SeqCst);
        self.api_keys.lock().unwrap().push(api_key.to_string());
        Ok(Box::new(self.zone.clone()))
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}

/// A resolver wrapper that counts lookups and can be slowed down
pub struct CountingResolver {
    inner: MemorySecretResolver,
    call_count: Arc<AtomicUsize>,
    delay: Option<Duration>,
}

impl CountingResolver {
    pub fn new(inner: MemorySecretResolver) -> Self {
        Self {
            inner,
            call_count: Arc::new(AtomicUsize::new(0)),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            inner: other.inner.clone(),
            call_count: Arc::clone(&other.call_count),
            delay: other.delay,
        }
    }
}

#[async_trait::async_trait]
impl SecretResolver for CountingResolver {
    async fn resolve(&self, namespace: &str, name: &str, key: &str) -> Result<Option<Vec<u8>>> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.inner.resolve(namespace, name, key).await
    }
}

/// Resolver holding the standard test secret
pub async fn resolver_with_api_key(value: &str) -> MemorySecretResolver {
    let resolver = MemorySecretResolver::new();
    resolver
        .insert(NAMESPACE, SECRET_NAME, SECRET_KEY, value)
        .await;
    resolver
}

/// Request for the standard zone/FQDN, trailing dots included
pub fn challenge_request(action: ChallengeAction, key: &str) -> ChallengeRequest {
    ChallengeRequest {
        uid: "test-uid".to_string(),
        action,
        dns_name: ZONE.to_string(),
        key: key.to_string(),
        resource_namespace: NAMESPACE.to_string(),
        resolved_fqdn: format!("{}.", FQDN),
        resolved_zone: format!("{}.", ZONE),
        config: Some(serde_json::json!({
            "apiKeySecretRef": {"name": SECRET_NAME, "key": SECRET_KEY}
        })),
    }
}

/// Test harness: a solver wired to a FakeZone with observable counters
pub struct Harness {
    pub solver: Dns01Solver,
    pub zone: FakeZone,
    pub factory: Arc<MockProviderFactory>,
    pub resolver: Arc<CountingResolver>,
}

impl Harness {
    pub async fn new(zone: FakeZone) -> Self {
        let resolver = CountingResolver::new(resolver_with_api_key(API_KEY).await);
        Self::with_resolver(zone, resolver, SolverConfig::new("acme.example.com"))
    }

    pub fn with_resolver(zone: FakeZone, resolver: CountingResolver, config: SolverConfig) -> Self {
        let factory = Arc::new(MockProviderFactory::new(zone.clone()));
        let resolver = Arc::new(resolver);
        let solver = Dns01Solver::new(
            Arc::new(CountingResolver::sharing_counters_with(&resolver)),
            Arc::new(MockProviderFactory::sharing_counters_with(&factory)),
            config,
        )
        .expect("solver construction succeeds");

        Self {
            solver,
            zone,
            factory,
            resolver,
        }
    }
}
