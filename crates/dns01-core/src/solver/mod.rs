//! DNS-01 challenge solver
//!
//! The Dns01Solver is responsible for:
//! - Building one authenticated provider handle per request
//! - Checking that the target zone is administrable (Present only)
//! - Locating the challenge record
//! - Issuing at most one mutating call to converge the zone
//!
//! ## Architecture
//!
//! ```text
//!                    ┌───────────────────┐
//! ChallengeRequest ─▶│    Dns01Solver    │
//!                    └───────────────────┘
//!                              │
//!        ┌─────────────────────┼──────────────────────┐
//!        │                     │                      │
//!        ▼                     ▼                      ▼
//! ┌──────────────┐   ┌───────────────────┐   ┌──────────────┐
//! │SecretResolver│   │DnsProviderFactory │   │ DnsProvider  │
//! │ (api key)    │   │ (handle)          │   │ (zone/record)│
//! └──────────────┘   └───────────────────┘   └──────────────┘
//! ```
//!
//! ## Flow
//!
//! Present:
//! 1. Strip trailing dots from zone and FQDN
//! 2. Build the provider handle
//! 3. Check the zone exists
//! 4. Locate the record; if found, done
//! 5. Otherwise create it (TXT, TTL 60)
//!
//! CleanUp:
//! 1. Strip trailing dots from zone and FQDN
//! 2. Build the provider handle
//! 3. Locate the record; if absent, done
//! 4. Otherwise delete it by ID
//!
//! Both are idempotent: repeating a call with the same request converges to
//! the same zone state without errors. Nothing is retried here; a failed
//! call is reported and the framework re-invokes on its own schedule.

use std::sync::Arc;

use tracing::{Instrument, error, info, info_span};

use crate::client::build_client;
use crate::config::SolverConfig;
use crate::error::Result;
use crate::locator::find_txt_record;
use crate::request::{ChallengeAction, ChallengeRequest};
use crate::traits::{DnsProvider, DnsProviderFactory, NewRecord, SecretResolver};
use crate::zone::zone_exists;

/// TTL of created challenge records, in seconds
pub const CHALLENGE_TTL: u32 = 60;

/// What a successful call did to the zone
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChallengeOutcome {
    /// The TXT record was created
    Created {
        /// ID assigned by the provider
        record_id: String,
    },
    /// A matching TXT record already existed (no-op)
    AlreadyPresent {
        /// ID of the existing record
        record_id: String,
    },
    /// The matching TXT record was deleted
    Deleted {
        /// ID of the deleted record
        record_id: String,
    },
    /// No matching TXT record existed (no-op)
    AlreadyAbsent,
}

impl ChallengeOutcome {
    /// Whether the call issued a mutating request
    pub fn is_mutation(&self) -> bool {
        matches!(self, Self::Created { .. } | Self::Deleted { .. })
    }
}

/// DNS-01 challenge solver
///
/// Holds no per-request state, so one instance can serve concurrent requests
/// from many tasks. Concurrent calls for different keys at the same name do
/// not interfere: each only ever deletes the record carrying its own key.
pub struct Dns01Solver {
    /// Credential lookup
    resolver: Arc<dyn SecretResolver>,

    /// Builds provider handles
    factory: Arc<dyn DnsProviderFactory>,

    /// Process-level settings
    config: SolverConfig,
}

impl Dns01Solver {
    /// Create a new solver
    ///
    /// Fails if `config` does not validate (e.g. empty group name).
    pub fn new(
        resolver: Arc<dyn SecretResolver>,
        factory: Arc<dyn DnsProviderFactory>,
        config: SolverConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            resolver,
            factory,
            config,
        })
    }

    /// Solver name, unique within the group
    pub fn name(&self) -> &str {
        &self.config.solver_name
    }

    /// API group the solver serves
    pub fn group_name(&self) -> &str {
        &self.config.group_name
    }

    /// Dispatch a request according to its action
    pub async fn solve(&self, request: &ChallengeRequest) -> Result<ChallengeOutcome> {
        match request.action {
            ChallengeAction::Present => self.present(request).await,
            ChallengeAction::CleanUp => self.clean_up(request).await,
        }
    }

    /// Make sure the challenge TXT record exists
    pub async fn present(&self, request: &ChallengeRequest) -> Result<ChallengeOutcome> {
        let zone = request.zone();
        let fqdn = request.fqdn();
        let span = info_span!(
            "present",
            uid = %request.uid,
            zone,
            fqdn,
            key = %request.key
        );
        self.present_in_zone(request, zone, fqdn)
            .instrument(span)
            .await
    }

    /// Make sure the challenge TXT record for this key is gone
    ///
    /// Other TXT records at the same name (other keys) are left alone.
    pub async fn clean_up(&self, request: &ChallengeRequest) -> Result<ChallengeOutcome> {
        let zone = request.zone();
        let fqdn = request.fqdn();
        let span = info_span!("clean_up", uid = %request.uid, zone, fqdn);
        self.clean_up_in_zone(request, zone, fqdn)
            .instrument(span)
            .await
    }

    async fn present_in_zone(
        &self,
        request: &ChallengeRequest,
        zone: &str,
        fqdn: &str,
    ) -> Result<ChallengeOutcome> {
        let provider = self.client(request).await?;

        // Never create records in a zone we could not confirm
        zone_exists(provider.as_ref(), zone)
            .await
            .inspect_err(|e| error!(error = %e, "Zone check failed"))?;

        let existing = find_txt_record(provider.as_ref(), zone, fqdn, &request.key)
            .await
            .inspect_err(|e| error!(error = %e, "Error getting DNS records"))?;

        if let Some(record) = existing {
            info!(record_id = %record.id, "Record exists");
            return Ok(ChallengeOutcome::AlreadyPresent {
                record_id: record.id,
            });
        }

        info!("Creating TXT record");
        let record = NewRecord::txt(fqdn, request.key.as_str(), CHALLENGE_TTL);
        let created = provider
            .create_record(zone, &record)
            .await
            .inspect_err(|e| error!(error = %e, "Error creating record"))?;

        info!(record_id = %created.id, "Record created");
        Ok(ChallengeOutcome::Created {
            record_id: created.id,
        })
    }

    async fn clean_up_in_zone(
        &self,
        request: &ChallengeRequest,
        zone: &str,
        fqdn: &str,
    ) -> Result<ChallengeOutcome> {
        let provider = self.client(request).await?;

        let existing = find_txt_record(provider.as_ref(), zone, fqdn, &request.key)
            .await
            .inspect_err(|e| error!(error = %e, "Error getting DNS records"))?;

        let Some(record) = existing else {
            info!("Record doesn't exist");
            return Ok(ChallengeOutcome::AlreadyAbsent);
        };

        provider
            .delete_record(zone, &record.id)
            .await
            .inspect_err(|e| error!(error = %e, record_id = %record.id, "Error deleting record"))?;

        info!(record_id = %record.id, "Record deleted");
        Ok(ChallengeOutcome::Deleted {
            record_id: record.id,
        })
    }

    async fn client(&self, request: &ChallengeRequest) -> Result<Box<dyn DnsProvider>> {
        build_client(
            self.resolver.as_ref(),
            self.factory.as_ref(),
            request,
            self.config.credential_timeout,
        )
        .await
        .inspect_err(|e| {
            error!(
                error = %e,
                provider = self.factory.provider_name(),
                "Error creating provider client"
            )
        })
    }
}
