//! Core traits for the DNS-01 solver
//!
//! This module defines the abstract interfaces to the solver's collaborators.
//!
//! - [`DnsProvider`]: A provider's zone-record API
//! - [`DnsProviderFactory`]: Builds authenticated provider handles
//! - [`SecretResolver`]: Looks up API credentials

pub mod dns_provider;
pub mod secret_resolver;

pub use dns_provider::{
    DnsProvider, DnsProviderFactory, ListOptions, NewRecord, RecordPage, RemoteRecord,
    TXT_RECORD_TYPE, Zone,
};
pub use secret_resolver::SecretResolver;
