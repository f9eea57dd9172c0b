// # dns01-core
//
// Core library for the idempotent DNS-01 challenge solver.
//
// ## Architecture Overview
//
// This library reconciles one ACME DNS-01 TXT record against a DNS
// provider's zone:
// - **SecretResolver**: Trait for looking up the provider API key
// - **DnsProvider**: Trait for the provider's zone-record API
// - **DnsProviderFactory**: Builds one authenticated DnsProvider per request
// - **Dns01Solver**: Present (create-if-absent) and CleanUp (delete-if-present)
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Reconciliation is separate from provider APIs
// 2. **Idempotency**: Repeating a request never errors and never double-writes
// 3. **At most one mutation**: Each call issues zero or one create/delete
// 4. **Stateless**: The provider is the only source of truth; nothing is cached
// 5. **Library-First**: The daemon is a thin layer over this crate

pub mod client;
pub mod config;
pub mod error;
pub mod locator;
pub mod request;
pub mod secrets;
pub mod solver;
pub mod traits;
pub mod zone;

// Re-export core types for convenience
pub use config::{ProviderConfig, SecretKeySelector, SolverConfig};
pub use error::{Error, Result};
pub use request::{ChallengeAction, ChallengeRequest};
pub use secrets::{FileSecretResolver, MemorySecretResolver};
pub use solver::{CHALLENGE_TTL, ChallengeOutcome, Dns01Solver};
pub use traits::{DnsProvider, DnsProviderFactory, SecretResolver};
