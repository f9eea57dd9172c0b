// # Secret Resolver Implementations
//
// This module provides implementations of the SecretResolver trait for
// different credential sources.

pub mod file;
pub mod memory;

pub use file::FileSecretResolver;
pub use memory::MemorySecretResolver;
