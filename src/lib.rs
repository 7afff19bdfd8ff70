//! devkey — device key derivation (library crate).
//!
//! Re-exports public modules for integration tests and external use.

pub mod cache;
pub mod config;
pub mod constants;
pub mod derive;
pub mod env;
pub mod output;
pub mod provision;
pub mod store;
