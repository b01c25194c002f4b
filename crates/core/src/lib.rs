//! Fairshare Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic of the settlement engine: the
//! relationship ledger, the funding ledger and spend strategy, the
//! settlement calculator, the distribution engine, and the batch
//! orchestrator. It is database-agnostic and defines traits that are
//! implemented by the `storage-sqlite` crate. External collaborators
//! (attribution source, notification sink) enter through narrow traits as
//! well.

pub mod attribution;
pub mod contributions;
pub mod errors;
pub mod funding;
pub mod identity;
pub mod notifications;
pub mod relationships;
pub mod settlement;
pub mod utils;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
