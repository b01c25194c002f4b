//! SQLite storage implementation for the fairshare settlement engine.
//!
//! This crate provides all database-related functionality using Diesel ORM
//! with SQLite. It implements the repository traits defined in
//! `fairshare-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for all domain entities
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place where Diesel dependencies exist. The core
//! crate is database-agnostic and works with traits.
//!
//! The invariants the core relies on live here as constraints:
//! - at most one open relationship event per (actor, repo, kind), via a
//!   partial unique index,
//! - one funding row per (external id, status),
//! - one daily contribution per (day, sponsor, repo, contributor, currency),
//! - one notification per (recipient, kind, cycle).
//!
//! All writes funnel through a single-writer actor holding one dedicated
//! connection, so every settlement run commits as one immediate transaction.

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod attribution;
pub mod contributions;
pub mod funding;
pub mod identity;
pub mod notifications;
pub mod relationships;

// Re-export database utilities
pub use db::{create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool, WriteHandle};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from fairshare-core for convenience
pub use fairshare_core::errors::{DatabaseError, Error, Result};
