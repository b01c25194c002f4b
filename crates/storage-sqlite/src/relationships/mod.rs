//! SQLite storage implementation for the relationship ledger.

mod model;
mod repository;

pub use model::RelationshipEventDB;
pub use repository::RelationshipRepository;
