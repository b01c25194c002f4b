//! SQLite storage implementation for the funding ledger.

mod model;
mod repository;

pub use model::FundingEventDB;
pub use repository::FundingRepository;
