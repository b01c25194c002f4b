//! SQLite storage implementation for attribution windows and results.

mod model;
mod repository;

pub use model::{AttributionEntryDB, AttributionRequestDB};
pub use repository::AttributionRepository;
