//! SQLite storage implementation for the contribution ledger.

mod model;
mod repository;

pub use model::{DailyContributionDB, FutureContributionDB, UnclaimedContributionDB};
pub use repository::ContributionRepository;
