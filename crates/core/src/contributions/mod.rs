//! Contribution ledger - settled daily rows, parked future rows, unclaimed
//! notionals, and the exposed balance queries.

mod contributions_model;
mod contributions_service;
mod contributions_traits;


pub use contributions_model::{
    CurrencyBalance, DailyContribution, FutureContribution, SettlementRun, UnclaimedContribution,
};
pub use contributions_service::ContributionService;
pub use contributions_traits::{ContributionRepositoryTrait, ContributionServiceTrait};
