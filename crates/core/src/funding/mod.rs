//! Funding ledger - append-only pay-in events and the spend strategy.

mod funding_errors;
mod funding_model;
mod funding_service;
mod funding_traits;


pub use funding_errors::FundingError;
pub use funding_model::{FundingEvent, FundingStatus, NewFundingEvent, SpendStrategy};
pub use funding_service::FundingService;
pub use funding_traits::{FundingRepositoryTrait, FundingServiceTrait};
