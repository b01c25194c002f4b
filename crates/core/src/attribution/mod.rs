//! Attribution windows and weighted per-identity results, supplied by an
//! external analysis source.

mod attribution_model;
mod attribution_service;
mod attribution_traits;

#[cfg(test)]
mod attribution_service_tests;

pub use attribution_model::{AttributionEntry, AttributionRequest, AttributionWeight};
pub use attribution_service::AttributionService;
pub use attribution_traits::{
    AttributionRepositoryTrait, AttributionServiceTrait, AttributionSourceTrait,
};
