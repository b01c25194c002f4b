//! Relationship ledger - the {Open, Closed} state machine behind Sponsor,
//! Trust and Multiplier associations.

mod relationships_errors;
mod relationships_model;
mod relationships_service;
mod relationships_traits;


pub use relationships_errors::RelationshipError;
pub use relationships_model::{
    RelationshipChange, RelationshipEvent, RelationshipKind, SponsorSet,
};
pub use relationships_service::RelationshipService;
pub use relationships_traits::{RelationshipRepositoryTrait, RelationshipServiceTrait};
