//! Fire-and-forget notifications, deduplicated per (recipient, kind, cycle).

mod notifications_model;
mod notifications_service;
mod notifications_traits;


pub use notifications_model::NotificationKind;
pub use notifications_service::NotificationService;
pub use notifications_traits::{NotificationLogRepositoryTrait, NotificationSinkTrait};
