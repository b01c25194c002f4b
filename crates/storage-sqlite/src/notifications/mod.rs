//! SQLite storage implementation for the notification idempotency log.

mod model;
mod repository;

pub use model::NotificationDB;
pub use repository::NotificationLogRepository;
