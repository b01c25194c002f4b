//! The settlement pipeline: share calculation, distribution, and the batch
//! orchestrator that runs them on the daily and hourly cadence.

mod calculator;
mod distribution;
mod orchestrator;
mod settlement_errors;



pub use calculator::{SettlementCalculator, Share};
pub use distribution::DistributionEngine;
pub use orchestrator::{BatchOrchestrator, DailyReport, HourlyReport, SettlementConfig};
pub use settlement_errors::SettlementError;
