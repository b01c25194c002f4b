//! Attribution domain models.
//!
//! Weights are ratios over a repo's analysis window, never money. They stay
//! `f64` until the distribution engine converts the final ratio into an
//! integer amount.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One analysis window requested for a repo. `received_at` is set when the
/// external source delivers its result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributionRequest {
    pub id: String,
    pub repo_id: String,
    pub git_url: String,
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
    pub received_at: Option<DateTime<Utc>>,
}

/// A weighted git identity within one delivered window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributionEntry {
    pub id: String,
    pub request_id: String,
    pub git_email: String,
    pub git_names: Vec<String>,
    pub weight: f64,
}

/// An incoming weight from the external source, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributionWeight {
    pub git_email: String,
    pub git_names: Vec<String>,
    pub weight: f64,
}
