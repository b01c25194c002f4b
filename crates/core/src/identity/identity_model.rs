//! Identity domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered account. `invited_by` is the one-level delegation pointer:
/// an invited sponsor spends the inviting user's funds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub invited_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input model for creating a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub id: Option<String>,
    pub invited_by: Option<String>,
}

/// Links a git email seen in attribution results to an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitIdentity {
    pub git_email: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

/// The resolved paying identity for a sponsor's settlement. Contribution
/// rows keep `sponsor_id`; the share is drawn from `paying_user_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingSource {
    pub sponsor_id: String,
    pub paying_user_id: String,
}
