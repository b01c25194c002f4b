//! Notification domain models.

use serde::{Deserialize, Serialize};

use crate::errors::{Error, ValidationError};

/// The notification kinds the settlement engine emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    /// Funding covers one day or less.
    LowFunds,
    /// No currency covers a full day; distribution was skipped.
    OutOfFunds,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::LowFunds => "LOW_FUNDS",
            NotificationKind::OutOfFunds => "OUT_OF_FUNDS",
        }
    }
}

impl std::str::FromStr for NotificationKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOW_FUNDS" => Ok(NotificationKind::LowFunds),
            "OUT_OF_FUNDS" => Ok(NotificationKind::OutOfFunds),
            other => Err(ValidationError::InvalidInput(format!(
                "Unknown notification kind: {}",
                other
            ))
            .into()),
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
