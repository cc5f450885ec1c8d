use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Lifecycle status of an investigation.
///
/// `InProgress` is the only non-terminal value. Once an investigation is
/// `Completed`, `Error` or `Cancelled` it never changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvestigationStatus {
    InProgress,
    Completed,
    Error,
    Cancelled,
}

impl InvestigationStatus {
    pub const ALL: [InvestigationStatus; 4] = [
        InvestigationStatus::InProgress,
        InvestigationStatus::Completed,
        InvestigationStatus::Error,
        InvestigationStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InvestigationStatus::InProgress => "IN_PROGRESS",
            InvestigationStatus::Completed => "COMPLETED",
            InvestigationStatus::Error => "ERROR",
            InvestigationStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn class(&self) -> StatusClass {
        match self {
            InvestigationStatus::InProgress => StatusClass::Active,
            _ => StatusClass::Terminal,
        }
    }

    pub fn is_active(&self) -> bool {
        self.class() == StatusClass::Active
    }

    pub fn is_terminal(&self) -> bool {
        self.class() == StatusClass::Terminal
    }

    /// Whether moving from `self` to `next` is allowed.
    ///
    /// Re-asserting `InProgress` is a no-op; nothing leaves a terminal state.
    pub fn can_transition_to(&self, next: InvestigationStatus) -> bool {
        matches!((self, next), (InvestigationStatus::InProgress, _))
    }
}

impl fmt::Display for InvestigationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvestigationStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InvestigationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| AppError::UnknownStatus(s.to_string()))
    }
}

/// Polling classification of a raw status string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusClass {
    /// The investigation is still changing
    Active,
    /// The investigation will not change anymore
    Terminal,
    /// Not a recognised status
    Unknown,
}

impl StatusClass {
    /// Classify a raw status string. Matching is exact: `"in_progress"` is unknown.
    pub fn classify(status: &str) -> Self {
        status
            .parse::<InvestigationStatus>()
            .map(|s| s.class())
            .unwrap_or(StatusClass::Unknown)
    }
}
