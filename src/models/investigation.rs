use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::investigation_status::InvestigationStatus;
use crate::models::progress::ProgressState;

/// A fraud-analysis workflow instance and the progress tree it owns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investigation {
    pub id: Uuid,
    pub status: InvestigationStatus,
    #[serde(default)]
    pub progress: ProgressState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Investigation {
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    pub fn with_id(id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id,
            status: InvestigationStatus::InProgress,
            progress: ProgressState::new(),
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    /// Rebuild an investigation from a loosely shaped stored document.
    ///
    /// Missing or unreadable fields fall back to a nil id, `IN_PROGRESS`
    /// and an empty progress tree.
    pub fn from_document(document: &Value) -> Self {
        let id = document
            .get("id")
            .and_then(Value::as_str)
            .and_then(|s| Uuid::parse_str(s).ok())
            .unwrap_or_else(Uuid::nil);
        let status = document
            .get("status")
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
            .unwrap_or(InvestigationStatus::InProgress);

        let mut investigation = Self::with_id(id);
        investigation.status = status;
        investigation.progress = ProgressState::from_document(document);
        investigation
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Move to `next`, refusing to leave a terminal state.
    pub fn transition_to(&mut self, next: InvestigationStatus) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(AppError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }

        let now = Utc::now();
        self.status = next;
        self.updated_at = now;
        if next.is_terminal() {
            self.completed_at = Some(now);
        }
        Ok(())
    }

    /// Bump `updated_at` after the progress tree was mutated.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for Investigation {
    fn default() -> Self {
        Self::new()
    }
}
