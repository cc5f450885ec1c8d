use thiserror::Error;
use uuid::Uuid;

use crate::models::InvestigationStatus;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unknown investigation status: {0}")]
    UnknownStatus(String),

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: InvestigationStatus,
        to: InvestigationStatus,
    },

    #[error("Investigation already finished: {id} ({status})")]
    AlreadyFinished {
        id: Uuid,
        status: InvestigationStatus,
    },

    #[error("Investigation not found: {0}")]
    InvestigationNotFound(Uuid),

    #[error("Progress calculation failed: {0}")]
    ProgressCalculation(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
