use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{InvestigationStatus, StatusClass, ToolUpdate};
use crate::schemas::progress::ProgressSummary;

/// Tool status report sent by the investigation pipeline
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ToolStatusUpdate {
    #[validate(length(min = 1))]
    pub phase_name: String,
    #[validate(length(min = 1))]
    pub tool_name: String,
    #[validate(length(min = 1))]
    pub status: String,
}

/// How soon a client should poll an investigation again
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PollingAdvice {
    pub status: String,
    pub class: StatusClass,
    pub is_terminal: bool,
    pub poll_after_seconds: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvestigationStatusResponse {
    pub investigation_id: Uuid,
    pub status: InvestigationStatus,
    pub is_terminal: bool,
    pub poll_after_seconds: u64,
    pub progress: ProgressSummary,
}

/// Result of applying a [`ToolStatusUpdate`]
#[derive(Debug, Clone, Serialize)]
pub struct ToolStatusUpdateResponse {
    pub outcome: ToolUpdate,
    pub progress: ProgressSummary,
}
