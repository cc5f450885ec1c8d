use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Completion of a single phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseProgress {
    pub phase_name: String,
    pub total_tools: usize,
    pub completed_tools: usize,
    pub percentage: f64,
}

/// Recalculated progress of an investigation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSummary {
    /// 0 to 100
    pub overall_percentage: f64,
    pub total_tools: usize,
    pub completed_tools: usize,
    pub phases: Vec<PhaseProgress>,
    pub calculated_at: DateTime<Utc>,
}

impl ProgressSummary {
    pub fn phase(&self, phase_name: &str) -> Option<&PhaseProgress> {
        self.phases.iter().find(|p| p.phase_name == phase_name)
    }
}
