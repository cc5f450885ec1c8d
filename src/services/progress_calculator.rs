//! Overall progress calculation
//!
//! Add alternative weighting schemes by implementing `ProgressCalculator`.

use chrono::Utc;

use crate::config::ProgressConfig;
use crate::error::Result;
use crate::models::{Investigation, InvestigationStatus, Phase};
use crate::schemas::{PhaseProgress, ProgressSummary};

/// Trait for turning an investigation's progress tree into a summary
pub trait ProgressCalculator: Send + Sync {
    fn calculate_investigation_progress(&self, investigation: &Investigation)
        -> Result<ProgressSummary>;
}

/// Default calculator: every phase weighs the same, every tool within a
/// phase weighs the same.
#[derive(Debug, Clone, Default)]
pub struct ProgressCalculatorService {
    config: ProgressConfig,
}

impl ProgressCalculatorService {
    pub fn new(config: ProgressConfig) -> Self {
        Self { config }
    }

    /// Whether a tool status token means the tool will not run any further
    pub fn is_finished_tool_status(&self, status: &str) -> bool {
        self.config
            .finished_tool_statuses
            .iter()
            .any(|finished| finished.eq_ignore_ascii_case(status))
    }

    fn phase_progress(&self, phase: &Phase) -> PhaseProgress {
        let total_tools = phase.tools_executed.len();
        let completed_tools = phase
            .tools_executed
            .iter()
            .filter(|t| self.is_finished_tool_status(&t.status))
            .count();

        PhaseProgress {
            phase_name: phase.phase_name.clone(),
            total_tools,
            completed_tools,
            percentage: percentage(completed_tools as f64, total_tools as f64),
        }
    }
}

impl ProgressCalculator for ProgressCalculatorService {
    fn calculate_investigation_progress(
        &self,
        investigation: &Investigation,
    ) -> Result<ProgressSummary> {
        let phases: Vec<PhaseProgress> = investigation
            .progress
            .phases
            .iter()
            .map(|phase| self.phase_progress(phase))
            .collect();

        let overall_percentage = if investigation.status == InvestigationStatus::Completed {
            100.0
        } else if phases.is_empty() {
            0.0
        } else {
            let sum: f64 = phases.iter().map(|p| p.percentage).sum();
            round2((sum / phases.len() as f64).clamp(0.0, 100.0))
        };

        Ok(ProgressSummary {
            overall_percentage,
            total_tools: phases.iter().map(|p| p.total_tools).sum(),
            completed_tools: phases.iter().map(|p| p.completed_tools).sum(),
            phases,
            calculated_at: Utc::now(),
        })
    }
}

fn percentage(done: f64, total: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    round2((done / total * 100.0).clamp(0.0, 100.0))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
