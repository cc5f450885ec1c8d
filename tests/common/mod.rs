//! Test helpers for building investigations and services.

#![allow(dead_code)]

use std::sync::Arc;

use investigation_progress::models::Investigation;
use investigation_progress::services::{ProgressCalculatorService, ProgressUpdateService};

/// Phase with no tool records yet
pub const NO_TOOLS: &[(&str, &str)] = &[];

/// Progress update service backed by the default calculator
pub fn update_service() -> ProgressUpdateService {
    ProgressUpdateService::new(Arc::new(ProgressCalculatorService::default()))
}

/// Investigation with the given phases, each holding `(tool, status)` records in order
pub fn investigation_with(phases: &[(&str, &[(&str, &str)])]) -> Investigation {
    let mut investigation = Investigation::new();
    for (phase_name, tools) in phases {
        investigation.progress.start_phase(phase_name);
        for (tool, status) in tools.iter() {
            investigation
                .progress
                .apply_tool_status(phase_name, tool, status);
        }
    }
    investigation
}

/// Tool names of a phase in list order
pub fn tool_names(investigation: &Investigation, phase_name: &str) -> Vec<String> {
    investigation
        .progress
        .phase(phase_name)
        .map(|phase| {
            phase
                .tools_executed
                .iter()
                .map(|t| t.tool_name.clone())
                .collect()
        })
        .unwrap_or_default()
}
