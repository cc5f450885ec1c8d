//! Tool status reporting
//!
//! Applies `(phase, tool, status)` reports from the investigation pipeline to
//! the investigation's progress tree and recalculates overall progress after
//! every report, including reports that were dropped.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::error::Result;
use crate::models::progress::apply_tool_status_to_document;
use crate::models::{Investigation, ToolUpdate};
use crate::schemas::{ProgressSummary, ToolStatusUpdateResponse};
use crate::services::progress_calculator::ProgressCalculator;

/// Progress event published after each tool status report
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    ToolStatusChanged {
        investigation_id: Uuid,
        phase_name: String,
        tool_name: String,
        status: String,
        outcome: ToolUpdate,
        progress: ProgressSummary,
    },
}

/// Applies tool status reports and triggers progress recalculation
#[derive(Clone)]
pub struct ProgressUpdateService {
    calculator: Arc<dyn ProgressCalculator>,
    events: Option<broadcast::Sender<ProgressEvent>>,
}

impl ProgressUpdateService {
    pub fn new(calculator: Arc<dyn ProgressCalculator>) -> Self {
        Self {
            calculator,
            events: None,
        }
    }

    /// Publish a [`ProgressEvent`] on `sender` after every update
    pub fn with_events(mut self, sender: broadcast::Sender<ProgressEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    pub fn subscribe(&self) -> Option<broadcast::Receiver<ProgressEvent>> {
        self.events.as_ref().map(|tx| tx.subscribe())
    }

    /// Recalculate progress without applying a report
    pub fn recalculate(&self, investigation: &Investigation) -> Result<ProgressSummary> {
        self.calculator.calculate_investigation_progress(investigation)
    }

    /// Record `tool_status` for `tool_name` in `phase_name` and return the
    /// recalculated progress.
    ///
    /// A report for a phase that does not exist is dropped; the phase is not
    /// created. Errors from the progress calculator are returned as-is.
    pub fn update_phase_progress(
        &self,
        investigation: &mut Investigation,
        phase_name: &str,
        tool_name: &str,
        tool_status: &str,
    ) -> Result<ProgressSummary> {
        self.apply_update(investigation, phase_name, tool_name, tool_status)
            .map(|response| response.progress)
    }

    /// Same as [`Self::update_phase_progress`], also reporting what happened
    /// to the tree.
    pub fn apply_update(
        &self,
        investigation: &mut Investigation,
        phase_name: &str,
        tool_name: &str,
        tool_status: &str,
    ) -> Result<ToolStatusUpdateResponse> {
        let outcome = investigation
            .progress
            .apply_tool_status(phase_name, tool_name, tool_status);
        if outcome.is_applied() {
            investigation.touch();
        }
        log_outcome(investigation, phase_name, tool_name, tool_status, outcome);

        self.recalculate_and_publish(investigation, phase_name, tool_name, tool_status, outcome)
    }

    /// Apply a report to a stored investigation document in place.
    ///
    /// Only the matched tool's `status` changes, or one tool record is
    /// appended; every other key of the document is preserved for the caller
    /// to persist. A missing `progress` key or a malformed `phases` list turns
    /// the report into a dropped one instead of an error.
    pub fn update_document_progress(
        &self,
        document: &mut Value,
        phase_name: &str,
        tool_name: &str,
        tool_status: &str,
    ) -> Result<ToolStatusUpdateResponse> {
        let outcome =
            apply_tool_status_to_document(document, phase_name, tool_name, tool_status);
        let investigation = Investigation::from_document(document);
        log_outcome(&investigation, phase_name, tool_name, tool_status, outcome);

        self.recalculate_and_publish(&investigation, phase_name, tool_name, tool_status, outcome)
    }

    fn recalculate_and_publish(
        &self,
        investigation: &Investigation,
        phase_name: &str,
        tool_name: &str,
        tool_status: &str,
        outcome: ToolUpdate,
    ) -> Result<ToolStatusUpdateResponse> {
        let progress = self.recalculate(investigation)?;

        if let Some(tx) = &self.events {
            // No subscribers is fine
            let _ = tx.send(ProgressEvent::ToolStatusChanged {
                investigation_id: investigation.id,
                phase_name: phase_name.to_string(),
                tool_name: tool_name.to_string(),
                status: tool_status.to_string(),
                outcome,
                progress: progress.clone(),
            });
        }

        Ok(ToolStatusUpdateResponse { outcome, progress })
    }
}

fn log_outcome(
    investigation: &Investigation,
    phase_name: &str,
    tool_name: &str,
    tool_status: &str,
    outcome: ToolUpdate,
) {
    match outcome {
        ToolUpdate::PhaseNotFound => {
            tracing::debug!(
                investigation_id = %investigation.id,
                phase = phase_name,
                tool = tool_name,
                "Phase not found, dropping tool status report"
            );
        }
        ToolUpdate::Updated | ToolUpdate::Appended => {
            tracing::debug!(
                investigation_id = %investigation.id,
                phase = phase_name,
                tool = tool_name,
                status = tool_status,
                ?outcome,
                "Applied tool status"
            );
        }
    }
}
