//! Phase/tool progress tree owned by an investigation.
//!
//! The tree is a last-write-wins store keyed by `(phase_name, tool_name)`.
//! Phases keep pipeline order and tools keep execution order; neither is
//! ever reordered by an update.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Latest reported status of one tool within a phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolStatusRecord {
    pub tool_name: String,
    /// Caller-defined token such as `pending`, `running` or `success`
    pub status: String,
}

impl ToolStatusRecord {
    pub fn new(tool_name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            status: status.into(),
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        Some(Self::new(
            value.get("tool_name")?.as_str()?,
            value.get("status")?.as_str()?,
        ))
    }
}

/// One named stage of the investigation pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub phase_name: String,
    #[serde(default)]
    pub tools_executed: Vec<ToolStatusRecord>,
}

/// What applying a tool status report did to the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolUpdate {
    /// An existing record was overwritten in place
    Updated,
    /// A new record was appended to the phase
    Appended,
    /// No phase with that name exists; the report was dropped
    PhaseNotFound,
}

impl ToolUpdate {
    pub fn is_applied(&self) -> bool {
        !matches!(self, ToolUpdate::PhaseNotFound)
    }
}

impl Phase {
    pub fn new(phase_name: impl Into<String>) -> Self {
        Self {
            phase_name: phase_name.into(),
            tools_executed: Vec::new(),
        }
    }

    pub fn tool(&self, tool_name: &str) -> Option<&ToolStatusRecord> {
        self.tools_executed.iter().find(|t| t.tool_name == tool_name)
    }

    /// Overwrite the first record named `tool_name`, or append one at the end.
    pub fn record_tool_status(&mut self, tool_name: &str, status: &str) -> ToolUpdate {
        match self
            .tools_executed
            .iter_mut()
            .find(|t| t.tool_name == tool_name)
        {
            Some(record) => {
                record.status = status.to_string();
                ToolUpdate::Updated
            }
            None => {
                self.tools_executed
                    .push(ToolStatusRecord::new(tool_name, status));
                ToolUpdate::Appended
            }
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        let phase_name = value.get("phase_name")?.as_str()?;
        let tools_executed = value
            .get("tools_executed")
            .and_then(Value::as_array)
            .map(|tools| tools.iter().filter_map(ToolStatusRecord::from_value).collect())
            .unwrap_or_default();

        Some(Self {
            phase_name: phase_name.to_string(),
            tools_executed,
        })
    }
}

/// Ordered list of phases for one investigation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
    #[serde(default)]
    pub phases: Vec<Phase>,
}

impl ProgressState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self, phase_name: &str) -> Option<&Phase> {
        self.phases.iter().find(|p| p.phase_name == phase_name)
    }

    pub fn phase_mut(&mut self, phase_name: &str) -> Option<&mut Phase> {
        self.phases.iter_mut().find(|p| p.phase_name == phase_name)
    }

    /// Register a phase at the end of the pipeline.
    ///
    /// Returns `false` without touching anything if the name is taken.
    pub fn start_phase(&mut self, phase_name: &str) -> bool {
        if self.phase(phase_name).is_some() {
            return false;
        }
        self.phases.push(Phase::new(phase_name));
        true
    }

    /// Apply a tool status report. Unknown phases are never created here.
    pub fn apply_tool_status(
        &mut self,
        phase_name: &str,
        tool_name: &str,
        tool_status: &str,
    ) -> ToolUpdate {
        match self.phase_mut(phase_name) {
            Some(phase) => phase.record_tool_status(tool_name, tool_status),
            None => ToolUpdate::PhaseNotFound,
        }
    }

    pub fn tool_count(&self) -> usize {
        self.phases.iter().map(|p| p.tools_executed.len()).sum()
    }

    /// Read `progress.phases` out of a stored investigation document.
    ///
    /// Never fails: a missing `progress` key or a non-array `phases` yields an
    /// empty state, and malformed phase or tool entries are skipped.
    pub fn from_document(document: &Value) -> Self {
        let Some(phases) = document
            .get("progress")
            .and_then(|progress| progress.get("phases"))
            .and_then(Value::as_array)
        else {
            return Self::default();
        };

        Self {
            phases: phases.iter().filter_map(Phase::from_value).collect(),
        }
    }
}

/// Apply a tool status report directly to a stored investigation document.
///
/// Mirrors [`ProgressState::apply_tool_status`] but edits the JSON in place,
/// so keys this crate does not model survive the update. A missing
/// `progress` key, a non-array `phases`, or a matched phase whose
/// `tools_executed` is not an array drops the report.
pub fn apply_tool_status_to_document(
    document: &mut Value,
    phase_name: &str,
    tool_name: &str,
    tool_status: &str,
) -> ToolUpdate {
    let Some(phase) = document
        .get_mut("progress")
        .and_then(|progress| progress.get_mut("phases"))
        .and_then(Value::as_array_mut)
        .and_then(|phases| {
            phases
                .iter_mut()
                .find(|p| p.get("phase_name").and_then(Value::as_str) == Some(phase_name))
        })
        .and_then(Value::as_object_mut)
    else {
        return ToolUpdate::PhaseNotFound;
    };

    let Some(tools) = phase
        .entry("tools_executed")
        .or_insert_with(|| Value::Array(Vec::new()))
        .as_array_mut()
    else {
        return ToolUpdate::PhaseNotFound;
    };

    match tools
        .iter_mut()
        .find(|t| t.get("tool_name").and_then(Value::as_str) == Some(tool_name))
    {
        Some(record) => {
            record["status"] = Value::String(tool_status.to_string());
            ToolUpdate::Updated
        }
        None => {
            tools.push(serde_json::json!({
                "tool_name": tool_name,
                "status": tool_status,
            }));
            ToolUpdate::Appended
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(phase: &Phase) -> Vec<&str> {
        phase
            .tools_executed
            .iter()
            .map(|t| t.tool_name.as_str())
            .collect()
    }

    #[test]
    fn test_record_overwrites_in_place() {
        let mut phase = Phase::new("network");
        phase.record_tool_status("a", "pending");
        phase.record_tool_status("b", "pending");

        assert_eq!(phase.record_tool_status("a", "success"), ToolUpdate::Updated);
        assert_eq!(names(&phase), vec!["a", "b"]);
        assert_eq!(phase.tool("a").map(|t| t.status.as_str()), Some("success"));
    }

    #[test]
    fn test_record_appends_new_tool() {
        let mut phase = Phase::new("network");
        phase.record_tool_status("a", "success");

        assert_eq!(phase.record_tool_status("b", "pending"), ToolUpdate::Appended);
        assert_eq!(names(&phase), vec!["a", "b"]);
    }

    #[test]
    fn test_status_tokens_are_not_validated() {
        let mut phase = Phase::new("p");
        phase.record_tool_status("t", "");
        phase.record_tool_status("t", "Weird Token!");
        assert_eq!(phase.tools_executed.len(), 1);
        assert_eq!(phase.tools_executed[0].status, "Weird Token!");
    }

    #[test]
    fn test_start_phase_keeps_names_unique() {
        let mut state = ProgressState::new();
        assert!(state.start_phase("device"));
        assert!(state.start_phase("location"));
        assert!(!state.start_phase("device"));

        let order: Vec<&str> = state.phases.iter().map(|p| p.phase_name.as_str()).collect();
        assert_eq!(order, vec!["device", "location"]);
    }

    #[test]
    fn test_apply_to_missing_phase_is_dropped() {
        let mut state = ProgressState::new();
        state.start_phase("device");
        let before = state.clone();

        let outcome = state.apply_tool_status("network", "x", "pending");

        assert_eq!(outcome, ToolUpdate::PhaseNotFound);
        assert!(!outcome.is_applied());
        assert_eq!(state, before);
    }

    #[test]
    fn test_from_document_reads_phases() {
        let doc = json!({
            "status": "IN_PROGRESS",
            "progress": {
                "phases": [
                    {
                        "phase_name": "snowflake_analysis",
                        "tools_executed": [
                            {"tool_name": "query_tool", "status": "pending"}
                        ]
                    },
                    {"phase_name": "device"}
                ]
            }
        });

        let state = ProgressState::from_document(&doc);
        assert_eq!(state.phases.len(), 2);
        assert_eq!(state.tool_count(), 1);
        assert!(state.phase("device").is_some_and(|p| p.tools_executed.is_empty()));
    }

    #[test]
    fn test_from_document_degrades_gracefully() {
        assert!(ProgressState::from_document(&json!({})).phases.is_empty());
        assert!(ProgressState::from_document(&json!({"progress": null})).phases.is_empty());
        assert!(ProgressState::from_document(&json!({"progress": {"phases": "nope"}}))
            .phases
            .is_empty());
        assert!(ProgressState::from_document(&json!([1, 2, 3])).phases.is_empty());

        let doc = json!({
            "progress": {
                "phases": [
                    42,
                    {"name": "missing phase_name"},
                    {
                        "phase_name": "ok",
                        "tools_executed": [
                            {"tool_name": "good", "status": "running"},
                            {"tool_name": "no_status"},
                            "garbage"
                        ]
                    }
                ]
            }
        });
        let state = ProgressState::from_document(&doc);
        assert_eq!(state.phases.len(), 1);
        assert_eq!(state.phases[0].tools_executed, vec![ToolStatusRecord::new("good", "running")]);
    }

    fn stored_document() -> Value {
        json!({
            "status": "IN_PROGRESS",
            "progress": {
                "current_phase": "device",
                "phases": [
                    {
                        "phase_name": "device",
                        "status": "running",
                        "started_at": "2026-01-01T00:00:00Z",
                        "tools_executed": [
                            {"tool_name": "a", "status": "pending", "duration_ms": 12},
                            {"tool_name": "b", "status": 3}
                        ]
                    },
                    {"phase_name": "legacy"}
                ]
            }
        })
    }

    #[test]
    fn test_document_missing_phase_is_untouched() {
        let mut doc = stored_document();
        let original = doc.clone();

        let outcome = apply_tool_status_to_document(&mut doc, "missing", "x", "pending");

        assert_eq!(outcome, ToolUpdate::PhaseNotFound);
        assert_eq!(doc, original);
    }

    #[test]
    fn test_document_update_only_changes_status() {
        let mut doc = stored_document();
        let mut expected = doc.clone();
        expected["progress"]["phases"][0]["tools_executed"][0]["status"] = json!("success");

        let outcome = apply_tool_status_to_document(&mut doc, "device", "a", "success");

        assert_eq!(outcome, ToolUpdate::Updated);
        assert_eq!(doc, expected);
    }

    #[test]
    fn test_document_overwrites_non_string_status() {
        let mut doc = stored_document();

        apply_tool_status_to_document(&mut doc, "device", "b", "running");

        let tools = doc["progress"]["phases"][0]["tools_executed"].as_array().unwrap();
        assert_eq!(tools.len(), 2);
        assert_eq!(tools[1], json!({"tool_name": "b", "status": "running"}));
    }

    #[test]
    fn test_document_appends_to_phase_without_tools_key() {
        let mut doc = stored_document();

        let outcome = apply_tool_status_to_document(&mut doc, "legacy", "c", "pending");

        assert_eq!(outcome, ToolUpdate::Appended);
        assert_eq!(
            doc["progress"]["phases"][1],
            json!({
                "phase_name": "legacy",
                "tools_executed": [{"tool_name": "c", "status": "pending"}]
            })
        );
    }

    #[test]
    fn test_document_with_malformed_tools_drops_report() {
        let mut doc = json!({
            "progress": {"phases": [{"phase_name": "p", "tools_executed": "oops"}]}
        });
        let original = doc.clone();

        let outcome = apply_tool_status_to_document(&mut doc, "p", "t", "success");

        assert_eq!(outcome, ToolUpdate::PhaseNotFound);
        assert_eq!(doc, original);
    }
}
