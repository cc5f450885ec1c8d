use std::env;

/// Tool status tokens that count a tool as finished when none are configured
pub const DEFAULT_FINISHED_TOOL_STATUSES: &[&str] = &[
    "success",
    "completed",
    "complete",
    "failed",
    "error",
    "skipped",
    "cancelled",
];

/// Configuration for the default progress calculator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressConfig {
    /// Lowercased tokens, parsed from `PROGRESS_FINISHED_TOOL_STATUSES` (comma-separated).
    /// When empty or unset, [`DEFAULT_FINISHED_TOOL_STATUSES`] applies.
    pub finished_tool_statuses: Vec<String>,
}

impl ProgressConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let finished_tool_statuses: Vec<String> = lookup("PROGRESS_FINISHED_TOOL_STATUSES")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_ascii_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        if finished_tool_statuses.is_empty() {
            return Self::default();
        }

        Self {
            finished_tool_statuses,
        }
    }
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            finished_tool_statuses: DEFAULT_FINISHED_TOOL_STATUSES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}
