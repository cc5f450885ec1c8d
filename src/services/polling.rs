//! Adaptive polling cadence
//!
//! Tells clients how long to wait before asking for an investigation's status
//! again: promptly while it runs, rarely once it can no longer change.

use std::time::Duration;

use crate::config::EventFeedConfig;
use crate::models::{InvestigationStatus, StatusClass};
use crate::schemas::PollingAdvice;

/// Maps an investigation status to a client poll interval
#[derive(Debug, Clone, Copy, Default)]
pub struct AdaptivePollingCalculator {
    config: EventFeedConfig,
}

impl AdaptivePollingCalculator {
    pub fn new(config: EventFeedConfig) -> Self {
        Self { config }
    }

    /// Seconds to wait before polling again. Total over all inputs.
    pub fn calculate_interval(&self, status: &str) -> u64 {
        self.interval_for_class(StatusClass::classify(status))
    }

    pub fn interval_for(&self, status: InvestigationStatus) -> u64 {
        self.interval_for_class(status.class())
    }

    pub fn interval_for_class(&self, class: StatusClass) -> u64 {
        match class {
            StatusClass::Active => self.config.active_poll_interval,
            StatusClass::Terminal => self.config.idle_poll_interval,
            StatusClass::Unknown => self.config.poll_interval,
        }
    }

    pub fn poll_duration(&self, status: &str) -> Duration {
        Duration::from_secs(self.calculate_interval(status))
    }

    pub fn is_active_status(&self, status: &str) -> bool {
        StatusClass::classify(status) == StatusClass::Active
    }

    pub fn is_terminal_status(&self, status: &str) -> bool {
        StatusClass::classify(status) == StatusClass::Terminal
    }

    pub fn advise(&self, status: &str) -> PollingAdvice {
        let class = StatusClass::classify(status);
        PollingAdvice {
            status: status.to_string(),
            class,
            is_terminal: class == StatusClass::Terminal,
            poll_after_seconds: self.interval_for_class(class),
        }
    }
}
