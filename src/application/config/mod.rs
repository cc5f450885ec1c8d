pub mod event_feed;
pub mod progress;

use std::env;

use validator::Validate;

pub use event_feed::EventFeedConfig;
pub use progress::ProgressConfig;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone, Validate)]
pub struct Config {
    #[validate(nested)]
    pub event_feed: event_feed::EventFeedConfig,
    pub progress: progress::ProgressConfig,

    // Build info
    pub version: String,

    // Logging
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup instead of the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            event_feed: event_feed::EventFeedConfig::from_lookup(&lookup),
            progress: progress::ProgressConfig::from_lookup(&lookup),

            // Build info
            version: env!("CARGO_PKG_VERSION").to_string(),

            // Logging
            log_level: lookup("INVESTIGATION_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
