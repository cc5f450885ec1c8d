use std::env;

use validator::Validate;

pub const DEFAULT_POLL_INTERVAL: u64 = 30;
pub const DEFAULT_IDLE_POLL_INTERVAL: u64 = 60;
pub const DEFAULT_ACTIVE_POLL_INTERVAL: u64 = 30;

/// Client polling cadence for the investigation event feed, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Validate)]
pub struct EventFeedConfig {
    /// Interval for statuses that are neither active nor terminal
    /// (env: `EVENT_FEED_POLL_INTERVAL`)
    #[validate(range(min = 1))]
    pub poll_interval: u64,
    /// Interval once an investigation is terminal (env: `EVENT_FEED_IDLE_POLL_INTERVAL`)
    #[validate(range(min = 1))]
    pub idle_poll_interval: u64,
    /// Interval while an investigation is running (env: `EVENT_FEED_ACTIVE_POLL_INTERVAL`)
    #[validate(range(min = 1))]
    pub active_poll_interval: u64,
}

impl EventFeedConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            poll_interval: read_interval(&lookup, "EVENT_FEED_POLL_INTERVAL", DEFAULT_POLL_INTERVAL),
            idle_poll_interval: read_interval(
                &lookup,
                "EVENT_FEED_IDLE_POLL_INTERVAL",
                DEFAULT_IDLE_POLL_INTERVAL,
            ),
            active_poll_interval: read_interval(
                &lookup,
                "EVENT_FEED_ACTIVE_POLL_INTERVAL",
                DEFAULT_ACTIVE_POLL_INTERVAL,
            ),
        }
    }
}

impl Default for EventFeedConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            idle_poll_interval: DEFAULT_IDLE_POLL_INTERVAL,
            active_poll_interval: DEFAULT_ACTIVE_POLL_INTERVAL,
        }
    }
}

/// Parse a positive number of seconds, falling back to `default` when the
/// variable is unset, unparsable or zero.
fn read_interval<F>(lookup: &F, key: &str, default: u64) -> u64
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return default;
    };

    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => secs,
        _ => {
            tracing::warn!(key, value = %raw, default, "Invalid poll interval, using default");
            default
        }
    }
}
