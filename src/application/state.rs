use std::sync::Arc;

use tokio::sync::broadcast;
use validator::Validate;

use crate::config::Config;
use crate::error::Result;
use crate::services::polling::AdaptivePollingCalculator;
use crate::services::progress_calculator::{ProgressCalculator, ProgressCalculatorService};
use crate::services::progress_update::{ProgressEvent, ProgressUpdateService};
use crate::services::registry::InvestigationRegistry;

/// Buffered progress events per subscriber before lagging ones drop messages
const PROGRESS_EVENT_CAPACITY: usize = 256;

/// Application state containing all shared services
#[derive(Clone)]
pub struct AppState {
    pub polling: AdaptivePollingCalculator,
    pub progress: ProgressUpdateService,
    pub registry: InvestigationRegistry,
}

impl AppState {
    pub fn new(
        polling: AdaptivePollingCalculator,
        calculator: Arc<dyn ProgressCalculator>,
    ) -> Self {
        let (events, _) = broadcast::channel::<ProgressEvent>(PROGRESS_EVENT_CAPACITY);
        let progress = ProgressUpdateService::new(calculator).with_events(events);
        let registry = InvestigationRegistry::new(polling, progress.clone());

        Self {
            polling,
            progress,
            registry,
        }
    }

    /// Validate `config` and build every service from it
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        tracing::info!(
            version = %config.version,
            poll_interval = config.event_feed.poll_interval,
            idle_poll_interval = config.event_feed.idle_poll_interval,
            active_poll_interval = config.event_feed.active_poll_interval,
            "Initialising investigation progress services"
        );

        Ok(Self::new(
            AdaptivePollingCalculator::new(config.event_feed),
            Arc::new(ProgressCalculatorService::new(config.progress.clone())),
        ))
    }
}
