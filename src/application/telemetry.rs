//! Tracing/logging setup
//!
//! Library code only emits `tracing` events; binaries embedding this crate
//! call [`init_tracing`] once at startup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Output format for the fmt layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Default filter directive when `RUST_LOG` is unset
pub fn default_filter(log_level: &str) -> String {
    format!("investigation_progress={}", log_level)
}

/// Initialize tracing/logging
///
/// Returns `false` when a global subscriber was already installed, which
/// happens when several tests or an embedding binary initialise first.
pub fn init_tracing(log_level: &str, format: LogFormat) -> bool {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(log_level).into());

    let registry = tracing_subscriber::registry().with(filter);

    let result = match format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_ansi(false))
            .try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
    };

    result.is_ok()
}
