pub mod application;
pub mod models;
pub mod schemas;
pub mod services;

// Re-export from application for convenience
pub use application::config;
pub use application::error;
pub use application::state;
pub use application::telemetry;
