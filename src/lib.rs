// Library crate for the racedash statistics backend
// This file exposes the public API for integration tests

pub mod api;
pub mod config;
pub mod selector;
pub mod shared;
pub mod stats;
pub mod store;

// Re-export commonly used types for easier access in tests
pub use config::AppConfig;
pub use shared::{AppError, AppState};
pub use stats::{MetricKey, RaceFilter, StatValue, StatsService};
pub use store::{Dataset, DatasetSnapshot, JsonDirectorySource};
