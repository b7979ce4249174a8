use thiserror::Error;

use super::metrics::MetricKey;

#[derive(Debug, Error, PartialEq)]
pub enum StatsError {
    #[error("Metric {metric} does not support {operation}")]
    UnsupportedMetric {
        metric: MetricKey,
        operation: &'static str,
    },

    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    #[error("Invalid record for {driver} ({season} #{race}): {reason}")]
    InvalidRecord {
        driver: String,
        season: i32,
        race: u32,
        reason: String,
    },
}
