use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

use crate::config::AppConfig;
use crate::stats::{StatsError, StatsService};
use crate::store::{DatasetSnapshot, DatasetSource, StoreError};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub snapshot: DatasetSnapshot,
    pub source: Arc<dyn DatasetSource>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(snapshot: DatasetSnapshot, source: Arc<dyn DatasetSource>, config: AppConfig) -> Self {
        Self {
            snapshot,
            source,
            config,
        }
    }

    /// A stats service bound to the dataset current at call time
    pub async fn stats(&self) -> StatsService {
        StatsService::builder(self.snapshot.current().await)
            .with_min_year(self.config.min_year)
            .build()
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Stats(#[from] StatsError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Stats(e @ (StatsError::UnsupportedMetric { .. } | StatsError::UnknownMetric(_))) => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            AppError::Stats(e) => {
                error!(error = %e, "Aggregation failed");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            AppError::Store(e) => {
                error!(error = %e, "Dataset load failed");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    format!("Dataset unavailable: {}", e),
                )
            }
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
