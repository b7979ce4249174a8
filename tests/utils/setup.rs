#![allow(dead_code)] // Test utilities may not all be used in every test

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt; // for `oneshot`

use racedash::{
    api,
    store::{DatasetSource, JsonDirectorySource},
    AppConfig, AppState, DatasetSnapshot,
};

use super::builders::DataDirBuilder;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub dir: TempDir,
    pub app: Router,
}

impl TestSetup {
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send("GET", uri).await
    }

    pub async fn post(&self, uri: &str) -> (StatusCode, Value) {
        self.send("POST", uri).await
    }

    /// Rewrites the data directory, e.g. before exercising reload
    pub fn rewrite_data(&self, data: &DataDirBuilder) {
        data.write_to(self.dir.path());
    }

    async fn send(&self, method: &str, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }
}

pub struct TestSetupBuilder {
    data: DataDirBuilder,
    min_year: i32,
}

impl TestSetupBuilder {
    pub fn new(data: DataDirBuilder) -> Self {
        Self {
            data,
            min_year: 2022,
        }
    }

    pub fn with_min_year(mut self, min_year: i32) -> Self {
        self.min_year = min_year;
        self
    }

    /// Writes the data directory, loads it like `main` does and builds the router
    pub async fn build(self) -> TestSetup {
        let dir = tempfile::tempdir().unwrap();
        self.data.write_to(dir.path());

        let source = Arc::new(JsonDirectorySource::new(dir.path()));
        let dataset = source.load().await.unwrap();

        let config = AppConfig {
            data_dir: dir.path().to_path_buf(),
            min_year: self.min_year,
            ..AppConfig::default()
        };
        let app = api::router(AppState::new(DatasetSnapshot::new(dataset), source, config));

        TestSetup { dir, app }
    }
}
