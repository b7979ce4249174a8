pub mod handlers;
pub mod types;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::shared::AppState;

/// Every route the dashboard backend serves
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/context", get(handlers::get_context))
        .route("/groups", get(handlers::list_groups))
        .route("/entities", get(handlers::list_entities))
        .route("/entities/:kind/:name/recent", get(handlers::get_recent))
        .route("/entities/:kind/:name/form", get(handlers::get_form))
        .route("/windows", get(handlers::get_windows))
        .route("/table", get(handlers::get_table))
        .route("/points", get(handlers::get_points))
        .route("/standings", get(handlers::get_standings))
        .route("/reload", post(handlers::reload))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
