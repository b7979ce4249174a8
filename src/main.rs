use racedash::{api, AppConfig, AppState, DatasetSnapshot, JsonDirectorySource};
use racedash::store::DatasetSource;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "racedash=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();
    info!(data_dir = %config.data_dir.display(), min_year = config.min_year, "Starting racedash");

    let source = Arc::new(JsonDirectorySource::new(config.data_dir.clone()));
    let dataset = match source.load().await {
        Ok(dataset) => dataset,
        Err(e) => {
            error!(error = %e, "Could not load initial dataset");
            std::process::exit(1);
        }
    };

    let bind_addr = config.bind_addr.clone();
    let app_state = AppState::new(DatasetSnapshot::new(dataset), source, config);
    let app = api::router(app_state);

    let listener = match tokio::net::TcpListener::bind(&bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(error = %e, addr = %bind_addr, "Could not bind listener");
            std::process::exit(1);
        }
    };
    info!("Server running on http://{}", bind_addr);

    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "Server stopped");
    }
}
