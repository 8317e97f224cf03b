//! Issue Tracker REST API Server
//!
//! Serves the project-scoped issue store over HTTP. Storage location,
//! bind address, and the legacy default project name come from CLI flags
//! and an optional `config.toml` at the data root.

mod routes;

use anyhow::Result;
use axum::Router;
use clap::Parser;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use tracker::storage::JsonFileStorage;
use tracker::{IssueService, TrackerConfig};

#[derive(Debug, Parser)]
#[command(name = "tracker-server", about = "REST API server for the issue tracker")]
struct Args {
    /// Directory holding issue data and config.toml
    #[arg(long, env = "TRACKER_DATA_DIR", default_value = ".tracker")]
    data_dir: String,

    /// Bind address, overriding the config file
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();

    info!("Starting issue tracker API server...");

    let config = TrackerConfig::load(&args.data_dir)?;

    let storage = JsonFileStorage::new(&args.data_dir);
    let service = IssueService::new(storage).with_default_project(config.default_project());
    service.init().map_err(|e| {
        anyhow::anyhow!(
            "Failed to initialize storage at {}: {}",
            args.data_dir,
            e
        )
    })?;

    info!("Using issue store at: {}", args.data_dir);
    let service = Arc::new(service);

    // Build CORS layer for local development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        .merge(routes::create_routes(service))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http());

    // Start server
    let addr = args.bind.unwrap_or_else(|| config.bind_addr());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
