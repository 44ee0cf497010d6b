//! HearthHerald event server binary entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use herald_common::config::AppConfig;
use herald_engine::handlers::TaskEventHandlers;
use herald_push::FcmClient;

use herald_server::routes::create_router;
use herald_server::state::AppState;
use herald_server::store::HttpDocumentStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("herald_server=info,herald_engine=info,tower_http=debug")
        }))
        .json()
        .init();

    tracing::info!("Starting HearthHerald event server...");

    // Load configuration
    let config = AppConfig::from_env()?;

    // One document-store client backs all three store collaborators
    let store = Arc::new(HttpDocumentStore::new(&config.doc_store_url));
    let transport = Arc::new(FcmClient::new(&config));

    let handlers = Arc::new(TaskEventHandlers::new(
        store.clone(),
        store.clone(),
        store.clone(),
        transport,
    ));

    // Build router
    let state = AppState::new(handlers);
    let app = create_router(state).layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    tracing::info!("Event server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Received shutdown signal, stopping gracefully...");
        })
        .await?;

    tracing::info!("HearthHerald event server stopped.");
    Ok(())
}
