mod api_doc;
mod config;
mod error;
mod handlers;
mod models;
mod routes;
mod service;
mod state;
mod store;

use std::sync::Arc;

use anyhow::Context;
use config::{Config, StoreBackend};
use service::TodoService;
use state::AppState;
use store::{MemoryStore, SpannerStore, TodoStore};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    tracing::info!("spanner-todo-api starting");

    let config = Config::from_env()?;
    config.log_startup();

    let store: Arc<dyn TodoStore> = match &config.store {
        StoreBackend::Spanner(spanner) => Arc::new(SpannerStore::from_config(spanner).await?),
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
    };

    let state = AppState {
        todos: TodoService::new(store, config.store_timeout),
    };
    let app = routes::app(state);

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    tracing::info!("Listening on {}", address);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("spanner-todo-api stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
