// Main entry point - Dependency injection and server setup
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tracing_subscriber::EnvFilter;

use dashboard_studio::application::auth_service::AuthService;
use dashboard_studio::application::auth_session::AuthSession;
use dashboard_studio::application::dashboard_manager::DashboardManager;
use dashboard_studio::application::endpoint_service::EndpointService;
use dashboard_studio::application::store::StateStore;
use dashboard_studio::application::store_backend::StoreBackend;
use dashboard_studio::infrastructure::browser::SystemBrowser;
use dashboard_studio::infrastructure::config::load_app_config;
use dashboard_studio::infrastructure::http_endpoint_client::HttpEndpointClient;
use dashboard_studio::infrastructure::json_file_store::JsonFileStore;
use dashboard_studio::infrastructure::memory_store::MemoryStoreBackend;
use dashboard_studio::presentation::app_state::AppState;
use dashboard_studio::presentation::routes::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("dashboard_studio=info,tower_http=info")),
        )
        .init();

    // Load configuration
    let config = load_app_config()?;

    // Persistence backend (infrastructure layer)
    let backend: Arc<dyn StoreBackend> = if config.store.ephemeral {
        tracing::info!("Using in-memory store, state will not survive a restart");
        Arc::new(MemoryStoreBackend::default())
    } else {
        let file_store = JsonFileStore::new(&config.store.path);
        tracing::info!("Global store file path: {}", file_store.path().display());
        Arc::new(file_store)
    };

    // State store, loaded once before serving
    let store = Arc::new(StateStore::default());
    store.initialize(backend, &config.store.key).await;

    // Create services (application layer)
    let session = AuthSession::default();
    let endpoint_client = Arc::new(HttpEndpointClient::new(Duration::from_secs(
        config.endpoints.timeout_secs,
    ))?);
    let state = Arc::new(AppState {
        store: store.clone(),
        dashboards: DashboardManager::new(store.clone()),
        endpoint_service: EndpointService::new(store.clone(), endpoint_client, session.clone()),
        auth_service: AuthService::new(
            store.clone(),
            session,
            Arc::new(SystemBrowser),
            config.auth.clone(),
        ),
    });

    // Build router (presentation layer)
    let router = build_router(state);

    // Start server
    let addr: SocketAddr = config.server.bind_addr.parse()?;
    tracing::info!("Starting dashboard-studio on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Let queued snapshots reach the backend before exiting
    store.flush().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
