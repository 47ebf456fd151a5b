use axum::{Router, routing::get};
use configuration::Settings;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use workbook::{DatasetCache, WorkbookSource};

pub mod error;
pub mod handlers;
pub mod models;

/// The shared application state that all handlers can access.
pub struct AppState {
    pub cache: DatasetCache,
    pub settings: Settings,
}

impl AppState {
    /// State backed by the workbook named in `settings`, loaded on first use.
    pub fn from_settings(settings: Settings) -> Self {
        let source = Arc::new(WorkbookSource::from_settings(&settings));
        Self {
            cache: DatasetCache::new(source),
            settings,
        }
    }
}

/// Builds the router with every endpoint and the request-logging middleware.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    Router::new()
        .route("/health", get(handlers::health))
        .route("/returns", get(handlers::get_returns))
        .route("/exposure-diff", get(handlers::get_exposure_diff))
        .route("/exposure", get(handlers::get_exposure))
        .with_state(state)
        .layer(cors)
        // Logs every incoming request.
        .layer(TraceLayer::new_for_http())
}

/// The main function to configure and run the web server.
///
/// Tracing must already be initialised by the caller.
pub async fn run_server(settings: Settings) -> anyhow::Result<()> {
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let preload = settings.data.preload;
    let state = Arc::new(AppState::from_settings(settings));

    if preload {
        let dataset = state.cache.get().await?;
        tracing::info!(
            returns_rows = dataset.returns.row_count(),
            constituent_rows = dataset.constituents.row_count(),
            "Dataset preloaded."
        );
    }

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    tracing::info!("Web server listening on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for the shutdown signal.");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received.");
}
