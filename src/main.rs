use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use assessment_recommender::{
    api::AppState,
    client::{HttpApiClient, RecommendationApi},
    config::Config,
    frontend::FrontendState,
    services::{Catalog, Embedder, Recommender, TraceLog},
    startup::build_router,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let catalog = Catalog::load(&config.catalog_path)?;
    let embedder = build_embedder(&config)?;
    let recommender = Recommender::new(catalog, embedder)?;
    let trace_log = TraceLog::new(&config.logs_dir);
    let api_state = AppState::new(recommender, trace_log);

    let api_base_url = config.api_base_url();
    let api: Arc<dyn RecommendationApi> = Arc::new(HttpApiClient::new(&api_base_url));
    let frontend_state = FrontendState::new(api);

    let app = build_router(api_state, frontend_state, &config.static_dir);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(address = %addr, api_base_url = %api_base_url, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

#[cfg(feature = "fastembed")]
fn build_embedder(config: &Config) -> anyhow::Result<Arc<dyn Embedder>> {
    use assessment_recommender::services::FastEmbedder;
    Ok(Arc::new(FastEmbedder::new(&config.embedding_model)?))
}

#[cfg(not(feature = "fastembed"))]
fn build_embedder(config: &Config) -> anyhow::Result<Arc<dyn Embedder>> {
    use assessment_recommender::services::HashingEmbedder;
    tracing::info!(
        model = %config.embedding_model,
        "Built without fastembed; using the hashing embedder"
    );
    Ok(Arc::new(HashingEmbedder::default()))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
