mod api;
mod middleware;

use std::sync::Arc;

use pharmaloc_search::{
    CandidateRetriever, PgCatalogStore, ResolveOptions, SearchConfig, SearchService,
};
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, default_rate_limit_state, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = pharmaloc_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let dataset = pharmaloc_core::load_fallback_dataset(config.fallback_path.as_deref())?;
    tracing::info!(
        pharmacies = dataset.pharmacies.len(),
        medicines = dataset.medicines.len(),
        "fallback dataset loaded"
    );

    let pool = connect_store(&config).await?;
    let store = pool.clone().map(PgCatalogStore::new);
    let retriever = CandidateRetriever::new(store, SearchConfig::from_app_config(&config, dataset));

    let state = AppState {
        service: Arc::new(SearchService::new(retriever)),
        pool,
        resolve_options: ResolveOptions::from_app_config(&config),
        default_location: config.default_location,
    };
    let app = build_app(state, default_rate_limit_state());

    tracing::info!(bind_addr = %config.bind_addr, env = %config.env, "starting server");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Connect and migrate the catalog store when it is enabled.
///
/// An unreachable database is not fatal: searches fall back to the bundled
/// dataset. A reachable database whose migrations fail is.
async fn connect_store(
    config: &pharmaloc_core::AppConfig,
) -> anyhow::Result<Option<sqlx::PgPool>> {
    if !config.store_enabled() {
        tracing::info!("catalog store disabled; serving the fallback dataset");
        return Ok(None);
    }
    match pharmaloc_db::connect_from_app_config(config).await {
        Ok(pool) => {
            let applied = pharmaloc_db::run_migrations(&pool).await?;
            tracing::info!(applied, "catalog store connected");
            Ok(Some(pool))
        }
        Err(error) => {
            tracing::warn!(%error, "catalog store unreachable; serving the fallback dataset");
            Ok(None)
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!(%error, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
