mod api;
mod middleware;
mod scheduler;

use std::sync::Arc;

use djournal_db::PgStore;
use djournal_sentiment::JournalInsights;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(djournal_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(env = %config.env, bind_addr = %config.bind_addr, "starting djournal-server");

    let pool_config = djournal_db::PoolConfig::from_app_config(&config);
    let pool = djournal_db::connect_pool(&config.database_url, pool_config).await?;
    let applied = djournal_db::run_migrations(&pool).await?;
    tracing::info!(applied, "migrations up to date");

    let insights = Arc::new(JournalInsights::new(PgStore::new(pool.clone())));
    warm_up_recommendations(&insights).await;

    let _scheduler =
        scheduler::build_scheduler(Arc::clone(&insights), Arc::clone(&config)).await?;

    let app = build_app(AppState {
        pool,
        insights,
        max_entry_images: config.max_entry_images,
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Compute recommendations once at startup and log them. Failure is not fatal.
async fn warm_up_recommendations(insights: &JournalInsights<PgStore>) {
    match insights.recommend().await {
        Ok(recommendations) => {
            tracing::info!(count = recommendations.len(), "startup recommendations computed");
            for rec in &recommendations {
                tracing::debug!(
                    location = %rec.location_name,
                    place = %rec.location_place,
                    match_score = rec.match_score,
                    "recommendation"
                );
            }
        }
        Err(e) => tracing::warn!(error = %e, "startup recommendations failed"),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
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
                tracing::error!(error = %e, "failed to install SIGTERM handler");
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
