//! # TaskTrack API Server
//!
//! Multi-user project and task tracker over HTTP. Every project and task is
//! owned by the user that created it and is only visible to that user.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/tasktrack \
//! JWT_SECRET=$(openssl rand -hex 32) \
//! cargo run -p tasktrack-api
//! ```

use anyhow::Context;
use tasktrack_api::{
    app::{build_router, AppState},
    config::Config,
};
use tasktrack_shared::db::{migrations::run_migrations, pool::create_pool};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tasktrack_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "TaskTrack API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let pool = create_pool(&config.database.pool_config())
        .await
        .context("Failed to connect to database")?;

    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let bind_address = config.bind_address();
    if config.api.production {
        tracing::info!("Running in production mode");
    }

    let app = build_router(AppState::new(pool, config));

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}
