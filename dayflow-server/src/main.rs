//! dayflow-server — HR management backend
//!
//! Long-running service that:
//! - Authenticates employees and admins (JWT sessions)
//! - Records per-day attendance with an idempotent mark operation
//! - Runs the leave request lifecycle (PENDING → APPROVED/REJECTED)
//! - Manages employee accounts and profiles (admin)

mod api;
mod auth;
mod config;
mod db;
mod state;
mod util;
mod validation;

use config::Config;
use state::AppState;
use std::net::SocketAddr;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dayflow_server=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting dayflow-server (env: {})", config.environment);

    // Initialize application state (connects + runs migrations)
    let state = AppState::new(&config).await?;

    let app = api::create_router(state.clone());

    // Periodic rate limiter cleanup (every 5 minutes)
    let limiter = state.rate_limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(300));
        loop {
            interval.tick().await;
            limiter.cleanup().await;
        }
    });

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("dayflow-server listening on {addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
