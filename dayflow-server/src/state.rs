//! Application state for dayflow-server

use sqlx::PgPool;

use crate::auth::rate_limit::RateLimiter;
use crate::config::Config;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// JWT secret for session and verification tokens
    pub jwt_secret: String,
    /// Rate limiter for signin/signup routes
    pub rate_limiter: RateLimiter,
}

impl AppState {
    /// Create a new AppState: connect the pool and run migrations
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPool::connect(&config.database_url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self {
            pool,
            jwt_secret: config.jwt_secret.clone(),
            rate_limiter: RateLimiter::new(),
        })
    }
}
