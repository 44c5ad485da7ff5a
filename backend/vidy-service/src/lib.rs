/// Vidy Service Library
///
/// REST backend of the Vidy video-sharing platform: accounts, videos,
/// tweets, comments, likes, playlists, subscriptions and the creator
/// dashboard.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers, one module per resource
/// - `routes`: URL layout under `/api/v1`
/// - `services`: Multi-step flows (auth, uploads)
/// - `db`: Connection pool, migrations and repositories
/// - `models`: Rows, views and request bodies
/// - `middleware`: JWT auth, rate limiting, request metrics, ownership checks
/// - `security`: JWT signing and password hashing
/// - `error` / `response`: Failure and success envelopes
/// - `config`: Environment-driven configuration
/// - `metrics`: Prometheus collectors
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod response;
pub mod routes;
pub mod security;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};

use media_store::MediaStore;
use security::JwtKeys;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared handles injected into every handler through `web::Data`
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub media: Arc<dyn MediaStore>,
    pub jwt: JwtKeys,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: PgPool, media: Arc<dyn MediaStore>, config: Config) -> Self {
        Self {
            db,
            media,
            jwt: JwtKeys::from_config(&config.auth),
            config: Arc::new(config),
        }
    }
}
