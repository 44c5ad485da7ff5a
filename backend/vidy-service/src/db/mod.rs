/// Database access layer
///
/// Repositories are free functions over `&PgPool`, grouped per table, that
/// return `sqlx::Error` and leave HTTP mapping to `AppError`.
pub mod comment_repo;
pub mod dashboard_repo;
pub mod like_repo;
pub mod playlist_repo;
pub mod subscription_repo;
pub mod tweet_repo;
pub mod user_repo;
pub mod video_repo;

use crate::config::DatabaseConfig;
use sqlx::migrate::Migrator;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Open the connection pool
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(600))
        .test_before_acquire(true)
        .connect(&config.url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Escape `%`, `_` and `\` so user input matches literally inside `ILIKE`
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
