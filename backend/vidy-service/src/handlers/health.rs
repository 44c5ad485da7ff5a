/// Liveness and readiness endpoints
use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Instant;
use utoipa::ToSchema;

use crate::response::ApiResponse;
use crate::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ComponentCheck {
    pub status: ComponentStatus,
    pub message: String,
    pub latency_ms: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub status: ComponentStatus,
    pub checks: HashMap<String, ComponentCheck>,
    pub timestamp: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Liveness probe; never touches dependencies
#[utoipa::path(
    get,
    path = "/api/v1/healthcheck",
    tag = "health",
    responses((status = 200, description = "Service is alive", body = HealthStatus))
)]
pub async fn healthcheck() -> HttpResponse {
    ApiResponse::ok(
        HealthStatus {
            status: "ok".to_string(),
            service: "vidy-service".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        "Health check passed",
    )
}

/// Readiness probe; PostgreSQL must answer, the media store may degrade
#[utoipa::path(
    get,
    path = "/api/v1/health/ready",
    tag = "health",
    responses(
        (status = 200, description = "Ready to serve traffic", body = ReadinessResponse),
        (status = 503, description = "Database unavailable", body = ReadinessResponse)
    )
)]
pub async fn readiness(state: web::Data<AppState>) -> HttpResponse {
    let mut checks = HashMap::new();

    let start = Instant::now();
    let pg_result = sqlx::query("SELECT 1").execute(&state.db).await;
    let ready = pg_result.is_ok();
    checks.insert(
        "postgresql".to_string(),
        ComponentCheck {
            status: if ready {
                ComponentStatus::Healthy
            } else {
                ComponentStatus::Unhealthy
            },
            message: match &pg_result {
                Ok(_) => "PostgreSQL connection successful".to_string(),
                Err(e) => {
                    tracing::warn!(error = %e, "readiness: PostgreSQL check failed");
                    "PostgreSQL connection failed".to_string()
                }
            },
            latency_ms: start.elapsed().as_millis() as u64,
        },
    );

    let start = Instant::now();
    let media_result = state.media.health_check().await;
    let media_ok = media_result.is_ok();
    checks.insert(
        "media_store".to_string(),
        ComponentCheck {
            status: if media_ok {
                ComponentStatus::Healthy
            } else {
                ComponentStatus::Degraded
            },
            message: match &media_result {
                Ok(_) => "Media store reachable".to_string(),
                Err(e) => {
                    tracing::warn!(error = %e, "readiness: media store check failed");
                    "Media store check failed".to_string()
                }
            },
            latency_ms: start.elapsed().as_millis() as u64,
        },
    );

    let status = match (ready, media_ok) {
        (false, _) => ComponentStatus::Unhealthy,
        (true, false) => ComponentStatus::Degraded,
        (true, true) => ComponentStatus::Healthy,
    };

    let response = ReadinessResponse {
        ready,
        status,
        checks,
        timestamp: Utc::now().to_rfc3339(),
    };

    if ready {
        HttpResponse::Ok().json(response)
    } else {
        tracing::warn!("readiness check failed");
        HttpResponse::ServiceUnavailable().json(response)
    }
}
