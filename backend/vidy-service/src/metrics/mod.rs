//! Prometheus metrics for vidy-service.
//!
//! Exposes HTTP and domain collectors plus the handler for `/metrics`.

use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};

lazy_static! {
    /// HTTP requests by method, route template and status code.
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "vidy_http_requests_total",
        "Total HTTP requests segmented by method, route and status",
        &["method", "route", "status"]
    )
    .expect("failed to register vidy_http_requests_total");

    /// HTTP request latency by method and route template.
    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "vidy_http_request_duration_seconds",
        "HTTP request duration segmented by method and route",
        &["method", "route"]
    )
    .expect("failed to register vidy_http_request_duration_seconds");

    /// Media uploads by kind and outcome.
    pub static ref MEDIA_UPLOADS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "vidy_media_uploads_total",
        "Media uploads segmented by kind and result",
        &["kind", "result"]
    )
    .expect("failed to register vidy_media_uploads_total");

    /// Authentication attempts by flow and outcome.
    pub static ref AUTH_EVENTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "vidy_auth_events_total",
        "Authentication events segmented by flow and result",
        &["flow", "result"]
    )
    .expect("failed to register vidy_auth_events_total");
}

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
