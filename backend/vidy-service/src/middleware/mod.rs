/// HTTP middleware for vidy-service
///
/// JWT authentication for every protected scope, a per-IP limiter for the
/// credential endpoints, and request metrics.
pub mod permissions;
pub mod rate_limit;

pub use permissions::*;
pub use rate_limit::AuthRateLimiter;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{web, Error, FromRequest, HttpMessage, HttpRequest};
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::time::Instant;
use uuid::Uuid;

use crate::error::AppError;
use crate::metrics::{HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION_SECONDS};
use crate::security::TokenType;
use crate::AppState;

pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

// =====================================================================
// JWT Authentication
// =====================================================================

/// Authenticated user identifier stored in request extensions
#[derive(Debug, Clone, Copy)]
pub struct UserId(pub Uuid);

/// Access token from the `accessToken` cookie, else a Bearer header
pub fn access_token(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(ACCESS_TOKEN_COOKIE) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
}

/// Rejects requests without a valid access token
pub struct JwtAuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for JwtAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct JwtAuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            match authenticate(&req) {
                Ok(user_id) => {
                    req.extensions_mut().insert(user_id);
                    service.call(req).await.map(ServiceResponse::map_into_left_body)
                }
                Err(err) => {
                    tracing::debug!(path = %req.path(), error = %err, "request rejected by auth");
                    Ok(req.error_response(err).map_into_right_body())
                }
            }
        })
    }
}

/// Resolve the caller from the access token on the request
fn authenticate(req: &ServiceRequest) -> Result<UserId, AppError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::Internal("application state not configured".into()))?;

    let token = access_token(req.request())
        .ok_or_else(|| AppError::Unauthorized("Unauthorized request".into()))?;

    let claims = state.jwt.validate(&token, TokenType::Access)?;
    Ok(UserId(claims.sub))
}

impl FromRequest for UserId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<UserId>()
                .copied()
                .ok_or_else(|| AppError::Unauthorized("Unauthorized request".into()).into()),
        )
    }
}

// =====================================================================
// Metrics middleware
// =====================================================================

/// Records request counts and latencies per method, route and status
pub struct MetricsMiddleware;

impl<S, B> Transform<S, ServiceRequest> for MetricsMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = MetricsMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MetricsMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct MetricsMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for MetricsMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let method = req.method().to_string();
        let start = Instant::now();

        Box::pin(async move {
            let res = service.call(req).await;

            // path templates keep label cardinality bounded
            let (route, status) = match &res {
                Ok(res) => (
                    res.request()
                        .match_pattern()
                        .unwrap_or_else(|| "unmatched".to_string()),
                    res.status(),
                ),
                Err(err) => ("rejected".to_string(), err.as_response_error().status_code()),
            };

            let elapsed = start.elapsed();
            HTTP_REQUESTS_TOTAL
                .with_label_values(&[&method, &route, status.as_str()])
                .inc();
            HTTP_REQUEST_DURATION_SECONDS
                .with_label_values(&[&method, &route])
                .observe(elapsed.as_secs_f64());

            tracing::debug!(%method, %route, status = status.as_u16(), elapsed_ms = elapsed.as_millis() as u64, "request completed");
            res
        })
    }
}
