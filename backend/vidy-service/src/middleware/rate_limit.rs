//! Per-IP rate limiting for credential endpoints
//!
//! Register, login and refresh share one keyed token bucket (`governor`),
//! sized by `RateLimitConfig::auth_per_minute`. Exceeding it yields 429.
//! Buckets are keyed on the peer address unless the deployment opts into
//! trusting `X-Forwarded-For`.

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::Error;
use futures_util::future::LocalBoxFuture;
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::future::{ready, Ready};
use std::net::IpAddr;
use std::num::NonZeroU32;
use std::rc::Rc;
use std::sync::Arc;

use crate::config::RateLimitConfig;
use crate::error::AppError;

/// Tracked clients before stale buckets are swept
const MAX_TRACKED_KEYS: usize = 10_000;

/// Middleware factory; clones share the same buckets
#[derive(Clone)]
pub struct AuthRateLimiter {
    limiter: Arc<DefaultKeyedRateLimiter<IpAddr>>,
    trust_forwarded_for: bool,
}

impl AuthRateLimiter {
    pub fn per_minute(requests: u32) -> Self {
        let quota = Quota::per_minute(NonZeroU32::new(requests).unwrap_or(NonZeroU32::MIN));
        Self {
            limiter: Arc::new(RateLimiter::keyed(quota)),
            trust_forwarded_for: false,
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::per_minute(config.auth_per_minute).trust_forwarded_for(config.trust_forwarded_for)
    }

    pub fn trust_forwarded_for(mut self, trust: bool) -> Self {
        self.trust_forwarded_for = trust;
        self
    }

    /// Consume one token for `ip`; false when the bucket is empty
    pub fn check(&self, ip: IpAddr) -> bool {
        if self.limiter.len() > MAX_TRACKED_KEYS {
            self.limiter.retain_recent();
        }
        self.limiter.check_key(&ip).is_ok()
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthRateLimiter
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthRateLimiterService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthRateLimiterService {
            service: Rc::new(service),
            limiter: self.clone(),
        }))
    }
}

pub struct AuthRateLimiterService<S> {
    service: Rc<S>,
    limiter: AuthRateLimiter,
}

impl<S, B> Service<ServiceRequest> for AuthRateLimiterService<S>
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
        let ip = client_ip(&req, self.limiter.trust_forwarded_for);

        if !self.limiter.check(ip) {
            tracing::warn!(%ip, path = %req.path(), "auth rate limit exceeded");
            let res = req.error_response(AppError::TooManyRequests);
            return Box::pin(async move { Ok(res.map_into_right_body()) });
        }

        let service = self.service.clone();
        Box::pin(async move { service.call(req).await.map(ServiceResponse::map_into_left_body) })
    }
}

/// Client IP: the peer address, or the first `X-Forwarded-For` hop when
/// `trust_forwarded` is set
fn client_ip(req: &ServiceRequest, trust_forwarded: bool) -> IpAddr {
    if let Some(forwarded) = req
        .headers()
        .get("X-Forwarded-For")
        .and_then(|h| h.to_str().ok())
        .filter(|_| trust_forwarded)
    {
        if let Some(ip) = forwarded
            .split(',')
            .next()
            .and_then(|first| first.trim().parse::<IpAddr>().ok())
        {
            return ip;
        }
    }

    req.peer_addr()
        .map(|addr| addr.ip())
        .unwrap_or(IpAddr::from([127, 0, 0, 1]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_bucket_exhausts_per_ip() {
        let limiter = AuthRateLimiter::per_minute(2);
        let a = IpAddr::from([10, 0, 0, 1]);
        let b = IpAddr::from([10, 0, 0, 2]);

        assert!(limiter.check(a));
        assert!(limiter.check(a));
        assert!(!limiter.check(a));
        assert!(limiter.check(b));
    }

    #[test]
    fn test_forwarded_for_takes_first_hop_when_trusted() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "203.0.113.7, 10.0.0.1"))
            .peer_addr("192.0.2.1:4000".parse().expect("addr"))
            .to_srv_request();
        assert_eq!(client_ip(&req, true), IpAddr::from([203, 0, 113, 7]));
    }

    #[test]
    fn test_forwarded_for_ignored_by_default() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "203.0.113.7"))
            .peer_addr("192.0.2.1:4000".parse().expect("addr"))
            .to_srv_request();
        assert_eq!(client_ip(&req, false), IpAddr::from([192, 0, 2, 1]));
    }

    #[test]
    fn test_from_config_defaults_to_peer_address() {
        let limiter = AuthRateLimiter::from_config(&crate::Config::for_tests().rate_limit);
        assert!(!limiter.trust_forwarded_for);
    }
}
