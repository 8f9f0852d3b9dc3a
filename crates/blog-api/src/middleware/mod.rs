//! Middleware stack for the API server
//!
//! Request ids, tracing, timeouts, CORS, rate limiting and the request body
//! limit.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, Request, StatusCode},
    Router,
};
use blog_common::{AppError, CorsConfig, RateLimitConfig};
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::GlobalKeyExtractor, GovernorLayer,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

/// Header name for request ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Room for multipart boundaries and text fields on top of the image itself
const BODY_LIMIT_SLACK: usize = 64 * 1024;

/// Request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for [`apply_middleware`]
#[derive(Debug, Clone, Copy)]
pub struct MiddlewareConfig<'a> {
    pub rate_limit: &'a RateLimitConfig,
    pub cors: &'a CorsConfig,
    pub is_production: bool,
    /// Largest accepted image upload in bytes
    pub max_upload_bytes: usize,
}

/// Apply the middleware stack to the router
///
/// Request -> RateLimit -> RequestID -> Trace -> Timeout -> CORS -> BodyLimit -> Handler
pub fn apply_middleware(
    router: Router<AppState>,
    config: MiddlewareConfig<'_>,
) -> Result<Router<AppState>, AppError> {
    let invalid_rate_limit = || {
        AppError::Config(format!(
            "Invalid rate limit: {} requests/s, burst {}",
            config.rate_limit.requests_per_second, config.rate_limit.burst
        ))
    };
    if config.rate_limit.requests_per_second == 0 {
        return Err(invalid_rate_limit());
    }

    // One request is replenished per interval, `burst` may arrive at once
    let replenish_ms = (1000 / u64::from(config.rate_limit.requests_per_second)).max(1);
    let governor_conf = GovernorConfigBuilder::default()
        .per_millisecond(replenish_ms)
        .burst_size(config.rate_limit.burst)
        .key_extractor(GlobalKeyExtractor)
        .finish()
        .ok_or_else(invalid_rate_limit)?;

    // Layers wrap in reverse order: the last one added sees the request first
    Ok(router
        .layer(DefaultBodyLimit::max(
            config.max_upload_bytes.saturating_add(BODY_LIMIT_SLACK),
        ))
        .layer(create_cors_layer(config.cors, config.is_production))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::SERVICE_UNAVAILABLE,
            REQUEST_TIMEOUT,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .headers()
                        .get(REQUEST_ID_HEADER)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("unknown");

                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id,
                    )
                })
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(PropagateRequestIdLayer::new(header::HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        .layer(SetRequestIdLayer::new(
            header::HeaderName::from_static(REQUEST_ID_HEADER),
            MakeRequestUuid,
        ))
        .layer(GovernorLayer {
            config: Arc::new(governor_conf),
        }))
}

/// CORS from configuration
///
/// Outside production an empty origin list allows any origin; in production it
/// blocks cross-origin requests.
fn create_cors_layer(config: &CorsConfig, is_production: bool) -> CorsLayer {
    let base_layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .expose_headers([
            header::HeaderName::from_static(REQUEST_ID_HEADER),
            header::HeaderName::from_static("x-ratelimit-limit"),
            header::HeaderName::from_static("x-ratelimit-remaining"),
            header::HeaderName::from_static("x-ratelimit-reset"),
        ]);

    if config.allowed_origins.is_empty() {
        if is_production {
            tracing::warn!(
                "CORS: No allowed origins configured in production mode. \
                 Requests from browsers will be blocked."
            );
            return base_layer.allow_origin(AllowOrigin::list(Vec::<HeaderValue>::new()));
        }
        tracing::warn!(
            "CORS: Allowing any origin (development mode). \
             Configure CORS_ALLOWED_ORIGINS for production."
        );
        return base_layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    tracing::info!("CORS: Allowing {} configured origins", origins.len());
    base_layer.allow_origin(AllowOrigin::list(origins))
}
