//! # evently-api
//!
//! HTTP surface for evently: routing, error envelope, request ids, CORS and
//! access logging around an [`EventService`].

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod telemetry;

use axum::http::{header, HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    map_response_body::MapResponseBodyLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use evently_core::defaults;
use evently_core::EventService;

pub use config::{ServerConfig, StoreBackend};
pub use error::ApiError;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub events: EventService,
}

impl AppState {
    pub fn new(events: EventService) -> Self {
        Self { events }
    }
}

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Parse a comma-separated origin list. Invalid entries are skipped with a
/// warning; an empty list falls back to the default origin.
pub fn parse_allowed_origins(raw: &str) -> Vec<HeaderValue> {
    let origins: Vec<HeaderValue> = raw
        .split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::warn!("Invalid CORS origin '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect();

    if origins.is_empty() {
        vec![HeaderValue::from_static(defaults::CORS_ORIGIN)]
    } else {
        origins
    }
}

fn cors_layer(cors_origin: &str) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(parse_allowed_origins(cors_origin)))
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
        .allow_credentials(true)
}

/// Build the application router.
pub fn router(state: AppState, cors_origin: &str) -> Router {
    use handlers::events::*;

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/events", get(list_events).post(create_event))
        .route("/events/categories", get(list_categories))
        .route(
            "/events/:id",
            get(get_event).patch(update_event).delete(delete_event),
        )
        .route("/events/:id/similar", get(similar_events))
        .fallback(handlers::route_not_found)
        .layer(
            ServiceBuilder::new()
                .layer(cors_layer(cors_origin))
                .layer(MapResponseBodyLayer::new(axum::body::Body::new))
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn(middleware::request_log)),
        )
        .with_state(state)
}
