//! HTTP API
//!
//! Routes:
//! - `GET /api/current`: cached price as `{"currentPrice": "..."}`
//! - `POST /api/register`: device registration
//! - `GET /`: landing page
//! - `/resources/*`: static files
//!
//! API routes answer any other method, HEAD included, with a plain-text 405.

mod error;
mod handlers;

pub use error::ApiError;
pub use handlers::{CurrentPriceResponse, RegisterRequest};

use crate::config::ServerConfig;
use crate::price::QueryService;
use crate::store::DeviceStore;
use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, timeout::TimeoutLayer, trace::TraceLayer};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub query: QueryService,
    pub store: Arc<dyn DeviceStore>,
}

impl AppState {
    pub fn new(query: QueryService, store: Arc<dyn DeviceStore>) -> Self {
        Self { query, store }
    }
}

/// Build the application router
pub fn router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route(
            "/api/current",
            get(handlers::current_price)
                .head(handlers::method_not_allowed)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/register",
            post(handlers::register).fallback(handlers::method_not_allowed),
        )
        .route(
            "/",
            get(handlers::home)
                .head(handlers::method_not_allowed)
                .fallback(handlers::method_not_allowed),
        )
        .nest_service("/resources", ServeDir::new(&config.resources_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    config.request_timeout(),
                )),
        )
        .with_state(state)
}
