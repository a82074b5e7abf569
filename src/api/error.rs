//! API error types

use crate::store::StoreError;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Errors scoped to a single request
#[derive(Debug, Error)]
pub enum ApiError {
    /// Route exists but not for this method
    #[error("Method Not Allowed")]
    MethodNotAllowed,
    /// Request body could not be accepted
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
    /// Cache has not been seeded yet
    #[error("price not yet available")]
    PriceUnavailable,
    /// Response body could not be encoded
    #[error("response encoding failed: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Page could not be rendered
    #[error("page rendering failed: {0}")]
    Render(#[from] std::fmt::Error),
    /// Registration could not be stored
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            Self::PriceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Serialization(_) | Self::Render(_) | Self::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            Self::MethodNotAllowed => plain_text(status, "Method Not Allowed"),
            Self::PriceUnavailable => plain_text(status, "Price Not Available"),
            Self::Serialization(e) => {
                tracing::error!(error = %e, "Failed to encode response");
                plain_text(status, "Internal Server Error")
            }
            Self::Render(e) => {
                tracing::error!(error = %e, "Failed to render page");
                plain_text(status, "Internal Server Error")
            }
            Self::InvalidPayload(msg) => {
                let body = serde_json::json!({ "error": msg });
                (status, Json(body)).into_response()
            }
            Self::Store(e) => {
                tracing::error!(error = %e, "Failed to store registration");
                let body = serde_json::json!({ "error": "registration could not be stored" });
                (status, Json(body)).into_response()
            }
        }
    }
}

fn plain_text(status: StatusCode, body: &'static str) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    )
        .into_response()
}
