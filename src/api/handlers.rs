//! Request handlers

use super::{ApiError, AppState};
use crate::store::DeviceRegistration;
use crate::telemetry::{self, CounterMetric};
use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    Json,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Body of `GET /api/current`
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct CurrentPriceResponse {
    #[serde(rename = "currentPrice")]
    pub current_price: Decimal,
}

/// Body of `POST /api/register`
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub id: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// Current cached price as JSON
pub async fn current_price(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let snapshot = state.query.current_price();
    if !snapshot.valid {
        return Err(ApiError::PriceUnavailable);
    }

    let body = serde_json::to_vec(&CurrentPriceResponse {
        current_price: snapshot.value,
    })?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    ))
}

/// Accept a device registration and hand it to the store
pub async fn register(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let request = match parse_registration(&body) {
        Ok(request) => request,
        Err(e) => {
            telemetry::increment(CounterMetric::RegistrationRejected);
            return Err(e);
        }
    };

    let registration = DeviceRegistration {
        id: request.id.trim().to_string(),
        registered_at: Utc::now(),
        metadata: request.metadata,
    };

    if let Err(e) = state.store.insert(&registration).await {
        telemetry::increment(CounterMetric::RegistrationFailed);
        return Err(e.into());
    }

    telemetry::increment(CounterMetric::RegistrationStored);
    tracing::info!(device_id = %registration.id, "Device registered");

    Ok((StatusCode::CREATED, Json(registration)))
}

fn parse_registration(body: &[u8]) -> Result<RegisterRequest, ApiError> {
    let request: RegisterRequest =
        serde_json::from_slice(body).map_err(|e| ApiError::InvalidPayload(e.to_string()))?;

    if request.id.trim().is_empty() {
        return Err(ApiError::InvalidPayload("id must not be empty".to_string()));
    }
    if !(request.metadata.is_object() || request.metadata.is_null()) {
        return Err(ApiError::InvalidPayload(
            "metadata must be an object".to_string(),
        ));
    }

    Ok(request)
}

/// Landing page showing the cached price
pub async fn home(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let snapshot = state.query.current_price();
    let mut page = String::new();

    writeln!(page, "<!DOCTYPE html>")?;
    writeln!(page, "<html><head><meta charset=\"utf-8\"><title>CoinAlert</title>")?;
    writeln!(
        page,
        "<link rel=\"stylesheet\" href=\"/resources/css/main.css\"></head>"
    )?;
    writeln!(page, "<body><h1>CoinAlert</h1>")?;
    if snapshot.valid {
        writeln!(
            page,
            "<p>BTC: <span id=\"price\">${}</span></p>",
            snapshot.value
        )?;
        writeln!(
            page,
            "<p><small>Updated {}</small></p>",
            snapshot.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
    } else {
        writeln!(page, "<p>Price not yet available</p>")?;
    }
    writeln!(page, "</body></html>")?;

    Ok(Html(page))
}

/// Fallback for routes hit with the wrong method
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
