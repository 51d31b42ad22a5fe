//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for the aggregation logic.

use axum::{
    extract::{Query, State},
    Json,
};

use super::dto::{FleetQuery, HealthResponse, IngestResponse, TideQuery, WeatherQuery, WindRoseQuery};
use super::error::AppError;
use super::state::AppState;
use crate::services;
use crate::services::observations::ObservationField;
use crate::services::tide::TideSeriesParams;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the store is
/// accessible.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Ingestion
// =============================================================================

/// POST /v1/positions
///
/// Ingest a batch of raw position reports. Individual failures are
/// diverted to the error log; the call succeeds with the counts.
pub async fn post_positions(
    State(state): State<AppState>,
    Json(batch): Json<Vec<serde_json::Value>>,
) -> Result<(axum::http::StatusCode, Json<IngestResponse>), AppError> {
    let outcome = services::ingest_batch(state.repository.as_ref(), &batch).await?;

    Ok((
        axum::http::StatusCode::CREATED,
        Json(IngestResponse {
            accepted: outcome.accepted,
            rejected: outcome.rejected,
        }),
    ))
}

// =============================================================================
// Fleet
// =============================================================================

/// GET /v1/fleet
///
/// Binned, joined, and segmented vessel tracks for the requested window.
pub async fn get_fleet(
    State(state): State<AppState>,
    Query(query): Query<FleetQuery>,
) -> HandlerResult<crate::api::FleetData> {
    let params = query.resolve(&state.settings);
    let data = services::fleet_tracks(
        state.repository.as_ref(),
        &params,
        state.settings.aggregation.outage_multiplier,
    )
    .await?;

    Ok(Json(data))
}

// =============================================================================
// Tide
// =============================================================================

/// GET /v1/tide
///
/// Tide heights and extremes for the requested window.
pub async fn get_tide(
    State(state): State<AppState>,
    Query(query): Query<TideQuery>,
) -> HandlerResult<crate::api::TideData> {
    let params = query.resolve();
    let data = services::tide_series(
        state.repository.as_ref(),
        &params,
        &state.settings.series.station,
        state.settings.series.tide_cap,
    )
    .await?;

    Ok(Json(data))
}

/// GET /v1/tide/now
///
/// Interpolated current tide height and the bracketing extremes. When the
/// stored series does not bracket the current instant the `now` field is
/// absent rather than extrapolated.
pub async fn get_tide_now(
    State(state): State<AppState>,
    Query(query): Query<TideQuery>,
) -> HandlerResult<crate::api::TideNowData> {
    let at = chrono::Utc::now().timestamp();
    let window = state.settings.series.tide_window_hours * 3600;

    let resolved = query.resolve();
    let params = TideSeriesParams {
        from: resolved.from.or(Some(at - window)),
        to: resolved.to.or(Some(at + window)),
        limit: resolved.limit,
        offset: resolved.offset.or(Some(state.settings.series.height_offset)),
    };

    let data = services::tide_now(
        state.repository.as_ref(),
        at,
        &params,
        &state.settings.series.station,
        state.settings.series.tide_cap,
    )
    .await?;

    Ok(Json(data))
}

// =============================================================================
// Weather
// =============================================================================

/// GET /v1/weather
///
/// Scalar observation series. The `field` selector is mandatory.
pub async fn get_weather(
    State(state): State<AppState>,
    Query(query): Query<WeatherQuery>,
) -> HandlerResult<crate::api::ObservationSeries> {
    let field: ObservationField = query
        .field
        .as_deref()
        .ok_or_else(|| AppError::BadRequest("field argument must be included in request".to_string()))?
        .parse()
        .map_err(AppError::BadRequest)?;

    let from = query.from.as_ref().and_then(|s| s.parse().ok());
    let to = query.to.as_ref().and_then(|s| s.parse().ok());
    let limit = query.limit.as_ref().and_then(|s| s.parse().ok());

    let data = services::observation_series(
        state.repository.as_ref(),
        field,
        from,
        to,
        limit,
        state.settings.series.observation_cap,
    )
    .await?;

    Ok(Json(data))
}

/// GET /v1/weather/windrose
///
/// Compass-bucketed wind summary for the requested window.
pub async fn get_wind_rose(
    State(state): State<AppState>,
    Query(query): Query<WindRoseQuery>,
) -> HandlerResult<crate::api::WindRoseData> {
    let params = query.resolve();
    let data = services::wind_rose(
        state.repository.as_ref(),
        &params,
        state.settings.series.observation_cap,
    )
    .await?;

    Ok(Json(data))
}
