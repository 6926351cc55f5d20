use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use serde_json::json;
use std::sync::Arc;
use time::Date;

use crate::{
    db::{self, parse_date, PrecipitationByDate, StationRecord, TemperatureReading,
        TemperatureStats},
    AppState,
};

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("failed to answer climate query: {0}")]
    Data(#[from] db::climate_data::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidDate(_) => StatusCode::BAD_REQUEST,
            ApiError::Data(err) => {
                error!("error answering climate query: {}", err);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

fn parse_request_date(raw: &str) -> Result<Date, ApiError> {
    parse_date(raw).map_err(|_| ApiError::InvalidDate(raw.to_owned()))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/precipitation",
    responses(
        (status = OK, description = "Precipitation by date for the trailing year behind the reference date, null where the gauge reported nothing", body = PrecipitationByDate),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query the dataset")
    ))]
pub async fn precipitation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PrecipitationByDate>, ApiError> {
    let recent = state.climate_db.recent_precipitation().await?;
    Ok(Json(recent))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/stations",
    responses(
        (status = OK, description = "Every station in the dataset", body = Vec<StationRecord>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query the dataset")
    ))]
pub async fn stations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<StationRecord>>, ApiError> {
    let stations = state.climate_db.stations().await?;
    Ok(Json(stations))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/tobs",
    responses(
        (status = OK, description = "Temperature observations for the most active station over the trailing year", body = Vec<TemperatureReading>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query the dataset")
    ))]
pub async fn tobs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TemperatureReading>>, ApiError> {
    let readings = state.climate_db.most_active_temperatures().await?;
    Ok(Json(readings))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}",
    params(
        ("start" = String, Path, description = "Start date (YYYY-MM-DD), inclusive"),
    ),
    responses(
        (status = OK, description = "Min/avg/max temperature from the start date onward, all null when nothing matches", body = TemperatureStats),
        (status = BAD_REQUEST, description = "Start date is not a YYYY-MM-DD date"),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query the dataset")
    ))]
pub async fn temperature_start(
    State(state): State<Arc<AppState>>,
    Path(start): Path<String>,
) -> Result<Json<TemperatureStats>, ApiError> {
    let start = parse_request_date(&start)?;
    let stats = state.climate_db.temperature_stats(start, None).await?;
    Ok(Json(stats))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}/{end}",
    params(
        ("start" = String, Path, description = "Start date (YYYY-MM-DD), inclusive"),
        ("end" = String, Path, description = "End date (YYYY-MM-DD), inclusive"),
    ),
    responses(
        (status = OK, description = "Min/avg/max temperature between the two dates, all null when nothing matches", body = TemperatureStats),
        (status = BAD_REQUEST, description = "Either date is not a YYYY-MM-DD date"),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query the dataset")
    ))]
pub async fn temperature_range(
    State(state): State<Arc<AppState>>,
    Path((start, end)): Path<(String, String)>,
) -> Result<Json<TemperatureStats>, ApiError> {
    let start = parse_request_date(&start)?;
    let end = parse_request_date(&end)?;
    let stats = state.climate_db.temperature_stats(start, Some(end)).await?;
    Ok(Json(stats))
}
