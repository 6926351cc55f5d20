use crate::{
    db::{ClimateAccess, ClimateData, ClimateStore},
    index_handler, parse_date, precipitation, routes, stations, temperature_range,
    temperature_start, tobs,
};
use anyhow::anyhow;
use axum::{
    body::Body,
    extract::Request,
    middleware::{self, Next},
    response::IntoResponse,
    routing::get,
    Router,
};
use hyper::{
    header::{ACCEPT, CONTENT_TYPE},
    Method,
};
use log::info;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

#[derive(Clone)]
pub struct AppState {
    pub remote_url: String,
    pub climate_db: Arc<dyn ClimateData>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::climate::climate_routes::precipitation,
        routes::climate::climate_routes::stations,
        routes::climate::climate_routes::tobs,
        routes::climate::climate_routes::temperature_start,
        routes::climate::climate_routes::temperature_range,
    ),
    components(
        schemas(
                crate::db::StationRecord,
                crate::db::TemperatureReading,
                crate::db::TemperatureStats,
            )
    ),
    tags(
        (name = "climate api", description = "a read-only RESTful api serving precipitation and temperature observations from a fixed set of weather stations")
    )
)]
struct ApiDoc;

pub async fn build_app_state(
    remote_url: String,
    data_dir: String,
    as_of: Option<String>,
) -> Result<AppState, anyhow::Error> {
    let as_of = as_of
        .map(|raw| parse_date(&raw))
        .transpose()
        .map_err(|e| anyhow!("invalid as-of date: {}", e))?;

    let store = ClimateStore::load(&data_dir, as_of)
        .map_err(|e| anyhow!("error loading climate dataset: {}", e))?;

    Ok(AppState {
        remote_url,
        climate_db: Arc::new(ClimateAccess::new(store)),
    })
}

pub fn app(app_state: AppState) -> Router {
    let api_docs = ApiDoc::openapi();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([ACCEPT, CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/api/v1.0/precipitation", get(precipitation))
        .route("/api/v1.0/stations", get(stations))
        .route("/api/v1.0/tobs", get(tobs))
        .route("/api/v1.0/{start}", get(temperature_start))
        .route("/api/v1.0/{start}/{end}", get(temperature_range))
        .with_state(Arc::new(app_state))
        .layer(middleware::from_fn(log_request))
        .merge(Scalar::with_url("/docs", api_docs))
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_default();
    info!(target: "http_request","new request, {} {}", request.method().as_str(), path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    info!(target: "http_response", "response, code: {}, time: {}", response.status().as_str(), response_time);

    response
}
