use crate::helpers::{observation, spawn_app_with_dataset};
use axum::{
    body::{to_bytes, Body},
    http::Request,
};
use climate_api::db::{TemperatureReading, TemperatureStats};
use hyper::{header, Method, StatusCode};
use serde_json::from_slice;
use tower::ServiceExt;

#[tokio::test]
async fn tobs_returns_only_the_most_active_station() {
    let mut observations = Vec::new();
    for day in 1..=5 {
        observations.push(observation(
            "USC00519397",
            &format!("2017-08-{:02}", day),
            None,
            Some(70.0),
        ));
    }
    for day in 1..=10 {
        observations.push(observation(
            "USC00519281",
            &format!("2017-08-{:02}", day),
            None,
            Some(80.0),
        ));
    }
    let test_app = spawn_app_with_dataset(observations, vec![]).await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/v1.0/tobs")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::empty())
        .unwrap();

    let response = test_app
        .app
        .oneshot(request)
        .await
        .expect("Failed to execute request.");
    assert!(response.status().is_success());

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let readings: Vec<TemperatureReading> = from_slice(&body).unwrap();

    assert_eq!(readings.len(), 10);
    assert!(readings.iter().all(|reading| reading.temperature == 80.0));
}

#[tokio::test]
async fn tobs_on_an_empty_dataset_is_an_empty_array() {
    let test_app = spawn_app_with_dataset(vec![], vec![]).await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/v1.0/tobs")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::empty())
        .unwrap();

    let response = test_app
        .app
        .oneshot(request)
        .await
        .expect("Failed to execute request.");
    assert!(response.status().is_success());

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let readings: Vec<TemperatureReading> = from_slice(&body).unwrap();
    assert!(readings.is_empty());
}

#[tokio::test]
async fn start_stats_cover_everything_from_the_start_date() {
    let test_app = spawn_app_with_dataset(
        vec![
            observation("USC00519281", "2016-12-31", None, Some(50.0)),
            observation("USC00519281", "2017-01-01", None, Some(60.0)),
            observation("USC00519281", "2017-02-01", None, Some(70.0)),
        ],
        vec![],
    )
    .await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/v1.0/2017-01-01")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::empty())
        .unwrap();

    let response = test_app
        .app
        .oneshot(request)
        .await
        .expect("Failed to execute request.");
    assert!(response.status().is_success());

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let stats: TemperatureStats = from_slice(&body).unwrap();

    assert_eq!(stats.min, Some(60.0));
    assert_eq!(stats.avg, Some(65.0));
    assert_eq!(stats.max, Some(70.0));
}

#[tokio::test]
async fn single_day_range_with_one_observation_collapses_the_stats() {
    let test_app = spawn_app_with_dataset(
        vec![observation("USC00519281", "2017-01-01", None, Some(70.0))],
        vec![],
    )
    .await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/v1.0/2017-01-01/2017-01-01")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::empty())
        .unwrap();

    let response = test_app
        .app
        .oneshot(request)
        .await
        .expect("Failed to execute request.");
    assert!(response.status().is_success());

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value: serde_json::Value = from_slice(&body).unwrap();

    assert_eq!(
        value.get("Minimum Temperature").and_then(|v| v.as_f64()),
        Some(70.0)
    );
    assert_eq!(
        value.get("Average Temperature").and_then(|v| v.as_f64()),
        Some(70.0)
    );
    assert_eq!(
        value.get("Maximum Temperature").and_then(|v| v.as_f64()),
        Some(70.0)
    );
}

#[tokio::test]
async fn range_with_no_matches_returns_null_stats() {
    let test_app = spawn_app_with_dataset(
        vec![observation("USC00519281", "2017-01-01", None, Some(70.0))],
        vec![],
    )
    .await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/v1.0/2018-01-01/2018-12-31")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::empty())
        .unwrap();

    let response = test_app
        .app
        .oneshot(request)
        .await
        .expect("Failed to execute request.");
    assert!(response.status().is_success());

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value: serde_json::Value = from_slice(&body).unwrap();

    assert!(value.get("Minimum Temperature").unwrap().is_null());
    assert!(value.get("Average Temperature").unwrap().is_null());
    assert!(value.get("Maximum Temperature").unwrap().is_null());
}

#[tokio::test]
async fn inverted_range_returns_null_stats_not_an_error() {
    let test_app = spawn_app_with_dataset(
        vec![observation("USC00519281", "2017-01-01", None, Some(70.0))],
        vec![],
    )
    .await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/v1.0/2017-06-01/2017-01-01")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::empty())
        .unwrap();

    let response = test_app
        .app
        .oneshot(request)
        .await
        .expect("Failed to execute request.");
    assert!(response.status().is_success());

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let stats: TemperatureStats = from_slice(&body).unwrap();
    assert_eq!(stats, TemperatureStats::default());
}

#[tokio::test]
async fn malformed_start_date_is_rejected_with_bad_request() {
    let test_app = spawn_app_with_dataset(
        vec![observation("USC00519281", "2017-01-01", None, Some(70.0))],
        vec![],
    )
    .await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/v1.0/not-a-date")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::empty())
        .unwrap();

    let response = test_app
        .app
        .oneshot(request)
        .await
        .expect("Failed to execute request.");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value: serde_json::Value = from_slice(&body).unwrap();
    assert!(value.get("error").is_some());
}

#[tokio::test]
async fn named_routes_shadow_the_start_date_capture() {
    // "precipitation" would parse as a start date capture if route priority
    // were wrong; it must stay a 200 JSON object, not a 400
    let test_app = spawn_app_with_dataset(vec![], vec![]).await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/v1.0/precipitation")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::empty())
        .unwrap();

    let response = test_app
        .app
        .oneshot(request)
        .await
        .expect("Failed to execute request.");
    assert!(response.status().is_success());
}
