#![cfg(feature = "web")]
//! Web handler integration tests.
//!
//! The analytics endpoint must accept exactly the filter keys the URL codec
//! accepts, drop invalid values the same way, and return the analytics
//! document with corrected psychological metrics.

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use tradelog::adapters::scoring::FixedScoring;
use tradelog::adapters::web::{build_router, AppState};

use common::*;

fn create_test_app(trades: Vec<Trade>, discipline: f64, tilt: f64) -> Router {
    let state = AppState {
        trades: Arc::new(MockTradePort::new().with_trades(trades)),
        scoring: Arc::new(FixedScoring::new(discipline, tilt)),
        config: Arc::new(MockConfigPort),
    };
    build_router(state)
}

fn sample_trades() -> Vec<Trade> {
    vec![
        tagged_trade("1", Side::Buy, &["FOMO"]),
        tagged_trade("2", Side::Sell, &["FOMO"]),
        tagged_trade("3", Side::Buy, &["FOMO"]),
        tagged_trade("4", Side::Sell, &["REVENGE"]),
    ]
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn analytics_returns_the_document_shape() {
    let app = create_test_app(sample_trades(), 70.0, 55.0);
    let (status, json) = get_json(app, "/api/analytics").await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["emotionalData"].is_array());
    assert!(json["psychologicalMetrics"]["disciplineLevel"].is_number());
    assert!(json["psychologicalMetrics"]["tiltControl"].is_number());
    assert!(json["validationWarnings"].is_array());
}

#[tokio::test]
async fn analytics_reports_the_fomo_leaning() {
    let app = create_test_app(sample_trades(), 70.0, 55.0);
    let (_, json) = get_json(app, "/api/analytics").await;

    let fomo = &json["emotionalData"][0];
    assert_eq!(fomo["tag"], "FOMO");
    assert_eq!(fomo["buyCount"], 2);
    assert_eq!(fomo["sellCount"], 1);
    assert_eq!(fomo["totalTrades"], 3);
    assert_eq!(fomo["leaning"], "Buy Leaning");
    assert_eq!(fomo["side"], "Buy");
}

#[tokio::test]
async fn analytics_filters_through_the_query_string() {
    let app = create_test_app(sample_trades(), 70.0, 55.0);
    let (_, json) = get_json(app, "/api/analytics?side=Sell").await;

    let data = json["emotionalData"].as_array().unwrap();
    let tags: Vec<&str> = data.iter().map(|a| a["tag"].as_str().unwrap()).collect();
    assert_eq!(tags, vec!["FOMO", "REVENGE"]);
    assert_eq!(data[0]["sellCount"], 1);
    assert_eq!(data[0]["buyCount"], 0);
}

#[tokio::test]
async fn analytics_drops_invalid_filter_values_like_the_codec() {
    let app = create_test_app(sample_trades(), 70.0, 55.0);
    let (status, json) = get_json(app, "/api/analytics?market=bonds&pnlFilter=sometimes").await;

    // Invalid values are ignored, not rejected: same result as unfiltered.
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["emotionalData"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn analytics_corrects_out_of_contract_scores() {
    let app = create_test_app(sample_trades(), 95.0, 5.0);
    let (_, json) = get_json(app, "/api/analytics").await;

    let d = json["psychologicalMetrics"]["disciplineLevel"].as_f64().unwrap();
    let t = json["psychologicalMetrics"]["tiltControl"].as_f64().unwrap();
    assert!((d - t).abs() <= 30.0 + 1e-9);
    assert!(!(d > 90.0 && t < 10.0));
    assert!(!json["validationWarnings"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn trades_endpoint_filters_and_sorts() {
    let mut trades = sample_trades();
    trades[0].pnl = Some(30.0);
    trades[1].pnl = Some(-10.0);
    trades[2].pnl = Some(120.0);
    trades[3].pnl = Some(55.0);

    let app = create_test_app(trades, 70.0, 55.0);
    let (status, json) = get_json(app, "/api/trades?sortBy=pnl&sortOrder=desc").await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["3", "4", "1", "2"]);
}

#[tokio::test]
async fn storage_failure_maps_to_internal_error() {
    let state = AppState {
        trades: Arc::new(MockTradePort::new().with_error("disk gone")),
        scoring: Arc::new(FixedScoring::new(50.0, 50.0)),
        config: Arc::new(MockConfigPort),
    };
    let app = build_router(state);

    let (status, json) = get_json(app, "/api/analytics").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["error"].as_str().unwrap().contains("disk gone"));
}

#[tokio::test]
async fn health_is_ok() {
    let app = create_test_app(Vec::new(), 50.0, 50.0);
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = create_test_app(Vec::new(), 50.0, 50.0);
    let (status, _) = get_json(app, "/api/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
