//! HTTP request handlers for the web adapter.

use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::domain::aggregate;
use crate::domain::codec::parse_filters;
use crate::domain::emotion::{emotion_leaning, EmotionAggregate};
use crate::domain::psychology;
use crate::domain::trade::Trade;

use super::{AppState, WebError};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PsychologicalMetricsBody {
    pub discipline_level: f64,
    pub tilt_control: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    pub emotional_data: Vec<EmotionAggregate>,
    pub psychological_metrics: PsychologicalMetricsBody,
    pub validation_warnings: Vec<String>,
}

/// Emotion leaning plus corrected psychological metrics for the filtered
/// trade set. Accepts the same ten query keys as the URL codec; invalid
/// values are dropped during parse, never rejected.
pub async fn analytics(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Result<Json<AnalyticsResponse>, WebError> {
    let filters = parse_filters(query.as_deref().unwrap_or(""));
    let trades = state.trades.fetch_trades()?;
    let filtered = aggregate::apply(&trades, &filters);

    let emotional_data = emotion_leaning(&filtered);
    let (raw_discipline, raw_tilt) = state.scoring.raw_scores(&filtered);
    let metrics = psychology::correct(raw_discipline, raw_tilt);

    Ok(Json(AnalyticsResponse {
        emotional_data,
        psychological_metrics: PsychologicalMetricsBody {
            discipline_level: metrics.discipline_level,
            tilt_control: metrics.tilt_control,
        },
        validation_warnings: metrics.validation_warnings,
    }))
}

/// Filtered, sorted trades for the same ten query keys.
pub async fn trades(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Result<Json<Vec<Trade>>, WebError> {
    let filters = parse_filters(query.as_deref().unwrap_or(""));
    let trades = state.trades.fetch_trades()?;
    Ok(Json(aggregate::apply(&trades, &filters)))
}

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn not_found() -> WebError {
    WebError::not_found("no such route")
}
