//! Web server adapter.
//!
//! Axum JSON API over the journal core: the analytics endpoint accepts the
//! same ten query keys as the URL codec and validates them through the
//! same descriptor table, so browser URL state pastes directly into API
//! calls.

mod error;
mod handlers;

pub use error::WebError;
pub use handlers::*;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::ports::config_port::ConfigPort;
use crate::ports::scoring_port::ScoringPort;
use crate::ports::trade_port::TradePort;

pub struct AppState {
    pub trades: Arc<dyn TradePort + Send + Sync>,
    pub scoring: Arc<dyn ScoringPort + Send + Sync>,
    pub config: Arc<dyn ConfigPort + Send + Sync>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/analytics", get(handlers::analytics))
        .route("/api/trades", get(handlers::trades))
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found)
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}
