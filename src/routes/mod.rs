pub mod gemini;
pub mod health;
pub mod health_data;
pub mod history;

use std::time::Duration;

use axum::{
    Router,
    http::StatusCode,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::AppState;
use crate::telemetry::{HttpMakeSpan, HttpOnResponse};

pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/health-data", get(health_data::get_health_data))
        .route("/api/health-data/history", get(history::list_readings))
        .route("/api/gemini", post(gemini::ask_assistant))
        .route("/api/chats", get(history::list_chats))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(HttpMakeSpan)
                .on_response(HttpOnResponse),
        )
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
