use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::AppState;

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let llm = &state.assistant.llm;

    Json(json!({
        "status": "ok",
        "service": "glucose-dashboard-api",
        "version": env!("CARGO_PKG_VERSION"),
        "store": state.store.backend(),
        "llm": {
            "primary": llm.primary_name(),
            "fallback": llm.fallback_name(),
        },
    }))
}
