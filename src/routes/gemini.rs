use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::{AppError, RouteError};
use crate::store::ChatRecord;

pub const CHAT_FAILED: &str = "Failed to process AI request";

#[derive(Debug, Deserialize)]
pub struct ChatBody {
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

pub async fn ask_assistant(
    State(state): State<AppState>,
    body: Result<Json<ChatBody>, JsonRejection>,
) -> Result<Json<ChatResponse>, RouteError> {
    let Json(body) = body.map_err(|rejection| {
        AppError::Validation(format!("invalid request body: {}", rejection.body_text()))
            .with_message(CHAT_FAILED)
    })?;

    let query = state
        .assistant
        .validate_query(body.query.as_deref())
        .map_err(|e| e.with_message(CHAT_FAILED))?;

    let snapshot = state.generator.snapshot();
    let reply = state.assistant.ask(query, &snapshot).await;

    let record = ChatRecord::from_reply(query, &reply);
    let store = state.store.clone();
    tokio::spawn(async move {
        if let Err(e) = store.record_chat(&record).await {
            tracing::warn!(
                error = %e,
                store = store.backend(),
                "Failed to record chat exchange"
            );
        }
    });

    Ok(Json(ChatResponse {
        response: reply.text,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_body_missing_query() {
        let body: ChatBody = serde_json::from_str("{}").unwrap();
        assert_eq!(body.query, None);
    }

    #[test]
    fn test_chat_body_with_query() {
        let body: ChatBody =
            serde_json::from_str(r#"{"query": "Why is my blood sugar high?"}"#).unwrap();
        assert_eq!(body.query.as_deref(), Some("Why is my blood sugar high?"));
    }

    #[test]
    fn test_chat_response_shape() {
        let value = serde_json::to_value(ChatResponse {
            response: "Stay hydrated.".to_string(),
        })
        .unwrap();
        assert_eq!(value, serde_json::json!({"response": "Stay hydrated."}));
    }
}
