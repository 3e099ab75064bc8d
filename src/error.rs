use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use opentelemetry::trace::TraceContextExt;
use serde_json::json;
use thiserror::Error;
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// An [`AppError`] paired with the message a route shows for server-side
/// failures. Validation errors keep their own message.
#[derive(Debug)]
pub struct RouteError {
    pub error: AppError,
    pub public_message: &'static str,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn with_message(self, public_message: &'static str) -> RouteError {
        RouteError {
            error: self,
            public_message,
        }
    }
}

fn get_trace_id() -> Option<String> {
    let span = Span::current();
    let context = span.context();
    let span_ref = context.span();
    let span_context = span_ref.span_context();

    if span_context.is_valid() {
        Some(span_context.trace_id().to_string())
    } else {
        None
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    let body = if let Some(trace_id) = get_trace_id() {
        json!({
            "message": message,
            "status": status.as_u16(),
            "trace_id": trace_id,
        })
    } else {
        json!({
            "message": message,
            "status": status.as_u16(),
        })
    };

    (status, Json(body)).into_response()
}

impl IntoResponse for RouteError {
    fn into_response(self) -> Response {
        let status = self.error.status();
        let message = match &self.error {
            AppError::Validation(msg) => msg.clone(),
            AppError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                self.public_message.to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                self.public_message.to_string()
            }
        };

        error_response(status, message)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.with_message("Internal server error").into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_validation_error() {
        let error = AppError::Validation("query must not be empty".to_string());
        assert_eq!(error.to_string(), "Validation error: query must not be empty");
    }

    #[test]
    fn test_internal_error() {
        let error = AppError::Internal("unexpected".to_string());
        assert_eq!(error.to_string(), "Internal error: unexpected");
    }

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            AppError::Validation("test".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Internal("test".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Database(sqlx::Error::RowNotFound).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_internal_error_hides_detail() {
        let response = AppError::Internal("connection pool exhausted".to_string())
            .with_message("Failed to process AI request")
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["message"], "Failed to process AI request");
        assert_eq!(body["status"], 500);
    }

    #[tokio::test]
    async fn test_validation_error_keeps_message() {
        let response = AppError::Validation("query must not be empty".to_string())
            .with_message("Failed to process AI request")
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["message"], "query must not be empty");
    }
}
