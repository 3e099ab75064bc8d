use std::time::Duration;

use axum::http::{Request, Response};
use opentelemetry::KeyValue;
use tower_http::trace::{MakeSpan, OnResponse};
use tracing::Span;

use super::metrics::{HTTP_REQUEST_DURATION, HTTP_REQUESTS_TOTAL};

#[derive(Clone)]
pub struct HttpMakeSpan;

impl<B> MakeSpan<B> for HttpMakeSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let method = request.method().as_str();
        let path = request.uri().path();

        tracing::info_span!(
            "HTTP request",
            otel.name = %format!("{} {}", method, path),
            http.method = %method,
            http.route = %path,
            http.target = %request.uri(),
            http.scheme = "http",
            http.flavor = ?request.version(),
            http.user_agent = request.headers()
                .get("user-agent")
                .and_then(|v| v.to_str().ok())
                .unwrap_or(""),
            http.response.status_code = tracing::field::Empty,
            otel.status_code = tracing::field::Empty,
        )
    }
}

#[derive(Clone)]
pub struct HttpOnResponse;

impl<B> OnResponse<B> for HttpOnResponse {
    fn on_response(self, response: &Response<B>, latency: Duration, span: &Span) {
        let status = response.status().as_u16();

        span.record("http.response.status_code", status as i64);

        if status >= 500 {
            span.record("otel.status_code", "ERROR");
        } else {
            span.record("otel.status_code", "OK");
        }

        let latency_ms = latency.as_secs_f64() * 1000.0;
        let attributes = [
            KeyValue::new("http.status_code", status.to_string()),
            KeyValue::new("http.status_class", format!("{}xx", status / 100)),
        ];

        HTTP_REQUESTS_TOTAL.add(1, &attributes);
        HTTP_REQUEST_DURATION.record(latency_ms, &attributes);

        tracing::info!(
            http.response.status_code = status,
            latency_ms = latency_ms,
            "finished processing request"
        );
    }
}
