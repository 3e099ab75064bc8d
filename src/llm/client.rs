use std::sync::Arc;
use std::time::{Duration, Instant};

use opentelemetry::KeyValue;
use tracing::Instrument;
use tracing_opentelemetry::OpenTelemetrySpanExt;

use super::{
    FailureKind, GenerateRequest, GenerateResponse, PROVIDER_PORTS, PROVIDER_SERVERS, Provider,
    ProviderError,
};
use crate::telemetry::metrics::{
    GEN_AI_ERROR_COUNT, GEN_AI_FALLBACK_COUNT, GEN_AI_OPERATION_DURATION, GEN_AI_RETRY_COUNT,
    GEN_AI_TOKEN_USAGE,
};

pub struct LlmClient {
    pub primary: Arc<dyn Provider>,
    pub fallback: Option<Arc<dyn Provider>>,
    pub fallback_model: String,
    pub max_attempts: u32,
    pub call_timeout: Duration,
    /// Bounds the whole primary, retry and fallback sequence.
    pub total_timeout: Duration,
}

impl LlmClient {
    pub fn primary_name(&self) -> &str {
        self.primary.name()
    }

    pub fn fallback_name(&self) -> Option<&str> {
        self.fallback.as_deref().map(|p| p.name())
    }

    pub async fn generate_once(
        &self,
        provider: &dyn Provider,
        req: &GenerateRequest,
    ) -> anyhow::Result<GenerateResponse> {
        let provider_name = provider.name();
        let span_display_name = format!("gen_ai.chat {}", req.model);
        let start = Instant::now();

        let server_addr = PROVIDER_SERVERS
            .get(provider_name)
            .copied()
            .unwrap_or("unknown");
        let server_port = PROVIDER_PORTS.get(provider_name).copied().unwrap_or(443);

        let span = tracing::info_span!(
            "gen_ai.chat",
            otel.name = %span_display_name,
            gen_ai.operation.name = "chat",
            gen_ai.provider.name = %provider_name,
            gen_ai.request.model = %req.model,
            server.address = %server_addr,
            server.port = server_port,
            gen_ai.request.temperature = req.temperature,
            gen_ai.request.max_tokens = req.max_tokens as i64,
            gen_ai.response.model = tracing::field::Empty,
            gen_ai.usage.input_tokens = tracing::field::Empty,
            gen_ai.usage.output_tokens = tracing::field::Empty,
            gen_ai.response.finish_reasons = tracing::field::Empty,
            otel.status_code = tracing::field::Empty,
            error.type = tracing::field::Empty,
        );

        {
            let mut user_event_attrs =
                vec![KeyValue::new("gen_ai.prompt", truncate(&req.prompt, 1000))];
            if !req.system.is_empty() {
                user_event_attrs.push(KeyValue::new(
                    "gen_ai.system_instructions",
                    truncate(&req.system, 500),
                ));
            }
            span.add_event("gen_ai.user.message", user_event_attrs);
        }

        let call = provider.generate(req).instrument(span.clone());
        let result = match tokio::time::timeout(self.call_timeout, call).await {
            Ok(Ok(resp)) if resp.content.trim().is_empty() => {
                Err(ProviderError::EmptyResponse(provider_name.to_string()).into())
            }
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout {
                provider: provider_name.to_string(),
                secs: self.call_timeout.as_secs(),
            }
            .into()),
        };

        let duration = start.elapsed().as_secs_f64();

        match result {
            Ok(mut resp) => {
                resp.provider = provider_name.to_string();

                span.record("gen_ai.response.model", resp.model.as_str());
                span.record("gen_ai.usage.input_tokens", resp.input_tokens as i64);
                span.record("gen_ai.usage.output_tokens", resp.output_tokens as i64);
                if !resp.finish_reason.is_empty() {
                    span.record(
                        "gen_ai.response.finish_reasons",
                        resp.finish_reason.as_str(),
                    );
                }

                span.add_event(
                    "gen_ai.assistant.message",
                    vec![KeyValue::new(
                        "gen_ai.completion",
                        truncate(&resp.content, 2000),
                    )],
                );

                let op_kv = KeyValue::new("gen_ai.operation.name", "chat");
                let provider_kv = KeyValue::new("gen_ai.provider.name", provider_name.to_string());
                let model_kv = KeyValue::new("gen_ai.request.model", resp.model.clone());

                GEN_AI_TOKEN_USAGE.record(
                    f64::from(resp.input_tokens),
                    &[
                        KeyValue::new("gen_ai.token.type", "input"),
                        op_kv.clone(),
                        provider_kv.clone(),
                        model_kv.clone(),
                    ],
                );
                GEN_AI_TOKEN_USAGE.record(
                    f64::from(resp.output_tokens),
                    &[
                        KeyValue::new("gen_ai.token.type", "output"),
                        op_kv.clone(),
                        provider_kv.clone(),
                        model_kv.clone(),
                    ],
                );
                GEN_AI_OPERATION_DURATION.record(duration, &[op_kv, provider_kv, model_kv]);

                Ok(resp)
            }
            Err(err) => {
                let kind = FailureKind::classify(&err);
                span.record("otel.status_code", "ERROR");
                span.record("error.type", kind.as_str());

                GEN_AI_ERROR_COUNT.add(
                    1,
                    &[
                        KeyValue::new("gen_ai.provider.name", provider_name.to_string()),
                        KeyValue::new("gen_ai.request.model", req.model.clone()),
                        KeyValue::new("error.type", kind.as_str()),
                    ],
                );

                Err(err)
            }
        }
    }

    pub async fn generate_with_retry(
        &self,
        provider: &dyn Provider,
        req: &GenerateRequest,
    ) -> anyhow::Result<GenerateResponse> {
        let max_attempts = self.max_attempts.max(1);
        let mut last_err = None;

        for attempt in 0..max_attempts {
            match self.generate_once(provider, req).await {
                Ok(resp) => return Ok(resp),
                Err(err) => {
                    // Retrying cannot conjure up a missing key.
                    if FailureKind::classify(&err) == FailureKind::MissingCredential {
                        return Err(err);
                    }

                    tracing::warn!(
                        attempt = attempt + 1,
                        max_attempts = max_attempts,
                        provider = provider.name(),
                        model = %req.model,
                        error = %err,
                        "LLM call failed"
                    );

                    if attempt > 0 {
                        GEN_AI_RETRY_COUNT.add(
                            1,
                            &[
                                KeyValue::new("gen_ai.provider.name", provider.name().to_string()),
                                KeyValue::new("gen_ai.request.model", req.model.clone()),
                            ],
                        );
                    }

                    last_err = Some(err);

                    if attempt + 1 < max_attempts {
                        tokio::time::sleep(backoff_delay(attempt)).await;
                    }
                }
            }
        }

        Err(last_err.unwrap_or_else(|| anyhow::anyhow!("all attempts exhausted")))
    }

    pub async fn generate(&self, req: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
        match tokio::time::timeout(self.total_timeout, self.generate_with_fallback(req)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    primary_provider = %self.primary.name(),
                    total_timeout_secs = self.total_timeout.as_secs(),
                    "LLM deadline exceeded, abandoning remaining attempts"
                );
                Err(ProviderError::Timeout {
                    provider: self.primary.name().to_string(),
                    secs: self.total_timeout.as_secs(),
                }
                .into())
            }
        }
    }

    async fn generate_with_fallback(
        &self,
        req: &GenerateRequest,
    ) -> anyhow::Result<GenerateResponse> {
        let result = self.generate_with_retry(self.primary.as_ref(), req).await;

        match result {
            Ok(resp) => Ok(resp),
            Err(primary_err) => {
                if let Some(ref fallback) = self.fallback {
                    tracing::warn!(
                        primary_provider = %self.primary.name(),
                        fallback_provider = %fallback.name(),
                        error = %primary_err,
                        "Primary provider failed, falling back"
                    );

                    GEN_AI_FALLBACK_COUNT.add(1, &[]);

                    let fallback_req = GenerateRequest {
                        model: self.fallback_model.clone(),
                        ..req.clone()
                    };

                    self.generate_with_retry(fallback.as_ref(), &fallback_req)
                        .await
                } else {
                    Err(primary_err)
                }
            }
        }
    }
}

fn backoff_delay(attempt: u32) -> Duration {
    let base = Duration::from_secs(1) * 2u32.pow(attempt.min(4));
    let base = base.min(Duration::from_secs(10));
    // 25% jitter to avoid thundering herd
    let jitter_ms = fastrand::u64(0..=base.as_millis() as u64 / 4);
    base + Duration::from_millis(jitter_ms)
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        s.char_indices()
            .take_while(|&(i, _)| i < max)
            .map(|(_, c)| c)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct ScriptedProvider {
        name: &'static str,
        reply: Result<&'static str, &'static str>,
        calls: AtomicU32,
    }

    impl ScriptedProvider {
        fn ok(name: &'static str, reply: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                reply: Ok(reply),
                calls: AtomicU32::new(0),
            })
        }

        fn failing(name: &'static str, error: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                reply: Err(error),
                calls: AtomicU32::new(0),
            })
        }
    }

    #[async_trait::async_trait]
    impl Provider for ScriptedProvider {
        async fn generate(&self, req: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.reply {
                Ok(text) => Ok(GenerateResponse {
                    content: text.to_string(),
                    model: req.model.clone(),
                    input_tokens: 10,
                    output_tokens: 5,
                    finish_reason: "stop".to_string(),
                    provider: String::new(),
                }),
                Err(msg) => Err(anyhow::anyhow!("{msg}")),
            }
        }

        fn name(&self) -> &str {
            self.name
        }
    }

    struct HangingProvider;

    #[async_trait::async_trait]
    impl Provider for HangingProvider {
        async fn generate(&self, _req: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
            std::future::pending().await
        }

        fn name(&self) -> &str {
            "hanging"
        }
    }

    fn client(primary: Arc<dyn Provider>, fallback: Option<Arc<dyn Provider>>) -> LlmClient {
        LlmClient {
            primary,
            fallback,
            fallback_model: "backup-model".to_string(),
            max_attempts: 1,
            call_timeout: Duration::from_secs(5),
            total_timeout: Duration::from_secs(60),
        }
    }

    fn request() -> GenerateRequest {
        GenerateRequest {
            model: "primary-model".to_string(),
            system: String::new(),
            prompt: "hi".to_string(),
            temperature: 0.0,
            max_tokens: 10,
        }
    }

    #[tokio::test]
    async fn test_primary_success_sets_provider() {
        let llm = client(ScriptedProvider::ok("gemini", "hello"), None);
        let resp = llm.generate(&request()).await.unwrap();
        assert_eq!(resp.content, "hello");
        assert_eq!(resp.provider, "gemini");
    }

    #[tokio::test]
    async fn test_fallback_used_with_fallback_model() {
        let primary = ScriptedProvider::failing("gemini", "503 service unavailable");
        let backup = ScriptedProvider::ok("openai", "from backup");
        let llm = client(primary.clone(), Some(backup.clone()));

        let resp = llm.generate(&request()).await.unwrap();
        assert_eq!(resp.content, "from backup");
        assert_eq!(resp.provider, "openai");
        assert_eq!(resp.model, "backup-model");
        assert_eq!(primary.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_no_fallback_returns_primary_error() {
        let llm = client(
            ScriptedProvider::failing("gemini", "connection refused"),
            None,
        );
        let err = llm.generate(&request()).await.unwrap_err();
        assert_eq!(FailureKind::classify(&err), FailureKind::NetworkError);
    }

    #[tokio::test]
    async fn test_empty_content_is_failure() {
        let llm = client(ScriptedProvider::ok("gemini", "   "), None);
        let err = llm.generate(&request()).await.unwrap_err();
        assert_eq!(FailureKind::classify(&err), FailureKind::EmptyResponse);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_provider_times_out() {
        let llm = LlmClient {
            call_timeout: Duration::from_secs(2),
            ..client(Arc::new(HangingProvider), None)
        };
        let err = llm.generate(&request()).await.unwrap_err();
        assert_eq!(FailureKind::classify(&err), FailureKind::Timeout);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_up_to_max_attempts() {
        let primary = ScriptedProvider::failing("gemini", "500 internal server error");
        let llm = LlmClient {
            max_attempts: 3,
            ..client(primary.clone(), None)
        };
        assert!(llm.generate(&request()).await.is_err());
        assert_eq!(primary.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_total_timeout_bounds_retries_and_fallback() {
        let llm = LlmClient {
            max_attempts: 3,
            call_timeout: Duration::from_secs(30),
            total_timeout: Duration::from_secs(54),
            ..client(Arc::new(HangingProvider), Some(Arc::new(HangingProvider)))
        };

        let start = tokio::time::Instant::now();
        let err = llm.generate(&request()).await.unwrap_err();
        assert_eq!(FailureKind::classify(&err), FailureKind::Timeout);
        assert!(start.elapsed() >= Duration::from_secs(54));
        assert!(start.elapsed() < Duration::from_secs(55));
    }

    #[test]
    fn test_backoff_delay_grows_and_caps() {
        assert!(backoff_delay(0) >= Duration::from_secs(1));
        assert!(backoff_delay(0) <= Duration::from_millis(1250));
        assert!(backoff_delay(2) >= Duration::from_secs(4));
        assert!(backoff_delay(10) <= Duration::from_millis(12500));
    }

    #[test]
    fn test_truncate_long() {
        assert_eq!(truncate("hello world", 5), "hello");
        assert_eq!(truncate("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_multibyte_safe() {
        let result = truncate("hé世界!", 3);
        assert!(result.len() <= 3);
        assert!(result.is_char_boundary(result.len()));
    }
}
