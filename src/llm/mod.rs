pub mod client;
pub mod error;
pub mod gemini;
pub mod openai;
pub mod simulated;

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

pub use client::LlmClient;
pub use error::{FailureKind, ProviderError};

use crate::config::Config;

#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub model: String,
    pub system: String,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone)]
pub struct GenerateResponse {
    pub content: String,
    pub model: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub finish_reason: String,
    pub provider: String,
}

#[async_trait::async_trait]
pub trait Provider: Send + Sync {
    async fn generate(&self, req: &GenerateRequest) -> anyhow::Result<GenerateResponse>;
    fn name(&self) -> &str;
}

pub static PROVIDER_SERVERS: LazyLock<HashMap<&str, &str>> = LazyLock::new(|| {
    HashMap::from([
        ("gemini", "generativelanguage.googleapis.com"),
        ("google", "generativelanguage.googleapis.com"),
        ("openai", "api.openai.com"),
        ("ollama", "localhost"),
        ("simulated", "localhost"),
    ])
});

pub static PROVIDER_PORTS: LazyLock<HashMap<&str, i64>> = LazyLock::new(|| {
    HashMap::from([
        ("gemini", 443_i64),
        ("google", 443),
        ("openai", 443),
        ("ollama", 11434),
        ("simulated", 0),
    ])
});

/// Builds the provider registered under `name`. `none` yields `Ok(None)` so
/// it can be used to disable the secondary provider.
pub fn build_provider(name: &str, config: &Config) -> anyhow::Result<Option<Arc<dyn Provider>>> {
    let provider: Arc<dyn Provider> = match name {
        "none" | "" => return Ok(None),
        "gemini" => Arc::new(gemini::GeminiProvider::new(
            config.gemini_api_key.as_deref(),
            &config.gemini_base_url,
        )),
        "google" => Arc::new(openai::OpenAIProvider::new_google(
            config.gemini_api_key.as_deref(),
        )),
        "openai" => Arc::new(openai::OpenAIProvider::new(
            config.openai_api_key.as_deref(),
        )),
        "ollama" => Arc::new(openai::OpenAIProvider::new_ollama(&config.ollama_base_url)),
        "simulated" => Arc::new(simulated::SimulatedProvider),
        other => anyhow::bail!("unknown LLM provider {other:?}"),
    };

    Ok(Some(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_known_providers() {
        let config = Config::default();
        for name in ["gemini", "google", "openai", "ollama", "simulated"] {
            let provider = build_provider(name, &config).unwrap().unwrap();
            assert_eq!(provider.name(), name);
        }
    }

    #[test]
    fn test_build_none_provider() {
        let config = Config::default();
        assert!(build_provider("none", &config).unwrap().is_none());
    }

    #[test]
    fn test_build_unknown_provider() {
        let config = Config::default();
        assert!(build_provider("mystery", &config).is_err());
    }

    #[test]
    fn test_provider_servers() {
        assert_eq!(
            PROVIDER_SERVERS.get("gemini"),
            Some(&"generativelanguage.googleapis.com")
        );
        assert_eq!(PROVIDER_SERVERS.get("openai"), Some(&"api.openai.com"));
        assert_eq!(PROVIDER_PORTS.get("ollama"), Some(&11434));
    }
}
