use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::snapshot::JitterBounds;

/// Largest accepted `JITTER_*` magnitude.
pub const MAX_JITTER: i32 = 1000;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub environment: String,
    pub database_url: Option<String>,
    pub llm_provider: String,
    pub llm_model: String,
    pub fallback_provider: String,
    pub fallback_model: String,
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: String,
    pub openai_api_key: Option<String>,
    pub ollama_base_url: String,
    pub llm_temperature: f32,
    pub llm_max_tokens: u32,
    pub llm_max_attempts: u32,
    pub llm_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_query_chars: usize,
    pub history_capacity: usize,
    pub baseline_path: Option<String>,
    pub jitter: JitterBounds,
    pub otel_service_name: String,
    pub otel_exporter_endpoint: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            port: parse_var("APP_PORT", "8080"),
            environment: env::var("APP_ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
            database_url: non_empty_var("DATABASE_URL"),
            llm_provider: env::var("LLM_PROVIDER").unwrap_or_else(|_| "gemini".to_string()),
            llm_model: env::var("LLM_MODEL").unwrap_or_else(|_| "gemini-1.5-flash".to_string()),
            fallback_provider: env::var("FALLBACK_PROVIDER")
                .unwrap_or_else(|_| "none".to_string()),
            fallback_model: env::var("FALLBACK_MODEL")
                .unwrap_or_else(|_| "gpt-4.1-mini".to_string()),
            gemini_api_key: non_empty_var("GEMINI_API_KEY")
                .or_else(|| non_empty_var("GOOGLE_API_KEY")),
            gemini_base_url: env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".to_string()),
            openai_api_key: non_empty_var("OPENAI_API_KEY"),
            ollama_base_url: env::var("OLLAMA_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:11434".to_string()),
            llm_temperature: parse_var("LLM_TEMPERATURE", "0.4"),
            llm_max_tokens: parse_var("LLM_MAX_TOKENS", "300"),
            llm_max_attempts: parse_var::<u32>("LLM_MAX_ATTEMPTS", "1").max(1),
            llm_timeout_secs: parse_var("LLM_TIMEOUT_SECS", "30"),
            request_timeout_secs: parse_var("REQUEST_TIMEOUT_SECS", "60"),
            max_query_chars: parse_var("MAX_QUERY_CHARS", "2000"),
            history_capacity: parse_var("HISTORY_CAPACITY", "1000"),
            baseline_path: non_empty_var("BASELINE_PATH"),
            jitter: JitterBounds {
                glucose: parse_jitter("JITTER_GLUCOSE", "5"),
                heart_rate: parse_jitter("JITTER_HEART_RATE", "3"),
                spo2: parse_jitter("JITTER_SPO2", "2"),
                weekly: parse_jitter("JITTER_WEEKLY", "3"),
                monthly: parse_jitter("JITTER_MONTHLY", "2"),
            },
            otel_service_name: env::var("OTEL_SERVICE_NAME")
                .unwrap_or_else(|_| "glucose-dashboard-api".to_string()),
            otel_exporter_endpoint: env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:4317".to_string()),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Budget for all model calls of one chat request. Must stay below the
    /// request timeout so the fallback answer is sent before the 408.
    pub fn llm_deadline(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs) * 9 / 10
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T>(key: &str, default: &str) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    raw.parse()
        .unwrap_or_else(|e| panic!("{key} must be a valid number, got {raw:?}: {e}"))
}

fn parse_jitter(key: &str, default: &str) -> i32 {
    let bound: i32 = parse_var(key, default);
    check_jitter(key, bound).unwrap_or_else(|e| panic!("{e}"))
}

fn check_jitter(key: &str, bound: i32) -> Result<i32, String> {
    if (0..=MAX_JITTER).contains(&bound) {
        Ok(bound)
    } else {
        Err(format!("{key} must be between 0 and {MAX_JITTER}, got {bound}"))
    }
}

#[cfg(test)]
impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            environment: "test".to_string(),
            database_url: None,
            llm_provider: "gemini".to_string(),
            llm_model: "gemini-1.5-flash".to_string(),
            fallback_provider: "none".to_string(),
            fallback_model: "gpt-4.1-mini".to_string(),
            gemini_api_key: None,
            gemini_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            openai_api_key: None,
            ollama_base_url: "http://localhost:11434".to_string(),
            llm_temperature: 0.4,
            llm_max_tokens: 300,
            llm_max_attempts: 1,
            llm_timeout_secs: 30,
            request_timeout_secs: 60,
            max_query_chars: 2000,
            history_capacity: 1000,
            baseline_path: None,
            jitter: JitterBounds::default(),
            otel_service_name: "glucose-dashboard-api".to_string(),
            otel_exporter_endpoint: "http://localhost:4317".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_production() {
        let config = Config {
            environment: "production".to_string(),
            ..Config::default()
        };
        assert!(config.is_production());
        assert!(!Config::default().is_production());
    }

    #[test]
    fn test_parse_var_uses_default_when_unset() {
        let value: u32 = parse_var("GLUCOSE_DASHBOARD_TEST_UNSET_VAR", "42");
        assert_eq!(value, 42);
    }

    #[test]
    fn test_llm_deadline_below_request_timeout() {
        let config = Config::default();
        assert_eq!(config.llm_deadline(), Duration::from_secs(54));
        assert!(config.llm_deadline() < Duration::from_secs(config.request_timeout_secs));
    }

    #[test]
    fn test_check_jitter_range() {
        assert_eq!(check_jitter("JITTER_GLUCOSE", 0), Ok(0));
        assert_eq!(check_jitter("JITTER_GLUCOSE", MAX_JITTER), Ok(MAX_JITTER));
        assert!(check_jitter("JITTER_GLUCOSE", -1).is_err());
        assert!(check_jitter("JITTER_GLUCOSE", i32::MIN).is_err());
        assert!(check_jitter("JITTER_GLUCOSE", MAX_JITTER + 1).is_err());
    }

    #[test]
    fn test_non_empty_var_missing() {
        assert_eq!(non_empty_var("GLUCOSE_DASHBOARD_TEST_MISSING_KEY"), None);
    }
}
