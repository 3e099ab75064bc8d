use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

use super::{GenerateRequest, GenerateResponse, Provider, ProviderError};

/// Google Generative Language API (`models/{model}:generateContent`).
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(api_key: Option<&str>, base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.map(str::to_string),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<UsageMetadata>,
    model_version: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

#[derive(Deserialize)]
struct GeminiError {
    error: GeminiErrorDetail,
}

#[derive(Deserialize)]
struct GeminiErrorDetail {
    message: String,
    #[serde(default)]
    status: String,
}

fn text_content(text: &str, role: Option<&str>) -> GeminiContent {
    GeminiContent {
        role: role.map(str::to_string),
        parts: vec![GeminiPart {
            text: Some(text.to_string()),
        }],
    }
}

fn build_body(req: &GenerateRequest) -> GeminiRequest {
    GeminiRequest {
        system_instruction: (!req.system.is_empty()).then(|| text_content(&req.system, None)),
        contents: vec![text_content(&req.prompt, Some("user"))],
        generation_config: GenerationConfig {
            temperature: req.temperature,
            max_output_tokens: req.max_tokens,
        },
    }
}

fn into_generate_response(resp: GeminiResponse, requested_model: &str) -> GenerateResponse {
    let first = resp.candidates.into_iter().next();

    let finish_reason = first
        .as_ref()
        .and_then(|c| c.finish_reason.clone())
        .map(|r| r.to_lowercase())
        .unwrap_or_default();

    let content = first
        .and_then(|c| c.content)
        .map(|c| {
            c.parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    let (input_tokens, output_tokens) = resp
        .usage_metadata
        .map(|u| (u.prompt_token_count, u.candidates_token_count))
        .unwrap_or((0, 0));

    GenerateResponse {
        content,
        model: resp
            .model_version
            .unwrap_or_else(|| requested_model.to_string()),
        input_tokens,
        output_tokens,
        finish_reason,
        provider: String::new(),
    }
}

#[async_trait::async_trait]
impl Provider for GeminiProvider {
    async fn generate(&self, req: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::MissingCredential(self.name().to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(api_key)
                .map_err(|e| anyhow::anyhow!("invalid API key header: {e}"))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let response = self
            .client
            .post(self.endpoint(&req.model))
            .headers(headers)
            .json(&build_body(req))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            if let Ok(err) = serde_json::from_str::<GeminiError>(&error_body) {
                return Err(anyhow::anyhow!(
                    "Gemini API error ({}): {} {}",
                    status,
                    err.error.status,
                    err.error.message
                ));
            }
            return Err(anyhow::anyhow!(
                "Gemini API error ({}): {}",
                status,
                error_body
            ));
        }

        let resp: GeminiResponse = response.json().await?;

        Ok(into_generate_response(resp, &req.model))
    }

    fn name(&self) -> &str {
        "gemini"
    }
}
