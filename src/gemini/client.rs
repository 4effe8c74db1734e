//! HTTP client for the Gemini `generateContent` API.

use super::prompts::{analysis_prompt, analysis_schema, humanize_prompt, humanize_schema};
use super::{ServiceError, TextService};
use crate::analysis::with_local_counts;
use crate::models::{AnalysisResult, HumanizedResult, Tone};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

/// Configuration for the Gemini client.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub model_name: String,
    pub temperature: f32,
    pub timeout_seconds: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key: None,
            model_name: "gemini-3-flash-preview".to_string(),
            temperature: 1.0,
            timeout_seconds: 120,
        }
    }
}

/// generateContent request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    role: String,
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    response_mime_type: String,
    response_schema: Value,
}

/// generateContent response body.
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

/// The Gemini-backed text service.
pub struct GeminiClient {
    config: GeminiConfig,
    http_client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, ServiceError> {
        info!("Initializing Gemini client with model {}", config.model_name);

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_url.trim_end_matches('/'),
            self.config.model_name
        )
    }

    fn build_request(&self, prompt: &str, schema: Value) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user".to_string(),
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                response_mime_type: "application/json".to_string(),
                response_schema: schema,
            },
        }
    }

    /// Send a prompt constrained to `schema` and return the raw JSON text.
    async fn generate_json(&self, prompt: &str, schema: Value) -> Result<String, ServiceError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ServiceError::MissingApiKey)?;

        let url = self.endpoint();
        let request = self.build_request(prompt, schema);
        debug!("POST {} ({} prompt chars)", url, prompt.len());

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ServiceError::Timeout(self.config.timeout_seconds)
                } else if e.is_connect() {
                    ServiceError::Connect(self.config.api_url.clone())
                } else {
                    ServiceError::Request(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Api { status, body });
        }

        let body: GenerateContentResponse = response.json().await?;
        candidate_text(body)
    }
}

/// Concatenate the text parts of the first candidate.
///
/// An empty reply is read as `{}`, which then fails schema-required fields.
fn candidate_text(response: GenerateContentResponse) -> Result<String, ServiceError> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(ServiceError::EmptyResponse)?;

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        Ok("{}".to_string())
    } else {
        Ok(text)
    }
}

impl TextService for GeminiClient {
    async fn analyze(&self, text: &str) -> Result<AnalysisResult, ServiceError> {
        info!("Requesting analysis for {} characters", text.chars().count());
        let raw = self
            .generate_json(&analysis_prompt(text), analysis_schema())
            .await?;
        let result: AnalysisResult = serde_json::from_str(&raw)?;
        Ok(with_local_counts(result, text))
    }

    async fn humanize(&self, text: &str, tone: Tone) -> Result<HumanizedResult, ServiceError> {
        info!("Requesting {} humanization", tone);
        let raw = self
            .generate_json(&humanize_prompt(text, tone), humanize_schema())
            .await?;
        Ok(serde_json::from_str(&raw)?)
    }
}
