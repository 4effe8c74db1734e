//! Generative-AI service integration.
//!
//! Analysis and humanization are each a single request/response call to the
//! Gemini `generateContent` endpoint. The service receives a prompt and a JSON
//! response schema; its output is trusted verbatim.

pub mod client;
pub mod prompts;

pub use client::{GeminiClient, GeminiConfig};

use crate::models::{AnalysisResult, HumanizedResult, Tone};
use thiserror::Error;

/// Failures of an AI service round trip.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("No API key configured (set GEMINI_API_KEY or pass --api-key)")]
    MissingApiKey,

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Cannot connect to the AI service at {0}")]
    Connect(String),

    #[error("AI service error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Failed to send request: {0}")]
    Request(#[from] reqwest::Error),

    #[error("AI service returned no candidates")]
    EmptyResponse,

    #[error("Failed to decode AI response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The two calls the application makes to the AI service.
#[allow(async_fn_in_trait)]
pub trait TextService {
    /// Score `text` for AI-vs-human markers.
    async fn analyze(&self, text: &str) -> Result<AnalysisResult, ServiceError>;

    /// Rewrite `text` in the given tone.
    async fn humanize(&self, text: &str, tone: Tone) -> Result<HumanizedResult, ServiceError>;
}
