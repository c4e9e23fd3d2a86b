//! Google Gemini `generateContent` client.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

use crate::error::AdvisorError;
use crate::extract::extract_json_object;
use crate::pipeline::{AdvisorRequest, CandidateSource};
use crate::prompt::build_budget_prompt;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

const PRIMER: &str =
    "You are a financial advisor expert who specializes in personal budgeting and financial planning.";
const PRIMER_REPLY: &str = "I'm ready to provide expert financial advice and budgeting guidance.";

#[derive(Debug, Clone, PartialEq)]
pub struct GeminiConfig {
    pub model: String,
    pub base_url: String,
    pub temperature: f64,
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-pro".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1".to_string(),
            temperature: 0.1,
            timeout_secs: 30,
        }
    }
}

/// Find an API key: explicit value, then `GEMINI_API_KEY`, then the key file.
pub fn resolve_api_key(explicit: Option<&str>, key_file: Option<&Path>) -> Result<String, AdvisorError> {
    let non_empty = |s: String| {
        let s = s.trim().to_string();
        (!s.is_empty()).then_some(s)
    };

    if let Some(key) = explicit.map(str::to_string).and_then(non_empty) {
        return Ok(key);
    }
    if let Some(key) = std::env::var(API_KEY_ENV).ok().and_then(non_empty) {
        return Ok(key);
    }
    if let Some(path) = key_file {
        if let Some(key) = std::fs::read_to_string(path).ok().and_then(non_empty) {
            tracing::debug!(path = %path.display(), "using Gemini key file");
            return Ok(key);
        }
    }
    Err(AdvisorError::MissingApiKey)
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    top_p: f64,
    top_k: u32,
    max_output_tokens: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

fn turn(role: &'static str, text: impl Into<String>) -> Content {
    Content {
        role,
        parts: vec![Part { text: text.into() }],
    }
}

/// Text of the first candidate's first part
fn response_text(body: &str) -> Result<String, AdvisorError> {
    let resp: GenerateResponse = serde_json::from_str(body).map_err(|_| AdvisorError::EmptyResponse)?;
    resp.candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .filter(|t| !t.trim().is_empty())
        .ok_or(AdvisorError::EmptyResponse)
}

pub struct GeminiClient {
    api_key: String,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, config: GeminiConfig) -> Self {
        Self {
            api_key: api_key.into(),
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Send one prompt and return the model's text.
    pub fn generate(&self, prompt: &str) -> Result<String, AdvisorError> {
        // Callers may already be inside the CLI's tokio runtime.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            tokio::task::block_in_place(|| handle.block_on(self.generate_async(prompt)))
        } else {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(self.generate_async(prompt))
        }
    }

    async fn generate_async(&self, prompt: &str) -> Result<String, AdvisorError> {
        let body = GenerateRequest {
            contents: vec![turn("user", PRIMER), turn("model", PRIMER_REPLY), turn("user", prompt)],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                top_p: 0.9,
                top_k: 40,
                max_output_tokens: 2048,
            },
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .build()?;

        tracing::debug!(model = %self.config.model, "sending generateContent request");
        let resp = client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(AdvisorError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        response_text(&text)
    }
}

impl CandidateSource for GeminiClient {
    fn fetch(&self, request: &AdvisorRequest, today: NaiveDate) -> Result<Value, AdvisorError> {
        let prompt = build_budget_prompt(request, today);
        let text = self.generate(&prompt)?;
        extract_json_object(&text).ok_or(AdvisorError::NoJson)
    }
}
