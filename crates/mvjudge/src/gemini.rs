use std::time::Duration;

use anyhow::{Context, Result};
use base64::Engine;
use serde_json::{json, Value};
use tracing::debug;

use mvjudge_core::analyzer::Analyzer;
use mvjudge_core::config::AnalyzerConfig;
use mvjudge_core::rubric::{response_schema, REVIEW_PROMPT};
use mvjudge_core::upload::VideoUpload;

/// Checked when the configured API key variable is unset.
const FALLBACK_API_KEY_ENV: &str = "API_KEY";

/// Analyzer backed by the Gemini `generateContent` API.
pub struct GeminiAnalyzer {
    client: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    api_key: String,
    thinking_budget: u32,
}

impl GeminiAnalyzer {
    /// Build from config, reading the API key from the environment.
    pub fn from_config(config: &AnalyzerConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .or_else(|_| std::env::var(FALLBACK_API_KEY_ENV))
            .with_context(|| {
                format!(
                    "no API key found: set {} (or {FALLBACK_API_KEY_ENV}), or pass --response to replay a saved analysis",
                    config.api_key_env
                )
            })?;
        Self::new(config, api_key)
    }

    pub fn new(config: &AnalyzerConfig, api_key: String) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            thinking_budget: config.thinking_budget,
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, self.model
        )
    }
}

impl Analyzer for GeminiAnalyzer {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn analyze(&self, upload: &VideoUpload) -> Result<Value> {
        let body = request_body(upload, self.thinking_budget);
        debug!(model = %self.model, bytes = upload.size(), "sending generateContent request");

        let response = self
            .client
            .post(self.url())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .context("analysis request failed")?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            anyhow::bail!("analysis service returned {status}: {text}");
        }

        let payload: Value = response
            .json()
            .context("analysis service returned invalid JSON")?;
        extract_response_json(&payload)
    }
}

/// `generateContent` request for `upload` with the review rubric and schema.
pub fn request_body(upload: &VideoUpload, thinking_budget: u32) -> Value {
    let encoded = base64::engine::general_purpose::STANDARD.encode(&upload.data);
    json!({
        "contents": [{
            "parts": [
                { "inlineData": { "mimeType": upload.mime_type, "data": encoded } },
                { "text": REVIEW_PROMPT }
            ]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": response_schema(),
            "thinkingConfig": { "thinkingBudget": thinking_budget }
        }
    })
}

/// Parse the JSON answer out of a `generateContent` response.
pub fn extract_response_json(response: &Value) -> Result<Value> {
    let parts = response["candidates"][0]["content"]["parts"]
        .as_array()
        .context("response has no candidate content")?;
    let text: String = parts
        .iter()
        .filter(|p| !p["thought"].as_bool().unwrap_or(false))
        .filter_map(|p| p["text"].as_str())
        .collect();
    if text.trim().is_empty() {
        anyhow::bail!("response candidate has no text");
    }
    serde_json::from_str(&text).context("response text is not valid JSON")
}
