//! Gemini code-search provider (variant A).
//!
//! Speaks the Gemini REST API directly with the `googleSearch` tool enabled
//! so answers are grounded in live search results.
//!
//! Thinking model support: Gemini 2.5 models return parts tagged
//! `thought: true`. This provider filters those out and only returns the
//! final non-thought text.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::ProviderError;

use super::{classify_http_error, CodeSearchProvider, REQUEST_TIMEOUT_SECS};

/// Gemini v1beta REST API base.
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model when none is configured.
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Statuses this variant treats as retryable. Temporary unavailability is
/// expected to clear on the next attempt; anything else is not.
const TRANSIENT_STATUSES: &[u16] = &[503];

/// Gemini provider with an API key injected at construction.
pub struct GeminiProvider {
    api_key: String,
    model: String,
    client: Client,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish()
    }
}

impl GeminiProvider {
    /// Build a provider with the default model.
    pub fn new(api_key: &str) -> Self {
        Self::with_model(api_key, DEFAULT_GEMINI_MODEL)
    }

    /// Build a provider with an explicit model.
    pub fn with_model(api_key: &str, model: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            client: Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("failed to build HTTP client"),
        }
    }

    pub fn default_gemini_model() -> &'static str {
        DEFAULT_GEMINI_MODEL
    }

    /// Build the `generateContent` request body: the user prompt, the fixed
    /// system instruction, and the live web-search tool.
    fn build_request_body(&self, prompt: &str, instruction: &str) -> Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }],
            "systemInstruction": {
                "parts": [{ "text": instruction }]
            },
            "tools": [{ "googleSearch": {} }]
        })
    }

    /// Build the full API URL for `generateContent`.
    fn api_url(&self) -> String {
        format!("{}/models/{}:generateContent", GEMINI_API_BASE, self.model)
    }

    /// Extract final answer text from a Gemini API response.
    ///
    /// Gemini 2.5 thinking models return parts tagged `"thought": true`.
    /// Those are intermediate reasoning steps and must be filtered out.
    /// If no non-thought parts exist (unusual), fall back to the thought
    /// text so the caller always gets *something*.
    fn extract_text(response: &Value) -> Option<String> {
        let parts = response["candidates"][0]["content"]["parts"].as_array()?;

        let final_parts: Vec<&str> = parts
            .iter()
            .filter(|p| !p["thought"].as_bool().unwrap_or(false))
            .filter_map(|p| p["text"].as_str())
            .collect();

        if !final_parts.is_empty() {
            return Some(final_parts.join(""));
        }

        let thought_parts: Vec<&str> = parts.iter().filter_map(|p| p["text"].as_str()).collect();

        if !thought_parts.is_empty() {
            Some(thought_parts.join(""))
        } else {
            None
        }
    }

    /// Pull a useful message out of a Gemini error body.
    fn error_body_message(error_text: &str) -> String {
        serde_json::from_str::<Value>(error_text)
            .ok()
            .and_then(|v| v["error"]["message"].as_str().map(String::from))
            .unwrap_or_else(|| error_text.to_string())
    }
}

#[async_trait]
impl CodeSearchProvider for GeminiProvider {
    async fn generate(
        &self,
        prompt: &str,
        instruction: &str,
    ) -> Result<String, ProviderError> {
        let body = self.build_request_body(prompt, instruction);

        debug!(model = %self.model, "Gemini generateContent request");

        let response = self
            .client
            .post(self.api_url())
            .query(&[("key", self.api_key.as_str())])
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                // A timed-out call is as retryable as an upstream 503.
                if e.is_timeout() {
                    ProviderError::Transient(format!("Gemini request timed out: {e}"))
                } else {
                    ProviderError::Permanent(format!("Gemini request failed: {e}"))
                }
            })?;

        if response.status().is_success() {
            let json: Value = response.json().await.map_err(|e| {
                ProviderError::Permanent(format!("failed to parse Gemini response: {e}"))
            })?;
            return Ok(Self::extract_text(&json).unwrap_or_default());
        }

        let status = response.status().as_u16();
        let error_text = response.text().await.unwrap_or_default();
        Err(classify_http_error(
            status,
            &Self::error_body_message(&error_text),
            TRANSIENT_STATUSES,
        ))
    }

    fn name(&self) -> &str {
        "gemini"
    }
}
