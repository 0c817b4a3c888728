//! OpenAI code-search provider (variant B).
//!
//! Uses the chat completions API with a search-preview model and
//! `web_search_options` so answers are grounded in live search results.
//!
//! This variant has no transient classification table: any upstream failure
//! — including timeouts — is permanent for its own purposes, so a retry
//! policy wrapped around it never re-attempts. HTTP 400 still surfaces as a
//! malformed request.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::ProviderError;

use super::{classify_http_error, CodeSearchProvider, REQUEST_TIMEOUT_SECS};

/// OpenAI REST API base.
const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Default model when none is configured.
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-search-preview";

/// Empty classification table: nothing is retryable for this variant.
const TRANSIENT_STATUSES: &[u16] = &[];

/// OpenAI provider with an API key injected at construction.
pub struct OpenAiProvider {
    api_key: String,
    model: String,
    client: Client,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish()
    }
}

impl OpenAiProvider {
    /// Build a provider with the default search-preview model.
    pub fn new(api_key: &str) -> Self {
        Self::with_model(api_key, DEFAULT_OPENAI_MODEL)
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

    pub fn default_openai_model() -> &'static str {
        DEFAULT_OPENAI_MODEL
    }

    /// Build the chat completions request body with web search enabled.
    fn build_request_body(&self, prompt: &str, instruction: &str) -> Value {
        json!({
            "model": self.model,
            "web_search_options": {},
            "messages": [
                { "role": "system", "content": instruction },
                { "role": "user", "content": prompt }
            ]
        })
    }

    fn api_url(&self) -> String {
        format!("{OPENAI_API_BASE}/chat/completions")
    }

    /// Extract the assistant message text from a chat completions response.
    fn extract_text(response: &Value) -> Option<String> {
        response["choices"][0]["message"]["content"]
            .as_str()
            .map(String::from)
    }

    /// Pull a useful message out of an OpenAI error body.
    fn error_body_message(error_text: &str) -> String {
        serde_json::from_str::<Value>(error_text)
            .ok()
            .and_then(|v| v["error"]["message"].as_str().map(String::from))
            .unwrap_or_else(|| error_text.to_string())
    }
}

#[async_trait]
impl CodeSearchProvider for OpenAiProvider {
    async fn generate(
        &self,
        prompt: &str,
        instruction: &str,
    ) -> Result<String, ProviderError> {
        let body = self.build_request_body(prompt, instruction);

        debug!(model = %self.model, "OpenAI chat completions request");

        let response = self
            .client
            .post(self.api_url())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Permanent(format!("OpenAI request failed: {e}")))?;

        if response.status().is_success() {
            let json: Value = response.json().await.map_err(|e| {
                ProviderError::Permanent(format!("failed to parse OpenAI response: {e}"))
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
        "openai"
    }
}
