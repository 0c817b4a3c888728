//! Startup configuration loaded from the environment.
//!
//! Credentials are resolved once at startup and injected into each provider
//! at construction — a missing key is a fatal startup condition, never a
//! per-request error.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoutError};

/// Default bind address when `HOST` is unset.
const DEFAULT_HOST: &str = "0.0.0.0";

/// Default port when `PORT` is unset.
const DEFAULT_PORT: u16 = 8000;

/// Application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// API key for the Gemini provider.
    pub gemini_api_key: String,
    /// API key for the OpenAI provider.
    pub openai_api_key: String,
    /// Bind address for the API server.
    pub host: String,
    /// Listen port for the API server.
    pub port: u16,
}

impl Settings {
    /// Load settings from process environment variables.
    ///
    /// Reads `GEMINI_API_KEY`, `OPENAI_API_KEY`, `HOST`, and `PORT`.
    /// Both API keys are required; `HOST` and `PORT` fall back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(
            std::env::var("GEMINI_API_KEY").ok(),
            std::env::var("OPENAI_API_KEY").ok(),
            std::env::var("HOST").ok(),
            std::env::var("PORT").ok(),
        )
    }

    /// Resolve settings from raw variable values.
    ///
    /// Extracted from [`Settings::from_env`] so resolution and validation
    /// are unit-testable without mutating the process environment.
    pub fn from_vars(
        gemini_api_key: Option<String>,
        openai_api_key: Option<String>,
        host: Option<String>,
        port: Option<String>,
    ) -> Result<Self> {
        let gemini_api_key = gemini_api_key
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ScoutError::Config("GEMINI_API_KEY is not set".into()))?;

        let openai_api_key = openai_api_key
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ScoutError::Config("OPENAI_API_KEY is not set".into()))?;

        let port = match port.filter(|p| !p.is_empty()) {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| ScoutError::Config(format!("invalid PORT value '{raw}'")))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            gemini_api_key,
            openai_api_key,
            host: host
                .filter(|h| !h.is_empty())
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
        })
    }
}
