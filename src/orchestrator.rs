//! Request orchestration: the single path every endpoint calls.
//!
//! Per request: check the cache; on a miss, invoke the endpoint's provider
//! variant under the retry policy, parse the raw output, store it under the
//! fixed TTL, return it. Failed lookups surface as errors and never
//! populate the cache. Concurrent misses on the same key are collapsed into
//! one upstream call (single-flight).

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::cache::{ResultCache, CACHE_TTL_SECS};
use crate::codes::{self, CodesResult, ParseMode};
use crate::error::{Result, ScoutError};
use crate::providers::{system_instruction, CodeSearchProvider, RetryPolicy};

/// Endpoint identity. Each endpoint is statically bound to one provider
/// variant, one result shape, and one cache key prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointId {
    /// `POST /codes` — Gemini, simple shape.
    Codes,
    /// `POST /codes-detailed` — Gemini, detailed shape.
    CodesDetailed,
    /// `POST /codes-detailed-chatgpt` — OpenAI, detailed shape.
    CodesDetailedChatgpt,
}

impl EndpointId {
    /// Cache key prefix. Identical prompts on different endpoints must land
    /// in distinct cache entries.
    pub fn cache_prefix(&self) -> &'static str {
        match self {
            Self::Codes => "codes",
            Self::CodesDetailed => "codes_detailed",
            Self::CodesDetailedChatgpt => "codes_detailed_chatgpt",
        }
    }

    /// Result shape produced by this endpoint.
    pub fn mode(&self) -> ParseMode {
        match self {
            Self::Codes => ParseMode::Simple,
            Self::CodesDetailed | Self::CodesDetailedChatgpt => ParseMode::Detailed,
        }
    }
}

/// Orchestrator over the provider variants, retry policy, and result cache.
pub struct CodeFinder {
    gemini: Arc<dyn CodeSearchProvider>,
    openai: Arc<dyn CodeSearchProvider>,
    retry: RetryPolicy,
    cache: ResultCache,
    /// Per-key guards collapsing concurrent identical misses.
    flights: DashMap<String, Arc<Mutex<()>>>,
}

impl CodeFinder {
    /// Build a finder with the default retry policy and cache TTL.
    pub fn new(
        gemini: Arc<dyn CodeSearchProvider>,
        openai: Arc<dyn CodeSearchProvider>,
    ) -> Self {
        Self::with_policy(gemini, openai, RetryPolicy::default(), CACHE_TTL_SECS)
    }

    /// Build a finder with an explicit retry policy and TTL.
    pub fn with_policy(
        gemini: Arc<dyn CodeSearchProvider>,
        openai: Arc<dyn CodeSearchProvider>,
        retry: RetryPolicy,
        ttl_secs: u64,
    ) -> Self {
        Self {
            gemini,
            openai,
            retry,
            cache: ResultCache::new(ttl_secs),
            flights: DashMap::new(),
        }
    }

    /// Handle one request: cached result or a fresh provider lookup.
    ///
    /// Empty prompts are rejected before any key computation or provider
    /// call. The miss path runs in a detached task so a disconnecting
    /// caller cannot abort the upstream call — the result still lands in
    /// the cache for single-flight waiters and future identical queries.
    pub async fn handle(self: Arc<Self>, endpoint: EndpointId, prompt: &str) -> Result<CodesResult> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(ScoutError::EmptyPrompt);
        }

        let key = ResultCache::cache_key(endpoint.cache_prefix(), prompt);
        if let Some(hit) = self.cache.get(&key) {
            debug!(endpoint = endpoint.cache_prefix(), "cache hit");
            return Ok(hit);
        }
        debug!(endpoint = endpoint.cache_prefix(), "cache miss");

        let this = Arc::clone(&self);
        let prompt = prompt.to_string();
        tokio::spawn(async move { this.fetch_and_store(endpoint, key, prompt).await })
            .await
            .map_err(|e| ScoutError::Server(format!("lookup task failed: {e}")))?
    }

    async fn fetch_and_store(
        &self,
        endpoint: EndpointId,
        key: String,
        prompt: String,
    ) -> Result<CodesResult> {
        let flight = {
            // Scope the map guard — holding a shard lock across an await
            // point can deadlock.
            self.flights.entry(key.clone()).or_default().clone()
        };
        let guard = flight.lock().await;
        let outcome = self.lookup(endpoint, &key, &prompt).await;
        drop(guard);
        self.flights.remove(&key);
        outcome
    }

    async fn lookup(&self, endpoint: EndpointId, key: &str, prompt: &str) -> Result<CodesResult> {
        // Re-check after acquiring the flight guard: another request may
        // have completed the same lookup while we waited.
        if let Some(hit) = self.cache.get(key) {
            debug!(endpoint = endpoint.cache_prefix(), "cache hit after flight wait");
            return Ok(hit);
        }

        let provider = self.provider_for(endpoint);
        let instruction = system_instruction(endpoint.mode());
        let raw = self
            .retry
            .run(|| provider.generate(prompt, instruction))
            .await?;

        let result = codes::parse(&raw, endpoint.mode());
        info!(
            endpoint = endpoint.cache_prefix(),
            provider = provider.name(),
            codes = result.len(),
            "parsed provider response"
        );

        // Only successful lookups populate the cache — a failure is never
        // stored as a negative result.
        self.cache.put(key.to_string(), result.clone());
        Ok(result)
    }

    fn provider_for(&self, endpoint: EndpointId) -> &Arc<dyn CodeSearchProvider> {
        match endpoint {
            EndpointId::Codes | EndpointId::CodesDetailed => &self.gemini,
            EndpointId::CodesDetailedChatgpt => &self.openai,
        }
    }
}
