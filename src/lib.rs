//! Promoscout — web-search-backed coupon code discovery.
//!
//! A prompt ("find discount codes for X") is delegated to a generative
//! reasoning provider with live web search, and the free-form answer is
//! normalized into a stable, machine-consumable code list. Every client
//! surface sees the same contract regardless of which provider answered.
//!
//! Pipeline: cache check → retry-wrapped provider call → response
//! normalization → cache store. See [`orchestrator::CodeFinder`].

pub mod api;
pub mod cache;
pub mod codes;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod providers;

pub use codes::{CodeInfo, CodesResult, ParseMode};
pub use config::Settings;
pub use error::{ProviderError, Result, ScoutError};
pub use orchestrator::{CodeFinder, EndpointId};
