//! Normalized-result caching with TTL expiry.

pub mod result_cache;

pub use result_cache::{ResultCache, CACHE_TTL_SECS};
