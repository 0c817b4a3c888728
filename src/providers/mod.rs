//! Code-search provider abstraction.
//!
//! Two upstream services answer the same job — "search the web, return
//! coupon codes as text" — through one capability trait. Variants differ
//! only in wire format and in how they classify upstream failures; retry
//! execution lives in [`retry`], so policy and orchestration stay
//! provider-agnostic.

pub mod gemini;
pub mod openai;
pub mod retry;

pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;
pub use retry::RetryPolicy;

use async_trait::async_trait;

use crate::codes::ParseMode;
use crate::error::ProviderError;

/// Per-call HTTP timeout, independent of retry backoff bookkeeping.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Fixed system instruction for the simple code list shape.
pub static SIMPLE_INSTRUCTION: &str = "You are a coupon code finder. Search the web for \
currently active coupon codes based on the user's request. Return ONLY the codes \
themselves, one per line. Do NOT include explanatory text, descriptions, or commentary.";

/// Fixed system instruction for the detailed shape.
///
/// Kept byte-identical across provider variants so output formatting does
/// not drift for reasons unrelated to parsing.
pub static DETAILED_INSTRUCTION: &str = "You are a detailed code finder. Search the web for \
coupon codes based on the user's request.

IMPORTANT: For each code you find, you MUST format it EXACTLY like this:
CODE | discount description | conditions

Examples:
SAVE20 | 20% off entire order | new customers only, expires 12/31/24
FREESHIP | free shipping | orders over $50, valid until end of month
WELCOME10 | $10 off first purchase | new users only, minimum $25 order

If you cannot find specific conditions, write \"no specific conditions found\"
If you cannot find the discount amount, write \"discount amount not specified\"

Do NOT include explanatory text before or after the codes. Only return the formatted code lines.";

/// The fixed instruction sent for a given output shape — the same bytes
/// regardless of which provider variant executes the call.
pub fn system_instruction(mode: ParseMode) -> &'static str {
    match mode {
        ParseMode::Simple => SIMPLE_INSTRUCTION,
        ParseMode::Detailed => DETAILED_INSTRUCTION,
    }
}

/// A generative reasoning service with live web-search capability.
///
/// `generate` sends the caller's prompt plus a fixed system instruction and
/// returns the provider's raw textual answer. Implementations classify
/// their own failures; they never retry.
#[async_trait]
pub trait CodeSearchProvider: Send + Sync {
    async fn generate(&self, prompt: &str, instruction: &str)
        -> Result<String, ProviderError>;

    /// Short provider name for logging.
    fn name(&self) -> &str;
}

/// Map an upstream HTTP error status through a variant's classification
/// table.
///
/// `transient_statuses` is the per-variant table: statuses listed there are
/// retryable, 400 is a malformed request, everything else is permanent.
pub(crate) fn classify_http_error(
    status: u16,
    message: &str,
    transient_statuses: &[u16],
) -> ProviderError {
    if transient_statuses.contains(&status) {
        ProviderError::Transient(format!("HTTP {status}: {message}"))
    } else if status == 400 {
        ProviderError::MalformedRequest(format!("HTTP {status}: {message}"))
    } else {
        ProviderError::Permanent(format!("HTTP {status}: {message}"))
    }
}
