//! Provider output normalization.
//!
//! Provider answers are natural language augmented with search results, so
//! parsing is total: a line that doesn't parse is dropped, and output that
//! yields nothing produces an empty result of the requested shape. An empty
//! list is a valid answer, never an error.
//!
//! Recognized detailed formats:
//! - `CODE | discount description | conditions`
//! - `CODE - discount description`

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use super::{CodeInfo, CodesResult, ParseMode};

/// Shape of a plausible coupon code after uppercasing.
static CODE_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9%_-]{3,20}$").expect("valid code-shape regex"));

/// Leading list markers (`- `, `* `, `• `, `1. `, `2) `) stripped before parsing.
static BULLET_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[-*•]\s+|\d+[.)]\s+)").expect("valid bullet regex"));

/// Uppercase words that look code-shaped but are ordinary prose or brand
/// names in provider output.
static EXCLUDED_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "FOUND", "SEVERAL", "TYPES", "BUT", "SPECIFIC", "UNIVERSALLY", "APPLICABLE", "ARE",
        "LESS", "COMMON", "MANY", "ACTIVATED", "THROUGH", "MEMBERSHIP", "VERIFICATION",
        "AUTOMATICALLY", "APPLIED", "DURING", "SALES", "BASED", "THE", "SEARCH", "RESULTS",
        "HERE", "SOME", "GENERAL", "DISCOUNT", "CATEGORIES", "AND", "OFFERS", "THAT",
        "FUNCTION", "LIKE", "CODES", "WIDELY", "OFF", "REQUIRES", "OFTEN", "FOR", "MEMBERS",
        "APP", "ORDER", "FREE", "SHIPPING", "EARLY", "ACCESS", "EXCLUSIVE", "CODE", "SIGNING",
        "MENTIONED", "SNIPPETS", "TIME", "SENSITIVE", "REQUIRE", "CONDITIONS", "BUYING",
        "MULTIPLE", "ITEMS", "CANNOT", "PROVIDE", "ACTUAL", "VALID", "CURRENTLY", "ACTIVE",
        "ALPHANUMERIC", "WITHOUT", "ONGOING", "PROMOTION", "INDICATE", "PROCESSES", "RATHER",
        "THAN", "SIMPLE", "PUBLIC", "THEREFORE", "THERE", "LIST", "DIRECTLY", "REQUESTED",
        "FORMAT", "DIFFERENT", "VERIFY", "WITH", "BIRTHDAY", "NIKE", "AMAZON", "WALMART",
        "MCDONALDS", "MCDONALD", "COUPON", "PROMO", "DEAL", "SALE", "SAVE", "PERCENT",
        "DOLLAR", "UNFORTUNATELY", "DEALS", "FOLLOWING", "AVAILABLE", "WEBSITE", "ONLINE",
        "STORE", "PURCHASE", "CHECKOUT", "WHEN", "YOUR", "YOU", "CAN", "GET", "USE", "HAVE",
        "WILL", "THIS", "FROM", "THEIR", "THEY", "ALSO", "MORE", "ALL", "EACH", "ONLY",
        "FIRST", "LAST", "NEXT", "MAKE", "GOOD", "NEW", "USED", "WAY", "MAY", "TAKE", "COME",
        "ITS", "NOW", "FIND", "LONG", "DOWN", "DAY", "DID", "HAS", "HER", "HIM", "HIS", "HOW",
        "MAN", "OLD", "SEE", "TWO", "WHO", "BOY", "CAME", "LET", "PUT", "SAY", "SHE", "TOO",
        "COMPILATION", "DETAILS", "RESTRICTIONS", "EXPIRATION", "DATES", "MINIMUM", "MAXIMUM",
        "USERS", "CUSTOMERS", "ORDERS", "PRODUCTS", "SELECTION", "POPULAR", "DEVICES",
        "BOOKS", "HOME", "KITCHEN", "BEAUTY", "FASHION", "DELIVERY", "TRIAL", "MONTH",
        "STUDENT", "PRIME", "CARDS", "FIRE", "STICK", "RING", "CAMERA", "AUDIO", "SMART",
        "WIRELESS", "KINDLE", "AUDIBLE", "AUDIOBOOKS", "COMPUTER", "MOUNTS", "CABLES",
        "TOTAL", "SELECTED", "GRAPHIC", "COMIC", "LIGHTNING", "SUBSCRIBE", "OVER", "SPEND",
        "SELECT", "ADDITIONALLY", "PLEASE", "NOTE", "CHANGE", "FREQUENTLY", "ALWAYS", "IDEA",
        "TERMS", "SITE", "BEFORE", "MAKING", "PROMOTIONS", "OTHER", "WAYS", "STILL",
        "HOWEVER", "TRADITIONAL", "PROVIDES", "VARIOUS", "USING",
    ]
    .into_iter()
    .collect()
});

/// Phrases providers emit in the description slot when no amount was found.
const EMPTY_DESCRIPTION_SENTINELS: &[&str] = &[
    "discount amount not specified",
    "discount not specified",
    "amount not specified",
    "discount amount not available",
];

/// Phrases providers emit in the conditions slot when no conditions were found.
const EMPTY_CONDITION_SENTINELS: &[&str] = &[
    "no specific conditions mentioned",
    "no specific conditions found",
    "conditions not specified",
    "no conditions",
    "conditions not available",
];

/// Normalize raw provider output into the requested result shape.
pub fn parse(raw: &str, mode: ParseMode) -> CodesResult {
    match mode {
        ParseMode::Simple => CodesResult::Simple(parse_simple(raw)),
        ParseMode::Detailed => CodesResult::Detailed(parse_detailed(raw)),
    }
}

fn parse_simple(raw: &str) -> Vec<String> {
    let mut codes = Vec::new();
    for line in raw.lines() {
        let line = strip_bullet(line.trim());
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        for token in line.split(|c: char| c.is_whitespace() || c == ',') {
            let token = token.trim_matches(|c: char| {
                matches!(c, '*' | '.' | ',' | ':' | ';' | '"' | '\'' | '(' | ')' | '[' | ']' | '`')
            });
            // A lowercase digit-free token is prose, not a code.
            if token.chars().any(|c| c.is_lowercase())
                && !token.chars().any(|c| c.is_ascii_digit())
            {
                continue;
            }
            let candidate = token.to_uppercase();
            if looks_like_code(&candidate) {
                codes.push(candidate);
            }
        }
    }
    codes
}

fn parse_detailed(raw: &str) -> Vec<CodeInfo> {
    let mut records = Vec::new();
    for line in raw.lines() {
        let line = strip_bullet(line.trim());
        if line.is_empty() || line.starts_with('#') || line.len() < 3 {
            continue;
        }
        let parsed = if line.contains('|') {
            parse_pipe_line(line)
        } else if line.contains(" - ") {
            parse_dash_line(line)
        } else {
            None
        };
        if let Some(info) = parsed {
            records.push(info);
        }
    }
    records
}

/// `CODE | description | conditions` (conditions optional).
fn parse_pipe_line(line: &str) -> Option<CodeInfo> {
    let parts: Vec<&str> = line.split('|').map(str::trim).collect();
    if parts.len() < 2 {
        return None;
    }
    let code = parts[0].to_uppercase();
    if !looks_like_code(&code) {
        return None;
    }
    let description = normalize_field(parts[1], EMPTY_DESCRIPTION_SENTINELS);
    let conditions = normalize_field(
        parts.get(2).copied().unwrap_or(""),
        EMPTY_CONDITION_SENTINELS,
    );
    Some(CodeInfo::new(code, description, conditions))
}

/// `CODE - description`. The dash format never carries conditions.
fn parse_dash_line(line: &str) -> Option<CodeInfo> {
    let (code, description) = line.split_once(" - ")?;
    let code = code.trim().to_uppercase();
    if !looks_like_code(&code) {
        return None;
    }
    let description = normalize_field(description, EMPTY_DESCRIPTION_SENTINELS);
    Some(CodeInfo::new(code, description, String::new()))
}

/// Collapse sentinel "nothing found" phrases and whitespace to the empty
/// string so the `has_*` flags can be derived from emptiness alone.
fn normalize_field(value: &str, sentinels: &[&str]) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() || sentinels.contains(&trimmed.to_lowercase().as_str()) {
        String::new()
    } else {
        trimmed.to_string()
    }
}

fn strip_bullet(line: &str) -> &str {
    match BULLET_PREFIX.find(line) {
        Some(m) => &line[m.end()..],
        None => line,
    }
}

/// Whether an uppercased token plausibly is a coupon code: 3–20 chars of
/// `A-Z0-9%_-`, not a known prose/brand word, and containing at least one
/// digit or letter.
fn looks_like_code(code: &str) -> bool {
    CODE_SHAPE.is_match(code)
        && !EXCLUDED_WORDS.contains(code)
        && code
            .chars()
            .any(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipe_line_full() {
        let raw = "SAVE20 | 20% off entire order | new customers only";
        let CodesResult::Detailed(codes) = parse(raw, ParseMode::Detailed) else {
            panic!("expected detailed result");
        };
        assert_eq!(codes.len(), 1);
        assert_eq!(codes[0].code, "SAVE20");
        assert_eq!(codes[0].description, "20% off entire order");
        assert_eq!(codes[0].conditions, "new customers only");
        assert!(codes[0].has_description);
        assert!(codes[0].has_conditions);
    }

    #[test]
    fn test_pipe_line_sentinel_conditions_normalize_to_empty() {
        let raw = "FREESHIP | free shipping | no specific conditions found";
        let CodesResult::Detailed(codes) = parse(raw, ParseMode::Detailed) else {
            panic!("expected detailed result");
        };
        assert_eq!(codes[0].code, "FREESHIP");
        assert!(codes[0].has_description);
        assert!(!codes[0].has_conditions);
        assert_eq!(codes[0].conditions, "");
    }

    #[test]
    fn test_pipe_line_sentinel_description_normalizes_to_empty() {
        let raw = "MYSTERY1 | discount amount not specified | orders over $50";
        let CodesResult::Detailed(codes) = parse(raw, ParseMode::Detailed) else {
            panic!("expected detailed result");
        };
        assert!(!codes[0].has_description);
        assert_eq!(codes[0].description, "");
        assert!(codes[0].has_conditions);
    }

    #[test]
    fn test_dash_line_has_no_conditions() {
        let raw = "WELCOME10 - $10 off first purchase";
        let CodesResult::Detailed(codes) = parse(raw, ParseMode::Detailed) else {
            panic!("expected detailed result");
        };
        assert_eq!(codes[0].code, "WELCOME10");
        assert_eq!(codes[0].description, "$10 off first purchase");
        assert!(!codes[0].has_conditions);
        assert_eq!(codes[0].conditions, "");
    }

    #[test]
    fn test_unparseable_output_yields_empty_not_error() {
        let raw = "I could not find any currently active codes for that store.";
        assert_eq!(parse(raw, ParseMode::Detailed), CodesResult::Detailed(vec![]));
        assert_eq!(parse("", ParseMode::Simple), CodesResult::Simple(vec![]));
    }

    #[test]
    fn test_malformed_record_dropped_others_kept() {
        let raw = "SAVE20 | 20% off\nthe following | codes exist\nBOGO50 | buy one get one";
        let CodesResult::Detailed(codes) = parse(raw, ParseMode::Detailed) else {
            panic!("expected detailed result");
        };
        // "the following" is not code-shaped; its line is dropped.
        assert_eq!(codes.len(), 2);
        assert_eq!(codes[0].code, "SAVE20");
        assert_eq!(codes[1].code, "BOGO50");
    }

    #[test]
    fn test_excluded_prose_words_rejected() {
        let raw = "DISCOUNT\nSHIPPING\nSAVE15";
        let CodesResult::Simple(codes) = parse(raw, ParseMode::Simple) else {
            panic!("expected simple result");
        };
        assert_eq!(codes, vec!["SAVE15"]);
    }

    #[test]
    fn test_simple_mode_extracts_tokens_per_line() {
        let raw = "CODE1\nCODE2\nCODE3";
        let CodesResult::Simple(codes) = parse(raw, ParseMode::Simple) else {
            panic!("expected simple result");
        };
        assert_eq!(codes, vec!["CODE1", "CODE2", "CODE3"]);
    }

    #[test]
    fn test_simple_mode_filters_lowercase_prose() {
        let raw = "here are some usable coupon savings today";
        assert_eq!(parse(raw, ParseMode::Simple), CodesResult::Simple(vec![]));
        // A lowercase token with a digit is still a plausible code.
        let CodesResult::Simple(codes) = parse("save20", ParseMode::Simple) else {
            panic!("expected simple result");
        };
        assert_eq!(codes, vec!["SAVE20"]);
    }

    #[test]
    fn test_simple_mode_preserves_order_and_duplicates() {
        let raw = "ZZZ10 AAA20 ZZZ10";
        let CodesResult::Simple(codes) = parse(raw, ParseMode::Simple) else {
            panic!("expected simple result");
        };
        assert_eq!(codes, vec!["ZZZ10", "AAA20", "ZZZ10"]);
    }

    #[test]
    fn test_bullets_and_punctuation_stripped() {
        let raw = "- SAVE20 | 20% off\n1. EXTRA5 | $5 off\n* \"DEAL99\"";
        let CodesResult::Detailed(codes) = parse(raw, ParseMode::Detailed) else {
            panic!("expected detailed result");
        };
        assert_eq!(codes.len(), 2);
        assert_eq!(codes[0].code, "SAVE20");
        assert_eq!(codes[1].code, "EXTRA5");

        let CodesResult::Simple(simple) = parse("* \"DEAL99\"", ParseMode::Simple) else {
            panic!("expected simple result");
        };
        assert_eq!(simple, vec!["DEAL99"]);
    }

    #[test]
    fn test_lowercase_codes_uppercased() {
        let raw = "save20 | 20% off";
        let CodesResult::Detailed(codes) = parse(raw, ParseMode::Detailed) else {
            panic!("expected detailed result");
        };
        assert_eq!(codes[0].code, "SAVE20");
    }

    #[test]
    fn test_code_length_bounds() {
        assert!(!looks_like_code("AB"));
        assert!(looks_like_code("AB1"));
        assert!(looks_like_code(&"A".repeat(20)));
        assert!(!looks_like_code(&"A".repeat(21)));
    }

    #[test]
    fn test_code_charset() {
        assert!(looks_like_code("15OFF50"));
        assert!(looks_like_code("SAVE-20"));
        assert!(looks_like_code("EXTRA_5"));
        assert!(looks_like_code("20%OFF"));
        assert!(!looks_like_code("SAVE 20"));
        assert!(!looks_like_code("CAFÉ20"));
    }

    #[test]
    fn test_comment_lines_skipped() {
        let raw = "# header from the model\nSAVE20 | 20% off";
        let CodesResult::Detailed(codes) = parse(raw, ParseMode::Detailed) else {
            panic!("expected detailed result");
        };
        assert_eq!(codes.len(), 1);
    }

    #[test]
    fn test_pipe_with_missing_conditions_field() {
        let raw = "SAVE20 | 20% off";
        let CodesResult::Detailed(codes) = parse(raw, ParseMode::Detailed) else {
            panic!("expected detailed result");
        };
        assert!(!codes[0].has_conditions);
        assert_eq!(codes[0].conditions, "");
    }
}
