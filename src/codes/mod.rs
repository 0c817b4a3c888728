//! Normalized code results — the provider-independent shape returned to all
//! callers.

pub mod parser;

pub use parser::parse;

use serde::Serialize;

/// Output shape requested from the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// A bare ordered list of code strings.
    Simple,
    /// Code records with description/condition details.
    Detailed,
}

/// A single code with parsed detail fields.
///
/// `has_description` / `has_conditions` are derived: true iff the
/// corresponding field parsed to non-empty text. Construct via
/// [`CodeInfo::new`] so the invariant always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeInfo {
    pub code: String,
    pub description: String,
    pub conditions: String,
    pub has_description: bool,
    pub has_conditions: bool,
}

impl CodeInfo {
    /// Build a record, deriving the `has_*` flags from field emptiness.
    pub fn new(code: String, description: String, conditions: String) -> Self {
        let has_description = !description.is_empty();
        let has_conditions = !conditions.is_empty();
        Self {
            code,
            description,
            conditions,
            has_description,
            has_conditions,
        }
    }
}

/// Canonical parse result: an ordered code list in one of two shapes.
///
/// Order is the provider's emission order; duplicates are preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodesResult {
    Simple(Vec<String>),
    Detailed(Vec<CodeInfo>),
}

impl CodesResult {
    /// Empty result of the requested shape.
    pub fn empty(mode: ParseMode) -> Self {
        match mode {
            ParseMode::Simple => Self::Simple(Vec::new()),
            ParseMode::Detailed => Self::Detailed(Vec::new()),
        }
    }

    /// Number of codes in the result.
    pub fn len(&self) -> usize {
        match self {
            Self::Simple(codes) => codes.len(),
            Self::Detailed(codes) => codes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
