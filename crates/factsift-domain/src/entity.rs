//! Entity spans attached to facts

/// A named entity found in a statement
///
/// Two spans are the same entity only when both text and category match
/// exactly; no normalization or cross-fact resolution happens here.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntitySpan {
    /// Surface text of the entity (e.g. "France")
    pub text: String,

    /// Entity category as reported by the tagger (e.g. "GPE", "ORG")
    pub category: String,
}

impl EntitySpan {
    /// Create a new entity span
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
        }
    }
}
