//! Fact module - the unit of knowledge operated on by the reducer

use crate::{EntitySpan, Reliability};
use std::collections::BTreeSet;
use std::fmt;

/// Unique identifier for a fact based on UUIDv7
///
/// UUIDv7 ids sort by creation time, which keeps "first seen" ordering
/// recoverable after facts from several sources are merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FactId(u128);

impl FactId {
    /// Generate a new UUIDv7-based FactId
    ///
    /// # Examples
    ///
    /// ```
    /// use factsift_domain::FactId;
    ///
    /// let id = FactId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create a FactId from a raw u128 value
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse a FactId from its UUID string form
    ///
    /// # Examples
    ///
    /// ```
    /// use factsift_domain::FactId;
    ///
    /// let id = FactId::new();
    /// let parsed = FactId::from_string(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid fact id: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for FactId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// A fact - one short statement harvested from a source
///
/// The statement text is never rewritten once a fact enters a pipeline run.
/// Stages may drop a fact or attach derived annotations (entities, an
/// embedding, an importance score), nothing else.
#[derive(Debug, Clone, PartialEq)]
pub struct Fact {
    /// Unique identifier
    pub id: FactId,

    /// The statement itself
    pub statement: String,

    /// Where the statement was harvested from (URL, document id, ...)
    pub source: Option<String>,

    /// Title of the source document
    pub title: Option<String>,

    /// Reliability classification, if known
    pub reliability: Option<Reliability>,

    /// Free-form tags
    pub tags: BTreeSet<String>,

    /// Importance score assigned by the scorer
    pub importance: Option<f64>,

    /// Named entities found in the statement
    pub entities: Vec<EntitySpan>,

    /// Dense embedding of the statement, cached for the current run
    pub embedding: Option<Vec<f32>>,
}

impl Fact {
    /// Create a fact with a fresh id and no metadata
    pub fn new(statement: impl Into<String>) -> Self {
        Self {
            id: FactId::new(),
            statement: statement.into(),
            source: None,
            title: None,
            reliability: None,
            tags: BTreeSet::new(),
            importance: None,
            entities: Vec::new(),
            embedding: None,
        }
    }

    /// Attach a source identifier
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Attach a source title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Attach a reliability classification
    pub fn with_reliability(mut self, reliability: Reliability) -> Self {
        self.reliability = Some(reliability);
        self
    }

    /// Add a tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Attach entity spans
    pub fn with_entities(mut self, entities: Vec<EntitySpan>) -> Self {
        self.entities = entities;
        self
    }

    /// Attach a precomputed embedding
    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    /// Return this fact annotated with an importance score
    pub fn with_importance(mut self, importance: f64) -> Self {
        self.importance = Some(importance);
        self
    }

    /// True when the statement has no visible content
    pub fn is_blank(&self) -> bool {
        self.statement.trim().is_empty()
    }

    /// Statement length in characters, ignoring surrounding whitespace
    pub fn char_len(&self) -> usize {
        self.statement.trim().chars().count()
    }

    /// Distinct entity spans of this fact
    pub fn entity_set(&self) -> BTreeSet<&EntitySpan> {
        self.entities.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fact_id_ordering() {
        let id1 = FactId::from_value(1000);
        let id2 = FactId::from_value(2000);

        assert!(id1 < id2);
    }

    #[test]
    fn test_fact_id_chronological() {
        let id1 = FactId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = FactId::new();

        assert!(id1 < id2, "Earlier UUIDv7 should sort first");
    }

    #[test]
    fn test_fact_id_invalid_string() {
        assert!(FactId::from_string("not-a-uuid").is_err());
        assert!(FactId::from_string("").is_err());
    }

    #[test]
    fn test_builder() {
        let fact = Fact::new("Paris is the capital of France.")
            .with_source("https://example.org/france")
            .with_title("France")
            .with_reliability(Reliability::Verified)
            .with_tag("geography")
            .with_entities(vec![EntitySpan::new("Paris", "GPE"), EntitySpan::new("France", "GPE")]);

        assert_eq!(fact.source.as_deref(), Some("https://example.org/france"));
        assert_eq!(fact.reliability, Some(Reliability::Verified));
        assert!(fact.tags.contains("geography"));
        assert_eq!(fact.entity_set().len(), 2);
        assert!(fact.importance.is_none());
    }

    #[test]
    fn test_blank_and_length() {
        assert!(Fact::new("   ").is_blank());
        assert!(!Fact::new("x").is_blank());
        assert_eq!(Fact::new("  héllo  ").char_len(), 5);
    }

    #[test]
    fn test_entity_set_deduplicates() {
        let fact = Fact::new("France and France").with_entities(vec![
            EntitySpan::new("France", "GPE"),
            EntitySpan::new("France", "GPE"),
        ]);
        assert_eq!(fact.entity_set().len(), 1);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Ordering of ids follows the underlying value
        #[test]
        fn test_id_ordering_property(a: u128, b: u128) {
            let id_a = FactId::from_value(a);
            let id_b = FactId::from_value(b);

            prop_assert_eq!(id_a < id_b, a < b);
            prop_assert_eq!(id_a == id_b, a == b);
        }

        /// String form round-trips
        #[test]
        fn test_id_string_roundtrip(value: u128) {
            let id = FactId::from_value(value);
            match FactId::from_string(&id.to_string()) {
                Ok(parsed) => prop_assert_eq!(id, parsed),
                Err(e) => return Err(TestCaseError::fail(e)),
            }
        }
    }
}
