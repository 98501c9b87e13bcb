//! Trait definitions for external collaborators
//!
//! The reducer never loads models itself. Callers construct these
//! collaborators and hand them in; implementations live in other crates.

use crate::{EntitySpan, Fact};

/// Trait for producing dense statement embeddings
///
/// Implemented by the infrastructure layer (factsift-embedding).
/// Calls are synchronous and may be slow, so the reducer always asks for a
/// whole batch at once. The reducer accepts providers whose error converts
/// into `factsift_embedding::EmbeddingError`, so it can tell an unreachable
/// provider from a malformed answer.
pub trait EmbeddingProvider {
    /// Error type for embedding operations
    type Error: std::fmt::Display;

    /// Embed every text in `texts`, returning one vector per input in order
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, Self::Error>;

    /// Dimension of the vectors this provider produces
    fn dimension(&self) -> usize;
}

/// Trait for extracting entity spans from a statement
pub trait Annotator {
    /// Extract the entities mentioned in `text`
    fn entities(&self, text: &str) -> Vec<EntitySpan>;

    /// Fill in entities for every fact that has none yet
    fn annotate(&self, facts: &mut [Fact]) {
        for fact in facts.iter_mut().filter(|f| f.entities.is_empty()) {
            fact.entities = self.entities(&fact.statement);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedAnnotator;

    impl Annotator for FixedAnnotator {
        fn entities(&self, _text: &str) -> Vec<EntitySpan> {
            vec![EntitySpan::new("X", "MISC")]
        }
    }

    #[test]
    fn test_annotate_keeps_existing_entities() {
        let mut facts = vec![
            Fact::new("a").with_entities(vec![EntitySpan::new("Y", "ORG")]),
            Fact::new("b"),
        ];
        FixedAnnotator.annotate(&mut facts);

        assert_eq!(facts[0].entities, vec![EntitySpan::new("Y", "ORG")]);
        assert_eq!(facts[1].entities, vec![EntitySpan::new("X", "MISC")]);
    }
}
