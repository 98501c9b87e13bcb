//! Reading facts from JSON input.

use crate::error::{CliError, Result};
use factsift_domain::{EntitySpan, Fact, FactId, Reliability};
use serde::Deserialize;
use std::fs;
use std::io::{self, Read};

/// Read the input file, or stdin when `source` is `-`.
pub fn read_source(source: &str) -> Result<String> {
    if source == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(source)?)
    }
}

/// Parse a JSON array of facts.
///
/// Each element is either a bare statement string or a fact object.
pub fn parse_facts(json: &str) -> Result<Vec<Fact>> {
    let inputs: Vec<FactInput> = serde_json::from_str(json)?;
    inputs.into_iter().map(FactInput::into_fact).collect()
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FactInput {
    Statement(String),
    Definition(FactDefinition),
}

/// Fact definition for JSON input.
#[derive(Debug, Deserialize)]
struct FactDefinition {
    statement: String,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    reliability: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    entities: Vec<EntityDefinition>,
    #[serde(default)]
    embedding: Option<Vec<f32>>,
}

#[derive(Debug, Deserialize)]
struct EntityDefinition {
    text: String,
    category: String,
}

impl FactInput {
    fn into_fact(self) -> Result<Fact> {
        match self {
            FactInput::Statement(statement) => Ok(Fact::new(statement)),
            FactInput::Definition(def) => def.into_fact(),
        }
    }
}

impl FactDefinition {
    fn into_fact(self) -> Result<Fact> {
        let mut fact = Fact::new(self.statement);

        if let Some(id) = self.id {
            fact.id = FactId::from_string(&id).map_err(CliError::InvalidInput)?;
        }
        fact.source = self.source;
        fact.title = self.title;
        if let Some(reliability) = self.reliability {
            let parsed: Reliability = reliability.parse().map_err(CliError::InvalidInput)?;
            fact.reliability = Some(parsed);
        }
        fact.tags = self.tags.into_iter().collect();
        fact.entities = self
            .entities
            .into_iter()
            .map(|e| EntitySpan::new(e.text, e.category))
            .collect();
        fact.embedding = self.embedding;

        Ok(fact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_strings() {
        let facts = parse_facts(r#"["The sky is blue.", "Grass is green."]"#).unwrap();
        assert_eq!(facts.len(), 2);
        assert_eq!(facts[1].statement, "Grass is green.");
    }

    #[test]
    fn test_full_definition() {
        let json = r#"
        [
            {
                "statement": "Paris is the capital of France.",
                "source": "https://example.org/paris",
                "reliability": "likely_true",
                "tags": ["geography", "europe"],
                "entities": [
                    {"text": "Paris", "category": "GPE"},
                    {"text": "France", "category": "GPE"}
                ]
            },
            "Water boils at 100C."
        ]
        "#;

        let facts = parse_facts(json).unwrap();
        assert_eq!(facts[0].reliability, Some(Reliability::LikelyTrue));
        assert_eq!(facts[0].entities.len(), 2);
        assert!(facts[0].tags.contains("europe"));
        assert_eq!(facts[1].statement, "Water boils at 100C.");
    }

    #[test]
    fn test_explicit_id_kept() {
        let id = FactId::new();
        let json = format!(r#"[{{"statement": "x", "id": "{}"}}]"#, id);
        assert_eq!(parse_facts(&json).unwrap()[0].id, id);
    }

    #[test]
    fn test_invalid_reliability() {
        let json = r#"[{"statement": "x", "reliability": "certain"}]"#;
        assert!(matches!(parse_facts(json), Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn test_not_an_array() {
        assert!(matches!(parse_facts(r#"{"statement": "x"}"#), Err(CliError::Serialization(_))));
    }
}
