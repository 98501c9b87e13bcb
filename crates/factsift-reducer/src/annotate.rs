//! Heuristic entity annotator for facts that arrive without entity spans

use crate::text::is_stopword;
use factsift_domain::{Annotator, EntitySpan};

/// Category given to runs of capitalized words
pub const PROPER: &str = "PROPER";

/// Category given to numbers, with or without a unit suffix
pub const CARDINAL: &str = "CARDINAL";

/// Derives entity spans from capitalization and numerals
///
/// Consecutive capitalized words form one span ("Eiffel Tower"); a
/// capitalized stopword opening a sentence ("The", "In") is not part of a
/// span. Tokens containing digits ("100C", "1889") become cardinal spans.
/// Punctuation ends a run. This is a stand-in for a real tagger, not a
/// replacement.
#[derive(Debug, Clone, Copy, Default)]
pub struct CapitalizedSpanAnnotator;

impl CapitalizedSpanAnnotator {
    /// Create the annotator
    pub fn new() -> Self {
        Self
    }
}

impl Annotator for CapitalizedSpanAnnotator {
    fn entities(&self, text: &str) -> Vec<EntitySpan> {
        let mut spans: Vec<EntitySpan> = Vec::new();
        let mut run: Vec<&str> = Vec::new();
        let mut sentence_start = true;

        for raw in text.split_whitespace() {
            let token = raw.trim_matches(|c: char| !c.is_alphanumeric());
            let ends_sentence = raw.ends_with(['.', '!', '?']);

            if token.chars().any(|c| c.is_ascii_digit()) {
                flush(&mut run, &mut spans);
                push_unique(&mut spans, EntitySpan::new(token, CARDINAL));
            } else if starts_uppercase(token) && !(sentence_start && is_stopword(&token.to_lowercase())) {
                run.push(token);
            } else {
                flush(&mut run, &mut spans);
            }

            if ends_sentence || raw.ends_with([',', ';', ':']) {
                flush(&mut run, &mut spans);
            }
            sentence_start = ends_sentence || (sentence_start && token.is_empty());
        }
        flush(&mut run, &mut spans);

        spans
    }
}

fn starts_uppercase(token: &str) -> bool {
    token.chars().next().is_some_and(char::is_uppercase)
}

fn flush(run: &mut Vec<&str>, spans: &mut Vec<EntitySpan>) {
    if !run.is_empty() {
        push_unique(spans, EntitySpan::new(run.join(" "), PROPER));
        run.clear();
    }
}

fn push_unique(spans: &mut Vec<EntitySpan>, span: EntitySpan) {
    if !spans.contains(&span) {
        spans.push(span);
    }
}
