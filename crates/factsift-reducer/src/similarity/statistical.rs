//! Statistical-vector strategy: TF-IDF vectors over the batch vocabulary
//!
//! Vectors depend on the whole corpus, so this strategy only exists in batch
//! form. A pointwise comparison vectorizes the two-document corpus `{a, b}`.

use crate::matrix::SimilarityMatrix;
use crate::text::content_terms;
use crate::Result;
use std::collections::{BTreeMap, BTreeSet};

type TermVector<'a> = BTreeMap<&'a str, f64>;

/// Cosine similarity of L2-normalized TF-IDF vectors for every pair of documents
///
/// Term weights are `tf * (ln((1 + n) / (1 + df)) + 1)`. Documents with no
/// content terms are similar to nothing but themselves.
pub fn statistical_matrix(docs: &[&str]) -> Result<SimilarityMatrix> {
    let terms: Vec<Vec<String>> = docs.iter().map(|d| content_terms(d)).collect();
    let n = docs.len() as f64;

    let mut document_frequency: BTreeMap<&str, usize> = BTreeMap::new();
    for doc_terms in &terms {
        let unique: BTreeSet<&str> = doc_terms.iter().map(String::as_str).collect();
        for term in unique {
            *document_frequency.entry(term).or_insert(0) += 1;
        }
    }

    let vectors: Vec<TermVector> = terms
        .iter()
        .map(|doc_terms| {
            let mut vector: TermVector = BTreeMap::new();
            for term in doc_terms {
                *vector.entry(term.as_str()).or_insert(0.0) += 1.0;
            }
            for (term, weight) in vector.iter_mut() {
                let df = document_frequency.get(term).copied().unwrap_or(0) as f64;
                *weight *= ((1.0 + n) / (1.0 + df)).ln() + 1.0;
            }
            normalize(&mut vector);
            vector
        })
        .collect();

    SimilarityMatrix::from_fn(docs.len(), |i, j| Ok(dot(&vectors[i], &vectors[j])))
}

fn normalize(vector: &mut TermVector) {
    let norm = vector.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for weight in vector.values_mut() {
            *weight /= norm;
        }
    }
}

fn dot(a: &TermVector, b: &TermVector) -> f64 {
    a.iter()
        .filter_map(|(term, wa)| b.get(term).map(|wb| wa * wb))
        .sum()
}
