//! Entity-overlap reduction
//!
//! A cheap pass that needs no similarity matrix: two facts naming the same
//! entities are treated as duplicates. Greedy and order dependent, the first
//! occurrence of a near-duplicate pair survives.

use factsift_domain::{EntitySpan, Fact};
use std::collections::BTreeSet;

/// Jaccard similarity of two sets (`|A ∩ B| / |A ∪ B|`)
///
/// Two empty sets score `0.0`.
pub fn jaccard<T: Ord>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Drop every fact whose entities overlap an earlier kept fact by more than `threshold`
///
/// Facts are visited in input order. Facts without entities carry no
/// evidence and are always kept.
pub fn reduce_by_entities(facts: Vec<Fact>, threshold: f64) -> Vec<Fact> {
    let mut kept: Vec<Fact> = Vec::with_capacity(facts.len());
    let mut kept_sets: Vec<BTreeSet<EntitySpan>> = Vec::new();

    for fact in facts {
        let entities: BTreeSet<EntitySpan> = fact.entities.iter().cloned().collect();
        if entities.is_empty() {
            kept.push(fact);
            continue;
        }

        let duplicate = kept_sets.iter().any(|seen| jaccard(&entities, seen) > threshold);

        if !duplicate {
            kept.push(fact);
            kept_sets.push(entities);
        }
    }

    kept
}
