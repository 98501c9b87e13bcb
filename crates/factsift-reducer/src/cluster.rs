//! Agglomerative clustering with average linkage
//!
//! Starts with every fact in its own cluster and repeatedly merges the two
//! closest clusters, where cluster distance is the mean pairwise distance
//! between their members. Merging stops once the closest pair is at or above
//! the distance threshold.

use crate::matrix::SimilarityMatrix;

/// A group of near-duplicate facts, by index into the run's fact list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    members: Vec<usize>,
}

impl Cluster {
    /// Member indices, ascending
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True if the cluster has no members
    ///
    /// Clusters returned by [`cluster`] always have at least one.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// True if fact `index` belongs to this cluster
    pub fn contains(&self, index: usize) -> bool {
        self.members.binary_search(&index).is_ok()
    }
}

/// Partition the facts covered by `matrix` into clusters
///
/// Two clusters merge only while their average distance is strictly below
/// `distance_threshold`. Equal distances resolve to the pair with the lowest
/// indices, so the result is deterministic. Clusters come back ordered by
/// their smallest member.
pub fn cluster(matrix: &SimilarityMatrix, distance_threshold: f64) -> Vec<Cluster> {
    let n = matrix.len();
    if n == 0 {
        return Vec::new();
    }

    let mut distances: Vec<Vec<f64>> = (0..n)
        .map(|i| (0..n).map(|j| matrix.distance(i, j)).collect())
        .collect();
    let mut members: Vec<Vec<usize>> = (0..n).map(|i| vec![i]).collect();
    let mut active = vec![true; n];

    loop {
        let mut best: Option<(usize, usize, f64)> = None;
        for a in (0..n).filter(|&a| active[a]) {
            for b in ((a + 1)..n).filter(|&b| active[b]) {
                let d = distances[a][b];
                if best.map_or(true, |(_, _, current)| d < current) {
                    best = Some((a, b, d));
                }
            }
        }

        let (a, b) = match best {
            Some((a, b, d)) if d < distance_threshold => (a, b),
            _ => break,
        };

        // Lance-Williams update for average linkage, merged cluster keeps slot `a`
        let size_a = members[a].len() as f64;
        let size_b = members[b].len() as f64;
        for k in (0..n).filter(|&k| active[k] && k != a && k != b) {
            let merged = (size_a * distances[k][a] + size_b * distances[k][b]) / (size_a + size_b);
            distances[k][a] = merged;
            distances[a][k] = merged;
        }

        let absorbed = std::mem::take(&mut members[b]);
        members[a].extend(absorbed);
        members[a].sort_unstable();
        active[b] = false;
    }

    members
        .into_iter()
        .zip(active)
        .filter(|(_, alive)| *alive)
        .map(|(members, _)| Cluster { members })
        .collect()
}
