//! Representative selection: one fact stands in for each cluster

use crate::cluster::Cluster;
use crate::matrix::SimilarityMatrix;
use factsift_domain::Fact;

/// Indices to keep from one cluster
///
/// Clusters smaller than `min_cluster_size` are not reduced and keep every
/// member. Otherwise the single member with the highest total similarity to
/// the rest of its cluster is kept; equal totals go to the lowest index.
pub fn select(cluster: &Cluster, matrix: &SimilarityMatrix, min_cluster_size: usize) -> Vec<usize> {
    if cluster.len() < min_cluster_size {
        return cluster.members().to_vec();
    }

    let mut best: Option<(usize, f64)> = None;
    for &candidate in cluster.members() {
        let total: f64 = cluster
            .members()
            .iter()
            .filter(|&&other| other != candidate)
            .map(|&other| matrix.get(candidate, other))
            .sum();
        if best.map_or(true, |(_, top)| total > top) {
            best = Some((candidate, total));
        }
    }

    best.map(|(index, _)| vec![index]).unwrap_or_default()
}

/// Which of the matrix's facts survive selection, by index
pub fn representative_mask(clusters: &[Cluster], matrix: &SimilarityMatrix, min_cluster_size: usize) -> Vec<bool> {
    let mut keep = vec![false; matrix.len()];
    for cluster in clusters {
        for index in select(cluster, matrix, min_cluster_size) {
            keep[index] = true;
        }
    }
    keep
}

/// Keep the representatives of every cluster, in original fact order
pub fn select_representatives(
    facts: Vec<Fact>,
    clusters: &[Cluster],
    matrix: &SimilarityMatrix,
    min_cluster_size: usize,
) -> Vec<Fact> {
    let keep = representative_mask(clusters, matrix, min_cluster_size);

    facts
        .into_iter()
        .zip(keep)
        .filter(|(_, kept)| *kept)
        .map(|(fact, _)| fact)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::cluster;

    fn matrix(rows: Vec<Vec<f64>>) -> SimilarityMatrix {
        SimilarityMatrix::from_rows(rows).unwrap()
    }

    #[test]
    fn test_picks_most_central_member() {
        let m = matrix(vec![
            vec![1.0, 0.8, 0.7],
            vec![0.8, 1.0, 0.9],
            vec![0.7, 0.9, 1.0],
        ]);
        let clusters = cluster(&m, 0.5);
        assert_eq!(clusters.len(), 1);
        assert_eq!(select(&clusters[0], &m, 2), vec![1]);
    }

    #[test]
    fn test_tie_goes_to_lowest_index() {
        let m = matrix(vec![vec![1.0, 0.9], vec![0.9, 1.0]]);
        let clusters = cluster(&m, 0.5);
        assert_eq!(select(&clusters[0], &m, 2), vec![0]);
    }

    #[test]
    fn test_small_clusters_kept_whole() {
        let m = matrix(vec![vec![1.0, 0.9], vec![0.9, 1.0]]);
        let clusters = cluster(&m, 0.5);
        assert_eq!(select(&clusters[0], &m, 3), vec![0, 1]);
    }

    #[test]
    fn test_singleton() {
        let m = SimilarityMatrix::identity(1);
        let clusters = cluster(&m, 0.5);
        for min_cluster_size in [0, 1, 2] {
            assert_eq!(select(&clusters[0], &m, min_cluster_size), vec![0]);
        }
    }

    #[test]
    fn test_mask_marks_survivors() {
        let m = matrix(vec![
            vec![1.0, 0.1, 0.9],
            vec![0.1, 1.0, 0.1],
            vec![0.9, 0.1, 1.0],
        ]);
        let clusters = cluster(&m, 0.2);
        assert_eq!(representative_mask(&clusters, &m, 2), vec![true, true, false]);
        assert_eq!(representative_mask(&clusters, &m, 3), vec![true, true, true]);
    }

    #[test]
    fn test_representatives_keep_original_order() {
        let m = matrix(vec![
            vec![1.0, 0.1, 0.9],
            vec![0.1, 1.0, 0.1],
            vec![0.9, 0.1, 1.0],
        ]);
        let clusters = cluster(&m, 0.2);
        let facts = vec![Fact::new("first"), Fact::new("second"), Fact::new("third")];
        let kept = select_representatives(facts, &clusters, &m, 2);
        let statements: Vec<&str> = kept.iter().map(|f| f.statement.as_str()).collect();
        assert_eq!(statements, vec!["first", "second"]);
    }
}
