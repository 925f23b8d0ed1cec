//! Lloyd's k-means over method feature vectors.
//!
//! Initialization is deterministic farthest-point seeding (first point,
//! then repeatedly the point farthest from its nearest chosen centroid),
//! so repeated runs on the same input produce identical clusterings
//! without a seeded RNG.

const MAX_ITERATIONS: usize = 100;

#[derive(Clone, Debug)]
pub struct KMeansResult {
    /// Cluster label per input point
    pub labels: Vec<usize>,
    /// Within-cluster sum of squared Euclidean distances to centroids
    pub wcss: f64,
}

/// Run Lloyd's algorithm for a fixed `k`. Returns `None` when `k` is not
/// satisfiable for the input or labels fail to stabilize within the
/// iteration cap; such candidates are skipped by the k selection.
pub fn run(points: &[Vec<f64>], k: usize) -> Option<KMeansResult> {
    if k == 0 || points.len() < k {
        return None;
    }

    let mut centroids = farthest_point_seeds(points, k);
    let mut labels = vec![0usize; points.len()];

    for _ in 0..MAX_ITERATIONS {
        let next_labels: Vec<usize> = points
            .iter()
            .map(|p| nearest_centroid(p, &centroids))
            .collect();

        let converged = next_labels == labels;
        labels = next_labels;
        if converged {
            let wcss = wcss(points, &labels, &centroids);
            return Some(KMeansResult { labels, wcss });
        }

        centroids = update_centroids(points, &labels, &centroids);
    }

    None
}

/// Choose `k` by minimal WCSS among candidates, per the documented
/// behavior: `n <= 3` forces `k = 2`; otherwise candidates span
/// `[2, min(floor(sqrt(n)), 5)]`.
pub fn cluster(points: &[Vec<f64>]) -> Option<KMeansResult> {
    let n = points.len();
    if n <= 3 {
        return run(points, 2);
    }

    let k_max = ((n as f64).sqrt().floor() as usize).min(5).max(2);
    (2..=k_max)
        .filter_map(|k| run(points, k))
        .min_by(|a, b| a.wcss.total_cmp(&b.wcss))
}

fn farthest_point_seeds(points: &[Vec<f64>], k: usize) -> Vec<Vec<f64>> {
    let mut seeds = vec![points[0].clone()];

    while seeds.len() < k {
        let farthest = points
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| {
                min_distance_sq(a, &seeds).total_cmp(&min_distance_sq(b, &seeds))
            })
            .map(|(idx, _)| idx)
            .unwrap_or(0);
        seeds.push(points[farthest].clone());
    }

    seeds
}

fn min_distance_sq(point: &[f64], centroids: &[Vec<f64>]) -> f64 {
    centroids
        .iter()
        .map(|c| distance_sq(point, c))
        .fold(f64::INFINITY, f64::min)
}

fn nearest_centroid(point: &[f64], centroids: &[Vec<f64>]) -> usize {
    centroids
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| distance_sq(point, a).total_cmp(&distance_sq(point, b)))
        .map(|(idx, _)| idx)
        .unwrap_or(0)
}

fn update_centroids(
    points: &[Vec<f64>],
    labels: &[usize],
    previous: &[Vec<f64>],
) -> Vec<Vec<f64>> {
    let dims = points[0].len();
    let k = previous.len();
    let mut sums = vec![vec![0.0; dims]; k];
    let mut counts = vec![0usize; k];

    for (point, &label) in points.iter().zip(labels) {
        counts[label] += 1;
        for (dim, value) in point.iter().enumerate() {
            sums[label][dim] += value;
        }
    }

    sums.into_iter()
        .zip(counts)
        .enumerate()
        .map(|(idx, (sum, count))| {
            if count == 0 {
                // An emptied cluster keeps its previous centroid
                previous[idx].clone()
            } else {
                sum.into_iter().map(|v| v / count as f64).collect()
            }
        })
        .collect()
}

fn wcss(points: &[Vec<f64>], labels: &[usize], centroids: &[Vec<f64>]) -> f64 {
    points
        .iter()
        .zip(labels)
        .map(|(point, &label)| distance_sq(point, &centroids[label]))
        .sum()
}

fn distance_sq(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}
