//! Mean silhouette coefficient over a k-means sweep.

use crate::field::ObservationMatrix;
use crate::kmeans::lloyds::squared_distance;
use crate::kmeans::{self, FitConfig};
use crate::{EmptyRangeSnafu, KRange, ScoreCurve, SilhouetteUndefinedSnafu, SweepError};
use rand::Rng;
use snafu::prelude::*;

/// Fit k-means for every k in `range` and score each fit with the mean
/// silhouette coefficient.
///
/// The curve is the result; picking the maximum is left to the reader, unlike
/// the elbow sweep which emits an explicit recommendation. The whole sweep
/// aborts when any requested k exceeds the observation count, checked before
/// any fitting happens.
pub fn silhouette_sweep(
    rng: &mut impl Rng,
    matrix: &ObservationMatrix,
    range: KRange,
) -> Result<ScoreCurve, SweepError> {
    ensure!(
        range.min <= range.max,
        EmptyRangeSnafu {
            min: range.min,
            max: range.max
        }
    );
    ensure!(range.min >= 2, SilhouetteUndefinedSnafu { k_min: range.min });
    kmeans::ensure_k(range.max, matrix.rows())?;

    let config = FitConfig::default();
    let mut curve = ScoreCurve::with_capacity(range.len());
    for k in range.min..=range.max {
        let fit = kmeans::fit(rng, matrix, k, &config)?;
        curve.push((k, mean_silhouette(matrix, &fit.labels, k)));
    }

    Ok(curve)
}

/// Mean silhouette coefficient over all observations, Euclidean distance.
///
/// Per observation: a = mean distance to the other members of its own
/// cluster, b = the smallest mean distance to any other cluster's members,
/// score (b - a) / max(a, b). Members of singleton clusters score 0. The
/// mean lies in [-1, 1].
pub fn mean_silhouette(matrix: &ObservationMatrix, labels: &[usize], k: usize) -> f64 {
    let n = matrix.rows();
    assert_eq!(labels.len(), n);

    let mut sizes = vec![0usize; k];
    for &label in labels {
        sizes[label] += 1;
    }

    let mut total = 0.0f64;
    for i in 0..n {
        let own = labels[i];
        if sizes[own] <= 1 {
            // Singleton clusters score 0
            continue;
        }

        let mut distance_sums = vec![0.0f64; k];
        for j in 0..n {
            if j == i {
                continue;
            }
            distance_sums[labels[j]] += squared_distance(matrix.row(i), matrix.row(j)).sqrt();
        }

        let a = distance_sums[own] / (sizes[own] - 1) as f64;
        let b = (0..k)
            .filter(|&c| c != own && sizes[c] > 0)
            .map(|c| distance_sums[c] / sizes[c] as f64)
            .fold(f64::INFINITY, f64::min);
        if !b.is_finite() {
            // No other populated cluster to compare against
            continue;
        }

        let denom = a.max(b);
        if denom > 0.0 {
            total += (b - a) / denom;
        }
    }

    total / n as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng;
    use pretty_assertions::assert_eq;

    const N_PER_CLUSTER: usize = 10;

    fn three_pattern_matrix() -> ObservationMatrix {
        let centers = [0.0f32, 40.0, 80.0];
        let n = N_PER_CLUSTER * 3;
        let mut data = Vec::new();
        for i in 0..n {
            let center = centers[i % 3];
            let jitter = i as f32 * 0.01;
            data.extend([center + jitter, center, center - jitter, center]);
        }
        ObservationMatrix::new(n, 4, data).unwrap()
    }

    #[test]
    fn two_tight_pairs_score_near_one() {
        let matrix =
            ObservationMatrix::new(4, 1, vec![0.0, 0.0, 10.0, 10.0]).unwrap();
        let score = mean_silhouette(&matrix, &[0, 0, 1, 1], 2);
        // a = 0 and b = 10 for every observation
        assert!((score - 1.0).abs() < 1e-9, "got {score}");
    }

    #[test]
    fn hand_computed_mixed_clusters() {
        // Row 0 is a singleton (scores 0); rows 1 and 2 pair up.
        // Row 1: a = 1, b = 10 -> 0.9
        // Row 2: a = 1, b = 11 -> 10/11
        let matrix = ObservationMatrix::new(3, 1, vec![0.0, 10.0, 11.0]).unwrap();
        let score = mean_silhouette(&matrix, &[0, 1, 1], 2);
        let expected = (0.9 + 10.0 / 11.0) / 3.0;
        assert!((score - expected).abs() < 1e-9, "got {score}");
    }

    #[test]
    fn peak_at_three_for_three_clusters() {
        let matrix = three_pattern_matrix();
        let curve = silhouette_sweep(&mut rng::new(), &matrix, KRange::new(2, 5)).unwrap();
        assert_eq!(curve.len(), 4);

        let (best_k, best_score) = curve
            .iter()
            .copied()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .unwrap();
        assert_eq!(best_k, 3);
        assert!(best_score > 0.9, "three tight clusters should score high");
    }

    #[test]
    fn scores_are_bounded() {
        let matrix = three_pattern_matrix();
        let curve = silhouette_sweep(&mut rng::new(), &matrix, KRange::new(2, 6)).unwrap();
        for &(k, score) in &curve {
            assert!(
                (-1.0..=1.0).contains(&score),
                "silhouette for k={k} out of bounds: {score}"
            );
        }
    }

    #[test]
    fn deterministic_across_runs() {
        let matrix = three_pattern_matrix();
        let first = silhouette_sweep(&mut rng::new(), &matrix, KRange::new(2, 5)).unwrap();
        let second = silhouette_sweep(&mut rng::new(), &matrix, KRange::new(2, 5)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn k_below_two_fails() {
        let matrix = three_pattern_matrix();
        let err = silhouette_sweep(&mut rng::new(), &matrix, KRange::new(1, 5)).unwrap_err();
        assert!(matches!(err, SweepError::SilhouetteUndefined { .. }));
    }

    #[test]
    fn k_beyond_observations_fails_before_fitting() {
        let matrix = ObservationMatrix::new(5, 2, vec![0.0; 10]).unwrap();
        let err = silhouette_sweep(&mut rng::new(), &matrix, KRange::new(2, 8)).unwrap_err();
        assert!(matches!(err, SweepError::InsufficientData { .. }));
    }

    #[test]
    fn zero_variance_scores_zero() {
        let matrix = ObservationMatrix::new(8, 4, vec![3.0; 32]).unwrap();
        let curve = silhouette_sweep(&mut rng::new(), &matrix, KRange::new(2, 4)).unwrap();
        for &(_, score) in &curve {
            assert_eq!(score, 0.0);
        }
    }
}
