use super::{plus_plus_init, FitConfig, KMeansFit};
use crate::field::ObservationMatrix;
use rand::Rng;

/// Squared Euclidean distance between two observation rows.
///
/// Accumulates in f64: rows are lat*lon wide and f32 sums drift at that
/// length.
#[inline]
pub(crate) fn squared_distance(a: &[f32], b: &[f32]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b)
        .map(|(&x, &y)| {
            let d = f64::from(x) - f64::from(y);
            d * d
        })
        .sum()
}

#[inline]
fn nearest_centroid(row: &[f32], centroids: &[f32], k: usize, d: usize) -> (usize, f64) {
    let mut min = f64::MAX;
    let mut min_idx = 0;
    for j in 0..k {
        let dist = squared_distance(row, &centroids[j * d..(j + 1) * d]);
        if dist < min {
            min = dist;
            min_idx = j;
        }
    }
    (min_idx, min)
}

#[derive(Debug)]
struct UpdateResult {
    shift_squared: f64,
    counts: Vec<u32>,
}

fn update_centroids(
    matrix: &ObservationMatrix,
    k: usize,
    labels: &[usize],
    centroids: &mut [f32],
) -> UpdateResult {
    let d = matrix.cols();
    let mut counts = vec![0u32; k];
    let mut sums = vec![0.0f64; k * d];

    for (i, &label) in labels.iter().enumerate() {
        debug_assert!(label < k);
        counts[label] += 1;
        let sum = &mut sums[label * d..(label + 1) * d];
        for (s, &v) in sum.iter_mut().zip(matrix.row(i)) {
            *s += f64::from(v);
        }
    }

    let mut shift_squared = 0.0f64;

    for j in 0..k {
        if counts[j] == 0 {
            // It's an empty cluster, the caller reassigns it
            continue;
        }

        let count = f64::from(counts[j]);
        let centroid = &mut centroids[j * d..(j + 1) * d];
        for (c, &sum) in centroid.iter_mut().zip(&sums[j * d..(j + 1) * d]) {
            let new = (sum / count) as f32;
            let delta = f64::from(*c) - f64::from(new);
            shift_squared += delta * delta;
            *c = new;
        }
    }

    UpdateResult {
        shift_squared,
        counts,
    }
}

pub(crate) fn run(
    rng: &mut impl Rng,
    matrix: &ObservationMatrix,
    k: usize,
    config: &FitConfig,
) -> KMeansFit {
    let n = matrix.rows();
    let d = matrix.cols();
    debug_assert!(k >= 1 && k <= n);

    let init_points = plus_plus_init::find_initial(rng, matrix, k);

    let mut centroids = vec![0.0f32; k * d];
    for (j, &idx) in init_points.iter().enumerate() {
        centroids[j * d..(j + 1) * d].copy_from_slice(matrix.row(idx));
    }

    let mut labels = vec![0usize; n];
    let mut iterations = 0;
    let mut converged = false;

    for _ in 0..config.max_iter {
        // E-step: assign every row to its nearest centroid
        for (i, label) in labels.iter_mut().enumerate() {
            *label = nearest_centroid(matrix.row(i), &centroids, k, d).0;
        }

        // M-step: new centroids = per-cluster mean
        let update = update_centroids(matrix, k, &labels, &mut centroids);

        // Empty cluster reassignment
        for (j, &count) in update.counts.iter().enumerate() {
            if count == 0 {
                let idx = rng.random_range(0..n);
                centroids[j * d..(j + 1) * d].copy_from_slice(matrix.row(idx));
            }
        }

        iterations += 1;

        if update.shift_squared < config.tolerance {
            converged = true;
            break;
        }
    }

    // Final pass keeps labels and inertia consistent with the final centroids
    let mut inertia = 0.0f64;
    for (i, label) in labels.iter_mut().enumerate() {
        let (idx, dist) = nearest_centroid(matrix.row(i), &centroids, k, d);
        *label = idx;
        inertia += dist;
    }

    KMeansFit {
        centroids,
        k,
        labels,
        inertia,
        iterations,
        converged,
        n_init_used: 1,
    }
}
