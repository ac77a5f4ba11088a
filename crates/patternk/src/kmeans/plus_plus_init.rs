use crate::field::ObservationMatrix;
use crate::kmeans::lloyds::squared_distance;
use rand::Rng;
use std::array;

// Scikit uses (2+log(k)) candidates, which is 3 or 4 for the single-digit k
// swept here; settle on 3
const N_CANDIDATES: usize = 3;

#[inline(always)]
fn sample_by_distance(rng: &mut impl Rng, min_distances: &[f64], sum: f64) -> usize {
    let random_threshold = rng.random::<f64>() * sum;
    let mut cumsum = 0.0;

    for (i, &distance) in min_distances.iter().enumerate() {
        cumsum += distance;
        if cumsum > random_threshold {
            return i;
        }
    }

    min_distances.len() - 1
}

/// Pick k starting rows with greedy k-means++: sample several candidates per
/// step by squared distance to the chosen set and keep the one minimising the
/// total potential (sum of min distances).
pub fn find_initial(rng: &mut impl Rng, matrix: &ObservationMatrix, k: usize) -> Vec<usize> {
    let n = matrix.rows();
    assert!(k >= 1);
    assert!(k <= n);

    let mut init_points = Vec::<usize>::with_capacity(k);
    let c0 = rng.random_range(0..n);
    init_points.push(c0);

    let mut min_distances = vec![0.0f64; n];
    let mut min_distances_sum = 0.0f64;
    for i in 0..n {
        let d = squared_distance(matrix.row(i), matrix.row(c0));
        min_distances[i] = d;
        min_distances_sum += d;
    }

    let mut candidate_min_distances: [_; N_CANDIDATES] = array::from_fn(|_| vec![0.0f64; n]);

    for _ in 1..k {
        // Sample all candidates upfront (uses cached sum)
        let mut candidates = [0usize; N_CANDIDATES];
        for candidate in candidates.iter_mut() {
            *candidate = sample_by_distance(rng, &min_distances, min_distances_sum);
        }

        let mut potentials = [0.0f64; N_CANDIDATES];

        for (j, candidate_min) in candidate_min_distances.iter_mut().enumerate() {
            let candidate_row = matrix.row(candidates[j]);
            for i in 0..n {
                let d = squared_distance(matrix.row(i), candidate_row).min(min_distances[i]);
                candidate_min[i] = d;
                potentials[j] += d;
            }
        }

        let mut best_potential = f64::INFINITY;
        let mut best = 0;
        for (i, potential) in potentials.iter().copied().enumerate() {
            if potential < best_potential {
                best_potential = potential;
                best = i;
            }
        }

        std::mem::swap(&mut min_distances, &mut candidate_min_distances[best]);
        min_distances_sum = best_potential;
        init_points.push(candidates[best]);
    }

    init_points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng;
    use pretty_assertions::{assert_eq, assert_ne};

    fn matrix_from_rows(rows: &[&[f32]]) -> ObservationMatrix {
        let cols = rows[0].len();
        let data: Vec<f32> = rows.iter().flat_map(|r| r.iter().copied()).collect();
        ObservationMatrix::new(rows.len(), cols, data).unwrap()
    }

    fn line_matrix() -> ObservationMatrix {
        matrix_from_rows(&[
            &[0.0, 0.0],
            &[1.0, 1.0],
            &[2.0, 2.0],
            &[3.0, 3.0],
            &[4.0, 4.0],
            &[5.0, 5.0],
        ])
    }

    #[test]
    fn basic_invariants() {
        let mut rng = rng::new();
        let matrix = line_matrix();

        for k in 1..=4 {
            let result = find_initial(&mut rng, &matrix, k);
            assert_eq!(result.len(), k, "must return exactly k indices");

            for &idx in &result {
                assert!(idx < matrix.rows(), "index must be valid");
            }

            let mut sorted = result.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), k, "indices must be distinct");
        }
    }

    #[test]
    fn k_equals_one() {
        let mut rng = rng::new();
        let matrix = matrix_from_rows(&[&[0.0], &[1.0], &[2.0]]);

        let result = find_initial(&mut rng, &matrix, 1);
        assert_eq!(result.len(), 1);
        assert!(result[0] < 3);
    }

    #[test]
    fn k_equals_n() {
        let mut rng = rng::new();
        let matrix = matrix_from_rows(&[&[0.0], &[10.0], &[20.0], &[30.0]]);

        let mut result = find_initial(&mut rng, &matrix, 4);
        result.sort();
        assert_eq!(result, vec![0, 1, 2, 3]);
    }

    #[test]
    fn outliers_are_selected() {
        let mut rng = rng::new();

        // Dense cluster near origin (rows 0..10) + two distant outliers (10, 11)
        let mut rows: Vec<[f32; 2]> = (0..10).map(|i| [i as f32 * 0.01; 2]).collect();
        rows.push([100.0, 100.0]);
        rows.push([-100.0, -100.0]);
        let refs: Vec<&[f32]> = rows.iter().map(|r| r.as_slice()).collect();
        let matrix = matrix_from_rows(&refs);

        let result = find_initial(&mut rng, &matrix, 3);
        assert!(result.contains(&10), "outlier at row 10 should be selected");
        assert!(result.contains(&11), "outlier at row 11 should be selected");
    }

    #[test]
    fn duplicate_rows() {
        let mut rng = rng::new();

        // Two rows at the same location + one elsewhere
        let matrix = matrix_from_rows(&[&[0.0, 0.0], &[0.0, 0.0], &[10.0, 10.0]]);

        let result = find_initial(&mut rng, &matrix, 2);
        assert_eq!(result.len(), 2);

        // The two selected rows must have distinct coordinates
        assert_ne!(
            matrix.row(result[0]),
            matrix.row(result[1]),
            "selected centroids should have distinct coordinates"
        );
    }

    #[test]
    fn one_row_per_group() {
        let mut rng = rng::new();

        // Rows:     0    1     2    3    4     5
        // Groups:   0    1     2    0    1     2
        let matrix = matrix_from_rows(&[
            &[0.0, 0.0],
            &[1.0, 1.0],
            &[-1.0, -1.0],
            &[0.1, 0.1],
            &[1.1, 1.1],
            &[-1.1, -1.1],
        ]);

        let result = find_initial(&mut rng, &matrix, 3);
        assert!(
            result.contains(&0) || result.contains(&3),
            "the result covers the first group"
        );
        assert!(
            result.contains(&1) || result.contains(&4),
            "the result covers the second group"
        );
        assert!(
            result.contains(&2) || result.contains(&5),
            "the result covers the third group"
        );
    }

    #[test]
    fn zero_variance_does_not_panic() {
        let mut rng = rng::new();
        let matrix = matrix_from_rows(&[&[3.0, 3.0], &[3.0, 3.0], &[3.0, 3.0], &[3.0, 3.0]]);

        let result = find_initial(&mut rng, &matrix, 2);
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|&idx| idx < 4));
    }
}
