//! Knee detection for convex decreasing score curves.
//!
//! Pure functions over (x, y) pairs, independent of k-means, so they can be
//! checked against synthetic curves with a hand-placed knee.

/// Index of the knee of a convex decreasing curve, or `None` when the curve
/// has no identifiable knee.
///
/// Both axes are normalized to the unit square and the knee is the interior
/// point with the greatest deviation below the chord from the first point to
/// the last. Returns `None` for fewer than 3 points, for flat or
/// non-decreasing curves, and for curves that never dip below the chord.
pub fn max_distance_knee(xs: &[f64], ys: &[f64]) -> Option<usize> {
    assert_eq!(xs.len(), ys.len());
    let n = xs.len();
    if n < 3 {
        return None;
    }

    let x_span = xs[n - 1] - xs[0];
    let y_span = ys[0] - ys[n - 1]; // decreasing curve
    if x_span <= 0.0 || y_span <= 0.0 {
        return None;
    }

    // Normalized, the chord runs from (0, 1) to (1, 0): y = 1 - x
    let mut best = None;
    let mut best_deviation = 0.0;
    for i in 1..n - 1 {
        let x = (xs[i] - xs[0]) / x_span;
        let y = (ys[i] - ys[n - 1]) / y_span;
        let deviation = (1.0 - x) - y;
        if deviation > best_deviation {
            best_deviation = deviation;
            best = Some(i);
        }
    }

    best
}
