//! Inertia sweep and elbow recommendation.

use crate::field::ObservationMatrix;
use crate::kmeans::{self, FitConfig};
use crate::{knee, EmptyRangeSnafu, KRange, ScoreCurve, SweepError};
use rand::Rng;
use snafu::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub struct ElbowResult {
    /// (k, inertia) per swept k, ascending in k.
    pub curve: ScoreCurve,
    /// The k after which the inertia curve flattens, or `None` when the curve
    /// has no identifiable elbow. Never a defaulted k.
    pub recommended: Option<usize>,
}

/// Fit k-means for every k in `range`, recording inertia, and locate the
/// elbow of the resulting curve.
///
/// Inertia is monotonically non-increasing in k by construction; the sweep
/// records what the fits produce and leaves verifying that to the tests.
/// Any k beyond the observation count aborts the sweep before fitting starts.
pub fn elbow_sweep(
    rng: &mut impl Rng,
    matrix: &ObservationMatrix,
    range: KRange,
) -> Result<ElbowResult, SweepError> {
    ensure!(
        range.min <= range.max,
        EmptyRangeSnafu {
            min: range.min,
            max: range.max
        }
    );
    kmeans::ensure_k(range.min, matrix.rows())?;
    kmeans::ensure_k(range.max, matrix.rows())?;

    let config = FitConfig::default();
    let mut curve = ScoreCurve::with_capacity(range.len());
    for k in range.min..=range.max {
        let fit = kmeans::fit(rng, matrix, k, &config)?;
        curve.push((k, fit.inertia));
    }

    let xs: Vec<f64> = curve.iter().map(|&(k, _)| k as f64).collect();
    let ys: Vec<f64> = curve.iter().map(|&(_, score)| score).collect();
    let recommended = knee::max_distance_knee(&xs, &ys).map(|i| curve[i].0);

    Ok(ElbowResult { curve, recommended })
}
