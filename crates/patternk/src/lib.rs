//! Cluster-count selection for gridded surface-temperature anomaly fields.
//!
//! Given a (time, lat, lon) anomaly field, every time step becomes one
//! observation vector over all spatial points. K-means is swept over a range
//! of cluster counts and each fit is scored two ways: inertia for the elbow
//! method, and the mean silhouette coefficient. The elbow sweep also reports
//! the k at the point of maximum curvature of the inertia curve, when one
//! exists.
//!
//! ```
//! use patternk::field::ObservationMatrix;
//! use patternk::{elbow_sweep, rng, KRange};
//!
//! // Twelve time steps drawn from three distinct spatial patterns.
//! let mut data = Vec::new();
//! for i in 0..12 {
//!     let base = [0.0f32, 25.0, 50.0][i % 3];
//!     data.extend([base + i as f32 * 0.01, base, base, base]);
//! }
//! let matrix = ObservationMatrix::new(12, 4, data).unwrap();
//!
//! let result = elbow_sweep(&mut rng::new(), &matrix, KRange::new(1, 6)).unwrap();
//! assert_eq!(result.curve.len(), 6);
//! assert_eq!(result.recommended, Some(3));
//! ```
//!
//! All randomness flows through a caller-supplied rng; [`rng::new`] gives the
//! fixed-seed generator used throughout, so repeated runs on identical input
//! produce identical score curves.

pub mod elbow;
pub mod field;
pub mod kmeans;
pub mod knee;
#[cfg(feature = "netcdf")]
pub mod netcdf_io;
pub mod report;
pub mod rng;
pub mod silhouette;

use snafu::prelude::*;

pub use elbow::{elbow_sweep, ElbowResult};
pub use field::{GriddedField, InvalidShapeError, ObservationMatrix};
pub use kmeans::{FitConfig, InsufficientDataError, KMeansFit, NInit};
pub use silhouette::silhouette_sweep;

/// One score per swept k, ascending in k.
pub type ScoreCurve = Vec<(usize, f64)>;

/// Inclusive range of cluster counts to sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KRange {
    pub min: usize,
    pub max: usize,
}

impl KRange {
    /// Default elbow sweep, k = 1..=8.
    pub const ELBOW: KRange = KRange { min: 1, max: 8 };
    /// Default silhouette sweep, k = 2..=8.
    pub const SILHOUETTE: KRange = KRange { min: 2, max: 8 };

    pub fn new(min: usize, max: usize) -> Self {
        KRange { min, max }
    }

    pub fn len(&self) -> usize {
        self.max.saturating_sub(self.min) + 1
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }
}

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum SweepError {
    #[snafu(display("empty sweep range [{min}, {max}]"))]
    EmptyRange { min: usize, max: usize },

    #[snafu(display(
        "the silhouette coefficient is undefined for fewer than 2 clusters, got k_min = {k_min}"
    ))]
    SilhouetteUndefined { k_min: usize },

    #[snafu(transparent)]
    InsufficientData { source: InsufficientDataError },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn range_len() {
        assert_eq!(KRange::new(1, 8).len(), 8);
        assert_eq!(KRange::new(2, 8).len(), 7);
        assert_eq!(KRange::new(3, 3).len(), 1);
    }

    #[test]
    fn range_empty() {
        assert!(KRange::new(5, 2).is_empty());
        assert!(!KRange::new(2, 5).is_empty());
    }

    #[test]
    fn defaults_match_the_usual_sweeps() {
        assert_eq!(KRange::ELBOW, KRange::new(1, 8));
        assert_eq!(KRange::SILHOUETTE, KRange::new(2, 8));
    }
}
