//! K-means over observation rows.
//!
//! References:
//! - https://scikit-learn.org/stable/modules/generated/sklearn.cluster.KMeans.html
//! - Noisy, Greedy and Not so Greedy k-Means++ (A. Bhattacharya et al)
//!   https://drops.dagstuhl.de/storage/00lipics/lipics-vol173-esa2020/LIPIcs.ESA.2020.18/LIPIcs.ESA.2020.18.pdf

pub mod lloyds;
pub mod plus_plus_init;

use crate::field::ObservationMatrix;
use rand::Rng;
use snafu::prelude::*;

// sklearn KMeans defaults
pub const MAX_ITER: usize = 300;
pub const CONVERGENCE_TOLERANCE: f64 = 1e-4;

#[derive(Debug, Snafu)]
#[snafu(display("cannot form {k} clusters from {observations} observations"))]
pub struct InsufficientDataError {
    pub k: usize,
    pub observations: usize,
}

pub(crate) fn ensure_k(k: usize, observations: usize) -> Result<(), InsufficientDataError> {
    ensure!(
        k >= 1 && k <= observations,
        InsufficientDataSnafu { k, observations }
    );
    Ok(())
}

/// Number of initialization restarts; the best-inertia run wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NInit {
    /// sklearn's `n_init="auto"` rule: a single run when initialization is
    /// greedy k-means++, which is the only policy here.
    Auto,
    Explicit(usize),
}

impl NInit {
    fn resolve(self) -> usize {
        match self {
            NInit::Auto => 1,
            NInit::Explicit(n) => n.max(1),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FitConfig {
    pub max_iter: usize,
    pub tolerance: f64,
    pub n_init: NInit,
}

impl Default for FitConfig {
    fn default() -> Self {
        FitConfig {
            max_iter: MAX_ITER,
            tolerance: CONVERGENCE_TOLERANCE,
            n_init: NInit::Auto,
        }
    }
}

#[derive(Debug, Clone)]
pub struct KMeansFit {
    /// Centroid matrix, k rows of the observation width, row-major.
    pub centroids: Vec<f32>,
    pub k: usize,
    /// Cluster index per observation, values in 0..k.
    pub labels: Vec<usize>,
    /// Sum of squared distances from each observation to its assigned centroid.
    pub inertia: f64,
    /// Iterations of the best run.
    pub iterations: usize,
    pub converged: bool,
    /// Restarts actually executed.
    pub n_init_used: usize,
}

impl KMeansFit {
    pub fn centroid(&self, j: usize) -> &[f32] {
        let d = self.centroids.len() / self.k;
        &self.centroids[j * d..(j + 1) * d]
    }

    /// Observations assigned to each cluster; entry j counts cluster j.
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0usize; self.k];
        for &label in &self.labels {
            sizes[label] += 1;
        }
        sizes
    }
}

/// Fit k-means to the observation rows.
///
/// Fails fast when k is zero or exceeds the number of observations; a sweep
/// must never silently score a different k than it asked for.
pub fn fit(
    rng: &mut impl Rng,
    matrix: &ObservationMatrix,
    k: usize,
    config: &FitConfig,
) -> Result<KMeansFit, InsufficientDataError> {
    ensure_k(k, matrix.rows())?;

    let n_init = config.n_init.resolve();
    let mut best = lloyds::run(rng, matrix, k, config);
    for _ in 1..n_init {
        let candidate = lloyds::run(rng, matrix, k, config);
        if candidate.inertia < best.inertia {
            best = candidate;
        }
    }
    best.n_init_used = n_init;

    Ok(best)
}
