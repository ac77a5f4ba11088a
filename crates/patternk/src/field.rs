//! The gridded anomaly field and its flattened observation form.

use snafu::prelude::*;

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum InvalidShapeError {
    #[snafu(display("field dimensions must all be positive, got {time} x {lat} x {lon}"))]
    EmptyDimension {
        time: usize,
        lat: usize,
        lon: usize,
    },

    #[snafu(display(
        "field holds {len} values but the coordinates describe {time} x {lat} x {lon} = {expected}"
    ))]
    CoordinateMismatch {
        time: usize,
        lat: usize,
        lon: usize,
        len: usize,
        expected: usize,
    },

    #[snafu(display("matrix dimensions must be positive, got {rows} x {cols}"))]
    EmptyMatrix { rows: usize, cols: usize },

    #[snafu(display("a {rows} x {cols} matrix needs {expected} values, got {len}"))]
    MatrixSizeMismatch {
        rows: usize,
        cols: usize,
        expected: usize,
        len: usize,
    },
}

/// A (time, lat, lon) anomaly field plus its coordinate vectors.
///
/// Values are stored row-major with time slowest and longitude fastest, so a
/// time step's spatial grid is one contiguous slice.
#[derive(Debug, Clone)]
pub struct GriddedField {
    time: Vec<f64>,
    lat: Vec<f64>,
    lon: Vec<f64>,
    values: Vec<f32>,
}

impl GriddedField {
    pub fn new(
        time: Vec<f64>,
        lat: Vec<f64>,
        lon: Vec<f64>,
        values: Vec<f32>,
    ) -> Result<Self, InvalidShapeError> {
        ensure!(
            !time.is_empty() && !lat.is_empty() && !lon.is_empty(),
            EmptyDimensionSnafu {
                time: time.len(),
                lat: lat.len(),
                lon: lon.len()
            }
        );
        let expected = time.len() * lat.len() * lon.len();
        ensure!(
            values.len() == expected,
            CoordinateMismatchSnafu {
                time: time.len(),
                lat: lat.len(),
                lon: lon.len(),
                len: values.len(),
                expected
            }
        );

        Ok(GriddedField {
            time,
            lat,
            lon,
            values,
        })
    }

    /// (time steps, latitude points, longitude points)
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.time.len(), self.lat.len(), self.lon.len())
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn lat(&self) -> &[f64] {
        &self.lat
    }

    pub fn lon(&self) -> &[f64] {
        &self.lon
    }

    pub fn value(&self, t: usize, j: usize, i: usize) -> f32 {
        let (_, p, q) = self.shape();
        debug_assert!(j < p && i < q);
        self.values[(t * p + j) * q + i]
    }

    /// Merge the spatial axes, latitude varying slower than longitude, so
    /// each time step becomes one observation row of length lat * lon.
    ///
    /// The buffer already stores (time, lat, lon) in exactly that order, so
    /// this is a reinterpretation, not a copy, and slicing a row back into
    /// lat x lon chunks is the inverse.
    pub fn flatten(self) -> ObservationMatrix {
        let (t, p, q) = self.shape();
        ObservationMatrix {
            rows: t,
            cols: p * q,
            data: self.values,
        }
    }
}

/// A (T, P*Q) matrix: one row per time step over all spatial points.
///
/// This is the only artifact the clustering consumes.
#[derive(Debug, Clone)]
pub struct ObservationMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl ObservationMatrix {
    pub fn new(rows: usize, cols: usize, data: Vec<f32>) -> Result<Self, InvalidShapeError> {
        ensure!(rows > 0 && cols > 0, EmptyMatrixSnafu { rows, cols });
        ensure!(
            data.len() == rows * cols,
            MatrixSizeMismatchSnafu {
                rows,
                cols,
                expected: rows * cols,
                len: data.len()
            }
        );

        Ok(ObservationMatrix { rows, cols, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }
}
