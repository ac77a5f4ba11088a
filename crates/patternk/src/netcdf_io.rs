//! NetCDF loader for (time, lat, lon) anomaly fields.
//!
//! Reads the coordinate vectors and the 3-D anomaly variable into a
//! [`GriddedField`]. Masked cells (fill values) become 0.0 anomaly so they
//! are neutral in the clustering distance. The file handle is dropped as soon
//! as the arrays are extracted.

use crate::field::{GriddedField, InvalidShapeError};
use snafu::prelude::*;
use std::path::{Path, PathBuf};

/// Anomaly variable names tried in order when none is given.
pub const ANOMALY_VARS: &[&str] = &["TS", "ts", "sst", "tos"];

const LAT_VARS: &[&str] = &["lat", "latitude"];
const LON_VARS: &[&str] = &["lon", "longitude"];
const TIME_VARS: &[&str] = &["time"];

// CF default fill is ~9.97e36; anything that large is a masked cell
#[inline]
fn is_valid(v: f64) -> bool {
    v.is_finite() && v.abs() < 1.0e30
}

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum DataAccessError {
    #[snafu(display("failed to open {}: {source}", path.display()))]
    Open {
        path: PathBuf,
        source: netcdf::Error,
    },

    #[snafu(display("{} has no variable named {names}", path.display()))]
    MissingVariable { path: PathBuf, names: String },

    #[snafu(display("failed to read variable {name} from {}: {source}", path.display()))]
    ReadVariable {
        path: PathBuf,
        name: String,
        source: netcdf::Error,
    },

    #[snafu(display(
        "variable {name} in {} has {rank} dimensions, expected 3 (time, lat, lon)",
        path.display()
    ))]
    VariableRank {
        path: PathBuf,
        name: String,
        rank: usize,
    },

    #[snafu(display("{} holds an inconsistent grid: {source}", path.display()))]
    InconsistentGrid {
        path: PathBuf,
        source: InvalidShapeError,
    },
}

/// Load a gridded anomaly field from a NetCDF file.
///
/// `var_names` are the anomaly variable candidates, tried in order; pass
/// [`ANOMALY_VARS`] for the usual surface-temperature names.
pub fn load_field(
    path: impl AsRef<Path>,
    var_names: &[&str],
) -> Result<GriddedField, DataAccessError> {
    let path = path.as_ref();
    let file = netcdf::open(path).context(OpenSnafu { path })?;

    let lat = read_coord(&file, path, LAT_VARS)?;
    let lon = read_coord(&file, path, LON_VARS)?;
    let time = read_coord(&file, path, TIME_VARS)?;
    let values = read_anomaly(&file, path, var_names)?;

    GriddedField::new(time, lat, lon, values).context(InconsistentGridSnafu { path })
}

fn read_coord(
    file: &netcdf::File,
    path: &Path,
    names: &[&str],
) -> Result<Vec<f64>, DataAccessError> {
    for name in names {
        if let Some(var) = file.variable(name) {
            let data: Vec<f64> = var.get_values(..).context(ReadVariableSnafu {
                path,
                name: *name,
            })?;
            return Ok(data);
        }
    }
    MissingVariableSnafu {
        path,
        names: names.join(" or "),
    }
    .fail()
}

fn read_anomaly(
    file: &netcdf::File,
    path: &Path,
    names: &[&str],
) -> Result<Vec<f32>, DataAccessError> {
    for name in names {
        let Some(var) = file.variable(name) else {
            continue;
        };

        let rank = var.dimensions().len();
        ensure!(
            rank == 3,
            VariableRankSnafu {
                path,
                name: *name,
                rank
            }
        );

        let scale = attr_f64(&var, "scale_factor").unwrap_or(1.0);
        let offset = attr_f64(&var, "add_offset").unwrap_or(0.0);
        let fill = attr_f64(&var, "_FillValue").or_else(|| attr_f64(&var, "missing_value"));

        let raw: Vec<f64> = var.get_values(..).context(ReadVariableSnafu {
            path,
            name: *name,
        })?;

        let values = raw
            .iter()
            .map(|&v| {
                let masked = !is_valid(v) || fill.is_some_and(|f| v == f);
                if masked {
                    // Masked (land) cells become a neutral anomaly
                    0.0
                } else {
                    (v * scale + offset) as f32
                }
            })
            .collect();

        return Ok(values);
    }
    MissingVariableSnafu {
        path,
        names: names.join(" or "),
    }
    .fail()
}

fn attr_f64(var: &netcdf::Variable, name: &str) -> Option<f64> {
    var.attribute_value(name)
        .and_then(|r| r.ok())
        .and_then(|v| match v {
            netcdf::AttributeValue::Double(d) => Some(d),
            netcdf::AttributeValue::Float(f) => Some(f64::from(f)),
            _ => None,
        })
}
