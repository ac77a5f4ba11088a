//! Silhouette-coefficient sweep over a NetCDF anomaly field.
//!
//! Prints the (k, score) curve and can render it to an image. The curve is
//! the output; no single k is singled out.

use clap::Parser;
use patternk::netcdf_io::{self, ANOMALY_VARS};
use patternk::{report, rng, silhouette, KRange};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(about = "Score k-means fits of a gridded anomaly field with the silhouette coefficient")]
struct Args {
    /// NetCDF file holding the (time, lat, lon) anomaly variable
    file: PathBuf,

    /// Anomaly variable name (defaults to trying TS, ts, sst, tos)
    #[arg(long)]
    var: Option<String>,

    /// Smallest cluster count to try (at least 2)
    #[arg(long, default_value_t = KRange::SILHOUETTE.min)]
    k_min: usize,

    /// Largest cluster count to try
    #[arg(long, default_value_t = KRange::SILHOUETTE.max)]
    k_max: usize,

    /// Save the score curve as a chart image
    #[arg(long)]
    chart: Option<PathBuf>,
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let field = match &args.var {
        Some(name) => netcdf_io::load_field(&args.file, &[name.as_str()])?,
        None => netcdf_io::load_field(&args.file, ANOMALY_VARS)?,
    };
    let (t, p, q) = field.shape();
    println!(
        "loaded {}: {t} time steps on a {p}x{q} grid",
        args.file.display()
    );

    let matrix = field.flatten();
    let curve =
        silhouette::silhouette_sweep(&mut rng::new(), &matrix, KRange::new(args.k_min, args.k_max))?;

    report::print_curve("Silhouette Score", "Silhouette Coefficient", &curve);

    if let Some(path) = &args.chart {
        // Chart failures must not hide the sweep results already printed
        if let Err(err) = report::render_chart(&curve, path) {
            eprintln!("{err}");
        } else {
            println!("chart saved to {}", path.display());
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(err) = run(&args) {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
