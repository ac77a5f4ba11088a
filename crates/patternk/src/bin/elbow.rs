//! Elbow-method sweep over a NetCDF anomaly field.
//!
//! Prints the (k, inertia) curve and the recommended cluster count, and can
//! render the curve to an image.

use clap::Parser;
use patternk::netcdf_io::{self, ANOMALY_VARS};
use patternk::{elbow, report, rng, KRange};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(about = "Locate the elbow of the k-means inertia curve for a gridded anomaly field")]
struct Args {
    /// NetCDF file holding the (time, lat, lon) anomaly variable
    file: PathBuf,

    /// Anomaly variable name (defaults to trying TS, ts, sst, tos)
    #[arg(long)]
    var: Option<String>,

    /// Smallest cluster count to try
    #[arg(long, default_value_t = KRange::ELBOW.min)]
    k_min: usize,

    /// Largest cluster count to try
    #[arg(long, default_value_t = KRange::ELBOW.max)]
    k_max: usize,

    /// Save the inertia curve as a chart image
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
    let result = elbow::elbow_sweep(&mut rng::new(), &matrix, KRange::new(args.k_min, args.k_max))?;

    report::print_curve("Elbow Method", "Inertia", &result.curve);
    match result.recommended {
        Some(k) => println!("recommended k: {k}"),
        None => println!("no elbow found"),
    }

    if let Some(path) = &args.chart {
        // Chart failures must not hide the sweep results already printed
        if let Err(err) = report::render_chart(&result.curve, path) {
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
