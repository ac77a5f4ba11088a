//! Text and chart output for score curves.

use crate::ScoreCurve;
use image::{Rgb, RgbImage};
use snafu::prelude::*;
use std::path::{Path, PathBuf};

const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;
const MARGIN: u32 = 48;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([40, 40, 40]);
const LINE: Rgb<u8> = Rgb([30, 90, 200]);

#[derive(Debug, Snafu)]
pub enum ReportError {
    #[snafu(display("cannot chart an empty curve"))]
    EmptyCurve,

    #[snafu(display("failed to save chart to {}: {source}", path.display()))]
    Save {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// Print a score curve as a two-column table on stdout.
pub fn print_curve(title: &str, y_label: &str, curve: &ScoreCurve) {
    println!("{title}");
    println!("{:>4}  {y_label}", "k");
    for &(k, score) in curve {
        println!("{k:>4}  {score:.6}");
    }
}

/// Render a score curve as a line chart and save it as an image.
///
/// The k values label the x axis left to right; the y axis spans the score
/// range with a small pad so a flat curve still draws mid-chart.
pub fn render_chart(curve: &ScoreCurve, path: impl AsRef<Path>) -> Result<(), ReportError> {
    let path = path.as_ref();
    ensure!(!curve.is_empty(), EmptyCurveSnafu);

    let mut image = RgbImage::from_pixel(WIDTH, HEIGHT, BACKGROUND);
    draw_axes(&mut image);

    let (k_lo, k_hi) = (curve[0].0 as f64, curve[curve.len() - 1].0 as f64);
    let mut s_lo = f64::INFINITY;
    let mut s_hi = f64::NEG_INFINITY;
    for &(_, score) in curve {
        s_lo = s_lo.min(score);
        s_hi = s_hi.max(score);
    }
    // Pad degenerate spans so projection stays finite
    if s_hi - s_lo < 1e-12 {
        s_lo -= 0.5;
        s_hi += 0.5;
    }
    let k_span = (k_hi - k_lo).max(1.0);

    let project = |k: f64, score: f64| -> (i64, i64) {
        let plot_w = (WIDTH - 2 * MARGIN) as f64;
        let plot_h = (HEIGHT - 2 * MARGIN) as f64;
        let x = MARGIN as f64 + (k - k_lo) / k_span * plot_w;
        let y = (HEIGHT - MARGIN) as f64 - (score - s_lo) / (s_hi - s_lo) * plot_h;
        (x.round() as i64, y.round() as i64)
    };

    for &(k, _) in curve {
        let (x, _) = project(k as f64, s_lo);
        draw_tick(&mut image, x);
    }

    let points: Vec<(i64, i64)> = curve
        .iter()
        .map(|&(k, score)| project(k as f64, score))
        .collect();
    for pair in points.windows(2) {
        draw_line(&mut image, pair[0], pair[1]);
    }
    for &(x, y) in &points {
        draw_marker(&mut image, x, y);
    }

    image.save(path).context(SaveSnafu { path })
}

fn draw_axes(image: &mut RgbImage) {
    let left = MARGIN as i64;
    let bottom = (HEIGHT - MARGIN) as i64;
    for y in MARGIN as i64..=bottom {
        put_pixel_clamped(image, left, y, AXIS);
    }
    for x in left..=(WIDTH - MARGIN) as i64 {
        put_pixel_clamped(image, x, bottom, AXIS);
    }
}

fn draw_tick(image: &mut RgbImage, x: i64) {
    let bottom = (HEIGHT - MARGIN) as i64;
    for y in bottom..bottom + 5 {
        put_pixel_clamped(image, x, y, AXIS);
    }
}

fn draw_marker(image: &mut RgbImage, cx: i64, cy: i64) {
    for y in cy - 2..=cy + 2 {
        for x in cx - 2..=cx + 2 {
            put_pixel_clamped(image, x, y, LINE);
        }
    }
}

fn draw_line(image: &mut RgbImage, from: (i64, i64), to: (i64, i64)) {
    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    let steps = dx.abs().max(dy.abs()).max(1);
    for step in 0..=steps {
        let t = step as f64 / steps as f64;
        let x = from.0 as f64 + dx as f64 * t;
        let y = from.1 as f64 + dy as f64 * t;
        put_pixel_clamped(image, x.round() as i64, y.round() as i64, LINE);
    }
}

fn put_pixel_clamped(image: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if (0..WIDTH as i64).contains(&x) && (0..HEIGHT as i64).contains(&y) {
        image.put_pixel(x as u32, y as u32, color);
    }
}
