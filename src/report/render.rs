//! Plain-text rendering of report sections for the terminal.
//! All functions are pure -- they take data and return a String.

use crate::models::series::PriceSeries;
use crate::models::stats::Summary;
use crate::models::VarMethod;
use crate::report::histogram::Histogram;
use crate::risk::var::VarEstimate;
use std::fmt::Write;

const BAR_CHAR: char = '#';
const POINT_CHAR: char = '*';

/// A vertical reference line on a chart (mean return, -VaR, ...).
#[derive(Debug, Clone, serde::Serialize)]
pub struct Marker {
    pub label: String,
    pub value: f64,
}

impl Marker {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self { label: label.into(), value }
    }
}

pub fn method_label(method: VarMethod) -> &'static str {
    match method {
        VarMethod::Parametric => "Parametric",
        VarMethod::MonteCarlo => "Monte Carlo",
        VarMethod::Historical => "Historical",
    }
}

/// Confidence as a percentage label: 0.99 -> "99%", 0.975 -> "97.5%".
pub fn confidence_label(confidence: f64) -> String {
    let pct = confidence * 100.0;
    if (pct - pct.round()).abs() < 1e-9 {
        format!("{}%", pct.round() as i64)
    } else {
        format!("{}%", (pct * 1000.0).round() / 1000.0)
    }
}

pub fn render_summary(summary: &Summary) -> String {
    let mut out = String::from("Return statistics:\n");
    let rows: [(&str, f64); 7] = [
        ("mean", summary.mean),
        ("std", summary.std),
        ("min", summary.min),
        ("25%", summary.p25),
        ("50%", summary.p50),
        ("75%", summary.p75),
        ("max", summary.max),
    ];
    let _ = writeln!(out, "  {:<6}{:>14}", "count", summary.count);
    for (name, value) in rows {
        let _ = writeln!(out, "  {name:<6}{value:>14.6}");
    }
    out
}

pub fn render_var_lines(estimate: &VarEstimate) -> String {
    let label = confidence_label(estimate.confidence);
    let mut out = String::new();
    for method in [VarMethod::Parametric, VarMethod::MonteCarlo, VarMethod::Historical] {
        let _ = writeln!(
            out,
            "VaR at {label} ({}): {:.6}",
            method_label(method),
            estimate.get(method)
        );
    }
    out
}

/// Markers at -VaR for each method, as drawn on the return histogram.
pub fn var_markers(estimate: &VarEstimate) -> Vec<Marker> {
    [VarMethod::Parametric, VarMethod::MonteCarlo, VarMethod::Historical]
        .into_iter()
        .map(|m| {
            let value = -estimate.get(m);
            Marker::new(format!("VaR {}: {value:.4}", method_label(m)), value)
        })
        .collect()
}

/// Horizontal-bar histogram. Markers are listed next to the bin containing
/// their value; out-of-range markers go below the chart.
pub fn render_histogram(title: &str, hist: &Histogram, markers: &[Marker], width: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{title}");

    let peak = hist.bins.iter().map(|b| b.count).max().unwrap_or(0).max(1);
    let width = width.max(1);

    let mut placed = vec![false; markers.len()];
    for (i, bin) in hist.bins.iter().enumerate() {
        let bar_len = bin.count * width / peak;
        let bar: String = std::iter::repeat(BAR_CHAR).take(bar_len).collect();
        let _ = write!(
            out,
            "  {:>9.4} .. {:>9.4} | {:<width$} {:>5}",
            bin.lower, bin.upper, bar, bin.count
        );
        for (j, m) in markers.iter().enumerate() {
            if hist.bin_of(m.value) == Some(i) {
                let _ = write!(out, "  <- {}", m.label);
                placed[j] = true;
            }
        }
        out.push('\n');
    }

    for (m, _) in markers.iter().zip(placed).filter(|(_, p)| !p) {
        let _ = writeln!(out, "  (outside range) {}", m.label);
    }
    out
}

/// Line chart of the price history, downsampled to `width` columns.
pub fn render_price_chart(title: &str, series: &PriceSeries, width: usize, height: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{title}");

    let points = series.points();
    if points.is_empty() || width == 0 || height == 0 {
        return out;
    }

    // Average each column's bucket of prices
    let cols = width.min(points.len());
    let columns: Vec<f64> = (0..cols)
        .map(|c| {
            let start = c * points.len() / cols;
            let end = ((c + 1) * points.len() / cols).max(start + 1);
            let bucket = &points[start..end];
            bucket.iter().map(|p| p.price).sum::<f64>() / bucket.len() as f64
        })
        .collect();

    let lo = columns.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = columns.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = if hi > lo { hi - lo } else { 1.0 };

    let mut grid = vec![vec![' '; cols]; height];
    for (c, &v) in columns.iter().enumerate() {
        let row = ((hi - v) / span * (height - 1) as f64).round() as usize;
        grid[row.min(height - 1)][c] = POINT_CHAR;
    }

    for (r, row) in grid.iter().enumerate() {
        let axis = if r == 0 {
            format!("{hi:>12.2}")
        } else if r == height - 1 {
            format!("{lo:>12.2}")
        } else {
            " ".repeat(12)
        };
        let line: String = row.iter().collect();
        let _ = writeln!(out, "{axis} |{line}");
    }

    if let (Some(first), Some(last)) = (series.first(), series.last()) {
        let _ = writeln!(
            out,
            "{} {}{:>pad$}",
            " ".repeat(13),
            first.timestamp.format("%Y-%m-%d"),
            last.timestamp.format("%Y-%m-%d"),
            pad = cols.saturating_sub(10).max(11)
        );
    }
    out
}
