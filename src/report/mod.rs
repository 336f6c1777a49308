pub mod histogram;
pub mod render;

use crate::errors::VarResult;
use crate::models::series::{PriceSeries, ReturnSeries};
use crate::models::stats::Summary;
use crate::report::histogram::Histogram;
use crate::report::render::{confidence_label, Marker};
use crate::risk::var::VarEstimate;
use chrono::NaiveDate;

const HIST_BAR_WIDTH: usize = 50;
const PRICE_CHART_WIDTH: usize = 72;
const PRICE_CHART_HEIGHT: usize = 14;

/// Everything the CLI prints and the report server serves for one run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AnalysisReport {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub interval: String,
    pub price_count: usize,
    pub mc_samples: usize,
    pub summary: Summary,
    pub estimate: VarEstimate,
    pub histogram: Histogram,
    pub generated_at: String,
}

/// Run metadata the report carries alongside the numbers.
#[derive(Debug, Clone)]
pub struct ReportMeta {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub interval: String,
    pub mc_samples: usize,
    pub bins: usize,
}

impl AnalysisReport {
    pub fn build(
        meta: ReportMeta,
        prices: &PriceSeries,
        returns: &ReturnSeries,
        estimate: VarEstimate,
    ) -> VarResult<Self> {
        Ok(Self {
            summary: Summary::of(returns.values())?,
            histogram: Histogram::new(returns.values(), meta.bins)?,
            ticker: meta.ticker,
            start: meta.start,
            end: meta.end,
            interval: meta.interval,
            price_count: prices.len(),
            mc_samples: meta.mc_samples,
            estimate,
            generated_at: chrono::Utc::now().to_rfc3339(),
        })
    }

    /// Full terminal report: statistics, VaR lines, price chart and both
    /// histograms.
    pub fn render_text(&self, prices: &PriceSeries) -> String {
        let label = confidence_label(self.estimate.confidence);
        let mean_marker = Marker::new(format!("Mean return: {:.4}", self.summary.mean), self.summary.mean);

        let mut out = String::new();
        out.push_str(&render::render_summary(&self.summary));
        out.push('\n');
        out.push_str(&render::render_var_lines(&self.estimate));
        out.push('\n');
        out.push_str(&render::render_price_chart(
            &format!("Adjusted price of '{}'", self.ticker),
            prices,
            PRICE_CHART_WIDTH,
            PRICE_CHART_HEIGHT,
        ));
        out.push('\n');
        out.push_str(&render::render_histogram(
            "Return distribution",
            &self.histogram,
            &[mean_marker],
            HIST_BAR_WIDTH,
        ));
        out.push('\n');
        out.push_str(&render::render_histogram(
            &format!("Return distribution with VaR at {label}"),
            &self.histogram,
            &render::var_markers(&self.estimate),
            HIST_BAR_WIDTH,
        ));
        out
    }
}
