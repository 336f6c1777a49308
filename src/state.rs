use crate::config::AppConfig;
use crate::models::series::{PriceSeries, ReturnSeries};
use crate::report::AnalysisReport;
use portable_atomic::{AtomicU64, Ordering};
use std::sync::Arc;

// ── Request Counters (lock-free) ──

#[derive(Debug, Default)]
pub struct Counters {
    pub requests_served: AtomicU64,
    pub estimates_computed: AtomicU64,
    pub request_errors: AtomicU64,
}

impl Counters {
    #[inline]
    pub fn hit(&self) {
        self.requests_served.fetch_add(1, Ordering::Relaxed);
    }
}

// ── Shared Application State ──

/// Read-only result of one analysis run, shared with the report server.
/// Handlers never mutate the series or the report, only the counters.
pub struct AppState {
    pub config: AppConfig,
    pub prices: PriceSeries,
    pub returns: ReturnSeries,
    pub report: AnalysisReport,
    pub counters: Counters,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        prices: PriceSeries,
        returns: ReturnSeries,
        report: AnalysisReport,
    ) -> Arc<Self> {
        Arc::new(Self {
            config,
            prices,
            returns,
            report,
            counters: Counters::default(),
        })
    }
}
