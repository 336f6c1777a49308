use crate::models::series::{PricePoint, ReturnSeries};
use crate::report::histogram::Histogram;
use crate::report::render::{var_markers, Marker};
use crate::errors::VarError;
use crate::models::monte_carlo::MAX_SAMPLES;
use crate::report::AnalysisReport;
use crate::risk::var::estimate_var;
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use portable_atomic::Ordering::Relaxed;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

const MAX_BINS: usize = 200;

#[derive(serde::Deserialize)]
pub struct HistogramQuery {
    pub bins: Option<usize>,
}

#[derive(serde::Deserialize)]
pub struct VarQuery {
    pub confidence: Option<f64>,
    pub samples: Option<usize>,
}

/// GET /api/report -- the full analysis report
pub async fn get_report(State(state): State<Arc<AppState>>) -> Json<AnalysisReport> {
    state.counters.hit();
    Json(state.report.clone())
}

/// GET /api/prices -- adjusted price history for the price chart
pub async fn get_prices(State(state): State<Arc<AppState>>) -> Json<Vec<PricePoint>> {
    state.counters.hit();
    Json(state.prices.points().to_vec())
}

/// GET /api/returns -- cleaned log returns
pub async fn get_returns(State(state): State<Arc<AppState>>) -> Json<ReturnSeries> {
    state.counters.hit();
    Json(state.returns.clone())
}

/// GET /api/histogram -- return histogram with mean and -VaR markers
pub async fn get_histogram(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HistogramQuery>,
) -> (StatusCode, Json<serde_json::Value>) {
    state.counters.hit();
    let bins = params
        .bins
        .unwrap_or(state.config.histogram_bins)
        .clamp(1, MAX_BINS);

    match Histogram::new(state.returns.values(), bins) {
        Ok(hist) => {
            let mean = state.report.summary.mean;
            let mut markers = vec![Marker::new("Mean return", mean)];
            markers.extend(var_markers(&state.report.estimate));
            (
                StatusCode::OK,
                Json(serde_json::json!({ "bins": hist.bins, "markers": markers })),
            )
        }
        Err(e) => reject(&state, e, StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// GET /api/var -- re-estimate at another confidence level / sample count.
/// Each request draws from its own freshly seeded generator, off the async
/// workers.
pub async fn get_var(
    State(state): State<Arc<AppState>>,
    Query(params): Query<VarQuery>,
) -> (StatusCode, Json<serde_json::Value>) {
    state.counters.hit();
    let confidence = params.confidence.unwrap_or(state.config.confidence_level);
    let samples = params.samples.unwrap_or(state.config.mc_samples);

    if samples > MAX_SAMPLES {
        return reject(&state, VarError::InvalidSampleCount(samples), StatusCode::BAD_REQUEST);
    }

    let shared = state.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut rng = StdRng::from_entropy();
        estimate_var(&shared.returns, confidence, samples, &mut rng)
    })
    .await;

    match result {
        Ok(Ok(estimate)) => {
            state.counters.estimates_computed.fetch_add(1, Relaxed);
            (StatusCode::OK, Json(serde_json::json!(estimate)))
        }
        Ok(Err(e)) => {
            tracing::debug!(error = %e, confidence = confidence, samples = samples, "var request rejected");
            reject(&state, e, StatusCode::BAD_REQUEST)
        }
        Err(e) => {
            tracing::error!(error = %e, "var estimation task failed");
            reject(
                &state,
                VarError::Model(format!("estimation task failed: {e}")),
                StatusCode::INTERNAL_SERVER_ERROR,
            )
        }
    }
}

fn reject(
    state: &AppState,
    err: VarError,
    status: StatusCode,
) -> (StatusCode, Json<serde_json::Value>) {
    state.counters.request_errors.fetch_add(1, Relaxed);
    (status, Json(serde_json::json!({ "error": err.to_string() })))
}

/// GET /api/counters -- request counters (lock-free reads)
pub async fn get_counters(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "requests_served": state.counters.requests_served.load(Relaxed),
        "estimates_computed": state.counters.estimates_computed.load(Relaxed),
        "request_errors": state.counters.request_errors.load(Relaxed),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::models::returns::returns_from_series;
    use crate::models::series::PriceSeries;
    use crate::report::ReportMeta;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn test_state() -> Arc<AppState> {
        let closes = [20.0, 20.4, 19.9, 20.8, 21.1, 20.2, 19.7, 20.5, 21.3, 20.9];
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &price)| PricePoint {
                timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap() + chrono::Duration::days(i as i64),
                price,
            })
            .collect();
        let prices = PriceSeries::new(points).unwrap();
        let returns = returns_from_series(&prices).unwrap();
        let estimate = estimate_var(&returns, 0.99, 2_000, &mut StdRng::seed_from_u64(1)).unwrap();

        let config = AppConfig {
            ticker: Some("TEST".into()),
            start_date: NaiveDate::from_ymd_opt(2024, 5, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 5, 11).unwrap(),
            interval: "1d".into(),
            confidence_level: 0.99,
            mc_samples: 2_000,
            seed: None,
            histogram_bins: 5,
            yahoo_base_url: "http://localhost".into(),
            serve_report: true,
            server_port: 0,
        };
        let meta = ReportMeta {
            ticker: "TEST".into(),
            start: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 5, 11).unwrap(),
            interval: "1d".into(),
            mc_samples: 2_000,
            bins: 5,
        };
        let report = AnalysisReport::build(meta, &prices, &returns, estimate).unwrap();
        AppState::new(config, prices, returns, report)
    }

    #[tokio::test]
    async fn test_var_rejects_bad_confidence() {
        let state = test_state();
        let (status, Json(body)) = get_var(
            State(state.clone()),
            Query(VarQuery { confidence: Some(1.0), samples: None }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap_or_default().contains("confidence"));
        assert_eq!(state.counters.request_errors.load(Relaxed), 1);
    }

    #[tokio::test]
    async fn test_var_rejects_oversized_sample_count() {
        let state = test_state();
        let (status, Json(body)) = get_var(
            State(state.clone()),
            Query(VarQuery { confidence: None, samples: Some(usize::MAX) }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap_or_default().contains("sample count"));
        assert_eq!(state.counters.request_errors.load(Relaxed), 1);
        assert_eq!(state.counters.estimates_computed.load(Relaxed), 0);

        let (status, _) = get_var(
            State(state.clone()),
            Query(VarQuery { confidence: None, samples: Some(MAX_SAMPLES + 1) }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(state.counters.request_errors.load(Relaxed), 2);
    }

    #[tokio::test]
    async fn test_var_recomputes() {
        let state = test_state();
        let (status, Json(body)) = get_var(
            State(state.clone()),
            Query(VarQuery { confidence: Some(0.95), samples: Some(500) }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["confidence"], 0.95);
        assert!(body["historical"].as_f64().is_some());
        assert_eq!(state.counters.estimates_computed.load(Relaxed), 1);
    }

    #[tokio::test]
    async fn test_histogram_bins_clamped() {
        let state = test_state();
        let (status, Json(body)) = get_histogram(
            State(state.clone()),
            Query(HistogramQuery { bins: Some(0) }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["bins"].as_array().map(|b| b.len()), Some(1));
        // mean + three VaR markers
        assert_eq!(body["markers"].as_array().map(|m| m.len()), Some(4));
    }

    #[tokio::test]
    async fn test_report_and_counters() {
        let state = test_state();
        let Json(report) = get_report(State(state.clone())).await;
        assert_eq!(report.ticker, "TEST");
        let Json(returns) = get_returns(State(state.clone())).await;
        assert_eq!(returns.len(), 9);
        let Json(counters) = get_counters(State(state)).await;
        assert_eq!(counters["requests_served"], 2);
    }
}
