use crate::errors::{VarError, VarResult};
use crate::models::series::{PricePoint, PriceSeries};
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Client;
use serde::Deserialize;

// Yahoo rejects requests without a browser-like agent
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) rusty_var/0.1";

/// Yahoo Finance chart API client. Fetches adjusted daily closes for one
/// instrument. All methods return Result, never panic.
#[derive(Clone)]
pub struct YahooClient {
    client: Client,
    base_url: String,
}

impl YahooClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(15))
                .user_agent(USER_AGENT)
                .build()
                .unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Price history for `ticker` over [start, end).
    /// An empty or unusable response is an error, never an empty series.
    pub async fn fetch_prices(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
        interval: &str,
    ) -> VarResult<PriceSeries> {
        let period1 = start.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc().timestamp()).unwrap_or(0);
        let period2 = end.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc().timestamp()).unwrap_or(0);

        let mut parts: smallvec::SmallVec<[String; 5]> = smallvec::SmallVec::new();
        parts.push(format!("period1={period1}"));
        parts.push(format!("period2={period2}"));
        parts.push(format!("interval={interval}"));
        parts.push("events=div%7Csplit".to_string());
        parts.push("includeAdjustedClose=true".to_string());

        let url = format!("{}/v8/finance/chart/{ticker}?{}", self.base_url, parts.join("&"));
        tracing::debug!(url = %url, "requesting chart");

        let resp = self.client.get(&url).send().await?;

        let status = resp.status();
        let body = resp.text().await?;

        // Yahoo reports unknown tickers as 404 with a JSON error payload
        let chart: ChartResponse = match serde_json::from_str(&body) {
            Ok(c) => c,
            Err(e) if status.is_success() => {
                return Err(VarError::Parse(format!("chart {ticker}: {e}")));
            }
            Err(_) => {
                return Err(VarError::DataSource(format!("HTTP {status}: {body}")));
            }
        };

        parse_chart(ticker, chart)
    }
}

// Relevant slice of the chart payload:
// {
//   "chart": {
//     "result": [{
//       "meta": { "symbol": "AAPL", "currency": "USD" },
//       "timestamp": [1704205800, 1704292200],
//       "indicators": {
//         "quote": [{ "close": [185.64, 184.25] }],
//         "adjclose": [{ "adjclose": [184.73, 183.35] }]
//       }
//     }],
//     "error": null
//   }
// }

#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
    #[serde(default)]
    adjclose: Vec<AdjClose>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

/// Turn a chart payload into a validated price series.
/// Rows with a null price are dropped; adjusted closes are preferred over
/// raw closes when both are present.
pub fn parse_chart(ticker: &str, chart: ChartResponse) -> VarResult<PriceSeries> {
    if let Some(err) = chart.chart.error {
        return Err(VarError::DataSource(format!(
            "{ticker}: {} ({})",
            err.description.unwrap_or_default(),
            err.code.unwrap_or_default()
        )));
    }

    let result = chart
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| VarError::DataSource(format!("no data found for ticker {ticker}")))?;

    let timestamps = result.timestamp.unwrap_or_default();

    let prices = match result.indicators.adjclose.into_iter().next() {
        Some(adj) if !adj.adjclose.is_empty() => adj.adjclose,
        _ => {
            tracing::warn!(ticker = %ticker, "no adjusted close in response, using close");
            result
                .indicators
                .quote
                .into_iter()
                .next()
                .map(|q| q.close)
                .unwrap_or_default()
        }
    };

    let points: Vec<PricePoint> = timestamps
        .iter()
        .zip(prices.iter())
        .filter_map(|(&ts, &price)| {
            let timestamp = DateTime::<Utc>::from_timestamp(ts, 0)?;
            Some(PricePoint { timestamp, price: price? })
        })
        .collect();

    if points.is_empty() {
        return Err(VarError::DataSource(format!(
            "no data found for ticker {ticker}; check the ticker or the dates"
        )));
    }

    let dropped = timestamps.len().saturating_sub(points.len());
    if dropped > 0 {
        tracing::debug!(ticker = %ticker, dropped = dropped, "dropped rows without a price");
    }

    PriceSeries::new(points)
}
