mod config;
mod errors;
mod feeds;
mod models;
mod report;
mod risk;
mod server;
mod state;

use crate::config::AppConfig;
use crate::errors::{VarError, VarResult};
use crate::feeds::yahoo::YahooClient;
use crate::models::returns::returns_from_series;
use crate::report::{AnalysisReport, ReportMeta};
use crate::risk::var::VarEstimator;
use crate::state::AppState;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

#[tokio::main]
async fn main() {
    // Structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Load config
    let cfg = match AppConfig::from_env().and_then(|c| c.with_args(std::env::args().skip(1))) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("config error: {e}");
            std::process::exit(1);
        }
    };

    let cfg = match prompt_missing(cfg).await {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("input error: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(cfg).await {
        tracing::error!(error = %e, "analysis failed");
        std::process::exit(1);
    }
}

/// Fetch, build returns, estimate, report. Optionally serve the report.
async fn run(cfg: AppConfig) -> VarResult<()> {
    let ticker = cfg
        .ticker
        .clone()
        .ok_or_else(|| VarError::Config("ticker is required".into()))?;
    let start = cfg
        .start_date
        .ok_or_else(|| VarError::Config("start date is required".into()))?;

    tracing::info!(
        ticker = %ticker,
        start = %start,
        end = %cfg.end_date,
        interval = %cfg.interval,
        "fetching price history"
    );

    let client = YahooClient::new(&cfg.yahoo_base_url);
    let prices = client
        .fetch_prices(&ticker, start, cfg.end_date, &cfg.interval)
        .await?;

    let returns = returns_from_series(&prices)?;
    tracing::info!(prices = prices.len(), returns = returns.len(), "return series built");

    let estimator = VarEstimator::new(cfg.confidence_level, cfg.mc_samples)?;
    tracing::debug!(
        confidence = estimator.confidence(),
        samples = estimator.mc_samples(),
        seeded = cfg.seed.is_some(),
        "estimator ready"
    );
    let mut rng = match cfg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let estimate = estimator.estimate(&returns, &mut rng)?;
    tracing::info!(
        confidence = estimate.confidence,
        parametric = estimate.parametric,
        monte_carlo = estimate.monte_carlo,
        historical = estimate.historical,
        "var estimated"
    );

    let meta = ReportMeta {
        ticker,
        start,
        end: cfg.end_date,
        interval: cfg.interval.clone(),
        mc_samples: estimator.mc_samples(),
        bins: cfg.histogram_bins,
    };
    let report = AnalysisReport::build(meta, &prices, &returns, estimate)?;
    println!("{}", report.render_text(&prices));

    if cfg.serve_report {
        let port = cfg.server_port;
        let state = AppState::new(cfg, prices, returns, report);
        server::serve(state, port).await?;
    }

    Ok(())
}

/// Ask on stdin for whatever the environment and arguments left unset.
async fn prompt_missing(mut cfg: AppConfig) -> VarResult<AppConfig> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    if cfg.ticker.is_none() {
        let raw = prompt(&mut lines, "Ticker (e.g. 'AAPL', 'OXY'): ").await?;
        let ticker = raw.trim().to_uppercase();
        if ticker.is_empty() {
            return Err(VarError::Config("ticker must not be empty".into()));
        }
        cfg.ticker = Some(ticker);
    }

    if cfg.start_date.is_none() {
        let raw = prompt(&mut lines, "Start date (e.g. '2000-01-01'): ").await?;
        cfg.set_start_date(&raw)?;
    }

    Ok(cfg)
}

async fn prompt<R>(lines: &mut tokio::io::Lines<R>, question: &str) -> VarResult<String>
where
    R: tokio::io::AsyncBufRead + Unpin,
{
    let mut stdout = tokio::io::stdout();
    stdout.write_all(question.as_bytes()).await?;
    stdout.flush().await?;

    lines
        .next_line()
        .await?
        .ok_or_else(|| VarError::Config("stdin closed before input was given".into()))
}
