use crate::errors::{VarError, VarResult};
use crate::models::monte_carlo::{DEFAULT_SAMPLES, MAX_SAMPLES};
use crate::report::histogram::DEFAULT_BINS;
use crate::risk::var::{validate_confidence, DEFAULT_CONFIDENCE};
use chrono::NaiveDate;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Instrument identifier; prompted for when unset.
    pub ticker: Option<String>,
    /// First date of the price history; prompted for when unset.
    pub start_date: Option<NaiveDate>,
    pub end_date: NaiveDate,
    pub interval: String,
    pub confidence_level: f64,
    pub mc_samples: usize,
    pub seed: Option<u64>,
    pub histogram_bins: usize,
    pub yahoo_base_url: String,
    pub serve_report: bool,
    pub server_port: u16,
}

impl AppConfig {
    pub fn from_env() -> VarResult<Self> {
        dotenvy::dotenv().ok();

        let confidence_level = env_var_or("VAR_CONFIDENCE", &DEFAULT_CONFIDENCE.to_string())
            .parse::<f64>()
            .map_err(|e| VarError::Config(format!("VAR_CONFIDENCE: {e}")))?;
        let confidence_level = validate_confidence(confidence_level)
            .map_err(|e| VarError::Config(format!("VAR_CONFIDENCE: {e}")))?;

        let mc_samples = env_var_or("VAR_MC_SAMPLES", &DEFAULT_SAMPLES.to_string())
            .parse::<usize>()
            .map_err(|e| VarError::Config(format!("VAR_MC_SAMPLES: {e}")))?;
        if mc_samples == 0 || mc_samples > MAX_SAMPLES {
            return Err(VarError::Config(format!(
                "VAR_MC_SAMPLES: must lie within [1, {MAX_SAMPLES}]"
            )));
        }

        let seed = env_var_opt("VAR_SEED")
            .map(|s| s.parse::<u64>())
            .transpose()
            .map_err(|e| VarError::Config(format!("VAR_SEED: {e}")))?;

        let histogram_bins = env_var_or("HISTOGRAM_BINS", &DEFAULT_BINS.to_string())
            .parse::<usize>()
            .map_err(|e| VarError::Config(format!("HISTOGRAM_BINS: {e}")))?;
        if histogram_bins == 0 {
            return Err(VarError::Config("HISTOGRAM_BINS: must be at least 1".into()));
        }

        let serve_report = env_var_or("SERVE_REPORT", "false")
            .parse::<bool>()
            .map_err(|e| VarError::Config(format!("SERVE_REPORT: {e}")))?;

        let server_port = env_var_or("SERVER_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| VarError::Config(format!("SERVER_PORT: {e}")))?;

        let start_date = env_var_opt("VAR_START_DATE")
            .map(|s| parse_date("VAR_START_DATE", &s))
            .transpose()?;

        let end_date = match env_var_opt("VAR_END_DATE") {
            Some(s) => parse_date("VAR_END_DATE", &s)?,
            None => chrono::Utc::now().date_naive(),
        };

        let config = Self {
            ticker: env_var_opt("VAR_TICKER"),
            start_date,
            end_date,
            interval: env_var_or("VAR_INTERVAL", "1d"),
            confidence_level,
            mc_samples,
            seed,
            histogram_bins,
            yahoo_base_url: env_var_or("YAHOO_BASE_URL", "https://query1.finance.yahoo.com"),
            serve_report,
            server_port,
        };
        if let Some(start) = config.start_date {
            check_range(start, config.end_date)?;
        }
        Ok(config)
    }

    /// Apply positional arguments `[TICKER] [START_DATE]` over the environment.
    pub fn with_args<I: IntoIterator<Item = String>>(mut self, args: I) -> VarResult<Self> {
        let mut args = args.into_iter();
        if let Some(ticker) = args.next() {
            self.ticker = Some(ticker.trim().to_uppercase());
        }
        if let Some(start) = args.next() {
            self.set_start_date(&start)?;
        }
        Ok(self)
    }

    /// Parse and store the start date. Leaves the config untouched on error.
    pub fn set_start_date(&mut self, raw: &str) -> VarResult<()> {
        let start = parse_date("start date", raw)?;
        check_range(start, self.end_date)?;
        self.start_date = Some(start);
        Ok(())
    }
}

fn check_range(start: NaiveDate, end: NaiveDate) -> VarResult<()> {
    if start >= end {
        return Err(VarError::Config(format!(
            "start date {start} must precede end date {end}"
        )));
    }
    Ok(())
}

pub fn parse_date(key: &str, raw: &str) -> VarResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|e| VarError::Config(format!("{key}: '{raw}' is not YYYY-MM-DD ({e})")))
}

fn env_var_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
