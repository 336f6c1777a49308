/// Error types for the VaR pipeline.
/// Core failures (bad prices, bad confidence, too little data) are distinguishable
/// values, never panics and never placeholder numbers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VarError {
    #[error("empty input: no usable observations")]
    EmptyInput,

    #[error("insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("invalid price {price} at index {index}: prices must be positive and finite")]
    InvalidPrice { index: usize, price: f64 },

    #[error("invalid confidence level {0}: must lie strictly between 0 and 1")]
    InvalidConfidence(f64),

    #[error("invalid percentile {0}: must lie within [0, 100]")]
    InvalidPercentile(f64),

    #[error(
        "invalid Monte Carlo sample count {0}: must lie within [1, {max}]",
        max = crate::models::monte_carlo::MAX_SAMPLES
    )]
    InvalidSampleCount(usize),

    #[error("timestamps must be strictly increasing (violation at index {index})")]
    UnorderedTimestamps { index: usize },

    #[error("model computation error: {0}")]
    Model(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("market data error: {0}")]
    DataSource(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(String),
}

impl From<reqwest::Error> for VarError {
    fn from(e: reqwest::Error) -> Self {
        VarError::Network(e.to_string())
    }
}

impl From<serde_json::Error> for VarError {
    fn from(e: serde_json::Error) -> Self {
        VarError::Parse(e.to_string())
    }
}

impl From<std::io::Error> for VarError {
    fn from(e: std::io::Error) -> Self {
        VarError::Io(e.to_string())
    }
}

pub type VarResult<T> = Result<T, VarError>;
