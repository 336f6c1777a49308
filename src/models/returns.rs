use crate::errors::{VarError, VarResult};
use crate::models::series::{validate_price, PriceSeries, ReturnSeries};

/// Log returns r[i] = ln(p[i]) - ln(p[i-1]) for i >= 1.
///
/// The first price has no predecessor, so its return is dropped rather than
/// kept as a missing value. Every price is validated before any return is
/// computed. Pure function.
pub fn log_returns(prices: &[f64]) -> VarResult<ReturnSeries> {
    if prices.is_empty() {
        return Err(VarError::EmptyInput);
    }

    for (index, &price) in prices.iter().enumerate() {
        validate_price(index, price)?;
    }

    if prices.len() < 2 {
        return Err(VarError::InsufficientData {
            required: 2,
            actual: prices.len(),
        });
    }

    let values = prices
        .windows(2)
        .map(|w| w[1].ln() - w[0].ln())
        .collect();

    Ok(ReturnSeries::from_raw(values))
}

/// Build the return series for a fetched price history.
pub fn returns_from_series(series: &PriceSeries) -> VarResult<ReturnSeries> {
    log_returns(&series.prices())
}
