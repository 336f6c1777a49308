use crate::errors::{VarError, VarResult};
use chrono::{DateTime, Utc};

/// One observation of an instrument: period timestamp and adjusted price.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

/// Validated price history. Timestamps strictly increase, prices are positive.
/// Immutable after construction.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(transparent)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> VarResult<Self> {
        if points.is_empty() {
            return Err(VarError::EmptyInput);
        }

        for (index, point) in points.iter().enumerate() {
            validate_price(index, point.price)?;
            if index > 0 && point.timestamp <= points[index - 1].timestamp {
                return Err(VarError::UnorderedTimestamps { index });
            }
        }

        Ok(Self { points })
    }

    #[inline]
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }
}

/// Log returns with every undefined value removed.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct ReturnSeries {
    values: Vec<f64>,
}

impl ReturnSeries {
    /// Wrap raw returns, dropping NaN and infinite entries.
    pub fn from_raw(values: Vec<f64>) -> Self {
        let values = values.into_iter().filter(|r| r.is_finite()).collect();
        Self { values }
    }

    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[inline]
pub(crate) fn validate_price(index: usize, price: f64) -> VarResult<()> {
    if price <= 0.0 || !price.is_finite() {
        return Err(VarError::InvalidPrice { index, price });
    }
    Ok(())
}
