use crate::errors::{VarError, VarResult};
use statrs::statistics::Statistics;

/// Percentile of `data` at `pct` (0..=100), linear interpolation between
/// closest ranks.
///
/// rank = pct/100 * (n - 1); value = x[lo] + (x[hi] - x[lo]) * (rank - lo)
///
/// pct = 0 returns the minimum, pct = 100 the maximum.
pub fn percentile(data: &[f64], pct: f64) -> VarResult<f64> {
    if data.is_empty() {
        return Err(VarError::EmptyInput);
    }
    if !(0.0..=100.0).contains(&pct) {
        return Err(VarError::InvalidPercentile(pct));
    }

    let mut sorted = data.to_vec();
    sorted.sort_by(f64::total_cmp);
    Ok(percentile_sorted(&sorted, pct))
}

/// Same rule as [`percentile`] on data already sorted ascending.
/// Caller guarantees `sorted` is non-empty and `pct` lies in [0, 100].
#[inline]
pub(crate) fn percentile_sorted(sorted: &[f64], pct: f64) -> f64 {
    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = (rank.ceil() as usize).min(sorted.len() - 1);
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Sample mean and unbiased (n-1) standard deviation.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Moments {
    pub mean: f64,
    pub std_dev: f64,
}

impl Moments {
    pub fn of(data: &[f64]) -> VarResult<Self> {
        if data.is_empty() {
            return Err(VarError::EmptyInput);
        }
        if data.len() < 2 {
            return Err(VarError::InsufficientData {
                required: 2,
                actual: data.len(),
            });
        }

        let mean = data.iter().mean();
        let std_dev = data.iter().std_dev();

        if !mean.is_finite() || !std_dev.is_finite() {
            return Err(VarError::Model(format!(
                "non-finite moments: mean={mean}, std_dev={std_dev}"
            )));
        }

        Ok(Self { mean, std_dev })
    }
}

/// Descriptive statistics of a return series (count, mean, std, min,
/// quartiles, max).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub max: f64,
}

impl Summary {
    pub fn of(data: &[f64]) -> VarResult<Self> {
        let moments = Moments::of(data)?;

        let mut sorted = data.to_vec();
        sorted.sort_by(f64::total_cmp);

        Ok(Self {
            count: sorted.len(),
            mean: moments.mean,
            std: moments.std_dev,
            min: sorted[0],
            p25: percentile_sorted(&sorted, 25.0),
            p50: percentile_sorted(&sorted, 50.0),
            p75: percentile_sorted(&sorted, 75.0),
            max: sorted[sorted.len() - 1],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SAMPLE: [f64; 5] = [0.01, -0.02, 0.015, -0.01, 0.005];

    #[test]
    fn test_percentile_bounds_are_min_and_max() {
        assert_eq!(percentile(&SAMPLE, 0.0).unwrap(), -0.02);
        assert_eq!(percentile(&SAMPLE, 100.0).unwrap(), 0.015);
    }

    #[test]
    fn test_percentile_interpolates_between_ranks() {
        // sorted: [-0.02, -0.01, 0.005, 0.01, 0.015], rank = 0.04
        assert_relative_eq!(percentile(&SAMPLE, 1.0).unwrap(), -0.0196, epsilon = 1e-12);
        // rank = 1.5 -> halfway between -0.01 and 0.005
        assert_relative_eq!(percentile(&SAMPLE, 37.5).unwrap(), -0.0025, epsilon = 1e-12);
        assert_relative_eq!(percentile(&SAMPLE, 50.0).unwrap(), 0.005, epsilon = 1e-12);
    }

    #[test]
    fn test_percentile_single_value() {
        assert_eq!(percentile(&[3.0], 42.0).unwrap(), 3.0);
    }

    #[test]
    fn test_percentile_rejects_out_of_range() {
        assert_eq!(percentile(&SAMPLE, 100.5).unwrap_err(), VarError::InvalidPercentile(100.5));
        assert_eq!(percentile(&SAMPLE, -1.0).unwrap_err(), VarError::InvalidPercentile(-1.0));
        assert!(matches!(percentile(&SAMPLE, f64::NAN), Err(VarError::InvalidPercentile(_))));
    }

    #[test]
    fn test_percentile_empty() {
        assert_eq!(percentile(&[], 50.0).unwrap_err(), VarError::EmptyInput);
    }

    #[test]
    fn test_moments_use_unbiased_std() {
        let m = Moments::of(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_relative_eq!(m.mean, 2.5, epsilon = 1e-12);
        // sum of squared deviations = 5, n - 1 = 3
        assert_relative_eq!(m.std_dev, (5.0f64 / 3.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_moments_need_two_points() {
        assert_eq!(
            Moments::of(&[0.01]).unwrap_err(),
            VarError::InsufficientData { required: 2, actual: 1 }
        );
    }

    #[test]
    fn test_summary_quartiles() {
        let s = Summary::of(&SAMPLE).unwrap();
        assert_eq!(s.count, 5);
        assert_eq!(s.min, -0.02);
        assert_eq!(s.max, 0.015);
        assert_relative_eq!(s.p25, -0.01, epsilon = 1e-12);
        assert_relative_eq!(s.p50, 0.005, epsilon = 1e-12);
        assert_relative_eq!(s.p75, 0.01, epsilon = 1e-12);
        assert_relative_eq!(s.mean, 0.0, epsilon = 1e-12);
    }
}
