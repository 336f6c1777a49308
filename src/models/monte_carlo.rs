use crate::errors::{VarError, VarResult};
use crate::models::series::ReturnSeries;
use crate::models::stats::percentile;
use crate::models::{VarContext, VarMethod, VarModel};
use rand::RngCore;
use rand_distr::{Distribution, Normal};

/// Default number of simulated returns per estimate.
pub const DEFAULT_SAMPLES: usize = 10_000;

/// Upper bound on simulated returns per estimate (80 MB of draws).
pub const MAX_SAMPLES: usize = 10_000_000;

/// Monte Carlo VaR.
///
/// Draws `samples` returns from N(mean, std_dev) and takes the negated
/// (1 - c) * 100 percentile of the draws. Results vary run to run unless
/// the caller seeds the random source.
pub struct MonteCarloVar {
    samples: usize,
}

impl MonteCarloVar {
    pub fn new(samples: usize) -> VarResult<Self> {
        if samples == 0 || samples > MAX_SAMPLES {
            return Err(VarError::InvalidSampleCount(samples));
        }
        Ok(Self { samples })
    }

    #[inline]
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Draw the synthetic return set.
    pub fn simulate(&self, mean: f64, std_dev: f64, rng: &mut dyn RngCore) -> VarResult<Vec<f64>> {
        // Degenerate distribution: every draw is the mean
        if std_dev == 0.0 {
            return Ok(vec![mean; self.samples]);
        }

        let normal = Normal::new(mean, std_dev)
            .map_err(|e| VarError::Model(format!("normal(mean={mean}, std_dev={std_dev}): {e}")))?;

        Ok((0..self.samples).map(|_| normal.sample(rng)).collect())
    }
}

impl Default for MonteCarloVar {
    fn default() -> Self {
        Self {
            samples: DEFAULT_SAMPLES,
        }
    }
}

impl VarModel for MonteCarloVar {
    #[inline]
    fn name(&self) -> &'static str {
        "Monte Carlo"
    }

    #[inline]
    fn method(&self) -> VarMethod {
        VarMethod::MonteCarlo
    }

    fn estimate(
        &self,
        _returns: &ReturnSeries,
        ctx: &VarContext,
        rng: &mut dyn RngCore,
    ) -> VarResult<f64> {
        let draws = self.simulate(ctx.mean, ctx.std_dev, rng)?;
        let tail = percentile(&draws, ctx.tail_percentile())?;
        Ok(0.0 - tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parametric::ParametricVar;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn empty() -> ReturnSeries {
        ReturnSeries::from_raw(vec![])
    }

    #[test]
    fn test_zero_samples_rejected() {
        assert!(matches!(MonteCarloVar::new(0), Err(VarError::InvalidSampleCount(0))));
    }

    #[test]
    fn test_oversized_sample_count_rejected() {
        assert!(MonteCarloVar::new(MAX_SAMPLES).is_ok());
        assert!(matches!(
            MonteCarloVar::new(MAX_SAMPLES + 1),
            Err(VarError::InvalidSampleCount(n)) if n == MAX_SAMPLES + 1
        ));
        assert!(matches!(
            MonteCarloVar::new(usize::MAX),
            Err(VarError::InvalidSampleCount(usize::MAX))
        ));
    }

    #[test]
    fn test_draw_count_matches_config() {
        let mc = MonteCarloVar::new(1234).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(mc.simulate(0.0, 0.01, &mut rng).unwrap().len(), 1234);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let mc = MonteCarloVar::default();
        let ctx = VarContext { confidence: 0.99, mean: 0.0005, std_dev: 0.015 };
        let a = mc.estimate(&empty(), &ctx, &mut StdRng::seed_from_u64(99)).unwrap();
        let b = mc.estimate(&empty(), &ctx, &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_sigma_returns_negated_mean() {
        let mc = MonteCarloVar::default();
        let mut rng = StdRng::seed_from_u64(3);
        let flat = VarContext { confidence: 0.99, mean: 0.0, std_dev: 0.0 };
        let var = mc.estimate(&empty(), &flat, &mut rng).unwrap();
        assert_eq!(var, 0.0);
        assert!(var.is_sign_positive(), "expected +0.0, got {var}");
    }

    #[test]
    fn test_converges_to_parametric() {
        let mc = MonteCarloVar::default();
        let parametric = ParametricVar::new();
        let ctx = VarContext { confidence: 0.99, mean: 0.0, std_dev: 0.02 };
        let mut rng = StdRng::seed_from_u64(2024);

        let analytic = parametric.estimate(&empty(), &ctx, &mut rng).unwrap();
        let trials = 50;
        let avg = (0..trials)
            .map(|_| mc.estimate(&empty(), &ctx, &mut rng).unwrap())
            .sum::<f64>()
            / trials as f64;

        let rel_err = (avg - analytic).abs() / analytic;
        assert!(rel_err < 0.02, "MC avg {avg} vs analytic {analytic} (rel err {rel_err})");
    }

    #[test]
    fn test_more_samples_tighten_error() {
        let parametric = ParametricVar::new();
        let ctx = VarContext { confidence: 0.95, mean: 0.0, std_dev: 0.01 };
        let mut rng = StdRng::seed_from_u64(11);
        let analytic = parametric.estimate(&empty(), &ctx, &mut rng).unwrap();

        let mean_abs_err = |samples: usize, rng: &mut StdRng| {
            let mc = MonteCarloVar::new(samples).unwrap();
            (0..40)
                .map(|_| (mc.estimate(&empty(), &ctx, rng).unwrap() - analytic).abs())
                .sum::<f64>()
                / 40.0
        };

        let coarse = mean_abs_err(200, &mut rng);
        let fine = mean_abs_err(20_000, &mut rng);
        assert!(fine < coarse, "fine={fine} should beat coarse={coarse}");
    }
}
