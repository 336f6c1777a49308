use crate::errors::{VarError, VarResult};
use crate::models::historical::HistoricalVar;
use crate::models::monte_carlo::MonteCarloVar;
use crate::models::parametric::ParametricVar;
use crate::models::series::ReturnSeries;
use crate::models::stats::Moments;
use crate::models::{VarContext, VarMethod, VarModel};
use rand::RngCore;

/// Default confidence level when the caller does not pick one.
pub const DEFAULT_CONFIDENCE: f64 = 0.99;

/// The three VaR numbers for one series at one confidence level.
/// Terminal result, produced only when all three methods succeed.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct VarEstimate {
    pub confidence: f64,
    pub parametric: f64,
    pub monte_carlo: f64,
    pub historical: f64,
}

impl VarEstimate {
    #[inline]
    pub fn get(&self, method: VarMethod) -> f64 {
        match method {
            VarMethod::Parametric => self.parametric,
            VarMethod::MonteCarlo => self.monte_carlo,
            VarMethod::Historical => self.historical,
        }
    }
}

/// Reject confidence levels outside the open interval (0, 1). Never clamps.
#[inline]
pub fn validate_confidence(confidence: f64) -> VarResult<f64> {
    if confidence > 0.0 && confidence < 1.0 {
        Ok(confidence)
    } else {
        Err(VarError::InvalidConfidence(confidence))
    }
}

/// Runs the parametric, Monte Carlo and historical models over one return
/// series. Pure apart from the entropy drawn from `rng`.
pub struct VarEstimator {
    confidence: f64,
    parametric: ParametricVar,
    monte_carlo: MonteCarloVar,
    historical: HistoricalVar,
}

impl VarEstimator {
    pub fn new(confidence: f64, mc_samples: usize) -> VarResult<Self> {
        Ok(Self {
            confidence: validate_confidence(confidence)?,
            parametric: ParametricVar::default(),
            monte_carlo: MonteCarloVar::new(mc_samples)?,
            historical: HistoricalVar,
        })
    }

    #[inline]
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    #[inline]
    pub fn mc_samples(&self) -> usize {
        self.monte_carlo.samples()
    }

    fn models(&self) -> [&dyn VarModel; 3] {
        [&self.parametric, &self.monte_carlo, &self.historical]
    }

    pub fn estimate(&self, returns: &ReturnSeries, rng: &mut dyn RngCore) -> VarResult<VarEstimate> {
        if returns.is_empty() {
            return Err(VarError::EmptyInput);
        }
        let moments = Moments::of(returns.values())?;
        let ctx = VarContext {
            confidence: self.confidence,
            mean: moments.mean,
            std_dev: moments.std_dev,
        };

        let mut estimate = VarEstimate {
            confidence: self.confidence,
            parametric: 0.0,
            monte_carlo: 0.0,
            historical: 0.0,
        };

        for model in self.models() {
            let var = model.estimate(returns, &ctx, rng)?;
            tracing::debug!(model = model.name(), var = var, "var estimated");
            match model.method() {
                VarMethod::Parametric => estimate.parametric = var,
                VarMethod::MonteCarlo => estimate.monte_carlo = var,
                VarMethod::Historical => estimate.historical = var,
            }
        }

        Ok(estimate)
    }
}

impl Default for VarEstimator {
    fn default() -> Self {
        Self {
            confidence: DEFAULT_CONFIDENCE,
            parametric: ParametricVar::default(),
            monte_carlo: MonteCarloVar::default(),
            historical: HistoricalVar,
        }
    }
}

/// One-shot convenience: validate, estimate, return the triple.
pub fn estimate_var(
    returns: &ReturnSeries,
    confidence: f64,
    mc_samples: usize,
    rng: &mut dyn RngCore,
) -> VarResult<VarEstimate> {
    VarEstimator::new(confidence, mc_samples)?.estimate(returns, rng)
}
