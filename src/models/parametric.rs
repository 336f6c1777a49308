use crate::errors::{VarError, VarResult};
use crate::models::series::ReturnSeries;
use crate::models::{VarContext, VarMethod, VarModel};
use rand::RngCore;
use statrs::distribution::{ContinuousCDF, Normal};

/// Gaussian (variance-covariance) VaR.
///
/// VaR = |z * sigma|, z = Phi^-1(1 - c)
///
/// The mean return is not part of the result. This is narrower than the
/// textbook mu + z * sigma and is kept on purpose: reports built on this
/// crate compare against figures computed the same way.
pub struct ParametricVar {
    /// Standard normal distribution (created once, reused)
    normal: Normal,
}

impl ParametricVar {
    pub fn new() -> Self {
        Self {
            normal: Normal::standard(),
        }
    }

    /// z-score of the lower tail at `confidence`.
    #[inline]
    pub fn z_score(&self, confidence: f64) -> f64 {
        self.normal.inverse_cdf(1.0 - confidence)
    }
}

impl Default for ParametricVar {
    fn default() -> Self {
        Self::new()
    }
}

impl VarModel for ParametricVar {
    #[inline]
    fn name(&self) -> &'static str {
        "Parametric"
    }

    #[inline]
    fn method(&self) -> VarMethod {
        VarMethod::Parametric
    }

    fn estimate(
        &self,
        _returns: &ReturnSeries,
        ctx: &VarContext,
        _rng: &mut dyn RngCore,
    ) -> VarResult<f64> {
        // Flat series: no dispersion, no loss, whatever the tail quantile
        if ctx.std_dev == 0.0 {
            return Ok(0.0);
        }

        let z = self.z_score(ctx.confidence);
        if !z.is_finite() {
            return Err(VarError::Model(format!(
                "normal quantile at confidence {} is not finite",
                ctx.confidence
            )));
        }
        Ok((z * ctx.std_dev).abs())
    }
}
