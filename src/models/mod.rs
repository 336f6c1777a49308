pub mod series;
pub mod returns;
pub mod stats;
pub mod parametric;
pub mod monte_carlo;
pub mod historical;

use crate::errors::VarResult;
use crate::models::series::ReturnSeries;
use rand::RngCore;

/// Which estimation method produced a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VarMethod {
    Parametric,
    MonteCarlo,
    Historical,
}

/// All VaR models implement this trait.
/// estimate() returns a loss magnitude at `ctx.confidence` over one return period.
/// Only the Monte Carlo model touches `rng`.
pub trait VarModel: Send + Sync {
    fn name(&self) -> &'static str;

    fn method(&self) -> VarMethod;

    fn estimate(
        &self,
        returns: &ReturnSeries,
        ctx: &VarContext,
        rng: &mut dyn RngCore,
    ) -> VarResult<f64>;
}

/// Precomputed inputs shared by every model. Stack-allocated, Copy.
#[derive(Debug, Clone, Copy)]
pub struct VarContext {
    pub confidence: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl VarContext {
    /// Lower-tail percentile (in percent) that the confidence level maps to.
    #[inline]
    pub fn tail_percentile(&self) -> f64 {
        (1.0 - self.confidence) * 100.0
    }
}
