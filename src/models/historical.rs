use crate::errors::VarResult;
use crate::models::series::ReturnSeries;
use crate::models::stats::percentile;
use crate::models::{VarContext, VarMethod, VarModel};
use rand::RngCore;

/// Historical-simulation VaR: negated (1 - c) * 100 percentile of the
/// observed returns, same interpolation rule as the Monte Carlo model.
#[derive(Debug, Default)]
pub struct HistoricalVar;

impl VarModel for HistoricalVar {
    #[inline]
    fn name(&self) -> &'static str {
        "Historical"
    }

    #[inline]
    fn method(&self) -> VarMethod {
        VarMethod::Historical
    }

    fn estimate(
        &self,
        returns: &ReturnSeries,
        ctx: &VarContext,
        _rng: &mut dyn RngCore,
    ) -> VarResult<f64> {
        let tail = percentile(returns.values(), ctx.tail_percentile())?;
        Ok(0.0 - tail)
    }
}
