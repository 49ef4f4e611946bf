use serde::Serialize;

use crate::engine::regression::{FitError, FitResult, Regressor};
use crate::engine::transform::{Sample, TransformedSample, reciprocal_pressure};

/// Result of the Klinkenberg linearization `k_app = k + m / p`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct KlinkenbergFit {
    /// Intercept at infinite pressure (`1/p -> 0`).
    pub true_permeability: f64,
    /// Slope of `k_app` against `1/p`.
    pub slip_factor: f64,
    pub points: Vec<TransformedSample>,
    pub fit: FitResult,
}

impl KlinkenbergFit {
    pub fn apparent_permeability_at(&self, pressure: f64) -> Result<f64, FitError> {
        if !pressure.is_finite() || pressure <= 0.0 {
            return Err(FitError::InvalidPressure(pressure));
        }
        Ok(self.fit.predict(1.0 / pressure))
    }

    /// `b` in `k_app = k (1 + b / p)`, in pressure units.
    pub fn gas_slippage_factor(&self) -> Option<f64> {
        if self.true_permeability == 0.0 {
            return None;
        }
        Some(self.slip_factor / self.true_permeability)
    }
}

pub fn correct(samples: &[Sample], regressor: &Regressor) -> Result<KlinkenbergFit, FitError> {
    let points = reciprocal_pressure(samples)?;
    let fit = regressor.fit(&points)?;
    Ok(KlinkenbergFit {
        true_permeability: fit.intercept,
        slip_factor: fit.slope,
        points,
        fit,
    })
}
