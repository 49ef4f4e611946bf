use serde::Serialize;
use thiserror::Error;

use crate::engine::transform::TransformedSample;

/// Relative tolerance below which `N·Sxx − Sx²` counts as zero.
///
/// Compared against `N·Sxx`, so the check is independent of the units of `x`.
pub const DEFAULT_DEGENERATE_TOLERANCE: f64 = 1e-12;

pub const MIN_SAMPLES: usize = 2;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FitError {
    #[error("insufficient data: need at least {required} samples, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("degenerate input: all x values are identical (denominator {denominator:e})")]
    DegenerateInput { denominator: f64 },

    #[error("invalid sample at index {index}: {reason}")]
    InvalidSample { index: usize, reason: String },

    #[error("invalid degenerate tolerance {0}: must be finite and non-negative")]
    InvalidTolerance(f64),

    #[error("numeric overflow: {quantity} is not finite")]
    NonFinite { quantity: &'static str },

    #[error("invalid pressure {0}: must be positive and finite")]
    InvalidPressure(f64),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FitResult {
    pub intercept: f64,
    pub slope: f64,
    pub fitted_y: Vec<f64>,
}

impl FitResult {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    /// Measured minus fitted, in input order. Samples are matched by position.
    pub fn residuals(&self, samples: &[TransformedSample]) -> Vec<f64> {
        samples
            .iter()
            .zip(&self.fitted_y)
            .map(|(s, fitted)| s.y - fitted)
            .collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Regressor {
    tolerance: f64,
}

impl Default for Regressor {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_DEGENERATE_TOLERANCE,
        }
    }
}

impl Regressor {
    pub fn new(tolerance: f64) -> Result<Self, FitError> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(FitError::InvalidTolerance(tolerance));
        }
        Ok(Self { tolerance })
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Closed-form ordinary least squares for `y = intercept + slope * x`.
    pub fn fit(&self, samples: &[TransformedSample]) -> Result<FitResult, FitError> {
        if samples.len() < MIN_SAMPLES {
            return Err(FitError::InsufficientData {
                required: MIN_SAMPLES,
                actual: samples.len(),
            });
        }

        let mut sx = 0.0;
        let mut sy = 0.0;
        let mut sxx = 0.0;
        let mut sxy = 0.0;
        let first_x = samples[0].x;
        let mut x_varies = false;

        for (index, s) in samples.iter().enumerate() {
            if !s.x.is_finite() || !s.y.is_finite() {
                return Err(FitError::InvalidSample {
                    index,
                    reason: format!("non-finite value (x = {}, y = {})", s.x, s.y),
                });
            }
            x_varies |= s.x != first_x;
            sx += s.x;
            sy += s.y;
            sxx += s.x * s.x;
            sxy += s.x * s.y;
        }

        let sums = [
            ("sum of x", sx),
            ("sum of y", sy),
            ("sum of x²", sxx),
            ("sum of x·y", sxy),
        ];
        for (quantity, value) in sums {
            if !value.is_finite() {
                return Err(FitError::NonFinite { quantity });
            }
        }

        let n = samples.len() as f64;
        let denominator = n * sxx - sx * sx;
        if !denominator.is_finite() {
            return Err(FitError::NonFinite { quantity: "denominator" });
        }

        // Rounding error in the denominator grows with N, so the threshold does too.
        let threshold = (self.tolerance + 4.0 * n * f64::EPSILON) * n * sxx;
        if !x_varies || denominator.abs() <= threshold {
            return Err(FitError::DegenerateInput { denominator });
        }

        let slope = (n * sxy - sx * sy) / denominator;
        let intercept = (sy * sxx - sx * sxy) / denominator;
        if !slope.is_finite() {
            return Err(FitError::NonFinite { quantity: "slope" });
        }
        if !intercept.is_finite() {
            return Err(FitError::NonFinite { quantity: "intercept" });
        }

        let fitted_y: Vec<f64> = samples.iter().map(|s| intercept + slope * s.x).collect();
        if fitted_y.iter().any(|y| !y.is_finite()) {
            return Err(FitError::NonFinite { quantity: "fitted value" });
        }

        Ok(FitResult {
            intercept,
            slope,
            fitted_y,
        })
    }
}

/// Fits with the default degenerate tolerance.
pub fn fit(samples: &[TransformedSample]) -> Result<FitResult, FitError> {
    Regressor::default().fit(samples)
}
