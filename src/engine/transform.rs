use serde::{Deserialize, Serialize};

use crate::engine::regression::FitError;

/// One measurement: mean pore pressure and the gas permeability observed at it.
///
/// Field names double as the CSV header of the sample table.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    #[serde(rename = "mean_pressure")]
    pub pressure: f64,
    pub apparent_permeability: f64,
}

impl Sample {
    pub fn new(pressure: f64, apparent_permeability: f64) -> Self {
        Self {
            pressure,
            apparent_permeability,
        }
    }
}

/// A sample in regression coordinates: `x = 1/pressure`, `y = apparent permeability`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TransformedSample {
    pub x: f64,
    pub y: f64,
}

impl TryFrom<Sample> for TransformedSample {
    type Error = String;

    fn try_from(sample: Sample) -> Result<Self, Self::Error> {
        if !sample.pressure.is_finite() || sample.pressure <= 0.0 {
            return Err(format!(
                "pressure must be positive and finite, got {}",
                sample.pressure
            ));
        }
        if !sample.apparent_permeability.is_finite() {
            return Err(format!(
                "apparent permeability must be finite, got {}",
                sample.apparent_permeability
            ));
        }
        Ok(Self {
            x: 1.0 / sample.pressure,
            y: sample.apparent_permeability,
        })
    }
}

/// Maps every sample to reciprocal-pressure coordinates, preserving order.
/// Fails on the first sample whose reciprocal is undefined.
pub fn reciprocal_pressure(samples: &[Sample]) -> Result<Vec<TransformedSample>, FitError> {
    samples
        .iter()
        .enumerate()
        .map(|(index, &sample)| {
            TransformedSample::try_from(sample)
                .map_err(|reason| FitError::InvalidSample { index, reason })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reciprocal_preserves_order() {
        let samples = [Sample::new(100.0, 1.45), Sample::new(400.0, 1.10)];
        let transformed = reciprocal_pressure(&samples).unwrap();
        assert_eq!(
            transformed,
            vec![
                TransformedSample { x: 0.01, y: 1.45 },
                TransformedSample { x: 0.0025, y: 1.10 },
            ]
        );
    }

    #[test]
    fn test_zero_pressure_rejected() {
        let samples = [Sample::new(100.0, 1.45), Sample::new(0.0, 1.2)];
        let err = reciprocal_pressure(&samples).unwrap_err();
        assert!(matches!(err, FitError::InvalidSample { index: 1, .. }));
    }

    #[test]
    fn test_negative_pressure_rejected() {
        let err = reciprocal_pressure(&[Sample::new(-5.0, 1.0)]).unwrap_err();
        match err {
            FitError::InvalidSample { index, reason } => {
                assert_eq!(index, 0);
                assert!(reason.contains("-5"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_finite_values_rejected() {
        assert!(reciprocal_pressure(&[Sample::new(f64::NAN, 1.0)]).is_err());
        assert!(reciprocal_pressure(&[Sample::new(f64::INFINITY, 1.0)]).is_err());
        assert!(reciprocal_pressure(&[Sample::new(10.0, f64::NAN)]).is_err());
    }

    #[test]
    fn test_empty_input_transforms_to_empty() {
        assert!(reciprocal_pressure(&[]).unwrap().is_empty());
    }
}
