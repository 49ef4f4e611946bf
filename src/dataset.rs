use anyhow::{Result, bail};
use rand::Rng;
use rand::rngs::SmallRng;

use crate::engine::transform::Sample;

/// The six-point core plug measurement used for demos and as a regression fixture.
pub fn reference_samples() -> Vec<Sample> {
    [
        (100.0, 1.45),
        (200.0, 1.25),
        (300.0, 1.15),
        (400.0, 1.10),
        (500.0, 1.05),
        (600.0, 1.02),
    ]
    .into_iter()
    .map(|(pressure, k_app)| Sample::new(pressure, k_app))
    .collect()
}

#[derive(Clone, Debug)]
pub struct SyntheticParams {
    pub true_permeability: f64,
    /// Gas slippage `b`, in the same units as pressure.
    pub slippage: f64,
    pub min_pressure: f64,
    pub max_pressure: f64,
    pub points: usize,
    /// Half-width of the uniform noise added to each permeability.
    pub noise: f64,
}

impl Default for SyntheticParams {
    fn default() -> Self {
        Self {
            true_permeability: 1.0,
            slippage: 50.0,
            min_pressure: 100.0,
            max_pressure: 600.0,
            points: 6,
            noise: 0.0,
        }
    }
}

impl SyntheticParams {
    pub fn validate(&self) -> Result<()> {
        let values = [
            ("true_permeability", self.true_permeability),
            ("slippage", self.slippage),
            ("min_pressure", self.min_pressure),
            ("max_pressure", self.max_pressure),
            ("noise", self.noise),
        ];
        for (name, value) in values {
            if !value.is_finite() {
                bail!("{name} must be finite, got {value}");
            }
        }
        if self.min_pressure <= 0.0 || self.max_pressure < self.min_pressure {
            bail!(
                "pressure range must be positive and ordered, got {}..{}",
                self.min_pressure,
                self.max_pressure
            );
        }
        if self.noise < 0.0 {
            bail!("noise must be non-negative, got {}", self.noise);
        }
        Ok(())
    }
}

/// Generates `k_app = k (1 + b / p)` over an evenly spaced pressure grid.
pub fn synthetic(params: &SyntheticParams, rng: &mut SmallRng) -> Vec<Sample> {
    let step = if params.points > 1 {
        (params.max_pressure - params.min_pressure) / (params.points - 1) as f64
    } else {
        0.0
    };

    (0..params.points)
        .map(|i| {
            let pressure = params.min_pressure + step * i as f64;
            let ideal = params.true_permeability * (1.0 + params.slippage / pressure);
            let noise = if params.noise > 0.0 {
                rng.gen_range(-params.noise..=params.noise)
            } else {
                0.0
            };
            Sample::new(pressure, ideal + noise)
        })
        .collect()
}
