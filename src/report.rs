use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::Config;
use crate::engine::klinkenberg::KlinkenbergFit;
use crate::engine::transform::Sample;

#[derive(Clone, Debug, Serialize)]
pub struct ReportRow {
    pub pressure: f64,
    pub inverse_pressure: f64,
    pub measured: f64,
    pub fitted: f64,
}

/// Presentation of a fit. Values are kept at full precision; rounding only
/// happens when rendering text.
#[derive(Clone, Debug, Serialize)]
pub struct FitReport {
    pub true_permeability: f64,
    pub slip_factor: f64,
    pub gas_slippage_factor: Option<f64>,
    pub pressure_unit: String,
    pub permeability_unit: String,
    pub generated_at: DateTime<Utc>,
    pub rows: Vec<ReportRow>,
    #[serde(skip)]
    precision: usize,
}

impl FitReport {
    pub fn new(samples: &[Sample], fit: &KlinkenbergFit, config: &Config) -> Self {
        let rows = samples
            .iter()
            .zip(&fit.points)
            .zip(&fit.fit.fitted_y)
            .map(|((sample, point), &fitted)| ReportRow {
                pressure: sample.pressure,
                inverse_pressure: point.x,
                measured: point.y,
                fitted,
            })
            .collect();

        Self {
            true_permeability: fit.true_permeability,
            slip_factor: fit.slip_factor,
            gas_slippage_factor: fit.gas_slippage_factor(),
            pressure_unit: config.pressure_unit.clone(),
            permeability_unit: config.permeability_unit.clone(),
            generated_at: Utc::now(),
            rows,
            precision: config.precision,
        }
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn to_text(&self) -> String {
        let p = self.precision;
        let mut out = String::new();
        let _ = writeln!(
            out,
            "True Permeability (k) ≈ {:.p$} {}",
            self.true_permeability, self.permeability_unit
        );
        let _ = writeln!(out, "Klinkenberg Factor (b) ≈ {:.p$}", self.slip_factor);
        if let Some(b) = self.gas_slippage_factor {
            let _ = writeln!(out, "Slip pressure (b/k) ≈ {b:.p$} {}", self.pressure_unit);
        }

        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{:>14}  {:>14}  {:>14}  {:>14}",
            format!("p ({})", self.pressure_unit),
            "1/p",
            format!("k_app ({})", self.permeability_unit),
            "fitted"
        );
        for row in &self.rows {
            let _ = writeln!(
                out,
                "{:>14.p$}  {:>14.p$e}  {:>14.p$}  {:>14.p$}",
                row.pressure, row.inverse_pressure, row.measured, row.fitted
            );
        }
        out
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::reference_samples;
    use crate::engine::klinkenberg::correct;
    use crate::engine::regression::Regressor;

    fn reference_report() -> FitReport {
        let samples = reference_samples();
        let fit = correct(&samples, &Regressor::default()).unwrap();
        FitReport::new(&samples, &fit, &Config::default())
    }

    #[test]
    fn test_text_uses_five_decimals_by_default() {
        let text = reference_report().to_text();
        assert!(text.contains("True Permeability (k) ≈ 0.96471 mD"), "{text}");
        assert!(text.contains("Klinkenberg Factor (b) ≈ 50.27440"), "{text}");
    }

    #[test]
    fn test_text_precision_override() {
        let text = reference_report().with_precision(2).to_text();
        assert!(text.contains("True Permeability (k) ≈ 0.96 mD"), "{text}");
        assert!(text.contains("Klinkenberg Factor (b) ≈ 50.27"), "{text}");
    }

    #[test]
    fn test_rows_follow_input_order() {
        let report = reference_report();
        assert_eq!(report.rows.len(), 6);
        assert_eq!(report.rows[0].pressure, 100.0);
        assert_eq!(report.rows[0].inverse_pressure, 0.01);
        assert_eq!(report.rows[5].measured, 1.02);
    }

    #[test]
    fn test_json_keeps_full_precision() {
        let report = reference_report();
        let json = report.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["true_permeability"].as_f64(), Some(report.true_permeability));
        assert_eq!(value["rows"].as_array().map(|r| r.len()), Some(6));
        assert!(value.get("precision").is_none());
    }
}
