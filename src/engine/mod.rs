pub mod klinkenberg;
pub mod regression;
pub mod transform;

pub use klinkenberg::{KlinkenbergFit, correct};
pub use regression::{FitError, FitResult, Regressor, fit};
pub use transform::{Sample, TransformedSample, reciprocal_pressure};
