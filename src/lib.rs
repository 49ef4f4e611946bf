//! Klinkenberg gas-slippage correction.
//!
//! `engine` holds the pure regression and the reciprocal-pressure transform;
//! everything else (tables, synthetic data, reports, config) feeds it or
//! presents its output.

pub mod config;
pub mod dataset;
pub mod engine;
pub mod report;
pub mod store;
