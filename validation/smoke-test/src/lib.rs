//! Smoke test for the GeoLayers client against a live server.
//!
//! Runs every API operation once and reports which succeeded.

pub mod checks;
pub mod report;

pub use checks::{run_all, CheckResult, Targets};
pub use report::SmokeReport;
