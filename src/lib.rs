//! Scoring pipeline for the Dinneroo marketplace analysis: ingest metric
//! extracts, rank dishes, zones, cuisines, and partners with multi-factor
//! percentile scoring, and serve the classified results.

pub mod analysis;
pub mod config;
pub mod error;
pub mod telemetry;
