// src/lib.rs
//! Life-cycle cost and CO2 comparison of pavement maintenance alternatives.
//!
//! A [`Scenario`] holds the treatment library, the alternatives and the
//! global parameters. [`run_analysis`] evaluates it once at point estimates
//! and again as a seeded Monte Carlo simulation.

pub mod analysis;
pub mod config;
pub mod error;
pub mod state;

pub use analysis::{run_analysis, run_analysis_with_cancel, Metric, RunResults};
pub use config::{Alternative, GlobalParameters, PriceIndex, Scenario, Treatment, TreatmentLibrary};
pub use error::{LccaError, LccaResult};
pub use state::AnalysisSession;
