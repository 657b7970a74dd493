// src/analysis/mod.rs
pub mod distribution;
pub mod iri;
pub mod breakdown;
pub mod statistics;
pub mod results;
pub mod deterministic;
pub mod monte_carlo;
pub mod run;

// Re-export commonly used types
pub use distribution::{
    DistributionType,
    DistributionParams,
    ValueSource,
    PointEstimate,
    RandomDraw
};
pub use iri::{iri_progression, iri_chart_points, IriChart, IriPoint};
pub use breakdown::{yearly_breakdown, Breakdown, EconomicDraw, ModelInputs, YearlyEntry};
pub use statistics::{SummaryStatistics, HistogramBin, CdfPoint, histogram, cdf_points};
pub use results::{ImpactSummary, Metric, RunResults, SourceBreakdown};
pub use deterministic::{run_deterministic, DeterministicResult, CumulativePoint};
pub use monte_carlo::{run_monte_carlo, ProbabilisticResult};
pub use run::{run_analysis, run_analysis_with_cancel};
