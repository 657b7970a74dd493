// src/analysis/run.rs

use std::sync::atomic::AtomicBool;
use std::time::Instant;
use uuid::Uuid;
use crate::analysis::breakdown::ModelInputs;
use crate::analysis::deterministic::run_deterministic;
use crate::analysis::monte_carlo::run_monte_carlo_with_cancel;
use crate::analysis::results::RunResults;
use crate::config::{PriceIndex, Scenario};
use crate::error::LccaResult;

pub fn run_analysis(scenario: &Scenario, price_index: &PriceIndex) -> LccaResult<RunResults> {
    run_analysis_with_cancel(scenario, price_index, &AtomicBool::new(false))
}

/// Validates the scenario, then runs the deterministic and Monte Carlo
/// analyzers over every alternative.
pub fn run_analysis_with_cancel(
    scenario: &Scenario,
    price_index: &PriceIndex,
    cancel: &AtomicBool,
) -> LccaResult<RunResults> {
    scenario.validate()?;

    let params = &scenario.parameters;
    let run_id = Uuid::new_v4().to_string();
    let adjustment = price_index.adjustment_for(params.construction_year);
    if adjustment.clamped {
        tracing::warn!(
            construction_year = params.construction_year,
            last_year = ?price_index.last_year(),
            "Construction year is past the price index horizon, using the last projected year"
        );
    }
    log_schedule_issues(scenario);

    let inputs = ModelInputs {
        params,
        library: &scenario.treatments,
        price_index,
        price_adjustment: adjustment.index_value,
    };

    let started = Instant::now();
    tracing::info!(
        run_id = %run_id,
        alternatives = scenario.alternatives.len(),
        iterations = params.monte_carlo.iterations,
        seed = ?params.monte_carlo.seed,
        "Starting analysis run"
    );

    let deterministic = run_deterministic(&scenario.alternatives, &inputs);
    let probabilistic = run_monte_carlo_with_cancel(
        &scenario.alternatives,
        &inputs,
        &params.monte_carlo,
        cancel,
    )?;

    tracing::info!(
        run_id = %run_id,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Analysis run finished"
    );

    Ok(RunResults {
        run_id,
        timestamp: chrono::Utc::now().to_rfc3339(),
        price_index_clamped: adjustment.clamped,
        deterministic,
        probabilistic,
    })
}

// Schedules with unknown treatments, out-of-range years or repeated years
// still run; they are only noted in the log.
fn log_schedule_issues(scenario: &Scenario) {
    let period = scenario.parameters.analysis_period;
    for alternative in &scenario.alternatives {
        for activity in &alternative.schedule {
            if !scenario.treatments.contains(&activity.treatment) {
                tracing::debug!(
                    alternative = %alternative.name,
                    year = activity.year,
                    treatment = %activity.treatment,
                    "Ignoring activity with unknown treatment"
                );
            }
            if activity.year == 0 || activity.year > period {
                tracing::debug!(
                    alternative = %alternative.name,
                    year = activity.year,
                    analysis_period = period,
                    "Activity year is outside the analysis period"
                );
            }
        }
        let duplicates = alternative.duplicate_years();
        if !duplicates.is_empty() {
            tracing::debug!(
                alternative = %alternative.name,
                years = ?duplicates,
                "Several activities share a year, the first listed is used"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MonteCarloSettings;
    use crate::error::LccaError;

    fn small_scenario() -> Scenario {
        let mut scenario = Scenario::default();
        scenario.parameters.monte_carlo = MonteCarloSettings { iterations: 50, seed: Some(8) };
        scenario
    }

    #[test]
    fn test_run_produces_both_result_sets() {
        let results = run_analysis(&small_scenario(), &PriceIndex::cpi()).unwrap();
        assert_eq!(results.deterministic.len(), 2);
        assert_eq!(results.probabilistic.len(), 2);
        assert!(!results.price_index_clamped);
        assert!(results.deterministic_for("Alternative B").is_some());
        assert!(results.probabilistic_for("Alternative A").is_some());
        assert!(Uuid::parse_str(&results.run_id).is_ok());
    }

    #[test]
    fn test_clamped_construction_year_is_flagged() {
        let mut scenario = small_scenario();
        scenario.parameters.construction_year = 2100;
        let results = run_analysis(&scenario, &PriceIndex::cpi()).unwrap();
        assert!(results.price_index_clamped);
    }

    #[test]
    fn test_invalid_scenario_is_rejected_before_running() {
        let mut scenario = small_scenario();
        scenario.parameters.monte_carlo.iterations = 0;
        assert_eq!(
            run_analysis(&scenario, &PriceIndex::cpi()).unwrap_err(),
            LccaError::InvalidIterations
        );
    }
}
