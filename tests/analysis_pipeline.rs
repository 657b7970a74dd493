// tests/analysis_pipeline.rs
use pavement_lcca::analysis::breakdown::{discount_factor, excess_fuel_gallons};
use pavement_lcca::config::treatment::{MICROSURFACING, MILL_OVERLAY_2IN};
use pavement_lcca::config::MonteCarloSettings;
use pavement_lcca::{run_analysis, Alternative, AnalysisSession, Metric, PriceIndex, Scenario};

fn single_overlay_scenario(iterations: usize, seed: u64) -> Scenario {
    let mut scenario = Scenario::default();
    scenario.alternatives = vec![Alternative::new("Overlay").with_activity(10, MILL_OVERLAY_2IN)];
    scenario.parameters.analysis_period = 40;
    scenario.parameters.monte_carlo = MonteCarloSettings { iterations, seed: Some(seed) };
    scenario
}

#[test]
fn single_overlay_end_to_end() {
    let scenario = single_overlay_scenario(200, 11);
    let results = run_analysis(&scenario, &PriceIndex::cpi()).unwrap();
    let det = results.deterministic_for("Overlay").unwrap();

    assert_eq!(det.iri.len(), 41);
    assert_eq!(det.yearly.len(), 40);

    let area = scenario.parameters.treated_area();
    assert!((area - 13_939.2).abs() < 1e-9);

    let year10 = &det.yearly[9];
    assert_eq!(year10.year, 10);
    assert_eq!(year10.treatment.as_deref(), Some(MILL_OVERLAY_2IN));
    let expected_undiscounted = 7.05 * (308.42 / 282.43) * area;
    assert!((year10.treatment_cost_undiscounted - expected_undiscounted).abs() < 1e-6);
    assert!(
        (year10.treatment_cost_discounted - expected_undiscounted * discount_factor(4.0, 10)).abs() < 1e-6
    );
    // 3 days * 0.15 h/veh * 20000 veh at $25/h
    assert!((year10.workzone_cost_undiscounted - 3.0 * 0.15 * 20000.0 * 25.0).abs() < 1e-6);

    for other in det.yearly.iter().filter(|y| y.year != 10) {
        assert_eq!(other.treatment_cost_undiscounted, 0.0);
        assert!(other.treatment.is_none());
    }

    let impacts = &det.impacts;
    assert!(impacts.total_cost.is_finite() && impacts.total_cost > 0.0);
    assert!((impacts.total_cost - impacts.agency_cost - impacts.user_cost).abs() < 1e-9);

    let treatment_co2 = 5.5 * area / 1000.0;
    let expected_co2 = treatment_co2 + det.co2_sources.workzone + det.co2_sources.excess_fuel;
    assert!((det.impacts.total_co2 - expected_co2).abs() < 1e-9);
    assert!((det.co2_sources.treatment - treatment_co2).abs() < 1e-9);

    let last = det.cumulative.last().unwrap();
    assert_eq!(last.year, 40);
    assert!((last.cost - impacts.total_cost).abs() < 1e-9);
}

#[test]
fn excess_fuel_follows_iri_above_base() {
    let scenario = single_overlay_scenario(50, 1);
    let results = run_analysis(&scenario, &PriceIndex::cpi()).unwrap();
    let det = results.deterministic_for("Overlay").unwrap();
    let params = &scenario.parameters;

    // year 1 averages IRI 60 and 64
    let gallons = excess_fuel_gallons(62.0, params.base_iri, params.aadt, params.length_miles);
    let year1 = &det.yearly[0];
    assert!((year1.fuel_cost_undiscounted - gallons * 4.25).abs() < 1e-9);
    assert!((year1.fuel_co2 - gallons * 8.89 / 1000.0).abs() < 1e-9);
}

#[test]
fn preservation_strategy_costs_less_in_fuel() {
    let mut scenario = Scenario::default();
    scenario.parameters.monte_carlo = MonteCarloSettings { iterations: 100, seed: Some(5) };
    scenario.alternatives.push(Alternative::new("Do nothing"));
    let results = run_analysis(&scenario, &PriceIndex::cpi()).unwrap();

    let do_nothing = results.deterministic_for("Do nothing").unwrap();
    let preserved = results.deterministic_for("Alternative B").unwrap();
    assert_eq!(do_nothing.cost_sources.treatment, 0.0);
    assert!(preserved.cost_sources.excess_fuel < do_nothing.cost_sources.excess_fuel);
    assert!(preserved.iri.iter().zip(&do_nothing.iri).all(|(p, d)| p <= d));

    let lowest = results.lowest_deterministic(Metric::AgencyCost).unwrap();
    assert_eq!(lowest.alternative, "Do nothing");
}

#[test]
fn monte_carlo_cov_shrinks_with_iterations() {
    let mean_cov = |iterations: usize| -> f64 {
        let runs = 5;
        (0..runs)
            .map(|seed| {
                let scenario = single_overlay_scenario(iterations, 100 + seed);
                let results = run_analysis(&scenario, &PriceIndex::cpi()).unwrap();
                results.probabilistic_for("Overlay").unwrap().total_cost.cov.abs()
            })
            .sum::<f64>()
            / runs as f64
    };

    let ratio = mean_cov(100) / mean_cov(10_000);
    assert!(ratio > 5.0 && ratio < 20.0, "ratio was {ratio}");
}

#[test]
fn probabilistic_stats_bracket_the_mean() {
    let mut scenario = Scenario::default();
    scenario.alternatives[1] = scenario.alternatives[1].clone().with_activity(12, MICROSURFACING);
    scenario.parameters.monte_carlo = MonteCarloSettings { iterations: 1000, seed: Some(77) };
    let results = run_analysis(&scenario, &PriceIndex::cpi()).unwrap();

    for prob in &results.probabilistic {
        for metric in Metric::ALL {
            let stats = prob.stats(metric);
            assert_eq!(stats.samples.len(), 1000);
            assert!(stats.p5 <= stats.mean && stats.mean <= stats.p95, "{metric:?}");
            assert!(stats.std_dev >= 0.0);
        }
        let bins = prob.total_cost.histogram(25);
        let density: f64 = bins.iter().map(|b| b.density).sum();
        assert!((density - 1.0).abs() < 1e-9);
    }
}

#[test]
fn session_runs_edited_scenario() {
    let session = AnalysisSession::new(single_overlay_scenario(60, 4));
    let name = session.add_alternative();
    session.update_scenario(|s| {
        if let Some(alt) = s.alternatives.iter_mut().find(|a| a.name == name) {
            alt.schedule.push(pavement_lcca::config::Activity::new(15, MICROSURFACING));
        }
    });

    let results = session.run().unwrap();
    assert_eq!(results.deterministic.len(), 2);
    assert!(results.deterministic_for(&name).is_some());
    assert_eq!(session.latest_results().unwrap().run_id, results.run_id);
}

#[test]
fn nan_reset_target_is_rejected_at_run_boundary() {
    let mut scenario = single_overlay_scenario(20, 3);
    scenario
        .treatments
        .update(MILL_OVERLAY_2IN, |t| {
            t.iri_effect = pavement_lcca::config::IriEffect::Reset { iri_after: Some(f64::NAN) };
        })
        .unwrap();
    assert!(matches!(
        run_analysis(&scenario, &PriceIndex::cpi()),
        Err(pavement_lcca::LccaError::InvalidParameter { .. })
    ));
}
