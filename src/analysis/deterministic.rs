// src/analysis/deterministic.rs

use serde::{Serialize, Deserialize};
use crate::analysis::breakdown::{yearly_breakdown, EconomicDraw, ModelInputs, YearlyEntry};
use crate::analysis::distribution::PointEstimate;
use crate::analysis::results::{ImpactSummary, SourceBreakdown};
use crate::config::Alternative;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CumulativePoint {
    pub year: u32,
    pub cost: f64,  // cumulative discounted $M
    pub co2: f64,   // cumulative tonnes
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeterministicResult {
    pub alternative: String,
    pub iri: Vec<f64>,
    pub yearly: Vec<YearlyEntry>,
    pub cumulative: Vec<CumulativePoint>,
    pub impacts: ImpactSummary,
    pub cost_sources: SourceBreakdown,
    pub co2_sources: SourceBreakdown,
}

pub fn analyze_alternative(alternative: &Alternative, inputs: &ModelInputs<'_>) -> DeterministicResult {
    let economics = EconomicDraw::point_estimate(inputs.params);
    let breakdown = yearly_breakdown(alternative, &economics, inputs, &mut PointEstimate);
    let totals = breakdown.totals();

    let cumulative = breakdown.yearly
        .iter()
        .map(|y| CumulativePoint {
            year: y.year,
            cost: y.cumulative_cost_discounted / 1e6,
            co2: y.cumulative_co2,
        })
        .collect();

    DeterministicResult {
        alternative: alternative.name.clone(),
        iri: breakdown.iri,
        yearly: breakdown.yearly,
        cumulative,
        impacts: ImpactSummary::from_totals(&totals),
        cost_sources: SourceBreakdown::cost(&totals),
        co2_sources: SourceBreakdown::co2(&totals),
    }
}

pub fn run_deterministic(alternatives: &[Alternative], inputs: &ModelInputs<'_>) -> Vec<DeterministicResult> {
    alternatives
        .iter()
        .map(|alt| analyze_alternative(alt, inputs))
        .collect()
}
