// src/analysis/breakdown.rs

use serde::{Serialize, Deserialize};
use rand::Rng;
use crate::analysis::distribution::ValueSource;
use crate::analysis::iri::iri_progression;
use crate::config::{Alternative, GlobalParameters, PriceIndex, TreatmentLibrary};

// Ziyadi et al. excess fuel consumption from roughness.
const FUEL_IRI_COEFFICIENT: f64 = 2.0469;
const FUEL_IRI_DIVISOR: f64 = 131.0;
const DAYS_PER_YEAR: f64 = 365.0;
const KG_PER_TONNE: f64 = 1000.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct EconomicDraw {
    pub discount_rate: f64,     // %
    pub fuel_cost: f64,         // $/gal
    pub co2_per_gallon: f64,    // kg/gal
}

impl EconomicDraw {
    pub fn point_estimate(params: &GlobalParameters) -> Self {
        Self {
            discount_rate: params.discount_rate.deterministic,
            fuel_cost: params.fuel_cost.deterministic,
            co2_per_gallon: params.co2_per_gallon.deterministic,
        }
    }

    pub fn sample<R: Rng + ?Sized>(params: &GlobalParameters, rng: &mut R) -> Self {
        Self {
            discount_rate: params.discount_rate.sample(rng),
            fuel_cost: params.fuel_cost.sample(rng),
            co2_per_gallon: params.co2_per_gallon.sample(rng),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ModelInputs<'a> {
    pub params: &'a GlobalParameters,
    pub library: &'a TreatmentLibrary,
    pub price_index: &'a PriceIndex,
    pub price_adjustment: f64,  // index value at the construction year
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YearlyEntry {
    pub year: u32,
    pub treatment_cost_discounted: f64,
    pub treatment_cost_undiscounted: f64,
    pub treatment_co2: f64,             // tonnes
    pub workzone_cost_discounted: f64,
    pub workzone_cost_undiscounted: f64,
    pub workzone_co2: f64,
    pub fuel_cost_discounted: f64,
    pub fuel_cost_undiscounted: f64,
    pub fuel_co2: f64,
    pub cumulative_cost_discounted: f64,
    pub cumulative_cost_undiscounted: f64,
    pub cumulative_co2: f64,
    pub treatment: Option<String>,
}

// Sums over a breakdown. Costs are discounted dollars, CO2 in tonnes.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct BreakdownTotals {
    pub treatment_cost: f64,
    pub workzone_cost: f64,
    pub fuel_cost: f64,
    pub treatment_co2: f64,
    pub workzone_co2: f64,
    pub fuel_co2: f64,
    pub total_cost: f64,
    pub total_co2: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Breakdown {
    pub iri: Vec<f64>,              // years 0..=N
    pub yearly: Vec<YearlyEntry>,   // years 1..=N
}

impl Breakdown {
    pub fn totals(&self) -> BreakdownTotals {
        let mut totals = self.yearly.iter().fold(BreakdownTotals::default(), |mut acc, y| {
            acc.treatment_cost += y.treatment_cost_discounted;
            acc.workzone_cost += y.workzone_cost_discounted;
            acc.fuel_cost += y.fuel_cost_discounted;
            acc.treatment_co2 += y.treatment_co2;
            acc.workzone_co2 += y.workzone_co2;
            acc.fuel_co2 += y.fuel_co2;
            acc
        });
        if let Some(last) = self.yearly.last() {
            totals.total_cost = last.cumulative_cost_discounted;
            totals.total_co2 = last.cumulative_co2;
        }
        totals
    }
}

pub fn discount_factor(discount_rate: f64, year: u32) -> f64 {
    (1.0 + discount_rate / 100.0).powi(-(year as i32))
}

pub fn excess_fuel_gallons(average_iri: f64, base_iri: f64, aadt: f64, length_miles: f64) -> f64 {
    let excess_iri = (average_iri - base_iri).max(0.0);
    FUEL_IRI_COEFFICIENT * excess_iri / FUEL_IRI_DIVISOR / 1000.0 * aadt * DAYS_PER_YEAR * length_miles
}

/// Year-by-year cost and CO2 ledger for one alternative and one set of
/// economic inputs. Unknown treatments contribute nothing.
pub fn yearly_breakdown<S: ValueSource>(
    alternative: &Alternative,
    economics: &EconomicDraw,
    inputs: &ModelInputs<'_>,
    source: &mut S,
) -> Breakdown {
    let params = inputs.params;
    let iri = iri_progression(alternative, params, inputs.library, source);
    let area = params.treated_area();
    let mut yearly = Vec::with_capacity(params.analysis_period as usize);

    let mut cumulative_cost_discounted = 0.0;
    let mut cumulative_cost_undiscounted = 0.0;
    let mut cumulative_co2 = 0.0;

    for year in 1..=params.analysis_period {
        let idx = year as usize;
        let average_iri = (iri[idx - 1] + iri[idx]) / 2.0;
        let excess_gallons = excess_fuel_gallons(average_iri, params.base_iri, params.aadt, params.length_miles);
        let fuel_cost = excess_gallons * economics.fuel_cost;
        let fuel_co2 = excess_gallons * economics.co2_per_gallon / KG_PER_TONNE;
        let discount = discount_factor(economics.discount_rate, year);

        let activity = alternative.activity_at(year);
        let mut entry = YearlyEntry {
            year,
            treatment_cost_discounted: 0.0,
            treatment_cost_undiscounted: 0.0,
            treatment_co2: 0.0,
            workzone_cost_discounted: 0.0,
            workzone_cost_undiscounted: 0.0,
            workzone_co2: 0.0,
            fuel_cost_discounted: fuel_cost * discount,
            fuel_cost_undiscounted: fuel_cost,
            fuel_co2,
            cumulative_cost_discounted: 0.0,
            cumulative_cost_undiscounted: 0.0,
            cumulative_co2: 0.0,
            treatment: activity.map(|a| a.treatment.clone()),
        };

        if let Some(treatment) = activity.and_then(|a| inputs.library.get(&a.treatment)) {
            let correction = inputs.price_index.correction_factor(inputs.price_adjustment, treatment.cost_year);
            let unit_cost = source.value(&treatment.cost);
            let unit_co2 = source.value(&treatment.co2);

            entry.treatment_cost_undiscounted = unit_cost * correction * area;
            entry.treatment_cost_discounted = entry.treatment_cost_undiscounted * discount;
            entry.treatment_co2 = unit_co2 * area / KG_PER_TONNE;

            let delay_hours = treatment.delay_hours_per_vehicle * params.aadt * treatment.workzone_days;
            entry.workzone_cost_undiscounted = delay_hours * params.value_of_time;
            entry.workzone_cost_discounted = entry.workzone_cost_undiscounted * discount;
            entry.workzone_co2 = delay_hours * params.workzone_idling_co2 / KG_PER_TONNE;
        }

        cumulative_cost_discounted += entry.treatment_cost_discounted
            + entry.workzone_cost_discounted
            + entry.fuel_cost_discounted;
        cumulative_cost_undiscounted += entry.treatment_cost_undiscounted
            + entry.workzone_cost_undiscounted
            + entry.fuel_cost_undiscounted;
        cumulative_co2 += entry.treatment_co2 + entry.workzone_co2 + entry.fuel_co2;

        entry.cumulative_cost_discounted = cumulative_cost_discounted;
        entry.cumulative_cost_undiscounted = cumulative_cost_undiscounted;
        entry.cumulative_co2 = cumulative_co2;
        yearly.push(entry);
    }

    Breakdown { iri, yearly }
}
