// src/config/parameters.rs
use serde::{Serialize, Deserialize};
use crate::analysis::distribution::DistributionParams;
use crate::error::{LccaError, LccaResult};

/// Yards per mile times yards per foot (rounded to 0.33).
const SQ_YD_FACTOR: f64 = 1760.0 * 0.33;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MonteCarloSettings {
    pub iterations: usize,
    pub seed: Option<u64>,
}

impl Default for MonteCarloSettings {
    fn default() -> Self {
        Self {
            iterations: 1000,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GlobalParameters {
    pub analysis_period: u32,           // years
    pub length_miles: f64,
    pub width_feet: f64,
    pub aadt: f64,                      // vehicles/day
    pub base_iri: f64,                  // in/mi
    pub initial_iri: f64,               // in/mi
    pub value_of_time: f64,             // $/hr
    pub construction_year: i32,
    pub workzone_idling_co2: f64,       // kg per vehicle-hour of delay
    pub discount_rate: DistributionParams,  // %
    pub fuel_cost: DistributionParams,      // $/gal
    pub co2_per_gallon: DistributionParams, // kg/gal
    pub monte_carlo: MonteCarloSettings,
}

impl Default for GlobalParameters {
    fn default() -> Self {
        Self {
            analysis_period: 40,
            length_miles: 1.0,
            width_feet: 24.0,
            aadt: 20000.0,
            base_iri: 60.0,
            initial_iri: 60.0,
            value_of_time: 25.0,
            construction_year: 2024,
            workzone_idling_co2: 0.5,
            discount_rate: DistributionParams::new_uniform(3.0, 5.0, 4.0, 1.0, 4.0),
            fuel_cost: DistributionParams::new_uniform(3.5, 5.0, 4.25, 0.5, 4.25),
            co2_per_gallon: DistributionParams::new_normal(8.89, 0.5, 8.0, 10.0, 8.89),
            monte_carlo: MonteCarloSettings::default(),
        }
    }
}

impl GlobalParameters {
    pub fn treated_area(&self) -> f64 {
        self.length_miles * self.width_feet * SQ_YD_FACTOR
    }

    pub fn validate(&self) -> LccaResult<()> {
        if self.monte_carlo.iterations == 0 {
            return Err(LccaError::InvalidIterations);
        }

        for (field, value) in [
            ("length_miles", self.length_miles),
            ("width_feet", self.width_feet),
            ("aadt", self.aadt),
            ("base_iri", self.base_iri),
            ("initial_iri", self.initial_iri),
            ("value_of_time", self.value_of_time),
            ("workzone_idling_co2", self.workzone_idling_co2),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(LccaError::InvalidParameter {
                    field: field.to_string(),
                    reason: "must be a finite non-negative number".to_string(),
                });
            }
        }

        self.discount_rate.validate("discount_rate")?;
        self.fuel_cost.validate("fuel_cost")?;
        self.co2_per_gallon.validate("co2_per_gallon")?;
        Ok(())
    }
}
