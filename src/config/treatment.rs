// src/config/treatment.rs
use serde::{Serialize, Deserialize};
use std::collections::BTreeMap;
use crate::analysis::distribution::DistributionParams;
use crate::error::{LccaError, LccaResult};

pub const RECONSTRUCTION: &str = "Reconstruction";
pub const MILL_OVERLAY_2IN: &str = "Mill & Overlay (2\")";
pub const MILL_OVERLAY_4IN: &str = "Mill & Overlay (4\")";
pub const MICROSURFACING: &str = "Microsurfacing";
pub const CHIP_SEAL: &str = "Chip Seal";
pub const CRACK_SEALING: &str = "Crack Sealing";

pub const BUILT_IN_TREATMENTS: [&str; 6] = [
    RECONSTRUCTION,
    MILL_OVERLAY_2IN,
    MILL_OVERLAY_4IN,
    MICROSURFACING,
    CHIP_SEAL,
    CRACK_SEALING,
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum IriEffect {
    /// Jump to a fixed post-treatment IRI (base IRI when unset).
    Reset { iri_after: Option<f64> },
    /// Lower IRI by a fixed amount, never below base IRI.
    Improvement { amount: f64 },
}

impl IriEffect {
    pub fn apply(&self, current_iri: f64, base_iri: f64) -> f64 {
        match *self {
            IriEffect::Reset { iri_after } => iri_after
                .filter(|v| *v != 0.0)
                .unwrap_or(base_iri),
            // A zero improvement leaves the surface untouched, floor included.
            IriEffect::Improvement { amount } if amount == 0.0 => current_iri,
            IriEffect::Improvement { amount } => (current_iri - amount).max(base_iri),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Treatment {
    pub name: String,
    pub description: Option<String>,
    pub cost: DistributionParams,       // $/sq yd at `cost_year` prices
    pub cost_year: i32,
    pub co2: DistributionParams,        // kg/sq yd
    pub workzone_days: f64,
    pub delay_hours_per_vehicle: f64,
    pub iri_effect: IriEffect,
    pub iri_progression: DistributionParams, // in/mi per year after application
}

impl Treatment {
    pub fn custom(name: String) -> Self {
        Self {
            name,
            description: Some("Custom treatment".to_string()),
            cost: DistributionParams::new_normal(5.0, 1.0, 3.0, 7.0, 5.0),
            cost_year: 2024,
            co2: DistributionParams::new_normal(3.0, 0.5, 2.0, 4.0, 3.0),
            workzone_days: 2.0,
            delay_hours_per_vehicle: 0.1,
            iri_effect: IriEffect::Improvement { amount: 10.0 },
            iri_progression: DistributionParams::new_normal(5.0, 1.0, 3.0, 7.0, 5.0),
        }
    }

    pub fn validate(&self) -> LccaResult<()> {
        self.cost.validate(&format!("{} cost", self.name))?;
        self.co2.validate(&format!("{} co2", self.name))?;
        self.iri_progression.validate(&format!("{} iri progression", self.name))?;

        let effect_value = match self.iri_effect {
            IriEffect::Reset { iri_after } => iri_after.map(|v| ("iri_after", v)),
            IriEffect::Improvement { amount } => Some(("improvement", amount)),
        };

        for (field, value) in [
            ("workzone_days", self.workzone_days),
            ("delay_hours_per_vehicle", self.delay_hours_per_vehicle),
        ].into_iter().chain(effect_value) {
            if !value.is_finite() || value < 0.0 {
                return Err(LccaError::InvalidParameter {
                    field: format!("{} {}", self.name, field),
                    reason: "must be a finite non-negative number".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct TreatmentLibrary {
    treatments: BTreeMap<String, Treatment>,
}

impl Default for TreatmentLibrary {
    fn default() -> Self {
        Self::built_in()
    }
}

impl TreatmentLibrary {
    pub fn empty() -> Self {
        Self { treatments: BTreeMap::new() }
    }

    pub fn built_in() -> Self {
        let mut library = Self::empty();
        for treatment in built_in_treatments() {
            library.treatments.insert(treatment.name.clone(), treatment);
        }
        library
    }

    pub fn is_built_in(name: &str) -> bool {
        BUILT_IN_TREATMENTS.contains(&name)
    }

    pub fn get(&self, name: &str) -> Option<&Treatment> {
        self.treatments.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.treatments.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.treatments.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Treatment> {
        self.treatments.values()
    }

    pub fn len(&self) -> usize {
        self.treatments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.treatments.is_empty()
    }

    pub fn insert(&mut self, mut treatment: Treatment) -> LccaResult<()> {
        let name = treatment.name.trim().to_string();
        if name.is_empty() {
            return Err(LccaError::EmptyTreatmentName);
        }
        if self.treatments.contains_key(&name) {
            return Err(LccaError::DuplicateTreatment(name));
        }
        treatment.name = name.clone();
        self.treatments.insert(name, treatment);
        Ok(())
    }

    pub fn add_custom(&mut self, name: &str) -> LccaResult<&Treatment> {
        let name = name.trim().to_string();
        self.insert(Treatment::custom(name.clone()))?;
        self.get(&name).ok_or(LccaError::UnknownTreatment(name))
    }

    // Edits a treatment in place. The name is kept as the lookup key.
    pub fn update<F>(&mut self, name: &str, edit: F) -> LccaResult<()>
    where
        F: FnOnce(&mut Treatment),
    {
        let treatment = self.treatments
            .get_mut(name)
            .ok_or_else(|| LccaError::UnknownTreatment(name.to_string()))?;
        edit(treatment);
        treatment.name = name.to_string();
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> LccaResult<Treatment> {
        if Self::is_built_in(name) {
            return Err(LccaError::BuiltInTreatment(name.to_string()));
        }
        self.treatments
            .remove(name)
            .ok_or_else(|| LccaError::UnknownTreatment(name.to_string()))
    }

    pub fn validate(&self) -> LccaResult<()> {
        self.treatments.values().try_for_each(Treatment::validate)
    }
}

fn built_in_treatments() -> Vec<Treatment> {
    let make = |name: &str,
                description: &str,
                cost: DistributionParams,
                co2: DistributionParams,
                workzone_days: f64,
                delay_hours_per_vehicle: f64,
                iri_effect: IriEffect,
                iri_progression: DistributionParams| Treatment {
        name: name.to_string(),
        description: Some(description.to_string()),
        cost,
        cost_year: 2022,
        co2,
        workzone_days,
        delay_hours_per_vehicle,
        iri_effect,
        iri_progression,
    };

    vec![
        make(
            RECONSTRUCTION,
            "Full depth reconstruction",
            DistributionParams::new_normal(45.0, 10.0, 30.0, 60.0, 45.0),
            DistributionParams::new_normal(18.0, 3.0, 12.0, 24.0, 18.0),
            7.0,
            0.25,
            IriEffect::Reset { iri_after: Some(60.0) },
            DistributionParams::new_normal(3.5, 0.5, 2.5, 4.5, 3.5),
        ),
        make(
            MILL_OVERLAY_2IN,
            "2-inch mill and overlay",
            DistributionParams::new_normal(7.05, 2.5, 4.0, 10.0, 7.05),
            DistributionParams::new_normal(5.5, 1.0, 4.0, 7.0, 5.5),
            3.0,
            0.15,
            IriEffect::Reset { iri_after: Some(60.0) },
            DistributionParams::new_uniform(3.0, 5.0, 4.0, 0.75, 4.0),
        ),
        make(
            MILL_OVERLAY_4IN,
            "4-inch mill and overlay",
            DistributionParams::new_normal(12.5, 3.0, 8.0, 17.0, 12.5),
            DistributionParams::new_normal(9.5, 1.5, 7.0, 12.0, 9.5),
            4.0,
            0.20,
            IriEffect::Reset { iri_after: Some(60.0) },
            DistributionParams::new_uniform(3.0, 4.5, 3.8, 0.6, 3.8),
        ),
        make(
            MICROSURFACING,
            "Polymer-modified emulsion treatment",
            DistributionParams::new_uniform(3.0, 4.0, 3.5, 0.5, 3.5),
            DistributionParams::new_normal(2.0, 0.4, 1.2, 2.8, 2.0),
            1.0,
            0.05,
            IriEffect::Improvement { amount: 15.0 },
            DistributionParams::new_uniform(4.0, 6.0, 5.0, 1.0, 5.0),
        ),
        make(
            CHIP_SEAL,
            "Aggregate and emulsion surface",
            DistributionParams::new_uniform(1.5, 2.5, 2.0, 0.5, 2.0),
            DistributionParams::new_normal(1.5, 0.3, 1.0, 2.0, 1.5),
            0.5,
            0.03,
            IriEffect::Improvement { amount: 10.0 },
            DistributionParams::new_uniform(4.0, 7.0, 5.5, 1.0, 5.5),
        ),
        make(
            CRACK_SEALING,
            "Preventive crack maintenance",
            DistributionParams::new_normal(1.25, 0.30, 0.8, 1.7, 1.25),
            DistributionParams::new_normal(0.3, 0.1, 0.1, 0.5, 0.3),
            0.25,
            0.02,
            IriEffect::Improvement { amount: 0.0 },
            DistributionParams::new_normal(6.0, 1.0, 4.0, 8.0, 6.0),
        ),
    ]
}
