// src/config/scenario.rs
use anyhow::{Result, Context};
use serde::{Serialize, Deserialize};
use std::fs;
use std::path::Path;

use super::alternative::{default_alternatives, Alternative};
use super::parameters::GlobalParameters;
use super::treatment::TreatmentLibrary;
use crate::error::LccaResult;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    #[serde(default)]
    pub treatments: TreatmentLibrary,
    #[serde(default)]
    pub alternatives: Vec<Alternative>,
    #[serde(default)]
    pub parameters: GlobalParameters,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            treatments: TreatmentLibrary::built_in(),
            alternatives: default_alternatives(),
            parameters: GlobalParameters::default(),
        }
    }
}

impl Scenario {
    pub fn from_ron_str(content: &str) -> Result<Self> {
        ron::from_str(content).context("Failed to parse scenario")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario file: {}", path.display()))?;
        Self::from_ron_str(&content)
            .with_context(|| format!("Failed to parse scenario file: {}", path.display()))
    }

    pub fn validate(&self) -> LccaResult<()> {
        self.parameters.validate()?;
        self.treatments.validate()
    }
}
