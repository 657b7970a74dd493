// src/analysis/distribution.rs

use serde::{Serialize, Deserialize};
use std::f64::consts::PI;
use std::fmt;
use rand::Rng;
use rand_distr::{Distribution, Open01, Standard};
use crate::error::{LccaError, LccaResult};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DistributionType {
    Normal,
    Uniform,
}

impl Default for DistributionType {
    fn default() -> Self {
        DistributionType::Normal
    }
}

/// An uncertain input. All descriptive fields are kept whatever the active
/// kind is, so switching between Normal and Uniform loses nothing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DistributionParams {
    pub dist_type: DistributionType,
    pub mean: f64,
    pub std_dev: f64,           // Used for Normal
    pub min: f64,               // Used for Uniform
    pub max: f64,               // Used for Uniform
    pub deterministic: f64,     // Point estimate for deterministic runs
}

impl DistributionParams {
    pub fn new_normal(mean: f64, std_dev: f64, min: f64, max: f64, deterministic: f64) -> Self {
        Self {
            dist_type: DistributionType::Normal,
            mean,
            std_dev,
            min,
            max,
            deterministic,
        }
    }

    pub fn new_uniform(min: f64, max: f64, mean: f64, std_dev: f64, deterministic: f64) -> Self {
        Self {
            dist_type: DistributionType::Uniform,
            mean,
            std_dev,
            min,
            max,
            deterministic,
        }
    }

    pub fn fixed(value: f64) -> Self {
        Self::new_normal(value, 0.0, value, value, value)
    }

    pub fn with_dist_type(mut self, dist_type: DistributionType) -> Self {
        self.dist_type = dist_type;
        self
    }

    /// Draws one value. Normal uses the Box-Muller transform on two open
    /// (0,1) uniforms and is not truncated to `[min, max]`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self.dist_type {
            DistributionType::Uniform => {
                let u: f64 = Standard.sample(rng);
                self.min + u * (self.max - self.min)
            },
            DistributionType::Normal => {
                let u1: f64 = Open01.sample(rng);
                let u2: f64 = Open01.sample(rng);
                self.mean + self.std_dev * (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
            },
        }
    }

    pub fn validate(&self, field: &str) -> LccaResult<()> {
        let invalid = |reason: &str| LccaError::InvalidDistribution {
            field: field.to_string(),
            reason: reason.to_string(),
        };

        if !self.deterministic.is_finite() {
            return Err(invalid("deterministic value is not finite"));
        }

        match self.dist_type {
            DistributionType::Normal => {
                if !self.mean.is_finite() || !self.std_dev.is_finite() {
                    return Err(invalid("mean and standard deviation must be finite"));
                }
                if self.std_dev < 0.0 {
                    return Err(invalid("standard deviation must not be negative"));
                }
            },
            DistributionType::Uniform => {
                if !self.min.is_finite() || !self.max.is_finite() {
                    return Err(invalid("bounds must be finite"));
                }
                if self.min > self.max {
                    return Err(invalid("min must not exceed max"));
                }
            },
        }
        Ok(())
    }
}

impl fmt::Display for DistributionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.dist_type {
            DistributionType::Normal => write!(f, "N({}, {})", self.mean, self.std_dev),
            DistributionType::Uniform => write!(f, "U({}, {})", self.min, self.max),
        }
    }
}

/// Where uncertain inputs get their value during one pass of the model.
pub trait ValueSource {
    fn value(&mut self, params: &DistributionParams) -> f64;
}

// Uses every input's deterministic point estimate; never touches an RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointEstimate;

impl ValueSource for PointEstimate {
    fn value(&mut self, params: &DistributionParams) -> f64 {
        params.deterministic
    }
}

pub struct RandomDraw<'a, R: Rng + ?Sized> {
    rng: &'a mut R,
}

impl<'a, R: Rng + ?Sized> RandomDraw<'a, R> {
    pub fn new(rng: &'a mut R) -> Self {
        Self { rng }
    }
}

impl<'a, R: Rng + ?Sized> ValueSource for RandomDraw<'a, R> {
    fn value(&mut self, params: &DistributionParams) -> f64 {
        params.sample(self.rng)
    }
}
