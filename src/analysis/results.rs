// src/analysis/results.rs

use serde::{Serialize, Deserialize};
use crate::analysis::breakdown::BreakdownTotals;
use crate::analysis::deterministic::DeterministicResult;
use crate::analysis::monte_carlo::ProbabilisticResult;
use crate::analysis::statistics::SummaryStatistics;

const DOLLARS_PER_MILLION: f64 = 1e6;

// The six headline outputs of one pass. Costs in $M (discounted), CO2 in
// tonnes.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct ImpactSummary {
    pub agency_cost: f64,
    pub user_cost: f64,
    pub total_cost: f64,
    pub agency_co2: f64,
    pub user_co2: f64,
    pub total_co2: f64,
}

impl ImpactSummary {
    pub fn from_totals(totals: &BreakdownTotals) -> Self {
        Self {
            agency_cost: totals.treatment_cost / DOLLARS_PER_MILLION,
            user_cost: (totals.workzone_cost + totals.fuel_cost) / DOLLARS_PER_MILLION,
            total_cost: totals.total_cost / DOLLARS_PER_MILLION,
            agency_co2: totals.treatment_co2,
            user_co2: totals.workzone_co2 + totals.fuel_co2,
            total_co2: totals.total_co2,
        }
    }

    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::AgencyCost => self.agency_cost,
            Metric::UserCost => self.user_cost,
            Metric::TotalCost => self.total_cost,
            Metric::AgencyCo2 => self.agency_co2,
            Metric::UserCo2 => self.user_co2,
            Metric::TotalCo2 => self.total_co2,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct SourceBreakdown {
    pub treatment: f64,
    pub workzone: f64,
    pub excess_fuel: f64,
}

impl SourceBreakdown {
    pub fn cost(totals: &BreakdownTotals) -> Self {
        Self {
            treatment: totals.treatment_cost / DOLLARS_PER_MILLION,
            workzone: totals.workzone_cost / DOLLARS_PER_MILLION,
            excess_fuel: totals.fuel_cost / DOLLARS_PER_MILLION,
        }
    }

    pub fn co2(totals: &BreakdownTotals) -> Self {
        Self {
            treatment: totals.treatment_co2,
            workzone: totals.workzone_co2,
            excess_fuel: totals.fuel_co2,
        }
    }

    pub fn total(&self) -> f64 {
        self.treatment + self.workzone + self.excess_fuel
    }

    pub fn slices(&self) -> [(&'static str, f64); 3] {
        [
            ("Treatment", self.treatment),
            ("Work Zone", self.workzone),
            ("Excess Fuel", self.excess_fuel),
        ]
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Metric {
    AgencyCost,
    UserCost,
    TotalCost,
    AgencyCo2,
    UserCo2,
    TotalCo2,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::AgencyCost,
        Metric::UserCost,
        Metric::TotalCost,
        Metric::AgencyCo2,
        Metric::UserCo2,
        Metric::TotalCo2,
    ];

    pub fn unit(&self) -> &'static str {
        match self {
            Metric::AgencyCost | Metric::UserCost | Metric::TotalCost => "Million $",
            Metric::AgencyCo2 | Metric::UserCo2 | Metric::TotalCo2 => "Tonnes CO2e",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResults {
    pub run_id: String,
    pub timestamp: String,
    pub price_index_clamped: bool,
    pub deterministic: Vec<DeterministicResult>,
    pub probabilistic: Vec<ProbabilisticResult>,
}

impl RunResults {
    pub fn deterministic_for(&self, alternative: &str) -> Option<&DeterministicResult> {
        self.deterministic.iter().find(|r| r.alternative == alternative)
    }

    pub fn probabilistic_for(&self, alternative: &str) -> Option<&ProbabilisticResult> {
        self.probabilistic.iter().find(|r| r.alternative == alternative)
    }

    pub fn lowest_deterministic(&self, metric: Metric) -> Option<&DeterministicResult> {
        self.deterministic.iter().min_by(|a, b| {
            a.impacts.get(metric)
                .partial_cmp(&b.impacts.get(metric))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }

    pub fn lowest_probabilistic(&self, metric: Metric) -> Option<&ProbabilisticResult> {
        self.probabilistic.iter().min_by(|a, b| {
            a.stats(metric).mean
                .partial_cmp(&b.stats(metric).mean)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }
}

impl ProbabilisticResult {
    pub fn stats(&self, metric: Metric) -> &SummaryStatistics {
        match metric {
            Metric::AgencyCost => &self.agency_cost,
            Metric::UserCost => &self.user_cost,
            Metric::TotalCost => &self.total_cost,
            Metric::AgencyCo2 => &self.agency_co2,
            Metric::UserCo2 => &self.user_co2,
            Metric::TotalCo2 => &self.total_co2,
        }
    }
}
