// src/config/alternative.rs
use serde::{Serialize, Deserialize};
use crate::config::treatment::{MICROSURFACING, MILL_OVERLAY_2IN};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Activity {
    pub year: u32,
    pub treatment: String,
}

impl Activity {
    pub fn new(year: u32, treatment: impl Into<String>) -> Self {
        Self { year, treatment: treatment.into() }
    }
}

// A maintenance strategy. Activities are unordered; two activities in the
// same year are allowed and the first one listed wins.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Alternative {
    pub name: String,
    pub schedule: Vec<Activity>,
}

impl Alternative {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schedule: Vec::new(),
        }
    }

    // A..Z, then AA, AB, ... like spreadsheet columns
    pub fn default_name(index: usize) -> String {
        let mut letters = Vec::new();
        let mut n = index + 1;
        while n > 0 {
            n -= 1;
            letters.push((b'A' + (n % 26) as u8) as char);
            n /= 26;
        }
        let suffix: String = letters.into_iter().rev().collect();
        format!("Alternative {}", suffix)
    }

    pub fn with_activity(mut self, year: u32, treatment: impl Into<String>) -> Self {
        self.schedule.push(Activity::new(year, treatment));
        self
    }

    pub fn activity_at(&self, year: u32) -> Option<&Activity> {
        self.schedule.iter().find(|a| a.year == year)
    }

    pub fn sorted_schedule(&self) -> Vec<&Activity> {
        let mut sorted: Vec<&Activity> = self.schedule.iter().collect();
        sorted.sort_by_key(|a| a.year);
        sorted
    }

    pub fn duplicate_years(&self) -> Vec<u32> {
        let sorted = self.sorted_schedule();
        let mut years: Vec<u32> = sorted
            .windows(2)
            .filter(|w| w[0].year == w[1].year)
            .map(|w| w[0].year)
            .collect();
        years.dedup();
        years
    }

    // Year offered for a newly added activity: ten years after the last one.
    pub fn next_activity_year(&self, analysis_period: u32) -> u32 {
        let last = self.schedule.iter().map(|a| a.year).max().unwrap_or(0);
        last.saturating_add(10).min(analysis_period)
    }
}

pub fn default_alternatives() -> Vec<Alternative> {
    vec![
        Alternative::new(Alternative::default_name(0))
            .with_activity(10, MILL_OVERLAY_2IN)
            .with_activity(20, MILL_OVERLAY_2IN)
            .with_activity(30, MILL_OVERLAY_2IN),
        Alternative::new(Alternative::default_name(1))
            .with_activity(5, MICROSURFACING)
            .with_activity(10, MICROSURFACING)
            .with_activity(15, MICROSURFACING)
            .with_activity(20, MILL_OVERLAY_2IN)
            .with_activity(25, MICROSURFACING)
            .with_activity(30, MICROSURFACING)
            .with_activity(35, MICROSURFACING),
    ]
}
