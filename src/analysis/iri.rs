// src/analysis/iri.rs

use serde::{Serialize, Deserialize};
use crate::analysis::distribution::{PointEstimate, ValueSource};
use crate::config::{Alternative, GlobalParameters, TreatmentLibrary};

// Roughness growth (in/mi per year) before any treatment has been applied.
pub const DEFAULT_PROGRESSION_RATE: f64 = 4.0;

// Offset of the pre-treatment chart point from the treatment year.
pub const PRE_TREATMENT_OFFSET: f64 = 0.001;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct IriPoint {
    pub year: f64,
    pub iri: f64,
}

fn simulate<S: ValueSource>(
    alternative: &Alternative,
    params: &GlobalParameters,
    library: &TreatmentLibrary,
    source: &mut S,
    mark_drops: bool,
) -> Vec<IriPoint> {
    let period = params.analysis_period;
    let mut points = Vec::with_capacity(period as usize + 1);
    let mut current_iri = params.initial_iri;
    let mut progression_rate = DEFAULT_PROGRESSION_RATE;

    for year in 0..=period {
        let treatment = alternative
            .activity_at(year)
            .and_then(|activity| library.get(&activity.treatment));

        if let Some(treatment) = treatment {
            if mark_drops {
                points.push(IriPoint {
                    year: year as f64 - PRE_TREATMENT_OFFSET,
                    iri: current_iri,
                });
            }
            current_iri = treatment.iri_effect.apply(current_iri, params.base_iri);
            progression_rate = source.value(&treatment.iri_progression);
        }

        points.push(IriPoint { year: year as f64, iri: current_iri });

        if year < period {
            current_iri += progression_rate;
        }
    }

    points
}

/// IRI for every year `0..=analysis_period`; index `y` holds year `y`.
pub fn iri_progression<S: ValueSource>(
    alternative: &Alternative,
    params: &GlobalParameters,
    library: &TreatmentLibrary,
    source: &mut S,
) -> Vec<f64> {
    simulate(alternative, params, library, source, false)
        .into_iter()
        .map(|p| p.iri)
        .collect()
}

/// Same walk as [`iri_progression`], with an extra point just before each
/// treatment year carrying the pre-treatment IRI so charts show a drop.
pub fn iri_chart_points<S: ValueSource>(
    alternative: &Alternative,
    params: &GlobalParameters,
    library: &TreatmentLibrary,
    source: &mut S,
) -> Vec<IriPoint> {
    simulate(alternative, params, library, source, true)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IriChartRow {
    pub year: f64,
    pub values: Vec<Option<f64>>,   // one per alternative, in chart order
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IriChart {
    pub alternatives: Vec<String>,
    pub rows: Vec<IriChartRow>,
}

impl IriChart {
    pub fn merge(series: Vec<(String, Vec<IriPoint>)>) -> Self {
        let mut years: Vec<f64> = series
            .iter()
            .flat_map(|(_, points)| points.iter().map(|p| p.year))
            .collect();
        years.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        years.dedup();

        let rows = years
            .into_iter()
            .map(|year| IriChartRow {
                year,
                values: series
                    .iter()
                    .map(|(_, points)| Self::value_at(points, year))
                    .collect(),
            })
            .collect();

        Self {
            alternatives: series.into_iter().map(|(name, _)| name).collect(),
            rows,
        }
    }

    pub fn for_alternatives(
        alternatives: &[Alternative],
        params: &GlobalParameters,
        library: &TreatmentLibrary,
    ) -> Self {
        Self::merge(
            alternatives
                .iter()
                .map(|alt| {
                    let points = iri_chart_points(alt, params, library, &mut PointEstimate);
                    (alt.name.clone(), points)
                })
                .collect(),
        )
    }

    fn value_at(points: &[IriPoint], year: f64) -> Option<f64> {
        if let Some(exact) = points.iter().find(|p| p.year == year) {
            return Some(exact.iri);
        }
        let before = points.iter().filter(|p| p.year < year).last()?;
        let after = points.iter().find(|p| p.year > year)?;
        let ratio = (year - before.year) / (after.year - before.year);
        Some(before.iri + ratio * (after.iri - before.iri))
    }
}
