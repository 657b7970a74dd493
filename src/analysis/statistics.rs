// src/analysis/statistics.rs

use serde::{Serialize, Deserialize};
use statrs::statistics::Statistics;
use crate::error::{LccaError, LccaResult};

pub const DEFAULT_HISTOGRAM_BINS: usize = 25;
pub const DEFAULT_CDF_STRIDE: usize = 20;

/// Distribution summary of one Monte Carlo output.
///
/// `p5`/`p95` are nearest-rank picks at sorted index `floor(N * p)` with no
/// interpolation, so for N below 20 they sit at or next to the extremes.
/// `cov` is the standard error of the mean relative to the mean, a
/// convergence check rather than a classical coefficient of variation; it
/// is non-finite when the mean is zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SummaryStatistics {
    pub mean: f64,
    pub std_dev: f64,   // population (divisor N)
    pub p5: f64,
    pub p95: f64,
    pub cov: f64,
    pub samples: Vec<f64>,
}

impl SummaryStatistics {
    pub fn from_samples(samples: Vec<f64>) -> LccaResult<Self> {
        if samples.is_empty() {
            return Err(LccaError::EmptySamples);
        }

        let n = samples.len() as f64;
        let mean = samples.iter().mean();
        let std_dev = samples.iter().population_std_dev();

        let mut sorted = samples.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        Ok(Self {
            mean,
            std_dev,
            p5: nearest_rank(&sorted, 0.05),
            p95: nearest_rank(&sorted, 0.95),
            cov: (std_dev / n.sqrt()) / mean,
            samples,
        })
    }

    pub fn histogram(&self, bins: usize) -> Vec<HistogramBin> {
        histogram(&self.samples, bins)
    }

    pub fn cdf(&self) -> Vec<CdfPoint> {
        cdf_points(&self.samples, DEFAULT_CDF_STRIDE)
    }
}

pub fn nearest_rank(sorted: &[f64], fraction: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let index = (sorted.len() as f64 * fraction).floor() as usize;
    sorted[index.min(sorted.len() - 1)]
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct HistogramBin {
    pub x: f64,         // bin centre
    pub density: f64,   // share of samples in the bin
}

/// Equal-width bins over `[min, max]`; densities sum to 1. Width falls back
/// to 1 when every sample is equal, and the top bin takes the maximum.
pub fn histogram(samples: &[f64], bins: usize) -> Vec<HistogramBin> {
    if samples.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let raw_width = (max - min) / bins as f64;
    let bin_width = if raw_width == 0.0 || raw_width.is_nan() { 1.0 } else { raw_width };

    let mut counts = vec![0usize; bins];
    for value in samples {
        let index = ((value - min) / bin_width).floor() as usize;
        counts[index.min(bins - 1)] += 1;
    }

    let total = samples.len() as f64;
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            x: min + (i as f64 + 0.5) * bin_width,
            density: count as f64 / total,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CdfPoint {
    pub x: f64,
    pub probability: f64,
}

pub fn cdf_points(samples: &[f64], stride: usize) -> Vec<CdfPoint> {
    if samples.is_empty() {
        return Vec::new();
    }
    let stride = stride.max(1);
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = sorted.len() as f64;
    sorted
        .iter()
        .step_by(stride)
        .enumerate()
        .map(|(i, &x)| CdfPoint {
            x,
            probability: ((i * stride) as f64 + 1.0) / n,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_of_one_to_five() {
        let stats = SummaryStatistics::from_samples(vec![5.0, 3.0, 1.0, 4.0, 2.0]).unwrap();
        assert!((stats.mean - 3.0).abs() < 1e-12);
        assert!((stats.std_dev - 2.0f64.sqrt()).abs() < 1e-12);
        assert_eq!(stats.p5, 1.0);   // index 0
        assert_eq!(stats.p95, 5.0);  // index 4
        assert!((stats.cov - (2.0f64.sqrt() / 5.0f64.sqrt()) / 3.0).abs() < 1e-12);
        // samples keep their input order
        assert_eq!(stats.samples, vec![5.0, 3.0, 1.0, 4.0, 2.0]);
    }

    #[test]
    fn test_nearest_rank_indices() {
        let sorted: Vec<f64> = (0..100).map(|i| i as f64).collect();
        assert_eq!(nearest_rank(&sorted, 0.05), 5.0);
        assert_eq!(nearest_rank(&sorted, 0.95), 95.0);
        assert_eq!(nearest_rank(&[7.0], 0.95), 7.0);
    }

    #[test]
    fn test_single_sample_and_zero_mean() {
        let single = SummaryStatistics::from_samples(vec![2.5]).unwrap();
        assert_eq!(single.std_dev, 0.0);
        assert_eq!(single.p5, 2.5);
        assert_eq!(single.p95, 2.5);
        assert_eq!(single.cov, 0.0);

        let zero = SummaryStatistics::from_samples(vec![0.0, 0.0]).unwrap();
        assert!(!zero.cov.is_finite());
    }

    #[test]
    fn test_empty_samples_rejected() {
        assert_eq!(SummaryStatistics::from_samples(Vec::new()), Err(LccaError::EmptySamples));
    }

    #[test]
    fn test_histogram_densities_sum_to_one() {
        let samples: Vec<f64> = (0..1000).map(|i| ((i * 37) % 101) as f64 * 0.3).collect();
        let bins = histogram(&samples, DEFAULT_HISTOGRAM_BINS);
        assert_eq!(bins.len(), 25);
        let total: f64 = bins.iter().map(|b| b.density).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_histogram_top_bin_holds_max() {
        let bins = histogram(&[0.0, 1.0, 2.0, 10.0], 5);
        assert_eq!(bins[4].density, 0.25);
        assert_eq!(bins[0].density, 0.5);
        assert!((bins[0].x - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_histogram_of_equal_samples_uses_unit_width() {
        let bins = histogram(&[3.0, 3.0, 3.0], 25);
        assert_eq!(bins[0].density, 1.0);
        assert_eq!(bins[0].x, 3.5);
        assert_eq!(bins[1].x, 4.5);
    }

    #[test]
    fn test_cdf_points() {
        let samples: Vec<f64> = (0..100).rev().map(|i| i as f64).collect();
        let cdf = cdf_points(&samples, 20);
        assert_eq!(cdf.len(), 5);
        assert_eq!(cdf[0], CdfPoint { x: 0.0, probability: 0.01 });
        assert_eq!(cdf[1], CdfPoint { x: 20.0, probability: 0.21 });
        assert_eq!(cdf[4].x, 80.0);
    }
}
