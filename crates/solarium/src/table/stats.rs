//! Numeric column summaries.

use serde::{Deserialize, Serialize};

/// Streaming accumulator using Welford's algorithm.
/// Computes mean and variance in a single pass with O(1) memory.
#[derive(Debug, Clone)]
struct StreamingStats {
    count: usize,
    mean: f64,
    m2: f64, // Sum of squared differences from mean
    min: f64,
    max: f64,
}

impl StreamingStats {
    fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    /// Add a value using Welford's online algorithm.
    fn add(&mut self, value: f64) {
        self.count += 1;

        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;

        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    fn mean(&self) -> f64 {
        self.mean
    }

    /// Population variance.
    fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / self.count as f64
        }
    }

    fn std(&self) -> f64 {
        self.variance().sqrt()
    }
}

/// Summary statistics over the non-missing values of a numeric column.
///
/// `std` is the population standard deviation; `median` is exact, not an
/// estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub count: usize,
    pub missing: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
}

impl NumericSummary {
    /// Summarize a set of observed values. `missing` is carried through for
    /// reporting; an empty value set yields an all-zero summary with
    /// `count == 0`.
    pub fn compute(values: &[f64], missing: usize) -> Self {
        if values.is_empty() {
            return Self {
                count: 0,
                missing,
                mean: 0.0,
                std: 0.0,
                min: 0.0,
                max: 0.0,
                median: 0.0,
            };
        }

        let mut stats = StreamingStats::new();
        for &value in values {
            stats.add(value);
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        Self {
            count: values.len(),
            missing,
            mean: stats.mean(),
            std: stats.std(),
            min: stats.min,
            max: stats.max,
            median: median_of_sorted(&sorted),
        }
    }

    /// Z-score of a value against this summary. Returns 0.0 when the
    /// standard deviation is zero (no deviation possible).
    pub fn z_score(&self, value: f64) -> f64 {
        if self.std == 0.0 {
            0.0
        } else {
            (value - self.mean) / self.std
        }
    }

    /// The `[mean - z*std, mean + z*std]` band used for capping.
    pub fn z_band(&self, z: f64) -> (f64, f64) {
        (self.mean - z * self.std, self.mean + z * self.std)
    }
}

/// Exact median of an already-sorted slice. Even lengths average the two
/// middle values.
fn median_of_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    let mid = n / 2;
    if n % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_basic() {
        let summary = NumericSummary::compute(&[1.0, 2.0, 3.0, 4.0, 5.0], 2);
        assert_eq!(summary.count, 5);
        assert_eq!(summary.missing, 2);
        assert!((summary.mean - 3.0).abs() < 1e-10);
        assert!((summary.median - 3.0).abs() < 1e-10);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 5.0);
        // Population std of 1..5 is sqrt(2)
        assert!((summary.std - 2.0_f64.sqrt()).abs() < 1e-10);
    }

    #[test]
    fn test_median_even_length() {
        let summary = NumericSummary::compute(&[4.0, 1.0, 3.0, 2.0], 0);
        assert!((summary.median - 2.5).abs() < 1e-10);
    }

    #[test]
    fn test_empty_summary() {
        let summary = NumericSummary::compute(&[], 3);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.missing, 3);
        assert_eq!(summary.std, 0.0);
    }

    #[test]
    fn test_z_score_zero_std() {
        let summary = NumericSummary::compute(&[7.0, 7.0, 7.0], 0);
        assert_eq!(summary.std, 0.0);
        assert_eq!(summary.z_score(100.0), 0.0);
    }

    #[test]
    fn test_z_band() {
        let summary = NumericSummary::compute(&[1.0, 2.0, 3.0, 4.0, 5.0], 0);
        let (low, high) = summary.z_band(2.0);
        let std = 2.0_f64.sqrt();
        assert!((low - (3.0 - 2.0 * std)).abs() < 1e-10);
        assert!((high - (3.0 + 2.0 * std)).abs() < 1e-10);
    }

    #[test]
    fn test_welford_matches_naive() {
        let values = [10.5, -3.2, 88.0, 0.0, 42.7, 19.1];
        let summary = NumericSummary::compute(&values, 0);
        let mean: f64 = values.iter().sum::<f64>() / values.len() as f64;
        let var: f64 =
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
        assert!((summary.mean - mean).abs() < 1e-9);
        assert!((summary.std - var.sqrt()).abs() < 1e-9);
    }
}
