use super::{RunTotals, UrlStats};
use crate::{Error, Result};

/// Full-precision derived metrics for one url.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UrlMetrics {
    pub average: f64,
    pub median: f64,
    pub max: f64,
    pub time_percent: f64,
    pub count_percent: f64,
}

/// Pure metric functions over a url's statistics and its run's totals.
pub struct MetricCalculator;

impl MetricCalculator {
    pub fn compute(stats: &UrlStats, totals: &RunTotals) -> Result<UrlMetrics> {
        Ok(UrlMetrics {
            average: Self::average(stats),
            median: Self::median(stats.samples()),
            max: Self::max(stats.samples()),
            time_percent: Self::time_percent(stats, totals)?,
            count_percent: Self::count_percent(stats, totals)?,
        })
    }

    pub fn average(stats: &UrlStats) -> f64 {
        if stats.count() == 0 {
            return 0.0;
        }
        stats.total_duration() / stats.count() as f64
    }

    /// Median of `samples`. Sorted input is used as is; anything else is
    /// sorted into a copy first.
    pub fn median(samples: &[f64]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }

        let sorted;
        let samples = if samples.is_sorted_by(|a, b| a <= b) {
            samples
        } else {
            let mut copy = samples.to_vec();
            copy.sort_by(f64::total_cmp);
            sorted = copy;
            &sorted[..]
        };

        let mid = samples.len() / 2;
        if samples.len().is_multiple_of(2) {
            (samples[mid - 1] + samples[mid]) / 2.0
        } else {
            samples[mid]
        }
    }

    pub fn max(samples: &[f64]) -> f64 {
        samples.iter().copied().fold(0.0, f64::max)
    }

    /// Share of the run's total request time spent on this url, in percent
    pub fn time_percent(stats: &UrlStats, totals: &RunTotals) -> Result<f64> {
        if totals.grand_total_duration == 0.0 {
            return Err(Error::PercentageUndefined);
        }
        Ok(stats.total_duration() / totals.grand_total_duration * 100.0)
    }

    /// Share of the run's requests that hit this url, in percent
    pub fn count_percent(stats: &UrlStats, totals: &RunTotals) -> Result<f64> {
        if totals.grand_total_count == 0 {
            return Err(Error::PercentageUndefined);
        }
        Ok(stats.count() as f64 / totals.grand_total_count as f64 * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats_from(url: &str, samples: &[f64]) -> UrlStats {
        let mut stats = UrlStats::new(url, samples[0]);
        for &sample in &samples[1..] {
            stats.record(sample);
        }
        stats
    }

    #[test]
    fn test_median_odd_length() {
        assert_eq!(MetricCalculator::median(&[0.1, 0.2, 0.3]), 0.2);
    }

    #[test]
    fn test_median_even_length() {
        let median = MetricCalculator::median(&[0.1, 0.2, 0.3, 0.4]);
        assert!((median - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_median_unsorted_input() {
        assert_eq!(MetricCalculator::median(&[0.3, 0.1, 0.2]), 0.2);
        assert_eq!(MetricCalculator::median(&[5.0]), 5.0);
    }

    #[test]
    fn test_average_and_max() {
        let stats = stats_from("/a", &[0.39, 0.21]);
        assert!((MetricCalculator::average(&stats) - 0.3).abs() < 1e-12);
        assert_eq!(MetricCalculator::max(stats.samples()), 0.39);
    }

    #[test]
    fn test_percentages() {
        let stats = stats_from("/a", &[0.39, 0.21]);
        let totals = RunTotals {
            grand_total_duration: 0.7,
            grand_total_count: 3,
        };

        let metrics = MetricCalculator::compute(&stats, &totals).unwrap();
        assert!((metrics.time_percent - 85.714_285).abs() < 1e-4);
        assert!((metrics.count_percent - 66.666_666).abs() < 1e-4);
    }

    #[test]
    fn test_percentages_undefined_for_zero_totals() {
        let stats = stats_from("/a", &[0.0]);
        let totals = RunTotals::default();

        assert!(matches!(
            MetricCalculator::time_percent(&stats, &totals),
            Err(Error::PercentageUndefined)
        ));
        assert!(matches!(
            MetricCalculator::count_percent(&stats, &totals),
            Err(Error::PercentageUndefined)
        ));
        assert!(MetricCalculator::compute(&stats, &totals).is_err());
    }
}
