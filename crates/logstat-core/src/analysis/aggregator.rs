use crate::log::LogRecord;
use crate::{Error, Result};
use std::collections::HashMap;

/// Running statistics for one url within a single run.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlStats {
    url: String,
    total_duration: f64,
    samples: Vec<f64>,
    count: u64,
}

impl UrlStats {
    pub fn new(url: impl Into<String>, duration: f64) -> Self {
        Self {
            url: url.into(),
            total_duration: duration,
            samples: vec![duration],
            count: 1,
        }
    }

    pub fn record(&mut self, duration: f64) {
        self.samples.push(duration);
        self.total_duration += duration;
        self.count += 1;
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Observed durations; ascending once the owning run has been finalized
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    fn sort_samples(&mut self) {
        self.samples.sort_by(f64::total_cmp);
    }
}

/// Denominators for the percentage metrics of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunTotals {
    pub grand_total_duration: f64,
    pub grand_total_count: u64,
}

/// Result of a finalized run: per-url statistics plus the run's own totals.
#[derive(Debug, Clone)]
pub struct AggregatedRun {
    pub stats: HashMap<String, UrlStats>,
    pub totals: RunTotals,
}

/// Accumulates [`LogRecord`]s for exactly one run.
///
/// Every aggregator owns its totals, so concurrent runs never see each
/// other's counts.
#[derive(Debug, Default)]
pub struct UrlAggregator {
    stats: HashMap<String, UrlStats>,
    totals: RunTotals,
}

impl UrlAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, record: LogRecord) {
        let LogRecord { url, duration } = record;

        match self.stats.get_mut(&url) {
            Some(stats) => stats.record(duration),
            None => {
                let stats = UrlStats::new(url.clone(), duration);
                self.stats.insert(url, stats);
            }
        }

        self.totals.grand_total_duration += duration;
        self.totals.grand_total_count += 1;
    }

    pub fn totals(&self) -> RunTotals {
        self.totals
    }

    pub fn distinct_urls(&self) -> usize {
        self.stats.len()
    }

    /// Close the run. Samples are sorted here, once, for the median.
    pub fn finalize(self) -> Result<AggregatedRun> {
        if self.totals.grand_total_count == 0 {
            return Err(Error::EmptyRun);
        }

        let mut stats = self.stats;
        for url_stats in stats.values_mut() {
            url_stats.sort_samples();
        }

        tracing::debug!(
            "Finalized run: {} urls, {} records, {:.3}s total",
            stats.len(),
            self.totals.grand_total_count,
            self.totals.grand_total_duration
        );

        Ok(AggregatedRun {
            stats,
            totals: self.totals,
        })
    }
}
