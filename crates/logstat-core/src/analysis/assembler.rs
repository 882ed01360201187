use super::{AggregatedRun, MetricCalculator, RunTotals, UrlStats};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// One url's statistics, formatted for display.
///
/// Percentages and timings are fixed-precision strings; `time_sum` stays a raw
/// number so rows can be ranked on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub url: String,
    pub count: u64,
    pub count_percent: String,
    pub time_avg: String,
    pub time_max: String,
    pub time_med: String,
    pub time_sum: f64,
    pub time_percent: String,
}

pub struct ReportAssembler;

impl ReportAssembler {
    /// Build report rows for every url, slowest (largest `time_sum`) first
    pub fn assemble(run: &AggregatedRun) -> Result<Vec<ReportRow>> {
        tracing::debug!("Assembling report rows for {} urls", run.stats.len());

        if run.stats.is_empty() {
            return Err(Error::EmptyReport);
        }

        let mut rows = run
            .stats
            .values()
            .map(|stats| Self::row(stats, &run.totals))
            .collect::<Result<Vec<_>>>()?;

        rows.sort_unstable_by(|a, b| b.time_sum.total_cmp(&a.time_sum));

        Ok(rows)
    }

    fn row(stats: &UrlStats, totals: &RunTotals) -> Result<ReportRow> {
        let average = MetricCalculator::average(stats);
        let median = MetricCalculator::median(stats.samples());
        let max = MetricCalculator::max(stats.samples());
        let count_percent = MetricCalculator::count_percent(stats, totals)?;

        // A run where every request took 0.000s has no time to share out.
        let time_percent = match MetricCalculator::time_percent(stats, totals) {
            Err(Error::PercentageUndefined) if totals.grand_total_count > 0 => 0.0,
            other => other?,
        };

        Ok(ReportRow {
            url: stats.url().to_string(),
            count: stats.count(),
            count_percent: format!("{:.5}", count_percent),
            time_avg: format!("{:.3}", average),
            time_max: format!("{:.3}", max),
            time_med: format!("{:.3}", median),
            time_sum: stats.total_duration(),
            time_percent: format!("{:.4}", time_percent),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::UrlAggregator;
    use crate::log::LogRecord;
    use std::collections::HashMap;

    fn run_of(records: &[(&str, f64)]) -> AggregatedRun {
        let mut aggregator = UrlAggregator::new();
        for (url, duration) in records {
            aggregator.observe(LogRecord {
                url: url.to_string(),
                duration: *duration,
            });
        }
        aggregator.finalize().unwrap()
    }

    #[test]
    fn test_banner_scenario() {
        let run = run_of(&[
            ("/api/v2/banner/1", 0.390),
            ("/api/v2/banner/1", 0.210),
            ("/api/v2/banner/2", 0.100),
        ]);

        let rows = ReportAssembler::assemble(&run).unwrap();
        assert_eq!(rows.len(), 2);

        let first = &rows[0];
        assert_eq!(first.url, "/api/v2/banner/1");
        assert_eq!(first.count, 2);
        assert!((first.time_sum - 0.6).abs() < 1e-9);
        assert_eq!(first.time_avg, "0.300");
        assert_eq!(first.time_med, "0.300");
        assert_eq!(first.time_max, "0.390");
        assert_eq!(first.time_percent, "85.7143");
        assert_eq!(first.count_percent, "66.66667");

        let second = &rows[1];
        assert_eq!(second.url, "/api/v2/banner/2");
        assert_eq!(second.count, 1);
        assert_eq!(second.time_percent, "14.2857");
        assert_eq!(second.count_percent, "33.33333");
    }

    #[test]
    fn test_rows_sorted_by_time_sum_descending() {
        let run = run_of(&[
            ("/a", 0.5),
            ("/b", 2.0),
            ("/c", 0.1),
            ("/a", 0.25),
            ("/d", 1.0),
            ("/c", 3.0),
        ]);

        let rows = ReportAssembler::assemble(&run).unwrap();
        for pair in rows.windows(2) {
            assert!(pair[0].time_sum >= pair[1].time_sum);
        }
        assert_eq!(rows[0].url, "/c");
    }

    #[test]
    fn test_percentages_close_to_hundred() {
        let run = run_of(&[
            ("/a", 0.123),
            ("/b", 0.456),
            ("/c", 0.789),
            ("/a", 0.001),
            ("/d", 0.333),
            ("/e", 0.010),
            ("/b", 0.020),
        ]);

        let rows = ReportAssembler::assemble(&run).unwrap();
        let count_total: f64 = rows
            .iter()
            .map(|r| r.count_percent.parse::<f64>().unwrap())
            .sum();
        let time_total: f64 = rows
            .iter()
            .map(|r| r.time_percent.parse::<f64>().unwrap())
            .sum();
        assert!((count_total - 100.0).abs() < 1e-3);
        assert!((time_total - 100.0).abs() < 1e-2);
    }

    #[test]
    fn test_zero_duration_run_reports_zero_time_share() {
        let run = run_of(&[("/a", 0.0), ("/b", 0.0)]);

        let rows = ReportAssembler::assemble(&run).unwrap();
        assert!(rows.iter().all(|r| r.time_percent == "0.0000"));
        assert!(rows.iter().all(|r| r.count_percent == "50.00000"));
    }

    #[test]
    fn test_empty_input_fails() {
        let run = AggregatedRun {
            stats: HashMap::new(),
            totals: RunTotals::default(),
        };
        assert!(matches!(
            ReportAssembler::assemble(&run),
            Err(Error::EmptyReport)
        ));
    }

    #[test]
    fn test_row_serializes_with_report_field_names() {
        let run = run_of(&[("/a", 1.0)]);
        let rows = ReportAssembler::assemble(&run).unwrap();

        let json = serde_json::to_value(&rows[0]).unwrap();
        for field in [
            "url",
            "count",
            "count_percent",
            "time_avg",
            "time_max",
            "time_med",
            "time_sum",
            "time_percent",
        ] {
            assert!(json.get(field).is_some(), "missing field {}", field);
        }
        assert_eq!(json["time_percent"], "100.0000");
    }
}
