use crate::analysis::{AggregatedRun, ReportAssembler, ReportRow, UrlAggregator};
use crate::log::{LogSource, RecordExtractor};
use crate::report::{ReportTemplate, ReportWriter};
use crate::{Error, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Settings shared by every run of one orchestrator.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory that receives `report<run-id>.html` files (default `./logs_save`)
    pub output_dir: PathBuf,
    /// HTML shell for reports (default: the built-in template)
    pub template: ReportTemplate,
    /// Abort a run once its source has more lines than this (default: no limit)
    pub max_lines: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("logs_save"),
            template: ReportTemplate::builtin(),
            max_lines: None,
        }
    }
}

/// A source that has been streamed through the extractor and aggregator.
#[derive(Debug, Clone)]
pub struct ParsedRun {
    pub source: PathBuf,
    pub aggregated: AggregatedRun,
    pub lines_read: usize,
    pub failures: usize,
    pub elapsed: Duration,
}

/// What one completed run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: usize,
    pub source: PathBuf,
    pub report_path: PathBuf,
    pub rows: Vec<ReportRow>,
    pub lines_read: usize,
    pub records: u64,
    pub failures: usize,
    pub parse_elapsed: Duration,
    pub report_elapsed: Duration,
}

/// Outcome of one input in a fan-out; a failure here never affects siblings.
#[derive(Debug)]
pub struct RunOutcome {
    pub source: PathBuf,
    pub result: Result<RunSummary>,
}

pub struct PipelineOrchestrator {
    config: PipelineConfig,
    writer: ReportWriter,
}

impl PipelineOrchestrator {
    pub fn new(config: PipelineConfig) -> Self {
        let writer = ReportWriter::new(config.output_dir.clone(), config.template.clone());
        Self { config, writer }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Stream one source through a fresh aggregator.
    ///
    /// Unparseable lines are logged at warn level and skipped.
    pub fn parse(&self, path: &Path) -> Result<ParsedRun> {
        tracing::debug!("Parsing log source: {}", path.display());
        let start = Instant::now();

        let source = LogSource::open(path)?;
        let mut aggregator = UrlAggregator::new();
        let mut lines_read = 0;
        let mut failures = 0;

        for (idx, line) in source.lines().enumerate() {
            let line = line?;
            lines_read += 1;

            if let Some(limit) = self.config.max_lines
                && lines_read > limit
            {
                return Err(Error::LineLimitExceeded {
                    path: path.to_path_buf(),
                    limit,
                });
            }

            match RecordExtractor::extract(idx, &line) {
                Ok(record) => aggregator.observe(record),
                Err(failure) => {
                    failures += 1;
                    tracing::warn!(
                        "Failed to parse line idx={} in {} ({}); line={}",
                        failure.line_index,
                        path.display(),
                        failure.reason,
                        failure.raw_line
                    );
                }
            }
        }

        let aggregated = aggregator.finalize()?;
        let elapsed = start.elapsed();

        tracing::info!(
            "Parsed {} in {:?}: {} records, {} urls, {} unparseable lines",
            path.display(),
            elapsed,
            aggregated.totals.grand_total_count,
            aggregated.stats.len(),
            failures
        );

        Ok(ParsedRun {
            source: path.to_path_buf(),
            aggregated,
            lines_read,
            failures,
            elapsed,
        })
    }

    /// Rank a parsed run and hand the rows to the report writer as run `run_id`
    pub fn emit(&self, parsed: ParsedRun, run_id: usize) -> Result<RunSummary> {
        let start = Instant::now();

        let rows = ReportAssembler::assemble(&parsed.aggregated)?;
        let report_path = self.writer.write(&rows, run_id)?;
        let report_elapsed = start.elapsed();

        tracing::info!(
            "Built report {} for {} in {:?}",
            run_id,
            parsed.source.display(),
            report_elapsed
        );

        Ok(RunSummary {
            run_id,
            source: parsed.source,
            report_path,
            rows,
            lines_read: parsed.lines_read,
            records: parsed.aggregated.totals.grand_total_count,
            failures: parsed.failures,
            parse_elapsed: parsed.elapsed,
            report_elapsed,
        })
    }

    /// Parse one source and write its report
    pub fn run(&self, path: &Path, run_id: usize) -> Result<RunSummary> {
        let parsed = self.parse(path)?;
        self.emit(parsed, run_id)
    }

    /// Process several sources concurrently, at most `jobs` at a time.
    ///
    /// Reports are written as parses finish; run ids are handed out 1, 2, 3...
    /// in that completion order. Outcomes are returned in the same order.
    pub async fn run_all(self: Arc<Self>, paths: Vec<PathBuf>, jobs: usize) -> Vec<RunOutcome> {
        let semaphore = Arc::new(Semaphore::new(jobs.max(1)));
        let mut workers = JoinSet::new();
        let mut sources = HashMap::new();

        tracing::debug!(
            "Starting {} runs with up to {} workers",
            paths.len(),
            jobs.max(1)
        );

        for path in paths {
            let orchestrator = Arc::clone(&self);
            let semaphore = Arc::clone(&semaphore);
            let worker_path = path.clone();

            let handle = workers.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| Error::Worker(e.to_string()))?;
                tokio::task::spawn_blocking(move || orchestrator.parse(&worker_path))
                    .await
                    .map_err(|e| Error::Worker(e.to_string()))?
            });
            sources.insert(handle.id(), path);
        }

        let mut outcomes = Vec::with_capacity(sources.len());
        let mut next_run_id = 1;

        while let Some(joined) = workers.join_next_with_id().await {
            let (id, parsed) = match joined {
                Ok((id, parsed)) => (id, parsed),
                Err(e) => (e.id(), Err(Error::Worker(e.to_string()))),
            };
            let source = sources.remove(&id).unwrap_or_default();

            let result = match parsed {
                Ok(parsed) => {
                    let run_id = next_run_id;
                    next_run_id += 1;
                    let orchestrator = Arc::clone(&self);
                    tokio::task::spawn_blocking(move || orchestrator.emit(parsed, run_id))
                        .await
                        .unwrap_or_else(|e| Err(Error::Worker(e.to_string())))
                }
                Err(e) => Err(e),
            };

            if let Err(e) = &result {
                tracing::error!("Run for {} failed: {}", source.display(), e);
            }

            outcomes.push(RunOutcome { source, result });
        }

        outcomes
    }
}
