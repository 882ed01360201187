use crate::OutputFormat;
use anyhow::{Context, Result, bail};
use logstat_core::report::ReportTemplate;
use logstat_core::{PipelineConfig, PipelineOrchestrator, RunOutcome};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Options for a multi-file analyze run
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    pub output_dir: PathBuf,
    pub template: Option<PathBuf>,
    pub jobs: usize,
    pub max_lines: Option<usize>,
}

/// `~/log_analyzer/logs_save`, or `./logs_save` when there is no home directory
pub fn default_output_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join("log_analyzer").join("logs_save"))
        .unwrap_or_else(|| PathBuf::from("logs_save"))
}

pub fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Expand glob patterns into concrete paths.
///
/// Plain paths, and patterns that match nothing, are kept as given so the
/// run for them fails with a not-found error instead of vanishing.
pub fn expand_inputs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();

    for pattern in patterns {
        if !pattern.contains(['*', '?', '[']) {
            inputs.push(PathBuf::from(pattern));
            continue;
        }

        let mut matched = glob::glob(pattern)
            .with_context(|| format!("Invalid input pattern '{}'", pattern))?
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(e) => {
                    tracing::warn!("Skipping unreadable match for '{}': {}", pattern, e);
                    None
                }
            })
            .peekable();

        if matched.peek().is_none() {
            tracing::warn!("Pattern '{}' matched no files", pattern);
            inputs.push(PathBuf::from(pattern));
        } else {
            inputs.extend(matched);
        }
    }

    Ok(inputs)
}

/// Run the pipeline over every input and write one report per successful run
pub fn analyze_logs(inputs: Vec<PathBuf>, options: &AnalyzeOptions) -> Result<Vec<RunOutcome>> {
    let template = match &options.template {
        Some(path) => ReportTemplate::from_file(path)
            .with_context(|| format!("Failed to load report template {}", path.display()))?,
        None => ReportTemplate::builtin(),
    };

    let orchestrator = Arc::new(PipelineOrchestrator::new(PipelineConfig {
        output_dir: options.output_dir.clone(),
        template,
        max_lines: options.max_lines,
    }));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    Ok(runtime.block_on(orchestrator.run_all(inputs, options.jobs)))
}

#[derive(Debug, Serialize)]
struct RunLine {
    source: String,
    run_id: Option<usize>,
    report: Option<String>,
    records: u64,
    unparseable_lines: usize,
    parse_ms: u128,
    report_ms: u128,
    error: Option<String>,
}

impl From<&RunOutcome> for RunLine {
    fn from(outcome: &RunOutcome) -> Self {
        let source = outcome.source.display().to_string();
        match &outcome.result {
            Ok(summary) => RunLine {
                source,
                run_id: Some(summary.run_id),
                report: Some(summary.report_path.display().to_string()),
                records: summary.records,
                unparseable_lines: summary.failures,
                parse_ms: summary.parse_elapsed.as_millis(),
                report_ms: summary.report_elapsed.as_millis(),
                error: None,
            },
            Err(e) => RunLine {
                source,
                run_id: None,
                report: None,
                records: 0,
                unparseable_lines: 0,
                parse_ms: 0,
                report_ms: 0,
                error: Some(e.to_string()),
            },
        }
    }
}

pub fn execute(patterns: &[String], options: AnalyzeOptions, format: OutputFormat) -> Result<()> {
    let inputs = expand_inputs(patterns)?;
    tracing::info!(
        "Analyzing {} log file(s) into {}",
        inputs.len(),
        options.output_dir.display()
    );

    let outcomes = analyze_logs(inputs, &options)?;
    let lines: Vec<RunLine> = outcomes.iter().map(RunLine::from).collect();

    match format {
        OutputFormat::Json => output_json(&lines)?,
        OutputFormat::Table => output_table(&lines),
        OutputFormat::Pretty => output_pretty(&lines, &options.output_dir),
    }

    let failed = lines.iter().filter(|l| l.error.is_some()).count();
    if failed > 0 {
        bail!("{} of {} runs failed", failed, lines.len());
    }

    Ok(())
}

fn output_pretty(lines: &[RunLine], output_dir: &Path) {
    use console::style;

    println!("\n{}", style("Log Analysis Runs").bold().cyan());
    println!("{}", style("=================").cyan());
    println!("  Output Directory: {}", output_dir.display());

    for line in lines {
        match (&line.report, &line.error) {
            (Some(report), _) => println!(
                "\n  {} {}\n    Report:            {}\n    Records:           {}\n    Unparseable Lines: {}\n    Parse Time:        {} ms",
                style("✔").green(),
                line.source,
                report,
                line.records,
                line.unparseable_lines,
                line.parse_ms
            ),
            (None, error) => println!(
                "\n  {} {}\n    Error: {}",
                style("✘").red(),
                line.source,
                error.as_deref().unwrap_or("unknown")
            ),
        }
    }

    println!();
}

fn output_json(lines: &[RunLine]) -> Result<()> {
    let json = serde_json::to_string_pretty(lines)?;
    println!("{}", json);
    Ok(())
}

fn output_table(lines: &[RunLine]) {
    println!("Source,Run,Report,Records,Unparseable Lines,Parse (ms),Report (ms),Error");
    for line in lines {
        println!(
            "{},{},{},{},{},{},{},{}",
            line.source,
            line.run_id.map(|id| id.to_string()).unwrap_or_default(),
            line.report.as_deref().unwrap_or(""),
            line.records,
            line.unparseable_lines,
            line.parse_ms,
            line.report_ms,
            line.error.as_deref().unwrap_or("")
        );
    }
}
