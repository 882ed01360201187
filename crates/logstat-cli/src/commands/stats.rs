use crate::OutputFormat;
use anyhow::Result;
use logstat_core::analysis::{ReportAssembler, ReportRow};
use logstat_core::{PipelineConfig, PipelineOrchestrator};
use serde::Serialize;
use std::path::Path;

/// Ranked per-url statistics for one log file, without writing a report
#[derive(Debug, Clone, Serialize)]
pub struct LogStats {
    pub source: String,
    pub lines_read: usize,
    pub records: u64,
    pub unparseable_lines: usize,
    pub distinct_urls: usize,
    pub total_time: f64,
    pub rows: Vec<ReportRow>,
}

/// Parse a log file and return its ranked rows, keeping only the first `top` if given
pub fn analyze_log(file: &Path, top: Option<usize>, max_lines: Option<usize>) -> Result<LogStats> {
    tracing::debug!("Collecting statistics from: {}", file.display());

    let orchestrator = PipelineOrchestrator::new(PipelineConfig {
        max_lines,
        ..PipelineConfig::default()
    });

    let parsed = orchestrator.parse(file)?;
    let mut rows = ReportAssembler::assemble(&parsed.aggregated)?;
    let distinct_urls = rows.len();
    if let Some(top) = top {
        rows.truncate(top);
    }

    Ok(LogStats {
        source: file.display().to_string(),
        lines_read: parsed.lines_read,
        records: parsed.aggregated.totals.grand_total_count,
        unparseable_lines: parsed.failures,
        distinct_urls,
        total_time: parsed.aggregated.totals.grand_total_duration,
        rows,
    })
}

pub fn execute(
    file: &Path,
    top: Option<usize>,
    max_lines: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    tracing::info!("Extracting statistics from log file: {}", file.display());

    let stats = analyze_log(file, top, max_lines)?;

    match format {
        OutputFormat::Json => output_json(&stats)?,
        OutputFormat::Table => output_table(&stats),
        OutputFormat::Pretty => output_pretty(&stats),
    }

    Ok(())
}

fn output_pretty(stats: &LogStats) {
    use console::style;

    println!("\n{}", style("Request Time Statistics").bold().cyan());
    println!("{}", style("=======================").cyan());

    println!("\n{}", style("Summary:").bold());
    println!("  Source:            {}", stats.source);
    println!("  Lines Read:        {}", stats.lines_read);
    println!("  Records:           {}", stats.records);
    println!("  Unparseable Lines: {}", stats.unparseable_lines);
    println!("  Distinct URLs:     {}", stats.distinct_urls);
    println!("  Total Time:        {:.3} s", stats.total_time);

    println!("\n{}", style("Slowest URLs:").bold());
    for (i, row) in stats.rows.iter().enumerate() {
        println!(
            "  {}. [{:.3} s, {}%] {} x{} (avg {}, med {}, max {})",
            i + 1,
            row.time_sum,
            row.time_percent,
            row.url,
            row.count,
            row.time_avg,
            row.time_med,
            row.time_max
        );
    }

    println!();
}

fn output_json(stats: &LogStats) -> Result<()> {
    let json = serde_json::to_string_pretty(stats)?;
    println!("{}", json);
    Ok(())
}

fn output_table(stats: &LogStats) {
    println!("url,count,count_percent,time_sum,time_percent,time_avg,time_max,time_med");
    for row in &stats.rows {
        println!(
            "{},{},{},{:.3},{},{},{},{}",
            row.url,
            row.count,
            row.count_percent,
            row.time_sum,
            row.time_percent,
            row.time_avg,
            row.time_max,
            row.time_med
        );
    }
}
