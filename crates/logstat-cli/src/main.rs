use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use logstat_cli::OutputFormat;
use logstat_cli::commands::{self, analyze::AnalyzeOptions};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "logstat")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Build per-URL request time reports from web server access logs",
    long_about = "logstat reads (optionally gzip-compressed) access logs whose last field is the \
                  request time, aggregates count, total, average, median and maximum time per URL, \
                  and renders the ranked result into an HTML report."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format for the console summary
    #[arg(short, long, global = true, value_enum, default_value = "pretty")]
    format: OutputFormat,

    /// Append diagnostics (including unparseable lines) to this file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze log files concurrently and write one HTML report per file
    Analyze {
        /// Log files or glob patterns (gzip or plain text)
        #[arg(value_name = "LOG", required = true)]
        logs: Vec<String>,

        /// Directory that receives report<N>.html files [default: ~/log_analyzer/logs_save]
        #[arg(short, long, env = "LOGSTAT_OUTPUT_DIR")]
        output_dir: Option<PathBuf>,

        /// HTML template containing the $table_json placeholder [default: built-in]
        #[arg(long, value_name = "PATH")]
        template: Option<PathBuf>,

        /// Maximum number of files parsed at once [default: number of CPUs]
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Fail a run whose log has more lines than this
        #[arg(long)]
        max_lines: Option<usize>,
    },

    /// Print ranked per-URL statistics for one log file
    Stats {
        /// Path to the log file (gzip or plain text)
        #[arg(value_name = "LOG")]
        log: PathBuf,

        /// Only show the N slowest URLs
        #[arg(long)]
        top: Option<usize>,

        /// Fail if the log has more lines than this
        #[arg(long)]
        max_lines: Option<usize>,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    // Execute the command
    match cli.command {
        Commands::Analyze {
            logs,
            output_dir,
            template,
            jobs,
            max_lines,
        } => {
            let options = AnalyzeOptions {
                output_dir: output_dir.unwrap_or_else(commands::analyze::default_output_dir),
                template,
                jobs: jobs.unwrap_or_else(commands::analyze::default_jobs),
                max_lines,
            };
            commands::analyze::execute(&logs, options, cli.format)
        }
        Commands::Stats {
            log,
            top,
            max_lines,
        } => commands::stats::execute(&log, top, max_lines, cli.format),
        Commands::Completion { shell } => {
            commands::completion::execute(shell, &mut Cli::command(), &mut std::io::stdout())
        }
    }
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("logstat=debug,logstat_cli=debug,logstat_core=debug")
    } else {
        EnvFilter::new("logstat=info,logstat_cli=info,logstat_core=warn")
    };

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr)
                .init();
        }
    }

    Ok(())
}
