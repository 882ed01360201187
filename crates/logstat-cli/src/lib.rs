use clap::ValueEnum;

pub mod commands;

/// How command results are printed to stdout
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Human readable, styled summary
    Pretty,
    /// Pretty-printed JSON
    Json,
    /// Comma separated rows with a header line
    Table,
}
