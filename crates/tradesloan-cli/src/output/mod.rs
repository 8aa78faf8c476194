pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use clap::ValueEnum;
use serde_json::Value;

/// How `tlc` renders a calculation on stdout.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Full envelope as pretty JSON
    Json,
    /// Field/value table plus a table per row series
    Table,
    /// Field/value rows, or one row per schedule month
    Csv,
    /// Headline figure only (payment, recommendation, rate or score)
    Minimal,
}

pub fn format_output(format: OutputFormat, value: &Value) {
    tracing::debug!(?format, "rendering output");
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}
