//! Reporting sinks — tabular output with overwrite semantics.
//!
//! A sink consumes named tables of string cells. The contract is
//! overwrite: writing a table replaces any previous table of the same name
//! (the canonical destination is cleared before writing, never appended).
//! A sink failure surfaces as an error and never rolls back the simulation
//! results that produced the table.

pub mod csv_sink;
pub mod tables;

pub use csv_sink::CsvSink;
pub use tables::{equity_table, signals_table, summary_table, trades_table, Table};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to write table '{table}': {reason}")]
    WriteFailed { table: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Destination for report tables.
pub trait ReportSink {
    /// Write a named table, replacing any previous table of that name.
    fn write_table(
        &self,
        name: &str,
        columns: &[&str],
        rows: &[Vec<String>],
    ) -> Result<(), SinkError>;
}
