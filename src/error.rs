//! Error types for reading ledgers and writing reports.
//!
//! The settlement computation itself is total and never returns these.

use thiserror::Error;

/// Result type alias for ledger and report operations
pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    /// Failed to open, read or write a file or stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The ledger never declared a trip start date
    #[error("Ledger has no trip row with a valid start date")]
    MissingTripDate,

    /// A date given on the command line could not be parsed
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    /// A command-line option was given without its value
    #[error("Missing value for option {0}")]
    MissingOptionValue(String),

    /// Unknown report name on the command line
    #[error("Unknown report '{0}'. Expected one of: balances, settlements, categories, summary")]
    UnknownReport(String),

    /// Missing ledger file argument
    #[error(
        "Missing ledger file argument. \
         Usage: trip-settlement <ledger.csv> [report] [--today YYYY-MM-DD]"
    )]
    MissingArgument,
}
