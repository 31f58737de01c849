use thiserror::Error;

/// Errors surfaced by the journal core.
///
/// Structural CSV problems (`MissingColumns`, `NoValidRows`) abort the whole
/// import and bubble to the caller. Per-row import problems are not errors:
/// they are collected into [`crate::codec::CsvImport::row_errors`] and the
/// import succeeds partially. Metrics computation never fails for data-shape
/// reasons (empty lists, zero capital); degenerate denominators resolve to
/// documented sentinels instead.
#[derive(Error, Debug)]
pub enum JournalError {
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("No valid trades found in CSV file")]
    NoValidRows,

    #[error("No trades to export")]
    EmptyExport,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Database error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Store lock poisoned")]
    LockPoisoned,

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, JournalError>;
