use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("payment must be exactly {expected}, got {actual}")]
    InvalidAmount { expected: Decimal, actual: Decimal },
    #[error("no unpaid weeks to pay")]
    NoUnpaidWeeks,
    #[error("cannot advance beyond {total_weeks} weeks")]
    TermExceeded { total_weeks: u32 },
    #[error("Invalid loan terms: {0}")]
    InvalidTerms(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
