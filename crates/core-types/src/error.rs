use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Column '{0}' not found")]
    UnknownColumn(String),

    #[error("Invalid date value '{value}' in column '{column}' at data row {row}")]
    InvalidDate {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Invalid numeric value '{value}' in column '{column}' at data row {row}")]
    InvalidNumber {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Invalid date '{0}', expected a date such as 2025-06-30")]
    InvalidDateString(String),

    #[error("Invalid na_strategy '{0}', expected one of: keep, zero, drop")]
    InvalidNaStrategy(String),

    #[error("Column '{column}' has {actual} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },
}
