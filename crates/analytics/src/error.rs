use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error(transparent)]
    Table(#[from] CoreError),

    #[error("Column '{column}' has {count} missing values in the selected rows")]
    MissingValues { column: String, count: usize },

    #[error("Values in column '{column}' are too large to aggregate")]
    Overflow { column: String },

    #[error("Window length must be at least one day")]
    ZeroWindow,
}
