use core_types::CoreError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkbookError {
    #[error("Failed to read workbook '{path}': {reason}")]
    Open { path: PathBuf, reason: String },

    #[error("Sheet '{sheet}' not found in workbook '{path}'")]
    MissingSheet { path: PathBuf, sheet: String },

    #[error("Failed to read sheet '{sheet}': {reason}")]
    Sheet { sheet: String, reason: String },

    #[error("The workbook loading task failed: {0}")]
    Task(String),

    #[error("Missing column(s) {} in sheet '{sheet}'", quoted(.columns))]
    MissingColumns { sheet: String, columns: Vec<String> },

    #[error("Invalid date values in column '{column}' of sheet '{sheet}': {source}")]
    InvalidDates {
        sheet: String,
        column: String,
        source: CoreError,
    },

    #[error("Invalid numeric values in column '{column}' of sheet '{sheet}': {source}")]
    InvalidNumbers {
        sheet: String,
        column: String,
        source: CoreError,
    },

    #[error("Missing values in column '{column}' of sheet '{sheet}' ({count} rows)")]
    MissingValues {
        sheet: String,
        column: String,
        count: usize,
    },
}

impl WorkbookError {
    /// True for problems with the sheet contents, as opposed to failures to read the file.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            WorkbookError::MissingColumns { .. }
                | WorkbookError::InvalidDates { .. }
                | WorkbookError::InvalidNumbers { .. }
                | WorkbookError::MissingValues { .. }
        )
    }
}

fn quoted(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("'{}'", name))
        .collect::<Vec<_>>()
        .join(", ")
}
