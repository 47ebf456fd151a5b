use crate::error::WorkbookError;
use core_types::{ColumnKind, Table};

/// A column a sheet must provide, and the type it is coerced to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRule {
    pub name: String,
    pub kind: ColumnKind,
    /// Only meaningful for numeric columns: blanks load as missing values instead of failing.
    pub allow_missing: bool,
}

impl ColumnRule {
    pub fn date(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::Date,
            allow_missing: false,
        }
    }

    pub fn numeric(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::Numeric,
            allow_missing: false,
        }
    }

    pub fn allow_missing(mut self, allow: bool) -> Self {
        self.allow_missing = allow;
        self
    }
}

/// Trims column names, checks the required columns exist, then coerces them in place.
///
/// Every required column is checked for presence before any is parsed, so a sheet
/// missing columns is reported as such even if another column holds bad values. All
/// absent columns are named in one error.
pub fn normalize_and_validate(
    mut table: Table,
    sheet: &str,
    rules: &[ColumnRule],
) -> Result<Table, WorkbookError> {
    table.trim_column_names();

    let missing: Vec<String> = rules
        .iter()
        .filter(|rule| !table.has_column(&rule.name))
        .map(|rule| rule.name.clone())
        .collect();
    if !missing.is_empty() {
        return Err(WorkbookError::MissingColumns {
            sheet: sheet.to_string(),
            columns: missing,
        });
    }

    for rule in rules {
        let column = table
            .column_mut(&rule.name)
            .map_err(|_| WorkbookError::MissingColumns {
                sheet: sheet.to_string(),
                columns: vec![rule.name.clone()],
            })?;

        match rule.kind {
            ColumnKind::Date => {
                column
                    .coerce_dates()
                    .map_err(|source| WorkbookError::InvalidDates {
                        sheet: sheet.to_string(),
                        column: rule.name.clone(),
                        source,
                    })?;
            }
            ColumnKind::Numeric => {
                // Unparseable text is reported ahead of blanks.
                column
                    .coerce_numbers()
                    .map_err(|source| WorkbookError::InvalidNumbers {
                        sheet: sheet.to_string(),
                        column: rule.name.clone(),
                        source,
                    })?;

                let missing = column.missing_count();
                if missing > 0 && !rule.allow_missing {
                    return Err(WorkbookError::MissingValues {
                        sheet: sheet.to_string(),
                        column: rule.name.clone(),
                        count: missing,
                    });
                }
            }
        }
    }

    Ok(table)
}
