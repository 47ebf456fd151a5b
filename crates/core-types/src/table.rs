use crate::date::{from_excel_serial, parse_date};
use crate::error::CoreError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::fmt;
use std::str::FromStr;

/// A single value read from a sheet.
///
/// Missing values are `Empty`; there is no NaN marker.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(Decimal),
    Date(NaiveDate),
    Text(String),
    Bool(bool),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// Blank cells and whitespace-only strings both count as missing.
    pub fn is_missing(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Interprets the cell as a date. Whole numbers are read as Excel serials.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Cell::Date(date) => Some(*date),
            Cell::Text(s) => parse_date(s).ok(),
            Cell::Number(n) if n.fract().is_zero() && n.is_sign_positive() => {
                n.to_i64().and_then(from_excel_serial)
            }
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<Decimal> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => {
                let s = s.trim();
                Decimal::from_str(s)
                    .or_else(|_| Decimal::from_scientific(s))
                    .ok()
            }
            _ => None,
        }
    }

    /// Renders the cell as a grouping key. Missing cells have no label.
    pub fn as_label(&self) -> Option<String> {
        if self.is_missing() {
            return None;
        }
        match self {
            Cell::Text(s) => Some(s.trim().to_string()),
            Cell::Number(n) => Some(n.normalize().to_string()),
            Cell::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
            Cell::Bool(b) => Some(b.to_string()),
            Cell::Empty => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Cell::Text(s) => f.write_str(s),
            Cell::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<Decimal> for Cell {
    fn from(value: Decimal) -> Self {
        Cell::Number(value)
    }
}

impl From<NaiveDate> for Cell {
    fn from(value: NaiveDate) -> Self {
        Cell::Date(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Cell::Empty)
    }
}

/// A named column of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Cell>,
}

impl Column {
    pub fn new<I, T>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Cell>,
    {
        Self {
            name: name.into(),
            cells: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Rewrites every cell as `Cell::Date`, failing on the first missing or unparseable one.
    pub fn coerce_dates(&mut self) -> Result<(), CoreError> {
        let parsed = self.dates()?;
        self.cells = parsed.into_iter().map(Cell::Date).collect();
        Ok(())
    }

    /// Rewrites every cell as `Cell::Number` or `Cell::Empty`, failing on unparseable text.
    pub fn coerce_numbers(&mut self) -> Result<(), CoreError> {
        let parsed = self.numbers()?;
        self.cells = parsed.into_iter().map(Cell::from).collect();
        Ok(())
    }

    pub fn dates(&self) -> Result<Vec<NaiveDate>, CoreError> {
        self.cells
            .iter()
            .enumerate()
            .map(|(row, cell)| {
                cell.as_date().ok_or_else(|| CoreError::InvalidDate {
                    column: self.name.clone(),
                    row,
                    value: cell.to_string(),
                })
            })
            .collect()
    }

    pub fn numbers(&self) -> Result<Vec<Option<Decimal>>, CoreError> {
        self.cells
            .iter()
            .enumerate()
            .map(|(row, cell)| {
                if cell.is_missing() {
                    return Ok(None);
                }
                cell.as_number()
                    .map(Some)
                    .ok_or_else(|| CoreError::InvalidNumber {
                        column: self.name.clone(),
                        row,
                        value: cell.to_string(),
                    })
            })
            .collect()
    }

    pub fn labels(&self) -> Vec<Option<String>> {
        self.cells.iter().map(Cell::as_label).collect()
    }

    /// Number of missing cells in the column.
    pub fn missing_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_missing()).count()
    }
}

/// An in-memory column store. Every column holds the same number of rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Result<Self, CoreError> {
        if let Some(first) = columns.first() {
            let expected = first.len();
            if let Some(bad) = columns.iter().find(|c| c.len() != expected) {
                return Err(CoreError::LengthMismatch {
                    column: bad.name.clone(),
                    expected,
                    actual: bad.len(),
                });
            }
        }
        Ok(Self { columns })
    }

    /// Builds a table from a header row and data rows. Short rows are padded with `Cell::Empty`.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let mut columns: Vec<Column> = headers
            .into_iter()
            .map(|name| Column {
                name,
                cells: Vec::with_capacity(rows.len()),
            })
            .collect();

        for row in rows {
            let mut cells = row.into_iter();
            for column in columns.iter_mut() {
                column.cells.push(cells.next().unwrap_or(Cell::Empty));
            }
        }

        Self { columns }
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Result<&Column, CoreError> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| CoreError::UnknownColumn(name.to_string()))
    }

    pub fn column_mut(&mut self, name: &str) -> Result<&mut Column, CoreError> {
        self.columns
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| CoreError::UnknownColumn(name.to_string()))
    }

    /// Strips surrounding whitespace from every column name.
    pub fn trim_column_names(&mut self) {
        for column in self.columns.iter_mut() {
            let trimmed = column.name.trim();
            if trimmed.len() != column.name.len() {
                column.name = trimmed.to_string();
            }
        }
    }

    pub fn dates(&self, name: &str) -> Result<Vec<NaiveDate>, CoreError> {
        self.column(name)?.dates()
    }

    pub fn numbers(&self, name: &str) -> Result<Vec<Option<Decimal>>, CoreError> {
        self.column(name)?.numbers()
    }

    pub fn labels(&self, name: &str) -> Result<Vec<Option<String>>, CoreError> {
        Ok(self.column(name)?.labels())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn from_rows_pads_short_rows() {
        let table = Table::from_rows(
            vec!["Date".into(), "Weight".into(), "Region".into()],
            vec![
                vec![Cell::Date(ymd(2025, 4, 1)), Cell::Number(dec!(0.1))],
                vec![
                    Cell::Date(ymd(2025, 4, 1)),
                    Cell::Number(dec!(0.2)),
                    Cell::text("EM Asia"),
                ],
            ],
        );

        assert_eq!(table.row_count(), 2);
        assert_eq!(
            table.labels("Region").unwrap(),
            vec![None, Some("EM Asia".to_string())]
        );
    }

    #[test]
    fn new_rejects_ragged_columns() {
        let err = Table::new(vec![
            Column::new("a", [dec!(1), dec!(2)]),
            Column::new("b", [dec!(1)]),
        ])
        .unwrap_err();

        assert_eq!(
            err,
            CoreError::LengthMismatch {
                column: "b".to_string(),
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn numbers_parse_text_and_keep_blanks_missing() {
        let column = Column::new(
            "Weight",
            [Cell::text("0.25"), Cell::Empty, Cell::text(" "), Cell::text("1e-2")],
        );
        assert_eq!(
            column.numbers().unwrap(),
            vec![Some(dec!(0.25)), None, None, Some(dec!(0.01))]
        );
    }

    #[test]
    fn numbers_report_the_offending_row() {
        let column = Column::new("Weight", [Cell::text("0.25"), Cell::text("n/a")]);
        assert_eq!(
            column.numbers().unwrap_err(),
            CoreError::InvalidNumber {
                column: "Weight".to_string(),
                row: 1,
                value: "n/a".to_string()
            }
        );
    }

    #[test]
    fn coerce_dates_accepts_text_and_serials() {
        let mut column = Column::new(
            "Date",
            [Cell::text("2025-04-01"), Cell::Number(dec!(45838))],
        );
        column.coerce_dates().unwrap();
        assert_eq!(
            column.cells,
            vec![Cell::Date(ymd(2025, 4, 1)), Cell::Date(ymd(2025, 6, 30))]
        );
    }

    #[test]
    fn dates_fail_on_blank_cells() {
        let column = Column::new("Date", [Cell::text("2025-04-01"), Cell::Empty]);
        assert!(matches!(
            column.dates(),
            Err(CoreError::InvalidDate { row: 1, .. })
        ));
    }

    #[test]
    fn trims_column_names() {
        let mut table = Table::new(vec![Column::new(" Weight ", [dec!(1)])]).unwrap();
        table.trim_column_names();
        assert!(table.has_column("Weight"));
        assert!(matches!(
            table.column(" Weight "),
            Err(CoreError::UnknownColumn(_))
        ));
    }

    #[test]
    fn labels_render_numbers_without_trailing_zeros() {
        assert_eq!(Cell::Number(dec!(2.50)).as_label(), Some("2.5".to_string()));
        assert_eq!(Cell::text("  NA ").as_label(), Some("NA".to_string()));
        assert_eq!(Cell::Empty.as_label(), None);
    }
}
