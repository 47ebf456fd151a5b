use crate::error::WorkbookError;
use calamine::{Data, Range, Reader, Sheets, open_workbook_auto};
use core_types::{Cell, Table};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub type Workbook = Sheets<BufReader<File>>;

/// Opens an xlsx/xls/ods workbook.
pub fn open(path: &Path) -> Result<Workbook, WorkbookError> {
    open_workbook_auto(path).map_err(|e| WorkbookError::Open {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Reads one sheet of the workbook at `path` into a `Table`.
pub fn load(path: &Path, sheet: &str) -> Result<Table, WorkbookError> {
    let mut workbook = open(path)?;
    read_sheet(&mut workbook, path, sheet)
}

/// Reads a sheet from an already open workbook. The first non-blank row is the header.
pub fn read_sheet(
    workbook: &mut Workbook,
    path: &Path,
    sheet: &str,
) -> Result<Table, WorkbookError> {
    if !workbook.sheet_names().iter().any(|name| name == sheet) {
        return Err(WorkbookError::MissingSheet {
            path: path.to_path_buf(),
            sheet: sheet.to_string(),
        });
    }

    let range = workbook
        .worksheet_range(sheet)
        .map_err(|e| WorkbookError::Sheet {
            sheet: sheet.to_string(),
            reason: e.to_string(),
        })?;

    let table = table_from_range(&range);
    tracing::debug!(
        sheet,
        rows = table.row_count(),
        columns = table.columns().len(),
        "Sheet read."
    );
    Ok(table)
}

/// Converts a calamine range into a `Table`, skipping blank rows.
pub fn table_from_range(range: &Range<Data>) -> Table {
    let mut rows = range
        .rows()
        .filter(|row| row.iter().any(|cell| !matches!(cell, Data::Empty)));

    let Some(header) = rows.next() else {
        return Table::default();
    };

    let headers = header
        .iter()
        .enumerate()
        .map(|(i, cell)| match cell {
            Data::Empty => format!("Unnamed: {}", i),
            Data::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect();

    let body = rows
        .map(|row| row.iter().map(to_cell).collect())
        .collect();

    Table::from_rows(headers, body)
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::Int(i) => Cell::Number(Decimal::from(*i)),
        Data::Float(f) => Decimal::from_f64(*f)
            .map(Cell::Number)
            .unwrap_or_else(|| Cell::Text(f.to_string())),
        Data::String(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| Cell::Date(d.date()))
            .unwrap_or_else(|| Cell::Text(dt.as_f64().to_string())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Text(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn converts_range_with_header_row() {
        let mut range = Range::new((0, 0), (3, 2));
        range.set_value((0, 0), Data::String(" Date".to_string()));
        range.set_value((0, 1), Data::String("Weight".to_string()));
        range.set_value((0, 2), Data::String("Antipodes Region".to_string()));
        range.set_value((1, 0), Data::String("2025-04-01".to_string()));
        range.set_value((1, 1), Data::Float(0.1));
        range.set_value((1, 2), Data::String("EM Asia".to_string()));
        // Row 2 left blank on purpose.
        range.set_value((3, 0), Data::String("2025-06-30".to_string()));
        range.set_value((3, 1), Data::Int(1));

        let table = table_from_range(&range);

        assert_eq!(table.row_count(), 2);
        assert_eq!(
            table.column_names().collect::<Vec<_>>(),
            vec![" Date", "Weight", "Antipodes Region"]
        );
        assert_eq!(
            table.numbers("Weight").unwrap(),
            vec![Some(dec!(0.1)), Some(dec!(1))]
        );
        assert_eq!(
            table.dates(" Date").unwrap(),
            vec![
                NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
            ]
        );
        assert_eq!(
            table.labels("Antipodes Region").unwrap(),
            vec![Some("EM Asia".to_string()), None]
        );
    }

    #[test]
    fn empty_range_yields_empty_table() {
        let range: Range<Data> = Range::empty();
        assert!(table_from_range(&range).is_empty());
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let err = load(Path::new("does/not/exist.xlsx"), "Returns").unwrap_err();
        assert!(matches!(err, WorkbookError::Open { .. }));
        assert!(!err.is_validation());
    }
}
