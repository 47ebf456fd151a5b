use crate::error::CoreError;
use chrono::{Duration, NaiveDate, NaiveDateTime};

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%Y%m%d"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parses a calendar date from the textual forms found in spreadsheets and query strings.
///
/// Time components are accepted and discarded.
pub fn parse_date(input: &str) -> Result<NaiveDate, CoreError> {
    let s = input.trim();
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Ok(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(datetime.date());
        }
    }
    Err(CoreError::InvalidDateString(input.to_string()))
}

/// Converts an Excel serial day number (1900 date system) into a date.
pub fn from_excel_serial(serial: i64) -> Option<NaiveDate> {
    // Exact from serial 61 (1900-03-01) onward, past Excel's phantom 1900-02-29.
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial))
}
