use crate::error::AppError;
use analytics::{ExposureDiff, WindowReturns};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Query of `GET /returns`. The windowed form is selected by `as_of`.
///
/// Parsed from raw pairs so that `windows` may repeat (`windows=30&windows=90`)
/// or be comma separated (`windows=30,90`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReturnsParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub as_of: Option<String>,
    pub windows: Vec<u32>,
    pub fund_col: Option<String>,
    pub bench_col: Option<String>,
    pub date_col: Option<String>,
    pub na_strategy: Option<String>,
}

impl ReturnsParams {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Result<Self, AppError> {
        let mut params = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "start_date" => params.start_date = Some(value),
                "end_date" => params.end_date = Some(value),
                "as_of" => params.as_of = Some(value),
                "windows" | "windows[]" => {
                    for part in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                        let days = part
                            .parse::<u32>()
                            .ok()
                            .filter(|days| *days > 0)
                            .ok_or_else(|| {
                                AppError::BadRequest(format!(
                                    "Invalid window '{}', expected a positive whole number of days",
                                    part
                                ))
                            })?;
                        params.windows.push(days);
                    }
                }
                "fund_col" => params.fund_col = Some(value),
                "bench_col" => params.bench_col = Some(value),
                "date_col" => params.date_col = Some(value),
                "na_strategy" => params.na_strategy = Some(value),
                _ => {}
            }
        }
        Ok(params)
    }
}

/// Query of `GET /exposure-diff`.
#[derive(Debug, Clone, Deserialize)]
pub struct ExposureDiffParams {
    pub start_date: String,
    pub end_date: String,
    pub group_by: Option<String>,
    pub index: Option<String>,
    pub na_strategy: Option<String>,
}

/// Query of `GET /exposure`.
#[derive(Debug, Clone, Deserialize)]
pub struct ExposureParams {
    pub left_date: String,
    pub right_date: String,
    pub group_by: Option<String>,
    pub date_col: Option<String>,
    pub weight_col: Option<String>,
    pub na_strategy: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeReturnsResponse {
    pub start_date: String,
    pub end_date: String,
    pub fund_geom: Decimal,
    pub benchmark_geom: Decimal,
    pub alpha: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowReturnsResponse {
    pub results: Vec<WindowReturns>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReturnsResponse {
    Range(RangeReturnsResponse),
    Windows(WindowReturnsResponse),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExposureDiffResponse {
    pub group_by: String,
    pub start_date: String,
    pub end_date: String,
    pub index: Option<String>,
    pub results: Vec<ExposureDiff>,
}

/// One row of `GET /exposure`, named after the left and right dates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExposureSides {
    pub group: String,
    pub sum_weight_left: Option<Decimal>,
    pub sum_weight_right: Option<Decimal>,
    pub difference: Option<Decimal>,
}

impl From<ExposureDiff> for ExposureSides {
    fn from(diff: ExposureDiff) -> Self {
        Self {
            group: diff.group,
            sum_weight_left: diff.sum_weight_start,
            sum_weight_right: diff.sum_weight_end,
            difference: diff.difference,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExposureResponse {
    pub results: Vec<ExposureSides>,
}
