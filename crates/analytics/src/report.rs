use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Compounded returns over an inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeReturns {
    pub fund_geom: Decimal,
    pub benchmark_geom: Decimal,
    pub alpha: Decimal,
}

impl RangeReturns {
    /// The defined result for a range that selects no rows.
    pub fn zero() -> Self {
        Self {
            fund_geom: Decimal::ZERO,
            benchmark_geom: Decimal::ZERO,
            alpha: Decimal::ZERO,
        }
    }
}

/// Compounded returns over one trailing window ending at `as_of`.
///
/// `None` means "not available": the window had no rows, or a missing value was kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowReturns {
    pub window_days: u32,
    pub as_of: NaiveDate,
    pub fund_cum_return: Option<Decimal>,
    pub bench_cum_return: Option<Decimal>,
    pub alpha: Option<Decimal>,
}

/// Summed weight of one group at two dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureDiff {
    pub group: String,
    pub sum_weight_start: Option<Decimal>,
    pub sum_weight_end: Option<Decimal>,
    pub difference: Option<Decimal>,
}
