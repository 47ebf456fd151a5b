//! # Analytics
//!
//! Pure calculations over a loaded `Table`: compounded fund and benchmark returns with
//! alpha, and the change in summed constituent weights per group between two dates.
//!
//! Nothing here touches the filesystem or the network. Every function takes the table and
//! the column names to read, so callers decide which columns to use.
//!
//! ## Public API
//!
//! - `returns`: `geometric_cumulative_return`, `compute_range`, `compute_windows`.
//! - `exposure`: `sum_by_group`, `difference`.
//! - `na`: how `NaStrategy` treats missing values.
//! - `report`: the serializable result rows.

pub mod error;
pub mod exposure;
pub mod na;
pub mod report;
pub mod returns;

pub use error::AnalyticsError;
pub use exposure::{ExposureColumns, IndexFilter, difference, sum_by_group};
pub use report::{ExposureDiff, RangeReturns, WindowReturns};
pub use returns::{SeriesColumns, compute_range, compute_windows, geometric_cumulative_return};
