//! # Workbook
//!
//! Loads the returns and index-constituent sheets of the backing spreadsheet into typed
//! `Table`s, validates the configured columns, and caches the result for the life of the
//! process.
//!
//! ## Public API
//!
//! - `load` / `read_sheet`: read one sheet into a `Table`.
//! - `normalize_and_validate`: trim column names and coerce required columns.
//! - `Dataset`, `DatasetSource`, `WorkbookSource`: the pair of tables and where they come from.
//! - `DatasetCache`: the initialize-once cache shared by request handlers.
//! - `WorkbookError`: load failures and validation failures.

pub mod cache;
pub mod dataset;
pub mod error;
pub mod reader;
pub mod validate;

pub use cache::DatasetCache;
pub use dataset::{Dataset, DatasetSource, InMemorySource, WorkbookSource, load_dataset};
pub use error::WorkbookError;
pub use reader::{load, read_sheet};
pub use validate::{ColumnRule, normalize_and_validate};
