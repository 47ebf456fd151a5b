pub mod date;
pub mod enums;
pub mod error;
pub mod table;

// Re-export the core types to provide a clean public API.
pub use date::parse_date;
pub use enums::{ColumnKind, NaStrategy};
pub use error::CoreError;
pub use table::{Cell, Column, Table};
