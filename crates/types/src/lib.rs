//! Shared data model for report definitions.
//!
//! These types are produced by the parser, filled in by the binder and read
//! by the renderers. They carry no behaviour beyond lookups and small
//! invariants so every other crate can depend on them.

pub mod dataset;
pub mod parameter;
pub mod table;

pub use dataset::{Dataset, DatasetReference, available_values_name};
pub use parameter::{DataType, Parameter};
pub use table::{CellValue, ColumnType, DataColumn, DataTable};
