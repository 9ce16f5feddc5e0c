//! Loads report-definition documents, binds their parameterized datasets
//! against a relational source and renders them.
//!
//! ```no_run
//! use reportdef::{RenderFormat, ReportLoader};
//!
//! # fn main() -> Result<(), reportdef::ReportError> {
//! let conn = rusqlite::Connection::open("sales.db")?;
//! let mut report = ReportLoader::new().load_file("sales.rdl", &conn)?;
//! report.set_parameter_value("Region", Some("North"))?;
//! report.initialize_data_sources(&conn)?;
//! report.render_to_file(RenderFormat::Csv, "sales.csv")?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod loader;
pub mod report;

pub use config::ReportOptions;
pub use error::{ReportError, Result};
pub use loader::ReportLoader;
pub use report::Report;

pub use reportdef_binder::{BindError, CoercionError, QueryConnection, QueryError};
pub use reportdef_parser::{DEFAULT_NAMESPACE, ParseError};
pub use reportdef_render_core::{
    CommandEngine, EngineOutput, EngineRequest, RenderEngine, RenderError, RenderFormat, RenderResult,
};
pub use reportdef_types::{CellValue, ColumnType, DataColumn, DataTable, DataType, Dataset, Parameter};
