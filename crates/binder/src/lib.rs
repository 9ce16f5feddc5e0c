//! Parameter coercion and dataset binding.
//!
//! Binding happens in two phases:
//!
//! - **Lookup binding** ([`bind_lookup_data`]) runs while a definition is
//!   loaded. It fills the datasets that list a parameter's valid values,
//!   before any parameter value is known.
//! - **Report binding** ([`bind_report_data`]) runs on demand once parameter
//!   values are set. It fills the datasets that feed the report body.
//!
//! Queries go through the [`QueryConnection`] trait; an implementation for
//! [`rusqlite::Connection`] is provided.

pub mod binder;
pub mod coercion;
pub mod connection;
pub mod error;
pub mod placeholder;
pub mod sqlite;
pub mod value;

pub use binder::{DEFAULT_COMMAND_TIMEOUT, bind_lookup_data, bind_parameters, bind_report_data};
pub use coercion::coerce;
pub use connection::QueryConnection;
pub use error::{BindError, CoercionError, QueryError};
pub use placeholder::scan_placeholders;
pub use value::BoundValue;
