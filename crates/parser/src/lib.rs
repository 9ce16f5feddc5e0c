//! Report-definition parser.
//!
//! Extracts the datasets and report parameters of a report-definition
//! document. Only the subset of the schema needed for parameter and data
//! binding is read; layout elements are ignored and left to the rendering
//! engine, which loads the raw document on its own.

pub mod definition;
pub mod error;
pub mod parser;

pub use definition::{DEFAULT_NAMESPACE, NAMESPACE_MARKER, ReportDefinition};
pub use error::{Location, ParseError};
pub use parser::DefinitionParser;
