//! Core rendering abstractions for report definitions.
//!
//! This crate provides:
//! - [`RenderFormat`] and its mapping onto rendering-engine invocations
//! - the [`RenderEngine`] trait that Excel, image and PDF output is delegated to
//! - the in-crate CSV writer
//! - [`CommandEngine`], an engine adapter that drives an external renderer process

mod command;
pub mod csv;
mod error;
mod format;
mod traits;
mod types;

pub use command::CommandEngine;
pub use error::RenderError;
pub use format::{EngineInvocation, RenderFormat};
pub use traits::RenderEngine;
pub use types::{
    EngineOutput, EngineRequest, RenderResult, ReportDataSource, ReportParameterValue,
};
