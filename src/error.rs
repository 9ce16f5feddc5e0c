// src/error.rs
use reportdef_binder::BindError;
use reportdef_parser::ParseError;
use reportdef_render_core::RenderError;
use std::path::PathBuf;
use thiserror::Error;

/// Every failure a report can surface, from loading through rendering.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Argument '{0}' must not be empty")]
    ArgumentNull(&'static str),

    #[error("Unable to locate the report definition file '{}'", .0.display())]
    FileNotFound(PathBuf),

    #[error("The dataset name '{0}' specified does not exist")]
    DatasetNotFound(String),

    #[error("The report parameter '{0}' does not exist")]
    ParameterNotFound(String),

    #[error("Invalid value for report parameter '{parameter}': {reason}")]
    InvalidParameterValue { parameter: String, reason: String },

    #[error("Parsing failed: {0}")]
    Parse(#[from] ParseError),

    #[error("Binding failed: {0}")]
    Bind(#[from] BindError),

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReportError {
    pub(crate) fn invalid_value(parameter: &str, reason: impl Into<String>) -> Self {
        ReportError::InvalidParameterValue { parameter: parameter.to_string(), reason: reason.into() }
    }
}

pub type Result<T, E = ReportError> = std::result::Result<T, E>;
