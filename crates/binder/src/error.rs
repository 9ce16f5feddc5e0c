use reportdef_types::DataType;
use std::time::Duration;
use thiserror::Error;

/// Failure to turn a parameter's text value into a bindable value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoercionError {
    #[error("Value '{value}' of parameter '{parameter}' is not a valid {data_type}")]
    Format { parameter: String, data_type: DataType, value: String },

    #[error("Parameter '{0}' has no value and is not nullable")]
    MissingValue(String),
}

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Query exceeded the command timeout of {0:?}")]
    Timeout(Duration),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// A dataset could not be bound. The first failure aborts the whole pass.
#[derive(Error, Debug)]
pub enum BindError {
    #[error("Failed to bind parameters for dataset '{dataset}': {source}")]
    Coercion {
        dataset: String,
        #[source]
        source: CoercionError,
    },

    #[error("Query for dataset '{dataset}' failed: {source}")]
    Query {
        dataset: String,
        #[source]
        source: QueryError,
    },
}

impl BindError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, BindError::Query { source: QueryError::Timeout(_), .. })
    }
}
