use crate::dataset::DatasetReference;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The declared data type of a report parameter.
///
/// The tags match the `<DataType>` element values of the report definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    String,
    Integer,
    /// Decimal number, bound with arbitrary precision.
    Float,
    DateTime,
    Boolean,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::String => "String",
            DataType::Integer => "Integer",
            DataType::Float => "Float",
            DataType::DateTime => "DateTime",
            DataType::Boolean => "Boolean",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "String" => Ok(DataType::String),
            "Integer" => Ok(DataType::Integer),
            "Float" => Ok(DataType::Float),
            "DateTime" => Ok(DataType::DateTime),
            "Boolean" => Ok(DataType::Boolean),
            other => Err(other.to_string()),
        }
    }
}

/// A report parameter declared in the definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    pub data_type: DataType,
    /// Display label shown when prompting for a value.
    pub prompt: String,
    /// `None` until a value has been assigned.
    pub values: Option<Vec<String>>,
    pub visible: bool,
    pub allow_blank: bool,
    pub nullable: bool,
    pub multi_value: bool,
    pub dataset_reference: Option<DatasetReference>,
}

impl Parameter {
    /// Creates a visible, single-valued parameter with no value set.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            prompt: String::new(),
            values: None,
            visible: true,
            allow_blank: false,
            nullable: false,
            multi_value: false,
            dataset_reference: None,
        }
    }

    /// Returns `true` when no value (or an empty value list) has been assigned.
    pub fn has_no_values(&self) -> bool {
        self.values.as_ref().is_none_or(|v| v.is_empty())
    }

    /// The first assigned value, if any.
    pub fn first_value(&self) -> Option<&str> {
        self.values.as_ref().and_then(|v| v.first()).map(String::as_str)
    }
}
