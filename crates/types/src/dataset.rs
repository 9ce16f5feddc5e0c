use crate::table::DataTable;
use serde::{Deserialize, Serialize};

/// Suffix appended to a parameter name to form the dataset synthesized from
/// its inline list of valid values.
pub const AVAILABLE_VALUES_SUFFIX: &str = "AvailableValues";

/// Name of the dataset holding the inline valid values of `parameter_name`.
pub fn available_values_name(parameter_name: &str) -> String {
    format!("{parameter_name}{AVAILABLE_VALUES_SUFFIX}")
}

/// A named query declared by the report definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub name: String,
    /// Parameterized query text. Empty for synthesized datasets.
    pub command_text: String,
    /// `true` when the dataset feeds the report body, `false` when it only
    /// supplies the valid values of a parameter.
    pub is_report_data_source: bool,
    /// Materialized rows. `None` until bound or overridden.
    pub data: Option<DataTable>,
}

impl Dataset {
    /// A report-body dataset with no data yet.
    pub fn new(name: impl Into<String>, command_text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command_text: command_text.into(),
            is_report_data_source: true,
            data: None,
        }
    }

    pub fn has_command_text(&self) -> bool {
        !self.command_text.trim().is_empty()
    }
}

/// Links a parameter to the dataset that lists its valid values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetReference {
    pub dataset_name: String,
    /// Column holding the value submitted for the parameter.
    pub value_field: String,
    /// Column holding the display text.
    pub label_field: String,
}
