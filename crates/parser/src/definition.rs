use reportdef_types::{Dataset, Parameter};

/// Namespace assumed when the document declares none that looks like a
/// report-definition schema.
pub const DEFAULT_NAMESPACE: &str =
    "http://schemas.microsoft.com/sqlserver/reporting/2008/01/reportdefinition";

/// Substring that identifies a report-definition namespace URI.
pub const NAMESPACE_MARKER: &str = "/reportdefinition";

/// The binding-relevant content of a report-definition document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportDefinition {
    /// The namespace the document's elements were resolved against.
    pub namespace: String,
    /// Declared datasets in document order, followed by datasets synthesized
    /// from inline parameter values.
    pub datasets: Vec<Dataset>,
    pub parameters: Vec<Parameter>,
    /// Declared datasets referenced by a parameter's valid values. These are
    /// bound eagerly at load time, before any parameter value is known.
    pub lookup_datasets: Vec<String>,
}

impl ReportDefinition {
    pub fn dataset(&self, name: &str) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.name == name)
    }

    pub fn dataset_mut(&mut self, name: &str) -> Option<&mut Dataset> {
        self.datasets.iter_mut().find(|d| d.name == name)
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Datasets that feed the report body.
    pub fn primary_datasets(&self) -> impl Iterator<Item = &Dataset> {
        self.datasets.iter().filter(|d| d.is_report_data_source)
    }
}
