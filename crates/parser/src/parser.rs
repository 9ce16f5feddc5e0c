//! Extraction of datasets and report parameters from a definition document.

use crate::definition::{DEFAULT_NAMESPACE, NAMESPACE_MARKER, ReportDefinition};
use crate::error::{Location, ParseError};
use log::{debug, info, warn};
use reportdef_types::{
    ColumnType, DataTable, DataType, Dataset, DatasetReference, Parameter, available_values_name,
};
use roxmltree::{Document, Node};

/// Column names of a dataset synthesized from inline parameter values.
pub const VALUE_FIELD: &str = "ValueField";
pub const LABEL_FIELD: &str = "LabelField";

/// Parses report-definition documents.
#[derive(Debug, Clone)]
pub struct DefinitionParser {
    default_namespace: String,
}

impl Default for DefinitionParser {
    fn default() -> Self {
        Self { default_namespace: DEFAULT_NAMESPACE.to_string() }
    }
}

impl DefinitionParser {
    pub fn new() -> Self {
        Default::default()
    }

    /// Overrides the namespace used when the document declares no
    /// report-definition namespace. An empty string matches unqualified
    /// elements.
    pub fn with_default_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.default_namespace = namespace.into();
        self
    }

    /// Parses a raw document, skipping a UTF-8 byte-order mark if present.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<ReportDefinition, ParseError> {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        self.parse(std::str::from_utf8(bytes)?)
    }

    pub fn parse(&self, text: &str) -> Result<ReportDefinition, ParseError> {
        let doc = Document::parse(text)?;
        let namespace = detect_namespace(doc.root_element())
            .unwrap_or_else(|| self.default_namespace.clone());
        debug!("Resolving report definition against namespace '{}'", namespace);

        let reader = ElementReader { doc: &doc, ns: &namespace };
        let mut definition = ReportDefinition { namespace: namespace.clone(), ..Default::default() };

        for node in reader.descendants(doc.root(), "DataSet") {
            let dataset = reader.read_dataset(node)?;
            if definition.dataset(&dataset.name).is_some() {
                return Err(ParseError::DuplicateDataset(dataset.name));
            }
            definition.datasets.push(dataset);
        }

        for node in reader.descendants(doc.root(), "ReportParameter") {
            let parameter = reader.read_parameter(node, &mut definition)?;
            if definition.parameter(&parameter.name).is_some() {
                return Err(ParseError::DuplicateParameter(parameter.name));
            }
            definition.parameters.push(parameter);
        }

        info!(
            "Parsed report definition: {} dataset(s), {} parameter(s), {} lookup dataset(s)",
            definition.datasets.len(),
            definition.parameters.len(),
            definition.lookup_datasets.len()
        );
        Ok(definition)
    }
}

/// Scans the root element's namespace declarations and attributes for a
/// value that looks like a report-definition schema URI.
fn detect_namespace(root: Node<'_, '_>) -> Option<String> {
    for ns in root.namespaces() {
        if ns.uri().contains(NAMESPACE_MARKER) {
            return Some(ns.uri().to_string());
        }
    }
    root.attributes()
        .map(|attr| attr.value())
        .find(|value| value.contains(NAMESPACE_MARKER))
        .map(str::to_string)
}

fn parse_bool(text: &str) -> Option<bool> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Namespace-aware element access over a parsed document.
struct ElementReader<'d, 'input> {
    doc: &'d Document<'input>,
    ns: &'d str,
}

impl<'d, 'input> ElementReader<'d, 'input> {
    fn is(&self, node: Node<'_, '_>, local: &str) -> bool {
        node.is_element()
            && node.tag_name().name() == local
            && node.tag_name().namespace().unwrap_or("") == self.ns
    }

    fn location(&self, node: Node<'_, '_>) -> Location {
        self.doc.text_pos_at(node.range().start).into()
    }

    fn descendants(
        &self,
        node: Node<'d, 'input>,
        local: &'static str,
    ) -> impl Iterator<Item = Node<'d, 'input>> + '_ {
        node.descendants().filter(move |n| self.is(*n, local))
    }

    fn child(&self, node: Node<'d, 'input>, local: &str) -> Option<Node<'d, 'input>> {
        node.children().find(|n| self.is(*n, local))
    }

    fn required_child(
        &self,
        node: Node<'d, 'input>,
        local: &str,
    ) -> Result<Node<'d, 'input>, ParseError> {
        self.child(node, local).ok_or_else(|| ParseError::MissingElement {
            parent: node.tag_name().name().to_string(),
            element: local.to_string(),
            location: self.location(node),
        })
    }

    fn attribute(&self, node: Node<'d, 'input>, name: &str) -> Result<String, ParseError> {
        node.attribute(name).map(str::to_string).ok_or_else(|| ParseError::MissingAttribute {
            element: node.tag_name().name().to_string(),
            attribute: name.to_string(),
            location: self.location(node),
        })
    }

    fn child_text(&self, node: Node<'d, 'input>, local: &str) -> Option<String> {
        self.child(node, local).map(text_content)
    }

    fn required_text(&self, node: Node<'d, 'input>, local: &str) -> Result<String, ParseError> {
        self.required_child(node, local).map(text_content)
    }

    /// Reads an optional boolean-valued child element.
    fn flag(&self, node: Node<'d, 'input>, local: &str) -> Result<Option<bool>, ParseError> {
        let Some(child) = self.child(node, local) else {
            return Ok(None);
        };
        let value = text_content(child);
        parse_bool(&value).map(Some).ok_or_else(|| ParseError::InvalidBoolean {
            element: local.to_string(),
            value,
            location: self.location(child),
        })
    }

    fn read_dataset(&self, node: Node<'d, 'input>) -> Result<Dataset, ParseError> {
        let name = self.attribute(node, "Name")?;
        let command_text = self
            .child(node, "Query")
            .and_then(|query| self.child_text(query, "CommandText"))
            .unwrap_or_default();
        Ok(Dataset::new(name, command_text))
    }

    fn read_parameter(
        &self,
        node: Node<'d, 'input>,
        definition: &mut ReportDefinition,
    ) -> Result<Parameter, ParseError> {
        let name = self.attribute(node, "Name")?;
        let type_node = self.required_child(node, "DataType")?;
        let data_type = text_content(type_node).parse::<DataType>().map_err(|value| {
            ParseError::UnknownDataType {
                parameter: name.clone(),
                value,
                location: self.location(type_node),
            }
        })?;

        let mut parameter = Parameter::new(name, data_type);
        parameter.prompt = self.child_text(node, "Prompt").unwrap_or_default();
        if let Some(hidden) = self.flag(node, "Hidden")? {
            parameter.visible = !hidden;
        }
        if let Some(allow_blank) = self.flag(node, "AllowBlank")? {
            parameter.allow_blank = allow_blank;
        }
        if let Some(nullable) = self.flag(node, "Nullable")? {
            parameter.nullable = nullable;
        }
        if let Some(multi_value) = self.flag(node, "MultiValue")? {
            parameter.multi_value = multi_value;
        }

        if let Some(valid_values) = self.child(node, "ValidValues") {
            if let Some(reference) = self.child(valid_values, "DataSetReference") {
                parameter.dataset_reference =
                    self.resolve_reference(reference, &parameter.name, definition)?;
            } else if let Some(values) = self.child(valid_values, "ParameterValues") {
                parameter.dataset_reference =
                    Some(self.synthesize_available_values(values, &parameter.name, definition));
            }
        }

        Ok(parameter)
    }

    /// Resolves a `DataSetReference`. The referenced dataset stops being a
    /// report data source and is queued for eager binding. A reference to an
    /// undeclared dataset is dropped with a warning.
    fn resolve_reference(
        &self,
        node: Node<'d, 'input>,
        parameter: &str,
        definition: &mut ReportDefinition,
    ) -> Result<Option<DatasetReference>, ParseError> {
        let reference = DatasetReference {
            dataset_name: self.required_text(node, "DataSetName")?,
            value_field: self.required_text(node, "ValueField")?,
            label_field: self.required_text(node, "LabelField")?,
        };

        let Some(dataset) = definition.dataset_mut(&reference.dataset_name) else {
            warn!(
                "Parameter '{}' references unknown dataset '{}' at {}; reference dropped",
                parameter,
                reference.dataset_name,
                self.location(node)
            );
            return Ok(None);
        };
        dataset.is_report_data_source = false;

        if !definition.lookup_datasets.contains(&reference.dataset_name) {
            definition.lookup_datasets.push(reference.dataset_name.clone());
        }
        Ok(Some(reference))
    }

    /// Builds (or reuses) the `<Parameter>AvailableValues` dataset from an
    /// inline `ParameterValues` list.
    fn synthesize_available_values(
        &self,
        node: Node<'d, 'input>,
        parameter: &str,
        definition: &mut ReportDefinition,
    ) -> DatasetReference {
        let dataset_name = available_values_name(parameter);

        if definition.dataset(&dataset_name).is_none() {
            let mut table = DataTable::new(&dataset_name)
                .with_column(VALUE_FIELD, ColumnType::Text)
                .with_column(LABEL_FIELD, ColumnType::Text);

            for pair in node.children().filter(|n| self.is(*n, "ParameterValue")) {
                let value = self.child_text(pair, "Value");
                let label = self.child_text(pair, "Label").or_else(|| value.clone());
                table.push_row(vec![value.into(), label.into()]);
            }
            debug!("Synthesized dataset '{}' with {} value(s)", dataset_name, table.row_count());

            definition.datasets.push(Dataset {
                name: dataset_name.clone(),
                command_text: String::new(),
                is_report_data_source: false,
                data: Some(table),
            });
        }

        let columns = definition
            .dataset(&dataset_name)
            .and_then(|d| d.data.as_ref())
            .map(|t| t.columns.as_slice())
            .unwrap_or_default();
        let value_field = columns.first().map_or(VALUE_FIELD, |c| c.name.as_str());
        let label_field = columns.get(1).map_or(value_field, |c| c.name.as_str());

        DatasetReference {
            dataset_name: dataset_name.clone(),
            value_field: value_field.to_string(),
            label_field: label_field.to_string(),
        }
    }
}

/// Concatenated text of all descendant text nodes.
fn text_content(node: Node<'_, '_>) -> String {
    node.descendants().filter(|n| n.is_text()).filter_map(|n| n.text()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reportdef_types::CellValue;

    const NS: &str = "http://schemas.microsoft.com/sqlserver/reporting/2016/01/reportdefinition";

    fn report(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="utf-8"?>
<Report xmlns="{NS}" xmlns:rd="http://schemas.microsoft.com/SQLServer/reporting/reportdesigner">
{body}
</Report>"#
        )
    }

    const SALES: &str = r#"
  <DataSets>
    <DataSet Name="Sales">
      <Query>
        <DataSourceName>Main</DataSourceName>
        <CommandText>SELECT Region, Total FROM Sales WHERE Region = @Region</CommandText>
      </Query>
    </DataSet>
    <DataSet Name="Regions">
      <Query><CommandText>SELECT Code, Name FROM Regions</CommandText></Query>
    </DataSet>
  </DataSets>
  <ReportParameters>
    <ReportParameter Name="Region">
      <DataType>String</DataType>
      <Prompt>Region</Prompt>
      <Hidden>false</Hidden>
      <AllowBlank>true</AllowBlank>
      <MultiValue>True</MultiValue>
      <ValidValues>
        <DataSetReference>
          <DataSetName>Regions</DataSetName>
          <ValueField>Code</ValueField>
          <LabelField>Name</LabelField>
        </DataSetReference>
      </ValidValues>
    </ReportParameter>
    <ReportParameter Name="Status">
      <DataType>Integer</DataType>
      <Prompt>Status</Prompt>
      <Hidden>true</Hidden>
      <Nullable>true</Nullable>
      <ValidValues>
        <ParameterValues>
          <ParameterValue><Value>1</Value><Label>Open</Label></ParameterValue>
          <ParameterValue><Value>2</Value><Label>Closed</Label></ParameterValue>
          <ParameterValue><Value>3</Value></ParameterValue>
        </ParameterValues>
      </ValidValues>
    </ReportParameter>
  </ReportParameters>"#;

    #[test]
    fn detects_declared_namespace() {
        let def = DefinitionParser::new().parse(&report(SALES)).unwrap();
        assert_eq!(def.namespace, NS);
        assert_eq!(def.datasets.len(), 3);
        assert_eq!(def.parameters.len(), 2);
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let err = DefinitionParser::new().parse_bytes(&[0xFF, 0xFE, b'<']).unwrap_err();
        assert!(matches!(err, ParseError::Utf8(_)));
    }

    #[test]
    fn falls_back_to_default_namespace() {
        let doc = r#"<Report xmlns="urn:other"><DataSets><DataSet Name="A"/></DataSets></Report>"#;
        let def = DefinitionParser::new().parse(doc).unwrap();
        assert_eq!(def.namespace, DEFAULT_NAMESPACE);
        assert!(def.datasets.is_empty());
    }

    #[test]
    fn empty_default_namespace_matches_unqualified_elements() {
        let doc = r#"<Report><DataSets><DataSet Name="A"/></DataSets></Report>"#;
        let def = DefinitionParser::new().with_default_namespace("").parse(doc).unwrap();
        assert_eq!(def.datasets.len(), 1);
        assert_eq!(def.datasets[0].command_text, "");
    }

    #[test]
    fn reads_parameter_flags() {
        let def = DefinitionParser::new().parse(&report(SALES)).unwrap();
        let region = def.parameter("Region").unwrap();
        assert_eq!(region.data_type, DataType::String);
        assert!(region.visible && region.allow_blank && region.multi_value);
        assert!(!region.nullable);
        assert_eq!(region.values, None);

        let status = def.parameter("Status").unwrap();
        assert_eq!(status.data_type, DataType::Integer);
        assert!(!status.visible);
        assert!(status.nullable && !status.allow_blank && !status.multi_value);
    }

    #[test]
    fn dataset_reference_marks_lookup_dataset() {
        let def = DefinitionParser::new().parse(&report(SALES)).unwrap();
        assert!(def.dataset("Sales").unwrap().is_report_data_source);
        assert!(!def.dataset("Regions").unwrap().is_report_data_source);
        assert_eq!(def.lookup_datasets, vec!["Regions".to_string()]);

        let reference = def.parameter("Region").unwrap().dataset_reference.clone().unwrap();
        assert_eq!(reference.dataset_name, "Regions");
        assert_eq!(reference.value_field, "Code");
        assert_eq!(reference.label_field, "Name");
        assert_eq!(def.primary_datasets().count(), 1);
    }

    #[test]
    fn inline_values_become_synthesized_dataset() {
        let def = DefinitionParser::new().parse(&report(SALES)).unwrap();
        let dataset = def.dataset("StatusAvailableValues").unwrap();
        assert!(!dataset.is_report_data_source);
        assert!(dataset.command_text.is_empty());

        let table = dataset.data.as_ref().unwrap();
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.cell(0, VALUE_FIELD), Some(&CellValue::from("1")));
        assert_eq!(table.cell(1, LABEL_FIELD), Some(&CellValue::from("Closed")));
        assert_eq!(table.cell(2, LABEL_FIELD), Some(&CellValue::from("3")));

        let reference = def.parameter("Status").unwrap().dataset_reference.clone().unwrap();
        assert_eq!(reference.value_field, VALUE_FIELD);
        assert_eq!(reference.label_field, LABEL_FIELD);
    }

    #[test]
    fn unknown_reference_is_dropped() {
        let body = r#"
  <ReportParameters>
    <ReportParameter Name="Region">
      <DataType>String</DataType>
      <Prompt>Region</Prompt>
      <ValidValues>
        <DataSetReference>
          <DataSetName>Missing</DataSetName>
          <ValueField>Code</ValueField>
          <LabelField>Name</LabelField>
        </DataSetReference>
      </ValidValues>
    </ReportParameter>
  </ReportParameters>"#;
        let def = DefinitionParser::new().parse(&report(body)).unwrap();
        assert_eq!(def.parameter("Region").unwrap().dataset_reference, None);
        assert!(def.lookup_datasets.is_empty());
    }

    #[test]
    fn reuses_existing_available_values_dataset() {
        let body = r#"
  <DataSets>
    <DataSet Name="ColourAvailableValues">
      <Query><CommandText>SELECT 1</CommandText></Query>
    </DataSet>
  </DataSets>
  <ReportParameters>
    <ReportParameter Name="Colour">
      <DataType>String</DataType>
      <ValidValues>
        <ParameterValues>
          <ParameterValue><Value>red</Value><Label>Red</Label></ParameterValue>
        </ParameterValues>
      </ValidValues>
    </ReportParameter>
  </ReportParameters>"#;
        let def = DefinitionParser::new().parse(&report(body)).unwrap();
        assert_eq!(def.datasets.len(), 1);
        assert_eq!(def.dataset("ColourAvailableValues").unwrap().command_text, "SELECT 1");
        let reference = def.parameter("Colour").unwrap().dataset_reference.clone().unwrap();
        assert_eq!(reference.dataset_name, "ColourAvailableValues");
    }

    #[test]
    fn rejects_invalid_boolean() {
        let body = r#"<ReportParameters><ReportParameter Name="P">
            <DataType>String</DataType><Hidden>yes</Hidden>
        </ReportParameter></ReportParameters>"#;
        let err = DefinitionParser::new().parse(&report(body)).unwrap_err();
        assert!(matches!(err, ParseError::InvalidBoolean { ref value, .. } if value == "yes"));
    }

    #[test]
    fn rejects_unknown_data_type() {
        let body = r#"<ReportParameters><ReportParameter Name="P">
            <DataType>Money</DataType>
        </ReportParameter></ReportParameters>"#;
        let err = DefinitionParser::new().parse(&report(body)).unwrap_err();
        assert!(matches!(err, ParseError::UnknownDataType { ref parameter, .. } if parameter == "P"));
    }

    #[test]
    fn rejects_duplicate_dataset() {
        let body = r#"<DataSets><DataSet Name="A"/><DataSet Name="A"/></DataSets>"#;
        let err = DefinitionParser::new().parse(&report(body)).unwrap_err();
        assert!(matches!(err, ParseError::DuplicateDataset(ref n) if n == "A"));
    }

    #[test]
    fn rejects_dataset_without_name() {
        let body = r#"<DataSets><DataSet/></DataSets>"#;
        let err = DefinitionParser::new().parse(&report(body)).unwrap_err();
        assert!(matches!(err, ParseError::MissingAttribute { ref attribute, .. } if attribute == "Name"));
    }

    #[test]
    fn rejects_malformed_xml() {
        let err = DefinitionParser::new().parse("<Report><DataSets></Report>").unwrap_err();
        assert!(matches!(err, ParseError::Xml(_)));
    }

    #[test]
    fn parse_bytes_skips_utf8_bom() {
        let mut bytes = b"\xEF\xBB\xBF".to_vec();
        bytes.extend_from_slice(report(SALES).as_bytes());
        let def = DefinitionParser::new().parse_bytes(&bytes).unwrap();
        assert_eq!(def.datasets.len(), 3);
    }
}
