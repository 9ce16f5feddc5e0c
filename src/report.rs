use crate::config::ReportOptions;
use crate::error::{ReportError, Result};
use log::{debug, info, warn};
use reportdef_binder::{QueryConnection, bind_report_data};
use reportdef_parser::ReportDefinition;
use reportdef_render_core::{
    EngineRequest, RenderEngine, RenderError, RenderFormat, RenderResult, ReportDataSource,
    ReportParameterValue, csv,
};
use reportdef_types::{DataTable, Dataset, Parameter};
use std::fmt;
use std::fs;
use std::path::Path;

/// A loaded report definition, ready to take parameter values and render.
///
/// Lookup datasets are filled at load time. Report datasets stay empty until
/// [`Report::initialize_data_sources`] runs or data is supplied with
/// [`Report::set_data_source`].
pub struct Report {
    definition: ReportDefinition,
    engine: Option<Box<dyn RenderEngine>>,
    options: ReportOptions,
}

impl Report {
    pub(crate) fn new(
        definition: ReportDefinition,
        engine: Option<Box<dyn RenderEngine>>,
        options: ReportOptions,
    ) -> Self {
        Self { definition, engine, options }
    }

    /// The report-definition namespace the document was read with.
    pub fn namespace(&self) -> &str {
        &self.definition.namespace
    }

    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    pub fn datasets(&self) -> &[Dataset] {
        &self.definition.datasets
    }

    pub fn dataset(&self, name: &str) -> Option<&Dataset> {
        self.definition.dataset(name)
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.definition.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.definition.parameter(name)
    }

    /// A copy of a dataset's materialized rows, e.g. to list a parameter's
    /// valid values. `None` when the dataset is unknown or not bound yet.
    pub fn reference_data(&self, name: &str) -> Option<DataTable> {
        self.definition.dataset(name).and_then(|d| d.data.clone())
    }

    /// Replaces the rows of a dataset with caller-supplied data.
    pub fn set_data_source(&mut self, name: &str, table: DataTable) -> Result<()> {
        if name.trim().is_empty() {
            return Err(ReportError::ArgumentNull("dataset_name"));
        }
        let dataset = self
            .definition
            .dataset_mut(name)
            .ok_or_else(|| ReportError::DatasetNotFound(name.to_string()))?;
        debug!("Dataset '{}' supplied with {} row(s)", name, table.row_count());
        dataset.data = Some(table);
        Ok(())
    }

    /// Sets a single value. `None` clears a nullable parameter; the empty
    /// string counts as blank.
    pub fn set_parameter_value(&mut self, name: &str, value: Option<&str>) -> Result<()> {
        let parameter = self.parameter_mut(name)?;
        match value {
            None => clear(parameter),
            Some(value) => {
                if value.is_empty() && !parameter.allow_blank {
                    return Err(ReportError::invalid_value(name, "can not be blank"));
                }
                parameter.values = Some(vec![value.to_string()]);
                Ok(())
            }
        }
    }

    /// Sets a list of values. Whitespace-only entries count as blank and an
    /// empty list is treated like `None`.
    pub fn set_parameter_values(&mut self, name: &str, values: Option<Vec<String>>) -> Result<()> {
        let parameter = self.parameter_mut(name)?;
        let Some(values) = values.filter(|v| !v.is_empty()) else {
            return clear(parameter);
        };
        if !parameter.allow_blank && values.iter().any(|v| v.trim().is_empty()) {
            return Err(ReportError::invalid_value(name, "can not be blank"));
        }
        if values.len() > 1 && !parameter.multi_value {
            return Err(ReportError::invalid_value(
                name,
                format!("accepts a single value, {} given", values.len()),
            ));
        }
        parameter.values = Some(values);
        Ok(())
    }

    fn parameter_mut(&mut self, name: &str) -> Result<&mut Parameter> {
        if name.trim().is_empty() {
            return Err(ReportError::ArgumentNull("parameter_name"));
        }
        self.definition
            .parameters
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| ReportError::ParameterNotFound(name.to_string()))
    }

    /// Runs the query of every report dataset with the current parameter
    /// values. Returns the number of datasets bound.
    pub fn initialize_data_sources<C: QueryConnection + ?Sized>(&mut self, conn: &C) -> Result<usize> {
        let bound = bind_report_data(
            &mut self.definition.datasets,
            &self.definition.parameters,
            conn,
            self.options.command_timeout,
        )?;
        Ok(bound)
    }

    /// Renders the report. CSV is produced here; every other format goes
    /// through the configured engine.
    pub fn render(&mut self, format: RenderFormat) -> Result<RenderResult> {
        let Some(invocation) = format.engine_invocation() else {
            let content = csv::to_csv_bytes(
                self.definition.primary_datasets().filter_map(|d| d.data.as_ref()),
            );
            info!("Rendered CSV ({} bytes)", content.len());
            return Ok(RenderResult { content, mime_type: csv::MIME_TYPE.to_string() });
        };

        let request = EngineRequest {
            format,
            device_info: invocation.device_info.to_string(),
            data_sources: self
                .definition
                .primary_datasets()
                .map(|d| ReportDataSource {
                    name: d.name.clone(),
                    table: d.data.clone().unwrap_or_else(|| DataTable::new(d.name.as_str())),
                })
                .collect(),
            parameters: self
                .definition
                .parameters
                .iter()
                .filter_map(|p| {
                    p.values
                        .as_ref()
                        .map(|values| ReportParameterValue { name: p.name.clone(), values: values.clone() })
                })
                .collect(),
        };

        let engine = self
            .engine
            .as_mut()
            .ok_or_else(|| RenderError::NoEngine(invocation.format_name.to_string()))?;
        let output = engine.render(&request)?;

        debug!(
            "Engine output: encoding={:?}, extension='{}', {} stream(s)",
            output.encoding,
            output.file_name_extension,
            output.streams.len()
        );
        for warning in &output.warnings {
            warn!("{} render: {}", invocation.format_name, warning);
        }
        info!("Rendered {} ({} bytes)", invocation.format_name, output.content.len());
        Ok(RenderResult { content: output.content, mime_type: output.mime_type })
    }

    /// Renders the report and writes the content to `path`.
    pub fn render_to_file<P: AsRef<Path>>(&mut self, format: RenderFormat, path: P) -> Result<RenderResult> {
        let result = self.render(format)?;
        fs::write(path.as_ref(), &result.content)?;
        info!("Wrote {} to '{}'", result.mime_type, path.as_ref().display());
        Ok(result)
    }

    /// Releases the rendering engine and drops all definition state.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(mut engine) = self.engine.take() {
            engine.release();
        }
        self.definition.datasets.clear();
        self.definition.parameters.clear();
        self.definition.lookup_datasets.clear();
    }
}

impl fmt::Debug for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Report")
            .field("definition", &self.definition)
            .field("options", &self.options)
            .field("has_engine", &self.engine.is_some())
            .finish()
    }
}

impl Drop for Report {
    fn drop(&mut self) {
        self.release();
    }
}

fn clear(parameter: &mut Parameter) -> Result<()> {
    if !parameter.nullable {
        return Err(ReportError::invalid_value(&parameter.name, "is not nullable"));
    }
    parameter.values = None;
    Ok(())
}
