// src/loader.rs
use crate::config::ReportOptions;
use crate::error::{ReportError, Result};
use crate::report::Report;
use log::info;
use reportdef_binder::{QueryConnection, bind_lookup_data};
use reportdef_parser::DefinitionParser;
use reportdef_render_core::RenderEngine;
use std::fs;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// A builder for loading a [`Report`] from a report-definition document.
///
/// Loading parses the document, fills the datasets behind parameter value
/// lists and hands the raw definition to the rendering engine, if any.
#[derive(Default)]
pub struct ReportLoader {
    options: ReportOptions,
    engine: Option<Box<dyn RenderEngine>>,
}

impl ReportLoader {
    /// Creates a loader with the default timeout and namespace and no engine.
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.options.command_timeout = timeout;
        self
    }

    pub fn with_default_namespace(mut self, namespace: &str) -> Self {
        self.options.default_namespace = namespace.to_string();
        self
    }

    /// Sets the engine that Excel, image and PDF output is delegated to.
    /// Without one, only CSV can be rendered.
    pub fn with_engine(mut self, engine: Box<dyn RenderEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    /// Loads a definition from its raw bytes.
    pub fn load<C: QueryConnection + ?Sized>(self, definition: &[u8], conn: &C) -> Result<Report> {
        if definition.is_empty() {
            return Err(ReportError::ArgumentNull("definition"));
        }

        let parser = DefinitionParser::new().with_default_namespace(self.options.default_namespace.as_str());
        let mut parsed = parser.parse_bytes(definition)?;

        bind_lookup_data(
            &mut parsed.datasets,
            &parsed.lookup_datasets,
            conn,
            self.options.command_timeout,
        )?;

        let mut engine = self.engine;
        if let Some(engine) = engine.as_mut() {
            engine.load_definition(definition)?;
        }

        Ok(Report::new(parsed, engine, self.options))
    }

    /// Loads a definition from a stream, reading it to the end.
    pub fn load_reader<R: Read, C: QueryConnection + ?Sized>(self, mut reader: R, conn: &C) -> Result<Report> {
        let mut definition = Vec::new();
        reader.read_to_end(&mut definition)?;
        self.load(&definition, conn)
    }

    /// Loads a definition file.
    pub fn load_file<P: AsRef<Path>, C: QueryConnection + ?Sized>(self, path: P, conn: &C) -> Result<Report> {
        let path = path.as_ref();
        if path.as_os_str().to_string_lossy().trim().is_empty() {
            return Err(ReportError::ArgumentNull("path"));
        }
        if !path.is_file() {
            return Err(ReportError::FileNotFound(path.to_path_buf()));
        }
        info!("Loading report definition from '{}'", path.display());
        let definition = fs::read(path)?;
        self.load(&definition, conn)
    }
}
