//! A [`RenderEngine`] backed by an external renderer executable.
//!
//! Each render spawns the configured program, writes a JSON request to its
//! stdin and collects the rendered document from stdout. Lines printed to
//! stderr are reported as warnings; a non-zero exit status fails the render.
//!
//! Request shape:
//!
//! ```json
//! {
//!   "definition": "<Report ...>...</Report>",
//!   "format": "PDF",
//!   "deviceInfo": "<DeviceInfo><StartPage>0</StartPage></DeviceInfo>",
//!   "dataSources": [{ "name": "Sales", "table": { "name": "Sales", "columns": [], "rows": [] } }],
//!   "parameters": [{ "name": "Region", "values": ["North"] }]
//! }
//! ```

use crate::error::RenderError;
use crate::traits::RenderEngine;
use crate::types::{EngineOutput, EngineRequest};
use log::{debug, info};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;

#[derive(Serialize)]
struct CommandRequest<'a> {
    definition: &'a str,
    #[serde(flatten)]
    request: &'a EngineRequest,
}

#[derive(Debug, Clone)]
pub struct CommandEngine {
    program: PathBuf,
    args: Vec<String>,
    definition: Option<String>,
}

impl CommandEngine {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into(), args: Vec::new(), definition: None }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Builds an engine from a shell-style command line, splitting on
    /// whitespace. Returns `None` for a blank line.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let program = parts.next()?;
        Some(Self::new(program).with_args(parts))
    }
}

impl RenderEngine for CommandEngine {
    fn load_definition(&mut self, definition: &[u8]) -> Result<(), RenderError> {
        self.definition = Some(String::from_utf8_lossy(definition).into_owned());
        Ok(())
    }

    fn render(&mut self, request: &EngineRequest) -> Result<EngineOutput, RenderError> {
        let definition = self.definition.as_deref().ok_or(RenderError::DefinitionNotLoaded)?;
        let payload = serde_json::to_vec(&CommandRequest { definition, request })?;

        info!("Rendering {} with {}", request.format, self.program.display());
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Feed stdin from a thread so a renderer that streams output early
        // cannot block on a full stdout pipe.
        let writer = child.stdin.take().map(|mut stdin| {
            thread::spawn(move || -> std::io::Result<()> {
                stdin.write_all(&payload)?;
                stdin.flush()
            })
        });

        let output = child.wait_with_output()?;
        let written = match writer {
            Some(handle) => handle
                .join()
                .map_err(|_| RenderError::Engine("stdin writer thread panicked".into()))?,
            None => Ok(()),
        };

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            return Err(RenderError::Engine(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                stderr.trim()
            )));
        }
        written?;

        let warnings: Vec<String> =
            stderr.lines().map(str::trim).filter(|l| !l.is_empty()).map(str::to_string).collect();
        debug!("Renderer produced {} byte(s), {} warning(s)", output.stdout.len(), warnings.len());

        Ok(EngineOutput {
            content: output.stdout,
            mime_type: request.format.mime_type().to_string(),
            encoding: None,
            file_name_extension: request.format.file_extension().to_string(),
            streams: Vec::new(),
            warnings,
        })
    }

    fn release(&mut self) {
        self.definition = None;
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::format::RenderFormat;

    fn request(format: RenderFormat) -> EngineRequest {
        EngineRequest {
            format,
            device_info: String::new(),
            data_sources: Vec::new(),
            parameters: Vec::new(),
        }
    }

    #[test]
    fn render_requires_loaded_definition() {
        let mut engine = CommandEngine::new("cat");
        let err = engine.render(&request(RenderFormat::Pdf)).unwrap_err();
        assert!(matches!(err, RenderError::DefinitionNotLoaded));
    }

    #[test]
    fn echoes_request_through_cat() {
        let mut engine = CommandEngine::new("cat");
        engine.load_definition(b"<Report/>").unwrap();
        let output = engine.render(&request(RenderFormat::Pdf)).unwrap();

        let echoed: serde_json::Value = serde_json::from_slice(&output.content).unwrap();
        assert_eq!(echoed["definition"], "<Report/>");
        assert_eq!(echoed["format"], "PDF");
        assert_eq!(output.mime_type, "application/pdf");
        assert_eq!(output.file_name_extension, "pdf");
    }

    #[test]
    fn non_zero_exit_is_an_engine_error() {
        let mut engine = CommandEngine::from_command_line("sh -c false").unwrap();
        engine.load_definition(b"<Report/>").unwrap();
        let err = engine.render(&request(RenderFormat::Excel)).unwrap_err();
        assert!(matches!(err, RenderError::Engine(_)));
    }

    #[test]
    fn blank_command_line_is_rejected() {
        assert!(CommandEngine::from_command_line("   ").is_none());
    }
}
