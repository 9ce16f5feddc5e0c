use crate::error::RenderError;
use crate::types::{EngineOutput, EngineRequest};

/// An external rendering engine that lays out and paginates a report.
///
/// The engine loads the raw definition document itself; the datasets and
/// parameter values extracted here are supplied with each render call.
pub trait RenderEngine {
    fn load_definition(&mut self, definition: &[u8]) -> Result<(), RenderError>;

    fn render(&mut self, request: &EngineRequest) -> Result<EngineOutput, RenderError>;

    /// Frees engine-side resources. Called once when the owning report is
    /// closed or dropped.
    fn release(&mut self) {}
}
