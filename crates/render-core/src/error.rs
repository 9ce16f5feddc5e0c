use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unknown render format '{0}'. Supported: CSV, Excel, Image, PDF")]
    UnknownFormat(String),
    #[error("No rendering engine is configured for {0} output")]
    NoEngine(String),
    #[error("The report definition has not been loaded into the rendering engine")]
    DefinitionNotLoaded,
    #[error("Failed to serialize engine request: {0}")]
    Request(#[from] serde_json::Error),
    #[error("Rendering engine failed: {0}")]
    Engine(String),
}
