use crate::format::RenderFormat;
use reportdef_types::DataTable;
use serde::{Deserialize, Serialize};

/// A dataset handed to the rendering engine under its dataset name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDataSource {
    pub name: String,
    pub table: DataTable,
}

/// A parameter value handed to the rendering engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportParameterValue {
    pub name: String,
    pub values: Vec<String>,
}

/// Everything the engine needs for one render call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineRequest {
    pub format: RenderFormat,
    pub device_info: String,
    pub data_sources: Vec<ReportDataSource>,
    pub parameters: Vec<ReportParameterValue>,
}

/// What a rendering engine returns. Only `content` and `mime_type` reach the
/// caller; the rest is informational.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineOutput {
    pub content: Vec<u8>,
    pub mime_type: String,
    pub encoding: Option<String>,
    pub file_name_extension: String,
    pub streams: Vec<String>,
    pub warnings: Vec<String>,
}

/// Rendered report content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderResult {
    pub content: Vec<u8>,
    pub mime_type: String,
}
