use crate::error::RenderError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output formats a report can be rendered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RenderFormat {
    #[serde(rename = "CSV")]
    Csv,
    Excel,
    Image,
    #[serde(rename = "PDF")]
    Pdf,
}

/// The engine-side name and device settings for one render call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineInvocation {
    pub format_name: &'static str,
    pub device_info: &'static str,
}

impl RenderFormat {
    pub const ALL: [RenderFormat; 4] =
        [RenderFormat::Csv, RenderFormat::Excel, RenderFormat::Image, RenderFormat::Pdf];

    pub fn name(&self) -> &'static str {
        match self {
            RenderFormat::Csv => "CSV",
            RenderFormat::Excel => "Excel",
            RenderFormat::Image => "Image",
            RenderFormat::Pdf => "PDF",
        }
    }

    /// How the rendering engine is invoked for this format. CSV is written
    /// in-crate and never reaches the engine.
    ///
    /// Image output is a JPEG of the first page; PDF output starts at the
    /// first page.
    pub fn engine_invocation(&self) -> Option<EngineInvocation> {
        match self {
            RenderFormat::Csv => None,
            RenderFormat::Excel => Some(EngineInvocation { format_name: "Excel", device_info: "" }),
            RenderFormat::Image => Some(EngineInvocation {
                format_name: "Image",
                device_info: "<DeviceInfo><OutputFormat>JPEG</OutputFormat><StartPage>0</StartPage></DeviceInfo>",
            }),
            RenderFormat::Pdf => Some(EngineInvocation {
                format_name: "PDF",
                device_info: "<DeviceInfo><StartPage>0</StartPage></DeviceInfo>",
            }),
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            RenderFormat::Csv => "text/csv",
            RenderFormat::Excel => "application/vnd.ms-excel",
            RenderFormat::Image => "image/jpeg",
            RenderFormat::Pdf => "application/pdf",
        }
    }

    pub fn file_extension(&self) -> &'static str {
        match self {
            RenderFormat::Csv => "csv",
            RenderFormat::Excel => "xls",
            RenderFormat::Image => "jpg",
            RenderFormat::Pdf => "pdf",
        }
    }
}

impl fmt::Display for RenderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RenderFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RenderFormat::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| RenderError::UnknownFormat(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_format_selectors() {
        assert_eq!("CSV".parse::<RenderFormat>().unwrap(), RenderFormat::Csv);
        assert_eq!("excel".parse::<RenderFormat>().unwrap(), RenderFormat::Excel);
        assert_eq!(" Pdf ".parse::<RenderFormat>().unwrap(), RenderFormat::Pdf);
        assert!(matches!("Word".parse::<RenderFormat>(), Err(RenderError::UnknownFormat(_))));
    }

    #[test]
    fn csv_is_not_delegated() {
        assert_eq!(RenderFormat::Csv.engine_invocation(), None);
    }

    #[test]
    fn image_is_first_page_jpeg() {
        let inv = RenderFormat::Image.engine_invocation().unwrap();
        assert_eq!(inv.format_name, "Image");
        assert!(inv.device_info.contains("<OutputFormat>JPEG</OutputFormat>"));
        assert!(inv.device_info.contains("<StartPage>0</StartPage>"));
    }

    #[test]
    fn excel_has_no_device_info() {
        let inv = RenderFormat::Excel.engine_invocation().unwrap();
        assert_eq!(inv, EngineInvocation { format_name: "Excel", device_info: "" });
    }

    #[test]
    fn serializes_as_engine_names() {
        assert_eq!(serde_json::to_string(&RenderFormat::Pdf).unwrap(), "\"PDF\"");
        assert_eq!(serde_json::to_string(&RenderFormat::Excel).unwrap(), "\"Excel\"");
    }
}
