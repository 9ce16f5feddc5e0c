use thiserror::Error;

/// A position in the source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub col: usize,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.col)
    }
}

impl From<roxmltree::TextPos> for Location {
    fn from(pos: roxmltree::TextPos) -> Self {
        Location { line: pos.row as usize, col: pos.col as usize }
    }
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("XML parsing error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("<{element}> at {location} is missing the '{attribute}' attribute")]
    MissingAttribute { element: String, attribute: String, location: Location },

    #[error("<{parent}> at {location} is missing the <{element}> element")]
    MissingElement { parent: String, element: String, location: Location },

    #[error("Invalid boolean '{value}' in <{element}> at {location}")]
    InvalidBoolean { element: String, value: String, location: Location },

    #[error("Unknown data type '{value}' for parameter '{parameter}' at {location}")]
    UnknownDataType { parameter: String, value: String, location: Location },

    #[error("Dataset '{0}' is declared more than once")]
    DuplicateDataset(String),

    #[error("Report parameter '{0}' is declared more than once")]
    DuplicateParameter(String),
}
