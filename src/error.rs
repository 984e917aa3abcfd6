use quick_xml::events::attributes::AttrError;
use std::fmt;

/// Errors returned while translating or reading PDML/PSML data
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PdmlError {
    /// No more data to read
    Eof,
    /// Data ended before the end of a fragment
    UnexpectedEof,
    /// Error while reading the underlying source
    ReadError,
    /// More data is needed. The parameter gives the number of missing bytes, if known (0 otherwise)
    Incomplete(usize),

    /// The XML is not well-formed, or does not have the expected PDML/PSML shape
    MalformedCapture(String),
    /// The requested field, column or layer does not exist
    FieldNotFound(String),
    /// A positional lookup went past the end of the collection
    IndexOutOfRange { index: usize, len: usize },

    /// The reader buffer cannot hold a complete fragment
    BufferTooSmall,
}

impl PdmlError {
    pub(crate) fn malformed<S: Into<String>>(msg: S) -> Self {
        PdmlError::MalformedCapture(msg.into())
    }

    /// Returns true if this error only signals a missing field, column or layer
    pub fn is_not_found(&self) -> bool {
        matches!(self, PdmlError::FieldNotFound(_))
    }
}

impl fmt::Display for PdmlError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PdmlError::Eof => write!(f, "End of file"),
            PdmlError::UnexpectedEof => write!(f, "Unexpected end of file"),
            PdmlError::ReadError => write!(f, "Read error"),
            PdmlError::Incomplete(n) => write!(f, "Incomplete read: {}", n),
            PdmlError::MalformedCapture(msg) => write!(f, "Malformed capture: {}", msg),
            PdmlError::FieldNotFound(name) => write!(f, "Field not found: {}", name),
            PdmlError::IndexOutOfRange { index, len } => {
                write!(f, "Index {} out of range (len {})", index, len)
            }
            PdmlError::BufferTooSmall => write!(f, "Buffer is too small"),
        }
    }
}

impl std::error::Error for PdmlError {}

impl From<quick_xml::Error> for PdmlError {
    fn from(e: quick_xml::Error) -> Self {
        PdmlError::MalformedCapture(format!("xml parsing error: {}", e))
    }
}

impl From<AttrError> for PdmlError {
    fn from(e: AttrError) -> Self {
        PdmlError::MalformedCapture(format!("xml attribute error: {}", e))
    }
}
