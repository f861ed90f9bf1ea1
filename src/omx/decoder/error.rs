use crate::omx::coerce::ScalarKind;

/// Errors that can occur while decoding an OMX document
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Unbalanced tags, premature end of input or an unexpected root element
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// A leaf value could not be coerced to its declared kind
    #[error("Invalid value in <{tag}>: cannot read {text:?} as {kind}")]
    InvalidValue {
        /// Element the value belongs to
        tag: String,
        /// The offending raw text
        text: String,
        /// Kind declared by the registry
        kind: ScalarKind,
    },

    /// Error parsing XML
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 encoding error in names or text content
    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

impl DecodeError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedDocument(message.into())
    }

    pub(crate) fn invalid_value(tag: &str, error: crate::omx::coerce::CoercionError) -> Self {
        Self::InvalidValue {
            tag: tag.to_owned(),
            text: error.text,
            kind: error.kind,
        }
    }
}
