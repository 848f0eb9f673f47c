//! Error types for metadata decoding
//!
//! Every decoder in the crate returns [`MetaResult`]. Errors never reach the
//! callers of [`crate::extract_metadata`]: they are turned into warnings at
//! the nearest enclosing decoder.

use thiserror::Error;

/// Error types for metadata decoding
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MetaError {
    /// A read needed more bytes than the buffer holds
    #[error("Truncated data: needed {needed} bytes at offset {offset}, {available} available")]
    TruncatedData {
        /// Offset the read started at
        offset: usize,
        /// Number of bytes the read required
        needed: usize,
        /// Number of bytes left in the buffer
        available: usize,
    },

    /// A seek targeted a position outside the buffer
    #[error("Offset {offset} is out of range for a buffer of {len} bytes")]
    OutOfRange {
        /// Requested offset
        offset: usize,
        /// Buffer length
        len: usize,
    },

    /// Bad alignment/check values, unexpected XML shape, bad RDF nesting
    #[error("Malformed structure: {0}")]
    MalformedStructure(String),

    /// The file signature is not recognized
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// XML parse failure inside an XMP packet
    #[error("XML error: {0}")]
    Xml(String),

    /// IO error while draining a reader
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<quick_xml::Error> for MetaError {
    fn from(err: quick_xml::Error) -> Self {
        MetaError::Xml(err.to_string())
    }
}

impl MetaError {
    /// Shorthand for a [`MetaError::MalformedStructure`]
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        MetaError::MalformedStructure(msg.into())
    }
}

/// Result type alias for metadata decoding
pub type MetaResult<T> = Result<T, MetaError>;
