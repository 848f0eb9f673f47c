//! File handler registry
//!
//! Handlers can be looked up by file extension or by content detection.

use crate::core::diagnostics::Diagnostics;
use crate::core::error::MetaResult;
use crate::core::options::ParseOptions;
use crate::files::handler::FileHandler;
use crate::types::record::MetadataRecord;

/// Container formats the crate knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ImageFormat {
    /// JPEG/JFIF/EXIF
    Jpeg,
    /// No handler recognised the data
    Unsupported,
}

impl ImageFormat {
    /// Short display name
    pub fn name(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "JPEG",
            ImageFormat::Unsupported => "unsupported",
        }
    }
}

/// Enum of supported file handlers
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum Handler {
    /// JPEG container
    #[cfg(feature = "jpeg")]
    Jpeg(crate::files::formats::jpeg::JpegHandler),
}

impl Handler {
    /// The format this handler decodes
    pub fn format(&self) -> ImageFormat {
        match *self {
            #[cfg(feature = "jpeg")]
            Handler::Jpeg(_) => ImageFormat::Jpeg,
        }
    }
}

impl FileHandler for Handler {
    fn can_handle(&self, data: &[u8]) -> bool {
        match *self {
            #[cfg(feature = "jpeg")]
            Handler::Jpeg(ref h) => h.can_handle(data),
        }
    }

    fn read_metadata(
        &self,
        data: &[u8],
        options: &ParseOptions,
        diag: &mut Diagnostics,
    ) -> MetaResult<MetadataRecord> {
        match *self {
            #[cfg(feature = "jpeg")]
            Handler::Jpeg(ref h) => h.read_metadata(data, options, diag),
        }
    }

    fn format_name(&self) -> &'static str {
        match *self {
            #[cfg(feature = "jpeg")]
            Handler::Jpeg(ref h) => h.format_name(),
        }
    }

    fn extensions(&self) -> &'static [&'static str] {
        match *self {
            #[cfg(feature = "jpeg")]
            Handler::Jpeg(ref h) => h.extensions(),
        }
    }
}

/// Registry for file format handlers
#[derive(Debug, Clone)]
pub struct HandlerRegistry {
    handlers: Vec<Handler>,
}

impl HandlerRegistry {
    /// Create a new handler registry with default handlers registered
    pub fn new() -> Self {
        let mut registry = Self {
            handlers: Vec::new(),
        };
        registry.register_defaults();
        registry
    }

    /// Register a file handler
    pub fn register(&mut self, handler: Handler) {
        self.handlers.push(handler);
    }

    fn register_defaults(&mut self) {
        #[cfg(feature = "jpeg")]
        self.register(Handler::Jpeg(crate::files::formats::jpeg::JpegHandler));
    }

    /// Find a handler by file extension, case-insensitively
    pub fn find_by_extension(&self, extension: &str) -> Option<&Handler> {
        self.handlers.iter().find(|h| {
            h.extensions()
                .iter()
                .any(|e| e.eq_ignore_ascii_case(extension))
        })
    }

    /// Find the first handler whose `can_handle` accepts `data`
    pub fn find_by_detection(&self, data: &[u8]) -> Option<&Handler> {
        self.handlers.iter().find(|h| h.can_handle(data))
    }

    /// Get all registered handlers
    pub fn handlers(&self) -> &[Handler] {
        &self.handlers
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
