//! Container formats and the extraction entry points
//!
//! The registry picks a [`FileHandler`] from the file contents; the handler
//! walks its container and feeds the EXIF and XMP decoders.

pub mod extract;
pub mod formats;
pub mod handler;
pub mod registry;

pub use extract::{
    extract_metadata, extract_metadata_from_reader, extract_metadata_with, sniff_format,
    Extraction,
};
#[cfg(feature = "jpeg")]
pub use formats::jpeg::JpegHandler;
pub use handler::FileHandler;
pub use registry::{Handler, HandlerRegistry, ImageFormat};
