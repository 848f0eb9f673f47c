//! # metakit
//!
//! Pure Rust extraction of capture date, GPS position, camera details and
//! keywords from JPEG images.
//!
//! Three nested formats are decoded:
//! - the JPEG marker stream, to find the APP1 segments
//! - EXIF, a TIFF directory structure with its own byte order
//! - XMP, an RDF/XML packet in UTF-8 or UTF-16
//!
//! Decoding never fails on bad input. Broken substructures are skipped and
//! reported as [`Warning`]s (also logged through the `log` crate); the
//! record keeps everything else.
//!
//! ## Quick Start
//!
//! ```rust
//! use metakit::{extract_metadata, extract_metadata_with, ParseOptions};
//!
//! let bytes = [0xFF, 0xD8, 0xFF, 0xD9];
//! let record = extract_metadata(&bytes);
//! assert!(record.date.is_none());
//!
//! let extraction = extract_metadata_with(b"not an image", &ParseOptions::default());
//! assert!(extraction.metadata.is_empty());
//! assert_eq!(extraction.warnings.len(), 1);
//! ```
//!
//! ## Features
//!
//! - `jpeg` (default): the JPEG container handler
//! - `serde`: `Serialize` for [`MetadataRecord`], [`Extraction`] and [`Warning`]

#![warn(missing_docs)]

pub mod core;
pub mod exif;
pub mod files;
pub mod types;
pub mod utils;
pub mod xmp;

pub use crate::core::{ByteCursor, Diagnostics, Endianness, MetaError, MetaResult, ParseOptions};
pub use crate::core::{Stage, Warning};
pub use crate::exif::ExifData;
pub use crate::files::{
    extract_metadata, extract_metadata_from_reader, extract_metadata_with, sniff_format,
    Extraction, FileHandler, HandlerRegistry, ImageFormat,
};
pub use crate::types::MetadataRecord;
pub use crate::utils::DateTime;
pub use crate::xmp::XmpPacket;
