//! TIFF/EXIF decoding
//!
//! Decodes the IFD tree embedded in an APP1/EXIF segment and derives the
//! capture date, GPS position and camera fields from it.

pub mod data;
pub mod ifd;
pub mod tags;
pub mod value;

pub use data::{ExifData, EXIF_SIGNATURE};
pub use ifd::{IfdId, IfdTree};
pub use tags::FieldType;
pub use value::Value;
