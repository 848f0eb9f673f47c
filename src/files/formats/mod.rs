//! Container format handlers
//!
//! Each handler walks its container and hands embedded EXIF and XMP payloads
//! to the decoders.

#[cfg(feature = "jpeg")]
pub mod jpeg;
