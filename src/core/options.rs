//! Options controlling a metadata decode
//!
//! Use the builder methods to configure options.
//!
//! # Example
//!
//! ```rust
//! use metakit::{extract_metadata_with, ParseOptions};
//!
//! let options = ParseOptions::default().skip_xmp().max_ifds(8);
//! let extraction = extract_metadata_with(&[0xFF, 0xD8, 0xFF, 0xD9], &options);
//! assert!(extraction.metadata.is_empty());
//! ```

/// Default cap on top-level plus sub-IFDs decoded from one EXIF segment
pub const DEFAULT_MAX_IFDS: usize = 32;

/// Default cap on sub-IFD nesting (EXIF → Interop is depth 2)
pub const DEFAULT_MAX_IFD_DEPTH: usize = 4;

/// Default cap on element nesting inside an XMP packet
pub const DEFAULT_MAX_RDF_DEPTH: usize = 64;

/// Options for a metadata decode
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Decode APP1/EXIF segments
    pub exif: bool,
    /// Decode APP1/XMP segments
    pub xmp: bool,
    /// Maximum number of IFDs decoded per EXIF segment
    pub max_ifds: usize,
    /// Maximum sub-IFD nesting depth
    pub max_ifd_depth: usize,
    /// Maximum element nesting depth inside an XMP packet
    pub max_rdf_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            exif: true,
            xmp: true,
            max_ifds: DEFAULT_MAX_IFDS,
            max_ifd_depth: DEFAULT_MAX_IFD_DEPTH,
            max_rdf_depth: DEFAULT_MAX_RDF_DEPTH,
        }
    }
}

impl ParseOptions {
    /// Do not decode EXIF segments.
    pub fn skip_exif(mut self) -> Self {
        self.exif = false;
        self
    }

    /// Do not decode XMP segments.
    pub fn skip_xmp(mut self) -> Self {
        self.xmp = false;
        self
    }

    /// Cap the number of IFDs decoded per EXIF segment.
    ///
    /// Hostile files can chain "next IFD" offsets forever; traversal stops
    /// with a warning once the cap is hit.
    pub fn max_ifds(mut self, max: usize) -> Self {
        self.max_ifds = max;
        self
    }

    /// Cap sub-IFD nesting depth.
    pub fn max_ifd_depth(mut self, max: usize) -> Self {
        self.max_ifd_depth = max;
        self
    }

    /// Cap element nesting depth inside XMP packets.
    pub fn max_rdf_depth(mut self, max: usize) -> Self {
        self.max_rdf_depth = max;
        self
    }
}
