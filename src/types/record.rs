//! The metadata record returned to callers

use crate::utils::datetime::DateTime;

/// Metadata extracted from one image
///
/// Every field is optional: a field is set only when a decoder found usable
/// data for it.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MetadataRecord {
    /// Capture date (EXIF DateTimeOriginal/Digitized, else XMP CreateDate)
    pub date: Option<DateTime>,
    /// Latitude in signed decimal degrees, south negative
    pub latitude: Option<f64>,
    /// Longitude in signed decimal degrees, west negative
    pub longitude: Option<f64>,
    /// Altitude in metres, below sea level negative
    pub altitude: Option<f64>,
    /// Flat keywords (XMP `dc:subject`)
    pub tags: Option<Vec<String>>,
    /// Hierarchical keywords (XMP `lr:hierarchicalSubject`)
    pub hierarchical_tags: Option<Vec<String>>,
    /// Camera manufacturer (EXIF Make)
    pub camera_make: Option<String>,
    /// Camera model (EXIF Model)
    pub camera_model: Option<String>,
    /// EXIF orientation, 1 to 8
    pub orientation: Option<u16>,
}

impl MetadataRecord {
    /// Whether no field is set
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Latitude and longitude together, when both are known
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}
