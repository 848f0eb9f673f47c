//! EXIF segment decoding
//!
//! An APP1/EXIF payload is the 6-byte signature `Exif\0\0` followed by a
//! complete TIFF structure:
//!
//! ```text
//! Bytes 0-1: Byte order (0x4949 = "II" little-endian, 0x4D4D = "MM" big-endian)
//! Bytes 2-3: Check value 0x002A
//! Bytes 4-7: Offset to the first IFD
//! ```
//!
//! The TIFF header is the base for every offset inside the structure, so the
//! decoder works on a sub-slice that starts there.

use crate::core::cursor::{ByteCursor, Endianness};
use crate::core::diagnostics::{Diagnostics, Stage};
use crate::core::error::{MetaError, MetaResult};
use crate::core::options::ParseOptions;
use crate::exif::ifd::{IfdId, IfdTree, IfdWalker};
use crate::exif::tags;
use crate::exif::value::Value;
use crate::types::record::MetadataRecord;
use crate::utils::datetime::DateTime;

/// Signature opening an APP1/EXIF payload
pub const EXIF_SIGNATURE: &[u8] = b"Exif\0\0";

/// Byte order marker for little-endian TIFF ("II")
const BYTE_ORDER_INTEL: u16 = 0x4949;

/// Byte order marker for big-endian TIFF ("MM")
const BYTE_ORDER_MOTOROLA: u16 = 0x4D4D;

/// TIFF check value following the byte order marker
const TIFF_CHECK_VALUE: u16 = 0x002A;

/// Decoded EXIF data of one segment
#[derive(Debug, Clone, PartialEq)]
pub struct ExifData {
    endianness: Endianness,
    tree: IfdTree,
}

impl ExifData {
    /// Decode an APP1/EXIF payload, signature included
    ///
    /// A bad signature, byte order marker or check value fails the whole
    /// segment. Problems inside directories are recorded in `diag` and only
    /// drop the affected entries.
    pub fn decode(
        segment: &[u8],
        options: &ParseOptions,
        diag: &mut Diagnostics,
    ) -> MetaResult<Self> {
        let Some(tiff) = segment.strip_prefix(EXIF_SIGNATURE) else {
            return Err(MetaError::malformed("missing Exif signature"));
        };

        let mut cursor = ByteCursor::new(tiff);
        let endianness = match cursor.read_u16()? {
            BYTE_ORDER_INTEL => Endianness::LittleEndian,
            BYTE_ORDER_MOTOROLA => Endianness::BigEndian,
            other => {
                return Err(MetaError::malformed(format!(
                    "invalid TIFF byte order marker {other:#06x}"
                )))
            }
        };
        cursor.set_endianness(endianness);

        let check = cursor.read_u16()?;
        if check != TIFF_CHECK_VALUE {
            return Err(MetaError::malformed(format!(
                "invalid TIFF check value {check:#06x}"
            )));
        }
        let first_ifd = cursor.read_u32()? as usize;
        log::debug!("TIFF header: {endianness:?}, first IFD at {first_ifd}");

        let mut walker = IfdWalker::new(cursor, options, diag);
        walker.walk_chain(first_ifd);

        Ok(Self {
            endianness,
            tree: walker.into_tree(),
        })
    }

    /// Byte order declared by the TIFF header
    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Every decoded directory
    pub fn tree(&self) -> &IfdTree {
        &self.tree
    }

    /// Look up a tag in one directory
    pub fn get(&self, ifd: IfdId, tag: u16) -> Option<&Value> {
        self.tree.get(ifd, tag)
    }

    /// Signed decimal latitude and longitude from the GPS directory
    ///
    /// `Ok(None)` when any of the four position tags is missing; an error
    /// when they are present but unusable.
    pub fn gps_coordinates(&self) -> MetaResult<Option<(f64, f64)>> {
        let gps = move |tag| self.get(IfdId::Gps, tag);
        let (Some(lat), Some(lat_ref), Some(lon), Some(lon_ref)) = (
            gps(tags::GPS_LATITUDE),
            gps(tags::GPS_LATITUDE_REF),
            gps(tags::GPS_LONGITUDE),
            gps(tags::GPS_LONGITUDE_REF),
        ) else {
            return Ok(None);
        };

        let latitude = dms_to_decimal(lat, reference(lat_ref)?, 'S')?;
        let longitude = dms_to_decimal(lon, reference(lon_ref)?, 'W')?;
        Ok(Some((latitude, longitude)))
    }

    /// Altitude in metres, negative below sea level
    ///
    /// `Ok(None)` when the tag is missing or not numeric; an error when it
    /// does not divide to a finite number.
    pub fn gps_altitude(&self) -> MetaResult<Option<f64>> {
        let Some(altitude) = self
            .get(IfdId::Gps, tags::GPS_ALTITUDE)
            .and_then(Value::as_f64)
        else {
            return Ok(None);
        };
        if !altitude.is_finite() {
            return Err(MetaError::malformed(format!(
                "GPS altitude {altitude} is not finite"
            )));
        }
        let below = self
            .get(IfdId::Gps, tags::GPS_ALTITUDE_REF)
            .and_then(|v| match v {
                Value::Undefined(bytes) => bytes.first().map(|&b| u32::from(b)),
                other => other.as_u32(),
            })
            == Some(1);
        Ok(Some(if below { -altitude } else { altitude }))
    }

    /// Capture date: DateTimeOriginal, else DateTimeDigitized
    ///
    /// Both are looked up in the EXIF directory first and the primary one
    /// second. An unparseable candidate falls through to the next one.
    pub fn capture_date(&self) -> MetaResult<Option<DateTime>> {
        let mut last_error = None;
        for tag in [tags::DATE_TIME_ORIGINAL, tags::DATE_TIME_DIGITIZED] {
            let Some(value) = self
                .get(IfdId::Exif, tag)
                .or_else(|| self.get(IfdId::Primary(0), tag))
            else {
                continue;
            };
            let Some(text) = value.as_str() else {
                last_error = Some(MetaError::malformed(format!(
                    "date tag {tag:#06x} is not ASCII"
                )));
                continue;
            };
            match DateTime::parse_exif(text) {
                Ok(date) => return Ok(Some(date)),
                Err(e) => last_error = Some(e),
            }
        }
        match last_error {
            Some(e) => Err(e),
            None => Ok(None),
        }
    }

    /// Copy what this segment knows into `record`
    ///
    /// Fields already set are left alone. A broken GPS directory does not
    /// stop the date from being filled in, and the other way round.
    pub fn apply_to(&self, record: &mut MetadataRecord, diag: &mut Diagnostics) {
        if record.date.is_none() {
            match self.capture_date() {
                Ok(date) => record.date = date,
                Err(e) => diag.warn(Stage::Exif, format!("capture date ignored: {e}")),
            }
        }

        if record.latitude.is_none() && record.longitude.is_none() {
            match self.gps_coordinates() {
                Ok(Some((latitude, longitude))) => {
                    record.latitude = Some(latitude);
                    record.longitude = Some(longitude);
                }
                Ok(None) => {}
                Err(e) => diag.warn(Stage::Exif, format!("GPS position ignored: {e}")),
            }
        }
        if record.altitude.is_none() {
            match self.gps_altitude() {
                Ok(altitude) => record.altitude = altitude,
                Err(e) => diag.warn(Stage::Exif, format!("GPS altitude ignored: {e}")),
            }
        }

        let primary_text = move |tag| {
            self.get(IfdId::Primary(0), tag)
                .and_then(Value::as_str)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        if record.camera_make.is_none() {
            record.camera_make = primary_text(tags::MAKE);
        }
        if record.camera_model.is_none() {
            record.camera_model = primary_text(tags::MODEL);
        }
        if record.orientation.is_none() {
            record.orientation = self
                .get(IfdId::Primary(0), tags::ORIENTATION)
                .and_then(Value::as_u32)
                .and_then(|v| u16::try_from(v).ok());
        }
    }
}

/// The first character of a GPS reference tag (`N`, `S`, `E`, `W`)
fn reference(value: &Value) -> MetaResult<char> {
    value
        .as_str()
        .and_then(|s| s.trim().chars().next())
        .map(|c| c.to_ascii_uppercase())
        .ok_or_else(|| MetaError::malformed(format!("GPS reference '{value}' is not a letter")))
}

/// `deg + min/60 + sec/3600`, negated when `reference` is `negative`
fn dms_to_decimal(value: &Value, reference: char, negative: char) -> MetaResult<f64> {
    let parts = value
        .to_f64_vec()
        .filter(|parts| parts.len() == 3)
        .ok_or_else(|| MetaError::malformed(format!("GPS coordinate {value} is not 3 numbers")))?;
    let decimal = parts[0] + parts[1] / 60.0 + parts[2] / 3600.0;
    if !decimal.is_finite() {
        return Err(MetaError::malformed(format!("GPS coordinate {value} is not finite")));
    }
    Ok(if reference == negative { -decimal } else { decimal })
}
