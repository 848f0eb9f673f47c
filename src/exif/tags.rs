//! TIFF/EXIF tag ids and field types
//!
//! Only the tags this crate interprets are named here; every other tag is
//! still decoded and kept in the [`IfdTree`](super::IfdTree) under its raw id.

/// Camera manufacturer (primary IFD, ASCII)
pub const MAKE: u16 = 0x010F;
/// Camera model (primary IFD, ASCII)
pub const MODEL: u16 = 0x0110;
/// Image orientation (primary IFD, SHORT)
pub const ORIENTATION: u16 = 0x0112;

/// Pointer to the EXIF sub-IFD
pub const EXIF_IFD_POINTER: u16 = 0x8769;
/// Pointer to the GPS sub-IFD
pub const GPS_IFD_POINTER: u16 = 0x8825;
/// Pointer to the Interoperability sub-IFD
pub const INTEROP_IFD_POINTER: u16 = 0xA005;

/// Date/time the original image was taken (EXIF IFD, ASCII)
pub const DATE_TIME_ORIGINAL: u16 = 0x9003;
/// Date/time the image was created/digitized (EXIF IFD, ASCII)
pub const DATE_TIME_DIGITIZED: u16 = 0x9004;

/// `N` or `S` (GPS IFD)
pub const GPS_LATITUDE_REF: u16 = 0x0001;
/// Degrees, minutes, seconds as three RATIONALs (GPS IFD)
pub const GPS_LATITUDE: u16 = 0x0002;
/// `E` or `W` (GPS IFD)
pub const GPS_LONGITUDE_REF: u16 = 0x0003;
/// Degrees, minutes, seconds as three RATIONALs (GPS IFD)
pub const GPS_LONGITUDE: u16 = 0x0004;
/// 0 above sea level, 1 below (GPS IFD)
pub const GPS_ALTITUDE_REF: u16 = 0x0005;
/// Metres as a RATIONAL (GPS IFD)
pub const GPS_ALTITUDE: u16 = 0x0006;

/// TIFF field types
///
/// The discriminants are the on-disk type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum FieldType {
    /// 8-bit unsigned integer
    Byte = 1,
    /// 8-bit bytes holding 7-bit ASCII, NUL terminated
    Ascii = 2,
    /// 16-bit unsigned integer
    Short = 3,
    /// 32-bit unsigned integer
    Long = 4,
    /// Two LONGs: numerator, denominator
    Rational = 5,
    /// 8-bit signed integer
    SignedByte = 6,
    /// 8-bit opaque byte
    Undefined = 7,
    /// 16-bit signed integer
    SignedShort = 8,
    /// 32-bit signed integer
    SignedLong = 9,
    /// Two SLONGs: numerator, denominator
    SignedRational = 10,
    /// IEEE single precision
    Float = 11,
    /// IEEE double precision
    Double = 12,
}

impl FieldType {
    /// Map an on-disk type code, `None` for unknown codes
    pub fn from_u16(code: u16) -> Option<Self> {
        Some(match code {
            1 => FieldType::Byte,
            2 => FieldType::Ascii,
            3 => FieldType::Short,
            4 => FieldType::Long,
            5 => FieldType::Rational,
            6 => FieldType::SignedByte,
            7 => FieldType::Undefined,
            8 => FieldType::SignedShort,
            9 => FieldType::SignedLong,
            10 => FieldType::SignedRational,
            11 => FieldType::Float,
            12 => FieldType::Double,
            _ => return None,
        })
    }

    /// Size in bytes of one component
    pub fn component_size(self) -> usize {
        match self {
            FieldType::Byte | FieldType::Ascii | FieldType::SignedByte | FieldType::Undefined => 1,
            FieldType::Short | FieldType::SignedShort => 2,
            FieldType::Long | FieldType::SignedLong | FieldType::Float => 4,
            FieldType::Rational | FieldType::SignedRational | FieldType::Double => 8,
        }
    }
}

/// Whether `tag` points at a sub-IFD rather than carrying a value
pub fn is_ifd_pointer(tag: u16) -> bool {
    matches!(tag, EXIF_IFD_POINTER | GPS_IFD_POINTER | INTEROP_IFD_POINTER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_sizes() {
        let expected = [
            (1, 1),
            (2, 1),
            (3, 2),
            (4, 4),
            (5, 8),
            (6, 1),
            (7, 1),
            (8, 2),
            (9, 4),
            (10, 8),
            (11, 4),
            (12, 8),
        ];
        for (code, size) in expected {
            let ty = FieldType::from_u16(code).unwrap();
            assert_eq!(ty as u16, code);
            assert_eq!(ty.component_size(), size, "type {code}");
        }
    }

    #[test]
    fn test_unknown_type() {
        assert_eq!(FieldType::from_u16(0), None);
        assert_eq!(FieldType::from_u16(13), None);
    }

    #[test]
    fn test_pointer_tags() {
        assert!(is_ifd_pointer(EXIF_IFD_POINTER));
        assert!(is_ifd_pointer(GPS_IFD_POINTER));
        assert!(is_ifd_pointer(INTEROP_IFD_POINTER));
        assert!(!is_ifd_pointer(DATE_TIME_ORIGINAL));
    }
}
