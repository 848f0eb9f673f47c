//! JPEG file format handler
//!
//! Walks the marker segments in front of the entropy-coded data:
//!
//! ```text
//! FF D8                      SOI, no length
//! FF xx LL LL payload...     marker, big-endian length including itself
//! ...
//! FF DA                      SOS, image data follows
//! ```
//!
//! Metadata lives in APP1 segments. Their payload starts with `Exif\0\0` for
//! EXIF or `http://ns.adobe.com/xap/1.0/\0` for XMP.

use crate::core::cursor::ByteCursor;
use crate::core::diagnostics::{Diagnostics, Stage};
use crate::core::error::{MetaError, MetaResult};
use crate::core::options::ParseOptions;
use crate::exif::data::{ExifData, EXIF_SIGNATURE};
use crate::files::handler::FileHandler;
use crate::types::record::MetadataRecord;
use crate::xmp::namespace::XMP_SIGNATURE;
use crate::xmp::packet::XmpPacket;

/// JPEG segment markers
const MARKER_SOI: u16 = 0xFFD8; // Start of Image
const MARKER_APP1: u16 = 0xFFE1;
const MARKER_SOS: u16 = 0xFFDA; // Start of Scan
const MARKER_EOI: u16 = 0xFFD9; // End of Image

/// JPEG file handler
#[derive(Debug, Clone, Copy, Default)]
pub struct JpegHandler;

impl FileHandler for JpegHandler {
    /// A JPEG starts with SOI and ends with EOI
    fn can_handle(&self, data: &[u8]) -> bool {
        data.len() >= 4
            && data.starts_with(&MARKER_SOI.to_be_bytes())
            && data.ends_with(&MARKER_EOI.to_be_bytes())
    }

    fn read_metadata(
        &self,
        data: &[u8],
        options: &ParseOptions,
        diag: &mut Diagnostics,
    ) -> MetaResult<MetadataRecord> {
        Self::scan(data, options, diag)
    }

    fn format_name(&self) -> &'static str {
        "JPEG"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["jpg", "jpeg", "jpe", "jfif"]
    }
}

impl JpegHandler {
    /// Scan the marker segments and decode every EXIF and XMP payload
    ///
    /// Only a missing SOI fails. A bad segment length stops the scan and
    /// keeps what was collected before it. EXIF values take precedence over
    /// XMP ones wherever both exist, whatever the segment order.
    pub fn scan(
        data: &[u8],
        options: &ParseOptions,
        diag: &mut Diagnostics,
    ) -> MetaResult<MetadataRecord> {
        let mut cursor = ByteCursor::new(data);
        let soi = cursor.read_u16()?;
        if soi != MARKER_SOI {
            return Err(MetaError::malformed(format!(
                "expected SOI marker, found {soi:#06x}"
            )));
        }

        let mut record = MetadataRecord::default();
        let mut packets = Vec::new();

        loop {
            let offset = cursor.position();
            let marker = match cursor.read_u16() {
                Ok(marker) => marker,
                Err(e) => {
                    diag.warn(Stage::Jpeg, format!("no SOS or EOI before end of data: {e}"));
                    break;
                }
            };
            if marker == MARKER_SOS || marker == MARKER_EOI {
                log::debug!("marker {marker:#06x} at {offset}, scan finished");
                break;
            }
            if marker >> 8 != 0xFF {
                diag.warn(Stage::Jpeg, format!("invalid marker {marker:#06x} at {offset}"));
                break;
            }

            let length = match cursor.read_u16() {
                Ok(length) => usize::from(length),
                Err(e) => {
                    diag.warn(Stage::Jpeg, format!("segment {marker:#06x} at {offset}: {e}"));
                    break;
                }
            };
            if length < 2 {
                diag.warn(
                    Stage::Jpeg,
                    format!("segment {marker:#06x} at {offset} has invalid length {length}"),
                );
                break;
            }
            let payload = match cursor.read_bytes(length - 2) {
                Ok(payload) => payload,
                Err(_) => {
                    diag.warn(
                        Stage::Jpeg,
                        format!(
                            "segment {marker:#06x} at {offset} overruns the buffer \
                             ({length} bytes declared, {} available)",
                            cursor.remaining() + 2
                        ),
                    );
                    break;
                }
            };
            log::trace!("segment {marker:#06x} at {offset}, {length} bytes");

            if marker == MARKER_APP1 {
                Self::read_app1(payload, options, &mut record, &mut packets, diag);
            }
        }

        for packet in &packets {
            packet.apply_to(&mut record, diag);
        }
        Ok(record)
    }

    /// Dispatch one APP1 payload by its signature
    fn read_app1(
        payload: &[u8],
        options: &ParseOptions,
        record: &mut MetadataRecord,
        packets: &mut Vec<XmpPacket>,
        diag: &mut Diagnostics,
    ) {
        let mut segment = ByteCursor::new(payload);

        if segment
            .peek_bytes(EXIF_SIGNATURE.len())
            .is_ok_and(|signature| signature == EXIF_SIGNATURE)
        {
            if !options.exif {
                log::debug!("EXIF segment skipped by options");
                return;
            }
            match ExifData::decode(payload, options, diag) {
                Ok(exif) => exif.apply_to(record, diag),
                Err(e) => diag.warn(Stage::Exif, format!("EXIF segment ignored: {e}")),
            }
            return;
        }

        let is_xmp = segment
            .read_string(false)
            .is_ok_and(|signature| signature == XMP_SIGNATURE.as_bytes());
        if !is_xmp {
            log::debug!("APP1 segment without a known signature skipped");
            return;
        }
        if !options.xmp {
            log::debug!("XMP segment skipped by options");
            return;
        }
        match XmpPacket::decode(payload, options, diag) {
            Ok(packet) => packets.push(packet),
            Err(e) => diag.warn(Stage::Xmp, format!("XMP segment ignored: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::datetime::DateTime;

    fn segment(marker: u16, payload: &[u8]) -> Vec<u8> {
        let mut bytes = marker.to_be_bytes().to_vec();
        bytes.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
        bytes.extend_from_slice(payload);
        bytes
    }

    fn jpeg(segments: &[Vec<u8>]) -> Vec<u8> {
        let mut bytes = MARKER_SOI.to_be_bytes().to_vec();
        for s in segments {
            bytes.extend_from_slice(s);
        }
        bytes.extend_from_slice(&MARKER_EOI.to_be_bytes());
        bytes
    }

    /// Little-endian TIFF with DateTimeOriginal in IFD0
    fn exif_payload(date: &str) -> Vec<u8> {
        let mut bytes = EXIF_SIGNATURE.to_vec();
        bytes.extend_from_slice(b"II\x2A\x00\x08\x00\x00\x00");
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&0x9003u16.to_le_bytes());
        bytes.extend_from_slice(&2u16.to_le_bytes());
        bytes.extend_from_slice(&20u32.to_le_bytes());
        bytes.extend_from_slice(&26u32.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(date.as_bytes());
        bytes.push(0);
        bytes
    }

    fn xmp_payload(attributes: &str) -> Vec<u8> {
        let mut bytes = XMP_SIGNATURE.as_bytes().to_vec();
        bytes.push(0);
        bytes.extend_from_slice(
            format!(
                r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
                            xmlns:dc="http://purl.org/dc/elements/1.1/"
                            xmlns:xmp="http://ns.adobe.com/xap/1.0/">
                     <rdf:Description {attributes}/>
                   </rdf:RDF>"#
            )
            .as_bytes(),
        );
        bytes
    }

    fn read(data: &[u8], options: &ParseOptions) -> (MetadataRecord, Diagnostics) {
        let mut diag = Diagnostics::new();
        let record = JpegHandler::scan(data, options, &mut diag).unwrap();
        (record, diag)
    }

    #[test]
    fn test_can_handle() {
        let handler = JpegHandler;
        assert!(handler.can_handle(&jpeg(&[])));
        assert!(!handler.can_handle(&[0xFF, 0xD8, 0xFF, 0xE0]));
        assert!(!handler.can_handle(&[0xFF, 0xD8, 0xD9]));
        assert!(!handler.can_handle(b"\x89PNG\r\n\x1a\n"));
    }

    #[test]
    fn test_minimal_jpeg() {
        let (record, diag) = read(&jpeg(&[]), &ParseOptions::default());
        assert!(record.is_empty());
        assert!(diag.is_empty());
    }

    #[test]
    fn test_invalid_jpeg() {
        let mut diag = Diagnostics::new();
        let invalid_data = [0x00, 0x01, 0x02, 0x03];
        let result = JpegHandler::scan(&invalid_data, &ParseOptions::default(), &mut diag);
        assert!(matches!(result, Err(MetaError::MalformedStructure(_))));
    }

    #[test]
    fn test_exif_date() {
        let data = jpeg(&[
            segment(0xFFE0, b"JFIF\0\x01\x01\0\0\x01\0\x01\0\0"),
            segment(MARKER_APP1, &exif_payload("2020:10:09 14:21:50")),
        ]);
        let (record, diag) = read(&data, &ParseOptions::default());
        assert!(diag.is_empty(), "{:?}", diag.warnings());
        assert_eq!(record.date, Some(DateTime::new(2020, 10, 9, 14, 21, 50)));
        assert_eq!(record.coordinates(), None);
        assert_eq!(record.tags, None);
    }

    #[test]
    fn test_unknown_app1_skipped() {
        let data = jpeg(&[
            segment(MARKER_APP1, b"http://ns.adobe.com/xmp/extension/\0ABCDEF"),
            segment(MARKER_APP1, b"no terminator here"),
            segment(MARKER_APP1, &xmp_payload(r#"dc:subject="kept""#)),
        ]);
        let (record, diag) = read(&data, &ParseOptions::default());
        assert!(diag.is_empty(), "{:?}", diag.warnings());
        assert_eq!(record.tags, Some(vec!["kept".to_string()]));
    }

    #[test]
    fn test_overrun_keeps_earlier_segments() {
        let mut data = MARKER_SOI.to_be_bytes().to_vec();
        data.extend_from_slice(&segment(MARKER_APP1, &exif_payload("2020:10:09 14:21:50")));
        data.extend_from_slice(&[0xFF, 0xE2, 0x40, 0x00, 0x01, 0x02]);
        data.extend_from_slice(&MARKER_EOI.to_be_bytes());

        let (record, diag) = read(&data, &ParseOptions::default());
        assert!(record.date.is_some());
        assert!(diag.contains(Stage::Jpeg, "overruns"));
    }

    #[test]
    fn test_short_length_stops_scan() {
        let mut data = MARKER_SOI.to_be_bytes().to_vec();
        data.extend_from_slice(&[0xFF, 0xE1, 0x00, 0x01]);
        data.extend_from_slice(&segment(MARKER_APP1, &exif_payload("2020:10:09 14:21:50")));
        data.extend_from_slice(&MARKER_EOI.to_be_bytes());

        let (record, diag) = read(&data, &ParseOptions::default());
        assert!(record.is_empty());
        assert!(diag.contains(Stage::Jpeg, "invalid length 1"));
    }

    #[test]
    fn test_scan_stops_at_sos() {
        let mut data = MARKER_SOI.to_be_bytes().to_vec();
        data.extend_from_slice(&MARKER_SOS.to_be_bytes());
        data.extend_from_slice(&segment(MARKER_APP1, &exif_payload("2020:10:09 14:21:50")));
        data.extend_from_slice(&MARKER_EOI.to_be_bytes());

        let (record, diag) = read(&data, &ParseOptions::default());
        assert!(record.is_empty());
        assert!(diag.is_empty());
    }

    #[test]
    fn test_exif_date_wins_over_xmp() {
        let data = jpeg(&[
            segment(
                MARKER_APP1,
                &xmp_payload(r#"xmp:CreateDate="1999-01-01T00:00:00""#),
            ),
            segment(MARKER_APP1, &exif_payload("2020:10:09 14:21:50")),
        ]);
        let (record, _) = read(&data, &ParseOptions::default());
        assert_eq!(record.date, Some(DateTime::new(2020, 10, 9, 14, 21, 50)));

        let (record, _) = read(&data, &ParseOptions::default().skip_exif());
        assert_eq!(record.date.map(|d| d.year), Some(1999));
    }

    #[test]
    fn test_skip_xmp() {
        let data = jpeg(&[segment(MARKER_APP1, &xmp_payload(r#"dc:subject="x""#))]);
        let (record, diag) = read(&data, &ParseOptions::default().skip_xmp());
        assert!(record.is_empty());
        assert!(diag.is_empty());
    }

    #[test]
    fn test_broken_exif_does_not_block_xmp() {
        let mut broken = EXIF_SIGNATURE.to_vec();
        broken.extend_from_slice(b"XX\x00\x2A");
        let data = jpeg(&[
            segment(MARKER_APP1, &broken),
            segment(MARKER_APP1, &xmp_payload(r#"dc:subject="still here""#)),
        ]);
        let (record, diag) = read(&data, &ParseOptions::default());
        assert!(diag.contains(Stage::Exif, "byte order"));
        assert_eq!(record.tags, Some(vec!["still here".to_string()]));
    }
}
