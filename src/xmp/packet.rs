//! APP1/XMP packet decoding
//!
//! The payload is the namespace signature, a NUL, then the packet text in
//! UTF-8 or UTF-16, optionally behind a byte order mark.

use crate::core::cursor::ByteCursor;
use crate::core::diagnostics::{Diagnostics, Stage};
use crate::core::error::{MetaError, MetaResult};
use crate::core::options::ParseOptions;
use crate::types::record::MetadataRecord;
use crate::utils::datetime::DateTime;
use crate::xmp::namespace::{ns, XMP_SIGNATURE};
use crate::xmp::node::{Node, StructureNode};
use crate::xmp::parser::parse_document;
use crate::xmp::rdf::RdfDecoder;

const BOM_UTF16: u64 = 0xFEFF;
const BOM_UTF16_SWAPPED: u64 = 0xFFFE;
const BOM_UTF8: &[u8] = &[0xEF, 0xBB, 0xBF];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextEncoding {
    Utf8,
    Utf16Be,
    Utf16Le,
}

/// Decoded XMP packet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmpPacket {
    graph: StructureNode,
}

impl XmpPacket {
    /// Decode an APP1/XMP payload, signature included
    ///
    /// Only a missing signature fails; XML and RDF problems are recorded in
    /// `diag` and leave out what they affect.
    pub fn decode(
        segment: &[u8],
        options: &ParseOptions,
        diag: &mut Diagnostics,
    ) -> MetaResult<Self> {
        let mut cursor = ByteCursor::new(segment);
        let signature = cursor.read_string(false)?;
        if signature != XMP_SIGNATURE.as_bytes() {
            return Err(MetaError::malformed("missing XMP signature"));
        }

        let encoding = detect_encoding(&mut cursor)?;
        log::debug!("XMP packet: {} bytes, {encoding:?}", cursor.remaining());
        let text = decode_text(cursor.rest(), encoding, diag);
        Ok(Self::from_xml(&text, options, diag))
    }

    /// Decode packet text that is already a string
    pub fn from_xml(xml: &str, options: &ParseOptions, diag: &mut Diagnostics) -> Self {
        let xml = xml.trim_end_matches(|c: char| c == '\0' || c.is_whitespace());
        let roots = parse_document(xml, options.max_rdf_depth, diag);
        let graph = RdfDecoder::new(diag).decode(&roots);
        Self { graph }
    }

    /// The merged property graph of every top-level Description
    pub fn graph(&self) -> &StructureNode {
        &self.graph
    }

    /// Look up a top-level property
    pub fn get_property(&self, namespace: &str, name: &str) -> Option<&Node> {
        self.graph.get_property(namespace, name)
    }

    /// Lightroom hierarchical keywords
    pub fn hierarchical_subjects(&self) -> Option<Vec<String>> {
        self.string_list(ns::LIGHTROOM, "hierarchicalSubject")
    }

    /// Dublin Core keywords
    pub fn subjects(&self) -> Option<Vec<String>> {
        self.string_list(ns::DC, "subject")
    }

    /// `xmp:CreateDate`, `Ok(None)` when absent
    pub fn create_date(&self) -> MetaResult<Option<DateTime>> {
        let Some(node) = self.get_property(ns::XMP, "CreateDate") else {
            return Ok(None);
        };
        let text = node
            .as_str()
            .ok_or_else(|| MetaError::malformed("xmp:CreateDate is not a simple value"))?;
        DateTime::parse(text).map(Some)
    }

    /// Copy what this packet knows into `record`, leaving set fields alone
    pub fn apply_to(&self, record: &mut MetadataRecord, diag: &mut Diagnostics) {
        if record.hierarchical_tags.is_none() {
            record.hierarchical_tags = self.hierarchical_subjects();
        }
        if record.tags.is_none() {
            record.tags = self.subjects();
        }
        if record.date.is_none() {
            match self.create_date() {
                Ok(date) => record.date = date,
                Err(e) => diag.warn(Stage::Xmp, format!("CreateDate ignored: {e}")),
            }
        }
    }

    fn string_list(&self, namespace: &str, name: &str) -> Option<Vec<String>> {
        let list: Vec<String> = self
            .get_property(namespace, name)?
            .to_string_list()?
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect();
        (!list.is_empty()).then_some(list)
    }
}

/// Consume a byte order mark, if any
fn detect_encoding(cursor: &mut ByteCursor<'_>) -> MetaResult<TextEncoding> {
    let encoding = match cursor.read_uint(2, true) {
        Ok(BOM_UTF16) => TextEncoding::Utf16Be,
        Ok(BOM_UTF16_SWAPPED) => TextEncoding::Utf16Le,
        _ => {
            if cursor.peek_bytes(3).is_ok_and(|bytes| bytes == BOM_UTF8) {
                cursor.skip(3)?;
            }
            return Ok(TextEncoding::Utf8);
        }
    };
    cursor.skip(2)?;
    Ok(encoding)
}

fn decode_text(bytes: &[u8], encoding: TextEncoding, diag: &mut Diagnostics) -> String {
    let from_bytes: fn([u8; 2]) -> u16 = match encoding {
        TextEncoding::Utf8 => {
            return match std::str::from_utf8(bytes) {
                Ok(text) => text.to_string(),
                Err(e) => {
                    diag.warn(Stage::Xmp, format!("packet is not valid UTF-8: {e}"));
                    String::from_utf8_lossy(bytes).into_owned()
                }
            };
        }
        TextEncoding::Utf16Be => u16::from_be_bytes,
        TextEncoding::Utf16Le => u16::from_le_bytes,
    };

    let chunks = bytes.chunks_exact(2);
    if !chunks.remainder().is_empty() {
        diag.warn(Stage::Xmp, "UTF-16 packet has an odd trailing byte");
    }
    let units: Vec<u16> = chunks.map(|pair| from_bytes([pair[0], pair[1]])).collect();
    String::from_utf16(&units).unwrap_or_else(|_| {
        diag.warn(Stage::Xmp, "packet is not valid UTF-16");
        String::from_utf16_lossy(&units)
    })
}
