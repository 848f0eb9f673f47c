//! Image File Directory traversal
//!
//! TIFF metadata is a chain of directories. Each directory is a 2-byte entry
//! count followed by 12-byte entries and, for top-level directories, a 4-byte
//! offset to the next directory:
//!
//! ```text
//! Entry: tag (2) | type (2) | count (4) | value or offset (4)
//! ```
//!
//! Values wider than 4 bytes live elsewhere; the last field then holds their
//! offset relative to the TIFF header. All offsets handled here are relative
//! to the start of the slice the cursor was built over, which is the TIFF
//! header itself.

use crate::core::cursor::ByteCursor;
use crate::core::diagnostics::{Diagnostics, Stage};
use crate::core::error::{MetaError, MetaResult};
use crate::core::options::ParseOptions;
use crate::exif::tags::{self, FieldType};
use crate::exif::value::Value;
use std::collections::{BTreeMap, HashSet};

/// Size of one IFD entry in bytes
pub const IFD_ENTRY_SIZE: usize = 12;

/// Identifies one directory in an [`IfdTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IfdId {
    /// The n-th directory of the top-level chain (0 is the primary image)
    Primary(usize),
    /// EXIF sub-IFD
    Exif,
    /// GPS sub-IFD
    Gps,
    /// Interoperability sub-IFD
    Interop,
}

impl IfdId {
    /// The sub-IFD a pointer tag leads to
    pub fn from_pointer_tag(tag: u16) -> Option<Self> {
        match tag {
            tags::EXIF_IFD_POINTER => Some(IfdId::Exif),
            tags::GPS_IFD_POINTER => Some(IfdId::Gps),
            tags::INTEROP_IFD_POINTER => Some(IfdId::Interop),
            _ => None,
        }
    }
}

/// Decoded directories keyed by [`IfdId`], each a map of tag id to value
///
/// Pointer tags never appear as entries: they become their own directories.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IfdTree {
    ifds: BTreeMap<IfdId, BTreeMap<u16, Value>>,
}

impl IfdTree {
    /// Look up a tag in one directory
    pub fn get(&self, ifd: IfdId, tag: u16) -> Option<&Value> {
        self.ifds.get(&ifd).and_then(|entries| entries.get(&tag))
    }

    /// All entries of one directory
    pub fn directory(&self, ifd: IfdId) -> Option<&BTreeMap<u16, Value>> {
        self.ifds.get(&ifd)
    }

    /// Whether a directory was decoded
    pub fn contains(&self, ifd: IfdId) -> bool {
        self.ifds.contains_key(&ifd)
    }

    /// Ids of every decoded directory, in order
    pub fn ifds(&self) -> impl Iterator<Item = IfdId> + '_ {
        self.ifds.keys().copied()
    }

    /// Number of decoded directories
    pub fn len(&self) -> usize {
        self.ifds.len()
    }

    /// Whether no directory was decoded
    pub fn is_empty(&self) -> bool {
        self.ifds.is_empty()
    }

    /// Number of top-level directories in the chain
    pub fn primary_count(&self) -> usize {
        self.ifds
            .keys()
            .filter(|id| matches!(id, IfdId::Primary(_)))
            .count()
    }

    /// Add a directory unless `ifd` is already present
    pub(crate) fn insert(&mut self, ifd: IfdId, entries: BTreeMap<u16, Value>) {
        self.ifds.entry(ifd).or_insert(entries);
    }
}

/// Walks the directory chain of one TIFF structure
pub(crate) struct IfdWalker<'a, 'd> {
    cursor: ByteCursor<'a>,
    options: &'d ParseOptions,
    diag: &'d mut Diagnostics,
    visited: HashSet<usize>,
    tree: IfdTree,
}

impl<'a, 'd> IfdWalker<'a, 'd> {
    /// `cursor` must span the TIFF header and already carry its byte order
    pub(crate) fn new(
        cursor: ByteCursor<'a>,
        options: &'d ParseOptions,
        diag: &'d mut Diagnostics,
    ) -> Self {
        Self {
            cursor,
            options,
            diag,
            visited: HashSet::new(),
            tree: IfdTree::default(),
        }
    }

    pub(crate) fn into_tree(self) -> IfdTree {
        self.tree
    }

    /// Decode the top-level chain starting at `first_offset`
    ///
    /// Stops at a zero "next IFD" offset, at an unreadable directory, or
    /// when a traversal guard trips.
    pub(crate) fn walk_chain(&mut self, first_offset: usize) {
        let mut next = first_offset;
        let mut index = 0;

        while next != 0 {
            if !self.admit(next) {
                break;
            }
            let id = IfdId::Primary(index);
            let count = match self.read_directory(next, id, 0) {
                Ok(count) => count,
                Err(e) => {
                    self.diag
                        .warn(Stage::Exif, format!("IFD{index} at {next} unreadable: {e}"));
                    break;
                }
            };

            let next_field = next + 2 + count * IFD_ENTRY_SIZE;
            next = match self
                .cursor
                .seek(next_field)
                .and_then(|_| self.cursor.read_u32())
            {
                Ok(offset) => offset as usize,
                Err(e) => {
                    self.diag.warn(
                        Stage::Exif,
                        format!("next IFD offset after IFD{index} unreadable: {e}"),
                    );
                    break;
                }
            };
            index += 1;
        }
    }

    /// Check the visited set and the IFD budget before decoding at `offset`
    fn admit(&mut self, offset: usize) -> bool {
        if self.visited.len() >= self.options.max_ifds {
            self.diag.warn(
                Stage::Exif,
                format!("IFD limit of {} reached, stopping", self.options.max_ifds),
            );
            return false;
        }
        if !self.visited.insert(offset) {
            self.diag
                .warn(Stage::Exif, format!("IFD at {offset} already decoded, cycle skipped"));
            return false;
        }
        true
    }

    /// Decode the directory at `offset` into `id` and return its entry count
    ///
    /// Entries that fail to decode are skipped with a warning. A directory
    /// cut short by the end of the buffer keeps the entries read so far.
    fn read_directory(&mut self, offset: usize, id: IfdId, depth: usize) -> MetaResult<usize> {
        self.cursor.seek(offset)?;
        let count = self.cursor.read_u16()? as usize;
        log::debug!("decoding {id:?} at {offset} with {count} entries");

        let mut entries = BTreeMap::new();
        for i in 0..count {
            let entry_start = offset + 2 + i * IFD_ENTRY_SIZE;
            if entry_start + IFD_ENTRY_SIZE > self.cursor.len() {
                self.diag.warn(
                    Stage::Exif,
                    format!("{id:?} truncated after {i} of {count} entries"),
                );
                break;
            }
            self.cursor.seek(entry_start)?;
            match self.read_entry(id, depth) {
                Ok(Some((tag, value))) => {
                    log::trace!("{id:?} tag {tag:#06x} = {value}");
                    entries.insert(tag, value);
                }
                Ok(None) => {}
                Err(e) => self.diag.warn(
                    Stage::Exif,
                    format!("{id:?} entry {i} skipped: {e}"),
                ),
            }
        }

        self.tree.insert(id, entries);
        Ok(count)
    }

    /// Decode the entry under the cursor
    ///
    /// Returns `None` for entries that were consumed without producing a
    /// value: pointer tags and unknown field types.
    fn read_entry(&mut self, id: IfdId, depth: usize) -> MetaResult<Option<(u16, Value)>> {
        let tag = self.cursor.read_u16()?;
        let type_code = self.cursor.read_u16()?;
        let count = self.cursor.read_u32()? as usize;
        let value_field = self.cursor.position();
        let after_entry = value_field + 4;

        let Some(field_type) = FieldType::from_u16(type_code) else {
            self.diag.warn(
                Stage::Exif,
                format!("{id:?} tag {tag:#06x} has unknown type {type_code}"),
            );
            return Ok(None);
        };

        let byte_size = field_type
            .component_size()
            .checked_mul(count)
            .ok_or_else(|| MetaError::malformed(format!("tag {tag:#06x} count overflows")))?;

        if byte_size > 4 {
            let data_offset = self.cursor.read_u32()? as usize;
            self.cursor.seek(data_offset)?;
        }
        let value = self.read_value(tag, field_type, count);
        self.cursor.seek(after_entry)?;
        let value = value?;

        if tags::is_ifd_pointer(tag) {
            self.follow_pointer(id, tag, count, &value, depth);
            return Ok(None);
        }
        Ok(Some((tag, value)))
    }

    fn follow_pointer(&mut self, parent: IfdId, tag: u16, count: usize, value: &Value, depth: usize) {
        let Some(sub_id) = IfdId::from_pointer_tag(tag) else {
            return;
        };
        let offset = match (count, value.as_u32()) {
            (1, Some(offset)) => offset as usize,
            _ => {
                self.diag.warn(
                    Stage::Exif,
                    format!("{parent:?} has malformed {sub_id:?} pointer (count {count})"),
                );
                return;
            }
        };
        if depth + 1 > self.options.max_ifd_depth {
            self.diag.warn(
                Stage::Exif,
                format!("{sub_id:?} exceeds sub-IFD depth {}", self.options.max_ifd_depth),
            );
            return;
        }
        if self.tree.contains(sub_id) {
            self.diag.warn(
                Stage::Exif,
                format!("{parent:?} has a second {sub_id:?} pointer, first directory kept"),
            );
            return;
        }
        if !self.admit(offset) {
            return;
        }
        if let Err(e) = self.read_directory(offset, sub_id, depth + 1) {
            self.diag
                .warn(Stage::Exif, format!("{sub_id:?} at {offset} unreadable: {e}"));
        }
    }

    /// Decode `count` components of `field_type` at the cursor
    fn read_value(&mut self, tag: u16, field_type: FieldType, count: usize) -> MetaResult<Value> {
        // Bounds check up front so a hostile count cannot drive allocation.
        self.cursor.peek_bytes(field_type.component_size() * count)?;

        match field_type {
            FieldType::Ascii => {
                let bytes = self.cursor.read_bytes(count)?;
                let text = match bytes.iter().position(|&b| b == 0) {
                    Some(end) => &bytes[..end],
                    None => {
                        if count > 0 {
                            self.diag.warn(
                                Stage::Exif,
                                format!("ASCII tag {tag:#06x} has no NUL terminator"),
                            );
                        }
                        bytes
                    }
                };
                Ok(Value::Ascii(String::from_utf8_lossy(text).into_owned()))
            }
            FieldType::Undefined => Ok(Value::Undefined(self.cursor.read_bytes(count)?.to_vec())),
            _ => {
                let mut values = Vec::with_capacity(count);
                for _ in 0..count {
                    values.push(self.read_component(field_type)?);
                }
                if values.len() == 1 {
                    Ok(values.remove(0))
                } else {
                    Ok(Value::List(values))
                }
            }
        }
    }

    fn read_component(&mut self, field_type: FieldType) -> MetaResult<Value> {
        let cursor = &mut self.cursor;
        Ok(match field_type {
            FieldType::Byte => Value::Byte(cursor.read_u8()?),
            FieldType::SignedByte => Value::SignedByte(cursor.read_i8()?),
            FieldType::Short => Value::Short(cursor.read_u16()?),
            FieldType::SignedShort => Value::SignedShort(cursor.read_i16()?),
            FieldType::Long => Value::Long(cursor.read_u32()?),
            FieldType::SignedLong => Value::SignedLong(cursor.read_i32()?),
            FieldType::Rational => {
                let numerator = cursor.read_u32()?;
                let denominator = cursor.read_u32()?;
                Value::Rational(f64::from(numerator) / f64::from(denominator))
            }
            FieldType::SignedRational => {
                let numerator = cursor.read_i32()?;
                let denominator = cursor.read_i32()?;
                Value::SignedRational(f64::from(numerator) / f64::from(denominator))
            }
            FieldType::Float => Value::Float(cursor.read_f32()?),
            FieldType::Double => Value::Double(cursor.read_f64()?),
            FieldType::Ascii | FieldType::Undefined => Value::Byte(cursor.read_u8()?),
        })
    }
}
