//! TrueType table decoding.
//!
//! This module owns the font container structure: the offset table, the
//! table directory with per-table checksum verification, and the individual
//! table decoders in the submodules.

pub mod glyf;
pub mod head;
pub mod loca;
pub mod maxp;

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::error::{FontError, Result};
use crate::reader::ByteCursor;

/// Four-character ASCII identifier of a table.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag([u8; 4]);

impl Tag {
    pub const HEAD: Tag = Tag(*b"head");
    pub const LOCA: Tag = Tag(*b"loca");
    pub const GLYF: Tag = Tag(*b"glyf");
    pub const MAXP: Tag = Tag(*b"maxp");

    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &byte in &self.0 {
            let c = if byte.is_ascii_graphic() || byte == b' ' {
                char::from(byte)
            } else {
                '?'
            };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({self})")
    }
}

/// Header preceding the table records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetTable {
    pub scaler_type: u32,
    pub num_tables: u16,
    pub search_range: u16,
    pub entry_selector: u16,
    pub range_shift: u16,
}

impl OffsetTable {
    fn read(cursor: &mut ByteCursor) -> Result<Self> {
        Ok(Self {
            scaler_type: cursor.read_u32()?,
            num_tables: cursor.read_u16()?,
            search_range: cursor.read_u16()?,
            entry_selector: cursor.read_u16()?,
            range_shift: cursor.read_u16()?,
        })
    }
}

/// One table directory entry. Tags are unique within a font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRecord {
    pub tag: Tag,
    pub checksum: u32,
    pub offset: u32,
    pub length: u32,
}

impl TableRecord {
    fn read(cursor: &mut ByteCursor) -> Result<Self> {
        Ok(Self {
            tag: cursor.read_tag()?,
            checksum: cursor.read_u32()?,
            offset: cursor.read_u32()?,
            length: cursor.read_u32()?,
        })
    }
}

/// The decoded table directory: offset table plus tag-keyed records.
#[derive(Debug)]
pub struct TableDirectory {
    offset_table: OffsetTable,
    records: HashMap<Tag, TableRecord>,
}

impl TableDirectory {
    /// Reads the offset table and exactly `num_tables` records, verifying
    /// the stored checksum of every table except `head`. The `head` table
    /// embeds a whole-font checksum adjustment, so its stored checksum is
    /// not self-consistent at this stage and is never verified here.
    pub fn read(cursor: &mut ByteCursor) -> Result<Self> {
        let offset_table = OffsetTable::read(cursor)?;
        let mut records = HashMap::with_capacity(offset_table.num_tables as usize);

        for _ in 0..offset_table.num_tables {
            let record = TableRecord::read(cursor)?;
            if record.tag != Tag::HEAD {
                let computed = table_checksum(cursor, record.offset, record.length)?;
                if computed != record.checksum {
                    return Err(FontError::ChecksumMismatch {
                        tag: record.tag,
                        stored: record.checksum,
                        computed,
                    });
                }
            }
            // Tags are unique within a font; a repeated tag is malformed.
            if records.insert(record.tag, record).is_some() {
                return Err(FontError::DuplicateTable(record.tag));
            }
        }

        debug!(tables = records.len(), "decoded table directory");
        Ok(Self {
            offset_table,
            records,
        })
    }

    pub fn offset_table(&self) -> &OffsetTable {
        &self.offset_table
    }

    pub fn get(&self, tag: Tag) -> Option<TableRecord> {
        self.records.get(&tag).copied()
    }

    pub fn require(&self, tag: Tag) -> Result<TableRecord> {
        self.get(tag).ok_or(FontError::MissingTable(tag))
    }

    pub fn records(&self) -> impl Iterator<Item = &TableRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Sums a table's bytes as consecutive big-endian u32 words with wrapping
/// accumulation, over the length rounded up to the next multiple of four.
/// Reading past the declared length is expected for non-aligned tables; a
/// final word truncated by the end of the buffer is zero-padded.
fn table_checksum(cursor: &mut ByteCursor, offset: u32, length: u32) -> Result<u32> {
    cursor.at(offset as usize, |cursor| {
        // Words lying entirely past the end of the buffer sum to zero, so
        // the span is clamped to the bytes actually present and decode
        // time stays proportional to the buffer, not the declared length.
        let padded = (length as usize).saturating_add(3) / 4 * 4;
        let span = padded.min(cursor.remaining());
        let num_words = (span + 3) / 4;
        let mut sum = 0u32;
        for _ in 0..num_words {
            let word = if cursor.remaining() >= 4 {
                cursor.read_u32()?
            } else {
                let mut bytes = [0u8; 4];
                for slot in bytes.iter_mut() {
                    if cursor.remaining() == 0 {
                        break;
                    }
                    *slot = cursor.read_u8()?;
                }
                u32::from_be_bytes(bytes)
            };
            sum = sum.wrapping_add(word);
        }
        Ok(sum)
    })
}
