//! Glyph location resolution through the `loca` table.
//!
//! `loca` maps a glyph index to its outline's byte offset relative to the
//! start of the `glyf` table. Offsets come in two widths, selected by
//! `head.indexToLocFormat`: short offsets are u16 values storing half the
//! real offset, long offsets are plain u32 values.

use crate::error::Result;
use crate::reader::ByteCursor;
use crate::tables::{TableDirectory, TableRecord, Tag};

/// Index-to-location format from `head.indexToLocFormat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocaFormat {
    Short,
    Long,
}

impl LocaFormat {
    pub fn from_head(index_to_loc_format: i16) -> Self {
        if index_to_loc_format == 1 {
            Self::Long
        } else {
            Self::Short
        }
    }
}

/// Resolves glyph indices to absolute offsets into the font buffer.
#[derive(Debug, Clone, Copy)]
pub struct GlyphLocations {
    loca: TableRecord,
    glyf: TableRecord,
    format: LocaFormat,
}

impl GlyphLocations {
    pub fn new(directory: &TableDirectory, format: LocaFormat) -> Result<Self> {
        Ok(Self {
            loca: directory.require(Tag::LOCA)?,
            glyf: directory.require(Tag::GLYF)?,
            format,
        })
    }

    pub fn glyf(&self) -> TableRecord {
        self.glyf
    }

    /// Absolute offset of a glyph's outline within the font buffer. The
    /// cursor position is unchanged on return.
    pub fn glyph_offset(&self, cursor: &mut ByteCursor, index: u16) -> Result<usize> {
        let loca_offset = self.loca.offset as usize;
        let relative = match self.format {
            LocaFormat::Long => {
                cursor.at(loca_offset + index as usize * 4, |cursor| cursor.read_u32())?
            }
            LocaFormat::Short => {
                let halved =
                    cursor.at(loca_offset + index as usize * 2, |cursor| cursor.read_u16())?;
                u32::from(halved) * 2
            }
        };
        Ok(self.glyf.offset as usize + relative as usize)
    }
}
