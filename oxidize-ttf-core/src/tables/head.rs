//! `head` table decoding.
//!
//! The font header carries the global metadata the other decoders depend
//! on, most importantly `units_per_em` and `index_to_loc_format`.

use bitflags::bitflags;
use chrono::{DateTime, Utc};

use crate::error::{FontError, Result};
use crate::reader::ByteCursor;
use crate::tables::{TableDirectory, Tag};

/// Magic number every valid `head` table carries.
pub const HEAD_MAGIC: u32 = 0x5F0F_3CF5;

bitflags! {
    /// Style bits from the `head` table's `macStyle` word.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MacStyle: u16 {
        const BOLD = 1 << 0;
        const ITALIC = 1 << 1;
        const UNDERLINE = 1 << 2;
        const OUTLINE = 1 << 3;
        const SHADOW = 1 << 4;
        const CONDENSED = 1 << 5;
        const EXTENDED = 1 << 6;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeadTable {
    pub version: f64,
    pub font_revision: f64,
    pub checksum_adjustment: u32,
    pub magic_number: u32,
    pub flags: u16,
    pub units_per_em: u16,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    /// Bounding box over all glyphs, in font design units.
    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
    pub mac_style: MacStyle,
    /// Smallest readable size in pixels.
    pub lowest_rec_ppem: u16,
    pub font_direction_hint: i16,
    /// 0 = short (u16, stored halved) `loca` offsets, 1 = long (u32).
    pub index_to_loc_format: i16,
    pub glyph_data_format: i16,
}

impl HeadTable {
    /// Decodes the `head` table, leaving the cursor position unchanged.
    pub fn read(cursor: &mut ByteCursor, directory: &TableDirectory) -> Result<Self> {
        let record = directory.require(Tag::HEAD)?;
        cursor.at(record.offset as usize, |cursor| {
            let version = cursor.read_fixed()?;
            let font_revision = cursor.read_fixed()?;
            let checksum_adjustment = cursor.read_u32()?;
            let magic_number = cursor.read_u32()?;
            if magic_number != HEAD_MAGIC {
                return Err(FontError::BadMagic {
                    found: magic_number,
                });
            }
            Ok(Self {
                version,
                font_revision,
                checksum_adjustment,
                magic_number,
                flags: cursor.read_u16()?,
                units_per_em: cursor.read_u16()?,
                created: cursor.read_datetime()?,
                modified: cursor.read_datetime()?,
                x_min: cursor.read_fword()?,
                y_min: cursor.read_fword()?,
                x_max: cursor.read_fword()?,
                y_max: cursor.read_fword()?,
                mac_style: MacStyle::from_bits_retain(cursor.read_u16()?),
                lowest_rec_ppem: cursor.read_u16()?,
                font_direction_hint: cursor.read_i16()?,
                index_to_loc_format: cursor.read_i16()?,
                glyph_data_format: cursor.read_i16()?,
            })
        })
    }
}
