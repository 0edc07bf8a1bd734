//! `maxp` table decoding. Only the glyph count is of interest here; it
//! bounds the valid glyph indices for the outline decoder.

use crate::error::Result;
use crate::reader::ByteCursor;
use crate::tables::{TableDirectory, Tag};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaxpTable {
    pub version: f64,
    pub num_glyphs: u16,
}

impl MaxpTable {
    /// Decodes the `maxp` table, leaving the cursor position unchanged.
    pub fn read(cursor: &mut ByteCursor, directory: &TableDirectory) -> Result<Self> {
        let record = directory.require(Tag::MAXP)?;
        cursor.at(record.offset as usize, |cursor| {
            Ok(Self {
                version: cursor.read_fixed()?,
                num_glyphs: cursor.read_u16()?,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FontError;

    #[test]
    fn test_maxp_glyph_count() {
        let mut font = Vec::new();
        font.extend(&[0x00, 0x01, 0x00, 0x00]); // scaler type
        font.extend(&[0x00, 0x01]); // numTables = 1
        font.extend(&[0x00, 0x10, 0x00, 0x00, 0x00, 0x00]); // search fields
        font.extend(b"maxp");
        // checksum over [00010000, 01070000] = 0x01080000
        font.extend(&0x01080000u32.to_be_bytes());
        font.extend(&28u32.to_be_bytes());
        font.extend(&6u32.to_be_bytes());
        font.extend(&[0x00, 0x01, 0x00, 0x00]); // version 1.0
        font.extend(&[0x01, 0x07]); // numGlyphs = 263

        let mut cursor = ByteCursor::new(font);
        let directory = TableDirectory::read(&mut cursor).unwrap();
        let maxp = MaxpTable::read(&mut cursor, &directory).unwrap();
        assert_eq!(maxp.version, 1.0);
        assert_eq!(maxp.num_glyphs, 263);
    }

    #[test]
    fn test_missing_maxp_table() {
        let mut font = Vec::new();
        font.extend(&[0x00, 0x01, 0x00, 0x00]);
        font.extend(&[0x00, 0x00]); // no tables at all
        font.extend(&[0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);

        let mut cursor = ByteCursor::new(font);
        let directory = TableDirectory::read(&mut cursor).unwrap();
        match MaxpTable::read(&mut cursor, &directory) {
            Err(FontError::MissingTable(tag)) => assert_eq!(tag, Tag::MAXP),
            other => panic!("expected MissingTable, got {other:?}"),
        }
    }
}
