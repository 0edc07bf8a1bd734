//! Top-level font facade.
//!
//! [`Font`] owns the raw byte buffer and the decoded structural tables,
//! and resolves glyph indices to decoded outlines on demand.

use tracing::{debug, trace};

use crate::error::{FontError, Result};
use crate::reader::ByteCursor;
use crate::tables::glyf::{Glyph, SimpleGlyph};
use crate::tables::head::HeadTable;
use crate::tables::loca::{GlyphLocations, LocaFormat};
use crate::tables::maxp::MaxpTable;
use crate::tables::{OffsetTable, TableDirectory};

/// A decoded TrueType font.
///
/// Construction eagerly decodes the table directory (verifying per-table
/// checksums), the `head` and `maxp` tables, and the glyph location
/// metadata. Glyph outlines are decoded lazily through
/// [`read_glyph`](Font::read_glyph).
pub struct Font {
    cursor: ByteCursor,
    directory: TableDirectory,
    head: HeadTable,
    maxp: MaxpTable,
    locations: GlyphLocations,
}

impl Font {
    /// Decodes the structural tables of a TrueType font buffer.
    pub fn new(data: Vec<u8>) -> Result<Self> {
        let mut cursor = ByteCursor::new(data);
        let directory = TableDirectory::read(&mut cursor)?;
        let head = HeadTable::read(&mut cursor, &directory)?;
        let maxp = MaxpTable::read(&mut cursor, &directory)?;
        let locations =
            GlyphLocations::new(&directory, LocaFormat::from_head(head.index_to_loc_format))?;

        debug!(
            glyphs = maxp.num_glyphs,
            units_per_em = head.units_per_em,
            "decoded font"
        );

        Ok(Self {
            cursor,
            directory,
            head,
            maxp,
            locations,
        })
    }

    pub fn offset_table(&self) -> &OffsetTable {
        self.directory.offset_table()
    }

    pub fn directory(&self) -> &TableDirectory {
        &self.directory
    }

    pub fn head(&self) -> &HeadTable {
        &self.head
    }

    pub fn units_per_em(&self) -> u16 {
        self.head.units_per_em
    }

    /// Number of glyphs in the font, from `maxp`.
    pub fn glyph_count(&self) -> u16 {
        self.maxp.num_glyphs
    }

    /// Decodes the outline of the glyph at `index`.
    ///
    /// Returns `Ok(None)` for a glyph with no outline (whitespace glyphs
    /// have a zero-length `glyf` entry). Compound glyphs are detected but
    /// not assembled and surface as [`FontError::UnsupportedGlyphKind`].
    pub fn read_glyph(&mut self, index: u16) -> Result<Option<SimpleGlyph>> {
        let count = self.glyph_count();
        if index >= count {
            return Err(FontError::OutOfRange {
                position: index as usize,
                limit: count as usize,
            });
        }

        let offset = self.locations.glyph_offset(&mut self.cursor, index)?;
        let glyf = self.locations.glyf();
        let glyf_start = glyf.offset as usize;
        let glyf_end = glyf_start + glyf.length as usize;
        if offset < glyf_start {
            return Err(FontError::OutOfRange {
                position: offset,
                limit: glyf_start,
            });
        }
        // An offset at or past the table end means an empty outline, not
        // a malformed font.
        if offset >= glyf_end {
            trace!(index, "glyph has no outline");
            return Ok(None);
        }

        match self.cursor.at(offset, Glyph::read)? {
            Glyph::Simple(simple) => Ok(Some(simple)),
            Glyph::Compound(_) => Err(FontError::UnsupportedGlyphKind { index }),
        }
    }
}
