use thiserror::Error;

use crate::tables::Tag;

/// Errors surfaced while decoding a font.
///
/// Every variant is terminal for the decode operation in progress; there is
/// no retry policy. An empty glyph outline is not an error and is reported
/// as `Ok(None)` by [`crate::Font::read_glyph`].
#[derive(Error, Debug)]
pub enum FontError {
    #[error("Position {position} out of range (limit {limit})")]
    OutOfRange { position: usize, limit: usize },

    #[error("Unexpected end of data at {position}: needed {needed} bytes, {available} available")]
    UnexpectedEof {
        position: usize,
        needed: usize,
        available: usize,
    },

    #[error("Missing required table: {0}")]
    MissingTable(Tag),

    #[error("Duplicate table directory entry: {0}")]
    DuplicateTable(Tag),

    #[error("Checksum mismatch for table {tag}: stored {stored:#010x}, computed {computed:#010x}")]
    ChecksumMismatch { tag: Tag, stored: u32, computed: u32 },

    #[error("Bad head table magic number: {found:#010x}")]
    BadMagic { found: u32 },

    #[error("Invalid glyph header at {position}: {message}")]
    InvalidGlyphHeader { position: usize, message: String },

    #[error("Glyph {index} is a compound glyph; component assembly is not supported")]
    UnsupportedGlyphKind { index: u16 },
}

pub type Result<T> = std::result::Result<T, FontError>;
