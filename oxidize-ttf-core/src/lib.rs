//! # oxidize-ttf
//!
//! A TrueType font decoder operating on in-memory byte buffers.
//!
//! The crate decodes the structural tables of a TrueType font (the table
//! directory with per-table checksum verification, `head`, `maxp`, and
//! `loca`) eagerly at construction, then decodes individual glyph
//! outlines from the `glyf` table on demand.
//!
//! ## Example
//!
//! ```no_run
//! use oxidize_ttf::Font;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = std::fs::read("font.ttf")?;
//! let mut font = Font::new(data)?;
//! println!("units per em: {}", font.units_per_em());
//! if let Some(glyph) = font.read_glyph(36)? {
//!     for contour in glyph.contours() {
//!         println!("contour with {} points", contour.len());
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Scope
//!
//! Compound glyphs are recognized but not assembled; decoding one returns
//! [`FontError::UnsupportedGlyphKind`]. Character-to-glyph mapping (`cmap`),
//! hinting, and rasterization are out of scope.

pub mod error;
pub mod font;
pub mod reader;
pub mod tables;

pub use error::{FontError, Result};
pub use font::Font;
pub use reader::ByteCursor;
pub use tables::glyf::{BoundingBox, CompoundGlyph, Glyph, Point, SimpleGlyph, SimpleGlyphFlags};
pub use tables::{OffsetTable, TableDirectory, TableRecord, Tag};
