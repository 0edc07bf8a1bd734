//! `glyf` outline decoding.
//!
//! A glyph header carries a contour count and bounding box; the count's
//! sign classifies the glyph once, into the [`Glyph`] variants. Simple
//! glyphs store one flag byte per point (run-length compressed through the
//! `REPEAT` bit) followed by the x deltas and then the y deltas, each
//! delta stream switching between unsigned-byte and signed-word encodings
//! per point. Coordinates accumulate across the whole point sequence, not
//! per contour.

use bitflags::bitflags;

use crate::error::{FontError, Result};
use crate::reader::ByteCursor;

bitflags! {
    /// Per-point flag byte of a simple glyph.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SimpleGlyphFlags: u8 {
        const ON_CURVE = 0x01;
        const X_SHORT = 0x02;
        const Y_SHORT = 0x04;
        const REPEAT = 0x08;
        const X_SAME_OR_POSITIVE = 0x10;
        const Y_SAME_OR_POSITIVE = 0x20;
    }
}

/// Glyph extents in font design units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
}

/// One outline point in font design units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub on_curve: bool,
    pub x: i32,
    pub y: i32,
}

/// A decoded glyph outline. The variant is decided once, from the header's
/// contour count, so call sites never branch on the `-1` sentinel.
#[derive(Debug, Clone, PartialEq)]
pub enum Glyph {
    Simple(SimpleGlyph),
    Compound(CompoundGlyph),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimpleGlyph {
    pub number_of_contours: u16,
    pub bounding_box: BoundingBox,
    /// Indices of each contour's last point, monotonically increasing.
    pub contour_ends: Vec<u16>,
    /// `contour_ends.iter().max() + 1` points, in contour order.
    pub points: Vec<Point>,
}

/// Composite glyph stub. Component assembly (sub-glyph references,
/// transforms, anchor matching) is a separate extension and is not
/// decoded; only the header survives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompoundGlyph {
    pub bounding_box: BoundingBox,
}

impl Glyph {
    /// Decodes the glyph whose header starts at the current cursor
    /// position. For compound glyphs the cursor is left at the byte
    /// immediately following the header.
    pub fn read(cursor: &mut ByteCursor) -> Result<Self> {
        let header_position = cursor.tell();
        let number_of_contours = cursor.read_i16()?;
        let bounding_box = BoundingBox {
            x_min: cursor.read_fword()?,
            y_min: cursor.read_fword()?,
            x_max: cursor.read_fword()?,
            y_max: cursor.read_fword()?,
        };

        if number_of_contours < -1 {
            return Err(FontError::InvalidGlyphHeader {
                position: header_position,
                message: format!("contour count {number_of_contours} is less than -1"),
            });
        }
        if number_of_contours == -1 {
            return Ok(Self::Compound(CompoundGlyph { bounding_box }));
        }

        let simple = SimpleGlyph::read(cursor, number_of_contours as u16, bounding_box)?;
        Ok(Self::Simple(simple))
    }
}

impl SimpleGlyph {
    fn read(
        cursor: &mut ByteCursor,
        number_of_contours: u16,
        bounding_box: BoundingBox,
    ) -> Result<Self> {
        let mut contour_ends = Vec::with_capacity(number_of_contours as usize);
        for _ in 0..number_of_contours {
            contour_ends.push(cursor.read_u16()?);
        }
        // Contour ends are point indices and must strictly increase;
        // contours() slices the point vector by them.
        for pair in contour_ends.windows(2) {
            if pair[1] <= pair[0] {
                return Err(FontError::InvalidGlyphHeader {
                    position: cursor.tell(),
                    message: format!("contour ends are not increasing ({} then {})", pair[0], pair[1]),
                });
            }
        }

        // Hinting instructions are not interpreted; skip them.
        let instruction_length = cursor.read_u16()? as usize;
        cursor.seek(cursor.tell() + instruction_length)?;

        if number_of_contours == 0 {
            return Ok(Self {
                number_of_contours,
                bounding_box,
                contour_ends,
                points: Vec::new(),
            });
        }

        let num_points = contour_ends.iter().copied().max().unwrap_or(0) as usize + 1;
        let flags = read_flags(cursor, num_points)?;
        let xs = read_coordinates(
            cursor,
            &flags,
            SimpleGlyphFlags::X_SHORT,
            SimpleGlyphFlags::X_SAME_OR_POSITIVE,
        )?;
        let ys = read_coordinates(
            cursor,
            &flags,
            SimpleGlyphFlags::Y_SHORT,
            SimpleGlyphFlags::Y_SAME_OR_POSITIVE,
        )?;

        let points = flags
            .iter()
            .zip(xs.iter().zip(&ys))
            .map(|(flag, (&x, &y))| Point {
                on_curve: flag.contains(SimpleGlyphFlags::ON_CURVE),
                x,
                y,
            })
            .collect();

        Ok(Self {
            number_of_contours,
            bounding_box,
            contour_ends,
            points,
        })
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// The points partitioned into closed sub-paths: each contour is the
    /// slice ending at the matching entry of `contour_ends`. A path
    /// builder starts a new sub-path at the first point of each slice and
    /// extends it through the rest.
    pub fn contours(&self) -> impl Iterator<Item = &[Point]> {
        let mut start = 0usize;
        self.contour_ends.iter().map(move |&end| {
            let contour = &self.points[start..=end as usize];
            start = end as usize + 1;
            contour
        })
    }
}

/// Reads exactly `num_points` effective flag bytes, expanding `REPEAT`
/// runs: a set repeat bit is followed by a count byte `r > 0`, and the
/// flag is replicated `r` additional times.
fn read_flags(cursor: &mut ByteCursor, num_points: usize) -> Result<Vec<SimpleGlyphFlags>> {
    let mut flags = Vec::with_capacity(num_points);
    while flags.len() < num_points {
        let flag = SimpleGlyphFlags::from_bits_retain(cursor.read_u8()?);
        flags.push(flag);
        if flag.contains(SimpleGlyphFlags::REPEAT) {
            let position = cursor.tell();
            let repeat_count = cursor.read_u8()?;
            if repeat_count == 0 {
                return Err(FontError::InvalidGlyphHeader {
                    position,
                    message: "flag repeat count of zero".to_string(),
                });
            }
            for _ in 0..repeat_count {
                flags.push(flag);
            }
        }
    }
    if flags.len() > num_points {
        return Err(FontError::InvalidGlyphHeader {
            position: cursor.tell(),
            message: format!(
                "flag repeat run overflows the point count ({} > {num_points})",
                flags.len()
            ),
        });
    }
    Ok(flags)
}

/// Decodes one coordinate axis as a running delta accumulator seeded at
/// zero. Short-bit set: one unsigned byte, added or subtracted per the
/// same-or-positive bit. Short-bit clear: a signed 16-bit delta, unless
/// the same-or-positive bit is set, in which case the value carries
/// forward and no bytes are consumed.
fn read_coordinates(
    cursor: &mut ByteCursor,
    flags: &[SimpleGlyphFlags],
    short_bit: SimpleGlyphFlags,
    same_or_positive_bit: SimpleGlyphFlags,
) -> Result<Vec<i32>> {
    let mut coordinates = Vec::with_capacity(flags.len());
    let mut value = 0i32;
    for flag in flags {
        if flag.contains(short_bit) {
            let delta = i32::from(cursor.read_u8()?);
            if flag.contains(same_or_positive_bit) {
                value += delta;
            } else {
                value -= delta;
            }
        } else if !flag.contains(same_or_positive_bit) {
            value += i32::from(cursor.read_i16()?);
        }
        coordinates.push(value);
    }
    Ok(coordinates)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BBOX: [u8; 8] = [0x00, 0x00, 0x00, 0x00, 0x00, 0x0F, 0x00, 0x05];

    #[test]
    fn test_flag_repeat_expansion() {
        // 0x33 = ON_CURVE | X_SHORT | X_SAME_OR_POSITIVE | Y_SAME_OR_POSITIVE,
        // plus REPEAT (0x08) and a repeat count of 4.
        let mut cursor = ByteCursor::new(vec![0x3B, 0x04]);
        let flags = read_flags(&mut cursor, 5).unwrap();
        assert_eq!(flags.len(), 5);
        for flag in &flags {
            assert!(flag.contains(SimpleGlyphFlags::ON_CURVE));
            assert_eq!(*flag, flags[0]);
        }
    }

    #[test]
    fn test_flag_repeat_count_zero_is_invalid() {
        let mut cursor = ByteCursor::new(vec![0x09, 0x00]);
        match read_flags(&mut cursor, 3) {
            Err(FontError::InvalidGlyphHeader { position: 1, .. }) => {}
            other => panic!("expected InvalidGlyphHeader, got {other:?}"),
        }
    }

    #[test]
    fn test_flag_repeat_overflow_is_invalid() {
        // Two effective flags expected, the repeat run produces four.
        let mut cursor = ByteCursor::new(vec![0x09, 0x03]);
        assert!(matches!(
            read_flags(&mut cursor, 2),
            Err(FontError::InvalidGlyphHeader { .. })
        ));
    }

    #[test]
    fn test_simple_glyph_delta_decoding() {
        // One contour, three points, all coordinates short:
        //   (+5,+5) (+10,carry) (-15,carry) => (5,5) (15,5) (0,5)
        let mut data = vec![0x00, 0x01]; // numberOfContours = 1
        data.extend(&BBOX);
        data.extend(&[0x00, 0x02]); // contourEnds = [2]
        data.extend(&[0x00, 0x00]); // no instructions
        data.extend(&[0x37, 0x33, 0x23]); // flags
        data.extend(&[0x05, 0x0A, 0x0F]); // x bytes
        data.extend(&[0x05]); // y bytes

        let mut cursor = ByteCursor::new(data);
        let glyph = Glyph::read(&mut cursor).unwrap();
        let simple = match glyph {
            Glyph::Simple(simple) => simple,
            other => panic!("expected a simple glyph, got {other:?}"),
        };

        assert_eq!(simple.number_of_contours, 1);
        assert_eq!(simple.contour_ends, vec![2]);
        assert_eq!(simple.num_points(), 3);
        let coordinates: Vec<(i32, i32)> =
            simple.points.iter().map(|point| (point.x, point.y)).collect();
        assert_eq!(coordinates, vec![(5, 5), (15, 5), (0, 5)]);
        assert!(simple.points.iter().all(|point| point.on_curve));
    }

    #[test]
    fn test_word_deltas_and_carry_forward() {
        // Two points: first uses signed 16-bit deltas, second carries both
        // coordinates forward (no bytes consumed).
        let mut data = vec![0x00, 0x01];
        data.extend(&BBOX);
        data.extend(&[0x00, 0x01]); // contourEnds = [1]
        data.extend(&[0x00, 0x00]); // no instructions
        data.extend(&[0x01, 0x31]); // word deltas, then carry both axes
        data.extend(&[0xFF, 0x38]); // x delta = -200
        data.extend(&[0x01, 0x2C]); // y delta = 300

        let mut cursor = ByteCursor::new(data);
        let glyph = Glyph::read(&mut cursor).unwrap();
        let Glyph::Simple(simple) = glyph else {
            panic!("expected a simple glyph");
        };
        assert_eq!(simple.points[0].x, -200);
        assert_eq!(simple.points[0].y, 300);
        assert_eq!(simple.points[1].x, -200);
        assert_eq!(simple.points[1].y, 300);
        assert!(simple.points[0].on_curve);
        assert!(!simple.points[1].on_curve);
    }

    #[test]
    fn test_zero_contour_glyph_has_no_points() {
        let mut data = vec![0x00, 0x00]; // numberOfContours = 0
        data.extend(&BBOX);
        data.extend(&[0x00, 0x00]); // no instructions

        let mut cursor = ByteCursor::new(data);
        let Glyph::Simple(simple) = Glyph::read(&mut cursor).unwrap() else {
            panic!("expected a simple glyph");
        };
        assert!(simple.points.is_empty());
        assert!(simple.contour_ends.is_empty());
    }

    #[test]
    fn test_instructions_are_skipped() {
        let mut data = vec![0x00, 0x01];
        data.extend(&BBOX);
        data.extend(&[0x00, 0x00]); // contourEnds = [0]
        data.extend(&[0x00, 0x03]); // three instruction bytes
        data.extend(&[0xAA, 0xBB, 0xCC]); // instructions (ignored)
        data.extend(&[0x37]); // one point, short positive deltas
        data.extend(&[0x02]); // x
        data.extend(&[0x03]); // y

        let mut cursor = ByteCursor::new(data);
        let Glyph::Simple(simple) = Glyph::read(&mut cursor).unwrap() else {
            panic!("expected a simple glyph");
        };
        assert_eq!(simple.points, vec![Point { on_curve: true, x: 2, y: 3 }]);
    }

    #[test]
    fn test_compound_header_classifies_once() {
        let mut data = vec![0xFF, 0xFF]; // numberOfContours = -1
        data.extend(&BBOX);
        data.extend(&[0x00, 0x00]); // component data (not decoded)

        let mut cursor = ByteCursor::new(data);
        let glyph = Glyph::read(&mut cursor).unwrap();
        match glyph {
            Glyph::Compound(compound) => {
                assert_eq!(compound.bounding_box.x_max, 15);
                // The cursor sits at the byte after the header.
                assert_eq!(cursor.tell(), 10);
            }
            other => panic!("expected a compound glyph, got {other:?}"),
        }
    }

    #[test]
    fn test_contour_count_below_minus_one_is_invalid() {
        let mut data = vec![0xFF, 0xFE]; // numberOfContours = -2
        data.extend(&BBOX);

        let mut cursor = ByteCursor::new(data);
        match Glyph::read(&mut cursor) {
            Err(FontError::InvalidGlyphHeader { position: 0, .. }) => {}
            other => panic!("expected InvalidGlyphHeader, got {other:?}"),
        }
    }

    #[test]
    fn test_non_increasing_contour_ends_are_invalid() {
        // Two contours whose ends go backwards; slicing points by these
        // would be out of order, so the decode must fail instead.
        let mut data = vec![0x00, 0x02];
        data.extend(&BBOX);
        data.extend(&[0x00, 0x03, 0x00, 0x01]); // contourEnds = [3, 1]
        data.extend(&[0x00, 0x00]); // no instructions
        data.extend(&[0x37, 0x37, 0x37, 0x37]); // flags
        data.extend(&[0x01, 0x01, 0x01, 0x01]); // x bytes
        data.extend(&[0x01, 0x01, 0x01, 0x01]); // y bytes

        let mut cursor = ByteCursor::new(data);
        match Glyph::read(&mut cursor) {
            Err(FontError::InvalidGlyphHeader { .. }) => {}
            other => panic!("expected InvalidGlyphHeader, got {other:?}"),
        }
    }

    #[test]
    fn test_contours_iterator_partitions_points() {
        // Two contours: points 0..=1 and 2..=3.
        let mut data = vec![0x00, 0x02];
        data.extend(&BBOX);
        data.extend(&[0x00, 0x01, 0x00, 0x03]); // contourEnds = [1, 3]
        data.extend(&[0x00, 0x00]); // no instructions
        data.extend(&[0x37, 0x37, 0x37, 0x37]); // flags
        data.extend(&[0x01, 0x01, 0x01, 0x01]); // x bytes
        data.extend(&[0x01, 0x01, 0x01, 0x01]); // y bytes

        let mut cursor = ByteCursor::new(data);
        let Glyph::Simple(simple) = Glyph::read(&mut cursor).unwrap() else {
            panic!("expected a simple glyph");
        };
        let contours: Vec<&[Point]> = simple.contours().collect();
        assert_eq!(contours.len(), 2);
        assert_eq!(contours[0].len(), 2);
        assert_eq!(contours[1].len(), 2);
        assert_eq!(contours[1][0], simple.points[2]);
    }
}
