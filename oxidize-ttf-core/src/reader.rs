//! Sequential big-endian reader over an in-memory font buffer.
//!
//! All table decoders read through [`ByteCursor`] exclusively. The cursor
//! owns the buffer; decoders that need to read at another offset use
//! [`ByteCursor::at`], which restores the saved position on every exit
//! path, so nested reads can never leak position changes.

use chrono::{DateTime, TimeZone, Utc};

use crate::error::{FontError, Result};
use crate::tables::Tag;

/// Seconds from the Unix epoch back to the Macintosh epoch
/// (1904-01-01T00:00:00Z). `head` table dates are stored as seconds since
/// the Macintosh epoch; an integrator that needs a different origin can
/// rebind this one constant.
pub const MAC_EPOCH_UNIX_SECONDS: i64 = -2_082_844_800;

/// Stateful sequential reader over a fixed byte buffer.
///
/// Every read advances the position by exactly the consumed width. The
/// position always satisfies `0 <= position <= len()`.
pub struct ByteCursor {
    data: Vec<u8>,
    position: usize,
}

impl ByteCursor {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data, position: 0 }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Current read position.
    pub fn tell(&self) -> usize {
        self.position
    }

    /// Bytes left between the position and the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Moves the position, returning the previous one. Seeking past the end
    /// of the buffer (position == len is allowed) is an error.
    pub fn seek(&mut self, position: usize) -> Result<usize> {
        if position > self.data.len() {
            return Err(FontError::OutOfRange {
                position,
                limit: self.data.len(),
            });
        }
        let previous = self.position;
        self.position = position;
        Ok(previous)
    }

    /// Runs `f` with the cursor seeked to `position` and restores the saved
    /// position afterwards, whether `f` succeeded or not.
    pub fn at<T, F>(&mut self, position: usize, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        let saved = self.seek(position)?;
        let result = f(self);
        self.position = saved;
        result
    }

    fn take(&mut self, count: usize) -> Result<&[u8]> {
        if count > self.remaining() {
            return Err(FontError::UnexpectedEof {
                position: self.position,
                needed: count,
                available: self.remaining(),
            });
        }
        let bytes = &self.data[self.position..self.position + count];
        self.position += count;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.take(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(self.read_u16()? as i16)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.read_u32()? as i32)
    }

    /// A signed 16-bit value in font design units.
    pub fn read_fword(&mut self) -> Result<i16> {
        self.read_i16()
    }

    /// Signed fixed-point with 14 fractional bits.
    pub fn read_f2dot14(&mut self) -> Result<f32> {
        Ok(self.read_i16()? as f32 / 16384.0)
    }

    /// Signed fixed-point with 16 fractional bits.
    pub fn read_fixed(&mut self) -> Result<f64> {
        Ok(self.read_i32()? as f64 / 65536.0)
    }

    /// Decodes `length` bytes as ASCII, one byte per character.
    pub fn read_string(&mut self, length: usize) -> Result<String> {
        let bytes = self.take(length)?;
        Ok(bytes.iter().map(|&byte| char::from(byte)).collect())
    }

    pub fn read_tag(&mut self) -> Result<Tag> {
        let bytes = self.take(4)?;
        Ok(Tag::new([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Reads two u32 words as a 64-bit big-endian seconds count since the
    /// Macintosh epoch and converts it to an absolute timestamp. Values
    /// outside the representable range clamp to the nearest bound.
    pub fn read_datetime(&mut self) -> Result<DateTime<Utc>> {
        let high = self.read_u32()?;
        let low = self.read_u32()?;
        let mac_seconds = (u64::from(high) << 32) | u64::from(low);
        let unix_seconds = i64::try_from(mac_seconds)
            .unwrap_or(i64::MAX)
            .saturating_add(MAC_EPOCH_UNIX_SECONDS);
        let datetime = Utc
            .timestamp_opt(unix_seconds, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Ok(datetime)
    }
}
