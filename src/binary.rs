//! Binary reading utilities for W3G replay data.
//!
//! Two styles are provided. The free functions read a value at an absolute
//! offset and are used for the fixed container header. [`ByteCursor`] is a
//! bounds-checked view that advances as it reads and is used wherever the
//! layout is variable (blocks, records, actions).
//!
//! Every read checks that enough bytes remain before interpreting anything
//! and returns [`ReplayError::TruncatedRecord`] otherwise. A failed read
//! never moves the cursor.
//!
//! # Example
//!
//! ```
//! use w3g_replay::binary::{read_u32_le, ByteCursor};
//!
//! let data = [0x26, 0x89, 0x01, 0x00, b'H', b'i', 0x00];
//! assert_eq!(read_u32_le(&data, 0).unwrap(), 100_646);
//!
//! let mut cursor = ByteCursor::new(&data);
//! cursor.skip(4).unwrap();
//! assert_eq!(cursor.read_cstring().unwrap(), "Hi");
//! assert!(cursor.is_empty());
//! ```

use crate::error::{ReplayError, Result};

/// Reads a little-endian u16 value at the given offset.
///
/// # Errors
///
/// Returns `ReplayError::TruncatedRecord` if fewer than 2 bytes remain.
pub fn read_u16_le(bytes: &[u8], offset: usize) -> Result<u16> {
    let slice = read_bytes(bytes, offset, 2)?;
    Ok(u16::from_le_bytes([slice[0], slice[1]]))
}

/// Reads a little-endian u32 value at the given offset.
///
/// # Errors
///
/// Returns `ReplayError::TruncatedRecord` if fewer than 4 bytes remain.
pub fn read_u32_le(bytes: &[u8], offset: usize) -> Result<u32> {
    let slice = read_bytes(bytes, offset, 4)?;
    Ok(u32::from_le_bytes([slice[0], slice[1], slice[2], slice[3]]))
}

/// Reads a slice of `len` bytes at the given offset.
///
/// # Errors
///
/// Returns `ReplayError::TruncatedRecord` if the buffer is too short.
pub fn read_bytes(bytes: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    let end = offset
        .checked_add(len)
        .ok_or_else(|| ReplayError::truncated(usize::MAX, bytes.len()))?;
    if end > bytes.len() {
        return Err(ReplayError::truncated(end, bytes.len()));
    }
    Ok(&bytes[offset..end])
}

/// A bounds-checked, forward-only reader over a borrowed byte slice.
///
/// Copying a cursor is cheap, which lets callers try a decode on a copy and
/// only commit the new position once the whole record has been read.
#[derive(Debug, Clone, Copy)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    /// Creates a cursor positioned at the start of `data`.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Creates a cursor positioned at `offset` within `data`.
    ///
    /// Offsets past the end are clamped to the end.
    #[must_use]
    pub fn at(data: &'a [u8], offset: usize) -> Self {
        Self {
            data,
            pos: offset.min(data.len()),
        }
    }

    /// Returns the current offset from the start of the underlying slice.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the number of unread bytes.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Returns whether every byte has been consumed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns the unread bytes without consuming them.
    #[must_use]
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    /// Returns the next byte without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    /// Consumes and returns the next `len` bytes.
    ///
    /// # Errors
    ///
    /// Returns `ReplayError::TruncatedRecord` if fewer than `len` bytes remain.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let slice = read_bytes(self.data, self.pos, len)?;
        self.pos += len;
        Ok(slice)
    }

    /// Consumes the rest of the slice.
    pub fn read_rest(&mut self) -> &'a [u8] {
        let rest = self.rest();
        self.pos = self.data.len();
        rest
    }

    /// Skips `len` bytes.
    ///
    /// # Errors
    ///
    /// Returns `ReplayError::TruncatedRecord` if fewer than `len` bytes remain.
    pub fn skip(&mut self, len: usize) -> Result<()> {
        self.read_bytes(len).map(|_| ())
    }

    /// Consumes a fixed-size array.
    ///
    /// # Errors
    ///
    /// Returns `ReplayError::TruncatedRecord` if fewer than `N` bytes remain.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let slice = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Ok(out)
    }

    /// Reads a u8.
    ///
    /// # Errors
    ///
    /// Returns `ReplayError::TruncatedRecord` at the end of the slice.
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    /// Reads a little-endian u16.
    ///
    /// # Errors
    ///
    /// Returns `ReplayError::TruncatedRecord` if fewer than 2 bytes remain.
    pub fn read_u16(&mut self) -> Result<u16> {
        self.read_array().map(u16::from_le_bytes)
    }

    /// Reads a little-endian u32.
    ///
    /// # Errors
    ///
    /// Returns `ReplayError::TruncatedRecord` if fewer than 4 bytes remain.
    pub fn read_u32(&mut self) -> Result<u32> {
        self.read_array().map(u32::from_le_bytes)
    }

    /// Reads a little-endian u64.
    ///
    /// # Errors
    ///
    /// Returns `ReplayError::TruncatedRecord` if fewer than 8 bytes remain.
    pub fn read_u64(&mut self) -> Result<u64> {
        self.read_array().map(u64::from_le_bytes)
    }

    /// Reads a little-endian IEEE-754 single precision float.
    ///
    /// # Errors
    ///
    /// Returns `ReplayError::TruncatedRecord` if fewer than 4 bytes remain.
    pub fn read_f32(&mut self) -> Result<f32> {
        self.read_array().map(f32::from_le_bytes)
    }

    /// Reads a zero-terminated UTF-8 string.
    ///
    /// The terminator is consumed but not included. Invalid UTF-8 sequences
    /// are replaced with U+FFFD.
    ///
    /// # Errors
    ///
    /// Returns `ReplayError::TruncatedRecord` if no terminator is found
    /// before the end of the slice. The cursor is left untouched.
    pub fn read_cstring(&mut self) -> Result<String> {
        let bytes = self.read_cstring_bytes()?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    /// Reads the raw bytes of a zero-terminated string, terminator excluded.
    ///
    /// # Errors
    ///
    /// Returns `ReplayError::TruncatedRecord` if no terminator is found.
    pub fn read_cstring_bytes(&mut self) -> Result<&'a [u8]> {
        let rest = self.rest();
        let len = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| ReplayError::truncated(self.data.len() + 1, self.data.len()))?;
        self.pos += len + 1;
        Ok(&rest[..len])
    }
}
