//! Container signature and block layout detection.
//!
//! Every replay starts with the 28-byte signature
//! `Warcraft III recorded game\x1A\x00`. The compressed blocks that follow
//! the header come in two historical layouts which differ only in the width
//! of their length fields:
//!
//! - **Legacy16**: 8-byte block headers (u16 lengths, u32 checksum)
//! - **Wide32**: 12-byte block headers (u32 lengths, u32 checksum), written
//!   by newer clients and by some ladder recorders
//!
//! The layout is resolved once per file by [`BlockLayout::detect`] and then
//! used for every block.
//!
//! # Example
//!
//! ```
//! use w3g_replay::format::{check_signature, BlockLayout, SIGNATURE};
//!
//! assert!(check_signature(SIGNATURE).is_ok());
//! assert!(check_signature(b"GRBN").is_err());
//! assert_eq!(BlockLayout::Wide32.block_header_size(), 12);
//! ```

use serde::Serialize;

use crate::binary::{read_bytes, read_u16_le, read_u32_le};
use crate::error::{ReplayError, Result};

/// The signature at offset 0 (26 characters + 0x1A + 0x00).
pub const SIGNATURE: &[u8; 28] = b"Warcraft III recorded game\x1A\x00";

/// Game versions at or above this value write `Wide32` block headers.
pub const WIDE_LAYOUT_VERSION_THRESHOLD: u32 = 10000;

/// Validates the signature at the start of `data`.
///
/// # Errors
///
/// Returns `ReplayError::Format` if `data` is shorter than the signature or
/// its first 28 bytes differ.
pub fn check_signature(data: &[u8]) -> Result<()> {
    let found = &data[..data.len().min(SIGNATURE.len())];
    if found == SIGNATURE {
        Ok(())
    } else {
        Err(ReplayError::invalid_signature(found))
    }
}

/// The block header layout of a replay file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BlockLayout {
    /// 8-byte block headers.
    ///
    /// - 2 bytes: Compressed data size
    /// - 2 bytes: Decompressed size (usually 0x2000)
    /// - 4 bytes: Checksum
    Legacy16,

    /// 12-byte block headers.
    ///
    /// - 4 bytes: Compressed data size
    /// - 4 bytes: Decompressed size
    /// - 4 bytes: Checksum
    Wide32,
}

impl BlockLayout {
    /// Returns the size of a block header in bytes for this layout.
    #[must_use]
    pub const fn block_header_size(&self) -> usize {
        match self {
            BlockLayout::Legacy16 => 8,
            BlockLayout::Wide32 => 12,
        }
    }

    /// Returns the layout implied by the game version in the header.
    #[must_use]
    pub const fn from_version(version: u32) -> Self {
        if version < WIDE_LAYOUT_VERSION_THRESHOLD {
            BlockLayout::Legacy16
        } else {
            BlockLayout::Wide32
        }
    }

    /// Reads the compressed and decompressed lengths of a block header.
    ///
    /// # Errors
    ///
    /// Returns `ReplayError::TruncatedRecord` if the header does not fit.
    pub fn read_lengths(&self, data: &[u8], offset: usize) -> Result<(u32, u32)> {
        read_bytes(data, offset, self.block_header_size())?;
        match self {
            BlockLayout::Legacy16 => Ok((
                u32::from(read_u16_le(data, offset)?),
                u32::from(read_u16_le(data, offset + 2)?),
            )),
            BlockLayout::Wide32 => Ok((
                read_u32_le(data, offset)?,
                read_u32_le(data, offset + 4)?,
            )),
        }
    }

    /// Infers the layout from the first block header at `offset`.
    ///
    /// A layout is plausible when its declared compressed length fits in
    /// the remaining bytes and the payload opens with a zlib header. When
    /// both or neither layout is plausible, `hint` decides.
    #[must_use]
    pub fn detect(data: &[u8], offset: usize, hint: BlockLayout) -> Self {
        let legacy = BlockLayout::Legacy16.is_plausible_at(data, offset);
        let wide = BlockLayout::Wide32.is_plausible_at(data, offset);
        let layout = match (legacy, wide) {
            (true, false) => BlockLayout::Legacy16,
            (false, true) => BlockLayout::Wide32,
            _ => hint,
        };
        tracing::debug!(?layout, legacy, wide, ?hint, "resolved block layout");
        layout
    }

    fn is_plausible_at(&self, data: &[u8], offset: usize) -> bool {
        let Ok((compressed_len, _)) = self.read_lengths(data, offset) else {
            return false;
        };
        let start = offset + self.block_header_size();
        match read_bytes(data, start, compressed_len as usize) {
            Ok(payload) => is_zlib_header(payload),
            Err(_) => false,
        }
    }
}

/// Returns whether `payload` opens with a valid zlib stream header.
fn is_zlib_header(payload: &[u8]) -> bool {
    match payload {
        [cmf, flg, ..] => {
            cmf & 0x0F == 8 && cmf >> 4 <= 7 && (u16::from(*cmf) << 8 | u16::from(*flg)) % 31 == 0
        }
        _ => false,
    }
}
