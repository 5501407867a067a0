//! Container header parsing.
//!
//! # Header Layout
//!
//! | Offset | Size | Field | Description |
//! |--------|------|-------|-------------|
//! | 0x00 | 28 | signature | "Warcraft III recorded game\x1A\x00" |
//! | 0x1C | 4 | `header_size` | Absolute offset of the first block |
//! | 0x20 | 4 | `compressed_size` | Informational |
//! | 0x24 | 4 | `header_version` | 1 when game metadata follows |
//! | 0x28 | 4 | `decompressed_size` | Informational |
//! | 0x2C | 4 | `block_count` | Number of compressed blocks |
//!
//! With `header_version == 1` the metadata sub-header follows:
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0x30 | 4 | `game_id` ("W3XP", "WAR3", or reversed forms) |
//! | 0x34 | 4 | `version` |
//! | 0x38 | 2 | `build` |
//! | 0x3A | 2 | `flags` |
//! | 0x3C | 4 | `game_length_ms` |
//! | 0x40 | 4 | `crc` |
//!
//! The header may carry reserved bytes after the metadata; blocks always
//! start at `header_size`, not at the end of the metadata.

use serde::Serialize;

use crate::binary::ByteCursor;
use crate::error::{ReplayError, Result};
use crate::format::{check_signature, BlockLayout, SIGNATURE};

/// The header version that carries the game metadata sub-header.
pub const METADATA_HEADER_VERSION: u32 = 1;

/// Game metadata present when `header_version == 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameMetadata {
    /// Four-character product code as stored (e.g. "W3XP").
    pub game_id: String,

    /// Game version number.
    pub version: u32,

    /// Build number.
    pub build: u16,

    /// Header flags (0x8000 for multiplayer games).
    pub flags: u16,

    /// Game length in milliseconds.
    pub game_length_ms: u32,

    /// Header checksum. Not verified.
    pub crc: u32,
}

/// The parsed container header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayHeader {
    /// Absolute offset of the first compressed block.
    pub header_size: u32,

    /// Declared compressed size. Informational only.
    pub compressed_size: u32,

    /// Header version.
    pub header_version: u32,

    /// Declared decompressed size. Informational only.
    pub decompressed_size: u32,

    /// Number of compressed blocks following the header.
    pub block_count: u32,

    /// Metadata sub-header, present only for header version 1.
    pub metadata: Option<GameMetadata>,
}

impl ReplayHeader {
    /// Parses the container header from the start of a replay file.
    ///
    /// # Errors
    ///
    /// Returns `ReplayError::Format` if the signature does not match or the
    /// header ends before its fields do.
    ///
    /// # Example
    ///
    /// ```
    /// use w3g_replay::format::SIGNATURE;
    /// use w3g_replay::header::ReplayHeader;
    ///
    /// let mut data = SIGNATURE.to_vec();
    /// for field in [0x30u32, 0, 0, 0, 0] {
    ///     data.extend_from_slice(&field.to_le_bytes());
    /// }
    /// let header = ReplayHeader::parse(&data)?;
    /// assert_eq!(header.block_count, 0);
    /// assert!(header.metadata.is_none());
    /// # Ok::<(), w3g_replay::error::ReplayError>(())
    /// ```
    pub fn parse(data: &[u8]) -> Result<Self> {
        check_signature(data)?;
        Self::parse_fields(ByteCursor::at(data, SIGNATURE.len())).map_err(|e| {
            ReplayError::Format {
                reason: format!("header truncated: {e}"),
            }
        })
    }

    fn parse_fields(mut cursor: ByteCursor<'_>) -> Result<Self> {
        let header_size = cursor.read_u32()?;
        let compressed_size = cursor.read_u32()?;
        let header_version = cursor.read_u32()?;
        let decompressed_size = cursor.read_u32()?;
        let block_count = cursor.read_u32()?;

        let metadata = if header_version == METADATA_HEADER_VERSION {
            let game_id = String::from_utf8_lossy(cursor.read_bytes(4)?).into_owned();
            Some(GameMetadata {
                game_id,
                version: cursor.read_u32()?,
                build: cursor.read_u16()?,
                flags: cursor.read_u16()?,
                game_length_ms: cursor.read_u32()?,
                crc: cursor.read_u32()?,
            })
        } else {
            None
        };

        Ok(ReplayHeader {
            header_size,
            compressed_size,
            header_version,
            decompressed_size,
            block_count,
            metadata,
        })
    }

    /// Returns the byte offset where the first compressed block begins.
    #[must_use]
    pub fn data_offset(&self) -> usize {
        self.header_size as usize
    }

    /// Returns the game id, or an empty string without metadata.
    #[must_use]
    pub fn game_id(&self) -> &str {
        self.metadata.as_ref().map_or("", |m| m.game_id.as_str())
    }

    /// Returns the game version, or 0 without metadata.
    #[must_use]
    pub fn version(&self) -> u32 {
        self.metadata.as_ref().map_or(0, |m| m.version)
    }

    /// Returns the build number, or 0 without metadata.
    #[must_use]
    pub fn build(&self) -> u16 {
        self.metadata.as_ref().map_or(0, |m| m.build)
    }

    /// Returns the game length in milliseconds, or 0 without metadata.
    #[must_use]
    pub fn game_length_ms(&self) -> u32 {
        self.metadata.as_ref().map_or(0, |m| m.game_length_ms)
    }

    /// Returns the block layout suggested by the game version.
    ///
    /// Used as the tie-breaker for [`BlockLayout::detect`].
    #[must_use]
    pub fn layout_hint(&self) -> BlockLayout {
        BlockLayout::from_version(self.version())
    }
}
