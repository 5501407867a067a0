//! Chat and housekeeping blocks.
//!
//! Housekeeping blocks carry nothing the event list needs; they are
//! consumed by their fixed or length-prefixed size and discarded.
//!
//! | Id | Size after id | Meaning |
//! |----|---------------|---------|
//! | 0x17 | 13 | Player leave |
//! | 0x1A, 0x1B, 0x1C | 4 | Game start markers |
//! | 0x22 | 1 + n | Checksum, length-prefixed |
//! | 0x23 | 10 | Unknown |
//! | 0x2F | 8 | Forced game end countdown |

use crate::binary::ByteCursor;
use crate::error::Result;

/// Player leave block id.
pub const LEAVE: u8 = 0x17;

/// First game start marker block id.
pub const START_A: u8 = 0x1A;

/// Second game start marker block id.
pub const START_B: u8 = 0x1B;

/// Third game start marker block id.
pub const START_C: u8 = 0x1C;

/// Chat block id.
pub const CHAT: u8 = 0x20;

/// Checksum block id.
pub const CHECKSUM: u8 = 0x22;

/// Unknown fixed-size block id.
pub const UNKNOWN_23: u8 = 0x23;

/// Forced game end countdown block id.
pub const FORCED_END: u8 = 0x2F;

/// Chat flag value announcing a mode word before the message.
pub const CHAT_FLAGS_WITH_MODE: u8 = 0x20;

/// A chat block (0x20).
///
/// # Format
///
/// ```text
/// 20 [player: 1] [byte_count: 2] [flags: 1] [mode: 4 if flags == 0x20] [message: zt]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatBlock {
    /// Id of the sending player.
    pub player_id: u8,

    /// Declared size of the block after the `byte_count` field.
    pub byte_count: u16,

    /// Chat flags.
    pub flags: u8,

    /// Chat mode (all, allies, observers), 0 when absent.
    pub mode: u32,

    /// Message text.
    pub message: String,
}

impl ChatBlock {
    /// Parses a chat block body. The cursor must sit just past the block id.
    ///
    /// The cursor ends just past the message terminator; `byte_count` is
    /// kept for reference only.
    ///
    /// # Errors
    ///
    /// Returns `ReplayError::TruncatedRecord` if a field or the message
    /// terminator is missing.
    pub fn parse(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let player_id = cursor.read_u8()?;
        let byte_count = cursor.read_u16()?;
        let flags = cursor.read_u8()?;
        let mode = if flags == CHAT_FLAGS_WITH_MODE {
            cursor.read_u32()?
        } else {
            0
        };
        let message = cursor.read_cstring()?;

        Ok(ChatBlock {
            player_id,
            byte_count,
            flags,
            mode,
            message,
        })
    }
}

/// A player leave block (0x17).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaveBlock {
    /// Leave reason.
    pub reason: u32,

    /// Id of the leaving player.
    pub player_id: u8,

    /// Game result for the leaving player.
    pub result: u32,

    /// Unknown trailing word.
    pub unknown: u32,
}

impl LeaveBlock {
    /// Size of a leave block body in bytes.
    pub const SIZE: usize = 13;

    /// Parses a leave block body. The cursor must sit just past the block id.
    ///
    /// # Errors
    ///
    /// Returns `ReplayError::TruncatedRecord` if the block is cut short.
    pub fn parse(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let mut body = ByteCursor::new(cursor.read_bytes(Self::SIZE)?);
        Ok(LeaveBlock {
            reason: body.read_u32()?,
            player_id: body.read_u8()?,
            result: body.read_u32()?,
            unknown: body.read_u32()?,
        })
    }
}

/// Returns whether `block_id` is one the walker understands.
#[must_use]
pub fn is_known_block(block_id: u8) -> bool {
    matches!(
        block_id,
        LEAVE
            | START_A
            | START_B
            | START_C
            | super::TIME_SLICE_OLD
            | super::TIME_SLICE
            | CHAT
            | CHECKSUM
            | UNKNOWN_23
            | FORCED_END
    )
}

/// Consumes the body of a housekeeping block other than 0x17.
///
/// Returns `Ok(false)` without moving the cursor when `block_id` is not a
/// housekeeping block.
///
/// # Errors
///
/// Returns `ReplayError::TruncatedRecord` if the block is cut short.
pub fn skip_housekeeping(block_id: u8, cursor: &mut ByteCursor<'_>) -> Result<bool> {
    match block_id {
        START_A | START_B | START_C => cursor.skip(4)?,
        CHECKSUM => {
            let mut probe = *cursor;
            let len = probe.read_u8()?;
            probe.skip(usize::from(len))?;
            *cursor = probe;
        }
        UNKNOWN_23 => cursor.skip(10)?,
        FORCED_END => cursor.skip(8)?,
        _ => return Ok(false),
    }
    Ok(true)
}
