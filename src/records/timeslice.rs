//! Time slice block parsing.
//!
//! # Format
//!
//! | Offset | Size | Type | Field |
//! |--------|------|------|-------|
//! | 0 | 1 | u8 | Block id (0x1E or 0x1F) |
//! | 1 | 2 | u16 LE | Block length, counted from offset 3 |
//! | 3 | 2 | u16 LE | Time increment (milliseconds) |
//! | 5 | var | bytes | Command blocks (`block length - 2` bytes) |
//!
//! Each command block is:
//!
//! | Size | Type | Field |
//! |------|------|-------|
//! | 1 | u8 | Player id |
//! | 2 | u16 LE | Action data length |
//! | var | bytes | Concatenated action records |

use crate::actions::ActionIterator;
use crate::binary::ByteCursor;
use crate::error::{ReplayError, Result};

/// Time slice block id (older clients).
pub const TIME_SLICE_OLD: u8 = 0x1E;

/// Time slice block id.
pub const TIME_SLICE: u8 = 0x1F;

/// A time slice block borrowed from the decompressed stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlice<'a> {
    /// Time increment in milliseconds since the previous slice.
    pub time_increment_ms: u16,

    /// Raw command block bytes.
    pub command_data: &'a [u8],
}

impl<'a> TimeSlice<'a> {
    /// Parses a time slice body. The cursor must sit just past the block id.
    ///
    /// # Errors
    ///
    /// Returns `ReplayError::TruncatedRecord` if the declared length is below
    /// 2 or the slice runs past the end of the stream.
    pub fn parse(cursor: &mut ByteCursor<'a>) -> Result<Self> {
        let start = cursor.position();
        let block_length = cursor.read_u16()?;
        if block_length < 2 {
            let declared_end = start + 2 + usize::from(block_length);
            return Err(ReplayError::truncated(start + 4, declared_end));
        }
        let time_increment_ms = cursor.read_u16()?;
        let command_data = cursor.read_bytes(usize::from(block_length) - 2)?;
        Ok(TimeSlice {
            time_increment_ms,
            command_data,
        })
    }

    /// Returns an iterator over the command blocks of this slice.
    #[must_use]
    pub fn commands(&self) -> CommandBlockIterator<'a> {
        CommandBlockIterator::new(self.command_data)
    }

    /// Returns whether this slice carries no commands.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.command_data.is_empty()
    }
}

/// One player's actions within a time slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandBlock<'a> {
    /// Id of the issuing player.
    pub player_id: u8,

    /// Concatenated action records.
    pub action_data: &'a [u8],
}

impl<'a> CommandBlock<'a> {
    /// Returns an iterator over the decoded actions of this block.
    #[must_use]
    pub fn actions(&self) -> ActionIterator<'a> {
        ActionIterator::new(self.action_data)
    }
}

/// Iterator over the command blocks of a time slice.
///
/// Fused after the first error.
#[derive(Debug, Clone)]
pub struct CommandBlockIterator<'a> {
    cursor: ByteCursor<'a>,
    finished: bool,
}

impl<'a> CommandBlockIterator<'a> {
    /// Creates an iterator over raw command block bytes.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: ByteCursor::new(data),
            finished: false,
        }
    }

    fn parse_next(&mut self) -> Result<CommandBlock<'a>> {
        let mut cursor = self.cursor;
        let player_id = cursor.read_u8()?;
        let action_len = cursor.read_u16()?;
        let action_data = cursor.read_bytes(usize::from(action_len))?;
        self.cursor = cursor;
        Ok(CommandBlock {
            player_id,
            action_data,
        })
    }
}

impl<'a> Iterator for CommandBlockIterator<'a> {
    type Item = Result<CommandBlock<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished || self.cursor.is_empty() {
            return None;
        }

        let result = self.parse_next();
        if result.is_err() {
            self.finished = true;
        }
        Some(result)
    }
}
