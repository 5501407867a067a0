//! Block stream walker.
//!
//! Walks the decompressed stream one block at a time, keeps the running
//! game clock and turns every decoded action into a [`ReplayEvent`].
//!
//! The walker never fails. Structural problems end the walk early and are
//! reported through [`StreamStatus`]; the events decoded up to that point
//! are kept.

use serde::Serialize;

use super::blocks::{self, is_known_block, skip_housekeeping, ChatBlock, LeaveBlock};
use super::game_record::{is_game_record, GameRecord};
use super::timeslice::{TimeSlice, TIME_SLICE, TIME_SLICE_OLD};
use crate::actions::ReplayAction;
use crate::binary::ByteCursor;
use crate::error::Result;
use crate::event::ReplayEvent;

/// Why the walk over the decompressed stream ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StreamStatus {
    /// Every byte of the stream was consumed.
    Complete,

    /// A block id outside the known set was met.
    UnknownBlock {
        /// The unrecognized block id.
        block_id: u8,
        /// Offset of the block within the decompressed stream.
        offset: usize,
    },

    /// A block or one of its records was cut short or overran its bounds.
    Truncated {
        /// Offset of the failing block within the decompressed stream.
        offset: usize,
    },
}

impl StreamStatus {
    /// Returns whether the whole stream was walked.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self, StreamStatus::Complete)
    }
}

/// Everything the walker extracted from one stream.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamWalk {
    /// Events in stream order, with non-decreasing timestamps.
    pub events: Vec<ReplayEvent>,

    /// The leading game record, when present and enabled.
    pub game: Option<GameRecord>,

    /// Why the walk ended.
    pub status: StreamStatus,
}

/// Walks a decompressed replay stream.
///
/// # Example
///
/// ```
/// use w3g_replay::records::{BlockWalker, StreamStatus};
///
/// // One time slice: 1000 ms, player 0 transfers resources.
/// let stream = [
///     0x1F, 0x0F, 0x00, 0xE8, 0x03,
///     0x00, 0x0A, 0x00,
///     0x51, 0x02, 0x01, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00,
/// ];
/// let walk = BlockWalker::new(&stream).run();
/// assert_eq!(walk.status, StreamStatus::Complete);
/// assert_eq!(walk.events.len(), 1);
/// assert_eq!(walk.events[0].time_ms, 1000);
/// ```
#[derive(Debug)]
pub struct BlockWalker<'a> {
    cursor: ByteCursor<'a>,
    clock_ms: u32,
    events: Vec<ReplayEvent>,
    parse_game_record: bool,
}

impl<'a> BlockWalker<'a> {
    /// Creates a walker over a decompressed stream.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: ByteCursor::new(data),
            clock_ms: 0,
            events: Vec::new(),
            parse_game_record: true,
        }
    }

    /// Sets whether a leading game record is decoded. Enabled by default.
    #[must_use]
    pub fn with_game_record(mut self, enabled: bool) -> Self {
        self.parse_game_record = enabled;
        self
    }

    /// Walks the whole stream.
    #[must_use]
    pub fn run(mut self) -> StreamWalk {
        let game = match self.read_preamble() {
            Ok(game) => game,
            Err(e) => {
                tracing::warn!(error = %e, "game record truncated");
                return self.finish(None, StreamStatus::Truncated { offset: 0 });
            }
        };

        while let Some(block_id) = self.cursor.peek() {
            let offset = self.cursor.position();
            match self.read_block(block_id) {
                Ok(true) => {}
                Ok(false) => {
                    tracing::debug!(
                        block_id = format_args!("0x{block_id:02X}"),
                        offset,
                        "unknown block, stopping"
                    );
                    return self.finish(game, StreamStatus::UnknownBlock { block_id, offset });
                }
                Err(e) => {
                    tracing::warn!(
                        block_id = format_args!("0x{block_id:02X}"),
                        offset,
                        error = %e,
                        "truncated block, stopping"
                    );
                    return self.finish(game, StreamStatus::Truncated { offset });
                }
            }
        }

        self.finish(game, StreamStatus::Complete)
    }

    fn finish(self, game: Option<GameRecord>, status: StreamStatus) -> StreamWalk {
        tracing::debug!(
            events = self.events.len(),
            clock_ms = self.clock_ms,
            ?status,
            "stream walk finished"
        );
        StreamWalk {
            events: self.events,
            game,
            status,
        }
    }

    /// Decodes the game record, or skips a leading stream constant.
    fn read_preamble(&mut self) -> Result<Option<GameRecord>> {
        let data = self.cursor.rest();
        if self.parse_game_record && is_game_record(data) {
            let (game, consumed) = GameRecord::parse(data)?;
            self.cursor.skip(consumed)?;
            tracing::debug!(
                host = %game.host.name,
                players = game.players.len(),
                consumed,
                "decoded game record"
            );
            return Ok(Some(game));
        }

        // A stream that opens with a known block id carries no leading
        // constant; skipping four bytes there would split the first block.
        if matches!(self.cursor.peek(), Some(id) if !is_known_block(id)) && data.len() >= 4 {
            self.cursor.skip(4)?;
        }
        Ok(None)
    }

    /// Reads one block. Returns `Ok(false)` for an unknown block id.
    ///
    /// The cursor only moves when the whole block was read.
    fn read_block(&mut self, block_id: u8) -> Result<bool> {
        let mut cursor = self.cursor;
        cursor.skip(1)?;

        match block_id {
            TIME_SLICE | TIME_SLICE_OLD => {
                let slice = TimeSlice::parse(&mut cursor)?;
                self.clock_ms = self
                    .clock_ms
                    .saturating_add(u32::from(slice.time_increment_ms));
                for command in slice.commands() {
                    let command = command?;
                    for action in command.actions() {
                        self.push(command.player_id, action?);
                    }
                }
            }
            blocks::CHAT => {
                let chat = ChatBlock::parse(&mut cursor)?;
                self.push(
                    chat.player_id,
                    ReplayAction::ChatMessage {
                        mode: chat.mode,
                        extra: 0,
                        message: chat.message,
                    },
                );
            }
            blocks::LEAVE => {
                let leave = LeaveBlock::parse(&mut cursor)?;
                tracing::trace!(
                    player_id = leave.player_id,
                    reason = leave.reason,
                    result = leave.result,
                    "player left"
                );
            }
            other => {
                if !skip_housekeeping(other, &mut cursor)? {
                    return Ok(false);
                }
            }
        }

        self.cursor = cursor;
        Ok(true)
    }

    fn push(&mut self, player_id: u8, action: ReplayAction) {
        self.events
            .push(ReplayEvent::new(self.clock_ms, player_id, action));
    }
}

/// Walks a decompressed stream with default settings.
#[must_use]
pub fn walk(data: &[u8]) -> StreamWalk {
    BlockWalker::new(data).run()
}
