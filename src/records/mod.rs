//! Decompressed stream parsing.
//!
//! After inflation, the replay is one byte stream of self-delimited blocks,
//! each introduced by a block id byte:
//!
//! - **Game record** (optional, at offset 0): host, game name and roster
//! - **Time slices** (0x1E, 0x1F): a time increment plus per-player command
//!   blocks of action records
//! - **Chat** (0x20): a player chat line
//! - **Housekeeping** (0x17, 0x1A - 0x1C, 0x22, 0x23, 0x2F): leave notices,
//!   start markers, checksums; consumed and discarded
//!
//! [`BlockWalker`] drives the whole stream and produces the event list.
//!
//! # Example
//!
//! ```
//! use w3g_replay::records::{walk, StreamStatus};
//!
//! // A chat block from player 0: "hello"
//! let stream = b"\x20\x00\x07\x00\x00hello\x00";
//! let result = walk(stream);
//!
//! assert_eq!(result.status, StreamStatus::Complete);
//! assert_eq!(result.events[0].to_string(), "0ms Player 0: Chat: hello");
//! ```

pub mod blocks;
pub mod game_record;
pub mod timeslice;
pub mod walker;

pub use blocks::{is_known_block, ChatBlock, LeaveBlock};
pub use game_record::{is_game_record, GameRecord, PlayerRecord, GAME_RECORD_MAGIC};
pub use timeslice::{CommandBlock, CommandBlockIterator, TimeSlice, TIME_SLICE, TIME_SLICE_OLD};
pub use walker::{walk, BlockWalker, StreamStatus, StreamWalk};
