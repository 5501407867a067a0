//! # W3G Replay
//!
//! A decoder for Warcraft III replay files (.w3g).
//!
//! A replay is a fixed signature, a small header, and a sequence of
//! zlib-compressed blocks. Inflated and concatenated, the blocks form one
//! stream of self-delimited records: time slices that carry each player's
//! actions, chat lines, and housekeeping records. This crate turns that
//! stream into a chronological list of typed, timestamped events.
//!
//! ## Quick Start
//!
//! ```no_run
//! use w3g_replay::{ReplayInfo, Result};
//!
//! fn print_replay(path: &str) -> Result<()> {
//!     let info = ReplayInfo::from_path(path)?;
//!
//!     println!("Game: {} Version: {}", info.game_id(), info.version());
//!     for event in info.events() {
//!         println!("{event}");
//!     }
//!     for event in info.unknown_events() {
//!         eprintln!("unrecognized: {event}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`error`] - Error types and result alias
//! - [`binary`] - Bounds-checked little-endian reads
//! - [`format`] - Signature and compressed block layouts
//! - [`header`] - Container header and game metadata
//! - [`decompress`] - Block inflation into one stream
//! - [`records`] - Stream blocks: game record, time slices, chat, housekeeping
//! - [`actions`] - Action record decoding
//! - [`event`] - Timestamped events
//! - [`replay`] - The decoding pipeline and its result
//!
//! ## Format Reference
//!
//! - **Header**: 28-byte signature, then five u32 fields; game metadata
//!   follows when the header version is 1
//! - **Blocks**: either 8-byte headers with u16 lengths or 12-byte headers
//!   with u32 lengths, each followed by a zlib payload
//!
//! All multi-byte integers are stored in little-endian byte order.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod actions;
pub mod binary;
pub mod decompress;
pub mod error;
pub mod event;
pub mod format;
pub mod header;
pub mod records;
pub mod replay;

// Re-export commonly used types at the crate root
pub use actions::{ActionIterator, ObjectId, Position, ReplayAction, SelectionMode};
pub use error::{ReplayError, Result};
pub use event::ReplayEvent;
pub use format::BlockLayout;
pub use header::ReplayHeader;
pub use records::{GameRecord, StreamStatus};
pub use replay::{ParserOptions, ReplayInfo, ReplayParser};
