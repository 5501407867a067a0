//! Action record decoding.
//!
//! Each time slice carries command blocks, and each command block carries
//! one player's concatenated action records. A record starts with a type
//! byte that selects one fixed or variable layout; the decoder consumes
//! exactly that record and returns a [`ReplayAction`].
//!
//! # Action Types
//!
//! | Type | Description |
//! |------|-------------|
//! | 0x03 | Set game speed |
//! | 0x10 - 0x13 | Ability orders, optionally targeted |
//! | 0x16 | Selection change |
//! | 0x17, 0x18 | Control group assign and select |
//! | 0x19, 0x1B - 0x1D | Subgroup, unit, ground item, hero revival |
//! | 0x1E, 0x1F | Remove unit from queue |
//! | 0x51 | Transfer resources |
//! | 0x60 | Chat message |
//! | 0x62 | Minimap ping |
//! | 0x6B | MMD message |
//! | 0x75, 0x76 | Arrow key and mouse input |
//! | 0x77 - 0x79 | W3API, `BlzSync`, command frame |
//!
//! Any other type byte becomes [`ReplayAction::Unknown`] holding the rest
//! of the command block.
//!
//! # Example
//!
//! ```
//! use w3g_replay::actions::ActionIterator;
//!
//! let command_block = [0x03, 0x01, 0x18, 0x05];
//! for result in ActionIterator::new(&command_block) {
//!     match result {
//!         Ok(action) => println!("{action}"),
//!         Err(e) => eprintln!("Parse error: {e}"),
//!     }
//! }
//! ```

mod ability;
mod hotkey;
mod input;
mod messages;
mod parser;
mod selection;
mod types;

pub use parser::{decode, ActionIterator};
pub use types::{ArrowKey, NetTag, ObjectId, Position, ReplayAction, SelectionMode};

use crate::binary::ByteCursor;
use crate::error::Result;

/// Keeps the rest of the record as an [`ReplayAction::Unknown`] payload.
fn read_unknown(type_id: u8, cursor: &mut ByteCursor<'_>) -> ReplayAction {
    ReplayAction::Unknown {
        type_id,
        data: cursor.read_rest().to_vec(),
    }
}

/// Reads one 8-byte object reference.
fn read_net_tag(cursor: &mut ByteCursor<'_>) -> Result<NetTag> {
    let a = cursor.read_u32()?;
    let b = cursor.read_u32()?;
    Ok(NetTag::new(a, b))
}
