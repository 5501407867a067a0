//! Camera and pointer input parsing (0x62, 0x75, 0x76).
//!
//! # Format
//!
//! ```text
//! 62 [x: 4] [y: 4] [flags: 4]
//! 75 [key: 1]
//! 76 [event: 1] [x: f32] [y: f32] [button: 1]
//! ```
//!
//! Minimap ping coordinates are kept as the raw 32-bit words; their
//! encoding differs between client versions.

use super::read_unknown;
use super::types::{ArrowKey, Position, ReplayAction};
use crate::binary::ByteCursor;
use crate::error::Result;

/// Marker for a minimap ping.
pub const MINIMAP_PING: u8 = 0x62;

/// Marker for an arrow key event.
pub const ARROW_KEY: u8 = 0x75;

/// Marker for a mouse event.
pub const MOUSE: u8 = 0x76;

/// Decodes the body of an input record whose type byte was already read.
pub(super) fn decode_input(type_byte: u8, cursor: &mut ByteCursor<'_>) -> Result<ReplayAction> {
    match type_byte {
        MINIMAP_PING => {
            let x = cursor.read_u32()?;
            let y = cursor.read_u32()?;
            let flags = cursor.read_u32()?;
            Ok(ReplayAction::MinimapPing { x, y, flags })
        }
        ARROW_KEY => Ok(ReplayAction::ArrowKey {
            key: ArrowKey::from(cursor.read_u8()?),
        }),
        MOUSE => {
            let event_id = cursor.read_u8()?;
            let position = Position::new(cursor.read_f32()?, cursor.read_f32()?);
            let button = cursor.read_u8()?;
            Ok(ReplayAction::Mouse {
                event_id,
                position,
                button,
            })
        }
        _ => Ok(read_unknown(type_byte, cursor)),
    }
}
