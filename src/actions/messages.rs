//! Text-carrying action records (0x60, 0x6B, 0x77 - 0x79).
//!
//! # Format
//!
//! ```text
//! 60 [mode: 4] [extra: 4] [message: zt]
//! 6B [tag: zt] [value: zt] [text: zt] [data: 4]
//! 77 [command: 4] [data: 4] [len: 4] [buffer: len]
//! 78 [identifier: zt] [value: zt] [unknown: 4]
//! 79 [unknown: 8] [event: 4] [value: f32] [text: zt]
//! ```
//!
//! `zt` marks a zero-terminated UTF-8 string. The terminator is consumed
//! but not kept.

use super::read_unknown;
use super::types::ReplayAction;
use crate::binary::ByteCursor;
use crate::error::Result;

/// Marker for an in-game chat message.
pub const CHAT_MESSAGE: u8 = 0x60;

/// Marker for a map-defined statistics message.
pub const MMD_MESSAGE: u8 = 0x6B;

/// Marker for a W3API command.
pub const W3API: u8 = 0x77;

/// Marker for a Blizzard sync message.
pub const BLZ_SYNC: u8 = 0x78;

/// Marker for a command frame event.
pub const COMMAND_FRAME: u8 = 0x79;

/// Decodes the body of a message record whose type byte was already read.
pub(super) fn decode_message(type_byte: u8, cursor: &mut ByteCursor<'_>) -> Result<ReplayAction> {
    match type_byte {
        CHAT_MESSAGE => {
            let mode = cursor.read_u32()?;
            let extra = cursor.read_u32()?;
            let message = cursor.read_cstring()?;
            Ok(ReplayAction::ChatMessage {
                mode,
                extra,
                message,
            })
        }
        MMD_MESSAGE => {
            let tag = cursor.read_cstring()?;
            let value = cursor.read_cstring()?;
            let text = cursor.read_cstring()?;
            let data = cursor.read_u32()?;
            Ok(ReplayAction::MmdMessage {
                tag,
                value,
                text,
                data,
            })
        }
        W3API => {
            let command = cursor.read_u32()?;
            let data = cursor.read_u32()?;
            let len = cursor.read_u32()? as usize;
            let buffer = String::from_utf8_lossy(cursor.read_bytes(len)?).into_owned();
            Ok(ReplayAction::W3Api {
                command,
                data,
                buffer,
            })
        }
        BLZ_SYNC => {
            let identifier = cursor.read_cstring()?;
            let value = cursor.read_cstring()?;
            cursor.skip(4)?;
            Ok(ReplayAction::BlzSync { identifier, value })
        }
        COMMAND_FRAME => {
            cursor.skip(8)?;
            let event_id = cursor.read_u32()?;
            let value = cursor.read_f32()?;
            let text = cursor.read_cstring()?;
            Ok(ReplayAction::CommandFrame {
                event_id,
                value,
                text,
            })
        }
        _ => Ok(read_unknown(type_byte, cursor)),
    }
}
