//! Ability order parsing (0x10 - 0x13) and queue removal (0x1E, 0x1F).
//!
//! The four ability records share one prefix and differ only in how many
//! target fields follow it.
//!
//! # Format
//!
//! ```text
//! 10 [flags: 2] [order: 4] [unknown: 8]
//! 11 [flags: 2] [order: 4] [unknown: 8] [x: f32] [y: f32]
//! 12 [flags: 2] [order: 4] [unknown: 8] [x: f32] [y: f32] [object: 8]
//! 13 [flags: 2] [order: 4] [unknown: 8] [x: f32] [y: f32] [unit: 8] [item: 8]
//! 1E [slot: 1] [item: 4]
//! ```

use super::types::{ObjectId, Position, ReplayAction};
use super::{read_net_tag, read_unknown};
use crate::binary::ByteCursor;
use crate::error::Result;

/// Marker for an ability without target.
pub const NO_TARGET: u8 = 0x10;

/// Marker for an ability with a ground target.
pub const TARGET_POSITION: u8 = 0x11;

/// Marker for an ability with a ground target and an object.
pub const TARGET_POSITION_OBJECT: u8 = 0x12;

/// Marker for giving an item to a unit.
pub const GIVE_ITEM: u8 = 0x13;

/// Markers for removing a unit from a queue.
pub const REMOVE_FROM_QUEUE: [u8; 2] = [0x1E, 0x1F];

/// Decodes the body of an ability record whose type byte was already read.
pub(super) fn decode_ability(type_byte: u8, cursor: &mut ByteCursor<'_>) -> Result<ReplayAction> {
    match type_byte {
        NO_TARGET => {
            let (flags, order_id) = read_order(cursor)?;
            Ok(ReplayAction::UnitAbilityNoTarget { flags, order_id })
        }
        TARGET_POSITION => {
            let (flags, order_id) = read_order(cursor)?;
            Ok(ReplayAction::UnitAbilityTargetPosition {
                flags,
                order_id,
                target: read_position(cursor)?,
            })
        }
        TARGET_POSITION_OBJECT => {
            let (flags, order_id) = read_order(cursor)?;
            Ok(ReplayAction::UnitAbilityTargetPositionObject {
                flags,
                order_id,
                target: read_position(cursor)?,
                object: read_net_tag(cursor)?,
            })
        }
        GIVE_ITEM => {
            let (flags, order_id) = read_order(cursor)?;
            let target = read_position(cursor)?;
            let unit = read_net_tag(cursor)?;
            let item = read_net_tag(cursor)?;
            Ok(ReplayAction::GiveItemToUnit {
                flags,
                order_id,
                target,
                unit,
                item,
            })
        }
        _ => Ok(read_unknown(type_byte, cursor)),
    }
}

/// Reads the flags and order id shared by all ability records, then skips
/// the two unused words that follow.
fn read_order(cursor: &mut ByteCursor<'_>) -> Result<(u16, ObjectId)> {
    let flags = cursor.read_u16()?;
    let order_id = ObjectId(cursor.read_u32()?);
    cursor.skip(8)?;
    Ok((flags, order_id))
}

fn read_position(cursor: &mut ByteCursor<'_>) -> Result<Position> {
    Ok(Position::new(cursor.read_f32()?, cursor.read_f32()?))
}

/// Decodes the body of a queue removal record.
pub(super) fn decode_queue_removal(
    type_byte: u8,
    cursor: &mut ByteCursor<'_>,
) -> Result<ReplayAction> {
    if !REMOVE_FROM_QUEUE.contains(&type_byte) {
        return Ok(read_unknown(type_byte, cursor));
    }
    let slot = cursor.read_u8()?;
    let item_id = ObjectId(cursor.read_u32()?);
    Ok(ReplayAction::RemoveUnitFromQueue {
        type_byte,
        slot,
        item_id,
    })
}
