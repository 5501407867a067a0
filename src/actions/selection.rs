//! Selection action parsing (0x16, 0x19, 0x1B - 0x1D).
//!
//! Selection actions specify which units are currently selected,
//! providing context for subsequent ability commands.
//!
//! # Format
//!
//! ```text
//! 16 [mode: 1] [count: 1] [objects: 8*count]
//! 19 [item: 4] [object: 8]
//! 1B [object: 8]
//! 1C [item: 8]
//! 1D [hero: 8]
//! ```

use super::{read_net_tag, read_unknown};
use super::types::{NetTag, ObjectId, ReplayAction, SelectionMode};
use crate::binary::ByteCursor;
use crate::error::{ReplayError, Result};

/// Marker for a selection change.
pub const CHANGE_SELECTION: u8 = 0x16;

/// Marker for a subgroup selection.
pub const SELECT_SUBGROUP: u8 = 0x19;

/// Marker for a pre-subselection unit select.
pub const SELECT_UNIT: u8 = 0x1B;

/// Marker for a ground item selection.
pub const SELECT_GROUND_ITEM: u8 = 0x1C;

/// Marker for a hero revival cancel.
pub const CANCEL_HERO_REVIVAL: u8 = 0x1D;

/// Reads `count` consecutive object references.
///
/// The whole list is bounds-checked up front so that a bad count fails
/// before any allocation proportional to it.
pub(super) fn read_net_tags(cursor: &mut ByteCursor<'_>, count: u8) -> Result<Vec<NetTag>> {
    let needed = usize::from(count) * 8;
    if cursor.remaining() < needed {
        return Err(ReplayError::truncated(
            cursor.position() + needed,
            cursor.position() + cursor.remaining(),
        ));
    }
    (0..count).map(|_| read_net_tag(cursor)).collect()
}

/// Decodes the body of a selection record whose type byte was already read.
pub(super) fn decode_selection(
    type_byte: u8,
    cursor: &mut ByteCursor<'_>,
) -> Result<ReplayAction> {
    match type_byte {
        CHANGE_SELECTION => {
            let mode = SelectionMode::from(cursor.read_u8()?);
            let count = cursor.read_u8()?;
            let objects = read_net_tags(cursor, count)?;
            Ok(ReplayAction::ChangeSelection { mode, objects })
        }
        SELECT_SUBGROUP => {
            let item_id = ObjectId(cursor.read_u32()?);
            let object = read_net_tag(cursor)?;
            Ok(ReplayAction::SelectSubgroup { item_id, object })
        }
        SELECT_UNIT => Ok(ReplayAction::SelectUnit {
            object: read_net_tag(cursor)?,
        }),
        SELECT_GROUND_ITEM => Ok(ReplayAction::SelectGroundItem {
            item: read_net_tag(cursor)?,
        }),
        CANCEL_HERO_REVIVAL => Ok(ReplayAction::CancelHeroRevival {
            hero: read_net_tag(cursor)?,
        }),
        _ => Ok(read_unknown(type_byte, cursor)),
    }
}
