//! Hotkey action parsing (0x17, 0x18).
//!
//! Hotkey actions represent control group operations such as
//! assigning units to groups (Ctrl+N) or selecting groups (N).
//!
//! # Format
//!
//! ```text
//! 17 [group: 1] [count: 1] [objects: 8*count]
//! 18 [group: 1]
//! ```

use super::read_unknown;
use super::selection::read_net_tags;
use super::types::ReplayAction;
use crate::binary::ByteCursor;
use crate::error::Result;

/// Marker for assigning a control group.
pub const ASSIGN_GROUP: u8 = 0x17;

/// Marker for selecting a control group.
pub const SELECT_GROUP: u8 = 0x18;

/// Decodes the body of a hotkey record whose type byte was already read.
pub(super) fn decode_hotkey(type_byte: u8, cursor: &mut ByteCursor<'_>) -> Result<ReplayAction> {
    match type_byte {
        SELECT_GROUP => Ok(ReplayAction::SelectGroupHotkey {
            group: cursor.read_u8()?,
        }),
        ASSIGN_GROUP => {
            let group = cursor.read_u8()?;
            let count = cursor.read_u8()?;
            let objects = read_net_tags(cursor, count)?;
            Ok(ReplayAction::AssignGroupHotkey { group, objects })
        }
        _ => Ok(read_unknown(type_byte, cursor)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::NetTag;

    #[test]
    fn test_assign_group() {
        let mut data = vec![0x01, 0x02];
        for id in [0x10u32, 0x11, 0x20, 0x21] {
            data.extend_from_slice(&id.to_le_bytes());
        }
        let mut cursor = ByteCursor::new(&data);

        let action = decode_hotkey(ASSIGN_GROUP, &mut cursor).unwrap();
        assert_eq!(
            action,
            ReplayAction::AssignGroupHotkey {
                group: 1,
                objects: vec![NetTag::new(0x10, 0x11), NetTag::new(0x20, 0x21)],
            }
        );
        assert_eq!(cursor.position(), 18);
    }

    #[test]
    fn test_select_group() {
        let data = [0x09, 0xAA];
        let mut cursor = ByteCursor::new(&data);

        let action = decode_hotkey(SELECT_GROUP, &mut cursor).unwrap();
        assert_eq!(action, ReplayAction::SelectGroupHotkey { group: 9 });
        assert_eq!(action.explain(), "Select group 9");
        assert_eq!(cursor.position(), 1);
    }

    #[test]
    fn test_assign_group_truncated() {
        let data = [0x01, 0x01, 0x00, 0x00];
        let mut cursor = ByteCursor::new(&data);
        assert!(decode_hotkey(ASSIGN_GROUP, &mut cursor)
            .unwrap_err()
            .is_truncation());
    }

    #[test]
    fn test_unrouted_type_is_unknown() {
        let data = [0x02, 0x00];
        let mut cursor = ByteCursor::new(&data);
        let action = decode_hotkey(0x19, &mut cursor).unwrap();
        assert_eq!(action.type_byte(), 0x19);
        assert!(action.is_unknown());
        assert!(cursor.is_empty());
    }
}
