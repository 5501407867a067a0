//! Action dispatch and iteration.
//!
//! [`decode`] reads one action record starting at its type byte and
//! [`ActionIterator`] walks a command block's concatenated records.

use super::ability::{self, decode_ability, decode_queue_removal};
use super::hotkey::{self, decode_hotkey};
use super::input::{self, decode_input};
use super::messages::{self, decode_message};
use super::read_unknown;
use super::selection::{self, decode_selection};
use super::types::ReplayAction;
use crate::binary::ByteCursor;
use crate::error::{ReplayError, Result};

/// Marker for a game speed change.
pub const SET_GAME_SPEED: u8 = 0x03;

/// Marker for a resource transfer.
pub const TRANSFER_RESOURCES: u8 = 0x51;

/// Decodes one action record.
///
/// `data` starts at the action type byte and extends to the end of the
/// surrounding command block. Returns the action and the number of bytes
/// it occupies, type byte included. An unrecognized type byte consumes all
/// of `data` as [`ReplayAction::Unknown`].
///
/// # Errors
///
/// Returns `ReplayError::TruncatedRecord` if `data` is empty, a fixed field
/// is cut short, or a string terminator is missing.
///
/// # Example
///
/// ```
/// use w3g_replay::actions::{decode, ReplayAction};
///
/// let data = [0x51, 0x02, 0x01, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00];
/// let (action, consumed) = decode(&data)?;
/// assert_eq!(action, ReplayAction::TransferResources { slot: 2, gold: 1, lumber: 2 });
/// assert_eq!(consumed, 10);
/// # Ok::<(), w3g_replay::error::ReplayError>(())
/// ```
pub fn decode(data: &[u8]) -> Result<(ReplayAction, usize)> {
    let mut cursor = ByteCursor::new(data);
    let type_byte = cursor.read_u8()?;
    let action = decode_body(type_byte, &mut cursor)?;
    Ok((action, cursor.position()))
}

/// Dispatches on the type byte to the record layout.
fn decode_body(type_byte: u8, cursor: &mut ByteCursor<'_>) -> Result<ReplayAction> {
    match type_byte {
        SET_GAME_SPEED => Ok(ReplayAction::SetGameSpeed {
            speed: cursor.read_u8()?,
        }),
        ability::NO_TARGET
        | ability::TARGET_POSITION
        | ability::TARGET_POSITION_OBJECT
        | ability::GIVE_ITEM => decode_ability(type_byte, cursor),
        selection::CHANGE_SELECTION
        | selection::SELECT_SUBGROUP
        | selection::SELECT_UNIT
        | selection::SELECT_GROUND_ITEM
        | selection::CANCEL_HERO_REVIVAL => decode_selection(type_byte, cursor),
        hotkey::ASSIGN_GROUP | hotkey::SELECT_GROUP => decode_hotkey(type_byte, cursor),
        t if ability::REMOVE_FROM_QUEUE.contains(&t) => decode_queue_removal(type_byte, cursor),
        TRANSFER_RESOURCES => {
            let slot = cursor.read_u8()?;
            let gold = cursor.read_u32()?;
            let lumber = cursor.read_u32()?;
            Ok(ReplayAction::TransferResources { slot, gold, lumber })
        }
        messages::CHAT_MESSAGE
        | messages::MMD_MESSAGE
        | messages::W3API
        | messages::BLZ_SYNC
        | messages::COMMAND_FRAME => decode_message(type_byte, cursor),
        input::MINIMAP_PING | input::ARROW_KEY | input::MOUSE => decode_input(type_byte, cursor),
        type_id => Ok(read_unknown(type_id, cursor)),
    }
}

/// Iterator over the action records of one command block.
///
/// Yields one `Result` per record. After the first error the iterator is
/// fused and yields `None`.
///
/// # Example
///
/// ```
/// use w3g_replay::actions::{ActionIterator, ReplayAction};
///
/// let data = [0x18, 0x01, 0x18, 0x02];
/// let actions: Vec<_> = ActionIterator::new(&data).collect::<Result<_, _>>()?;
/// assert_eq!(actions, vec![
///     ReplayAction::SelectGroupHotkey { group: 1 },
///     ReplayAction::SelectGroupHotkey { group: 2 },
/// ]);
/// # Ok::<(), w3g_replay::error::ReplayError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ActionIterator<'a> {
    /// Raw action data bytes.
    data: &'a [u8],

    /// Current offset within data.
    offset: usize,

    /// Whether iteration has finished.
    finished: bool,
}

impl<'a> ActionIterator<'a> {
    /// Creates a new action iterator over a command block's action bytes.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            offset: 0,
            finished: false,
        }
    }

    /// Returns the offset of the next record within the data.
    #[must_use]
    pub fn current_offset(&self) -> usize {
        self.offset
    }

    /// Returns the number of bytes not yet decoded.
    #[must_use]
    pub fn remaining_bytes(&self) -> usize {
        self.data.len().saturating_sub(self.offset)
    }

    /// Returns whether iteration is finished.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished || self.offset >= self.data.len()
    }
}

impl Iterator for ActionIterator<'_> {
    type Item = Result<ReplayAction>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_finished() {
            return None;
        }

        match decode(&self.data[self.offset..]) {
            Ok((action, consumed)) => {
                self.offset += consumed;
                Some(Ok(action))
            }
            Err(e) => {
                self.finished = true;
                Some(Err(relocate(e, self.offset)))
            }
        }
    }
}

/// Shifts a truncation error from record-relative to block-relative sizes.
fn relocate(err: ReplayError, offset: usize) -> ReplayError {
    match err {
        ReplayError::TruncatedRecord {
            expected,
            available,
        } => ReplayError::truncated(expected.saturating_add(offset), available + offset),
        other => other,
    }
}
