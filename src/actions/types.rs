//! Core action types and structures.
//!
//! This module defines the closed [`ReplayAction`] enum and the small value
//! types its variants carry.

use serde::{Serialize, Serializer};
use std::fmt;

/// An opaque in-game object reference made of two 32-bit halves.
///
/// Displays as `[AAAAAAAA,BBBBBBBB]` in upper-case hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NetTag {
    /// First half of the reference.
    pub a: u32,
    /// Second half of the reference.
    pub b: u32,
}

impl NetTag {
    /// Creates a new `NetTag`.
    #[must_use]
    pub const fn new(a: u32, b: u32) -> Self {
        Self { a, b }
    }
}

impl fmt::Display for NetTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:08X},{:08X}]", self.a, self.b)
    }
}

/// A `FourCC` order or item identifier.
///
/// Identifiers are stored in reverse byte order. For example, "htow"
/// (Town Hall) is stored as "woth" [77 6F 74 68], which reads as the
/// little-endian value `0x6874_6F77`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(pub u32);

impl ObjectId {
    /// Gets the raw bytes as stored in the replay.
    #[must_use]
    pub fn raw_bytes(&self) -> [u8; 4] {
        self.0.to_le_bytes()
    }

    /// Gets the canonical (reversed) four-character form, if printable.
    ///
    /// Returns `None` for numeric order ids such as `0x000D0003`.
    #[must_use]
    pub fn fourcc(&self) -> Option<String> {
        let canonical = self.0.to_be_bytes();
        canonical
            .iter()
            .all(|&b| b.is_ascii_graphic() || b == b' ')
            .then(|| canonical.iter().map(|&b| char::from(b)).collect())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId(0x{:08X} -> \"{self}\")", self.0)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.fourcc() {
            Some(code) => f.write_str(&code),
            None => write!(f, "0x{:08X}", self.0),
        }
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A map coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    /// X coordinate (West-East axis).
    pub x: f32,
    /// Y coordinate (South-North axis).
    pub y: f32,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// How a selection change applies to the current selection (0x16).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SelectionMode {
    /// Add the listed objects to the selection (mode 1).
    Add,
    /// Remove the listed objects from the selection (mode 2).
    Remove,
    /// Unrecognized mode byte.
    Unknown(u8),
}

impl From<u8> for SelectionMode {
    fn from(value: u8) -> Self {
        match value {
            1 => SelectionMode::Add,
            2 => SelectionMode::Remove,
            n => SelectionMode::Unknown(n),
        }
    }
}

impl SelectionMode {
    /// Returns the raw mode byte.
    #[must_use]
    pub fn as_byte(&self) -> u8 {
        match self {
            SelectionMode::Add => 1,
            SelectionMode::Remove => 2,
            SelectionMode::Unknown(n) => *n,
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionMode::Add => write!(f, "add"),
            SelectionMode::Remove => write!(f, "remove"),
            SelectionMode::Unknown(n) => write!(f, "{n}"),
        }
    }
}

/// An arrow key press or release (0x75).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ArrowKey {
    /// Left arrow pressed (0).
    PressLeft,
    /// Left arrow released (1).
    ReleaseLeft,
    /// Right arrow pressed (2).
    PressRight,
    /// Right arrow released (3).
    ReleaseRight,
    /// Down arrow pressed (4).
    PressDown,
    /// Down arrow released (5).
    ReleaseDown,
    /// Up arrow pressed (6).
    PressUp,
    /// Up arrow released (7).
    ReleaseUp,
    /// Unrecognized key byte.
    Unknown(u8),
}

impl From<u8> for ArrowKey {
    fn from(value: u8) -> Self {
        match value {
            0 => ArrowKey::PressLeft,
            1 => ArrowKey::ReleaseLeft,
            2 => ArrowKey::PressRight,
            3 => ArrowKey::ReleaseRight,
            4 => ArrowKey::PressDown,
            5 => ArrowKey::ReleaseDown,
            6 => ArrowKey::PressUp,
            7 => ArrowKey::ReleaseUp,
            n => ArrowKey::Unknown(n),
        }
    }
}

impl fmt::Display for ArrowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ArrowKey::PressLeft => "left pressed",
            ArrowKey::ReleaseLeft => "left released",
            ArrowKey::PressRight => "right pressed",
            ArrowKey::ReleaseRight => "right released",
            ArrowKey::PressDown => "down pressed",
            ArrowKey::ReleaseDown => "down released",
            ArrowKey::PressUp => "up pressed",
            ArrowKey::ReleaseUp => "up released",
            ArrowKey::Unknown(n) => return write!(f, "{n}"),
        };
        f.write_str(text)
    }
}

/// A decoded player action.
///
/// Each variant carries only the fields decoded from its record. Unknown
/// type bytes are preserved with their raw payload so that decoding never
/// aborts on newer client data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ReplayAction {
    /// Game speed change (0x03).
    SetGameSpeed {
        /// Requested speed.
        speed: u8,
    },

    /// Unit ability without target (0x10).
    UnitAbilityNoTarget {
        /// Ability flags.
        flags: u16,
        /// Order id.
        order_id: ObjectId,
    },

    /// Unit ability with a ground target (0x11).
    UnitAbilityTargetPosition {
        /// Ability flags.
        flags: u16,
        /// Order id.
        order_id: ObjectId,
        /// Target location.
        target: Position,
    },

    /// Unit ability with a ground target and a target object (0x12).
    UnitAbilityTargetPositionObject {
        /// Ability flags.
        flags: u16,
        /// Order id.
        order_id: ObjectId,
        /// Target location.
        target: Position,
        /// Target object.
        object: NetTag,
    },

    /// Give an item to a unit, or drop it (0x13).
    GiveItemToUnit {
        /// Ability flags.
        flags: u16,
        /// Order id.
        order_id: ObjectId,
        /// Target location.
        target: Position,
        /// Receiving unit.
        unit: NetTag,
        /// Item given.
        item: NetTag,
    },

    /// Selection change (0x16).
    ChangeSelection {
        /// Whether objects are added or removed.
        mode: SelectionMode,
        /// Objects affected.
        objects: Vec<NetTag>,
    },

    /// Assign the listed objects to a control group (0x17).
    AssignGroupHotkey {
        /// Control group number.
        group: u8,
        /// Objects assigned.
        objects: Vec<NetTag>,
    },

    /// Select a control group (0x18).
    SelectGroupHotkey {
        /// Control group number.
        group: u8,
    },

    /// Select a subgroup of the current selection (0x19).
    SelectSubgroup {
        /// Unit type of the subgroup.
        item_id: ObjectId,
        /// Object that anchors the subgroup.
        object: NetTag,
    },

    /// Pre-subselection unit select (0x1B).
    SelectUnit {
        /// Object selected.
        object: NetTag,
    },

    /// Select an item lying on the ground (0x1C).
    SelectGroundItem {
        /// Item selected.
        item: NetTag,
    },

    /// Cancel a hero revival (0x1D).
    CancelHeroRevival {
        /// Hero whose revival is cancelled.
        hero: NetTag,
    },

    /// Remove a unit from a build or train queue (0x1E or 0x1F).
    RemoveUnitFromQueue {
        /// The type byte as stored, 0x1E or 0x1F.
        type_byte: u8,
        /// Queue slot.
        slot: u8,
        /// Unit type removed.
        item_id: ObjectId,
    },

    /// Transfer gold and lumber to an ally (0x51).
    TransferResources {
        /// Target slot.
        slot: u8,
        /// Gold amount.
        gold: u32,
        /// Lumber amount.
        lumber: u32,
    },

    /// Chat message, from an action record (0x60) or a chat block (0x20).
    ChatMessage {
        /// First header word. For chat blocks, the chat mode.
        mode: u32,
        /// Second header word. Always 0 for chat blocks.
        extra: u32,
        /// Message text.
        message: String,
    },

    /// Minimap ping (0x62).
    MinimapPing {
        /// Raw X coordinate.
        x: u32,
        /// Raw Y coordinate.
        y: u32,
        /// Ping flags.
        flags: u32,
    },

    /// Arrow key event (0x75).
    ArrowKey {
        /// Key and direction of the event.
        key: ArrowKey,
    },

    /// Mouse event (0x76).
    Mouse {
        /// Event id.
        event_id: u8,
        /// Cursor location.
        position: Position,
        /// Mouse button.
        button: u8,
    },

    /// W3API command (0x77).
    W3Api {
        /// Command id.
        command: u32,
        /// Command data word.
        data: u32,
        /// Length-prefixed text payload.
        buffer: String,
    },

    /// Blizzard sync message (0x78).
    BlzSync {
        /// Sync identifier.
        identifier: String,
        /// Sync value.
        value: String,
    },

    /// Command frame event (0x79).
    CommandFrame {
        /// Event id.
        event_id: u32,
        /// Event value.
        value: f32,
        /// Event text.
        text: String,
    },

    /// Map-defined statistics message (0x6B).
    MmdMessage {
        /// Message tag.
        tag: String,
        /// Value key.
        value: String,
        /// Message text.
        text: String,
        /// Trailing data word.
        data: u32,
    },

    /// Unknown action type, preserved with the rest of its record.
    Unknown {
        /// Raw action type byte.
        type_id: u8,
        /// Raw action data following the type byte.
        data: Vec<u8>,
    },
}

impl ReplayAction {
    /// Returns the name of this action variant.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            ReplayAction::SetGameSpeed { .. } => "SetGameSpeed",
            ReplayAction::UnitAbilityNoTarget { .. } => "UnitAbilityNoTarget",
            ReplayAction::UnitAbilityTargetPosition { .. } => "UnitAbilityTargetPosition",
            ReplayAction::UnitAbilityTargetPositionObject { .. } => {
                "UnitAbilityTargetPositionObject"
            }
            ReplayAction::GiveItemToUnit { .. } => "GiveItemToUnit",
            ReplayAction::ChangeSelection { .. } => "ChangeSelection",
            ReplayAction::AssignGroupHotkey { .. } => "AssignGroupHotkey",
            ReplayAction::SelectGroupHotkey { .. } => "SelectGroupHotkey",
            ReplayAction::SelectSubgroup { .. } => "SelectSubgroup",
            ReplayAction::SelectUnit { .. } => "SelectUnit",
            ReplayAction::SelectGroundItem { .. } => "SelectGroundItem",
            ReplayAction::CancelHeroRevival { .. } => "CancelHeroRevival",
            ReplayAction::RemoveUnitFromQueue { .. } => "RemoveUnitFromQueue",
            ReplayAction::TransferResources { .. } => "TransferResources",
            ReplayAction::ChatMessage { .. } => "ChatMessage",
            ReplayAction::MinimapPing { .. } => "MinimapPing",
            ReplayAction::ArrowKey { .. } => "ArrowKey",
            ReplayAction::Mouse { .. } => "Mouse",
            ReplayAction::W3Api { .. } => "W3Api",
            ReplayAction::BlzSync { .. } => "BlzSync",
            ReplayAction::CommandFrame { .. } => "CommandFrame",
            ReplayAction::MmdMessage { .. } => "MmdMessage",
            ReplayAction::Unknown { .. } => "Unknown",
        }
    }

    /// Returns the raw action type byte for this action.
    ///
    /// Chat messages report 0x60 regardless of whether they came from an
    /// action record or a chat block.
    #[must_use]
    pub fn type_byte(&self) -> u8 {
        match self {
            ReplayAction::SetGameSpeed { .. } => 0x03,
            ReplayAction::UnitAbilityNoTarget { .. } => 0x10,
            ReplayAction::UnitAbilityTargetPosition { .. } => 0x11,
            ReplayAction::UnitAbilityTargetPositionObject { .. } => 0x12,
            ReplayAction::GiveItemToUnit { .. } => 0x13,
            ReplayAction::ChangeSelection { .. } => 0x16,
            ReplayAction::AssignGroupHotkey { .. } => 0x17,
            ReplayAction::SelectGroupHotkey { .. } => 0x18,
            ReplayAction::SelectSubgroup { .. } => 0x19,
            ReplayAction::SelectUnit { .. } => 0x1B,
            ReplayAction::SelectGroundItem { .. } => 0x1C,
            ReplayAction::CancelHeroRevival { .. } => 0x1D,
            ReplayAction::RemoveUnitFromQueue { type_byte, .. } => *type_byte,
            ReplayAction::TransferResources { .. } => 0x51,
            ReplayAction::ChatMessage { .. } => 0x60,
            ReplayAction::MinimapPing { .. } => 0x62,
            ReplayAction::MmdMessage { .. } => 0x6B,
            ReplayAction::ArrowKey { .. } => 0x75,
            ReplayAction::Mouse { .. } => 0x76,
            ReplayAction::W3Api { .. } => 0x77,
            ReplayAction::BlzSync { .. } => 0x78,
            ReplayAction::CommandFrame { .. } => 0x79,
            ReplayAction::Unknown { type_id, .. } => *type_id,
        }
    }

    /// Returns `true` if this is an unknown action type.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self, ReplayAction::Unknown { .. })
    }

    /// Returns a human-readable description derived from the decoded fields.
    ///
    /// Equivalent to `self.to_string()`.
    ///
    /// ```
    /// use w3g_replay::actions::ReplayAction;
    ///
    /// let action = ReplayAction::TransferResources { slot: 2, gold: 1, lumber: 2 };
    /// assert_eq!(action.explain(), "Transfer resources to slot 2 gold=1 lumber=2");
    /// ```
    #[must_use]
    pub fn explain(&self) -> String {
        self.to_string()
    }
}

/// Writes a comma-separated list of object references.
fn write_tags(f: &mut fmt::Formatter<'_>, tags: &[NetTag]) -> fmt::Result {
    for (i, tag) in tags.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{tag}")?;
    }
    Ok(())
}

impl fmt::Display for ReplayAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplayAction::SetGameSpeed { speed } => write!(f, "Set game speed to {speed}"),
            ReplayAction::UnitAbilityNoTarget { flags, order_id } => {
                write!(f, "Order {order_id} flags=0x{flags:X}")
            }
            ReplayAction::UnitAbilityTargetPosition {
                flags,
                order_id,
                target,
            } => write!(f, "Order {order_id} to {target} flags=0x{flags:X}"),
            ReplayAction::UnitAbilityTargetPositionObject {
                order_id,
                target,
                object,
                ..
            } => write!(f, "Order {order_id} to {target} object={object}"),
            ReplayAction::GiveItemToUnit {
                order_id,
                unit,
                item,
                ..
            } => write!(f, "Give item {item} to {unit} using {order_id}"),
            ReplayAction::ChangeSelection { mode, objects } => {
                write!(f, "Change selection mode {mode} units ")?;
                write_tags(f, objects)
            }
            ReplayAction::AssignGroupHotkey { group, objects } => {
                write!(f, "Assign group {group} units ")?;
                write_tags(f, objects)
            }
            ReplayAction::SelectGroupHotkey { group } => write!(f, "Select group {group}"),
            ReplayAction::SelectSubgroup { item_id, object } => {
                write!(f, "Select subgroup item {item_id} of {object}")
            }
            ReplayAction::SelectUnit { object } => write!(f, "Select unit {object}"),
            ReplayAction::SelectGroundItem { item } => write!(f, "Select ground item {item}"),
            ReplayAction::CancelHeroRevival { hero } => write!(f, "Cancel hero revival {hero}"),
            ReplayAction::RemoveUnitFromQueue { slot, item_id, .. } => {
                write!(f, "Remove unit {item_id} from queue slot {slot}")
            }
            ReplayAction::TransferResources { slot, gold, lumber } => write!(
                f,
                "Transfer resources to slot {slot} gold={gold} lumber={lumber}"
            ),
            ReplayAction::ChatMessage { message, .. } => write!(f, "Chat: {message}"),
            ReplayAction::MinimapPing { x, y, flags } => {
                write!(f, "Minimap ping at ({x},{y}) flags=0x{flags:X}")
            }
            ReplayAction::ArrowKey { key } => write!(f, "Arrow key {key}"),
            ReplayAction::Mouse {
                event_id,
                position,
                button,
            } => write!(f, "Mouse event {event_id} at {position} button {button}"),
            ReplayAction::W3Api {
                command,
                data,
                buffer,
            } => write!(f, "W3API command {command} data={data} text={buffer}"),
            ReplayAction::BlzSync { identifier, value } => {
                write!(f, "BlzSync {identifier}={value}")
            }
            ReplayAction::CommandFrame {
                event_id,
                value,
                text,
            } => write!(f, "CommandFrame event {event_id} val={value} text={text}"),
            ReplayAction::MmdMessage {
                tag,
                value,
                text,
                data,
            } => write!(f, "MMD {tag} {value} {text} data={data}"),
            ReplayAction::Unknown { type_id, data } => {
                let hex = data
                    .iter()
                    .map(|b| format!("{b:02X}"))
                    .collect::<Vec<_>>()
                    .join("-");
                write!(f, "Unknown action 0x{type_id:02X} ({hex})")
            }
        }
    }
}
