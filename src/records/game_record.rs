//! Game record parsing for the start of the decompressed stream.
//!
//! Real replays open the decompressed stream with a game record describing
//! the host, the game and the joined players, before the first time slice.
//!
//! # Format
//!
//! | Size | Type | Field |
//! |------|------|-------|
//! | 4 | u32 LE | Record magic (0x00000110) |
//! | var | player record | Host player |
//! | var | string | Game name (null-terminated) |
//! | 1 | u8 | Null byte |
//! | var | bytes | Encoded settings (null-terminated) |
//! | 4 | u32 LE | Player count |
//! | 4 | u32 LE | Game type |
//! | 4 | u32 LE | Language id |
//! | var | 0x16 records | Player records, each followed by 4 bytes |
//! | var | 0x19 record | Optional slot record (u16 length + body) |
//!
//! A player record is a record id byte, a player id byte, a null-terminated
//! name, then a length byte and that many bytes of additional data.
//!
//! # Example
//!
//! ```
//! use w3g_replay::records::{GameRecord, GAME_RECORD_MAGIC};
//!
//! let mut data = GAME_RECORD_MAGIC.to_le_bytes().to_vec();
//! data.extend_from_slice(b"\x00\x01Host\x00\x01\x00");
//! data.extend_from_slice(b"My Game\x00\x00settings\x00");
//! for field in [2u32, 1, 0] {
//!     data.extend_from_slice(&field.to_le_bytes());
//! }
//!
//! let (record, consumed) = GameRecord::parse(&data)?;
//! assert_eq!(record.host.name, "Host");
//! assert_eq!(record.game_name, "My Game");
//! assert_eq!(consumed, data.len());
//! # Ok::<(), w3g_replay::error::ReplayError>(())
//! ```

use serde::Serialize;

use crate::binary::ByteCursor;
use crate::error::{ReplayError, Result};

/// Magic value for the game record (0x10 0x01 0x00 0x00 as little-endian u32).
pub const GAME_RECORD_MAGIC: u32 = 0x0000_0110;

/// Record id of a joined player entry.
pub const PLAYER_RECORD_MARKER: u8 = 0x16;

/// Record id of the slot table that closes the game record.
pub const SLOT_RECORD_MARKER: u8 = 0x19;

/// Returns whether `data` starts with the game record magic.
#[must_use]
pub fn is_game_record(data: &[u8]) -> bool {
    data.get(..4) == Some(&GAME_RECORD_MAGIC.to_le_bytes()[..])
}

/// A player entry in the game record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerRecord {
    /// Record id (0x00 for the host, 0x16 for joined players).
    pub record_id: u8,

    /// Player id as used by command blocks.
    pub player_id: u8,

    /// Player name.
    pub name: String,

    /// Additional data following the name (platform specific).
    #[serde(skip)]
    pub additional_data: Vec<u8>,
}

impl PlayerRecord {
    /// Parses a player record at the cursor.
    ///
    /// # Errors
    ///
    /// Returns `ReplayError::TruncatedRecord` if the record is cut short.
    pub fn parse(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let record_id = cursor.read_u8()?;
        let player_id = cursor.read_u8()?;
        let name = cursor.read_cstring()?;
        let additional_len = cursor.read_u8()?;
        let additional_data = cursor.read_bytes(usize::from(additional_len))?.to_vec();
        Ok(PlayerRecord {
            record_id,
            player_id,
            name,
            additional_data,
        })
    }
}

/// The game record decoded from the start of the stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameRecord {
    /// The host player.
    pub host: PlayerRecord,

    /// Game name as shown in the lobby.
    pub game_name: String,

    /// Encoded game settings, kept raw.
    #[serde(skip)]
    pub encoded_settings: Vec<u8>,

    /// Declared number of player slots.
    pub player_count: u32,

    /// Game type word.
    pub game_type: u32,

    /// Language id word.
    pub language_id: u32,

    /// Joined players, in record order. The host is not repeated here.
    pub players: Vec<PlayerRecord>,
}

impl GameRecord {
    /// Parses a game record from the start of the decompressed stream.
    ///
    /// Returns the record and the number of bytes it occupies, including
    /// any trailing slot record.
    ///
    /// # Errors
    ///
    /// - `ReplayError::Format` if the magic does not match
    /// - `ReplayError::TruncatedRecord` if the record is cut short
    pub fn parse(data: &[u8]) -> Result<(Self, usize)> {
        let mut cursor = ByteCursor::new(data);
        let magic = cursor.read_u32()?;
        if magic != GAME_RECORD_MAGIC {
            return Err(ReplayError::Format {
                reason: format!(
                    "invalid game record magic: expected 0x{GAME_RECORD_MAGIC:08X}, found 0x{magic:08X}"
                ),
            });
        }

        let host = PlayerRecord::parse(&mut cursor)?;
        let game_name = cursor.read_cstring()?;
        cursor.skip(1)?;
        let encoded_settings = cursor.read_cstring_bytes()?.to_vec();
        let player_count = cursor.read_u32()?;
        let game_type = cursor.read_u32()?;
        let language_id = cursor.read_u32()?;

        let mut players = Vec::new();
        while cursor.peek() == Some(PLAYER_RECORD_MARKER) {
            players.push(PlayerRecord::parse(&mut cursor)?);
            cursor.skip(4)?;
        }

        if cursor.peek() == Some(SLOT_RECORD_MARKER) {
            cursor.skip(1)?;
            let len = cursor.read_u16()?;
            cursor.skip(usize::from(len))?;
        }

        Ok((
            GameRecord {
                host,
                game_name,
                encoded_settings,
                player_count,
                game_type,
                language_id,
                players,
            },
            cursor.position(),
        ))
    }

    /// Returns every player name, host first.
    #[must_use]
    pub fn player_names(&self) -> Vec<&str> {
        std::iter::once(self.host.name.as_str())
            .chain(self.players.iter().map(|p| p.name.as_str()))
            .collect()
    }

    /// Looks up a player name by the id used in command blocks.
    #[must_use]
    pub fn player_name(&self, player_id: u8) -> Option<&str> {
        std::iter::once(&self.host)
            .chain(&self.players)
            .find(|p| p.player_id == player_id)
            .map(|p| p.name.as_str())
    }
}
