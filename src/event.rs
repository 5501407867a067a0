//! Timestamped replay events.

use serde::Serialize;
use std::fmt;

use crate::actions::ReplayAction;

/// One decoded action, stamped with the game clock and the issuing player.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayEvent {
    /// Game time in milliseconds when the action was issued.
    pub time_ms: u32,

    /// Id of the player who issued the action.
    pub player_id: u8,

    /// The decoded action.
    pub action: ReplayAction,
}

impl ReplayEvent {
    /// Creates a new event.
    #[must_use]
    pub fn new(time_ms: u32, player_id: u8, action: ReplayAction) -> Self {
        Self {
            time_ms,
            player_id,
            action,
        }
    }

    /// Returns whether the action is of an unrecognized type.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.action.is_unknown()
    }
}

impl fmt::Display for ReplayEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}ms Player {}: {}",
            self.time_ms, self.player_id, self.action
        )
    }
}
