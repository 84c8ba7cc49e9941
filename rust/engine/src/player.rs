use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a player, unique within one session.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Identity record of a seat at the table.
///
/// Identity fields are fixed at session setup; only connectivity changes
/// afterwards, through [`Player::set_connected`].
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Unique id within the session
    id: PlayerId,
    /// Display name
    name: String,
    /// Driven by an automated player rather than a human
    #[serde(rename = "isAI")]
    is_ai: bool,
    /// Seated on this device rather than on a remote peer
    is_local: bool,
    /// Currently reachable
    is_connected: bool,
}

impl Player {
    /// Local human player, connected.
    pub fn human(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: PlayerId::new(id),
            name: name.into(),
            is_ai: false,
            is_local: true,
            is_connected: true,
        }
    }

    /// Local automated player, connected.
    pub fn ai(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            is_ai: true,
            ..Self::human(id, name)
        }
    }

    /// Human seated on another peer.
    pub fn remote(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            is_local: false,
            ..Self::human(id, name)
        }
    }

    pub fn id(&self) -> &PlayerId {
        &self.id
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn is_ai(&self) -> bool {
        self.is_ai
    }
    pub fn is_local(&self) -> bool {
        self.is_local
    }
    pub fn is_connected(&self) -> bool {
        self.is_connected
    }

    pub fn set_connected(&mut self, connected: bool) {
        self.is_connected = connected;
    }
}

/// Seat index of `id` in table order.
pub fn seat_of(players: &[Player], id: &PlayerId) -> Option<usize> {
    players.iter().position(|p| p.id() == id)
}
