use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::errors::EngineError;
use crate::player::{Player, PlayerId};
use crate::rng::Seed;

/// Identifier of one game session.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(String);

impl GameId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The closed set of rule-sets this engine ships.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    Spades,
}

impl GameType {
    pub fn id(self) -> &'static str {
        match self {
            GameType::Spades => "spades",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            GameType::Spades => "Spades",
        }
    }

    /// Number of seats the rule-set requires.
    pub fn player_count(self) -> usize {
        match self {
            GameType::Spades => 4,
        }
    }

    pub fn all() -> [GameType; 1] {
        [GameType::Spades]
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for GameType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameType::all()
            .into_iter()
            .find(|g| g.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| EngineError::Malformed(format!("unknown game type '{}'", s)))
    }
}

/// Table options agreed at setup. Carried verbatim in state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseRules {
    #[serde(default)]
    pub allow_undo_turns: bool,
    #[serde(default)]
    pub spectator_mode: bool,
    #[serde(default)]
    pub chat_enabled: bool,
    /// Options without a dedicated field
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Complete state of one game.
///
/// A pure function of seed, players and action history: rule-sets build it
/// with `initial_state` and only ever replace it with new values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState<P> {
    pub game_id: GameId,
    pub game_type: GameType,
    pub seed: Seed,
    /// Fixed table order
    pub players: Vec<Player>,
    pub action_history: Vec<crate::action::Action>,
    /// Milliseconds since the Unix epoch
    pub created_at: i64,
    pub house_rules: HouseRules,
    /// Player whose move it is
    pub current_turn: PlayerId,
    /// Rule-set specific part of the state
    pub payload: P,
    pub is_game_over: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<PlayerId>,
}

impl<P> GameState<P> {
    pub fn seat_of(&self, id: &PlayerId) -> Option<usize> {
        crate::player::seat_of(&self.players, id)
    }

    /// Player seated after `seat`, wrapping around the table.
    pub fn next_player(&self, seat: usize) -> PlayerId {
        self.players[(seat + 1) % self.players.len()].id().clone()
    }

    /// Replaces the identity fields, e.g. with a session's own game id.
    pub fn with_identity(mut self, game_id: GameId, created_at: i64) -> Self {
        self.game_id = game_id;
        self.created_at = created_at;
        self
    }
}
