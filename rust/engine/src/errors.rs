use thiserror::Error;

use crate::game::GameType;
use crate::player::PlayerId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The action is not in the legal set for its player; state is unchanged.
    #[error("Invalid action: {kind} for player {player_id}")]
    InvalidAction { kind: String, player_id: PlayerId },
    #[error(transparent)]
    Setup(#[from] SetupError),
    /// A stored log entry could not be replayed.
    #[error("Corrupt history at action {index}: {reason}")]
    CorruptHistory { index: usize, reason: String },
    #[error("Malformed action: {0}")]
    Malformed(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SetupError {
    #[error("{game} requires exactly {expected} players, got {actual}")]
    PlayerCount {
        game: GameType,
        expected: usize,
        actual: usize,
    },
    #[error("Player id {0} is used more than once")]
    DuplicatePlayer(PlayerId),
}
