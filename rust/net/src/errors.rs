use cardtable_ai::AiError;
use cardtable_engine::errors::EngineError;
use cardtable_engine::game::GameId;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("action for game {actual} sent to session {expected}")]
    WrongGame { expected: GameId, actual: GameId },
    #[error("remote action carries no sequence number")]
    Unsequenced,
    #[error("conflicting action at sequence number {seq_num}")]
    Conflict { seq_num: u64 },
    #[error("missing actions: expected sequence number {expected}, received {received}")]
    Gap { expected: u64, received: u64 },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BroadcastError {
    #[error("broadcaster is disconnected")]
    Disconnected,
    #[error("subscriber storage poisoned")]
    StoragePoisoned,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PeerError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Broadcast(#[from] BroadcastError),
    #[error(transparent)]
    Ai(#[from] AiError),
}

impl From<EngineError> for PeerError {
    fn from(err: EngineError) -> Self {
        PeerError::Session(SessionError::Engine(err))
    }
}
