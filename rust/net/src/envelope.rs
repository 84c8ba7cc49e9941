//! Wire envelope exchanged between peers.

use cardtable_engine::action::Action;
use cardtable_engine::game::GameId;
use cardtable_engine::player::PlayerId;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// One message on the transport.
///
/// Serializes as
/// `{ kind, gameId, payload, timestamp, fromPlayerId, seqNum? }` with `kind`
/// one of `action`, `sync-request`, `sync-response`, `ack`, `reconnect`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkMessage {
    pub game_id: GameId,
    pub from_player_id: PlayerId,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seq_num: Option<u64>,
    #[serde(flatten)]
    pub body: MessageBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "kind",
    content = "payload",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum MessageBody {
    Action(Action),
    /// Asks for every action after `last_known_action_index`; `None` asks
    /// for the whole log.
    SyncRequest {
        last_known_action_index: Option<u64>,
    },
    SyncResponse {
        actions: Vec<Action>,
    },
    Ack {
        seq_num: u64,
    },
    Reconnect {
        player_id: PlayerId,
    },
}

impl MessageBody {
    pub fn kind(&self) -> &'static str {
        match self {
            MessageBody::Action(_) => "action",
            MessageBody::SyncRequest { .. } => "sync-request",
            MessageBody::SyncResponse { .. } => "sync-response",
            MessageBody::Ack { .. } => "ack",
            MessageBody::Reconnect { .. } => "reconnect",
        }
    }
}

impl NetworkMessage {
    /// Message stamped with the current time.
    pub fn new(game_id: GameId, from_player_id: PlayerId, body: MessageBody) -> Self {
        let seq_num = match &body {
            MessageBody::Action(action) => action.seq_num,
            _ => None,
        };
        Self {
            game_id,
            from_player_id,
            timestamp: Utc::now().timestamp_millis(),
            seq_num,
            body,
        }
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
