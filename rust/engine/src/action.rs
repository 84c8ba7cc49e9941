use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cards::CardId;
use crate::game::GameId;
use crate::player::PlayerId;

/// Kind-specific payload of an [`Action`], one variant per move type.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ActionKind {
    /// Bid a number of tricks, 0 to 13.
    PlaceBid { bid: u8 },
    /// Play a card from the acting player's hand.
    PlayCard {
        #[serde(rename = "cardId")]
        card_id: CardId,
    },
}

impl ActionKind {
    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::PlaceBid { .. } => "placeBid",
            ActionKind::PlayCard { .. } => "playCard",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::PlaceBid { bid } => write!(f, "placeBid({})", bid),
            ActionKind::PlayCard { card_id } => write!(f, "playCard({})", card_id),
        }
    }
}

/// One player's move, as recorded in the action history.
///
/// Serializes to the wire shape
/// `{ kind, playerId, gameId, timestamp, seqNum?, ...payload }`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    #[serde(flatten)]
    pub kind: ActionKind,
    pub player_id: PlayerId,
    pub game_id: GameId,
    /// Milliseconds since the Unix epoch; metadata only
    pub timestamp: i64,
    /// Position in the authoritative log, once sequenced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seq_num: Option<u64>,
}

impl Action {
    /// Unstamped action: timestamp 0, no sequence number.
    pub fn new(kind: ActionKind, player_id: PlayerId, game_id: GameId) -> Self {
        Self {
            kind,
            player_id,
            game_id,
            timestamp: 0,
            seq_num: None,
        }
    }

    pub fn bid(player_id: PlayerId, game_id: GameId, bid: u8) -> Self {
        Self::new(ActionKind::PlaceBid { bid }, player_id, game_id)
    }

    pub fn play(player_id: PlayerId, game_id: GameId, card_id: CardId) -> Self {
        Self::new(ActionKind::PlayCard { card_id }, player_id, game_id)
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_seq_num(mut self, seq_num: u64) -> Self {
        self.seq_num = Some(seq_num);
        self
    }

    /// Semantic equality: same player, same kind, same payload.
    ///
    /// Timestamp, sequence number and game id are metadata and ignored.
    pub fn same_move(&self, other: &Action) -> bool {
        self.player_id == other.player_id && self.kind == other.kind
    }
}

/// True when `candidates` holds an action that is the same move as `action`.
pub fn contains_move(candidates: &[Action], action: &Action) -> bool {
    candidates.iter().any(|c| c.same_move(action))
}
