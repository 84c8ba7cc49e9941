use serde::{Deserialize, Serialize};

use crate::cards::{Card, Suit};
use crate::player::{Player, PlayerId};

/// Suit that beats every other suit in the trick-taking rule-set.
pub const TRUMP: Suit = Suit::Spades;

/// Tricks in one hand of 13 cards per player.
pub const TRICKS_PER_GAME: usize = 13;

/// Highest bid a player may place.
pub const MAX_BID: u8 = 13;

/// One card played into a trick.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrickPlay {
    pub player_id: PlayerId,
    pub card: Card,
}

/// A completed trick with its winner.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Trick {
    pub winner: PlayerId,
    #[serde(rename = "cards")]
    pub plays: Vec<TrickPlay>,
}

/// Resolves the winner of a trick.
///
/// The highest `trump` card wins if any was played; otherwise the highest
/// card of the `led` suit. Off-suit, non-trump cards never win.
///
/// # Returns
///
/// `None` only for an empty trick.
///
/// # Examples
///
/// ```
/// use cardtable_engine::cards::{full_deck, Rank, Suit};
/// use cardtable_engine::rules::{trick_winner, TrickPlay};
///
/// let deck = full_deck();
/// let find = |s, r| deck.iter().find(|c| c.suit == s && c.rank == r).unwrap().clone();
/// let plays = vec![
///     TrickPlay { player_id: "p1".into(), card: find(Suit::Hearts, Rank::Ace) },
///     TrickPlay { player_id: "p2".into(), card: find(Suit::Spades, Rank::Two) },
///     TrickPlay { player_id: "p3".into(), card: find(Suit::Hearts, Rank::King) },
///     TrickPlay { player_id: "p4".into(), card: find(Suit::Clubs, Rank::Ace) },
/// ];
/// let winner = trick_winner(&plays, Suit::Hearts, Suit::Spades).unwrap();
/// assert_eq!(winner.player_id.as_str(), "p2");
/// ```
pub fn trick_winner(plays: &[TrickPlay], led: Suit, trump: Suit) -> Option<&TrickPlay> {
    let best_of = |suit: Suit| {
        plays
            .iter()
            .filter(|p| p.card.suit == suit)
            .max_by_key(|p| p.card.rank)
    };
    best_of(trump).or_else(|| best_of(led))
}

/// Tricks won by each player, in table order.
pub fn trick_counts(players: &[Player], tricks: &[Trick]) -> Vec<(PlayerId, usize)> {
    players
        .iter()
        .map(|p| {
            let won = tricks.iter().filter(|t| &t.winner == p.id()).count();
            (p.id().clone(), won)
        })
        .collect()
}

/// Player with the most tricks.
///
/// Ties go to the player seated earliest, since only a strictly greater
/// count replaces the leader during the scan.
pub fn most_tricks(players: &[Player], tricks: &[Trick]) -> Option<PlayerId> {
    let mut best: Option<(PlayerId, usize)> = None;
    for (id, won) in trick_counts(players, tricks) {
        match &best {
            Some((_, top)) if won <= *top => {}
            _ => best = Some((id, won)),
        }
    }
    best.map(|(id, _)| id)
}
