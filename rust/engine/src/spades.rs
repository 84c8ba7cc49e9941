//! Four-player trick-taking rule-set with spades as trump.
//!
//! A game runs Bidding -> Playing -> Complete. Every player bids once, in
//! table order, then thirteen tricks are played; the trick winner leads the
//! next one. The player who took the most tricks wins.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::action::{Action, ActionKind};
use crate::cards::{full_deck, Card, CardId, HeldCard, Suit};
use crate::deck::deal_to_players;
use crate::errors::{EngineError, SetupError};
use crate::game::{GameId, GameState, GameType, HouseRules};
use crate::player::{Player, PlayerId};
use crate::reducer::Reducer;
use crate::rng::{Seed, SeededRng};
use crate::rules::{most_tricks, trick_winner, Trick, TrickPlay, MAX_BID, TRICKS_PER_GAME, TRUMP};
use crate::view::conceal_hands;

pub const CARDS_PER_PLAYER: usize = 13;

pub type SpadesGame = GameState<SpadesState>;

/// Phase of a trick-taking game, derived from its payload.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Bidding,
    Playing,
    Complete,
}

/// Game-specific part of the state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpadesState {
    /// Hands by seat; disjoint, 13 cards each at the deal
    pub hands: Vec<Vec<HeldCard>>,
    pub bids: BTreeMap<PlayerId, u8>,
    /// Archived tricks, oldest first
    pub tricks: Vec<Trick>,
    pub current_trick: Vec<TrickPlay>,
    pub bid_phase_complete: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub led_suit: Option<Suit>,
}

impl SpadesState {
    pub fn phase(&self) -> Phase {
        if self.tricks.len() >= TRICKS_PER_GAME {
            Phase::Complete
        } else if self.bid_phase_complete {
            Phase::Playing
        } else {
            Phase::Bidding
        }
    }

    pub fn tricks_won(&self, player: &PlayerId) -> usize {
        self.tricks.iter().filter(|t| &t.winner == player).count()
    }

    /// Cards of `seat` that are visible to whoever holds this state.
    pub fn visible_cards(&self, seat: usize) -> impl Iterator<Item = &Card> {
        self.hands
            .get(seat)
            .into_iter()
            .flatten()
            .filter_map(HeldCard::card)
    }
}

/// Rules of the four-player trick-taking game.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpadesReducer;

impl SpadesReducer {
    pub fn new() -> Self {
        Self
    }

    /// Cards `player` holds, as visible in `state`.
    pub fn hand_of<'a>(&self, state: &'a SpadesGame, player: &PlayerId) -> Vec<&'a Card> {
        state
            .seat_of(player)
            .map(|seat| state.payload.visible_cards(seat).collect())
            .unwrap_or_default()
    }

    fn check_players(&self, players: &[Player]) -> Result<(), SetupError> {
        let expected = self.game_type().player_count();
        if players.len() != expected {
            return Err(SetupError::PlayerCount {
                game: self.game_type(),
                expected,
                actual: players.len(),
            });
        }
        let mut seen = HashSet::new();
        for p in players {
            if !seen.insert(p.id()) {
                return Err(SetupError::DuplicatePlayer(p.id().clone()));
            }
        }
        Ok(())
    }

    fn apply_bid(
        &self,
        state: &SpadesGame,
        seat: usize,
        player: &PlayerId,
        bid: u8,
    ) -> Result<SpadesGame, EngineError> {
        let gs = &state.payload;
        if bid > MAX_BID {
            return Err(EngineError::Malformed(format!("bid {} exceeds {}", bid, MAX_BID)));
        }
        if gs.bid_phase_complete || gs.bids.contains_key(player) {
            return Err(EngineError::Malformed(format!("{} cannot bid now", player)));
        }

        let mut next = state.clone();
        next.payload.bids.insert(player.clone(), bid);
        next.payload.bid_phase_complete = next.payload.bids.len() == state.players.len();
        next.current_turn = state.next_player(seat);
        Ok(next)
    }

    fn apply_play(
        &self,
        state: &SpadesGame,
        seat: usize,
        player: &PlayerId,
        card_id: &CardId,
    ) -> Result<SpadesGame, EngineError> {
        if !state.payload.bid_phase_complete {
            return Err(EngineError::Malformed(format!(
                "{} played before bidding closed",
                player
            )));
        }
        let hand = &state.payload.hands[seat];
        let pos = hand
            .iter()
            .position(|h| h.card().is_some_and(|c| &c.id == card_id))
            .ok_or_else(|| {
                EngineError::Malformed(format!("card {} is not in {}'s hand", card_id, player))
            })?;

        let mut next = state.clone();
        let gs = &mut next.payload;
        let HeldCard::Visible(card) = gs.hands[seat].remove(pos) else {
            return Err(EngineError::Malformed(format!("card {} is concealed", card_id)));
        };
        if gs.current_trick.is_empty() {
            gs.led_suit = Some(card.suit);
        }
        let led = gs.led_suit.unwrap_or(card.suit);
        gs.current_trick.push(TrickPlay {
            player_id: player.clone(),
            card,
        });

        if gs.current_trick.len() == state.players.len() {
            let winner = trick_winner(&gs.current_trick, led, TRUMP)
                .map(|p| p.player_id.clone())
                .ok_or_else(|| EngineError::Malformed("trick has no plays".into()))?;
            let plays = std::mem::take(&mut gs.current_trick);
            gs.tricks.push(Trick {
                winner: winner.clone(),
                plays,
            });
            gs.led_suit = None;
            next.current_turn = winner;
        } else {
            next.current_turn = state.next_player(seat);
        }
        Ok(next)
    }
}

impl Reducer for SpadesReducer {
    type Payload = SpadesState;

    fn game_type(&self) -> GameType {
        GameType::Spades
    }

    fn initial_state(&self, seed: Seed, players: &[Player]) -> Result<SpadesGame, EngineError> {
        self.check_players(players)?;

        let ids: Vec<PlayerId> = players.iter().map(|p| p.id().clone()).collect();
        let mut rng = SeededRng::new(seed);
        let dealt = deal_to_players(&full_deck(), &ids, CARDS_PER_PLAYER, &mut rng);
        let hands = dealt
            .into_iter()
            .map(|(_, hand)| hand.into_iter().map(HeldCard::from).collect())
            .collect();

        Ok(GameState {
            game_id: GameId::new(format!("{}-{}", self.game_type().id(), seed)),
            game_type: self.game_type(),
            seed,
            players: players.to_vec(),
            action_history: Vec::new(),
            created_at: 0,
            house_rules: HouseRules::default(),
            current_turn: ids[0].clone(),
            payload: SpadesState {
                hands,
                bids: BTreeMap::new(),
                tricks: Vec::new(),
                current_trick: Vec::new(),
                bid_phase_complete: false,
                led_suit: None,
            },
            is_game_over: false,
            winner: None,
        })
    }

    fn valid_actions(&self, state: &SpadesGame, player_id: &PlayerId) -> Vec<Action> {
        if self.is_game_over(state) || &state.current_turn != player_id {
            return Vec::new();
        }
        let Some(seat) = state.seat_of(player_id) else {
            return Vec::new();
        };
        let gs = &state.payload;

        if !gs.bid_phase_complete {
            if gs.bids.contains_key(player_id) {
                return Vec::new();
            }
            return (0..=MAX_BID)
                .map(|bid| Action::bid(player_id.clone(), state.game_id.clone(), bid))
                .collect();
        }

        gs.visible_cards(seat)
            .map(|c| Action::play(player_id.clone(), state.game_id.clone(), c.id.clone()))
            .collect()
    }

    fn apply_action(&self, state: &SpadesGame, action: &Action) -> Result<SpadesGame, EngineError> {
        let player = &action.player_id;
        let seat = state
            .seat_of(player)
            .ok_or_else(|| EngineError::Malformed(format!("unknown player {}", player)))?;
        if &state.current_turn != player {
            return Err(EngineError::Malformed(format!(
                "{} acted out of turn (turn: {})",
                player, state.current_turn
            )));
        }
        match &action.kind {
            ActionKind::PlaceBid { bid } => self.apply_bid(state, seat, player, *bid),
            ActionKind::PlayCard { card_id } => self.apply_play(state, seat, player, card_id),
        }
    }

    fn is_game_over(&self, state: &SpadesGame) -> bool {
        state.payload.tricks.len() == TRICKS_PER_GAME
    }

    fn winner(&self, state: &SpadesGame) -> Option<PlayerId> {
        if !self.is_game_over(state) {
            return None;
        }
        most_tricks(&state.players, &state.payload.tricks)
    }

    /// The seed passes through unchanged; see [`crate::view`].
    fn player_view(&self, state: &SpadesGame, viewer: &PlayerId) -> SpadesGame {
        let mut view = state.clone();
        view.payload.hands = conceal_hands(&state.payload.hands, state.seat_of(viewer));
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reducer::ReducerExt;

    fn players() -> Vec<Player> {
        (1..=4)
            .map(|i| Player::human(format!("p{}", i), format!("Player {}", i)))
            .collect()
    }

    fn pid(s: &str) -> PlayerId {
        PlayerId::new(s)
    }

    fn bid_all(r: &SpadesReducer, mut state: SpadesGame, bids: [u8; 4]) -> SpadesGame {
        for (i, b) in bids.iter().enumerate() {
            let p = pid(&format!("p{}", i + 1));
            state = r
                .reduce(&state, &Action::bid(p, state.game_id.clone(), *b))
                .unwrap();
        }
        state
    }

    #[test]
    fn rejects_wrong_player_count() {
        let r = SpadesReducer::new();
        let err = r.initial_state(1, &players()[..3]).unwrap_err();
        assert_eq!(
            err,
            EngineError::Setup(SetupError::PlayerCount {
                game: GameType::Spades,
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn rejects_duplicate_player_ids() {
        let r = SpadesReducer::new();
        let mut ps = players();
        ps[3] = Player::human("p1", "Again");
        let err = r.initial_state(1, &ps).unwrap_err();
        assert_eq!(err, EngineError::Setup(SetupError::DuplicatePlayer(pid("p1"))));
    }

    #[test]
    fn initial_state_opens_bidding_with_first_seat() {
        let r = SpadesReducer::new();
        let s = r.initial_state(42, &players()).unwrap();
        assert_eq!(s.payload.phase(), Phase::Bidding);
        assert_eq!(s.current_turn, pid("p1"));
        assert_eq!(s.game_id.as_str(), "spades-42");
        assert!(s.payload.hands.iter().all(|h| h.len() == 13));
    }

    #[test]
    fn bidding_offers_fourteen_values_to_turn_holder_only() {
        let r = SpadesReducer::new();
        let s = r.initial_state(42, &players()).unwrap();
        let legal = r.valid_actions(&s, &pid("p1"));
        assert_eq!(legal.len(), 14);
        assert_eq!(legal[13].kind, ActionKind::PlaceBid { bid: 13 });
        assert!(r.valid_actions(&s, &pid("p2")).is_empty());
        assert!(r.valid_actions(&s, &pid("nobody")).is_empty());
    }

    #[test]
    fn bidding_completes_after_every_seat_and_returns_turn_to_first() {
        let r = SpadesReducer::new();
        let s = r.initial_state(42, &players()).unwrap();
        let s = bid_all(&r, s, [3, 2, 4, 2]);
        assert!(s.payload.bid_phase_complete);
        assert_eq!(s.payload.phase(), Phase::Playing);
        assert_eq!(s.current_turn, pid("p1"));
        assert_eq!(r.valid_actions(&s, &pid("p1")).len(), 13);
    }

    #[test]
    fn playing_a_card_moves_it_into_the_trick() {
        let r = SpadesReducer::new();
        let s = bid_all(&r, r.initial_state(7, &players()).unwrap(), [1, 1, 1, 1]);
        let first = r.valid_actions(&s, &pid("p1")).remove(0);
        let ActionKind::PlayCard { card_id } = first.kind.clone() else {
            panic!("expected a play action");
        };
        let next = r.reduce(&s, &first).unwrap();
        assert_eq!(next.payload.current_trick.len(), 1);
        assert_eq!(next.payload.current_trick[0].card.id, card_id);
        assert_eq!(next.payload.led_suit, Some(next.payload.current_trick[0].card.suit));
        assert_eq!(r.hand_of(&next, &pid("p1")).len(), 12);
        assert_eq!(next.current_turn, pid("p2"));
    }

    #[test]
    fn completed_trick_is_archived_and_winner_leads() {
        let r = SpadesReducer::new();
        let mut s = bid_all(&r, r.initial_state(9, &players()).unwrap(), [1, 1, 1, 1]);
        for _ in 0..4 {
            let turn = s.current_turn.clone();
            let a = r.valid_actions(&s, &turn).remove(0);
            s = r.reduce(&s, &a).unwrap();
        }
        assert_eq!(s.payload.tricks.len(), 1);
        assert!(s.payload.current_trick.is_empty());
        assert_eq!(s.payload.led_suit, None);
        assert_eq!(s.current_turn, s.payload.tricks[0].winner);
        assert_eq!(s.payload.tricks[0].plays.len(), 4);
    }

    #[test]
    fn apply_rejects_card_not_in_hand() {
        let r = SpadesReducer::new();
        let s = bid_all(&r, r.initial_state(3, &players()).unwrap(), [0, 0, 0, 0]);
        let foreign = r.hand_of(&s, &pid("p2"))[0].id.clone();
        let a = Action::play(pid("p1"), s.game_id.clone(), foreign);
        assert!(matches!(r.apply_action(&s, &a), Err(EngineError::Malformed(_))));
    }

    #[test]
    fn view_conceals_other_hands() {
        let r = SpadesReducer::new();
        let s = r.initial_state(5, &players()).unwrap();
        let v = r.player_view(&s, &pid("p3"));
        assert_eq!(r.hand_of(&v, &pid("p3")).len(), 13);
        assert!(r.hand_of(&v, &pid("p1")).is_empty());
        assert_eq!(v.payload.hands[0].len(), 13);
        assert_eq!(r.valid_actions(&v, &pid("p1")).len(), 14);
    }

    #[test]
    fn view_seed_still_redeals_concealed_hands() {
        let r = SpadesReducer::new();
        let s = r.initial_state(5, &players()).unwrap();
        let v = r.player_view(&s, &pid("p3"));
        assert_eq!(v.seed, s.seed);
        let redealt = r.initial_state(v.seed, &v.players).unwrap();
        assert_eq!(r.hand_of(&redealt, &pid("p1")), r.hand_of(&s, &pid("p1")));
    }
}
