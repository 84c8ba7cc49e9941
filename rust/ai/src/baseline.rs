//! Baseline heuristic player for the trick-taking rule-set.
//!
//! Deterministic: the same view always yields the same choice, so
//! simulations with only baseline players replay from the seed alone.

use crate::AIOpponent;
use cardtable_engine::action::{Action, ActionKind};
use cardtable_engine::cards::Card;
use cardtable_engine::player::PlayerId;
use cardtable_engine::rules::{trick_winner, TRUMP};
use cardtable_engine::spades::{SpadesGame, SpadesReducer};

/// Rule-based spades player.
///
/// # Strategy
///
/// **Bidding:** one trick per spade held, at least 1 and at most 13.
///
/// **Playing:**
/// - Leading: the cheapest card (lowest non-trump, trump only if nothing else)
/// - Following: the cheapest card that takes the trick as it stands
/// - Otherwise: the cheapest card
///
/// # Example
///
/// ```rust
/// use cardtable_ai::baseline::SpadesAI;
/// use cardtable_ai::{get_action, AIOpponent};
/// use cardtable_engine::action::ActionKind;
/// use cardtable_engine::player::Player;
/// use cardtable_engine::reducer::Reducer;
/// use cardtable_engine::spades::SpadesReducer;
///
/// let players: Vec<Player> = (1..=4)
///     .map(|i| Player::ai(format!("p{i}"), format!("Bot {i}")))
///     .collect();
/// let rules = SpadesReducer::new();
/// let state = rules.initial_state(42, &players).unwrap();
/// let view = rules.player_view(&state, players[0].id());
///
/// let action = get_action(&SpadesAI::new(), &rules, &view, players[0].id()).unwrap();
/// assert!(matches!(action.kind, ActionKind::PlaceBid { bid } if (1..=13).contains(&bid)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SpadesAI;

impl SpadesAI {
    pub fn new() -> Self {
        Self
    }

    /// Bid for a hand: number of trumps, clamped to 1..=13.
    pub fn bid_for(hand: &[&Card]) -> u8 {
        let trumps = hand.iter().filter(|c| c.suit == TRUMP).count();
        trumps.clamp(1, 13) as u8
    }

    /// Ordering key for giving a card away: off-suit low cards first.
    fn cost(card: &Card) -> (bool, u8) {
        (card.suit == TRUMP, card.rank.value())
    }

    /// Whether `card` would beat `best`, the current winner of a trick.
    fn beats(card: &Card, best: &Card) -> bool {
        if card.suit == best.suit {
            card.rank > best.rank
        } else {
            card.suit == TRUMP && best.suit != TRUMP
        }
    }

    fn choose_card<'a>(
        &self,
        view: &SpadesGame,
        hand: &[&Card],
        legal: &'a [Action],
    ) -> Option<&'a Action> {
        let options: Vec<(&'a Action, &Card)> = legal
            .iter()
            .filter_map(|action| match &action.kind {
                ActionKind::PlayCard { card_id } => hand
                    .iter()
                    .find(|c| &c.id == card_id)
                    .map(|card| (action, *card)),
                ActionKind::PlaceBid { .. } => None,
            })
            .collect();

        let trick = &view.payload.current_trick;
        let winning = view
            .payload
            .led_suit
            .and_then(|led| trick_winner(trick, led, TRUMP))
            .map(|best| &best.card);

        let cheapest_winner = winning.and_then(|best| {
            options
                .iter()
                .filter(|(_, card)| Self::beats(card, best))
                .min_by_key(|(_, card)| Self::cost(card))
        });

        cheapest_winner
            .or_else(|| options.iter().min_by_key(|(_, card)| Self::cost(card)))
            .map(|(action, _)| *action)
    }
}

impl AIOpponent<SpadesReducer> for SpadesAI {
    fn select<'a>(
        &self,
        view: &SpadesGame,
        player_id: &PlayerId,
        legal: &'a [Action],
    ) -> Option<&'a Action> {
        let seat = view.seat_of(player_id)?;
        let hand: Vec<&Card> = view.payload.visible_cards(seat).collect();

        match &legal.first()?.kind {
            ActionKind::PlaceBid { .. } => {
                let wanted = Self::bid_for(&hand);
                legal
                    .iter()
                    .find(|a| matches!(a.kind, ActionKind::PlaceBid { bid } if bid == wanted))
            }
            ActionKind::PlayCard { .. } => self.choose_card(view, &hand, legal),
        }
    }

    fn name(&self) -> &str {
        "SpadesAI"
    }
}
