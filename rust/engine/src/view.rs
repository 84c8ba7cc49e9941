//! Per-observer projection of game state.
//!
//! Every channel that hands state to someone other than its owner (an
//! automated player, a remote peer, a renderer) goes through a rule-set's
//! `player_view`, which uses these helpers.
//!
//! Views keep the session seed, and the seed alone re-deals every hand.
//! Concealment therefore only holds against observers that never learn the
//! seed; a peer that runs the engine locally can always reconstruct the deal.

use crate::cards::HeldCard;

/// Hands as seen from `viewer_seat`: that seat's cards pass through, every
/// other card becomes [`HeldCard::Concealed`]. Hand sizes are preserved.
///
/// A viewer without a seat (`None`) sees no cards at all.
pub fn conceal_hands(hands: &[Vec<HeldCard>], viewer_seat: Option<usize>) -> Vec<Vec<HeldCard>> {
    hands
        .iter()
        .enumerate()
        .map(|(seat, hand)| {
            if Some(seat) == viewer_seat {
                hand.clone()
            } else {
                vec![HeldCard::Concealed; hand.len()]
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::full_deck;

    fn hands() -> Vec<Vec<HeldCard>> {
        full_deck()
            .chunks(13)
            .map(|c| c.iter().cloned().map(HeldCard::from).collect())
            .collect()
    }

    #[test]
    fn only_viewer_hand_is_visible() {
        let view = conceal_hands(&hands(), Some(2));
        for (seat, hand) in view.iter().enumerate() {
            assert_eq!(hand.len(), 13);
            if seat == 2 {
                assert!(hand.iter().all(|c| c.card().is_some()));
            } else {
                assert!(hand.iter().all(HeldCard::is_concealed));
            }
        }
    }

    #[test]
    fn spectator_sees_nothing() {
        let view = conceal_hands(&hands(), None);
        assert!(view.iter().flatten().all(HeldCard::is_concealed));
    }
}
