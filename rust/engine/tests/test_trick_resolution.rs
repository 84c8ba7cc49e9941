use cardtable_engine::cards::{all_suits, full_deck, Card, Suit};
use cardtable_engine::player::PlayerId;
use cardtable_engine::rules::{trick_winner, TrickPlay};
use proptest::prelude::*;
use proptest::sample::subsequence;

fn suit_strategy() -> impl Strategy<Value = Suit> {
    prop::sample::select(all_suits().to_vec())
}

fn four_distinct_cards() -> impl Strategy<Value = Vec<Card>> {
    subsequence(full_deck(), 4).prop_shuffle()
}

fn plays_from(cards: Vec<Card>) -> Vec<TrickPlay> {
    cards
        .into_iter()
        .enumerate()
        .map(|(i, card)| TrickPlay {
            player_id: PlayerId::new(format!("p{}", i + 1)),
            card,
        })
        .collect()
}

proptest! {
    /// Highest trump wins if any trump was played, else highest led card.
    #[test]
    fn prop_trick_winner_matches_oracle(cards in four_distinct_cards(), trump in suit_strategy()) {
        let led = cards[0].suit;
        let plays = plays_from(cards);
        let winner = trick_winner(&plays, led, trump).expect("non-empty trick");

        let trumps: Vec<&TrickPlay> = plays.iter().filter(|p| p.card.suit == trump).collect();
        if trumps.is_empty() {
            prop_assert_eq!(winner.card.suit, led);
            for p in plays.iter().filter(|p| p.card.suit == led) {
                prop_assert!(winner.card.rank >= p.card.rank);
            }
        } else {
            prop_assert_eq!(winner.card.suit, trump);
            for p in trumps {
                prop_assert!(winner.card.rank >= p.card.rank);
            }
        }
    }

    /// Off-suit, non-trump cards never take the trick.
    #[test]
    fn prop_off_suit_never_wins(cards in four_distinct_cards(), trump in suit_strategy()) {
        let led = cards[0].suit;
        let plays = plays_from(cards);
        let winner = trick_winner(&plays, led, trump).expect("non-empty trick");
        prop_assert!(winner.card.suit == led || winner.card.suit == trump);
    }
}
