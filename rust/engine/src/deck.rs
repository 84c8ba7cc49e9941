use crate::cards::Card;
use crate::player::PlayerId;
use crate::rng::SeededRng;

/// Deals `cards_per_player` cards to each player from the front of `deck`.
///
/// Only the first `players * cards_per_player` cards take part. They are
/// shuffled with `rng` and cut into consecutive hands in player order.
///
/// # Returns
///
/// One `(player, hand)` pair per player, in the order given. Hands are short
/// when the deck holds fewer cards than requested.
pub fn deal_to_players(
    deck: &[Card],
    player_ids: &[PlayerId],
    cards_per_player: usize,
    rng: &mut SeededRng,
) -> Vec<(PlayerId, Vec<Card>)> {
    let total = (player_ids.len() * cards_per_player).min(deck.len());
    let shuffled = rng.shuffled(&deck[..total]);
    player_ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let start = (i * cards_per_player).min(total);
            let end = ((i + 1) * cards_per_player).min(total);
            (id.clone(), shuffled[start..end].to_vec())
        })
        .collect()
}
