//! Terminal output helpers shared by the commands.

use cardtable_engine::cards::HeldCard;
use std::io::Write;

pub fn write_error(err: &mut dyn Write, msg: &str) -> std::io::Result<()> {
    writeln!(err, "Error: {}", msg)
}

/// Display a warning message to stderr with "WARNING:" prefix
pub fn display_warning(err: &mut dyn Write, message: &str) -> std::io::Result<()> {
    writeln!(err, "WARNING: {}", message)
}

/// Short forms separated by spaces; concealed cards print as `??`.
pub fn format_hand(hand: &[HeldCard]) -> String {
    hand.iter()
        .map(|slot| match slot.card() {
            Some(card) => card.short(),
            None => "??".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardtable_engine::cards::full_deck;

    #[test]
    fn error_and_warning_prefixes() {
        let mut buf = Vec::new();
        write_error(&mut buf, "boom").unwrap();
        display_warning(&mut buf, "careful").unwrap();
        let s = String::from_utf8(buf).unwrap();
        assert_eq!(s, "Error: boom\nWARNING: careful\n");
    }

    #[test]
    fn concealed_cards_are_masked() {
        let deck = full_deck();
        let hand = vec![
            HeldCard::from(deck[0].clone()),
            HeldCard::Concealed,
            HeldCard::from(deck[51].clone()),
        ];
        assert_eq!(format_hand(&hand), "AH ?? KS");
    }
}
