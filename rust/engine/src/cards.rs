use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::EngineError;

/// Represents one of the four suits in a standard 52-card deck.
/// Used as a component of [`Card`] to fully define a playing card.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Suit {
    /// Hearts suit (♥)
    #[serde(rename = "H")]
    Hearts,
    /// Diamonds suit (♦)
    #[serde(rename = "D")]
    Diamonds,
    /// Clubs suit (♣)
    #[serde(rename = "C")]
    Clubs,
    /// Spades suit (♠)
    #[serde(rename = "S")]
    Spades,
}

impl Suit {
    pub fn code(self) -> char {
        match self {
            Suit::Hearts => 'H',
            Suit::Diamonds => 'D',
            Suit::Clubs => 'C',
            Suit::Spades => 'S',
        }
    }

    pub fn from_code(c: char) -> Option<Suit> {
        match c.to_ascii_uppercase() {
            'H' => Some(Suit::Hearts),
            'D' => Some(Suit::Diamonds),
            'C' => Some(Suit::Clubs),
            'S' => Some(Suit::Spades),
            _ => None,
        }
    }
}

/// Represents the rank (face value) of a playing card from Two through Ace.
/// Declaration order is trick-taking strength, so `Ord` compares ranks the
/// way a trick is won.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Rank {
    /// Rank 2
    #[serde(rename = "2")]
    Two = 2,
    /// Rank 3
    #[serde(rename = "3")]
    Three,
    /// Rank 4
    #[serde(rename = "4")]
    Four,
    /// Rank 5
    #[serde(rename = "5")]
    Five,
    /// Rank 6
    #[serde(rename = "6")]
    Six,
    /// Rank 7
    #[serde(rename = "7")]
    Seven,
    /// Rank 8
    #[serde(rename = "8")]
    Eight,
    /// Rank 9
    #[serde(rename = "9")]
    Nine,
    /// Rank 10
    #[serde(rename = "T")]
    Ten,
    /// Jack (11)
    #[serde(rename = "J")]
    Jack,
    /// Queen (12)
    #[serde(rename = "Q")]
    Queen,
    /// King (13)
    #[serde(rename = "K")]
    King,
    /// Ace (14)
    #[serde(rename = "A")]
    Ace,
}

impl Rank {
    /// Numeric strength, 2 through 14.
    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn code(self) -> char {
        match self {
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        }
    }

    pub fn from_code(c: char) -> Option<Rank> {
        all_ranks()
            .into_iter()
            .find(|r| r.code() == c.to_ascii_uppercase())
    }
}

/// Stable identifier of a physical card within one deck, e.g. `HA-0`.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Represents a single playing card with a suit, a rank and its deck id.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Card {
    /// The suit of the card
    pub suit: Suit,
    /// The rank of the card (Two through Ace)
    pub rank: Rank,
    /// Unique id within the deck the card was built from
    pub id: CardId,
}

impl Card {
    /// Short form without the id, e.g. `AS` or `TH`.
    pub fn short(&self) -> String {
        format!("{}{}", self.rank.code(), self.suit.code())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.code(), self.suit.code())
    }
}

/// Rank and suit without an id, parsed from the short form.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Face {
    pub rank: Rank,
    pub suit: Suit,
}

impl FromStr for Face {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        let (Some(r), Some(su), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(EngineError::Malformed(format!("card '{}' must be two characters", s)));
        };
        let rank = Rank::from_code(r)
            .ok_or_else(|| EngineError::Malformed(format!("unknown rank '{}'", r)))?;
        let suit = Suit::from_code(su)
            .ok_or_else(|| EngineError::Malformed(format!("unknown suit '{}'", su)))?;
        Ok(Face { rank, suit })
    }
}

/// A slot in a player's hand as seen by one observer.
///
/// Full game states only hold `Visible` cards; the view filter swaps other
/// players' cards for `Concealed`, which carries nothing about the card.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeldCard {
    Visible(Card),
    Concealed,
}

impl HeldCard {
    pub fn card(&self) -> Option<&Card> {
        match self {
            HeldCard::Visible(c) => Some(c),
            HeldCard::Concealed => None,
        }
    }

    pub fn is_concealed(&self) -> bool {
        matches!(self, HeldCard::Concealed)
    }
}

impl From<Card> for HeldCard {
    fn from(card: Card) -> Self {
        HeldCard::Visible(card)
    }
}

pub fn all_suits() -> [Suit; 4] {
    [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades]
}

pub fn all_ranks() -> [Rank; 13] {
    [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ]
}

// Construction order of the standard deck; ids and therefore every deal
// depend on it.
const DECK_RANK_ORDER: [Rank; 13] = [
    Rank::Ace,
    Rank::Two,
    Rank::Three,
    Rank::Four,
    Rank::Five,
    Rank::Six,
    Rank::Seven,
    Rank::Eight,
    Rank::Nine,
    Rank::Ten,
    Rank::Jack,
    Rank::Queen,
    Rank::King,
];

/// Builds the 52-card deck in its canonical, unshuffled order.
pub fn full_deck() -> Vec<Card> {
    let mut v = Vec::with_capacity(52);
    for &s in &all_suits() {
        for &r in &DECK_RANK_ORDER {
            let id = CardId(format!("{}{}-{}", s.code(), r.code(), v.len()));
            v.push(Card { suit: s, rank: r, id });
        }
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn full_deck_has_52_distinct_faces_and_ids() {
        let deck = full_deck();
        assert_eq!(deck.len(), 52);
        let faces: HashSet<_> = deck.iter().map(|c| (c.suit, c.rank)).collect();
        let ids: HashSet<_> = deck.iter().map(|c| c.id.clone()).collect();
        assert_eq!(faces.len(), 52);
        assert_eq!(ids.len(), 52);
    }

    #[test]
    fn deck_ids_follow_construction_order() {
        let deck = full_deck();
        assert_eq!(deck[0].id.as_str(), "HA-0");
        assert_eq!(deck[1].id.as_str(), "H2-1");
        assert_eq!(deck[13].id.as_str(), "DA-13");
        assert_eq!(deck[51].id.as_str(), "SK-51");
    }

    #[test]
    fn rank_order_puts_ace_high() {
        assert!(Rank::Ace > Rank::King);
        assert!(Rank::Two < Rank::Three);
        assert_eq!(Rank::Ten.value(), 10);
    }

    #[test]
    fn face_parses_short_form() {
        let f: Face = "ts".parse().unwrap();
        assert_eq!(f, Face { rank: Rank::Ten, suit: Suit::Spades });
        assert!("1S".parse::<Face>().is_err());
        assert!("ASX".parse::<Face>().is_err());
    }

    #[test]
    fn suit_serializes_as_code() {
        let json = serde_json::to_string(&Suit::Spades).unwrap();
        assert_eq!(json, "\"S\"");
    }
}
