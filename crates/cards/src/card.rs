// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Playing card definitions.
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Card suit.
///
/// The [Suit::Unknown] variant is the sentinel for suits that could not be
/// recognized, it is never produced when building a deck.
#[derive(
    Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Suit {
    /// Unknown or unspecified suit.
    #[default]
    Unknown = 0,
    /// Hearts suit.
    Hearts = 1,
    /// Spades suit.
    Spades = 2,
    /// Diamonds suit.
    Diamonds = 3,
    /// Clubs suit.
    Clubs = 4,
    /// Jokers suit, the rank of a joker carries no meaning.
    Jokers = 5,
}

impl Suit {
    /// Returns the standard suits in deck building order.
    pub fn suits() -> impl DoubleEndedIterator<Item = Suit> {
        [Suit::Hearts, Suit::Spades, Suit::Diamonds, Suit::Clubs].into_iter()
    }

    /// Checks if this is one of the four standard suits.
    pub fn is_standard(&self) -> bool {
        matches!(
            self,
            Suit::Hearts | Suit::Spades | Suit::Diamonds | Suit::Clubs
        )
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suit = match self {
            Suit::Hearts => 'H',
            Suit::Spades => 'S',
            Suit::Diamonds => 'D',
            Suit::Clubs => 'C',
            Suit::Jokers => 'J',
            Suit::Unknown => '?',
        };

        write!(f, "{suit}")
    }
}

/// A playing card.
///
/// Ranks go from 1 to 13 with Jacks 11, Queens 12 and Kings 13, the rank
/// range is not checked. Jokers always have rank 1 so that all jokers compare
/// equal.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Card {
    suit: Suit,
    rank: u8,
}

impl Card {
    /// The Ace rank.
    pub const ACE: u8 = 1;
    /// The Jack rank.
    pub const JACK: u8 = 11;
    /// The Queen rank.
    pub const QUEEN: u8 = 12;
    /// The King rank.
    pub const KING: u8 = 13;

    /// Creates a card given a rank and suit.
    ///
    /// The rank of a joker is ignored and set to [Card::ACE].
    pub const fn new(rank: u8, suit: Suit) -> Card {
        let rank = match suit {
            Suit::Jokers => Self::ACE,
            _ => rank,
        };

        Self { suit, rank }
    }

    /// Creates a joker card.
    pub const fn joker() -> Card {
        Self::new(Self::ACE, Suit::Jokers)
    }

    /// Returns the card suit.
    pub fn suit(&self) -> Suit {
        self.suit
    }

    /// Returns the card rank.
    pub fn rank(&self) -> u8 {
        self.rank
    }

    /// Checks if this card is a joker.
    pub fn is_joker(&self) -> bool {
        self.suit == Suit::Jokers
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_joker() {
            return write!(f, "JK");
        }

        let rank = match self.rank {
            1 => 'A',
            2..=9 => char::from(b'0' + self.rank),
            10 => 'T',
            11 => 'J',
            12 => 'Q',
            13 => 'K',
            _ => '?',
        };

        write!(f, "{rank}{}", self.suit)
    }
}

/// Error returned when parsing a card from a string fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid card '{0}'")]
pub struct ParseCardError(String);

impl std::str::FromStr for Card {
    type Err = ParseCardError;

    /// Parses a card from its display form, for example `AH`, `TD` or `JK`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseCardError(s.to_string());

        let upper = s.trim().to_ascii_uppercase();
        if upper == "JK" {
            return Ok(Card::joker());
        }

        let mut chars = upper.chars();
        let (Some(r), Some(u), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(err());
        };

        let rank = match r {
            'A' => Card::ACE,
            '2'..='9' => r as u8 - b'0',
            'T' => 10,
            'J' => Card::JACK,
            'Q' => Card::QUEEN,
            'K' => Card::KING,
            _ => return Err(err()),
        };

        let suit = match u {
            'H' => Suit::Hearts,
            'S' => Suit::Spades,
            'D' => Suit::Diamonds,
            'C' => Suit::Clubs,
            _ => return Err(err()),
        };

        Ok(Card::new(rank, suit))
    }
}
