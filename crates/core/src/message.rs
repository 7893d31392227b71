// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Type definitions for messages between the client and server.
use ahash::AHashSet;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    deck::{Card, Deck, DeckBuilder, Suit},
    service,
};

/// Message exchanged by a client and a server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Message {
    /// Create a new deck.
    CreateDeck(DeckOptions),
    /// A deck has been created.
    DeckCreated {
        /// The new deck id.
        deck_id: String,
    },
    /// Draw the top card from a deck.
    DrawCard {
        /// The deck id.
        deck_id: String,
    },
    /// The card drawn from a deck.
    CardDrawn(WireCard),
    /// Return a card to the bottom of a deck.
    ReturnCard {
        /// The deck id.
        deck_id: String,
        /// The returned card.
        card: WireCard,
    },
    /// A card has been returned.
    CardReturned,
    /// Ask for the number of cards in a deck.
    DeckSize {
        /// The deck id.
        deck_id: String,
    },
    /// The number of cards in a deck.
    DeckSized {
        /// The deck id.
        deck_id: String,
        /// The number of cards left.
        size: u32,
    },
    /// A request failed.
    Error {
        /// The kind of failure.
        kind: ErrorKind,
        /// Error details.
        message: String,
    },
}

impl Message {
    /// Serializes this message.
    pub fn serialize(&self) -> Vec<u8> {
        bincode::serialize(self).expect("Should serialize message")
    }

    /// Deserializes a message.
    pub fn deserialize(buf: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize::<Message>(buf)?)
    }

    /// The message label used for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Message::CreateDeck(_) => "CreateDeck",
            Message::DeckCreated { .. } => "DeckCreated",
            Message::DrawCard { .. } => "DrawCard",
            Message::CardDrawn(_) => "CardDrawn",
            Message::ReturnCard { .. } => "ReturnCard",
            Message::CardReturned => "CardReturned",
            Message::DeckSize { .. } => "DeckSize",
            Message::DeckSized { .. } => "DeckSized",
            Message::Error { .. } => "Error",
        }
    }
}

/// The kind of error returned to a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The deck doesn't exist.
    NotFound,
    /// The deck has no cards left.
    EmptyDeck,
    /// The server storage failed.
    Unavailable,
    /// The request is not valid.
    InvalidRequest,
}

impl From<&service::Error> for ErrorKind {
    fn from(err: &service::Error) -> Self {
        match err {
            service::Error::NotFound(_) => ErrorKind::NotFound,
            service::Error::EmptyDeck(_) => ErrorKind::EmptyDeck,
            service::Error::StoreUnavailable(_) => ErrorKind::Unavailable,
        }
    }
}

impl From<OptionsError> for Message {
    fn from(err: OptionsError) -> Self {
        Message::Error {
            kind: ErrorKind::InvalidRequest,
            message: err.to_string(),
        }
    }
}

impl From<service::Error> for Message {
    fn from(err: service::Error) -> Self {
        Message::Error {
            kind: ErrorKind::from(&err),
            message: err.to_string(),
        }
    }
}

/// Wire suit values.
pub mod wire_suit {
    /// Suit not specified or not recognized.
    pub const UNSPECIFIED: i32 = 0;
    /// Hearts.
    pub const HEARTS: i32 = 1;
    /// Spades.
    pub const SPADES: i32 = 2;
    /// Diamonds.
    pub const DIAMONDS: i32 = 3;
    /// Clubs.
    pub const CLUBS: i32 = 4;
    /// Jokers.
    pub const JOKERS: i32 = 5;
}

/// Maps a suit to its wire value.
pub fn suit_to_wire(suit: Suit) -> i32 {
    match suit {
        Suit::Hearts => wire_suit::HEARTS,
        Suit::Spades => wire_suit::SPADES,
        Suit::Diamonds => wire_suit::DIAMONDS,
        Suit::Clubs => wire_suit::CLUBS,
        Suit::Jokers => wire_suit::JOKERS,
        Suit::Unknown => wire_suit::UNSPECIFIED,
    }
}

/// Maps a wire value to a suit, unrecognized values map to [Suit::Unknown].
pub fn suit_from_wire(value: i32) -> Suit {
    match value {
        wire_suit::HEARTS => Suit::Hearts,
        wire_suit::SPADES => Suit::Spades,
        wire_suit::DIAMONDS => Suit::Diamonds,
        wire_suit::CLUBS => Suit::Clubs,
        wire_suit::JOKERS => Suit::Jokers,
        _ => Suit::Unknown,
    }
}

/// A card as sent on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WireCard {
    /// The card suit, see [wire_suit].
    pub suit: i32,
    /// The card rank.
    pub value: i32,
}

impl From<Card> for WireCard {
    fn from(card: Card) -> Self {
        Self {
            suit: suit_to_wire(card.suit()),
            value: i32::from(card.rank()),
        }
    }
}

impl From<WireCard> for Card {
    /// Values outside the rank range map to rank 0.
    fn from(card: WireCard) -> Self {
        let rank = u8::try_from(card.value).unwrap_or_default();
        Card::new(rank, suit_from_wire(card.suit))
    }
}

/// The options for creating a deck.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckOptions {
    /// Number of jokers for each standard deck.
    pub joker_count: i32,
    /// Number of standard decks to add to the base deck.
    pub additional_deck_count: i32,
    /// Shuffle the deck.
    pub shuffle: bool,
    /// Cards to remove from the deck.
    pub excluded: Vec<WireCard>,
}

/// Error returned when deck options are out of range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionsError {
    /// Too many jokers for each deck.
    #[error("joker count {0} exceeds {max}", max = DeckOptions::MAX_JOKERS)]
    TooManyJokers(i32),
    /// Too many additional decks.
    #[error("additional deck count {0} exceeds {max}", max = DeckOptions::MAX_ADDITIONAL_DECKS)]
    TooManyDecks(i32),
}

impl DeckOptions {
    /// Maximum number of jokers for each standard deck.
    pub const MAX_JOKERS: i32 = 64;

    /// Maximum number of additional standard decks.
    pub const MAX_ADDITIONAL_DECKS: i32 = 64;

    /// Creates a [DeckBuilder] for these options.
    ///
    /// Negative counts are treated as zero, counts above [Self::MAX_JOKERS] or
    /// [Self::MAX_ADDITIONAL_DECKS] are rejected.
    pub fn builder(&self) -> Result<DeckBuilder, OptionsError> {
        if self.joker_count > Self::MAX_JOKERS {
            return Err(OptionsError::TooManyJokers(self.joker_count));
        }

        if self.additional_deck_count > Self::MAX_ADDITIONAL_DECKS {
            return Err(OptionsError::TooManyDecks(self.additional_deck_count));
        }

        let count = |n: i32| usize::try_from(n).unwrap_or_default();
        let mut builder = Deck::builder()
            .jokers_per_deck(count(self.joker_count))
            .additional_decks(count(self.additional_deck_count))
            .shuffle(self.shuffle);

        if !self.excluded.is_empty() {
            let excluded = self
                .excluded
                .iter()
                .map(|c| Card::from(*c))
                .collect::<AHashSet<_>>();
            builder = builder.exclude(move |c| excluded.contains(c));
        }

        Ok(builder)
    }
}
