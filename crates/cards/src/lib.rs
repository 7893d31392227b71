// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Deckhand playing cards types.
//!
//! This crate define types to create cards:
//!
//! ```
//! # use deckhand_cards::{Card, Suit};
//! let ah = Card::new(Card::ACE, Suit::Hearts);
//! let kd = Card::new(Card::KING, Suit::Diamonds);
//! let jk = Card::joker();
//! ```
//!
//! and a [Deck] type that works like a stack, cards are drawn from the top and
//! returned at the bottom:
//!
//! ```
//! # use deckhand_cards::{Card, Deck, Suit};
//! let mut deck = Deck::default();
//! let card = deck.draw().unwrap();
//! assert_eq!(card, Card::new(Card::KING, Suit::Clubs));
//!
//! deck.push(card);
//! assert_eq!(deck.len(), Deck::SIZE);
//! assert_eq!(deck.bottom(), Some(&card));
//! ```
//!
//! Decks with jokers, multiple standard decks, or excluded cards are created
//! with a [DeckBuilder], shuffling uses the random generator passed to
//! [DeckBuilder::build] so that seeded generators give reproducible decks:
//!
//! ```
//! # use deckhand_cards::{Card, Deck};
//! use rand::{SeedableRng, rngs::StdRng};
//!
//! let build = || {
//!     Deck::builder()
//!         .jokers_per_deck(2)
//!         .shuffle(true)
//!         .build(&mut StdRng::seed_from_u64(101))
//! };
//! assert_eq!(build().len(), 54);
//! assert_eq!(build(), build());
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
mod builder;
mod card;
mod deck;

pub use builder::DeckBuilder;
pub use card::{Card, ParseCardError, Suit};
pub use deck::Deck;
