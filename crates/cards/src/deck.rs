// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Deck of cards.
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::{Card, DeckBuilder, Suit};

/// A cards deck.
///
/// The deck is a stack, cards are drawn from the top and returned cards go to
/// the bottom. Iteration goes from the bottom to the top of the deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: VecDeque<Card>,
}

impl Deck {
    /// The number of cards in a standard deck.
    pub const SIZE: usize = 52;

    /// The number of cards for each standard suit.
    pub const CARDS_PER_SUIT: u8 = 13;

    /// Creates a deck without cards.
    pub fn empty() -> Self {
        Self {
            cards: VecDeque::new(),
        }
    }

    /// Returns a builder to configure a new deck.
    pub fn builder() -> DeckBuilder {
        DeckBuilder::default()
    }

    /// Draws the card at the top of the deck.
    ///
    /// Returns `None` and leaves the deck untouched if the deck is empty.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop_back()
    }

    /// Pushes a card to the bottom of the deck.
    pub fn push(&mut self, card: Card) {
        self.cards.push_front(card);
    }

    /// Checks if the deck is empty.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of cards in the deck.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// The card at the top of the deck, the next card to be drawn.
    pub fn top(&self) -> Option<&Card> {
        self.cards.back()
    }

    /// The card at the bottom of the deck.
    pub fn bottom(&self) -> Option<&Card> {
        self.cards.front()
    }

    /// Iterates the cards from the bottom to the top of the deck.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Card> + ExactSizeIterator {
        self.cards.iter()
    }

    pub(crate) fn cards_mut(&mut self) -> &mut VecDeque<Card> {
        &mut self.cards
    }
}

impl Default for Deck {
    /// A standard 52 cards deck, suits and ranks in building order.
    fn default() -> Self {
        let cards = Suit::suits()
            .flat_map(|s| (1..=Self::CARDS_PER_SUIT).map(move |r| Card::new(r, s)))
            .collect::<VecDeque<_>>();
        Self { cards }
    }
}

impl FromIterator<Card> for Deck {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        Self {
            cards: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Deck {
    type Item = Card;
    type IntoIter = std::collections::vec_deque::IntoIter<Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.into_iter()
    }
}
