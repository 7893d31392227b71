// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Deck construction.
use rand::{Rng, seq::SliceRandom};
use std::{cmp::Ordering, fmt};

use crate::{Card, Deck};

type ExcludeFn = Box<dyn FnMut(&Card) -> bool + Send>;
type CompareFn = Box<dyn FnMut(&Card, &Card) -> Ordering + Send>;

/// Deck configuration.
///
/// Options can be set in any order, when building a deck the options are
/// applied in this fixed order:
///
/// 1. Build a standard 52 cards deck.
/// 2. Append the additional decks after the standard deck.
/// 3. Append the jokers, `jokers_per_deck` for the standard deck and for each
///    additional deck.
/// 4. Remove all the cards matching the exclusion predicate.
/// 5. Shuffle the deck.
/// 6. Sort the deck with the comparator.
///
/// ```
/// # use deckhand_cards::{Card, Deck, Suit};
/// let deck = Deck::builder()
///     .additional_decks(1)
///     .jokers_per_deck(2)
///     .exclude(|c| c.suit() == Suit::Clubs)
///     .build(&mut rand::rng());
/// assert_eq!(deck.len(), 2 * 39 + 4);
/// ```
#[derive(Default)]
pub struct DeckBuilder {
    additional_decks: usize,
    jokers_per_deck: usize,
    exclude: Option<ExcludeFn>,
    shuffle: bool,
    compare: Option<CompareFn>,
}

impl DeckBuilder {
    /// Sets the number of standard decks to add to the base deck.
    pub fn additional_decks(mut self, count: usize) -> Self {
        self.additional_decks = count;
        self
    }

    /// Sets the number of jokers for each standard deck.
    pub fn jokers_per_deck(mut self, count: usize) -> Self {
        self.jokers_per_deck = count;
        self
    }

    /// Sets a predicate to remove cards from the deck.
    ///
    /// The predicate is called exactly once for each card, from the bottom to
    /// the top of the deck, and the cards for which it returns true are removed.
    pub fn exclude<F>(mut self, f: F) -> Self
    where
        F: FnMut(&Card) -> bool + Send + 'static,
    {
        self.exclude = Some(Box::new(f));
        self
    }

    /// Shuffles the deck after all cards have been added or removed.
    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Sorts the deck with a comparator as the last building step.
    ///
    /// The sort is stable, cards that compare equal keep the order they had
    /// after shuffling.
    pub fn sort_by<F>(mut self, f: F) -> Self
    where
        F: FnMut(&Card, &Card) -> Ordering + Send + 'static,
    {
        self.compare = Some(Box::new(f));
        self
    }

    /// The total number of jokers the deck gets before exclusion.
    ///
    /// Saturates at `usize::MAX` instead of overflowing.
    pub fn jokers_count(&self) -> usize {
        self.jokers_per_deck
            .saturating_mul(self.additional_decks.saturating_add(1))
    }

    /// Builds the deck using `rng` for shuffling.
    pub fn build<R: Rng + ?Sized>(self, rng: &mut R) -> Deck {
        let jokers = self.jokers_count();
        let DeckBuilder {
            additional_decks,
            exclude,
            shuffle,
            compare,
            ..
        } = self;

        let mut deck = Deck::default();
        let cards = deck.cards_mut();
        // Best effort, a failed reservation leaves growth to extend.
        let capacity = Deck::SIZE
            .saturating_mul(additional_decks)
            .saturating_add(jokers);
        let _ = cards.try_reserve(capacity);

        let base = cards.iter().copied().collect::<Vec<_>>();
        for _ in 0..additional_decks {
            cards.extend(base.iter().copied());
        }

        cards.extend(std::iter::repeat_n(Card::joker(), jokers));

        if let Some(mut exclude) = exclude {
            cards.retain(|c| !exclude(c));
        }

        if shuffle {
            cards.make_contiguous().shuffle(rng);
        }

        if let Some(compare) = compare {
            cards.make_contiguous().sort_by(compare);
        }

        deck
    }
}

impl fmt::Debug for DeckBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeckBuilder")
            .field("additional_decks", &self.additional_decks)
            .field("jokers_per_deck", &self.jokers_per_deck)
            .field("exclude", &self.exclude.is_some())
            .field("shuffle", &self.shuffle)
            .field("sort", &self.compare.is_some())
            .finish()
    }
}
