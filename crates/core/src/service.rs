// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Deck service operations.
use parking_lot::Mutex;
use rand::{SeedableRng, rngs::StdRng};
use std::{error::Error as StdError, sync::Arc};
use thiserror::Error;

use crate::{
    deck::{Card, DeckBuilder, DeckId},
    store::{Store, StoreError},
};

/// Errors returned by the [DeckService].
#[derive(Debug, Error)]
pub enum Error {
    /// There is no deck for the given id.
    #[error("deck {0} not found")]
    NotFound(DeckId),
    /// The deck exists but has no cards left.
    #[error("deck {0} is empty")]
    EmptyDeck(DeckId),
    /// The deck store failed, the error comes from the store unchanged.
    #[error("deck store unavailable: {0}")]
    StoreUnavailable(#[source] Box<dyn StdError + Send + Sync>),
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Error::NotFound(id),
            StoreError::Unavailable(e) => Error::StoreUnavailable(e),
        }
    }
}

/// The decks operations exposed to clients.
///
/// Draw and return operations read a deck from the store, change it, and write
/// it back. The store doesn't lock a deck between the read and the write so
/// concurrent operations on the same deck can lose updates.
pub struct DeckService {
    store: Arc<dyn Store>,
    rng: Mutex<StdRng>,
}

impl DeckService {
    /// Creates a service with a random generator seeded by the OS.
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self::with_rng(store, StdRng::from_os_rng())
    }

    /// Creates a service with the given random generator used for shuffling.
    pub fn with_rng(store: Arc<dyn Store>, rng: StdRng) -> Self {
        Self {
            store,
            rng: Mutex::new(rng),
        }
    }

    /// Builds a new deck and stores it under a new id.
    pub fn create_deck(&self, builder: DeckBuilder) -> Result<DeckId, Error> {
        // Only seeding holds the lock, building runs user callbacks.
        let mut rng = StdRng::from_rng(&mut *self.rng.lock());
        let deck = builder.build(&mut rng);
        let id = DeckId::new_id();
        self.store.put(&id, deck)?;
        Ok(id)
    }

    /// Draws the top card from a deck.
    pub fn draw_card(&self, id: &DeckId) -> Result<Card, Error> {
        let mut deck = self.store.get(id)?;
        let card = deck.draw().ok_or_else(|| Error::EmptyDeck(id.clone()))?;
        self.store.put(id, deck)?;
        Ok(card)
    }

    /// Returns a card to the bottom of a deck.
    pub fn return_card(&self, id: &DeckId, card: Card) -> Result<(), Error> {
        let mut deck = self.store.get(id)?;
        deck.push(card);
        self.store.put(id, deck)?;
        Ok(())
    }

    /// The number of cards left in a deck.
    pub fn deck_size(&self, id: &DeckId) -> Result<usize, Error> {
        Ok(self.store.get(id)?.len())
    }
}

impl std::fmt::Debug for DeckService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeckService").finish_non_exhaustive()
    }
}
