// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Decks storage.
use ahash::AHashMap;
use parking_lot::Mutex;
use std::error::Error as StdError;
use thiserror::Error;

use crate::deck::{Deck, DeckId};

/// Errors returned by a [Store].
#[derive(Debug, Error)]
pub enum StoreError {
    /// There is no deck for the given id.
    #[error("deck {0} not found")]
    NotFound(DeckId),
    /// The backing storage failed to read or write a deck.
    #[error("deck store unavailable: {0}")]
    Unavailable(#[source] Box<dyn StdError + Send + Sync>),
}

impl StoreError {
    /// Creates an [StoreError::Unavailable] error from a storage error.
    pub fn unavailable<E>(err: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        StoreError::Unavailable(err.into())
    }
}

/// A keyed storage for decks.
///
/// A store owns its decks, [Store::get] returns a copy of the stored deck and
/// changes to the copy must be written back with [Store::put].
///
/// Each call is consistent on its own but a get, change, put sequence is not
/// atomic: two concurrent sequences on the same id race and the last put
/// overwrites the other without any error.
pub trait Store: Send + Sync {
    /// Gets a copy of the deck with the given id.
    fn get(&self, id: &DeckId) -> Result<Deck, StoreError>;

    /// Stores a deck with the given id replacing any previous deck.
    fn put(&self, id: &DeckId, deck: Deck) -> Result<(), StoreError>;
}

/// A non persistent [Store] that keeps decks in memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    decks: Mutex<AHashMap<DeckId, Deck>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of decks in the store.
    pub fn len(&self) -> usize {
        self.decks.lock().len()
    }

    /// Checks if the store has no decks.
    pub fn is_empty(&self) -> bool {
        self.decks.lock().is_empty()
    }
}

impl Store for InMemoryStore {
    fn get(&self, id: &DeckId) -> Result<Deck, StoreError> {
        self.decks
            .lock()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn put(&self, id: &DeckId, deck: Deck) -> Result<(), StoreError> {
        self.decks.lock().insert(id.clone(), deck);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{Card, Suit};
    use std::{sync::Arc, thread};

    #[test]
    fn get_missing_deck() {
        let store = InMemoryStore::new();
        let id = DeckId::new_id();
        assert!(matches!(store.get(&id), Err(StoreError::NotFound(e)) if e == id));
    }

    #[test]
    fn last_put_wins() {
        let store = InMemoryStore::new();
        let id = DeckId::new_id();

        let d1 = Deck::default();
        let d2 = Deck::builder().jokers_per_deck(2).build(&mut rand::rng());

        store.put(&id, d1).unwrap();
        store.put(&id, d2.clone()).unwrap();
        assert_eq!(store.get(&id).unwrap(), d2);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn distinct_ids() {
        let store = InMemoryStore::new();
        let (id1, id2) = (DeckId::new_id(), DeckId::new_id());

        store.put(&id1, Deck::default()).unwrap();
        store.put(&id2, Deck::empty()).unwrap();

        assert_eq!(store.get(&id1).unwrap(), Deck::default());
        assert_eq!(store.get(&id2).unwrap(), Deck::empty());
    }

    #[test]
    fn get_returns_copy() {
        let store = InMemoryStore::new();
        let id = DeckId::new_id();
        store.put(&id, Deck::default()).unwrap();

        // Changing the returned deck doesn't change the stored deck.
        let mut deck = store.get(&id).unwrap();
        deck.draw();
        deck.push(Card::joker());
        assert_eq!(store.get(&id).unwrap(), Deck::default());

        store.put(&id, deck.clone()).unwrap();
        assert_eq!(store.get(&id).unwrap(), deck);
    }

    #[test]
    fn concurrent_puts() {
        let store = Arc::new(InMemoryStore::new());

        let handles = (0..8)
            .map(|_| {
                let store = store.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        let id = DeckId::new_id();
                        let mut deck = Deck::empty();
                        deck.push(Card::new(Card::ACE, Suit::Spades));
                        store.put(&id, deck).unwrap();
                        assert_eq!(store.get(&id).unwrap().len(), 1);
                    }
                })
            })
            .collect::<Vec<_>>();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 800);
    }
}
