// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Types used to identify and manage decks.
use serde::{Deserialize, Serialize};
use std::fmt;

pub use deckhand_cards::{Card, Deck, DeckBuilder, ParseCardError, Suit};

/// A unique deck identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DeckId(String);

impl DeckId {
    /// Create a new unique deck id from 128 random bits.
    pub fn new_id() -> DeckId {
        DeckId(format!("{:032x}", rand::random::<u128>()))
    }

    /// The id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for DeckId {
    fn from(id: String) -> Self {
        DeckId(id)
    }
}

impl From<&str> for DeckId {
    fn from(id: &str) -> Self {
        DeckId(id.to_string())
    }
}

impl From<DeckId> for String {
    fn from(id: DeckId) -> Self {
        id.0
    }
}

impl fmt::Display for DeckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ahash::HashSet;

    #[test]
    fn unique_ids() {
        let ids = (0..1000).map(|_| DeckId::new_id()).collect::<HashSet<_>>();
        assert_eq!(ids.len(), 1000);
        assert!(ids.iter().all(|id| id.as_str().len() == 32));
    }
}
