// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Deckhand core types shared by client and server.
//!
//! The [service::DeckService] exposes the deck operations on top of a
//! [store::Store]:
//!
//! ```
//! # use std::sync::Arc;
//! # use deckhand_core::{deck::Deck, service::DeckService, store::InMemoryStore};
//! let service = DeckService::new(Arc::new(InMemoryStore::new()));
//! let id = service.create_deck(Deck::builder().jokers_per_deck(2)).unwrap();
//!
//! let card = service.draw_card(&id).unwrap();
//! assert!(card.is_joker());
//!
//! service.return_card(&id, card).unwrap();
//! assert_eq!(service.deck_size(&id).unwrap(), 54);
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]

#[cfg(feature = "connection")]
pub mod connection;
pub mod deck;
pub mod message;
pub mod service;
pub mod store;
