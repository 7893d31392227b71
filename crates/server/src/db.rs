// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Database store for persisting decks.
use anyhow::Result;
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;

use deckhand_core::{
    deck::{Deck, DeckId},
    store::{Store, StoreError},
};

/// A [Store] that persists decks in a SQLite database.
#[derive(Debug)]
pub struct Db {
    db: Mutex<Connection>,
}

impl Db {
    /// Open a database.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::init(Connection::open(path)?)
    }

    /// Open an in memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        // Create tables
        conn.execute(
            "CREATE TABLE IF NOT EXISTS decks (
               id TEXT PRIMARY KEY,
               cards BLOB NOT NULL,
               created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
               last_update DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
            (),
        )?;

        Ok(Db {
            db: Mutex::new(conn),
        })
    }
}

impl Store for Db {
    fn get(&self, id: &DeckId) -> Result<Deck, StoreError> {
        let cards = self
            .db
            .lock()
            .query_row(
                "SELECT cards
                 FROM decks
                 WHERE id = ?1",
                params![id.as_str()],
                |row| row.get::<usize, Vec<u8>>(0),
            )
            .optional()
            .map_err(StoreError::unavailable)?
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        bincode::deserialize(&cards).map_err(StoreError::unavailable)
    }

    fn put(&self, id: &DeckId, deck: Deck) -> Result<(), StoreError> {
        let cards = bincode::serialize(&deck).map_err(StoreError::unavailable)?;

        self.db
            .lock()
            .execute(
                "INSERT INTO decks (id, cards, last_update)
                 VALUES (?1, ?2, CURRENT_TIMESTAMP)
                 ON CONFLICT(id) DO UPDATE SET
                   cards = excluded.cards,
                   last_update = CURRENT_TIMESTAMP",
                params![id.as_str(), cards],
            )
            .map_err(StoreError::unavailable)?;

        Ok(())
    }
}
