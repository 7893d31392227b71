// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Result, anyhow};
use clap::Parser;
use directories::ProjectDirs;
use log::error;
use std::path::PathBuf;

use deckhand_server::server;

#[derive(Debug, Parser)]
struct Cli {
    /// The server listening address.
    #[clap(long, short, default_value = "127.0.0.1")]
    address: String,
    /// The server listening port.
    #[clap(long, short, default_value_t = 9871)]
    port: u16,
    /// Persist decks to this database file.
    #[clap(long, conflicts_with = "persist")]
    db: Option<PathBuf>,
    /// Persist decks to the default database file.
    #[clap(long)]
    persist: bool,
}

/// Returns the default database path, creating its directory if needed.
fn default_db_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "deckhand")
        .ok_or_else(|| anyhow!("Cannot find a home directory"))?;
    let data_dir = dirs.data_dir();
    std::fs::create_dir_all(data_dir)?;
    Ok(data_dir.join("decks.db"))
}

#[tokio::main]
async fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    let db = match (cli.db, cli.persist) {
        (Some(path), _) => Some(path),
        (None, true) => match default_db_path() {
            Ok(path) => Some(path),
            Err(e) => {
                error!("{e}");
                return;
            }
        },
        (None, false) => None,
    };

    let config = deckhand_server::Config {
        address: cli.address,
        port: cli.port,
        db,
    };

    if let Err(e) = server::run(config).await {
        error!("{e}");
    }
}
