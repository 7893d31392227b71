// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Deckhand CLI client.
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
use anyhow::{Result, bail};
use clap::{Parser, Subcommand};

use deckhand_core::{
    connection::{self, Connection},
    deck::Card,
    message::{DeckOptions, Message, WireCard},
};

#[derive(Debug, Parser)]
struct Cli {
    /// The server listening address.
    #[clap(long, short, default_value = "127.0.0.1")]
    address: String,
    /// The server listening port.
    #[clap(long, short, default_value_t = 9871)]
    port: u16,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a new deck and print its id.
    Create {
        /// Number of jokers for each standard deck.
        #[clap(long, default_value_t = 0)]
        jokers: i32,
        /// Number of standard decks to add.
        #[clap(long, default_value_t = 0)]
        decks: i32,
        /// Shuffle the deck.
        #[clap(long)]
        shuffle: bool,
        /// Cards to remove from the deck (for example AH, TD, JK).
        #[clap(long, num_args = 1..)]
        exclude: Vec<Card>,
    },
    /// Draw cards from the top of a deck.
    Draw {
        /// The deck id.
        deck_id: String,
        /// Number of cards to draw.
        #[clap(long, short, default_value_t = 1)]
        count: usize,
    },
    /// Return a card to the bottom of a deck.
    Return {
        /// The deck id.
        deck_id: String,
        /// The card to return (for example AH, TD, JK).
        card: Card,
    },
    /// Print the number of cards left in a deck.
    Size {
        /// The deck id.
        deck_id: String,
    },
}

/// Sends a request and fails if the server returned an error.
async fn request(conn: &mut Connection, msg: Message) -> Result<Message> {
    match conn.request(&msg).await? {
        Message::Error { kind, message } => bail!("{kind:?}: {message}"),
        msg => Ok(msg),
    }
}

async fn execute(conn: &mut Connection, command: Command) -> Result<()> {
    match command {
        Command::Create {
            jokers,
            decks,
            shuffle,
            exclude,
        } => {
            let opts = DeckOptions {
                joker_count: jokers,
                additional_deck_count: decks,
                shuffle,
                excluded: exclude.into_iter().map(WireCard::from).collect(),
            };

            match request(conn, Message::CreateDeck(opts)).await? {
                Message::DeckCreated { deck_id } => println!("{deck_id}"),
                msg => bail!("Unexpected response {}", msg.label()),
            }
        }
        Command::Draw { deck_id, count } => {
            for _ in 0..count {
                let msg = Message::DrawCard {
                    deck_id: deck_id.clone(),
                };

                match request(conn, msg).await? {
                    Message::CardDrawn(card) => println!("{}", Card::from(card)),
                    msg => bail!("Unexpected response {}", msg.label()),
                }
            }
        }
        Command::Return { deck_id, card } => {
            let msg = Message::ReturnCard {
                deck_id,
                card: WireCard::from(card),
            };

            match request(conn, msg).await? {
                Message::CardReturned => {}
                msg => bail!("Unexpected response {}", msg.label()),
            }
        }
        Command::Size { deck_id } => match request(conn, Message::DeckSize { deck_id }).await? {
            Message::DeckSized { size, .. } => println!("{size}"),
            msg => bail!("Unexpected response {}", msg.label()),
        },
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let addr = format!("{}:{}", cli.address, cli.port);
    let mut conn = connection::connect_async(&addr).await?;

    let res = execute(&mut conn, cli.command).await;
    conn.close().await;
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use deckhand_core::deck::Suit;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_create() {
        let cli = Cli::parse_from([
            "deckhand-cli",
            "create",
            "--jokers",
            "2",
            "--shuffle",
            "--exclude",
            "AH",
            "JK",
        ]);

        match cli.command {
            Command::Create {
                jokers,
                decks,
                shuffle,
                exclude,
            } => {
                assert_eq!(jokers, 2);
                assert_eq!(decks, 0);
                assert!(shuffle);
                assert_eq!(exclude, vec![Card::new(Card::ACE, Suit::Hearts), Card::joker()]);
            }
            cmd => panic!("Unexpected command {cmd:?}"),
        }
    }

    #[test]
    fn parse_return() {
        let cli = Cli::parse_from(["deckhand-cli", "-p", "9000", "return", "abc", "qs"]);
        assert_eq!(cli.port, 9000);
        assert!(matches!(
            cli.command,
            Command::Return { deck_id, card }
                if deck_id == "abc" && card == Card::new(Card::QUEEN, Suit::Spades)
        ));

        assert!(Cli::try_parse_from(["deckhand-cli", "return", "abc", "ZZ"]).is_err());
    }
}
