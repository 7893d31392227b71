// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Deckhand server entry point.
use anyhow::{Result, anyhow};
use log::{error, info, warn};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tokio::{
    net::{TcpListener, TcpStream},
    signal,
    sync::{broadcast, mpsc},
    task,
    time::{self, Duration},
};

use deckhand_core::{
    connection,
    deck::{Card, DeckId},
    message::{ErrorKind, Message, WireCard},
    service::{self, DeckService},
    store::{InMemoryStore, Store},
};

use crate::db::Db;

/// Server config.
#[derive(Debug)]
pub struct Config {
    /// The server listening address.
    pub address: String,
    /// The server listening port.
    pub port: u16,
    /// The decks database path, decks are kept in memory if not set.
    pub db: Option<PathBuf>,
}

/// The server that handles client connections.
#[derive(Debug)]
struct Server {
    /// The deck service shared by all connections.
    service: Arc<DeckService>,
    /// The server listener.
    listener: TcpListener,
    /// Shutdown notification channel.
    shutdown_broadcast_tx: broadcast::Sender<()>,
    /// Shutdown sender cloned by each connection.
    shutdown_complete_tx: mpsc::Sender<()>,
}

/// Client connection handler.
struct Handler {
    /// The deck service shared by all connections.
    service: Arc<DeckService>,
    /// Channel for listening shutdown notification.
    shutdown_broadcast_rx: broadcast::Receiver<()>,
    /// Sender that drops when this connection is done.
    _shutdown_complete_tx: mpsc::Sender<()>,
}

/// Server entry point.
pub async fn run(config: Config) -> Result<()> {
    let store: Arc<dyn Store> = match &config.db {
        Some(path) => {
            info!("Using decks database {}", path.display());
            Arc::new(Db::open(path)?)
        }
        None => {
            info!("Using in memory decks store");
            Arc::new(InMemoryStore::new())
        }
    };

    let addr = format!("{}:{}", config.address, config.port);
    info!("Starting server listening on {}", addr);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow!("Tcp listener bind error: {e}"))?;

    let shutdown_signal = signal::ctrl_c();
    let (shutdown_complete_tx, mut shutdown_complete_rx) = mpsc::channel(1);

    let mut server = Server::new(
        Arc::new(DeckService::new(store)),
        listener,
        shutdown_complete_tx,
    );

    tokio::select! {
        res = server.run() => {
            res.map_err(|e| anyhow!("Tcp listener accept error: {e}"))?;
        }
        _ = shutdown_signal => {
            info!("Received shutdown signal...");
        }
    }

    // Wait for all connection to shutdown.
    let Server {
        shutdown_broadcast_tx,
        shutdown_complete_tx,
        ..
    } = server;

    // Notify all connections to start shutdown then wait for all connections to
    // terminate and drop their shutdown channel.
    drop(shutdown_broadcast_tx);
    drop(shutdown_complete_tx);
    let _ = shutdown_complete_rx.recv().await;

    Ok(())
}

impl Server {
    fn new(
        service: Arc<DeckService>,
        listener: TcpListener,
        shutdown_complete_tx: mpsc::Sender<()>,
    ) -> Self {
        let (shutdown_broadcast_tx, _) = broadcast::channel(1);
        Self {
            service,
            listener,
            shutdown_broadcast_tx,
            shutdown_complete_tx,
        }
    }

    /// Runs the server.
    async fn run(&mut self) -> Result<()> {
        loop {
            let (socket, addr) = self.accept_with_retry().await?;
            info!("Accepted connection from {addr}");

            let mut handler = Handler {
                service: self.service.clone(),
                shutdown_broadcast_rx: self.shutdown_broadcast_tx.subscribe(),
                _shutdown_complete_tx: self.shutdown_complete_tx.clone(),
            };

            // Spawn a task to handle connection messages.
            tokio::spawn(async move {
                if let Err(err) = handler.run(socket, addr).await {
                    error!("Connection to {addr} {err}");
                }

                info!("Connection to {addr} closed");
            });
        }
    }

    /// Accepts a connection with retries.
    async fn accept_with_retry(&self) -> Result<(TcpStream, SocketAddr)> {
        let mut retry = 0;
        loop {
            match self.listener.accept().await {
                Ok((socket, addr)) => {
                    return Ok((socket, addr));
                }
                Err(err) => {
                    if retry == 5 {
                        return Err(err.into());
                    }
                }
            }

            time::sleep(Duration::from_secs(1 << retry)).await;
            retry += 1;
        }
    }
}

impl Handler {
    /// Handle connection messages.
    async fn run(&mut self, socket: TcpStream, addr: SocketAddr) -> Result<()> {
        let mut conn = connection::accept_async(socket).await?;

        let res = loop {
            tokio::select! {
                _ = self.shutdown_broadcast_rx.recv() => {
                    break Ok(());
                }
                res = conn.recv() => match res {
                    Some(Ok(msg)) => {
                        let resp = self.handle_message(addr, msg).await;
                        if let Err(err) = conn.send(&resp).await {
                            break Err(err);
                        }
                    },
                    Some(Err(err)) if is_invalid_message(&err) => {
                        warn!("{addr} invalid message {err}");
                        let resp = Message::Error {
                            kind: ErrorKind::InvalidRequest,
                            message: format!("Invalid message: {err}"),
                        };
                        if let Err(err) = conn.send(&resp).await {
                            break Err(err);
                        }
                    },
                    Some(Err(err)) => break Err(err),
                    None => break Ok(()),
                },
            }
        };

        conn.close().await;

        res
    }

    /// Runs a request on a blocking thread as the store may block on I/O.
    async fn handle_message(&self, addr: SocketAddr, msg: Message) -> Message {
        let service = self.service.clone();
        task::spawn_blocking(move || dispatch(&service, addr, msg))
            .await
            .unwrap_or_else(|e| Message::Error {
                kind: ErrorKind::Unavailable,
                message: format!("Request failed: {e}"),
            })
    }
}

/// Checks if a receive error comes from a frame that isn't a valid message.
fn is_invalid_message(err: &anyhow::Error) -> bool {
    err.downcast_ref::<bincode::Error>().is_some()
}

/// Calls the service operation for a request message.
fn dispatch(service: &DeckService, addr: SocketAddr, msg: Message) -> Message {
    let label = msg.label();
    let res = match msg {
        Message::CreateDeck(opts) => {
            let builder = match opts.builder() {
                Ok(builder) => builder,
                Err(err) => {
                    warn!("{addr} {label} {err}");
                    return Message::from(err);
                }
            };

            service.create_deck(builder).map(|id| {
                info!("{addr} {label} {opts:?} created deck {id}");
                Message::DeckCreated {
                    deck_id: id.into(),
                }
            })
        }
        Message::DrawCard { deck_id } => {
            let id = DeckId::from(deck_id);
            service.draw_card(&id).map(|card| {
                info!("{addr} {label} deck {id} card {card}");
                Message::CardDrawn(WireCard::from(card))
            })
        }
        Message::ReturnCard { deck_id, card } => {
            let id = DeckId::from(deck_id);
            let card = Card::from(card);
            service.return_card(&id, card).map(|_| {
                info!("{addr} {label} deck {id} card {card}");
                Message::CardReturned
            })
        }
        Message::DeckSize { deck_id } => {
            let id = DeckId::from(deck_id);
            service.deck_size(&id).map(|size| {
                info!("{addr} {label} deck {id} size {size}");
                Message::DeckSized {
                    deck_id: id.into(),
                    size: u32::try_from(size).unwrap_or(u32::MAX),
                }
            })
        }
        msg => {
            warn!("{addr} invalid request {}", msg.label());
            return Message::Error {
                kind: ErrorKind::InvalidRequest,
                message: format!("Invalid request {}", msg.label()),
            };
        }
    };

    res.unwrap_or_else(|err| {
        match &err {
            service::Error::StoreUnavailable(_) => error!("{addr} {label} {err}"),
            _ => warn!("{addr} {label} {err}"),
        }
        Message::from(err)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckhand_core::{
        connection::Connection,
        deck::{Deck, Suit},
        message::DeckOptions,
    };
    use futures_util::{SinkExt, StreamExt};
    use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, tungstenite::Message as WsMessage};

    struct TestServer {
        addr: String,
        _shutdown_complete_rx: mpsc::Receiver<()>,
    }

    impl TestServer {
        async fn start() -> Self {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap().to_string();

            let (shutdown_complete_tx, shutdown_complete_rx) = mpsc::channel(1);
            let service = Arc::new(DeckService::new(Arc::new(InMemoryStore::new())));
            let mut server = Server::new(service, listener, shutdown_complete_tx);

            tokio::spawn(async move {
                let _ = server.run().await;
            });

            Self {
                addr,
                _shutdown_complete_rx: shutdown_complete_rx,
            }
        }

        async fn connect(&self) -> Connection {
            connection::connect_async(&self.addr).await.unwrap()
        }
    }

    async fn create_deck(conn: &mut Connection, opts: DeckOptions) -> String {
        match conn.request(&Message::CreateDeck(opts)).await.unwrap() {
            Message::DeckCreated { deck_id } => deck_id,
            msg => panic!("Unexpected message {msg:?}"),
        }
    }

    #[tokio::test]
    async fn draw_all_cards() {
        let server = TestServer::start().await;
        let mut conn = server.connect().await;

        let deck_id = create_deck(&mut conn, DeckOptions::default()).await;

        let mut expected = Deck::default();
        while let Some(card) = expected.draw() {
            let msg = conn
                .request(&Message::DrawCard {
                    deck_id: deck_id.clone(),
                })
                .await
                .unwrap();
            assert_eq!(msg, Message::CardDrawn(WireCard::from(card)));
        }

        let msg = conn
            .request(&Message::DrawCard {
                deck_id: deck_id.clone(),
            })
            .await
            .unwrap();
        assert!(matches!(
            msg,
            Message::Error {
                kind: ErrorKind::EmptyDeck,
                ..
            }
        ));

        conn.close().await;
    }

    #[tokio::test]
    async fn return_card() {
        let server = TestServer::start().await;
        let mut conn = server.connect().await;

        let deck_id = create_deck(
            &mut conn,
            DeckOptions {
                joker_count: 1,
                shuffle: true,
                ..Default::default()
            },
        )
        .await;

        let card = WireCard::from(Card::new(Card::QUEEN, Suit::Spades));
        let msg = conn
            .request(&Message::ReturnCard {
                deck_id: deck_id.clone(),
                card,
            })
            .await
            .unwrap();
        assert_eq!(msg, Message::CardReturned);

        let msg = conn
            .request(&Message::DeckSize {
                deck_id: deck_id.clone(),
            })
            .await
            .unwrap();
        assert_eq!(msg, Message::DeckSized { deck_id, size: 54 });

        conn.close().await;
    }

    #[tokio::test]
    async fn invalid_requests() {
        let server = TestServer::start().await;
        let mut conn = server.connect().await;

        let msg = conn
            .request(&Message::DrawCard {
                deck_id: "missing".to_string(),
            })
            .await
            .unwrap();
        assert!(matches!(
            msg,
            Message::Error {
                kind: ErrorKind::NotFound,
                ..
            }
        ));

        let msg = conn.request(&Message::CardReturned).await.unwrap();
        assert!(matches!(
            msg,
            Message::Error {
                kind: ErrorKind::InvalidRequest,
                ..
            }
        ));

        conn.close().await;
    }

    #[tokio::test]
    async fn too_many_cards() {
        let server = TestServer::start().await;
        let mut conn = server.connect().await;

        let msg = conn
            .request(&Message::CreateDeck(DeckOptions {
                joker_count: i32::MAX,
                additional_deck_count: 1,
                ..Default::default()
            }))
            .await
            .unwrap();
        assert!(matches!(
            msg,
            Message::Error {
                kind: ErrorKind::InvalidRequest,
                ..
            }
        ));

        let deck_id = create_deck(
            &mut conn,
            DeckOptions {
                additional_deck_count: DeckOptions::MAX_ADDITIONAL_DECKS,
                ..Default::default()
            },
        )
        .await;

        let msg = conn
            .request(&Message::DeckSize {
                deck_id: deck_id.clone(),
            })
            .await
            .unwrap();
        assert_eq!(
            msg,
            Message::DeckSized {
                deck_id,
                size: 65 * 52
            }
        );

        conn.close().await;
    }

    /// Sends a raw frame and waits for the response message.
    async fn send_frame(
        stream: &mut WebSocketStream<MaybeTlsStream<TcpStream>>,
        payload: Vec<u8>,
    ) -> Message {
        stream.send(WsMessage::binary(payload)).await.unwrap();
        loop {
            if let WsMessage::Binary(payload) = stream.next().await.unwrap().unwrap() {
                break Message::deserialize(&payload).unwrap();
            }
        }
    }

    #[tokio::test]
    async fn invalid_message_keeps_connection() {
        let server = TestServer::start().await;
        let url = format!("ws://{}", server.addr);
        let (mut stream, _) = tokio_tungstenite::connect_async(&url).await.unwrap();

        let msg = send_frame(&mut stream, vec![0xff, 0xff, 0xff]).await;
        assert!(matches!(
            msg,
            Message::Error {
                kind: ErrorKind::InvalidRequest,
                ..
            }
        ));

        let draw = Message::DrawCard {
            deck_id: "missing".to_string(),
        };
        let msg = send_frame(&mut stream, draw.serialize()).await;
        assert!(matches!(
            msg,
            Message::Error {
                kind: ErrorKind::NotFound,
                ..
            }
        ));

        let _ = stream.close(None).await;
    }
}
