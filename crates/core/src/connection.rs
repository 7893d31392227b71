// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! WebSocket connection types.
use anyhow::{Result, anyhow};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    self as websocket, MaybeTlsStream, WebSocketStream,
    tungstenite::{Message as WsMessage, protocol::WebSocketConfig},
};

use crate::message::Message;

/// Maximum message length.
const MAX_MSG_LEN: usize = 16384;

/// A WebSocket connection that exchanges [Message]s.
pub struct Connection {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl Connection {
    /// Sends a [Message].
    pub async fn send(&mut self, msg: &Message) -> Result<()> {
        self.stream.send(WsMessage::binary(msg.serialize())).await?;
        Ok(())
    }

    /// Waits for a [Message].
    ///
    /// Returns `None` when the connection has been closed.
    pub async fn recv(&mut self) -> Option<Result<Message>> {
        loop {
            match self.stream.next().await {
                Some(Ok(WsMessage::Binary(payload))) => {
                    break Some(Message::deserialize(&payload));
                }
                Some(Ok(WsMessage::Close(_))) => break None,
                Some(Ok(_)) => continue,
                Some(Err(e)) => break Some(Err(anyhow!("Connection error: {e}"))),
                None => break None,
            }
        }
    }

    /// Sends a request and waits for the response.
    pub async fn request(&mut self, msg: &Message) -> Result<Message> {
        self.send(msg).await?;
        match self.recv().await {
            Some(res) => res,
            None => Err(anyhow!("Connection closed")),
        }
    }

    /// Closes this connection.
    pub async fn close(&mut self) {
        let _ = self.stream.close(None).await;
    }
}

/// Creates a [Connection] from a server stream.
pub async fn accept_async(stream: TcpStream) -> Result<Connection> {
    let config = WebSocketConfig::default().max_message_size(Some(MAX_MSG_LEN));
    let stream =
        websocket::accept_async_with_config(MaybeTlsStream::Plain(stream), Some(config)).await?;
    Ok(Connection { stream })
}

/// Connects to a server and returns a [Connection] if successful.
pub async fn connect_async(addr: &str) -> Result<Connection> {
    let config = WebSocketConfig::default().max_message_size(Some(MAX_MSG_LEN));

    let url = format!("ws://{}", addr);
    let (stream, _) = websocket::connect_async_with_config(&url, Some(config), false).await?;
    Ok(Connection { stream })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{DeckOptions, WireCard};
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn websocket_connection() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        let (tx, rx) = tokio::sync::oneshot::channel();

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut con = accept_async(stream).await.unwrap();

            let msg = con.recv().await.unwrap().unwrap();
            assert!(matches!(msg, Message::CreateDeck(opts) if opts.joker_count == 2));
            con.send(&Message::DeckCreated {
                deck_id: "d1".to_string(),
            })
            .await
            .unwrap();

            let msg = con.recv().await.unwrap().unwrap();
            assert!(matches!(msg, Message::DrawCard { deck_id } if deck_id == "d1"));
            con.send(&Message::CardDrawn(WireCard { suit: 5, value: 1 }))
                .await
                .unwrap();

            tx.send(()).unwrap();
        });

        let mut con = connect_async(&addr).await.unwrap();
        let msg = con
            .request(&Message::CreateDeck(DeckOptions {
                joker_count: 2,
                ..Default::default()
            }))
            .await
            .unwrap();
        assert!(matches!(msg, Message::DeckCreated { deck_id } if deck_id == "d1"));

        let msg = con
            .request(&Message::DrawCard {
                deck_id: "d1".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(msg, Message::CardDrawn(WireCard { suit: 5, value: 1 }));

        rx.await.unwrap();
        con.close().await;
    }
}
