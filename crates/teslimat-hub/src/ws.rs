// SPDX-FileCopyrightText: 2026 Teslimat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Websocket implementation of the hub wire.
//!
//! Frames are JSON text envelopes `{"target": ..., "arguments": ...}` in
//! both directions. The bearer credential rides an `access_token` query
//! parameter on the handshake request.

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};

use teslimat_core::TeslimatError;

use crate::wire::{HubDuplex, HubEvent, HubInvoke, HubWire};

/// Hub wire over a websocket.
#[derive(Debug, Clone, Copy, Default)]
pub struct WsWire;

#[async_trait]
impl HubWire for WsWire {
    async fn open(&self, url: &str, token: &str) -> Result<Box<dyn HubDuplex>, TeslimatError> {
        if token.trim().is_empty() {
            // Fail closed: never attempt an anonymous handshake.
            return Err(TeslimatError::AuthenticationRejected);
        }

        let mut request_url = url::Url::parse(url).map_err(|e| TeslimatError::Hub {
            message: format!("invalid hub url `{url}`: {e}"),
            source: Some(Box::new(e)),
        })?;
        request_url
            .query_pairs_mut()
            .append_pair("access_token", token);

        match connect_async(request_url.as_str()).await {
            Ok((stream, _response)) => {
                debug!(url, "hub websocket connected");
                Ok(Box::new(WsDuplex { stream }))
            }
            Err(tungstenite::Error::Http(response))
                if response.status().as_u16() == 401 || response.status().as_u16() == 403 =>
            {
                Err(TeslimatError::AuthenticationRejected)
            }
            Err(e) => Err(TeslimatError::Hub {
                message: format!("handshake failed: {e}"),
                source: Some(Box::new(e)),
            }),
        }
    }
}

struct WsDuplex {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl HubDuplex for WsDuplex {
    async fn send(&mut self, invoke: HubInvoke) -> Result<(), TeslimatError> {
        let frame = serde_json::to_string(&invoke).map_err(|e| TeslimatError::Hub {
            message: format!("invoke serialization failed: {e}"),
            source: Some(Box::new(e)),
        })?;
        self.stream
            .send(Message::Text(frame.into()))
            .await
            .map_err(|e| TeslimatError::Hub {
                message: format!("websocket send failed: {e}"),
                source: Some(Box::new(e)),
            })
    }

    async fn next_event(&mut self) -> Option<HubEvent> {
        while let Some(message) = self.stream.next().await {
            match message {
                Ok(Message::Text(text)) => match serde_json::from_str::<HubEvent>(&text) {
                    Ok(event) => return Some(event),
                    Err(e) => {
                        warn!(error = %e, "discarding malformed hub frame");
                    }
                },
                Ok(Message::Close(_)) => return None,
                // Ping/pong handled by the tungstenite layer; binary ignored.
                Ok(_) => {}
                Err(e) => {
                    debug!(error = %e, "websocket read error, treating as closed");
                    return None;
                }
            }
        }
        None
    }

    async fn close(&mut self) {
        let _ = self.stream.close(None).await;
    }
}
