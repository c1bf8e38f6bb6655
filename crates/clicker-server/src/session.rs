//! One task pair per WebSocket client

use crate::actor::{ActorHandle, Request, WsConnection};
use crate::persistence::now_millis;
use clicker_core::PlayerId;
use clicker_sync::decode_action;
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, info, warn};

/// Hands out connection-scoped player ids; never reused within a process
#[derive(Debug)]
pub struct PlayerIds(AtomicU64);

impl PlayerIds {
    pub fn new() -> Self {
        Self(AtomicU64::new(1))
    }

    pub fn next(&self) -> PlayerId {
        PlayerId(self.0.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for PlayerIds {
    fn default() -> Self {
        Self::new()
    }
}

/// Serve one client until either side hangs up
pub async fn serve(stream: TcpStream, addr: SocketAddr, player: PlayerId, actor: ActorHandle) {
    let ws = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!(%addr, "WebSocket handshake failed: {}", e);
            return;
        }
    };
    info!(%addr, %player, "client connected");

    let (mut write, mut read) = ws.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    if !actor.send(Request::Connect {
        player,
        connection: WsConnection::new(tx),
    }) {
        return;
    }

    let writer = tokio::spawn(async move {
        while let Some(text) = rx.recv().await {
            if write.send(Message::text(text)).await.is_err() {
                break;
            }
        }
        let _ = write.close().await;
    });

    while let Some(frame) = read.next().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                debug!(%player, "read error: {}", e);
                break;
            }
        };
        match decode_action(text.as_str()) {
            Ok(action) => {
                let request = Request::Action {
                    player,
                    action,
                    now: now_millis(),
                };
                if !actor.send(request) {
                    break;
                }
            }
            Err(e) => debug!(%player, "ignoring malformed frame: {}", e),
        }
    }

    actor.send(Request::Disconnect {
        player,
        now: now_millis(),
    });
    writer.abort();
    info!(%addr, %player, "client disconnected");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_and_start_at_one() {
        let ids = PlayerIds::new();
        assert_eq!(ids.next(), PlayerId(1));
        assert_eq!(ids.next(), PlayerId(2));
    }
}
