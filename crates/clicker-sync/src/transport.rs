//! Transport traits and fan-out
//!
//! [`Connection`] is implemented by the host for its socket type. The
//! [`Broadcaster`] serializes each message once and hands it to every
//! recipient in order. There is no retry: a failed send is counted and
//! dropped, and the peer catches up with the next full update.

use crate::outbox::{Outgoing, Recipient};
use crate::Result;
use clicker_core::PlayerId;
use indexmap::IndexMap;

/// Connection-oriented, ordered text transport (e.g. a WebSocket)
pub trait Connection: Send + Sync {
    /// Error type for this connection
    type Error: std::error::Error + Send + Sync + 'static;

    /// Queue a text frame; frames are delivered in call order
    fn send_text(&self, text: &str) -> std::result::Result<(), Self::Error>;

    /// Check if the connection is still alive
    fn is_connected(&self) -> bool;
}

/// Outcome of one delivery
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub sent: usize,
    /// Recipients whose send failed
    pub failed: Vec<PlayerId>,
}

/// Fan-out of server messages to connected players
pub struct Broadcaster<C: Connection> {
    connections: IndexMap<PlayerId, C>,
}

impl<C: Connection> Default for Broadcaster<C> {
    fn default() -> Self {
        Self {
            connections: IndexMap::new(),
        }
    }
}

impl<C: Connection> Broadcaster<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection, replacing any previous one for the player
    pub fn register(&mut self, player: PlayerId, connection: C) {
        self.connections.insert(player, connection);
    }

    pub fn unregister(&mut self, player: PlayerId) -> Option<C> {
        self.connections.shift_remove(&player)
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Deliver one message to its recipients
    pub fn deliver(&self, outgoing: &Outgoing) -> Result<DeliveryReport> {
        let text = outgoing.message.to_json()?;
        let mut report = DeliveryReport::default();
        match outgoing.to {
            Recipient::All => {
                for (&id, conn) in &self.connections {
                    send_one(&text, id, conn, &mut report);
                }
            }
            Recipient::One(id) => match self.connections.get(&id) {
                Some(conn) => send_one(&text, id, conn, &mut report),
                None => report.failed.push(id),
            },
        }
        Ok(report)
    }

    /// Deliver messages in order, merging the reports
    pub fn deliver_all<'a>(
        &self,
        outgoing: impl IntoIterator<Item = &'a Outgoing>,
    ) -> Result<DeliveryReport> {
        let mut total = DeliveryReport::default();
        for out in outgoing {
            let report = self.deliver(out)?;
            total.sent += report.sent;
            for id in report.failed {
                if !total.failed.contains(&id) {
                    total.failed.push(id);
                }
            }
        }
        Ok(total)
    }

    /// Drop every connection that reports itself closed
    pub fn prune(&mut self) -> Vec<PlayerId> {
        let closed: Vec<PlayerId> = self
            .connections
            .iter()
            .filter(|(_, c)| !c.is_connected())
            .map(|(id, _)| *id)
            .collect();
        for id in &closed {
            self.connections.shift_remove(id);
        }
        closed
    }
}

fn send_one<C: Connection>(text: &str, id: PlayerId, conn: &C, report: &mut DeliveryReport) {
    if conn.is_connected() && conn.send_text(text).is_ok() {
        report.sent += 1;
    } else {
        report.failed.push(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ServerMessage;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    #[derive(Debug, thiserror::Error)]
    #[error("closed")]
    struct Closed;

    #[derive(Default)]
    struct MemoryConnection {
        frames: Mutex<Vec<String>>,
        closed: AtomicBool,
    }

    impl Connection for MemoryConnection {
        type Error = Closed;

        fn send_text(&self, text: &str) -> std::result::Result<(), Closed> {
            if self.closed.load(Ordering::SeqCst) {
                return Err(Closed);
            }
            self.frames.lock().unwrap().push(text.to_string());
            Ok(())
        }

        fn is_connected(&self) -> bool {
            !self.closed.load(Ordering::SeqCst)
        }
    }

    fn note(to: Recipient, text: &str) -> Outgoing {
        Outgoing {
            to,
            message: ServerMessage::notification(text),
        }
    }

    #[test]
    fn test_broadcast_reaches_everyone_in_order() {
        let mut b = Broadcaster::new();
        b.register(PlayerId(1), MemoryConnection::default());
        b.register(PlayerId(2), MemoryConnection::default());

        let msgs = [note(Recipient::All, "a"), note(Recipient::One(PlayerId(2)), "b")];
        let report = b.deliver_all(&msgs).unwrap();
        assert_eq!(report.sent, 3);

        let two = b.unregister(PlayerId(2)).unwrap();
        let frames = two.frames.lock().unwrap();
        assert_eq!(frames.len(), 2);
        assert!(frames[0].contains("\"a\""));
        assert!(frames[1].contains("\"b\""));
    }

    #[test]
    fn test_failed_send_is_dropped_not_retried() {
        let mut b = Broadcaster::new();
        let gone = MemoryConnection::default();
        gone.closed.store(true, Ordering::SeqCst);
        b.register(PlayerId(1), gone);
        b.register(PlayerId(2), MemoryConnection::default());

        let report = b.deliver(&note(Recipient::All, "x")).unwrap();
        assert_eq!(report.sent, 1);
        assert_eq!(report.failed, vec![PlayerId(1)]);

        assert_eq!(b.prune(), vec![PlayerId(1)]);
        assert_eq!(b.len(), 1);
        let report = b.deliver(&note(Recipient::One(PlayerId(1)), "y")).unwrap();
        assert_eq!(report.failed, vec![PlayerId(1)]);
    }
}
