//! Single-writer engine actor
//!
//! The engine lives on one task and drains a FIFO queue of requests, each
//! run to completion before the next is taken. That queue is the only path
//! to the team state, so a forge's affordability check and its debit can
//! never interleave with another player's request.

use crate::persistence::{Saver, Snapshot};
use clicker_core::{Action, Cmd, Engine, LogLevel, Millis, PlayerId, TeamState};
use clicker_sync::{Broadcaster, Connection, Outbox};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

/// Outbound half of one client's socket
#[derive(Debug, Clone)]
pub struct WsConnection {
    tx: mpsc::UnboundedSender<String>,
}

impl WsConnection {
    pub fn new(tx: mpsc::UnboundedSender<String>) -> Self {
        Self { tx }
    }
}

impl Connection for WsConnection {
    type Error = mpsc::error::SendError<String>;

    fn send_text(&self, text: &str) -> Result<(), Self::Error> {
        self.tx.send(text.to_string())
    }

    fn is_connected(&self) -> bool {
        !self.tx.is_closed()
    }
}

/// Work for the actor; `now` is stamped by the sender on arrival
#[derive(Debug)]
pub enum Request {
    Connect {
        player: PlayerId,
        connection: WsConnection,
    },
    Action {
        player: PlayerId,
        action: Action,
        now: Millis,
    },
    Disconnect {
        player: PlayerId,
        now: Millis,
    },
    Tick {
        now: Millis,
    },
    Snapshot,
    /// Stop after handing back a final snapshot
    Shutdown {
        reply: oneshot::Sender<Snapshot>,
    },
}

/// Cloneable handle for submitting requests
#[derive(Debug, Clone)]
pub struct ActorHandle {
    tx: mpsc::UnboundedSender<Request>,
}

impl ActorHandle {
    /// Queue a request; false once the actor has stopped
    pub fn send(&self, request: Request) -> bool {
        self.tx.send(request).is_ok()
    }

    /// Stop the actor once everything queued before this call is handled
    pub async fn shutdown(&self) -> Option<Snapshot> {
        let (reply, rx) = oneshot::channel();
        if !self.send(Request::Shutdown { reply }) {
            return None;
        }
        rx.await.ok()
    }
}

pub struct EngineActor {
    engine: Engine,
    broadcaster: Broadcaster<WsConnection>,
    saver: Option<Saver>,
}

impl EngineActor {
    pub fn new(engine: Engine, saver: Option<Saver>) -> Self {
        Self {
            engine,
            broadcaster: Broadcaster::new(),
            saver,
        }
    }

    /// Move the actor onto its own task
    pub fn spawn(self) -> (ActorHandle, tokio::task::JoinHandle<TeamState>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(self.run(rx));
        (ActorHandle { tx }, task)
    }

    /// Drain requests until every handle is dropped, then hand back the team
    pub async fn run(mut self, mut rx: mpsc::UnboundedReceiver<Request>) -> TeamState {
        while let Some(request) = rx.recv().await {
            let stop = matches!(request, Request::Shutdown { .. });
            self.handle(request);
            if stop {
                break;
            }
        }
        info!("engine actor stopped");
        self.engine.team().clone()
    }

    fn handle(&mut self, request: Request) {
        match request {
            Request::Connect { player, connection } => {
                debug!(%player, "connection registered");
                self.broadcaster.register(player, connection);
            }
            Request::Action {
                player,
                action,
                now,
            } => {
                if !action.is_high_frequency() {
                    debug!(%player, action = action.name(), "action");
                }
                let result = self.engine.handle(player, action, now);
                self.execute(result.cmd);
            }
            Request::Disconnect { player, now } => {
                self.broadcaster.unregister(player);
                if self.engine.team().players.contains_key(&player) {
                    let result = self.engine.handle(player, Action::RemovePlayer, now);
                    self.execute(result.cmd);
                }
            }
            Request::Tick { now } => {
                let result = self.engine.tick(now);
                self.execute(result.cmd);
            }
            Request::Snapshot => self.persist(),
            Request::Shutdown { reply } => {
                let _ = reply.send(Snapshot::capture(&self.engine));
            }
        }
    }

    fn execute(&mut self, cmd: Cmd) {
        if cmd.is_none() {
            return;
        }
        let outbox = Outbox::from_cmd(cmd, self.engine.team());
        for (level, message) in &outbox.logs {
            match level {
                LogLevel::Debug => debug!("{}", message),
                LogLevel::Info => info!("{}", message),
                LogLevel::Warn => warn!("{}", message),
                LogLevel::Error => error!("{}", message),
            }
        }

        match self.broadcaster.deliver_all(&outbox.messages) {
            Ok(report) if !report.failed.is_empty() => {
                debug!(sent = report.sent, failed = ?report.failed, "some frames dropped");
            }
            Ok(_) => {}
            Err(e) => error!("failed to encode outgoing message: {}", e),
        }
        for player in self.broadcaster.prune() {
            debug!(%player, "pruned closed connection");
        }

        if outbox.persist {
            self.persist();
        }
    }

    /// Hand a snapshot to the saver; the engine never waits on disk
    fn persist(&self) {
        let Some(saver) = &self.saver else {
            return;
        };
        if !saver.submit(Snapshot::capture(&self.engine)) {
            warn!("snapshot writer has stopped");
        }
    }
}
