//! Client-side cache of the server state
//!
//! Updates are applied strictly in arrival order; nothing is reordered by
//! timestamp. Full updates go through [`reconcile`], deltas through
//! [`apply_delta`].

use crate::delta::apply_delta;
use crate::protocol::{ServerMessage, StateUpdate, SyncMessage};
use crate::reconcile::reconcile;
use crate::view::GameStateView;
use crate::{Error, Result};
use clicker_core::{Event, PlayerId, Reply};
use std::collections::VecDeque;

/// What a client knows about the game
#[derive(Debug, Clone, Default)]
pub struct ClientCache {
    state: Option<GameStateView>,
    player_id: Option<PlayerId>,
    notifications: VecDeque<String>,
    events: Vec<Event>,
    replies: Vec<Reply>,
}

impl ClientCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The reconciled state, once a full update has arrived
    pub fn state(&self) -> Option<&GameStateView> {
        self.state.as_ref()
    }

    /// This client's own player id, once joined
    pub fn player_id(&self) -> Option<PlayerId> {
        self.player_id
    }

    /// Decode and apply one server frame
    pub fn apply_text(&mut self, text: &str) -> Result<()> {
        let msg = ServerMessage::from_json(text)?;
        self.apply(msg)
    }

    /// Apply one server message
    ///
    /// A delta that arrives before any full state is rejected with
    /// `NoBaseState`; the next full update repairs the cache.
    pub fn apply(&mut self, msg: ServerMessage) -> Result<()> {
        match msg {
            ServerMessage::Sync(SyncMessage::GameStateUpdate(StateUpdate::Full(incoming))) => {
                let merged = match self.state.take() {
                    Some(local) => reconcile(&local, incoming),
                    None => incoming,
                };
                self.state = Some(merged);
            }
            ServerMessage::Sync(SyncMessage::GameStateUpdate(StateUpdate::Delta(delta))) => {
                let state = self.state.as_mut().ok_or(Error::NoBaseState)?;
                apply_delta(state, &delta);
            }
            ServerMessage::Sync(SyncMessage::Notification { message }) => {
                self.notifications.push_back(message);
            }
            ServerMessage::Event(event) => self.events.push(event),
            ServerMessage::Reply(reply) => {
                if let Reply::Joined { player_id } = reply {
                    self.player_id = Some(player_id);
                }
                self.replies.push(reply);
            }
        }
        Ok(())
    }

    /// Take the oldest queued notification
    pub fn next_notification(&mut self) -> Option<String> {
        self.notifications.pop_front()
    }

    /// Drain events received since the last call
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Drain replies received since the last call
    pub fn drain_replies(&mut self) -> Vec<Reply> {
        std::mem::take(&mut self.replies)
    }
}
