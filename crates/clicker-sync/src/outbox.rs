//! Turning engine commands into addressed server messages
//!
//! The engine returns a [`Cmd`] tree; the host flattens it here. Messages
//! keep the order of the tree, so a state sync appended last by the engine
//! reaches every client after the replies and events of the same update.

use crate::delta::StateDelta;
use crate::protocol::ServerMessage;
use crate::view::GameStateView;
use clicker_core::{Cmd, LogLevel, PlayerId, SyncKind, TeamState};

/// Who receives a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    All,
    One(PlayerId),
}

/// One message bound for the wire
#[derive(Debug, Clone, PartialEq)]
pub struct Outgoing {
    pub to: Recipient,
    pub message: ServerMessage,
}

impl Outgoing {
    pub fn all(message: ServerMessage) -> Self {
        Self {
            to: Recipient::All,
            message,
        }
    }

    pub fn one(player: PlayerId, message: ServerMessage) -> Self {
        Self {
            to: Recipient::One(player),
            message,
        }
    }
}

/// Everything one update asks the host to do
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outbox {
    /// Messages in delivery order
    pub messages: Vec<Outgoing>,
    /// Log lines for the host logger
    pub logs: Vec<(LogLevel, String)>,
    /// A snapshot was requested
    pub persist: bool,
}

impl Outbox {
    /// Flatten a command tree against the state it was produced from
    ///
    /// Sync commands are rendered from `team` at this point, so call this
    /// right after the engine update and before the next one.
    pub fn from_cmd(cmd: Cmd, team: &TeamState) -> Self {
        let mut outbox = Outbox::default();
        for leaf in cmd.into_leaves() {
            match leaf {
                Cmd::Reply { to, reply } => {
                    outbox
                        .messages
                        .push(Outgoing::one(to, ServerMessage::Reply(reply)));
                }
                Cmd::Broadcast(event) => {
                    outbox.messages.push(Outgoing::all(ServerMessage::Event(event)));
                }
                Cmd::Sync(SyncKind::Full) => {
                    let view = GameStateView::from_team(team);
                    outbox.messages.push(Outgoing::all(ServerMessage::full(view)));
                }
                Cmd::Sync(SyncKind::Delta) => {
                    let delta = StateDelta::from_team(team);
                    outbox.messages.push(Outgoing::all(ServerMessage::delta(delta)));
                }
                Cmd::Notify { target, message } => {
                    let message = ServerMessage::notification(message);
                    outbox.messages.push(match target {
                        Some(player) => Outgoing::one(player, message),
                        None => Outgoing::all(message),
                    });
                }
                Cmd::Log { level, message } => outbox.logs.push((level, message)),
                Cmd::Persist => outbox.persist = true,
                Cmd::None | Cmd::Batch(_) => {}
            }
        }
        outbox
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.logs.is_empty() && !self.persist
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{StateUpdate, SyncMessage};
    use clicker_core::{Event, Reply};

    #[test]
    fn test_addressing_follows_cmd_order() {
        let mut team = TeamState::new(100.0);
        team.add_player(PlayerId(1), "ana", 10).unwrap();

        let cmd = Cmd::batch(vec![
            Cmd::reply(
                PlayerId(1),
                Reply::DiscardResult {
                    success: false,
                    message: "Item not found".into(),
                },
            ),
            Cmd::notify(PlayerId(1), "Item not found"),
            Cmd::broadcast(Event::AchievementUnlocked {
                id: "first_click".into(),
                name: "First Click".into(),
            }),
            Cmd::debug("discard failed"),
            Cmd::full_sync(),
        ]);

        let outbox = Outbox::from_cmd(cmd, &team);
        assert_eq!(outbox.messages.len(), 4);
        assert_eq!(outbox.messages[0].to, Recipient::One(PlayerId(1)));
        assert_eq!(outbox.messages[1].to, Recipient::One(PlayerId(1)));
        assert_eq!(outbox.messages[2].to, Recipient::All);
        assert!(matches!(
            outbox.messages[3].message,
            ServerMessage::Sync(SyncMessage::GameStateUpdate(StateUpdate::Full(_)))
        ));
        assert_eq!(outbox.logs, vec![(LogLevel::Debug, "discard failed".to_string())]);
        assert!(!outbox.persist);
    }

    #[test]
    fn test_delta_and_persist() {
        let mut team = TeamState::new(100.0);
        team.earn(3.0);
        let outbox = Outbox::from_cmd(Cmd::batch(vec![Cmd::Persist, Cmd::delta_sync()]), &team);

        assert!(outbox.persist);
        match &outbox.messages[0].message {
            ServerMessage::Sync(SyncMessage::GameStateUpdate(StateUpdate::Delta(d))) => {
                assert_eq!(d.coins, 3.0)
            }
            other => panic!("expected delta, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_cmd() {
        let team = TeamState::new(100.0);
        assert!(Outbox::from_cmd(Cmd::None, &team).is_empty());
    }
}
