//! Commands (side effects) produced by the engine
//!
//! The engine never performs I/O. Each update returns a `Cmd` tree that the
//! host walks: sending replies, broadcasting events and state, logging and
//! scheduling snapshots.

use crate::event::{Event, Reply};
use crate::PlayerId;
use serde::{Deserialize, Serialize};

/// Which state payload to broadcast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncKind {
    /// Replace every client's cached state
    Full,
    /// Patch only the fast-moving fields
    Delta,
}

/// A command to be executed by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cmd {
    /// No operation
    None,

    /// Batch multiple commands
    Batch(Vec<Cmd>),

    /// Send a reply to one player
    Reply { to: PlayerId, reply: Reply },

    /// Send an event to every connected client
    Broadcast(Event),

    /// Broadcast the team state
    Sync(SyncKind),

    /// Queue a notification; `None` targets everyone
    Notify {
        target: Option<PlayerId>,
        message: String,
    },

    /// Log a message on the host
    Log { level: LogLevel, message: String },

    /// Request a best-effort snapshot of the team state
    Persist,
}

/// Log level for log commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl Cmd {
    /// Create an empty command
    pub fn none() -> Self {
        Cmd::None
    }

    /// Create a batch of commands, flattening nested batches
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        let mut flattened: Vec<Cmd> = cmds
            .into_iter()
            .flat_map(|cmd| match cmd {
                Cmd::None => vec![],
                Cmd::Batch(inner) => inner,
                other => vec![other],
            })
            .collect();

        match flattened.len() {
            0 => Cmd::None,
            1 => flattened.remove(0),
            _ => Cmd::Batch(flattened),
        }
    }

    pub fn reply(to: PlayerId, reply: Reply) -> Self {
        Cmd::Reply { to, reply }
    }

    pub fn broadcast(event: Event) -> Self {
        Cmd::Broadcast(event)
    }

    pub fn full_sync() -> Self {
        Cmd::Sync(SyncKind::Full)
    }

    pub fn delta_sync() -> Self {
        Cmd::Sync(SyncKind::Delta)
    }

    /// Notify a single player
    pub fn notify(target: PlayerId, message: impl Into<String>) -> Self {
        Cmd::Notify {
            target: Some(target),
            message: message.into(),
        }
    }

    /// Notify every connected player
    pub fn notify_all(message: impl Into<String>) -> Self {
        Cmd::Notify {
            target: None,
            message: message.into(),
        }
    }

    /// Create a log command
    pub fn log(level: LogLevel, message: impl Into<String>) -> Self {
        Cmd::Log {
            level,
            message: message.into(),
        }
    }

    pub fn debug(message: impl Into<String>) -> Self {
        Self::log(LogLevel::Debug, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::log(LogLevel::Info, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::log(LogLevel::Warn, message)
    }

    /// Check if this is a None command
    pub fn is_none(&self) -> bool {
        matches!(self, Cmd::None)
    }

    /// Walk every leaf command in order
    pub fn iter(&self) -> Box<dyn Iterator<Item = &Cmd> + '_> {
        match self {
            Cmd::None => Box::new(std::iter::empty()),
            Cmd::Batch(cmds) => Box::new(cmds.iter().flat_map(|c| c.iter())),
            other => Box::new(std::iter::once(other)),
        }
    }

    /// Consume into leaf commands in order
    pub fn into_leaves(self) -> Vec<Cmd> {
        match self {
            Cmd::None => Vec::new(),
            Cmd::Batch(cmds) => cmds.into_iter().flat_map(Cmd::into_leaves).collect(),
            other => vec![other],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cmd_batch() {
        let cmd = Cmd::batch(vec![Cmd::None, Cmd::debug("hello"), Cmd::None]);
        assert!(matches!(cmd, Cmd::Log { .. }));
    }

    #[test]
    fn test_cmd_batch_nested() {
        let cmd = Cmd::batch(vec![
            Cmd::batch(vec![Cmd::debug("a"), Cmd::debug("b")]),
            Cmd::debug("c"),
        ]);

        if let Cmd::Batch(cmds) = cmd {
            assert_eq!(cmds.len(), 3);
        } else {
            panic!("Expected Batch");
        }
    }

    #[test]
    fn test_leaves_keep_order() {
        let cmd = Cmd::Batch(vec![
            Cmd::full_sync(),
            Cmd::Batch(vec![Cmd::Persist, Cmd::None]),
            Cmd::notify_all("x"),
        ]);
        assert_eq!(cmd.iter().count(), 3);
        let leaves = cmd.into_leaves();
        assert_eq!(leaves[0], Cmd::full_sync());
        assert_eq!(leaves[1], Cmd::Persist);
        assert!(matches!(leaves[2], Cmd::Notify { target: None, .. }));
    }
}
