//! Error types for clicker-core
//!
//! Every engine failure is recoverable and local: handlers turn an `Error`
//! into a `success: false` reply and a player notification.

use crate::catalog::Rarity;
use crate::{ItemId, PlayerId};
use thiserror::Error;

/// Coarse classification of engine failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A player, item or catalog entry is absent
    NotFound,
    /// The request conflicts with current state
    InvalidState,
    /// The team ledger cannot cover the price
    InsufficientFunds,
    /// A deadline has already passed
    Expired,
}

/// Core error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Player not found: {0}")]
    PlayerNotFound(PlayerId),

    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    #[error("Unknown catalog entry: {0}")]
    UnknownDefinition(String),

    #[error("Item is already {0} and cannot be improved further")]
    MaxRarityReached(Rarity),

    #[error("Cannot fuse an item with itself")]
    SameSlot,

    #[error("Items cannot be fused: {0}")]
    Incompatible(String),

    #[error("Inventory is full ({capacity} items)")]
    InventoryFull { capacity: usize },

    #[error("Not enough coins: requires {required}, team has {current}")]
    InsufficientFunds { required: u64, current: u64 },

    #[error("Not enough fragments: requires {required}, team has {current}")]
    InsufficientFragments { required: u64, current: u64 },

    #[error("Upgrade {0} is already at its maximum level")]
    MaxLevel(String),

    #[error("Requires level {required}, player is level {current}")]
    LevelTooLow { required: u32, current: u32 },

    #[error("Invalid operation: {0}")]
    InvalidState(String),

    #[error("Boss encounter has expired")]
    Expired,
}

impl Error {
    /// Map this error onto the coarse taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::PlayerNotFound(_) | Error::ItemNotFound(_) | Error::UnknownDefinition(_) => {
                ErrorKind::NotFound
            }
            Error::InsufficientFunds { .. } | Error::InsufficientFragments { .. } => {
                ErrorKind::InsufficientFunds
            }
            Error::Expired => ErrorKind::Expired,
            Error::MaxRarityReached(_)
            | Error::SameSlot
            | Error::Incompatible(_)
            | Error::InventoryFull { .. }
            | Error::MaxLevel(_)
            | Error::LevelTooLow { .. }
            | Error::InvalidState(_) => ErrorKind::InvalidState,
        }
    }

    /// Shorthand for an `InvalidState` error
    pub fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidState(msg.into())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(Error::ItemNotFound(ItemId(1)).kind(), ErrorKind::NotFound);
        assert_eq!(Error::SameSlot.kind(), ErrorKind::InvalidState);
        assert_eq!(
            Error::InsufficientFunds {
                required: 10,
                current: 5
            }
            .kind(),
            ErrorKind::InsufficientFunds
        );
        assert_eq!(Error::Expired.kind(), ErrorKind::Expired);
    }

    #[test]
    fn test_messages() {
        let err = Error::InsufficientFunds {
            required: 400,
            current: 100,
        };
        assert_eq!(
            err.to_string(),
            "Not enough coins: requires 400, team has 100"
        );
        assert_eq!(
            Error::MaxRarityReached(Rarity::Legendary).to_string(),
            "Item is already legendary and cannot be improved further"
        );
    }
}
