//! Clicker Sync - keeping every client's view of the team in step
//!
//! This crate sits between the engine and the wire:
//!
//! - **Protocol**: JSON frames clients send (`Action`) and receive (`ServerMessage`)
//! - **Views**: full snapshots and deltas rendered from `TeamState`
//! - **Outbox**: engine `Cmd` trees flattened into addressed messages
//! - **Reconciliation**: merge-on-receive so derived fields never flash back
//! - **Client cache**: applies updates strictly in arrival order
//! - **Transport**: a `Connection` trait and a fan-out `Broadcaster`
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐  Action   ┌──────────┐  Cmd   ┌──────────┐  Outgoing  ┌─────────────┐
//! │  Client  │──────────▶│  Engine  │───────▶│  Outbox  │───────────▶│ Broadcaster │
//! └──────────┘           └──────────┘        └──────────┘            └─────────────┘
//!      ▲                                                                    │
//!      │          ServerMessage (full / delta / event / reply)              │
//!      └──────────────── ClientCache ◀── reconcile / apply_delta ◀──────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use clicker_sync::{ClientCache, Outbox};
//!
//! // server side, after each engine update
//! let result = engine.handle(player, action, now);
//! let outbox = Outbox::from_cmd(result.cmd, engine.team());
//! broadcaster.deliver_all(&outbox.messages)?;
//!
//! // client side, for each frame
//! cache.apply_text(&frame)?;
//! render(cache.state());
//! ```

mod client;
mod delta;
mod error;
mod local;
mod outbox;
mod protocol;
mod reconcile;
mod transport;
mod view;

pub use client::ClientCache;
pub use delta::{apply_delta, PlayerProgress, StateDelta};
pub use error::{Error, Result};
pub use local::{LocalMirror, MemoryStorage, Storage, STORAGE_KEY};
pub use outbox::{Outbox, Outgoing, Recipient};
pub use protocol::{decode_action, encode_action, ServerMessage, StateUpdate, SyncMessage};
pub use reconcile::reconcile;
pub use transport::{Broadcaster, Connection, DeliveryReport};
pub use view::{BossView, GameStateView, PlayerView};
