//! Clicker Core - the shared cooperative economy engine
//!
//! This crate holds the authoritative game model and the only code allowed
//! to mutate it:
//! - Static catalog tables (`catalog`)
//! - Player records, inventories and equipment slots
//! - The shared `TeamState` aggregate and its coin ledger
//! - Forge, fusion, boss, garden, power-up, prestige and achievement rules
//! - The `Engine`, which turns player `Action`s into state changes and `Cmd`s
//!
//! Everything here is synchronous and free of I/O. Time is passed in as
//! milliseconds and randomness comes through the [`Dice`] trait, so a test
//! can replay any forge or loot outcome exactly.

mod achievements;
mod action;
mod boss;
pub mod catalog;
mod cmd;
mod config;
pub mod economy;
mod engine;
mod error;
mod event;
mod forge;
mod fusion;
mod garden;
mod identity;
mod player;
mod powerups;
mod prestige;
mod rng;
mod team;
pub mod time;

pub use achievements::Achievements;
pub use action::Action;
pub use boss::{ActiveBoss, BossEncounter, BossPhase, DamageReport, DamageSource, ResolvedBoss};
pub use cmd::{Cmd, LogLevel, SyncKind};
pub use config::EngineConfig;
pub use engine::{Engine, UpdateResult, AUTO_CLICK_NAME};
pub use error::{Error, ErrorKind, Result};
pub use event::{BossResult, EquipmentDrop, Event, ForgeReply, MergeReply, Reply};
pub use forge::{attempt_forge, forge_cost, ForgeOutcome, MIN_FORGE_COST};
pub use fusion::{fuse, fuse_at};
pub use garden::{Garden, Planting, Plot, BASE_PLOTS, MAX_PLOTS};
pub use identity::{ItemId, PlayerId};
pub use player::{EquipmentInstance, EquipmentSlots, Inventory, Player, INVENTORY_CAPACITY};
pub use powerups::{PowerUpState, PowerUps};
pub use prestige::{fragments_for, prestige, PrestigeOutcome};
pub use rng::{Dice, FixedDice, GameRng};
pub use team::{Ledger, TeamState, TeamStats};
pub use time::{Millis, TimedBuff};
