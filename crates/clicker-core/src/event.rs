//! Outbound facts produced by the engine
//!
//! `Event`s go to every connected client, `Reply`s only to the player whose
//! action produced them. Both serialize as `{ "event": ..., "data": ... }`.

use crate::catalog::Rarity;
use crate::forge::ForgeOutcome;
use crate::player::EquipmentInstance;
use crate::time::Millis;
use crate::{Error, ItemId, PlayerId};
use serde::{Deserialize, Serialize};

/// Broadcast to everyone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum Event {
    #[serde(rename_all = "camelCase")]
    BossSpawn {
        boss_id: String,
        name: String,
        level: u32,
        max_health: f64,
        deadline: Millis,
    },
    #[serde(rename_all = "camelCase")]
    BossUpdate {
        health: f64,
        max_health: f64,
        damage: f64,
        player_name: String,
    },
    BossResult(BossResult),
    #[serde(rename_all = "camelCase")]
    PowerUpActivated {
        id: String,
        name: String,
        expires_at: Millis,
    },
    AchievementUnlocked { id: String, name: String },
}

/// How an encounter ended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BossResult {
    #[serde(rename_all = "camelCase")]
    Victory {
        victory: bool,
        coins: u64,
        multiplier: f64,
        /// Fight length in seconds
        duration: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        equipment_drop: Option<EquipmentDrop>,
    },
    Defeat {
        victory: bool,
        surrendered: bool,
        penalty: u64,
    },
}

/// Loot from a victory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EquipmentDrop {
    Granted {
        recipient: PlayerId,
        item: EquipmentInstance,
    },
    /// The recipient had no room; the item no longer exists
    #[serde(rename_all = "camelCase")]
    Rejected {
        rejected: bool,
        reason: String,
        recipient: PlayerId,
        item_name: String,
    },
}

/// Sent to the acting player only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum Reply {
    #[serde(rename_all = "camelCase")]
    Joined { player_id: PlayerId },
    ForgeResult(ForgeReply),
    MergingResult(MergeReply),
    DiscardResult { success: bool, message: String },
    /// Outcome of any action without a dedicated reply
    ActionResult {
        action: String,
        success: bool,
        message: String,
    },
}

/// Wire shape of a forge attempt
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgeReply {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<ItemId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_rarity: Option<Rarity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_rarity: Option<Rarity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempted_rarity: Option<Rarity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_coins: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_coins: Option<u64>,
}

impl From<&ForgeOutcome> for ForgeReply {
    fn from(outcome: &ForgeOutcome) -> Self {
        Self {
            success: outcome.success,
            message: outcome.message.clone(),
            item_id: Some(outcome.item_id),
            old_rarity: Some(outcome.old_rarity),
            new_rarity: outcome.new_rarity(),
            attempted_rarity: (!outcome.success).then_some(outcome.attempted_rarity),
            cost: Some(outcome.cost),
            ..Default::default()
        }
    }
}

impl From<&Error> for ForgeReply {
    fn from(err: &Error) -> Self {
        let mut reply = Self {
            success: false,
            message: err.to_string(),
            ..Default::default()
        };
        match err {
            Error::InsufficientFunds { required, current } => {
                reply.requires_coins = Some(*required);
                reply.current_coins = Some(*current);
            }
            Error::MaxRarityReached(rarity) => reply.old_rarity = Some(*rarity),
            _ => {}
        }
        reply
    }
}

/// Wire shape of a fusion attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeReply {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_item: Option<EquipmentInstance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
