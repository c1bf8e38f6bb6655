//! Player actions accepted by the engine

use crate::catalog::{CharacterClass, SeedType, SlotKind};
use crate::ItemId;
use serde::{Deserialize, Serialize};

/// One inbound player event
///
/// Serialized as `{ "event": "forgeItem", "data": { "itemId": 3 } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum Action {
    AddPlayer {
        name: String,
    },
    SelectCharacter {
        class: CharacterClass,
    },
    /// A manual click; `boss` marks clicks made on the boss overlay
    Click {
        #[serde(default)]
        boss: bool,
    },
    BuyUpgrade {
        id: String,
    },
    BuyPrestigeUpgrade {
        id: String,
    },
    #[serde(rename_all = "camelCase")]
    BuyGardenUpgrade {
        upgrade_id: String,
    },
    #[serde(rename_all = "camelCase")]
    ForgeItem {
        item_id: ItemId,
    },
    MergeItems {
        #[serde(rename = "itemId1")]
        item_id1: ItemId,
        #[serde(rename = "itemId2")]
        item_id2: ItemId,
    },
    #[serde(rename_all = "camelCase")]
    EquipItem {
        item_id: ItemId,
        slot: SlotKind,
    },
    #[serde(rename_all = "camelCase")]
    UnequipItem {
        item_id: ItemId,
        slot: SlotKind,
    },
    #[serde(rename_all = "camelCase")]
    DiscardItem {
        item_id: ItemId,
    },
    ActivatePowerUp {
        id: String,
    },
    SurrenderBoss,
    Prestige,
    #[serde(rename_all = "camelCase")]
    PlantSeed {
        slot_id: u32,
        seed_type: SeedType,
    },
    #[serde(rename_all = "camelCase")]
    HarvestPlant {
        slot_id: u32,
    },
    HarvestAllPlants,
    RemovePlayer,
}

impl Action {
    /// Wire name of the action
    pub fn name(&self) -> &'static str {
        match self {
            Action::AddPlayer { .. } => "addPlayer",
            Action::SelectCharacter { .. } => "selectCharacter",
            Action::Click { .. } => "click",
            Action::BuyUpgrade { .. } => "buyUpgrade",
            Action::BuyPrestigeUpgrade { .. } => "buyPrestigeUpgrade",
            Action::BuyGardenUpgrade { .. } => "buyGardenUpgrade",
            Action::ForgeItem { .. } => "forgeItem",
            Action::MergeItems { .. } => "mergeItems",
            Action::EquipItem { .. } => "equipItem",
            Action::UnequipItem { .. } => "unequipItem",
            Action::DiscardItem { .. } => "discardItem",
            Action::ActivatePowerUp { .. } => "activatePowerUp",
            Action::SurrenderBoss => "surrenderBoss",
            Action::Prestige => "prestige",
            Action::PlantSeed { .. } => "plantSeed",
            Action::HarvestPlant { .. } => "harvestPlant",
            Action::HarvestAllPlants => "harvestAllPlants",
            Action::RemovePlayer => "removePlayer",
        }
    }

    /// Check whether the action is a high-frequency one synced by delta
    pub fn is_high_frequency(&self) -> bool {
        matches!(self, Action::Click { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_match_serde_tags() {
        let actions = [
            Action::AddPlayer { name: "ana".into() },
            Action::Click { boss: false },
            Action::MergeItems {
                item_id1: ItemId(1),
                item_id2: ItemId(2),
            },
            Action::SurrenderBoss,
            Action::PlantSeed {
                slot_id: 0,
                seed_type: SeedType::Clover,
            },
        ];
        for action in actions {
            let text = ron::to_string(&action).unwrap();
            assert!(text.contains(action.name()), "{} missing in {}", action.name(), text);
            let back: Action = ron::from_str(&text).unwrap();
            assert_eq!(back, action);
        }
    }
}
