//! Static, read-only game tables
//!
//! Pure data plus pure derivation functions (price curves, stat multipliers).
//! Nothing in here is ever mutated at runtime.

mod achievements;
mod bosses;
mod equipment;
mod powerups;
mod rarity;
mod seeds;
mod upgrades;

pub use achievements::{AchievementCategory, AchievementDefinition, ACHIEVEMENTS};
pub use bosses::{boss, boss_for_level, BossDefinition, BOSSES};
pub use equipment::{
    equipment, CharacterClass, EquipmentDefinition, SlotKind, Stat, WeaponClass, EQUIPMENT,
};
pub use powerups::{power_up, PowerUpDefinition, PowerUpTarget, POWER_UPS};
pub use rarity::{ForgeStep, Rarity};
pub use seeds::{seed, Harvest, SeedDefinition, SeedType, SEEDS};
pub use upgrades::{
    garden_upgrade, prestige_upgrade, upgrade, GardenEffect, GardenUpgradeDefinition,
    PrestigeEffect, PrestigeUpgradeDefinition, UpgradeDefinition, UpgradeEffect, GARDEN_UPGRADES,
    PRESTIGE_UPGRADES, UPGRADES,
};

/// Base chance that a boss victory drops a piece of equipment
pub const EQUIPMENT_DROP_CHANCE: f64 = 0.35;
