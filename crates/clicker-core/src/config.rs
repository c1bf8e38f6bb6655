//! Engine configuration - gameplay tunables
//!
//! Every field has a default, so a partial config file (or none at all)
//! yields a playable engine.

use crate::player::INVENTORY_CAPACITY;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Tunables consulted by the [`Engine`](crate::Engine)
///
/// # Example
///
/// ```
/// use clicker_core::EngineConfig;
///
/// let config = EngineConfig::default();
/// assert_eq!(config.inventory_capacity, 10);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed for the engine's random source
    pub seed: u64,
    pub inventory_capacity: usize,
    /// A boss spawns every time the team level reaches a multiple of this
    pub boss_every_levels: u32,
    /// Scales every boss's level-scaled health
    pub boss_health_multiplier: f64,
    /// Fraction of team coins lost on timeout or surrender
    pub defeat_penalty: f64,
    /// Click multiplier granted after a victory
    pub victory_multiplier: f64,
    pub victory_buff_secs: u64,
    pub equipment_drop_chance: f64,
    /// Weight of auto-click damage against a boss
    pub auto_click_boss_weight: f64,
    pub clicks_per_level: u64,
    pub prestige_min_level: u32,
    /// Player multiplier gained per prestige
    pub prestige_bonus_per_count: f64,
    /// Coins needed to go from level 1 to 2
    pub first_level_requirement: f64,
    pub level_requirement_growth: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            inventory_capacity: INVENTORY_CAPACITY,
            boss_every_levels: 5,
            boss_health_multiplier: 1.0,
            defeat_penalty: 0.10,
            victory_multiplier: 2.0,
            victory_buff_secs: 60,
            equipment_drop_chance: crate::catalog::EQUIPMENT_DROP_CHANCE,
            auto_click_boss_weight: 0.5,
            clicks_per_level: 100,
            prestige_min_level: 10,
            prestige_bonus_per_count: 0.25,
            first_level_requirement: 100.0,
            level_requirement_growth: 1.5,
        }
    }
}

impl EngineConfig {
    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        let fractions = [
            ("defeat_penalty", self.defeat_penalty),
            ("equipment_drop_chance", self.equipment_drop_chance),
            ("auto_click_boss_weight", self.auto_click_boss_weight),
        ];
        for (name, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::invalid(format!("{} must be within [0, 1], got {}", name, value)));
            }
        }
        if self.inventory_capacity == 0 {
            return Err(Error::invalid("inventory_capacity must be at least 1"));
        }
        if self.boss_every_levels == 0 {
            return Err(Error::invalid("boss_every_levels must be at least 1"));
        }
        if self.first_level_requirement <= 0.0 || self.level_requirement_growth < 1.0 {
            return Err(Error::invalid("level requirements must be positive and non-shrinking"));
        }
        if self.boss_health_multiplier <= 0.0 || self.victory_multiplier < 1.0 {
            return Err(Error::invalid("boss multipliers out of range"));
        }
        Ok(())
    }
}
