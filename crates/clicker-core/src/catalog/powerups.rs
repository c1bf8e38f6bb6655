//! Timed power-ups

use serde::{Deserialize, Serialize};

/// What an active power-up multiplies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PowerUpTarget {
    ClickValue,
    AutoClick,
    BossDamage,
}

/// Power-up template
#[derive(Debug, Clone, PartialEq)]
pub struct PowerUpDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub cost: u64,
    pub duration_secs: u64,
    pub target: PowerUpTarget,
    pub multiplier: f64,
}

pub static POWER_UPS: &[PowerUpDefinition] = &[
    PowerUpDefinition {
        id: "double_coins",
        name: "Double Coins",
        cost: 250,
        duration_secs: 30,
        target: PowerUpTarget::ClickValue,
        multiplier: 2.0,
    },
    PowerUpDefinition {
        id: "frenzy",
        name: "Frenzy",
        cost: 400,
        duration_secs: 20,
        target: PowerUpTarget::AutoClick,
        multiplier: 3.0,
    },
    PowerUpDefinition {
        id: "boss_bane",
        name: "Boss Bane",
        cost: 600,
        duration_secs: 30,
        target: PowerUpTarget::BossDamage,
        multiplier: 2.0,
    },
];

/// Look up a power-up by id
pub fn power_up(id: &str) -> Option<&'static PowerUpDefinition> {
    POWER_UPS.iter().find(|p| p.id == id)
}
