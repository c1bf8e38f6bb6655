//! Rarity tiers and the forge transition table

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered quality level of an equipment instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Normal,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

/// Parameters of a single forge step `from -> from.successor()`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForgeStep {
    /// Fraction of current team coins charged per attempt
    pub cost_fraction: f64,
    /// Base probability that the attempt succeeds
    pub success_chance: f64,
}

impl Rarity {
    /// All tiers in ascending order
    pub const ALL: [Rarity; 5] = [
        Rarity::Normal,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
    ];

    /// Multiplier applied to every base stat at this tier
    pub fn stat_multiplier(self) -> f64 {
        match self {
            Rarity::Normal => 1.0,
            Rarity::Uncommon => 1.25,
            Rarity::Rare => 1.5,
            Rarity::Epic => 2.0,
            Rarity::Legendary => 3.0,
        }
    }

    /// The next tier up, or None for the terminal tier
    pub fn successor(self) -> Option<Rarity> {
        match self {
            Rarity::Normal => Some(Rarity::Uncommon),
            Rarity::Uncommon => Some(Rarity::Rare),
            Rarity::Rare => Some(Rarity::Epic),
            Rarity::Epic => Some(Rarity::Legendary),
            Rarity::Legendary => None,
        }
    }

    /// Forge parameters for leaving this tier
    pub fn forge_step(self) -> Option<ForgeStep> {
        let (cost_fraction, success_chance) = match self {
            Rarity::Normal => (0.30, 0.25),
            Rarity::Uncommon => (0.35, 0.15),
            Rarity::Rare => (0.40, 0.05),
            Rarity::Epic => (0.50, 0.001),
            Rarity::Legendary => return None,
        };
        Some(ForgeStep {
            cost_fraction,
            success_chance,
        })
    }

    /// Check if this is the terminal tier
    pub fn is_max(self) -> bool {
        self.successor().is_none()
    }

    /// Lowercase name used on the wire and in messages
    pub fn as_str(self) -> &'static str {
        match self {
            Rarity::Normal => "normal",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
            Rarity::Legendary => "legendary",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
