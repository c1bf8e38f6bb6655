//! Achievement thresholds

use serde::{Deserialize, Serialize};

/// Counter an achievement watches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AchievementCategory {
    Clicks,
    Coins,
    Level,
    Bosses,
    Forge,
}

/// Achievement template
#[derive(Debug, Clone, PartialEq)]
pub struct AchievementDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub category: AchievementCategory,
    pub threshold: f64,
    /// Multiplicative click boost granted once unlocked (`0.05` = ×1.05)
    pub boost: f64,
}

pub static ACHIEVEMENTS: &[AchievementDefinition] = &[
    AchievementDefinition {
        id: "first_click",
        name: "First Click",
        category: AchievementCategory::Clicks,
        threshold: 1.0,
        boost: 0.01,
    },
    AchievementDefinition {
        id: "clicker",
        name: "Clicker",
        category: AchievementCategory::Clicks,
        threshold: 1_000.0,
        boost: 0.05,
    },
    AchievementDefinition {
        id: "click_storm",
        name: "Click Storm",
        category: AchievementCategory::Clicks,
        threshold: 25_000.0,
        boost: 0.10,
    },
    AchievementDefinition {
        id: "pocket_change",
        name: "Pocket Change",
        category: AchievementCategory::Coins,
        threshold: 1_000.0,
        boost: 0.02,
    },
    AchievementDefinition {
        id: "treasury",
        name: "Treasury",
        category: AchievementCategory::Coins,
        threshold: 1_000_000.0,
        boost: 0.10,
    },
    AchievementDefinition {
        id: "rising_team",
        name: "Rising Team",
        category: AchievementCategory::Level,
        threshold: 10.0,
        boost: 0.05,
    },
    AchievementDefinition {
        id: "giant_slayer",
        name: "Giant Slayer",
        category: AchievementCategory::Bosses,
        threshold: 1.0,
        boost: 0.05,
    },
    AchievementDefinition {
        id: "boss_hunter",
        name: "Boss Hunter",
        category: AchievementCategory::Bosses,
        threshold: 10.0,
        boost: 0.10,
    },
    AchievementDefinition {
        id: "apprentice_smith",
        name: "Apprentice Smith",
        category: AchievementCategory::Forge,
        threshold: 1.0,
        boost: 0.03,
    },
];
