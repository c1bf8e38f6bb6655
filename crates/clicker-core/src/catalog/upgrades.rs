//! Team upgrades, prestige upgrades and garden upgrades

/// What a team upgrade level contributes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UpgradeEffect {
    /// Additive click power bonus per level
    ClickPower(f64),
    /// Auto-clicks per second per level
    AutoClick(f64),
    /// Additive coin bonus per level
    CoinBonus(f64),
    /// Additive boss damage bonus per level
    BossDamage(f64),
}

/// Coin-priced, levelled team upgrade
#[derive(Debug, Clone, PartialEq)]
pub struct UpgradeDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub base_cost: f64,
    pub cost_growth: f64,
    pub max_level: u32,
    pub effect: UpgradeEffect,
}

impl UpgradeDefinition {
    /// Price of buying the level after `level`
    pub fn price_at(&self, level: u32) -> u64 {
        (self.base_cost * self.cost_growth.powi(level as i32)).floor() as u64
    }
}

pub static UPGRADES: &[UpgradeDefinition] = &[
    UpgradeDefinition {
        id: "click_power",
        name: "Sharper Clicks",
        base_cost: 15.0,
        cost_growth: 1.15,
        max_level: 100,
        effect: UpgradeEffect::ClickPower(0.5),
    },
    UpgradeDefinition {
        id: "auto_clicker",
        name: "Auto Clicker",
        base_cost: 50.0,
        cost_growth: 1.18,
        max_level: 100,
        effect: UpgradeEffect::AutoClick(1.0),
    },
    UpgradeDefinition {
        id: "coin_magnet",
        name: "Coin Magnet",
        base_cost: 200.0,
        cost_growth: 1.25,
        max_level: 25,
        effect: UpgradeEffect::CoinBonus(0.05),
    },
    UpgradeDefinition {
        id: "boss_slayer",
        name: "Boss Slayer",
        base_cost: 500.0,
        cost_growth: 1.3,
        max_level: 20,
        effect: UpgradeEffect::BossDamage(0.1),
    },
];

/// Look up a team upgrade by id
pub fn upgrade(id: &str) -> Option<&'static UpgradeDefinition> {
    UPGRADES.iter().find(|u| u.id == id)
}

/// What a prestige upgrade unlocks
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PrestigeEffect {
    ClickMultiplier(f64),
    AutoMultiplier(f64),
    ForgeLuck(f64),
    StartingCoins(f64),
}

/// Fragment-priced, one-shot unlock that survives prestige
#[derive(Debug, Clone, PartialEq)]
pub struct PrestigeUpgradeDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub cost: u64,
    pub effect: PrestigeEffect,
}

pub static PRESTIGE_UPGRADES: &[PrestigeUpgradeDefinition] = &[
    PrestigeUpgradeDefinition {
        id: "eternal_click",
        name: "Eternal Click",
        cost: 2,
        effect: PrestigeEffect::ClickMultiplier(1.5),
    },
    PrestigeUpgradeDefinition {
        id: "tireless_hands",
        name: "Tireless Hands",
        cost: 3,
        effect: PrestigeEffect::AutoMultiplier(1.5),
    },
    PrestigeUpgradeDefinition {
        id: "lucky_forge",
        name: "Lucky Forge",
        cost: 5,
        effect: PrestigeEffect::ForgeLuck(1.5),
    },
    PrestigeUpgradeDefinition {
        id: "head_start",
        name: "Head Start",
        cost: 4,
        effect: PrestigeEffect::StartingCoins(500.0),
    },
];

/// Look up a prestige upgrade by id
pub fn prestige_upgrade(id: &str) -> Option<&'static PrestigeUpgradeDefinition> {
    PRESTIGE_UPGRADES.iter().find(|u| u.id == id)
}

/// What a garden upgrade level changes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GardenEffect {
    /// One more plot per level
    ExtraPlot,
    /// Fractional growth-time reduction per level
    GrowthSpeed(f64),
}

/// Coin-priced, levelled garden upgrade
#[derive(Debug, Clone, PartialEq)]
pub struct GardenUpgradeDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub base_cost: f64,
    pub cost_growth: f64,
    pub max_level: u32,
    pub effect: GardenEffect,
}

impl GardenUpgradeDefinition {
    /// Price of buying the level after `level`
    pub fn price_at(&self, level: u32) -> u64 {
        (self.base_cost * self.cost_growth.powi(level as i32)).floor() as u64
    }
}

pub static GARDEN_UPGRADES: &[GardenUpgradeDefinition] = &[
    GardenUpgradeDefinition {
        id: "extra_plot",
        name: "Extra Plot",
        base_cost: 1000.0,
        cost_growth: 2.0,
        max_level: 3,
        effect: GardenEffect::ExtraPlot,
    },
    GardenUpgradeDefinition {
        id: "fertilizer",
        name: "Fertilizer",
        base_cost: 750.0,
        cost_growth: 1.6,
        max_level: 5,
        effect: GardenEffect::GrowthSpeed(0.1),
    },
];

/// Look up a garden upgrade by id
pub fn garden_upgrade(id: &str) -> Option<&'static GardenUpgradeDefinition> {
    GARDEN_UPGRADES.iter().find(|u| u.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_curve() {
        let def = upgrade("click_power").unwrap();
        assert_eq!(def.price_at(0), 15);
        assert_eq!(def.price_at(1), 17);
        assert!(def.price_at(10) > def.price_at(9));
    }

    #[test]
    fn test_lookups() {
        assert!(upgrade("auto_clicker").is_some());
        assert!(prestige_upgrade("lucky_forge").is_some());
        assert!(garden_upgrade("fertilizer").is_some());
        assert!(upgrade("lucky_forge").is_none());
    }
}
