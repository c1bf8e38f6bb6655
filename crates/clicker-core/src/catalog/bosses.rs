//! Boss definitions and the global equipment drop table

/// Boss template
#[derive(Debug, Clone, PartialEq)]
pub struct BossDefinition {
    pub id: &'static str,
    pub name: &'static str,
    /// Health at boss level 1, before the configured multiplier
    pub base_health: f64,
    /// Fixed coin reward on victory
    pub reward_coins: u64,
    pub duration_secs: u64,
    /// Boss-specific damage multiplier applied to every hit
    pub damage_multiplier: f64,
}

pub static BOSSES: &[BossDefinition] = &[
    BossDefinition {
        id: "slime_king",
        name: "Slime King",
        base_health: 500.0,
        reward_coins: 1_000,
        duration_secs: 60,
        damage_multiplier: 1.0,
    },
    BossDefinition {
        id: "stone_golem",
        name: "Stone Golem",
        base_health: 800.0,
        reward_coins: 2_500,
        duration_secs: 75,
        damage_multiplier: 0.8,
    },
    BossDefinition {
        id: "shadow_drake",
        name: "Shadow Drake",
        base_health: 1_200.0,
        reward_coins: 5_000,
        duration_secs: 90,
        damage_multiplier: 1.2,
    },
];

/// Look up a boss by id
pub fn boss(id: &str) -> Option<&'static BossDefinition> {
    BOSSES.iter().find(|b| b.id == id)
}

/// Pick the boss for a spawn at the given team level
///
/// Bosses rotate in catalog order every spawn.
pub fn boss_for_level(level: u32, every_levels: u32) -> &'static BossDefinition {
    let spawn_index = (level / every_levels.max(1)).saturating_sub(1) as usize;
    &BOSSES[spawn_index % BOSSES.len()]
}
