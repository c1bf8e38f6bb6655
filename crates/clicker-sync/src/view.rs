//! Client-facing projections of the team state
//!
//! A view is what goes over the wire as a full state update. Derived fields
//! are optional: a full update that omits them means "unchanged", and the
//! client keeps what it already had (see [`reconcile`](crate::reconcile)).

use clicker_core::catalog::{CharacterClass, SlotKind, Stat};
use clicker_core::{
    ActiveBoss, BossPhase, EquipmentInstance, Garden, ItemId, Millis, Player, PlayerId,
    PowerUpState, TeamState, TimedBuff,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Full team state as clients see it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateView {
    pub coins: f64,
    pub level: u32,
    pub progress_remaining: f64,
    pub level_requirement: f64,
    pub upgrades: IndexMap<String, u32>,
    #[serde(default)]
    pub garden_upgrades: IndexMap<String, u32>,
    pub fragments: u64,
    #[serde(default)]
    pub prestige_upgrades: Vec<String>,
    #[serde(default)]
    pub prestige_runs: u32,
    /// Unlocked achievement ids
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub achievements: Option<Vec<String>>,
    /// Product of every unlocked achievement boost
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub achievement_boost: Option<f64>,
    #[serde(default)]
    pub boss: Option<BossView>,
    #[serde(default)]
    pub power_ups: IndexMap<String, PowerUpState>,
    pub garden: Garden,
    #[serde(default)]
    pub forge_luck: u32,
    #[serde(default)]
    pub victory_buff: Option<TimedBuff>,
    pub players: Vec<PlayerView>,
}

/// One player as clients see them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub character: Option<CharacterClass>,
    pub inventory: Vec<EquipmentInstance>,
    #[serde(default)]
    pub equipment: IndexMap<SlotKind, ItemId>,
    pub level: u32,
    pub clicks: u64,
    pub contribution: f64,
    /// Aggregate of equipped stats
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bonus_stats: Option<IndexMap<Stat, f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prestige_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prestige_multiplier: Option<f64>,
}

/// The active boss without per-player bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BossView {
    pub boss_id: String,
    pub name: String,
    pub level: u32,
    pub health: f64,
    pub max_health: f64,
    pub deadline: Millis,
    pub total_damage: f64,
    pub phase: BossPhase,
}

impl BossView {
    fn new(boss: &ActiveBoss, phase: BossPhase) -> Self {
        Self {
            boss_id: boss.boss_id.clone(),
            name: boss.name.clone(),
            level: boss.level,
            health: boss.health,
            max_health: boss.max_health,
            deadline: boss.deadline,
            total_damage: boss.total_damage,
            phase,
        }
    }
}

impl PlayerView {
    pub fn from_player(player: &Player) -> Self {
        Self {
            id: player.id,
            name: player.name.clone(),
            character: player.character,
            inventory: player.inventory.iter().cloned().collect(),
            equipment: player.slots.iter().collect(),
            level: player.level,
            clicks: player.clicks,
            contribution: player.contribution,
            bonus_stats: Some(player.bonus_stats()),
            prestige_count: Some(player.prestige_count),
            prestige_multiplier: Some(player.prestige_multiplier),
        }
    }
}

impl GameStateView {
    /// Project the full team state, derived fields included
    pub fn from_team(team: &TeamState) -> Self {
        Self {
            coins: team.coins.balance(),
            level: team.level,
            progress_remaining: team.progress_remaining,
            level_requirement: team.level_requirement,
            upgrades: team.upgrades.clone(),
            garden_upgrades: team.garden_upgrades.clone(),
            fragments: team.fragments,
            prestige_upgrades: team.prestige_upgrades.iter().cloned().collect(),
            prestige_runs: team.prestige_runs,
            achievements: Some(team.achievements.iter().map(str::to_string).collect()),
            achievement_boost: Some(team.achievements.boost()),
            boss: team
                .boss
                .current()
                .map(|b| BossView::new(b, team.boss.phase())),
            power_ups: team
                .power_ups
                .iter()
                .map(|(id, s)| (id.to_string(), *s))
                .collect(),
            garden: team.garden.clone(),
            forge_luck: team.forge_luck,
            victory_buff: team.victory_buff,
            players: team.players.values().map(PlayerView::from_player).collect(),
        }
    }

    pub fn player(&self, id: PlayerId) -> Option<&PlayerView> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Drop every derived field, as a path that skips recomputation would
    pub fn without_derived(mut self) -> Self {
        self.achievements = None;
        self.achievement_boost = None;
        for player in &mut self.players {
            player.bonus_stats = None;
            player.prestige_count = None;
            player.prestige_multiplier = None;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clicker_core::catalog::equipment;

    #[test]
    fn test_view_carries_derived_fields() {
        let mut team = TeamState::new(100.0);
        team.add_player(PlayerId(1), "ana", 10).unwrap();
        let sword = team.instantiate(equipment("rusty_sword").unwrap());
        let id = sword.id;
        let player = team.player_mut(PlayerId(1)).unwrap();
        player.inventory.push(sword).unwrap();
        player.equip(id, SlotKind::Weapon).unwrap();

        let view = GameStateView::from_team(&team);
        let ana = view.player(PlayerId(1)).unwrap();
        assert_eq!(ana.equipment.get(&SlotKind::Weapon), Some(&id));
        assert_eq!(ana.prestige_multiplier, Some(1.0));
        assert!(ana.bonus_stats.as_ref().unwrap().contains_key(&Stat::ClickPower));
        assert_eq!(view.achievement_boost, Some(1.0));
        assert!(view.boss.is_none());
    }

    #[test]
    fn test_absent_derived_fields_are_not_serialized() {
        let team = TeamState::new(100.0);
        let view = GameStateView::from_team(&team).without_derived();
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("achievements").is_none());
        assert!(json.get("progressRemaining").is_some());

        let back: GameStateView = serde_json::from_value(json).unwrap();
        assert_eq!(back.achievements, None);
    }
}
