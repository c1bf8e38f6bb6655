//! Delta updates for high-frequency changes
//!
//! Clicks and auto-click ticks only move coins, level progress, the boss's
//! health and damage tally, and per-player click counters, so those are all
//! a delta carries.

use crate::view::GameStateView;
use clicker_core::{PlayerId, TeamState};
use serde::{Deserialize, Serialize};

/// Partial patch of the fast-moving fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateDelta {
    pub coins: f64,
    pub level: u32,
    pub progress_remaining: f64,
    pub level_requirement: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boss_health: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boss_total_damage: Option<f64>,
    #[serde(default)]
    pub players: Vec<PlayerProgress>,
}

/// Click counters of one player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProgress {
    pub id: PlayerId,
    pub level: u32,
    pub clicks: u64,
    pub contribution: f64,
}

impl StateDelta {
    pub fn from_team(team: &TeamState) -> Self {
        let boss = team.boss.current().filter(|_| team.boss.is_active());
        Self {
            coins: team.coins.balance(),
            level: team.level,
            progress_remaining: team.progress_remaining,
            level_requirement: team.level_requirement,
            boss_health: boss.map(|b| b.health),
            boss_total_damage: boss.map(|b| b.total_damage),
            players: team
                .players
                .values()
                .map(|p| PlayerProgress {
                    id: p.id,
                    level: p.level,
                    clicks: p.clicks,
                    contribution: p.contribution,
                })
                .collect(),
        }
    }
}

/// Patch a cached view in place
///
/// Players the view does not know yet are skipped; they arrive with the
/// next full update.
pub fn apply_delta(view: &mut GameStateView, delta: &StateDelta) {
    view.coins = delta.coins;
    view.level = delta.level;
    view.progress_remaining = delta.progress_remaining;
    view.level_requirement = delta.level_requirement;
    if let Some(boss) = view.boss.as_mut() {
        if let Some(health) = delta.boss_health {
            boss.health = health;
        }
        if let Some(total) = delta.boss_total_damage {
            boss.total_damage = total;
        }
    }
    for progress in &delta.players {
        if let Some(player) = view.players.iter_mut().find(|p| p.id == progress.id) {
            player.level = progress.level;
            player.clicks = progress.clicks;
            player.contribution = progress.contribution;
        }
    }
}
