//! Boss encounter state machine
//!
//! ```text
//! Idle ──spawn──▶ Active ──health 0──────▶ Victory ─────┐
//!                   │    ──deadline──────▶ TimedOut ────┼──finish──▶ Idle
//!                   └────surrender───────▶ Surrendered ─┘
//! ```
//!
//! Damage is applied one event at a time by the engine, so per-player
//! credit and the running total never race.

use crate::catalog::BossDefinition;
use crate::time::{secs, Millis};
use crate::{Error, PlayerId, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Encounter phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BossPhase {
    #[default]
    Idle,
    Active,
    Victory,
    TimedOut,
    Surrendered,
}

impl BossPhase {
    /// Check if this phase ends an encounter
    pub fn is_resolved(self) -> bool {
        matches!(
            self,
            BossPhase::Victory | BossPhase::TimedOut | BossPhase::Surrendered
        )
    }
}

/// Where a hit came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageSource {
    Player(PlayerId),
    AutoClick,
}

/// A boss that has been spawned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveBoss {
    pub boss_id: String,
    pub name: String,
    pub level: u32,
    pub max_health: f64,
    pub health: f64,
    pub started_at: Millis,
    pub deadline: Millis,
    /// Damage-credit multiplier specific to this boss
    pub damage_multiplier: f64,
    pub reward_coins: u64,
    /// Every point of damage dealt, including overkill
    pub total_damage: f64,
    pub damage_by_player: IndexMap<PlayerId, f64>,
    pub auto_damage: f64,
}

impl ActiveBoss {
    /// Eligible player who dealt the most damage; earliest contributor wins ties
    pub fn top_damage_dealer(&self, eligible: impl Fn(PlayerId) -> bool) -> Option<PlayerId> {
        let mut best: Option<(PlayerId, f64)> = None;
        for (&id, &dmg) in self.damage_by_player.iter().filter(|(id, _)| eligible(**id)) {
            match best {
                Some((_, top)) if dmg <= top => {}
                _ => best = Some((id, dmg)),
            }
        }
        best.map(|(id, _)| id)
    }
}

/// Result of a single hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageReport {
    pub damage: f64,
    pub health: f64,
    pub max_health: f64,
    pub defeated: bool,
}

/// A finished encounter, ready for rewards or penalties
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBoss {
    pub outcome: BossPhase,
    pub boss: ActiveBoss,
    pub resolved_at: Millis,
}

impl ResolvedBoss {
    /// Fight length in milliseconds
    pub fn duration(&self) -> Millis {
        self.resolved_at.saturating_sub(self.boss.started_at)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BossEncounter {
    phase: BossPhase,
    current: Option<ActiveBoss>,
    resolved_at: Option<Millis>,
}

impl BossEncounter {
    pub fn phase(&self) -> BossPhase {
        self.phase
    }

    /// The boss being fought (or just beaten)
    pub fn current(&self) -> Option<&ActiveBoss> {
        self.current.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.phase == BossPhase::Active
    }

    /// Enter `Active` with health scaled by level and multiplier
    pub fn spawn(
        &mut self,
        def: &BossDefinition,
        level: u32,
        health_multiplier: f64,
        now: Millis,
    ) -> Result<&ActiveBoss> {
        if self.phase == BossPhase::Active {
            return Err(Error::invalid("a boss is already active"));
        }
        let max_health = (def.base_health * level.max(1) as f64 * health_multiplier).max(1.0);
        self.phase = BossPhase::Active;
        self.resolved_at = None;
        Ok(&*self.current.insert(ActiveBoss {
            boss_id: def.id.to_string(),
            name: def.name.to_string(),
            level,
            max_health,
            health: max_health,
            started_at: now,
            deadline: now.saturating_add(secs(def.duration_secs)),
            damage_multiplier: def.damage_multiplier,
            reward_coins: def.reward_coins,
            total_damage: 0.0,
            damage_by_player: IndexMap::new(),
            auto_damage: 0.0,
        }))
    }

    /// Subtract damage, clamping health at zero
    ///
    /// Reaching zero before the deadline moves the encounter to `Victory`.
    /// `amount` is the raw hit; the boss multiplier is applied here.
    pub fn apply_damage(
        &mut self,
        source: DamageSource,
        amount: f64,
        now: Millis,
    ) -> Result<DamageReport> {
        if self.phase != BossPhase::Active {
            return Err(Error::invalid("no active boss"));
        }
        let boss = self
            .current
            .as_mut()
            .ok_or_else(|| Error::invalid("no active boss"))?;
        if now >= boss.deadline {
            return Err(Error::Expired);
        }

        let damage = (amount * boss.damage_multiplier).max(0.0);
        boss.total_damage += damage;
        match source {
            DamageSource::Player(id) => *boss.damage_by_player.entry(id).or_insert(0.0) += damage,
            DamageSource::AutoClick => boss.auto_damage += damage,
        }
        boss.health = (boss.health - damage).max(0.0);

        let defeated = boss.health <= 0.0;
        let report = DamageReport {
            damage,
            health: boss.health,
            max_health: boss.max_health,
            defeated,
        };
        if defeated {
            self.phase = BossPhase::Victory;
            self.resolved_at = Some(now);
        }
        Ok(report)
    }

    /// Move to `TimedOut` if the deadline has passed with health left
    pub fn check_deadline(&mut self, now: Millis) -> bool {
        let expired = self.phase == BossPhase::Active
            && self.current.as_ref().is_some_and(|b| now >= b.deadline);
        if expired {
            self.phase = BossPhase::TimedOut;
            self.resolved_at = Some(now);
        }
        expired
    }

    /// End the encounter early by player choice
    pub fn surrender(&mut self, now: Millis) -> Result<()> {
        if self.phase != BossPhase::Active {
            return Err(Error::invalid("no active boss to surrender to"));
        }
        self.phase = BossPhase::Surrendered;
        self.resolved_at = Some(now);
        Ok(())
    }

    /// Take a resolved encounter out and return to `Idle`
    pub fn finish(&mut self) -> Option<ResolvedBoss> {
        if !self.phase.is_resolved() {
            return None;
        }
        let outcome = std::mem::take(&mut self.phase);
        let resolved_at = self.resolved_at.take().unwrap_or_default();
        self.current.take().map(|boss| ResolvedBoss {
            outcome,
            boss,
            resolved_at,
        })
    }

    /// Drop any encounter without resolving it
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
