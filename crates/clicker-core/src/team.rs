//! The shared team aggregate
//!
//! One `TeamState` exists per server process. It owns the player record
//! store, the coin ledger and every team-wide progression system. All
//! mutation goes through `&mut TeamState`, so whoever holds the single
//! mutable reference (the engine actor) serializes every debit.

use crate::achievements::Achievements;
use crate::boss::BossEncounter;
use crate::catalog::{EquipmentDefinition, UPGRADES};
use crate::garden::Garden;
use crate::player::{EquipmentInstance, Player};
use crate::powerups::PowerUps;
use crate::time::TimedBuff;
use crate::{Error, ItemId, PlayerId, Result};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// Non-negative team coin balance
///
/// Every debit checks affordability against the balance at the moment of
/// the debit, inside the same `&mut` borrow that performs it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    balance: f64,
}

impl Ledger {
    /// Create a ledger holding `balance` coins
    pub fn new(balance: f64) -> Self {
        Self {
            balance: balance.max(0.0),
        }
    }

    /// Exact balance, including fractional coins from multipliers
    pub fn balance(&self) -> f64 {
        self.balance
    }

    /// Whole coins available for spending
    pub fn whole(&self) -> u64 {
        self.balance.floor() as u64
    }

    pub fn can_afford(&self, cost: u64) -> bool {
        self.whole() >= cost
    }

    /// Add coins; negative or non-finite amounts are ignored
    pub fn credit(&mut self, amount: f64) {
        if amount.is_finite() && amount > 0.0 {
            self.balance += amount;
        }
    }

    /// Remove `cost` coins if the current balance covers it
    pub fn debit(&mut self, cost: u64) -> Result<()> {
        if !self.can_afford(cost) {
            return Err(Error::InsufficientFunds {
                required: cost,
                current: self.whole(),
            });
        }
        self.balance = (self.balance - cost as f64).max(0.0);
        Ok(())
    }

    /// Remove `floor(balance * fraction)` coins, returning the amount taken
    pub fn take_fraction(&mut self, fraction: f64) -> u64 {
        let amount = (self.balance * fraction.clamp(0.0, 1.0)).floor() as u64;
        self.balance = (self.balance - amount as f64).max(0.0);
        amount
    }

    /// Replace the balance
    pub fn reset(&mut self, balance: f64) {
        self.balance = balance.max(0.0);
    }
}

/// Lifetime counters the achievement system watches
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStats {
    pub total_clicks: u64,
    pub total_coins_earned: f64,
    pub bosses_defeated: u64,
    pub forge_attempts: u64,
    pub forge_successes: u64,
    pub items_fused: u64,
}

/// The single shared mutable aggregate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamState {
    pub coins: Ledger,
    pub level: u32,
    /// Coins still needed to reach the next level
    pub progress_remaining: f64,
    /// Coins the current level required in total
    pub level_requirement: f64,
    /// Team upgrade id to current level, one entry per catalog upgrade
    pub upgrades: IndexMap<String, u32>,
    /// Garden upgrade id to current level
    #[serde(default)]
    pub garden_upgrades: IndexMap<String, u32>,
    pub fragments: u64,
    pub prestige_upgrades: IndexSet<String>,
    pub prestige_runs: u32,
    pub achievements: Achievements,
    pub stats: TeamStats,
    pub boss: BossEncounter,
    pub power_ups: PowerUps,
    pub garden: Garden,
    /// Clover charges that amplify the next forge attempts
    pub forge_luck: u32,
    /// Click multiplier granted by the last boss victory
    pub victory_buff: Option<TimedBuff>,
    /// Connection-scoped records; never persisted
    #[serde(skip)]
    pub players: IndexMap<PlayerId, Player>,
    next_item_id: u64,
}

impl TeamState {
    /// Create a level-1 team with no coins
    pub fn new(first_requirement: f64) -> Self {
        Self {
            coins: Ledger::default(),
            level: 1,
            progress_remaining: first_requirement,
            level_requirement: first_requirement,
            upgrades: UPGRADES.iter().map(|u| (u.id.to_string(), 0)).collect(),
            garden_upgrades: IndexMap::new(),
            fragments: 0,
            prestige_upgrades: IndexSet::new(),
            prestige_runs: 0,
            achievements: Achievements::default(),
            stats: TeamStats::default(),
            boss: BossEncounter::default(),
            power_ups: PowerUps::default(),
            garden: Garden::default(),
            forge_luck: 0,
            victory_buff: None,
            players: IndexMap::new(),
            next_item_id: 1,
        }
    }

    /// Register a player record under a connection-scoped id
    pub fn add_player(
        &mut self,
        id: PlayerId,
        name: impl Into<String>,
        inventory_capacity: usize,
    ) -> Result<&mut Player> {
        if self.players.contains_key(&id) {
            return Err(Error::invalid(format!("{} has already joined", id)));
        }
        Ok(self
            .players
            .entry(id)
            .or_insert_with(|| Player::new(id, name, inventory_capacity)))
    }

    /// Drop a player record and everything it owns
    pub fn remove_player(&mut self, id: PlayerId) -> Result<Player> {
        self.players
            .shift_remove(&id)
            .ok_or(Error::PlayerNotFound(id))
    }

    pub fn player(&self, id: PlayerId) -> Result<&Player> {
        self.players.get(&id).ok_or(Error::PlayerNotFound(id))
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player> {
        self.players.get_mut(&id).ok_or(Error::PlayerNotFound(id))
    }

    /// Allocate a fresh, never-reused item id
    pub fn allocate_item_id(&mut self) -> ItemId {
        let id = ItemId(self.next_item_id);
        self.next_item_id += 1;
        id
    }

    /// Instantiate a catalog template with a fresh id
    pub fn instantiate(&mut self, def: &EquipmentDefinition) -> EquipmentInstance {
        let id = self.allocate_item_id();
        EquipmentInstance::from_definition(id, def)
    }

    /// Current level of a team upgrade (0 when unknown)
    pub fn upgrade_level(&self, id: &str) -> u32 {
        self.upgrades.get(id).copied().unwrap_or(0)
    }

    /// Current level of a garden upgrade
    pub fn garden_upgrade_level(&self, id: &str) -> u32 {
        self.garden_upgrades.get(id).copied().unwrap_or(0)
    }

    pub fn has_prestige_upgrade(&self, id: &str) -> bool {
        self.prestige_upgrades.contains(id)
    }

    /// Credit earned coins and count them toward lifetime totals
    pub fn earn(&mut self, amount: f64) {
        if amount > 0.0 && amount.is_finite() {
            self.coins.credit(amount);
            self.stats.total_coins_earned += amount;
        }
    }

    /// Restore connection-independent counters after loading a snapshot
    pub fn after_restore(&mut self) {
        self.players.clear();
        for def in UPGRADES {
            self.upgrades.entry(def.id.to_string()).or_insert(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::equipment;

    #[test]
    fn test_ledger_never_negative() {
        let mut ledger = Ledger::new(100.0);
        assert!(ledger.debit(150).is_err());
        assert_eq!(ledger.whole(), 100);
        ledger.debit(100).unwrap();
        assert_eq!(ledger.whole(), 0);
        assert_eq!(
            ledger.debit(1),
            Err(Error::InsufficientFunds {
                required: 1,
                current: 0
            })
        );
        ledger.credit(-50.0);
        assert_eq!(ledger.balance(), 0.0);
    }

    #[test]
    fn test_take_fraction_floors() {
        let mut ledger = Ledger::new(1_005.0);
        assert_eq!(ledger.take_fraction(0.1), 100);
        assert_eq!(ledger.whole(), 905);
    }

    #[test]
    fn test_fractional_balance_cannot_buy_the_next_coin() {
        let mut ledger = Ledger::new(9.9);
        assert!(!ledger.can_afford(10));
        assert!(ledger.debit(9).is_ok());
    }

    #[test]
    fn test_players_and_item_ids() {
        let mut team = TeamState::new(100.0);
        let (a, b) = (PlayerId(1), PlayerId(2));
        team.add_player(a, "ana", 10).unwrap();
        team.add_player(b, "bo", 10).unwrap();
        assert!(team.add_player(a, "again", 10).is_err());

        let first = team.instantiate(equipment("oak_staff").unwrap());
        let second = team.instantiate(equipment("oak_staff").unwrap());
        assert_ne!(first.id, second.id);

        team.remove_player(a).unwrap();
        assert_eq!(team.remove_player(a), Err(Error::PlayerNotFound(a)));
        assert!(team.player(b).is_ok());
    }

    #[test]
    fn test_snapshot_skips_players() {
        let mut team = TeamState::new(100.0);
        team.add_player(PlayerId(1), "ana", 10).unwrap();
        team.earn(42.0);

        let text = ron::to_string(&team).unwrap();
        let mut restored: TeamState = ron::from_str(&text).unwrap();
        restored.after_restore();
        assert!(restored.players.is_empty());
        assert_eq!(restored.coins.whole(), 42);
        assert_eq!(restored.upgrade_level("click_power"), 0);
    }
}
