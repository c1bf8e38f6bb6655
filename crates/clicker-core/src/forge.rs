//! Forge: a cost-gated, probabilistic rarity upgrade with destructive failure
//!
//! The cost is charged on every qualifying attempt, win or lose, and a
//! failed attempt destroys the item. Both penalties are deliberate.

use crate::catalog::{PrestigeEffect, Rarity, PRESTIGE_UPGRADES};
use crate::rng::Dice;
use crate::team::TeamState;
use crate::{Error, ItemId, PlayerId, Result};
use serde::{Deserialize, Serialize};

/// Smallest charge for an attempt, so an empty ledger cannot forge for free
pub const MIN_FORGE_COST: u64 = 1;

/// Outcome of an attempt that got past every precondition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgeOutcome {
    pub success: bool,
    pub item_id: ItemId,
    pub item_name: String,
    pub old_rarity: Rarity,
    /// The tier that was tried for; equals the new tier on success
    pub attempted_rarity: Rarity,
    pub cost: u64,
    /// Probability the roll was made against
    pub chance: f64,
    pub message: String,
}

impl ForgeOutcome {
    /// The item's tier after the attempt, if it still exists
    pub fn new_rarity(&self) -> Option<Rarity> {
        self.success.then_some(self.attempted_rarity)
    }
}

/// Price of forging an item away from `rarity` with `coins` in the ledger
pub fn forge_cost(rarity: Rarity, coins: u64) -> Result<u64> {
    let step = rarity
        .forge_step()
        .ok_or(Error::MaxRarityReached(rarity))?;
    let cost = (coins as f64 * step.cost_fraction).floor() as u64;
    Ok(cost.max(MIN_FORGE_COST))
}

/// Multiplier on the base success chance from prestige unlocks
fn prestige_luck(team: &TeamState) -> f64 {
    PRESTIGE_UPGRADES
        .iter()
        .filter(|u| team.has_prestige_upgrade(u.id))
        .filter_map(|u| match u.effect {
            PrestigeEffect::ForgeLuck(m) => Some(m),
            _ => None,
        })
        .product()
}

/// Try to raise an item one rarity tier
///
/// Preconditions are checked before anything is touched: the player and
/// item must exist, the item must not be legendary and the team must afford
/// the cost at this moment. After that the cost is always debited, a single
/// uniform roll decides, and the item is either promoted in place (same id,
/// same slot) or destroyed, clearing any equipment slot that held it.
///
/// A clover charge, when available, is consumed and doubles the chance.
pub fn attempt_forge(
    team: &mut TeamState,
    player_id: PlayerId,
    item_id: ItemId,
    dice: &mut impl Dice,
) -> Result<ForgeOutcome> {
    let item = team
        .player(player_id)?
        .inventory
        .get(item_id)
        .ok_or(Error::ItemNotFound(item_id))?;
    let old_rarity = item.rarity;
    let item_name = item.name.clone();
    let next = old_rarity
        .successor()
        .ok_or(Error::MaxRarityReached(old_rarity))?;
    let step = old_rarity
        .forge_step()
        .ok_or(Error::MaxRarityReached(old_rarity))?;

    let cost = forge_cost(old_rarity, team.coins.whole())?;
    team.coins.debit(cost)?;

    let mut chance = step.success_chance * prestige_luck(team);
    if team.forge_luck > 0 {
        team.forge_luck -= 1;
        chance *= 2.0;
    }
    let chance = chance.min(1.0);
    team.stats.forge_attempts += 1;

    let success = dice.chance(chance);
    let player = team.player_mut(player_id)?;
    let message = if success {
        if let Some(item) = player.inventory.get_mut(item_id) {
            item.rescale_to(next);
        }
        format!("Success! {} is now {}.", item_name, next)
    } else {
        player.remove_item(item_id)?;
        format!(
            "The forge failed. {} was destroyed and the {} coins were lost.",
            item_name, cost
        )
    };
    if success {
        team.stats.forge_successes += 1;
    }

    Ok(ForgeOutcome {
        success,
        item_id,
        item_name,
        old_rarity,
        attempted_rarity: next,
        cost,
        chance,
        message,
    })
}
