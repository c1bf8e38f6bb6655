//! Coin flow: click values, auto-click income, level progress and purchases
//!
//! Every purchase checks the price against the ledger at the moment of the
//! debit and mutates nothing when it fails.

use crate::catalog::{
    garden_upgrade, prestige_upgrade, seed, upgrade, GardenEffect, Harvest, PowerUpTarget,
    PrestigeEffect, SeedType, Stat, UpgradeEffect, PRESTIGE_UPGRADES, UPGRADES,
};
use crate::config::EngineConfig;
use crate::garden::MAX_PLOTS;
use crate::player::Player;
use crate::team::TeamState;
use crate::time::Millis;
use crate::{Error, Result};

/// Sum of one upgrade effect over the team's upgrade levels
fn upgrade_bonus(team: &TeamState, pick: impl Fn(UpgradeEffect) -> Option<f64>) -> f64 {
    UPGRADES
        .iter()
        .filter_map(|u| pick(u.effect).map(|per| per * team.upgrade_level(u.id) as f64))
        .sum()
}

/// Product of one prestige effect over owned prestige upgrades
fn prestige_factor(team: &TeamState, pick: impl Fn(PrestigeEffect) -> Option<f64>) -> f64 {
    PRESTIGE_UPGRADES
        .iter()
        .filter(|u| team.has_prestige_upgrade(u.id))
        .filter_map(|u| pick(u.effect))
        .product()
}

/// Coins granted at the start of a run by prestige unlocks
pub fn starting_coins(team: &TeamState) -> f64 {
    PRESTIGE_UPGRADES
        .iter()
        .filter(|u| team.has_prestige_upgrade(u.id))
        .filter_map(|u| match u.effect {
            PrestigeEffect::StartingCoins(c) => Some(c),
            _ => None,
        })
        .sum()
}

/// Fractional bonus applied to every coin earned
pub fn coin_bonus(team: &TeamState, player: Option<&Player>) -> f64 {
    let magnet = upgrade_bonus(team, |e| match e {
        UpgradeEffect::CoinBonus(v) => Some(v),
        _ => None,
    });
    magnet + player.map_or(0.0, |p| p.stat_bonus(Stat::CoinBonus))
}

/// Payout and boss-damage factor of a critical click
pub const CRIT_MULTIPLIER: f64 = 2.0;

/// Probability that one of `player`'s clicks lands a critical hit
pub fn crit_chance(player: &Player) -> f64 {
    player.stat_bonus(Stat::CritChance).clamp(0.0, 1.0)
}

/// Coins one manual click by `player` is worth at `now`
pub fn click_value(team: &TeamState, player: &Player, now: Millis) -> f64 {
    let upgrades = upgrade_bonus(team, |e| match e {
        UpgradeEffect::ClickPower(v) => Some(v),
        _ => None,
    });
    let prestige = prestige_factor(team, |e| match e {
        PrestigeEffect::ClickMultiplier(m) => Some(m),
        _ => None,
    });
    let buff = team.victory_buff.map_or(1.0, |b| b.multiplier_at(now));

    (1.0 + upgrades)
        * (1.0 + player.stat_bonus(Stat::ClickPower))
        * player.prestige_multiplier
        * prestige
        * team.achievements.boost()
        * team.power_ups.multiplier(PowerUpTarget::ClickValue, now)
        * buff
        * (1.0 + coin_bonus(team, Some(player)))
}

/// Team auto-click income in coins per second
pub fn auto_click_rate(team: &TeamState, now: Millis) -> f64 {
    let base = upgrade_bonus(team, |e| match e {
        UpgradeEffect::AutoClick(v) => Some(v),
        _ => None,
    });
    if base <= 0.0 {
        return 0.0;
    }
    let prestige = prestige_factor(team, |e| match e {
        PrestigeEffect::AutoMultiplier(m) => Some(m),
        _ => None,
    });
    let gear: f64 = team
        .players
        .values()
        .map(|p| p.stat_bonus(Stat::AutoClickPower))
        .sum();

    base * (1.0 + gear)
        * prestige
        * team.power_ups.multiplier(PowerUpTarget::AutoClick, now)
        * (1.0 + coin_bonus(team, None))
}

/// Scale a hit against the boss by upgrades, gear and power-ups
pub fn boss_damage(team: &TeamState, player: Option<&Player>, base: f64, now: Millis) -> f64 {
    let slayer = upgrade_bonus(team, |e| match e {
        UpgradeEffect::BossDamage(v) => Some(v),
        _ => None,
    });
    let gear = player.map_or(0.0, |p| p.stat_bonus(Stat::BossDamage));
    base * (1.0 + slayer) * (1.0 + gear) * team.power_ups.multiplier(PowerUpTarget::BossDamage, now)
}

/// Consume level progress, returning every level newly reached
///
/// Overflow carries into the next level, so one large credit can cross
/// several levels at once.
pub fn add_progress(team: &mut TeamState, amount: f64, config: &EngineConfig) -> Vec<u32> {
    let mut reached = Vec::new();
    if !(amount.is_finite() && amount > 0.0) {
        return reached;
    }
    team.progress_remaining -= amount;
    while team.progress_remaining <= 0.0 {
        team.level += 1;
        team.level_requirement *= config.level_requirement_growth;
        team.progress_remaining += team.level_requirement;
        reached.push(team.level);
    }
    reached
}

/// Level a team upgrade, returning its new level
pub fn buy_upgrade(team: &mut TeamState, id: &str) -> Result<u32> {
    let def = upgrade(id).ok_or_else(|| Error::UnknownDefinition(id.to_string()))?;
    let level = team.upgrade_level(id);
    if level >= def.max_level {
        return Err(Error::MaxLevel(def.name.to_string()));
    }
    team.coins.debit(def.price_at(level))?;
    let level = level + 1;
    team.upgrades.insert(id.to_string(), level);
    Ok(level)
}

/// Unlock a prestige upgrade with fragments
pub fn buy_prestige_upgrade(team: &mut TeamState, id: &str) -> Result<()> {
    let def = prestige_upgrade(id).ok_or_else(|| Error::UnknownDefinition(id.to_string()))?;
    if team.has_prestige_upgrade(id) {
        return Err(Error::MaxLevel(def.name.to_string()));
    }
    if team.fragments < def.cost {
        return Err(Error::InsufficientFragments {
            required: def.cost,
            current: team.fragments,
        });
    }
    team.fragments -= def.cost;
    team.prestige_upgrades.insert(id.to_string());
    Ok(())
}

/// Level a garden upgrade, returning its new level
pub fn buy_garden_upgrade(team: &mut TeamState, id: &str) -> Result<u32> {
    let def = garden_upgrade(id).ok_or_else(|| Error::UnknownDefinition(id.to_string()))?;
    let level = team.garden_upgrade_level(id);
    let plots_full = def.effect == GardenEffect::ExtraPlot && team.garden.plots().len() >= MAX_PLOTS;
    if level >= def.max_level || plots_full {
        return Err(Error::MaxLevel(def.name.to_string()));
    }
    team.coins.debit(def.price_at(level))?;

    let level = level + 1;
    team.garden_upgrades.insert(id.to_string(), level);
    match def.effect {
        GardenEffect::ExtraPlot => {
            team.garden.add_plot()?;
        }
        GardenEffect::GrowthSpeed(per) => team.garden.set_growth_reduction(per * level as f64),
    }
    Ok(level)
}

/// Pay for a seed and plant it
pub fn plant_seed(team: &mut TeamState, slot_id: u32, seed_type: SeedType, now: Millis) -> Result<()> {
    team.garden.check_plantable(slot_id)?;
    team.coins.debit(seed(seed_type).price)?;
    team.garden.plant(slot_id, seed_type, now)?;
    Ok(())
}

/// Credit a harvest to the matching team resource
pub fn collect_harvest(team: &mut TeamState, harvest: Harvest) {
    match harvest {
        Harvest::Coins(amount) => team.earn(amount as f64),
        Harvest::ForgeLuck(charges) => team.forge_luck += charges,
        Harvest::Fragments(amount) => team.fragments += amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{equipment, power_up, SlotKind};
    use crate::time::TimedBuff;
    use crate::PlayerId;

    fn team_with_player() -> (TeamState, PlayerId) {
        let mut team = TeamState::new(100.0);
        let pid = PlayerId(1);
        team.add_player(pid, "ana", 10).unwrap();
        (team, pid)
    }

    #[test]
    fn test_base_click_is_one_coin() {
        let (team, pid) = team_with_player();
        assert_eq!(click_value(&team, team.player(pid).unwrap(), 0), 1.0);
    }

    #[test]
    fn test_click_multipliers_stack() {
        let (mut team, pid) = team_with_player();
        team.upgrades.insert("click_power".into(), 2);
        team.power_ups.activate(power_up("double_coins").unwrap(), 0).unwrap();
        team.victory_buff = Some(TimedBuff::new(2.0, 0, 60_000));

        let sword = team.instantiate(equipment("rusty_sword").unwrap());
        let id = sword.id;
        let player = team.player_mut(pid).unwrap();
        player.inventory.push(sword).unwrap();
        player.equip(id, SlotKind::Weapon).unwrap();
        player.prestige_multiplier = 1.25;

        // 2.0 (upgrades) * 1.1 (sword) * 1.25 (prestige) * 2 (power-up) * 2 (buff)
        let value = click_value(&team, team.player(pid).unwrap(), 1_000);
        assert!((value - 11.0).abs() < 1e-9);

        let after_buff = click_value(&team, team.player(pid).unwrap(), 60_000);
        assert!((after_buff - 2.75).abs() < 1e-9);
    }

    #[test]
    fn test_crit_chance_comes_from_equipped_bow() {
        let (mut team, pid) = team_with_player();
        assert_eq!(crit_chance(team.player(pid).unwrap()), 0.0);

        let bow = team.instantiate(equipment("short_bow").unwrap());
        let id = bow.id;
        let player = team.player_mut(pid).unwrap();
        player.inventory.push(bow).unwrap();
        assert_eq!(crit_chance(player), 0.0);
        player.equip(id, SlotKind::Weapon).unwrap();
        assert!((crit_chance(player) - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_auto_click_needs_upgrade() {
        let (mut team, _) = team_with_player();
        assert_eq!(auto_click_rate(&team, 0), 0.0);
        team.upgrades.insert("auto_clicker".into(), 3);
        assert_eq!(auto_click_rate(&team, 0), 3.0);
        team.prestige_upgrades.insert("tireless_hands".into());
        assert_eq!(auto_click_rate(&team, 0), 4.5);
    }

    #[test]
    fn test_progress_carries_over() {
        let mut team = TeamState::new(100.0);
        let config = EngineConfig::default();

        assert!(add_progress(&mut team, 99.0, &config).is_empty());
        let reached = add_progress(&mut team, 300.0, &config);
        // 100 for level 2, then 150 for level 3; 149 left over toward 225
        assert_eq!(reached, vec![2, 3]);
        assert_eq!(team.level, 3);
        assert!((team.progress_remaining - 76.0).abs() < 1e-9);
    }

    #[test]
    fn test_buy_upgrade_checks_current_balance() {
        let mut team = TeamState::new(100.0);
        team.coins.credit(30.0);

        assert_eq!(buy_upgrade(&mut team, "click_power"), Ok(1));
        assert_eq!(team.coins.whole(), 15);
        assert_eq!(
            buy_upgrade(&mut team, "click_power"),
            Err(Error::InsufficientFunds {
                required: 17,
                current: 15
            })
        );
        assert_eq!(team.upgrade_level("click_power"), 1);
        assert!(matches!(
            buy_upgrade(&mut team, "nope"),
            Err(Error::UnknownDefinition(_))
        ));
    }

    #[test]
    fn test_upgrade_max_level() {
        let mut team = TeamState::new(100.0);
        team.coins.credit(1e12);
        team.upgrades.insert("coin_magnet".into(), 25);
        assert!(matches!(
            buy_upgrade(&mut team, "coin_magnet"),
            Err(Error::MaxLevel(_))
        ));
    }

    #[test]
    fn test_prestige_upgrade_is_one_shot() {
        let mut team = TeamState::new(100.0);
        team.fragments = 5;
        buy_prestige_upgrade(&mut team, "eternal_click").unwrap();
        assert_eq!(team.fragments, 3);
        assert!(matches!(
            buy_prestige_upgrade(&mut team, "eternal_click"),
            Err(Error::MaxLevel(_))
        ));
        assert_eq!(
            buy_prestige_upgrade(&mut team, "lucky_forge"),
            Err(Error::InsufficientFragments {
                required: 5,
                current: 3
            })
        );
    }

    #[test]
    fn test_garden_upgrades() {
        let mut team = TeamState::new(100.0);
        team.coins.credit(10_000.0);

        assert_eq!(buy_garden_upgrade(&mut team, "extra_plot"), Ok(1));
        assert_eq!(team.garden.plots().len(), 4);
        assert_eq!(buy_garden_upgrade(&mut team, "fertilizer"), Ok(1));
        assert!((team.garden.growth_reduction() - 0.1).abs() < 1e-9);
        assert_eq!(team.coins.whole(), 10_000 - 1_000 - 750);
    }

    #[test]
    fn test_plant_rejects_before_debit() {
        let mut team = TeamState::new(100.0);
        team.coins.credit(150.0);
        plant_seed(&mut team, 0, SeedType::Sunflower, 0).unwrap();
        assert_eq!(team.coins.whole(), 50);

        assert!(plant_seed(&mut team, 0, SeedType::Sunflower, 0).is_err());
        assert!(plant_seed(&mut team, 1, SeedType::Clover, 0).is_err());
        assert_eq!(team.coins.whole(), 50);
        assert!(team.garden.plots()[1].planting.is_none());
    }

    #[test]
    fn test_collect_harvest() {
        let mut team = TeamState::new(100.0);
        collect_harvest(&mut team, Harvest::Coins(400));
        collect_harvest(&mut team, Harvest::ForgeLuck(1));
        collect_harvest(&mut team, Harvest::Fragments(2));
        assert_eq!(team.coins.whole(), 400);
        assert_eq!(team.stats.total_coins_earned, 400.0);
        assert_eq!(team.forge_luck, 1);
        assert_eq!(team.fragments, 2);
    }
}
