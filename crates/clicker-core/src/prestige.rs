//! Prestige: trade a run's progress for fragments and a permanent bonus

use crate::config::EngineConfig;
use crate::economy::starting_coins;
use crate::team::TeamState;
use crate::{Error, Result};

/// What a prestige reset granted
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrestigeOutcome {
    pub fragments: u64,
    pub starting_coins: f64,
    /// Team prestige runs after this reset
    pub runs: u32,
}

/// Fragments a reset at `level` is worth
pub fn fragments_for(level: u32) -> u64 {
    u64::from(level / 5)
}

/// Reset the run
///
/// Coins, level, progress, upgrade levels and any boss are cleared. Every
/// connected player gains one prestige count; inventories, the garden,
/// achievements and prestige unlocks survive.
pub fn prestige(team: &mut TeamState, config: &EngineConfig) -> Result<PrestigeOutcome> {
    if team.level < config.prestige_min_level {
        return Err(Error::LevelTooLow {
            required: config.prestige_min_level,
            current: team.level,
        });
    }
    let fragments = fragments_for(team.level);
    let start = starting_coins(team);

    team.fragments += fragments;
    team.prestige_runs += 1;
    team.coins.reset(start);
    team.level = 1;
    team.level_requirement = config.first_level_requirement;
    team.progress_remaining = config.first_level_requirement;
    for level in team.upgrades.values_mut() {
        *level = 0;
    }
    team.boss.clear();
    team.victory_buff = None;

    for player in team.players.values_mut() {
        player.prestige_count += 1;
        player.prestige_multiplier =
            1.0 + config.prestige_bonus_per_count * player.prestige_count as f64;
    }

    Ok(PrestigeOutcome {
        fragments,
        starting_coins: start,
        runs: team.prestige_runs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::equipment;
    use crate::PlayerId;

    #[test]
    fn test_requires_min_level() {
        let mut team = TeamState::new(100.0);
        team.level = 9;
        assert_eq!(
            prestige(&mut team, &EngineConfig::default()),
            Err(Error::LevelTooLow {
                required: 10,
                current: 9
            })
        );
    }

    #[test]
    fn test_reset_keeps_inventory() {
        let config = EngineConfig::default();
        let mut team = TeamState::new(100.0);
        let pid = PlayerId(1);
        team.add_player(pid, "ana", 10).unwrap();
        let staff = team.instantiate(equipment("oak_staff").unwrap());
        team.player_mut(pid).unwrap().inventory.push(staff).unwrap();

        team.level = 12;
        team.coins.credit(50_000.0);
        team.upgrades.insert("click_power".into(), 7);
        team.prestige_upgrades.insert("head_start".into());

        let outcome = prestige(&mut team, &config).unwrap();
        assert_eq!(outcome.fragments, 2);
        assert_eq!(outcome.runs, 1);
        assert_eq!(team.coins.whole(), 500);
        assert_eq!(team.level, 1);
        assert_eq!(team.upgrade_level("click_power"), 0);

        let player = team.player(pid).unwrap();
        assert_eq!(player.inventory.len(), 1);
        assert_eq!(player.prestige_count, 1);
        assert_eq!(player.prestige_multiplier, 1.25);

        team.level = 10;
        prestige(&mut team, &config).unwrap();
        assert_eq!(team.player(pid).unwrap().prestige_multiplier, 1.5);
        assert_eq!(team.fragments, 4);
    }
}
