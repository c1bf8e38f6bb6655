//! Merge-on-receive for full state updates
//!
//! Not every mutation path recomputes every derived field, so a full update
//! may arrive with some of them missing. Overwriting blindly would make a
//! prestige bonus or an achievement flash back to zero on screen.
//!
//! Field policy:
//!
//! | Field                               | Policy                          |
//! |-------------------------------------|---------------------------------|
//! | `achievements`                      | incoming, else keep local       |
//! | `achievement_boost`                 | incoming, else keep local       |
//! | `players[].bonus_stats`             | incoming, else keep local       |
//! | `players[].prestige_count`          | incoming, else keep local       |
//! | `players[].prestige_multiplier`     | incoming, else keep local       |
//! | everything else                     | incoming                        |
//!
//! Players are matched by id. A player missing from the incoming snapshot
//! has left and is dropped; a new one is taken as is.

use crate::view::{GameStateView, PlayerView};

/// Merge an incoming full snapshot over the locally cached one
pub fn reconcile(local: &GameStateView, incoming: GameStateView) -> GameStateView {
    let mut merged = incoming;

    if merged.achievements.is_none() {
        merged.achievements = local.achievements.clone();
    }
    if merged.achievement_boost.is_none() {
        merged.achievement_boost = local.achievement_boost;
    }
    for player in &mut merged.players {
        if let Some(known) = local.player(player.id) {
            keep_player_fields(known, player);
        }
    }
    merged
}

fn keep_player_fields(local: &PlayerView, incoming: &mut PlayerView) {
    if incoming.bonus_stats.is_none() {
        incoming.bonus_stats = local.bonus_stats.clone();
    }
    if incoming.prestige_count.is_none() {
        incoming.prestige_count = local.prestige_count;
    }
    if incoming.prestige_multiplier.is_none() {
        incoming.prestige_multiplier = local.prestige_multiplier;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clicker_core::{PlayerId, TeamState};

    fn team_view() -> GameStateView {
        let mut team = TeamState::new(100.0);
        team.add_player(PlayerId(1), "ana", 10).unwrap();
        team.add_player(PlayerId(2), "bo", 10).unwrap();
        team.player_mut(PlayerId(1)).unwrap().prestige_count = 2;
        team.player_mut(PlayerId(1)).unwrap().prestige_multiplier = 1.5;
        GameStateView::from_team(&team)
    }

    #[test]
    fn test_absent_achievements_keep_local() {
        let mut local = team_view();
        local.achievements = Some(vec!["first_click".into(), "clicker".into()]);
        local.achievement_boost = Some(1.06);

        let mut incoming = team_view().without_derived();
        incoming.coins = 500.0;

        let merged = reconcile(&local, incoming);
        assert_eq!(
            merged.achievements,
            Some(vec!["first_click".to_string(), "clicker".to_string()])
        );
        assert_eq!(merged.achievement_boost, Some(1.06));
        assert_eq!(merged.coins, 500.0);
    }

    #[test]
    fn test_present_fields_win() {
        let mut local = team_view();
        local.achievements = Some(vec!["first_click".into()]);

        let mut incoming = team_view();
        incoming.achievements = Some(vec![]);

        let merged = reconcile(&local, incoming);
        assert_eq!(merged.achievements, Some(vec![]));
    }

    #[test]
    fn test_prestige_does_not_flash_back() {
        let local = team_view();
        let incoming = team_view().without_derived();

        let merged = reconcile(&local, incoming);
        let ana = merged.player(PlayerId(1)).unwrap();
        assert_eq!(ana.prestige_count, Some(2));
        assert_eq!(ana.prestige_multiplier, Some(1.5));
        assert!(ana.bonus_stats.is_some());
    }

    #[test]
    fn test_players_follow_incoming_roster() {
        let local = team_view();
        let mut incoming = team_view().without_derived();
        incoming.players.retain(|p| p.id == PlayerId(2));

        let merged = reconcile(&local, incoming);
        assert_eq!(merged.players.len(), 1);
        assert_eq!(merged.players[0].prestige_count, Some(0));
        assert!(merged.player(PlayerId(1)).is_none());
    }

    #[test]
    fn test_nothing_local_to_keep() {
        let mut local = team_view();
        local.achievements = None;
        let incoming = team_view().without_derived();
        let merged = reconcile(&local, incoming);
        assert_eq!(merged.achievements, None);
    }
}
