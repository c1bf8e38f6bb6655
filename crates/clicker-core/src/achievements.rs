//! Achievement unlock tracking

use crate::catalog::{AchievementCategory, AchievementDefinition, ACHIEVEMENTS};
use crate::team::TeamStats;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// Set of unlocked achievement ids
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Achievements {
    unlocked: IndexSet<String>,
}

impl Achievements {
    /// Unlock everything whose threshold is now met
    ///
    /// Returns only the achievements unlocked by this call.
    pub fn evaluate(&mut self, stats: &TeamStats, level: u32) -> Vec<&'static AchievementDefinition> {
        let mut fresh = Vec::new();
        for def in ACHIEVEMENTS {
            if self.unlocked.contains(def.id) {
                continue;
            }
            let value = match def.category {
                AchievementCategory::Clicks => stats.total_clicks as f64,
                AchievementCategory::Coins => stats.total_coins_earned,
                AchievementCategory::Level => level as f64,
                AchievementCategory::Bosses => stats.bosses_defeated as f64,
                AchievementCategory::Forge => stats.forge_successes as f64,
            };
            if value >= def.threshold {
                self.unlocked.insert(def.id.to_string());
                fresh.push(def);
            }
        }
        fresh
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.contains(id)
    }

    pub fn len(&self) -> usize {
        self.unlocked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unlocked.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.unlocked.iter().map(|s| s.as_str())
    }

    /// Product of every unlocked achievement's click boost
    pub fn boost(&self) -> f64 {
        ACHIEVEMENTS
            .iter()
            .filter(|d| self.unlocked.contains(d.id))
            .map(|d| 1.0 + d.boost)
            .product()
    }

    /// Unlocked and total counts per category
    pub fn by_category(&self) -> IndexMap<AchievementCategory, (usize, usize)> {
        let mut counts = IndexMap::new();
        for def in ACHIEVEMENTS {
            let entry = counts.entry(def.category).or_insert((0, 0));
            entry.1 += 1;
            if self.unlocked.contains(def.id) {
                entry.0 += 1;
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlocks_once() {
        let mut achievements = Achievements::default();
        let stats = TeamStats {
            total_clicks: 1,
            ..Default::default()
        };

        let fresh = achievements.evaluate(&stats, 1);
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].id, "first_click");
        assert!(achievements.evaluate(&stats, 1).is_empty());
        assert!((achievements.boost() - 1.01).abs() < 1e-9);
    }

    #[test]
    fn test_by_category() {
        let mut achievements = Achievements::default();
        let stats = TeamStats {
            bosses_defeated: 1,
            ..Default::default()
        };
        achievements.evaluate(&stats, 10);

        let counts = achievements.by_category();
        assert_eq!(counts[&AchievementCategory::Bosses], (1, 2));
        assert_eq!(counts[&AchievementCategory::Level], (1, 1));
        assert_eq!(counts[&AchievementCategory::Clicks].0, 0);
    }

    #[test]
    fn test_empty_boost_is_identity() {
        assert_eq!(Achievements::default().boost(), 1.0);
    }
}
