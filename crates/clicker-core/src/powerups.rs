//! Active power-up tracking

use crate::catalog::{PowerUpDefinition, PowerUpTarget, POWER_UPS};
use crate::time::{secs, Millis};
use crate::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Runtime state of one power-up
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerUpState {
    pub active: bool,
    pub expires_at: Millis,
}

/// Active flags and expiry timestamps, keyed by power-up id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PowerUps {
    states: IndexMap<String, PowerUpState>,
}

impl PowerUps {
    /// Switch a power-up on until `now + duration`
    pub fn activate(&mut self, def: &PowerUpDefinition, now: Millis) -> Result<PowerUpState> {
        if self.is_active(def.id, now) {
            return Err(Error::invalid(format!("{} is already active", def.name)));
        }
        let state = PowerUpState {
            active: true,
            expires_at: now.saturating_add(secs(def.duration_secs)),
        };
        self.states.insert(def.id.to_string(), state);
        Ok(state)
    }

    pub fn is_active(&self, id: &str, now: Millis) -> bool {
        self.states
            .get(id)
            .is_some_and(|s| s.active && now < s.expires_at)
    }

    /// Clear every power-up whose expiry has passed
    ///
    /// Returns the ids that lapsed during this sweep.
    pub fn sweep(&mut self, now: Millis) -> Vec<String> {
        let mut lapsed = Vec::new();
        for (id, state) in self.states.iter_mut() {
            if state.active && now >= state.expires_at {
                state.active = false;
                lapsed.push(id.clone());
            }
        }
        lapsed
    }

    /// Combined multiplier of every active power-up for a target
    pub fn multiplier(&self, target: PowerUpTarget, now: Millis) -> f64 {
        POWER_UPS
            .iter()
            .filter(|d| d.target == target && self.is_active(d.id, now))
            .map(|d| d.multiplier)
            .product()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PowerUpState)> {
        self.states.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::power_up;

    #[test]
    fn test_activate_and_expire() {
        let mut power_ups = PowerUps::default();
        let def = power_up("double_coins").unwrap();

        let state = power_ups.activate(def, 1_000).unwrap();
        assert_eq!(state.expires_at, 31_000);
        assert_eq!(power_ups.multiplier(PowerUpTarget::ClickValue, 2_000), 2.0);
        assert!(power_ups.activate(def, 2_000).is_err());

        assert!(power_ups.sweep(30_999).is_empty());
        assert_eq!(power_ups.sweep(31_000), vec!["double_coins".to_string()]);
        assert_eq!(power_ups.multiplier(PowerUpTarget::ClickValue, 31_000), 1.0);
        assert!(power_ups.activate(def, 31_000).is_ok());
    }

    #[test]
    fn test_targets_are_independent() {
        let mut power_ups = PowerUps::default();
        power_ups.activate(power_up("frenzy").unwrap(), 0).unwrap();
        assert_eq!(power_ups.multiplier(PowerUpTarget::AutoClick, 1), 3.0);
        assert_eq!(power_ups.multiplier(PowerUpTarget::BossDamage, 1), 1.0);
    }
}
