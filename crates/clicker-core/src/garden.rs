//! The shared garden: plots, plantings and harvests

use crate::catalog::{seed, Harvest, SeedType};
use crate::time::{secs, Millis};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Plots every team starts with
pub const BASE_PLOTS: usize = 3;

/// Hard cap on plots, upgrades included
pub const MAX_PLOTS: usize = 6;

/// A seed in the ground
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Planting {
    pub seed: SeedType,
    pub planted_at: Millis,
    pub growth_ms: Millis,
}

impl Planting {
    pub fn ready_at(&self) -> Millis {
        self.planted_at.saturating_add(self.growth_ms)
    }

    pub fn is_grown(&self, now: Millis) -> bool {
        now >= self.ready_at()
    }
}

/// One garden plot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plot {
    pub id: u32,
    pub planting: Option<Planting>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Garden {
    plots: Vec<Plot>,
    /// Fraction shaved off every growth duration
    growth_reduction: f64,
}

impl Default for Garden {
    fn default() -> Self {
        Self {
            plots: (0..BASE_PLOTS as u32)
                .map(|id| Plot { id, planting: None })
                .collect(),
            growth_reduction: 0.0,
        }
    }
}

impl Garden {
    pub fn plots(&self) -> &[Plot] {
        &self.plots
    }

    fn plot_mut(&mut self, slot_id: u32) -> Result<&mut Plot> {
        self.plots
            .iter_mut()
            .find(|p| p.id == slot_id)
            .ok_or_else(|| Error::UnknownDefinition(format!("garden plot {}", slot_id)))
    }

    /// Check whether a plot exists and is empty
    pub fn check_plantable(&self, slot_id: u32) -> Result<()> {
        let plot = self
            .plots
            .iter()
            .find(|p| p.id == slot_id)
            .ok_or_else(|| Error::UnknownDefinition(format!("garden plot {}", slot_id)))?;
        if plot.planting.is_some() {
            return Err(Error::invalid(format!("plot {} is already planted", slot_id)));
        }
        Ok(())
    }

    /// Put a seed in an empty plot
    pub fn plant(&mut self, slot_id: u32, seed_type: SeedType, now: Millis) -> Result<Planting> {
        self.check_plantable(slot_id)?;
        let base = secs(seed(seed_type).growth_secs) as f64;
        let planting = Planting {
            seed: seed_type,
            planted_at: now,
            growth_ms: (base * (1.0 - self.growth_reduction)).round() as Millis,
        };
        self.plot_mut(slot_id)?.planting = Some(planting);
        Ok(planting)
    }

    /// Harvest a fully grown plot, emptying it
    pub fn harvest(&mut self, slot_id: u32, now: Millis) -> Result<Harvest> {
        let plot = self.plot_mut(slot_id)?;
        let planting = plot
            .planting
            .ok_or_else(|| Error::invalid(format!("plot {} is empty", slot_id)))?;
        if !planting.is_grown(now) {
            return Err(Error::invalid(format!(
                "plot {} is still growing ({}s left)",
                slot_id,
                (planting.ready_at() - now).div_ceil(1_000)
            )));
        }
        plot.planting = None;
        Ok(seed(planting.seed).yield_)
    }

    /// Harvest every grown plot
    pub fn harvest_all(&mut self, now: Millis) -> Vec<(u32, Harvest)> {
        let ready: Vec<u32> = self
            .plots
            .iter()
            .filter(|p| p.planting.is_some_and(|pl| pl.is_grown(now)))
            .map(|p| p.id)
            .collect();
        ready
            .into_iter()
            .filter_map(|id| self.harvest(id, now).ok().map(|h| (id, h)))
            .collect()
    }

    /// Add one more plot
    pub fn add_plot(&mut self) -> Result<u32> {
        if self.plots.len() >= MAX_PLOTS {
            return Err(Error::invalid("the garden has no room for more plots"));
        }
        let id = self.plots.len() as u32;
        self.plots.push(Plot { id, planting: None });
        Ok(id)
    }

    /// Set the growth-time reduction, capped at one half
    pub fn set_growth_reduction(&mut self, reduction: f64) {
        self.growth_reduction = reduction.clamp(0.0, 0.5);
    }

    pub fn growth_reduction(&self) -> f64 {
        self.growth_reduction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plant_and_harvest() {
        let mut garden = Garden::default();
        let planting = garden.plant(0, SeedType::Sunflower, 1_000).unwrap();
        assert_eq!(planting.ready_at(), 121_000);

        assert!(garden.plant(0, SeedType::Clover, 2_000).is_err());
        assert!(garden.harvest(0, 120_999).is_err());
        assert_eq!(garden.harvest(0, 121_000), Ok(Harvest::Coins(400)));
        assert!(garden.plots()[0].planting.is_none());
    }

    #[test]
    fn test_harvest_all_skips_growing() {
        let mut garden = Garden::default();
        garden.plant(0, SeedType::Sunflower, 0).unwrap();
        garden.plant(1, SeedType::Starfruit, 0).unwrap();

        let harvested = garden.harvest_all(secs(200));
        assert_eq!(harvested, vec![(0, Harvest::Coins(400))]);
        assert!(garden.plots()[1].planting.is_some());
    }

    #[test]
    fn test_fertilizer_shortens_growth() {
        let mut garden = Garden::default();
        garden.set_growth_reduction(0.2);
        let planting = garden.plant(2, SeedType::Sunflower, 0).unwrap();
        assert_eq!(planting.growth_ms, 96_000);

        garden.set_growth_reduction(0.9);
        assert_eq!(garden.growth_reduction(), 0.5);
    }

    #[test]
    fn test_plot_cap() {
        let mut garden = Garden::default();
        for _ in BASE_PLOTS..MAX_PLOTS {
            garden.add_plot().unwrap();
        }
        assert!(garden.add_plot().is_err());
        assert!(garden.plant(99, SeedType::Clover, 0).is_err());
    }
}
