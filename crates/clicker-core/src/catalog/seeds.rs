//! Garden seeds and what they yield

use serde::{Deserialize, Serialize};

/// Plantable seed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedType {
    Sunflower,
    Clover,
    Starfruit,
}

/// Resource produced by a harvest
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "amount")]
pub enum Harvest {
    Coins(u64),
    ForgeLuck(u32),
    Fragments(u64),
}

/// Seed template
#[derive(Debug, Clone, PartialEq)]
pub struct SeedDefinition {
    pub seed: SeedType,
    pub name: &'static str,
    pub price: u64,
    pub growth_secs: u64,
    pub yield_: Harvest,
}

pub static SEEDS: &[SeedDefinition] = &[
    SeedDefinition {
        seed: SeedType::Sunflower,
        name: "Sunflower",
        price: 100,
        growth_secs: 120,
        yield_: Harvest::Coins(400),
    },
    SeedDefinition {
        seed: SeedType::Clover,
        name: "Lucky Clover",
        price: 500,
        growth_secs: 600,
        yield_: Harvest::ForgeLuck(1),
    },
    SeedDefinition {
        seed: SeedType::Starfruit,
        name: "Starfruit",
        price: 5_000,
        growth_secs: 1_800,
        yield_: Harvest::Fragments(1),
    },
];

/// Look up the definition of a seed
pub fn seed(seed: SeedType) -> &'static SeedDefinition {
    // every SeedType variant has an entry
    match seed {
        SeedType::Sunflower => &SEEDS[0],
        SeedType::Clover => &SEEDS[1],
        SeedType::Starfruit => &SEEDS[2],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_table_matches_variants() {
        for def in SEEDS {
            assert_eq!(seed(def.seed).seed, def.seed);
        }
    }
}
