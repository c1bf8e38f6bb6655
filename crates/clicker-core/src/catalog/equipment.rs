//! Equipment definitions, stats and character classes

use super::Rarity;
use serde::{Deserialize, Serialize};

/// A stat that equipment can boost, as a fractional bonus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Stat {
    ClickPower,
    AutoClickPower,
    CoinBonus,
    BossDamage,
    CritChance,
}

/// Playable character class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterClass {
    Warrior,
    Archer,
    Mage,
}

/// Weapon family; each belongs to exactly one class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeaponClass {
    Sword,
    Bow,
    Staff,
}

impl WeaponClass {
    /// The character class that wields this weapon
    pub fn wielder(self) -> CharacterClass {
        match self {
            WeaponClass::Sword => CharacterClass::Warrior,
            WeaponClass::Bow => CharacterClass::Archer,
            WeaponClass::Staff => CharacterClass::Mage,
        }
    }
}

/// Slot an equipment instance can occupy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotKind {
    Weapon,
}

/// Immutable equipment template
#[derive(Debug, Clone, PartialEq)]
pub struct EquipmentDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub weapon: WeaponClass,
    pub base_rarity: Rarity,
    /// Tier-1 fractional bonuses (`0.1` = +10 %)
    pub stats: &'static [(Stat, f64)],
    pub required_level: u32,
}

pub static EQUIPMENT: &[EquipmentDefinition] = &[
    EquipmentDefinition {
        id: "rusty_sword",
        name: "Rusty Sword",
        weapon: WeaponClass::Sword,
        base_rarity: Rarity::Normal,
        stats: &[(Stat::ClickPower, 0.10)],
        required_level: 1,
    },
    EquipmentDefinition {
        id: "knight_blade",
        name: "Knight Blade",
        weapon: WeaponClass::Sword,
        base_rarity: Rarity::Normal,
        stats: &[(Stat::ClickPower, 0.20), (Stat::BossDamage, 0.10)],
        required_level: 5,
    },
    EquipmentDefinition {
        id: "short_bow",
        name: "Short Bow",
        weapon: WeaponClass::Bow,
        base_rarity: Rarity::Normal,
        stats: &[(Stat::CritChance, 0.05), (Stat::ClickPower, 0.05)],
        required_level: 1,
    },
    EquipmentDefinition {
        id: "hunter_longbow",
        name: "Hunter Longbow",
        weapon: WeaponClass::Bow,
        base_rarity: Rarity::Normal,
        stats: &[(Stat::CritChance, 0.08), (Stat::BossDamage, 0.15)],
        required_level: 5,
    },
    EquipmentDefinition {
        id: "oak_staff",
        name: "Oak Staff",
        weapon: WeaponClass::Staff,
        base_rarity: Rarity::Normal,
        stats: &[(Stat::AutoClickPower, 0.10)],
        required_level: 1,
    },
    EquipmentDefinition {
        id: "crystal_staff",
        name: "Crystal Staff",
        weapon: WeaponClass::Staff,
        base_rarity: Rarity::Normal,
        stats: &[(Stat::AutoClickPower, 0.15), (Stat::CoinBonus, 0.10)],
        required_level: 5,
    },
];

/// Look up an equipment definition by id
pub fn equipment(id: &str) -> Option<&'static EquipmentDefinition> {
    EQUIPMENT.iter().find(|e| e.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let def = equipment("oak_staff").unwrap();
        assert_eq!(def.weapon.wielder(), CharacterClass::Mage);
        assert!(equipment("laser_cannon").is_none());
    }

    #[test]
    fn test_every_class_has_a_starter_weapon() {
        for class in [CharacterClass::Warrior, CharacterClass::Archer, CharacterClass::Mage] {
            assert!(EQUIPMENT
                .iter()
                .any(|e| e.weapon.wielder() == class && e.required_level == 1));
        }
    }

    #[test]
    fn test_ids_unique() {
        for (i, a) in EQUIPMENT.iter().enumerate() {
            for b in &EQUIPMENT[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }
}
