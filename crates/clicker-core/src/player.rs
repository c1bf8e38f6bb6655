//! Player records: equipment instances, inventory and equipment slots

use crate::catalog::{CharacterClass, EquipmentDefinition, Rarity, SlotKind, Stat, WeaponClass};
use crate::{Error, ItemId, PlayerId, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Default number of inventory slots
pub const INVENTORY_CAPACITY: usize = 10;

/// A concrete piece of equipment owned by one player
///
/// `stats` always holds values already scaled by `rarity.stat_multiplier()`,
/// so dividing by the multiplier recovers the tier-1 base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentInstance {
    pub id: ItemId,
    /// Catalog id of the template this was created from
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub weapon: WeaponClass,
    pub rarity: Rarity,
    pub stats: IndexMap<Stat, f64>,
    pub required_level: u32,
}

impl EquipmentInstance {
    /// Instantiate a catalog template at its base rarity
    pub fn from_definition(id: ItemId, def: &EquipmentDefinition) -> Self {
        let multiplier = def.base_rarity.stat_multiplier();
        Self {
            id,
            kind: def.id.to_string(),
            name: def.name.to_string(),
            weapon: def.weapon,
            rarity: def.base_rarity,
            stats: def.stats.iter().map(|&(s, v)| (s, v * multiplier)).collect(),
            required_level: def.required_level,
        }
    }

    /// Tier-1 base value of a stat
    pub fn base_stat(&self, stat: Stat) -> Option<f64> {
        self.stats
            .get(&stat)
            .map(|v| v / self.rarity.stat_multiplier())
    }

    /// Re-tag to `rarity`, rescaling every stat from its tier-1 base
    pub fn rescale_to(&mut self, rarity: Rarity) {
        let old = self.rarity.stat_multiplier();
        let new = rarity.stat_multiplier();
        for value in self.stats.values_mut() {
            *value = *value / old * new;
        }
        self.rarity = rarity;
    }

    /// Check whether two instances may be fused
    pub fn same_template(&self, other: &EquipmentInstance) -> bool {
        self.kind == other.kind && self.name == other.name && self.rarity == other.rarity
    }

    /// The slot this instance goes into
    pub fn slot(&self) -> SlotKind {
        SlotKind::Weapon
    }
}

/// Bounded, ordered list of a player's equipment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    items: Vec<EquipmentInstance>,
    capacity: usize,
}

impl Inventory {
    /// Create an empty inventory
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Add an item at the end
    ///
    /// Returns the slot index, or `InventoryFull` without touching the list.
    pub fn push(&mut self, item: EquipmentInstance) -> Result<usize> {
        if self.is_full() {
            return Err(Error::InventoryFull {
                capacity: self.capacity,
            });
        }
        self.items.push(item);
        Ok(self.items.len() - 1)
    }

    /// Insert an item at a slot index, clamped to the end
    pub fn insert(&mut self, index: usize, item: EquipmentInstance) -> Result<usize> {
        if self.is_full() {
            return Err(Error::InventoryFull {
                capacity: self.capacity,
            });
        }
        let index = index.min(self.items.len());
        self.items.insert(index, item);
        Ok(index)
    }

    /// Slot index of an item
    pub fn position(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|i| i.id == id)
    }

    pub fn get(&self, id: ItemId) -> Option<&EquipmentInstance> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut EquipmentInstance> {
        self.items.iter_mut().find(|i| i.id == id)
    }

    pub fn get_at(&self, index: usize) -> Option<&EquipmentInstance> {
        self.items.get(index)
    }

    /// Remove the item at a slot index
    pub fn remove_at(&mut self, index: usize) -> Option<EquipmentInstance> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &EquipmentInstance> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new(INVENTORY_CAPACITY)
    }
}

/// Slot-kind to equipped item id
///
/// Every id here must resolve to an entry of the same player's inventory;
/// [`Player`] keeps that true by clearing slots whenever it removes an item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EquipmentSlots {
    slots: IndexMap<SlotKind, ItemId>,
}

impl EquipmentSlots {
    pub fn get(&self, slot: SlotKind) -> Option<ItemId> {
        self.slots.get(&slot).copied()
    }

    /// Put an item in a slot, returning the previous occupant
    pub fn set(&mut self, slot: SlotKind, item: ItemId) -> Option<ItemId> {
        self.slots.insert(slot, item)
    }

    /// Empty a slot
    pub fn clear(&mut self, slot: SlotKind) -> Option<ItemId> {
        self.slots.shift_remove(&slot)
    }

    /// Clear every slot that references `item`
    pub fn clear_item(&mut self, item: ItemId) -> bool {
        let before = self.slots.len();
        self.slots.retain(|_, id| *id != item);
        self.slots.len() != before
    }

    /// Check whether `item` is equipped anywhere
    pub fn contains(&self, item: ItemId) -> bool {
        self.slots.values().any(|id| *id == item)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SlotKind, ItemId)> + '_ {
        self.slots.iter().map(|(s, i)| (*s, *i))
    }
}

/// Per-connection player record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub character: Option<CharacterClass>,
    pub inventory: Inventory,
    pub slots: EquipmentSlots,
    pub level: u32,
    /// Lifetime manual clicks
    pub clicks: u64,
    /// Lifetime coins contributed by this player's clicks
    pub contribution: f64,
    pub prestige_count: u32,
    pub prestige_multiplier: f64,
}

impl Player {
    /// Create a fresh level-1 player
    pub fn new(id: PlayerId, name: impl Into<String>, inventory_capacity: usize) -> Self {
        Self {
            id,
            name: name.into(),
            character: None,
            inventory: Inventory::new(inventory_capacity),
            slots: EquipmentSlots::default(),
            level: 1,
            clicks: 0,
            contribution: 0.0,
            prestige_count: 0,
            prestige_multiplier: 1.0,
        }
    }

    /// Credit one click worth `value` coins
    pub fn record_click(&mut self, value: f64, clicks_per_level: u64) {
        self.clicks += 1;
        self.contribution += value;
        self.level = 1 + (self.clicks / clicks_per_level.max(1)) as u32;
    }

    /// Put an inventory item into a slot
    ///
    /// Whatever was in the slot before stays in the inventory.
    pub fn equip(&mut self, item_id: ItemId, slot: SlotKind) -> Result<Option<ItemId>> {
        let item = self
            .inventory
            .get(item_id)
            .ok_or(Error::ItemNotFound(item_id))?;
        if item.slot() != slot {
            return Err(Error::invalid(format!("{} does not fit the {:?} slot", item.name, slot)));
        }
        if item.required_level > self.level {
            return Err(Error::LevelTooLow {
                required: item.required_level,
                current: self.level,
            });
        }
        if let Some(class) = self.character {
            if item.weapon.wielder() != class {
                return Err(Error::invalid(format!(
                    "{:?} cannot wield a {:?}",
                    class, item.weapon
                )));
            }
        }
        Ok(self.slots.set(slot, item_id))
    }

    /// Take an item out of a slot; it stays in the inventory
    pub fn unequip(&mut self, item_id: ItemId, slot: SlotKind) -> Result<()> {
        if self.inventory.get(item_id).is_none() {
            return Err(Error::ItemNotFound(item_id));
        }
        if self.slots.get(slot) != Some(item_id) {
            return Err(Error::invalid(format!("{} is not equipped", item_id)));
        }
        self.slots.clear(slot);
        Ok(())
    }

    /// Remove an item from the inventory, clearing any slot that held it
    pub fn remove_item(&mut self, item_id: ItemId) -> Result<EquipmentInstance> {
        let index = self
            .inventory
            .position(item_id)
            .ok_or(Error::ItemNotFound(item_id))?;
        self.remove_at(index)
            .ok_or(Error::ItemNotFound(item_id))
    }

    /// Remove the item at a slot index, clearing any slot that held it
    pub fn remove_at(&mut self, index: usize) -> Option<EquipmentInstance> {
        let item = self.inventory.remove_at(index)?;
        self.slots.clear_item(item.id);
        Some(item)
    }

    /// The item in a slot
    pub fn equipped(&self, slot: SlotKind) -> Option<&EquipmentInstance> {
        self.slots.get(slot).and_then(|id| self.inventory.get(id))
    }

    /// Sum of every equipped stat
    pub fn bonus_stats(&self) -> IndexMap<Stat, f64> {
        let mut totals = IndexMap::new();
        for (_, id) in self.slots.iter() {
            if let Some(item) = self.inventory.get(id) {
                for (stat, value) in &item.stats {
                    *totals.entry(*stat).or_insert(0.0) += value;
                }
            }
        }
        totals
    }

    /// Equipped bonus for one stat
    pub fn stat_bonus(&self, stat: Stat) -> f64 {
        self.bonus_stats().get(&stat).copied().unwrap_or(0.0)
    }
}
