//! Fusion: deterministic merge of two identical items

use crate::player::{EquipmentInstance, Player};
use crate::{Error, ItemId, Result};

/// Merge the items at two inventory positions into one of the next tier
///
/// Positions, not ids, decide self-fusion: the same index twice is
/// `SameSlot` even though two distinct instances can look identical. The
/// fused item takes `new_id`, keeps the tier-1 base of its sources and is
/// placed where the earlier of the two sources sat.
pub fn fuse_at(
    player: &mut Player,
    first: usize,
    second: usize,
    new_id: ItemId,
) -> Result<EquipmentInstance> {
    if first == second {
        return Err(Error::SameSlot);
    }
    let a = player
        .inventory
        .get_at(first)
        .ok_or_else(|| Error::invalid(format!("no item at slot {}", first)))?;
    let b = player
        .inventory
        .get_at(second)
        .ok_or_else(|| Error::invalid(format!("no item at slot {}", second)))?;

    if !a.same_template(b) {
        return Err(Error::Incompatible(format!(
            "{} ({}) and {} ({}) differ",
            a.name, a.rarity, b.name, b.rarity
        )));
    }
    let next = a.rarity.successor().ok_or(Error::MaxRarityReached(a.rarity))?;

    let mut fused = a.clone();
    fused.id = new_id;
    fused.rescale_to(next);

    let (low, high) = if first < second {
        (first, second)
    } else {
        (second, first)
    };
    player.remove_at(high);
    player.remove_at(low);
    player.inventory.insert(low, fused.clone())?;
    Ok(fused)
}

/// Merge two items named by id
///
/// Both ids are resolved to positions first; passing the same id twice
/// therefore resolves to one position and fails with `SameSlot`.
pub fn fuse(
    player: &mut Player,
    first: ItemId,
    second: ItemId,
    new_id: ItemId,
) -> Result<EquipmentInstance> {
    let a = player
        .inventory
        .position(first)
        .ok_or(Error::ItemNotFound(first))?;
    let b = player
        .inventory
        .position(second)
        .ok_or(Error::ItemNotFound(second))?;
    fuse_at(player, a, b, new_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{equipment, Rarity, SlotKind, Stat};
    use crate::player::INVENTORY_CAPACITY;
    use crate::PlayerId;

    fn item(id: u64, def: &str) -> EquipmentInstance {
        EquipmentInstance::from_definition(ItemId(id), equipment(def).unwrap())
    }

    fn player_with(items: Vec<EquipmentInstance>) -> Player {
        let mut p = Player::new(PlayerId(1), "ana", INVENTORY_CAPACITY);
        for i in items {
            p.inventory.push(i).unwrap();
        }
        p
    }

    #[test]
    fn test_fuse_identical_pair() {
        let mut p = player_with(vec![
            item(1, "oak_staff"),
            item(2, "rusty_sword"),
            item(3, "oak_staff"),
        ]);

        let fused = fuse(&mut p, ItemId(1), ItemId(3), ItemId(10)).unwrap();
        assert_eq!(fused.rarity, Rarity::Uncommon);
        assert!((fused.stats[&Stat::AutoClickPower] - 0.125).abs() < 1e-9);

        assert_eq!(p.inventory.len(), 2);
        assert_eq!(p.inventory.position(ItemId(10)), Some(0));
        assert!(p.inventory.get(ItemId(1)).is_none());
        assert!(p.inventory.get(ItemId(3)).is_none());
    }

    #[test]
    fn test_same_slot_rejected() {
        let mut p = player_with(vec![item(1, "oak_staff")]);
        assert_eq!(fuse_at(&mut p, 0, 0, ItemId(10)), Err(Error::SameSlot));
        assert_eq!(fuse(&mut p, ItemId(1), ItemId(1), ItemId(10)), Err(Error::SameSlot));
        assert_eq!(p.inventory.len(), 1);
    }

    #[test]
    fn test_indistinguishable_instances_fuse() {
        // Two instances that share an id still sit at different positions
        let mut p = player_with(vec![item(7, "short_bow"), item(7, "short_bow")]);
        let fused = fuse_at(&mut p, 1, 0, ItemId(8)).unwrap();
        assert_eq!(fused.id, ItemId(8));
        assert_eq!(p.inventory.len(), 1);
    }

    #[test]
    fn test_incompatible_pairs() {
        let mut upgraded = item(2, "oak_staff");
        upgraded.rescale_to(Rarity::Rare);
        let mut p = player_with(vec![item(1, "oak_staff"), upgraded, item(3, "short_bow")]);

        assert!(matches!(fuse_at(&mut p, 0, 1, ItemId(9)), Err(Error::Incompatible(_))));
        assert!(matches!(fuse_at(&mut p, 0, 2, ItemId(9)), Err(Error::Incompatible(_))));
        assert_eq!(p.inventory.len(), 3);
    }

    #[test]
    fn test_legendary_pair_rejected() {
        let mut a = item(1, "rusty_sword");
        let mut b = item(2, "rusty_sword");
        a.rescale_to(Rarity::Legendary);
        b.rescale_to(Rarity::Legendary);
        let mut p = player_with(vec![a, b]);
        assert_eq!(
            fuse_at(&mut p, 0, 1, ItemId(3)),
            Err(Error::MaxRarityReached(Rarity::Legendary))
        );
    }

    #[test]
    fn test_fusing_equipped_source_clears_slot() {
        let mut p = player_with(vec![item(1, "rusty_sword"), item(2, "rusty_sword")]);
        p.equip(ItemId(2), SlotKind::Weapon).unwrap();

        fuse(&mut p, ItemId(1), ItemId(2), ItemId(3)).unwrap();
        assert!(p.slots.get(SlotKind::Weapon).is_none());
    }

    #[test]
    fn test_missing_positions() {
        let mut p = player_with(vec![item(1, "rusty_sword")]);
        assert!(fuse_at(&mut p, 0, 4, ItemId(3)).is_err());
        assert_eq!(
            fuse(&mut p, ItemId(1), ItemId(5), ItemId(3)),
            Err(Error::ItemNotFound(ItemId(5)))
        );
    }
}
