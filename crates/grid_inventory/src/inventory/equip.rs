//! Equip and unequip transactions

use super::Inventory;
use crate::equipment::EquipmentSlotType;
use crate::error::{InventoryError, Result};
use crate::events::InventoryEvent;
use crate::id::InstanceId;
use crate::slot::Slot;

impl Inventory {
    /// Move a grid slot into an equipment slot.
    ///
    /// Tries the item's primary slot, then its secondary slot, and finally
    /// swaps with whatever occupies the primary slot. A swap only happens if
    /// the displaced item fits back into the grid in full; otherwise nothing
    /// changes. Returns the equipment slot used.
    pub fn equip_item_on_slot(&mut self, id: InstanceId) -> Result<EquipmentSlotType> {
        if self.equipment.is_empty() {
            return Err(InventoryError::EquipmentNotConfigured);
        }

        let index = self.slot_index(id).ok_or(InventoryError::SlotNotFound(id))?;
        let item = match self.slots[index].item() {
            Some(item) if self.slots[index].is_occupied() => item.clone(),
            _ => return Err(InventoryError::SlotEmpty),
        };

        if !item.equippable {
            return Err(InventoryError::ItemNotEquippable(item.id.clone()));
        }
        if !item.has_valid_equipment_slot() {
            return Err(InventoryError::InvalidEquipmentSlot(item.primary_equipment_slot));
        }
        if !self.equipment.is_valid_configuration() {
            return Err(InventoryError::EquipmentNotConfigured);
        }

        let primary = item.primary_equipment_slot;
        let secondary = item.secondary_equipment_slot;
        let primary_occupied = match self.equipment.get(primary) {
            Some(slot) => slot.is_occupied(),
            None => return Err(InventoryError::InvalidEquipmentSlot(primary)),
        };
        let secondary_free = self
            .equipment
            .get(secondary)
            .map_or(false, |slot| !slot.is_occupied());

        let target = if !primary_occupied {
            primary
        } else if secondary_free {
            secondary
        } else {
            self.swap_into_equipment(index, primary)?;
            self.finish_equip(primary);
            return Ok(primary);
        };

        let mut slot = self.slots.remove(index);
        if let Some(instance) = slot.instance_mut() {
            instance.reset_rotation();
        }
        if let Some(equipment_slot) = self.equipment.get_mut(target) {
            equipment_slot.data = slot;
        }
        self.finish_equip(target);
        Ok(target)
    }

    fn swap_into_equipment(&mut self, index: usize, target: EquipmentSlotType) -> Result<()> {
        let displaced = match self.equipment.get(target) {
            Some(equipment_slot) => equipment_slot.data.clone(),
            None => return Err(InventoryError::InvalidEquipmentSlot(target)),
        };

        // The displaced item goes back while the incoming slot still holds
        // its cells and weight. New slots are pushed, so `index` stays valid.
        if let Some(instance) = displaced.instance().cloned() {
            let slots_snapshot = self.slots.clone();
            let quantity = displaced.quantity();
            let returned = matches!(
                self.add_existing_item_internal(instance, quantity),
                Ok(added) if added == quantity
            );

            if !returned {
                self.slots = slots_snapshot;
                self.recompute_weight();
                let item_id = displaced
                    .item()
                    .map(|item| item.id.clone())
                    .unwrap_or_default();
                log::debug!("Equip swap abandoned: no room for '{}'", item_id);
                return Err(InventoryError::EquipmentSlotBusy(item_id));
            }
        }

        let mut incoming = self.slots.remove(index);
        if let Some(instance) = incoming.instance_mut() {
            instance.reset_rotation();
        }
        if let Some(equipment_slot) = self.equipment.get_mut(target) {
            equipment_slot.data = incoming;
        }
        Ok(())
    }

    fn finish_equip(&mut self, target: EquipmentSlotType) {
        self.recompute_weight();
        let equipped = self
            .equipment
            .get(target)
            .and_then(|slot| slot.data.item().map(|item| (item.clone(), slot.data.quantity())));

        if let Some((item, quantity)) = equipped {
            log::debug!("Equipped '{}' into {:?}", item.id, target);
            self.notify(InventoryEvent::ItemEquipped {
                item,
                quantity,
                slot: target,
            });
        }
        self.notify_changed();
    }

    /// Return an equipped item to the grid.
    ///
    /// The equipment slot is only cleared when the full quantity fits back
    /// into the grid. Returns the quantity moved.
    pub fn unequip_item(&mut self, slot_type: EquipmentSlotType) -> Result<u32> {
        let equipped = match self.equipment.get(slot_type) {
            Some(slot) => slot.data.clone(),
            None => return Err(InventoryError::InvalidEquipmentSlot(slot_type)),
        };
        let (instance, quantity) = match equipped.instance() {
            Some(instance) if equipped.is_occupied() => (instance.clone(), equipped.quantity()),
            _ => return Err(InventoryError::SlotEmpty),
        };
        let item = instance.item().clone();

        let slots_snapshot = self.slots.clone();
        match self.add_existing_item_internal(instance, quantity) {
            Ok(added) if added == quantity => {}
            Ok(_) | Err(InventoryError::InsufficientSpace { .. }) => {
                self.slots = slots_snapshot;
                self.recompute_weight();
                log::debug!("Cannot unequip '{}': no room in the grid", item.id);
                return Err(InventoryError::InsufficientSpace { added: 0 });
            }
            Err(err) => {
                self.slots = slots_snapshot;
                self.recompute_weight();
                return Err(err);
            }
        }

        if let Some(slot) = self.equipment.get_mut(slot_type) {
            slot.data = Slot::empty(self.id);
        }
        self.recompute_weight();
        log::debug!("Unequipped '{}' from {:?}", item.id, slot_type);
        self.notify(InventoryEvent::ItemUnequipped {
            item,
            quantity,
            slot: slot_type,
        });
        self.notify_changed();
        Ok(quantity)
    }

    /// Items currently equipped, by slot
    pub fn equipped_items(&self) -> impl Iterator<Item = (EquipmentSlotType, &Slot)> {
        self.equipment
            .iter()
            .filter(|slot| slot.is_occupied())
            .map(|slot| (slot.slot_type, &slot.data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InventoryConfig;
    use crate::item::ItemDefinition;
    use crate::point::Point2D;
    use std::sync::Arc;

    fn weapons_config(width: i32, height: i32) -> InventoryConfig {
        InventoryConfig::with_grid(width, height).with_equipment(vec![
            EquipmentSlotType::PrimaryWeapon,
            EquipmentSlotType::SecondaryWeapon,
        ])
    }

    fn rifle(id: &str) -> Arc<ItemDefinition> {
        ItemDefinition::new(id, "Rifle")
            .with_size(2, 1)
            .equippable(EquipmentSlotType::PrimaryWeapon, EquipmentSlotType::SecondaryWeapon)
            .shared()
    }

    #[test]
    fn test_equip_primary_then_secondary() {
        let mut inventory = Inventory::new(weapons_config(4, 4));
        inventory.add_new_item(&rifle("rifle"), 2).unwrap();
        let first = inventory.slots()[0].id().unwrap();
        let second = inventory.slots()[1].id().unwrap();

        assert_eq!(inventory.equip_item_on_slot(first), Ok(EquipmentSlotType::PrimaryWeapon));
        assert_eq!(inventory.equip_item_on_slot(second), Ok(EquipmentSlotType::SecondaryWeapon));
        assert!(inventory.slots().is_empty());
        assert_eq!(inventory.current_weight(), 0.0);
        assert_eq!(inventory.equipped_items().count(), 2);
    }

    #[test]
    fn test_equip_swaps_primary() {
        let mut inventory = Inventory::new(weapons_config(4, 4));
        let rifle = rifle("rifle");
        inventory.add_new_item(&rifle, 3).unwrap();
        let ids: Vec<_> = inventory.slots().iter().filter_map(Slot::id).collect();

        inventory.equip_item_on_slot(ids[0]).unwrap();
        inventory.equip_item_on_slot(ids[1]).unwrap();
        assert_eq!(inventory.equip_item_on_slot(ids[2]), Ok(EquipmentSlotType::PrimaryWeapon));

        let primary = inventory.equipment_slot(EquipmentSlotType::PrimaryWeapon).unwrap();
        assert_eq!(primary.data.id(), Some(ids[2]));
        // The displaced rifle keeps its instance in the grid
        assert_eq!(inventory.slots()[0].id(), Some(ids[0]));
    }

    #[test]
    fn test_swap_abandoned_without_room() {
        let mut inventory = Inventory::new(weapons_config(2, 1));
        let long_rifle = ItemDefinition::new("long", "Long Rifle")
            .with_size(2, 1)
            .equippable(EquipmentSlotType::PrimaryWeapon, EquipmentSlotType::None)
            .shared();
        let pistol = ItemDefinition::new("pistol", "Pistol")
            .equippable(EquipmentSlotType::PrimaryWeapon, EquipmentSlotType::None)
            .with_weight(0.0)
            .shared();
        let rock = ItemDefinition::new("rock", "Rock").with_weight(0.0).shared();

        inventory.add_new_item(&long_rifle, 1).unwrap();
        let rifle_id = inventory.slots()[0].id().unwrap();
        inventory.equip_item_on_slot(rifle_id).unwrap();

        inventory.add_new_item(&pistol, 1).unwrap();
        inventory.add_new_item(&rock, 1).unwrap();
        let pistol_id = inventory.slots()[0].id().unwrap();

        // The 2x1 rifle cannot return to a grid with one free cell
        assert_eq!(
            inventory.equip_item_on_slot(pistol_id),
            Err(InventoryError::EquipmentSlotBusy("long".to_string()))
        );
        assert_eq!(inventory.slots().len(), 2);
        assert_eq!(inventory.slots()[0].id(), Some(pistol_id));
        let primary = inventory.equipment_slot(EquipmentSlotType::PrimaryWeapon).unwrap();
        assert_eq!(primary.data.id(), Some(rifle_id));
    }

    #[test]
    fn test_swap_needs_room_beside_incoming_item() {
        let config = InventoryConfig::with_grid(2, 1)
            .with_equipment(vec![EquipmentSlotType::PrimaryWeapon]);
        let mut inventory = Inventory::new(config);
        let rifle = rifle("rifle");

        inventory.add_new_item(&rifle, 1).unwrap();
        let equipped = inventory.slots()[0].id().unwrap();
        inventory.equip_item_on_slot(equipped).unwrap();
        inventory.add_new_item(&rifle, 1).unwrap();
        let incoming = inventory.slots()[0].id().unwrap();

        // The incoming rifle still holds the only cells and all the carry weight
        assert_eq!(
            inventory.equip_item_on_slot(incoming),
            Err(InventoryError::EquipmentSlotBusy("rifle".to_string()))
        );
        assert_eq!(inventory.slots().len(), 1);
        assert_eq!(inventory.slots()[0].id(), Some(incoming));
        assert_eq!(inventory.current_weight(), 2.0);
        let primary = inventory.equipment_slot(EquipmentSlotType::PrimaryWeapon).unwrap();
        assert_eq!(primary.data.id(), Some(equipped));
    }

    #[test]
    fn test_equip_guards() {
        let mut inventory = Inventory::new(InventoryConfig::with_grid(4, 4));
        let rifle = rifle("rifle");
        inventory.add_new_item(&rifle, 1).unwrap();
        let id = inventory.slots()[0].id().unwrap();
        assert_eq!(
            inventory.equip_item_on_slot(id),
            Err(InventoryError::EquipmentNotConfigured)
        );

        let mut inventory = Inventory::new(weapons_config(4, 4));
        let rock = ItemDefinition::new("rock", "Rock").shared();
        inventory.add_new_item(&rock, 1).unwrap();
        let id = inventory.slots()[0].id().unwrap();
        assert!(matches!(
            inventory.equip_item_on_slot(id),
            Err(InventoryError::ItemNotEquippable(_))
        ));

        let helmet = ItemDefinition::new("helmet", "Helmet")
            .equippable(EquipmentSlotType::Head, EquipmentSlotType::None)
            .shared();
        inventory.add_new_item(&helmet, 1).unwrap();
        let id = inventory.slots()[1].id().unwrap();
        assert_eq!(
            inventory.equip_item_on_slot(id),
            Err(InventoryError::InvalidEquipmentSlot(EquipmentSlotType::Head))
        );

        let config = InventoryConfig::with_grid(4, 4).with_equipment(vec![
            EquipmentSlotType::PrimaryWeapon,
            EquipmentSlotType::PrimaryWeapon,
        ]);
        let mut inventory = Inventory::new(config);
        inventory.add_new_item(&rifle, 1).unwrap();
        let id = inventory.slots()[0].id().unwrap();
        assert_eq!(
            inventory.equip_item_on_slot(id),
            Err(InventoryError::EquipmentNotConfigured)
        );
    }

    #[test]
    fn test_equip_unequip_round_trip() {
        let mut inventory = Inventory::new(weapons_config(3, 3));
        let rifle = rifle("rifle");
        inventory.add_new_item(&rifle, 1).unwrap();
        let id = inventory.slots()[0].id().unwrap();

        let mut in_flight = inventory.pick_up_slot(id).unwrap();
        in_flight.rotate();
        in_flight.move_to(Point2D::ZERO).unwrap();
        assert!(inventory.slots()[0].instance().unwrap().is_rotated());

        inventory.equip_item_on_slot(id).unwrap();
        assert_eq!(inventory.unequip_item(EquipmentSlotType::PrimaryWeapon), Ok(1));

        let slot = &inventory.slots()[0];
        assert_eq!(slot.id(), Some(id));
        assert_eq!(slot.quantity(), 1);
        assert!(!slot.instance().unwrap().is_rotated());
        assert!(!inventory
            .equipment_slot(EquipmentSlotType::PrimaryWeapon)
            .unwrap()
            .is_occupied());
    }

    #[test]
    fn test_unequip_without_room() {
        let mut inventory = Inventory::new(weapons_config(2, 1));
        let rifle = rifle("rifle");
        let rock = ItemDefinition::new("rock", "Rock").with_weight(0.0).shared();

        inventory.add_new_item(&rifle, 1).unwrap();
        let id = inventory.slots()[0].id().unwrap();
        inventory.equip_item_on_slot(id).unwrap();
        inventory.add_new_item(&rock, 1).unwrap();

        assert_eq!(
            inventory.unequip_item(EquipmentSlotType::PrimaryWeapon),
            Err(InventoryError::InsufficientSpace { added: 0 })
        );
        assert!(inventory
            .equipment_slot(EquipmentSlotType::PrimaryWeapon)
            .unwrap()
            .is_occupied());
        assert_eq!(inventory.slots().len(), 1);
    }

    #[test]
    fn test_unequip_guards() {
        let mut inventory = Inventory::new(weapons_config(2, 2));
        assert_eq!(
            inventory.unequip_item(EquipmentSlotType::None),
            Err(InventoryError::InvalidEquipmentSlot(EquipmentSlotType::None))
        );
        assert_eq!(
            inventory.unequip_item(EquipmentSlotType::PrimaryWeapon),
            Err(InventoryError::SlotEmpty)
        );
    }
}
