//! Removing and consuming items

use super::Inventory;
use crate::error::{InventoryError, Result};
use crate::events::InventoryEvent;
use crate::id::InstanceId;
use crate::item::ItemDefinition;
use std::sync::Arc;

impl Inventory {
    /// Remove up to `quantity` units of an item, draining slots in order.
    ///
    /// Asking for at least the owned total removes every slot of the item.
    /// Returns the removed quantity.
    pub fn remove_item(&mut self, item: &Arc<ItemDefinition>, quantity: u32) -> Result<u32> {
        if quantity == 0 {
            return Err(InventoryError::InvalidQuantity);
        }
        if !self.does_item_exist(item) {
            return Err(InventoryError::ItemNotFound(item.id.clone()));
        }

        let total = self.count_item_quantity(item);
        let removed = if quantity >= total {
            self.slots.retain(|slot| !slot.holds(item));
            total
        } else {
            let mut remaining = quantity;
            let mut index = 0;
            while remaining > 0 && index < self.slots.len() {
                if !self.slots[index].holds(item) {
                    index += 1;
                    continue;
                }

                let held = self.slots[index].quantity();
                if held <= remaining {
                    self.slots.remove(index);
                    remaining -= held;
                } else {
                    self.slots[index].update_quantity(-i64::from(remaining));
                    remaining = 0;
                    index += 1;
                }
            }
            quantity - remaining
        };

        log::debug!("Removed {} x '{}'", removed, item.id);
        self.recompute_weight();
        self.notify_changed();
        self.notify(InventoryEvent::ItemRemoved {
            item: item.clone(),
            quantity: removed,
        });
        Ok(removed)
    }

    /// Remove `quantity` units from one slot, deleting it when emptied.
    /// Returns the removed quantity.
    pub fn remove_item_on_slot(&mut self, id: InstanceId, quantity: u32) -> Result<u32> {
        if quantity == 0 {
            return Err(InventoryError::InvalidQuantity);
        }
        let index = self.slot_index(id).ok_or(InventoryError::SlotNotFound(id))?;
        let slot = &self.slots[index];
        let item = match slot.item() {
            Some(item) if slot.is_occupied() => item.clone(),
            _ => return Err(InventoryError::SlotEmpty),
        };

        let held = slot.quantity();
        let removed = if quantity >= held {
            self.slots.remove(index);
            held
        } else {
            self.slots[index].update_quantity(-i64::from(quantity));
            quantity
        };

        self.recompute_weight();
        self.notify_changed();
        self.notify(InventoryEvent::ItemRemoved {
            item,
            quantity: removed,
        });
        Ok(removed)
    }

    /// Consume one use worth of units from a slot.
    ///
    /// Fires the item's `on_used` hook and raises `ItemUsed` after the units
    /// are removed. Returns the consumed quantity.
    pub fn use_item_on_slot(&mut self, id: InstanceId) -> Result<u32> {
        let slot = self.slot(id).ok_or(InventoryError::SlotNotFound(id))?;
        let instance = match slot.instance() {
            Some(instance) if slot.is_occupied() => instance.clone(),
            _ => return Err(InventoryError::SlotEmpty),
        };

        let item = instance.item().clone();
        if !item.consumable {
            return Err(InventoryError::ItemNotConsumable(item.id.clone()));
        }
        let required = item.consumed_per_use;
        if slot.quantity() < required {
            return Err(InventoryError::NotEnoughToUse {
                required,
                available: slot.quantity(),
            });
        }

        let consumed = self.remove_item_on_slot(id, required)?;

        if let Some(behavior) = &item.behavior {
            behavior.on_used(&instance, consumed);
        }
        self.notify(InventoryEvent::ItemUsed {
            item,
            quantity: consumed,
        });
        Ok(consumed)
    }
}
