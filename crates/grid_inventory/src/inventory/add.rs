//! Adding items: top up existing stacks, then place new slots first-fit

use super::Inventory;
use crate::error::{InventoryError, Result};
use crate::events::InventoryEvent;
use crate::instance::ItemInstance;
use crate::item::ItemDefinition;
use crate::slot::Slot;
use std::sync::Arc;

impl Inventory {
    /// Add `quantity` units of a new item.
    ///
    /// Stackable items first top up under-full stacks of the same item, then
    /// fill new slots of at most `max_stack_size` units. Non-stackable items
    /// get one slot per unit. A new slot goes to the first cell where the
    /// footprint fits, retrying rotated when the native orientation does not.
    ///
    /// Running out of space or weight keeps whatever was already added and
    /// returns [`InventoryError::InsufficientSpace`] with that quantity. A
    /// full inventory rejects every add up front.
    pub fn add_new_item(&mut self, item: &Arc<ItemDefinition>, quantity: u32) -> Result<u32> {
        let result = self.add_item_silently(item, quantity, None);
        self.notify_add_result(item, &result);
        result
    }

    /// Add `quantity` units of the item carried by an existing instance
    /// (for example a world pickup). New slots get fresh instances.
    pub fn add_existing_item(&mut self, instance: &ItemInstance, quantity: u32) -> Result<u32> {
        let item = instance.item().clone();
        self.add_new_item(&item, quantity)
    }

    /// Same placement as [`Inventory::add_existing_item`] without raising
    /// events. The instance itself backs the first new slot, if one is needed.
    pub(crate) fn add_existing_item_internal(
        &mut self,
        instance: ItemInstance,
        quantity: u32,
    ) -> Result<u32> {
        let item = instance.item().clone();
        self.add_item_silently(&item, quantity, Some(instance))
    }

    fn add_item_silently(
        &mut self,
        item: &Arc<ItemDefinition>,
        quantity: u32,
        mut template: Option<ItemInstance>,
    ) -> Result<u32> {
        if quantity == 0 {
            return Err(InventoryError::InvalidQuantity);
        }
        if self.is_full() {
            log::debug!("Inventory {:?} is full, rejecting '{}'", self.id, item.id);
            return Err(InventoryError::InsufficientSpace { added: 0 });
        }

        let mut remaining = quantity;
        let mut added = 0;

        if item.is_stackable() {
            for index in 0..self.slots.len() {
                if remaining == 0 {
                    break;
                }

                let slot = &self.slots[index];
                if !slot.holds(item) {
                    continue;
                }
                let amount = slot.missing_stack_quantity().min(remaining);
                if amount == 0 {
                    continue;
                }

                if !self.can_carry_item(item, amount) {
                    return self.ran_out_of_space(item, added);
                }

                self.slots[index].update_quantity(i64::from(amount));
                self.recompute_weight();
                added += amount;
                remaining -= amount;
            }
        }

        let limit = item.stack_limit();
        while remaining > 0 {
            let amount = remaining.min(limit);
            if !self.can_carry_item(item, amount) {
                return self.ran_out_of_space(item, added);
            }

            let mut instance = match template.take() {
                Some(mut instance) => {
                    instance.reset_rotation();
                    instance
                }
                None => ItemInstance::new(item.clone()),
            };

            let top_left = match self.find_placement(&mut instance) {
                Some(top_left) => top_left,
                None => return self.ran_out_of_space(item, added),
            };

            instance.set_top_left(top_left);
            log::debug!(
                "Placed {} x '{}' at {} (rotated: {})",
                amount,
                item.id,
                top_left,
                instance.is_rotated()
            );
            self.slots.push(Slot::new(instance, amount, self.id));
            self.recompute_weight();
            added += amount;
            remaining -= amount;
        }

        Ok(added)
    }

    fn ran_out_of_space(&self, item: &ItemDefinition, added: u32) -> Result<u32> {
        log::debug!(
            "Inventory {:?} ran out of space for '{}' after adding {}",
            self.id,
            item.id,
            added
        );
        Err(InventoryError::InsufficientSpace { added })
    }

    fn notify_add_result(&mut self, item: &Arc<ItemDefinition>, result: &Result<u32>) {
        match result {
            Ok(added) => {
                self.notify_changed();
                self.notify(InventoryEvent::ItemAdded {
                    item: item.clone(),
                    quantity: *added,
                });
            }
            Err(InventoryError::InsufficientSpace { added }) => {
                if *added > 0 {
                    self.notify(InventoryEvent::Updated);
                }
                self.notify(InventoryEvent::InsufficientSpace);
            }
            Err(_) => {}
        }
    }
}
