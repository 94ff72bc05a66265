//! Dragging slots: detach, then move, merge or put back

use super::Inventory;
use crate::error::{InventoryError, Result};
use crate::id::InstanceId;
use crate::point::Point2D;
use crate::slot::Slot;

/// A slot detached from the grid while the caller decides where it goes.
///
/// The guard borrows the inventory mutably, so nothing else can take the
/// slot's original cells in the meantime. Dropping the guard without
/// committing puts the slot back exactly where and how it was.
#[derive(Debug)]
pub struct InFlightSlot<'a> {
    inventory: &'a mut Inventory,
    slot: Slot,
    index: usize,
    origin: Point2D,
    origin_rotated: bool,
    settled: bool,
}

impl Inventory {
    /// Detach a slot from the grid
    pub fn pick_up_slot(&mut self, id: InstanceId) -> Result<InFlightSlot<'_>> {
        let index = self.slot_index(id).ok_or(InventoryError::SlotNotFound(id))?;
        if !self.slots[index].is_occupied() {
            return Err(InventoryError::SlotEmpty);
        }

        let slot = self.slots.remove(index);
        let (origin, origin_rotated) = slot
            .instance()
            .map_or((Point2D::ZERO, false), |instance| {
                (instance.top_left(), instance.is_rotated())
            });

        Ok(InFlightSlot {
            inventory: self,
            slot,
            index,
            origin,
            origin_rotated,
            settled: false,
        })
    }

    /// Move a slot so its top-left cell lands on `destination`.
    ///
    /// On failure the slot stays where it was.
    pub fn move_item_on_slot(&mut self, id: InstanceId, destination: Point2D) -> Result<()> {
        self.pick_up_slot(id)?.move_to(destination)
    }

    /// Move up to `quantity` units from a slot onto the stack covering
    /// `destination`. Returns the transferred quantity.
    pub fn stack_item_stack_on_slot(
        &mut self,
        id: InstanceId,
        destination: Point2D,
        quantity: u32,
    ) -> Result<u32> {
        self.pick_up_slot(id)?.stack_onto(destination, quantity)
    }
}

impl<'a> InFlightSlot<'a> {
    /// The detached slot
    pub fn slot(&self) -> &Slot {
        &self.slot
    }

    /// Top-left cell the slot was picked up from
    pub fn origin(&self) -> Point2D {
        self.origin
    }

    /// Toggle the footprint orientation for the upcoming placement
    pub fn rotate(&mut self) -> bool {
        self.slot
            .instance_mut()
            .map_or(false, |instance| instance.rotate())
    }

    /// Place the slot at `destination` in its current orientation.
    ///
    /// A rejected move puts the slot back at its origin.
    pub fn move_to(mut self, destination: Point2D) -> Result<()> {
        let inventory = &*self.inventory;
        if !inventory.is_within_boundaries(destination) {
            return Err(InventoryError::OutOfBounds(destination));
        }
        if !inventory.is_free_cell(destination) {
            return Err(InventoryError::CellOccupied(destination));
        }

        let fits = self
            .slot
            .instance()
            .map_or(false, |instance| inventory.does_item_fit(instance.cells(), destination));
        if !fits {
            return Err(InventoryError::DoesNotFit(destination));
        }

        if let Some(instance) = self.slot.instance_mut() {
            instance.set_top_left(destination);
        }
        log::debug!("Moved slot {:?} from {} to {}", self.slot.id(), self.origin, destination);
        self.settle();
        self.inventory.notify_changed();
        Ok(())
    }

    /// Merge up to `quantity` units into the stack covering `destination`.
    ///
    /// Transfers `min(quantity, held, destination's missing capacity)`. An
    /// emptied source slot is discarded; otherwise it goes back to its
    /// origin. Returns the transferred quantity.
    pub fn stack_onto(mut self, destination: Point2D, quantity: u32) -> Result<u32> {
        if !self.inventory.is_within_boundaries(destination) {
            return Err(InventoryError::OutOfBounds(destination));
        }
        if quantity == 0 {
            return Err(InventoryError::InvalidQuantity);
        }

        let target = self
            .inventory
            .slot_index_by_coordinates(destination)
            .ok_or(InventoryError::CellEmpty(destination))?;

        let source_item = match self.slot.item() {
            Some(item) => item.clone(),
            None => return Err(InventoryError::SlotEmpty),
        };
        let destination_slot = &self.inventory.slots[target];
        let destination_item = match destination_slot.item() {
            Some(item) => item,
            None => return Err(InventoryError::CellEmpty(destination)),
        };

        if !destination_item.is_same_item(&source_item) {
            return Err(InventoryError::DefinitionMismatch {
                source_item: source_item.id.clone(),
                destination_item: destination_item.id.clone(),
            });
        }
        if !destination_item.is_stackable() {
            return Err(InventoryError::NotStackable(destination_item.id.clone()));
        }
        if destination_slot.is_on_max_stack_size() {
            return Err(InventoryError::StackFull);
        }

        let transferred = quantity
            .min(self.slot.quantity())
            .min(destination_slot.missing_stack_quantity());

        self.inventory.slots[target].update_quantity(i64::from(transferred));
        self.slot.update_quantity(-i64::from(transferred));
        log::debug!(
            "Stacked {} x '{}' onto {}",
            transferred,
            source_item.id,
            destination
        );

        if self.slot.quantity() == 0 {
            self.settled = true;
            self.inventory.recompute_weight();
        } else {
            self.restore();
        }
        self.inventory.notify_changed();
        Ok(transferred)
    }

    /// Put the slot back where it was picked up
    pub fn cancel(mut self) {
        self.restore();
        self.inventory.notify(crate::events::InventoryEvent::Updated);
    }

    fn restore(&mut self) {
        let origin = self.origin;
        let rotated = self.origin_rotated;
        if let Some(instance) = self.slot.instance_mut() {
            instance.set_rotation(rotated);
            instance.set_top_left(origin);
        }
        self.settle();
    }

    fn settle(&mut self) {
        if self.settled {
            return;
        }
        self.settled = true;
        let slot = std::mem::take(&mut self.slot);
        let index = self.index.min(self.inventory.slots.len());
        self.inventory.slots.insert(index, slot);
        self.inventory.recompute_weight();
    }
}

impl Drop for InFlightSlot<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.restore();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InventoryConfig;
    use crate::item::ItemDefinition;
    use std::sync::Arc;

    fn arrows() -> Arc<ItemDefinition> {
        ItemDefinition::new("arrow", "Arrow").with_max_stack(10).shared()
    }

    #[test]
    fn test_move() {
        let mut inventory = Inventory::new(InventoryConfig::with_grid(4, 4));
        let shield = ItemDefinition::new("shield", "Shield").with_size(2, 2).shared();
        inventory.add_new_item(&shield, 1).unwrap();
        let id = inventory.slots()[0].id().unwrap();

        inventory.move_item_on_slot(id, Point2D::new(2, 2)).unwrap();
        let instance = inventory.slot(id).unwrap().instance().unwrap();
        assert_eq!(instance.top_left(), Point2D::new(2, 2));
        assert!(inventory.is_free_cell(Point2D::new(0, 0)));
    }

    #[test]
    fn test_move_overlapping_own_cells() {
        let mut inventory = Inventory::new(InventoryConfig::with_grid(4, 4));
        let shield = ItemDefinition::new("shield", "Shield").with_size(2, 2).shared();
        inventory.add_new_item(&shield, 1).unwrap();
        let id = inventory.slots()[0].id().unwrap();

        // Shifting by one cell overlaps the old placement, which is free while in flight
        inventory.move_item_on_slot(id, Point2D::new(1, 0)).unwrap();
        assert_eq!(
            inventory.slot(id).unwrap().instance().unwrap().top_left(),
            Point2D::new(1, 0)
        );
    }

    #[test]
    fn test_failed_move_restores() {
        let mut inventory = Inventory::new(InventoryConfig::with_grid(3, 2));
        let plank = ItemDefinition::new("plank", "Plank").with_size(2, 1).shared();
        inventory.add_new_item(&plank, 2).unwrap();
        let id = inventory.slots()[0].id().unwrap();

        let mut in_flight = inventory.pick_up_slot(id).unwrap();
        assert!(in_flight.rotate());
        assert_eq!(
            in_flight.move_to(Point2D::new(2, 1)),
            Err(InventoryError::DoesNotFit(Point2D::new(2, 1)))
        );

        let instance = inventory.slots()[0].instance().unwrap();
        assert_eq!(instance.id(), id);
        assert_eq!(instance.top_left(), Point2D::ZERO);
        assert!(!instance.is_rotated());

        assert_eq!(
            inventory.move_item_on_slot(id, Point2D::new(0, 1)),
            Err(InventoryError::CellOccupied(Point2D::new(0, 1)))
        );
        assert_eq!(
            inventory.move_item_on_slot(id, Point2D::new(5, 0)),
            Err(InventoryError::OutOfBounds(Point2D::new(5, 0)))
        );
        assert_eq!(inventory.slots().len(), 2);
    }

    #[test]
    fn test_rotated_move() {
        let mut inventory = Inventory::new(InventoryConfig::with_grid(3, 3));
        let plank = ItemDefinition::new("plank", "Plank").with_size(2, 1).shared();
        inventory.add_new_item(&plank, 1).unwrap();
        let id = inventory.slots()[0].id().unwrap();

        let mut in_flight = inventory.pick_up_slot(id).unwrap();
        in_flight.rotate();
        in_flight.move_to(Point2D::new(2, 1)).unwrap();

        assert!(inventory.slot_by_coordinates(Point2D::new(2, 2)).is_some());
        assert!(inventory.is_free_cell(Point2D::new(0, 0)));
    }

    #[test]
    fn test_cancel_emits_update() {
        let mut inventory = Inventory::new(InventoryConfig::with_grid(2, 2));
        inventory.add_new_item(&arrows(), 3).unwrap();
        let id = inventory.slots()[0].id().unwrap();
        let (_, channel) = inventory.subscribe_channel();

        inventory.pick_up_slot(id).unwrap().cancel();
        assert_eq!(inventory.slot(id).unwrap().quantity(), 3);
        assert_eq!(channel.len(), 1);
    }

    #[test]
    fn test_stack_partial_transfer() {
        let mut inventory = Inventory::new(InventoryConfig::with_grid(4, 4));
        let arrow = arrows();
        inventory.add_new_item(&arrow, 10).unwrap();
        let full = inventory.slots()[0].id().unwrap();
        inventory.remove_item_on_slot(full, 2).unwrap();
        inventory.add_new_item(&arrow, 8).unwrap();

        // First slot tops up to 10 and a second slot with 6 is created
        let quantities: Vec<_> = inventory.slots().iter().map(Slot::quantity).collect();
        assert_eq!(quantities, vec![10, 6]);

        let second = inventory.slots()[1].id().unwrap();
        inventory.remove_item_on_slot(full, 3).unwrap();

        let transferred = inventory
            .stack_item_stack_on_slot(second, Point2D::ZERO, 5)
            .unwrap();
        assert_eq!(transferred, 3);
        assert_eq!(inventory.slot(full).unwrap().quantity(), 10);
        assert_eq!(inventory.slot(second).unwrap().quantity(), 3);
    }

    #[test]
    fn test_stack_consumes_source() {
        let mut inventory = Inventory::new(InventoryConfig::with_grid(4, 4));
        let arrow = arrows();
        inventory.add_new_item(&arrow, 14).unwrap();
        let first = inventory.slots()[0].id().unwrap();
        let second = inventory.slots()[1].id().unwrap();
        inventory.remove_item_on_slot(first, 5).unwrap();

        let transferred = inventory
            .stack_item_stack_on_slot(second, Point2D::ZERO, 10)
            .unwrap();
        assert_eq!(transferred, 4);
        assert!(inventory.slot(second).is_none());
        assert_eq!(inventory.slot(first).unwrap().quantity(), 9);
        assert_eq!(inventory.count_item_quantity(&arrow), 9);
    }

    #[test]
    fn test_stack_rejections() {
        let mut inventory = Inventory::new(InventoryConfig::with_grid(4, 4));
        let arrow = arrows();
        let bolt = ItemDefinition::new("bolt", "Bolt").with_max_stack(10).shared();
        let sword = ItemDefinition::new("sword", "Sword").shared();

        inventory.add_new_item(&arrow, 10).unwrap();
        inventory.add_new_item(&bolt, 5).unwrap();
        inventory.add_new_item(&sword, 2).unwrap();
        let arrows_id = inventory.slots()[0].id().unwrap();
        let bolts_id = inventory.slots()[1].id().unwrap();
        let sword_id = inventory.slots()[2].id().unwrap();

        assert!(matches!(
            inventory.stack_item_stack_on_slot(bolts_id, Point2D::ZERO, 1),
            Err(InventoryError::DefinitionMismatch { .. })
        ));
        assert_eq!(
            inventory.stack_item_stack_on_slot(bolts_id, Point2D::new(3, 3), 1),
            Err(InventoryError::CellEmpty(Point2D::new(3, 3)))
        );
        assert_eq!(
            inventory.stack_item_stack_on_slot(bolts_id, Point2D::new(1, 0), 0),
            Err(InventoryError::InvalidQuantity)
        );
        assert_eq!(
            inventory.stack_item_stack_on_slot(sword_id, Point2D::new(3, 0), 1),
            Err(InventoryError::NotStackable("sword".to_string()))
        );

        inventory.add_new_item(&arrow, 3).unwrap();
        let extra = inventory.slots()[4].id().unwrap();
        assert_eq!(
            inventory.stack_item_stack_on_slot(extra, Point2D::ZERO, 3),
            Err(InventoryError::StackFull)
        );

        // Every rejected source is back in place
        assert_eq!(inventory.slots().len(), 5);
        assert_eq!(inventory.slot(arrows_id).unwrap().quantity(), 10);
    }
}
