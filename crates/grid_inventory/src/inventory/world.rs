//! Dropping to and looting from the world

use super::Inventory;
use crate::error::{InventoryError, Result};
use crate::events::InventoryEvent;
use crate::id::InstanceId;
use crate::instance::ItemInstance;
use crate::item::ItemDefinition;
use crate::pickup::{ActorPose, PickupBridge, PickupHandle, SpawnRequest, Transform};
use std::sync::Arc;

impl Inventory {
    /// Drop a whole slot into the world in front of `pose`.
    ///
    /// The slot is detached first and only discarded once the bridge has
    /// spawned the pickup. A refused spawn puts the slot back untouched and
    /// returns [`InventoryError::SpawnFailed`].
    pub fn drop_item_on_slot<B>(
        &mut self,
        id: InstanceId,
        pose: &ActorPose,
        bridge: &mut B,
    ) -> Result<PickupHandle>
    where
        B: PickupBridge + ?Sized,
    {
        let index = self.slot_index(id).ok_or(InventoryError::SlotNotFound(id))?;
        let slot = &self.slots[index];
        let item = match slot.item() {
            Some(item) if slot.is_occupied() => item.clone(),
            _ => return Err(InventoryError::SlotEmpty),
        };

        if !item.droppable {
            return Err(InventoryError::ItemNotDroppable(item.id.clone()));
        }
        let scale = match &item.pickup {
            Some(spec) => spec.scale,
            None => return Err(InventoryError::PickupNotConfigured(item.id.clone())),
        };

        let transform = Transform {
            location: pose.point_ahead(self.config.pickup_spawn_radius),
            rotation: pose.rotation,
            scale,
        };
        if !transform.is_finite() {
            return Err(InventoryError::InvalidTransform);
        }

        // The pickup carries a copy; the slot's own instance stays with the slot
        let quantity = self.slots[index].quantity();
        let instance = match self.slots[index].instance() {
            Some(instance) => instance.duplicate(),
            None => return Err(InventoryError::SlotEmpty),
        };
        let slot = self.slots.remove(index);

        let request = SpawnRequest {
            instance,
            quantity,
            transform,
        };

        match bridge.spawn_pickup(request) {
            Ok(handle) => {
                log::debug!("Dropped {} x '{}' as pickup {:?}", quantity, item.id, handle);
                self.recompute_weight();
                self.notify_changed();
                self.notify(InventoryEvent::ItemRemoved { item, quantity });
                Ok(handle)
            }
            Err(_) => {
                log::warn!("World refused pickup for '{}', restoring slot", item.id);
                self.slots.insert(index.min(self.slots.len()), slot);
                Err(InventoryError::SpawnFailed(item.id.clone()))
            }
        }
    }

    /// Take as much of a pickup as fits.
    ///
    /// The pickup shrinks by the looted amount and is destroyed once empty.
    /// A partial loot returns [`InventoryError::InsufficientSpace`] carrying
    /// the looted quantity.
    pub fn loot_item<B>(&mut self, handle: PickupHandle, bridge: &mut B) -> Result<u32>
    where
        B: PickupBridge + ?Sized,
    {
        let (instance, quantity) = bridge
            .pickup_payload(handle)
            .map(|(instance, quantity)| (instance.clone(), quantity))
            .ok_or(InventoryError::PickupNotFound(handle.0))?;

        let looted = match self.add_existing_item(&instance, quantity) {
            Ok(added) => added,
            Err(InventoryError::InsufficientSpace { added }) if added > 0 => added,
            Err(err) => return Err(err),
        };

        let remaining = quantity.saturating_sub(looted);
        if remaining == 0 {
            bridge.destroy_pickup(handle);
        } else {
            bridge.set_pickup_quantity(handle, remaining);
        }
        log::debug!(
            "Looted {} x '{}' from pickup {:?}, {} left",
            looted,
            instance.item().id,
            handle,
            remaining
        );

        if remaining == 0 {
            Ok(looted)
        } else {
            Err(InventoryError::InsufficientSpace { added: looted })
        }
    }
}

/// Materialize a fresh instance of `item` in the world, independent of any
/// inventory
pub fn spawn_item<B>(
    bridge: &mut B,
    item: &Arc<ItemDefinition>,
    quantity: u32,
    transform: Transform,
) -> Result<PickupHandle>
where
    B: PickupBridge + ?Sized,
{
    if quantity == 0 {
        return Err(InventoryError::InvalidQuantity);
    }
    if !transform.is_finite() {
        return Err(InventoryError::InvalidTransform);
    }

    let request = SpawnRequest {
        instance: ItemInstance::new(item.clone()),
        quantity,
        transform,
    };
    bridge
        .spawn_pickup(request)
        .map_err(|_| InventoryError::SpawnFailed(item.id.clone()))
}
