//! Slots: a placed quantity of one item instance

use crate::id::{InstanceId, InventoryId};
use crate::instance::ItemInstance;
use crate::item::ItemDefinition;
use std::sync::Arc;

/// A quantity of one item instance owned by an inventory.
///
/// The quantity is clamped to `[0, stack_limit]` of the held item on every
/// write, so a slot never holds more than one non-stackable unit.
#[derive(Debug, Clone, Default)]
pub struct Slot {
    instance: Option<ItemInstance>,
    quantity: u32,
    owner: Option<InventoryId>,
}

impl Slot {
    /// Create an occupied slot
    pub fn new(instance: ItemInstance, quantity: u32, owner: InventoryId) -> Self {
        let mut slot = Self {
            instance: Some(instance),
            quantity: 0,
            owner: Some(owner),
        };
        slot.set_quantity(quantity);
        slot
    }

    /// Create an empty slot owned by `owner`
    pub fn empty(owner: InventoryId) -> Self {
        Self {
            instance: None,
            quantity: 0,
            owner: Some(owner),
        }
    }

    /// Owning inventory
    pub fn owner(&self) -> Option<InventoryId> {
        self.owner
    }

    /// Held instance
    pub fn instance(&self) -> Option<&ItemInstance> {
        self.instance.as_ref()
    }

    /// Held instance, mutably
    pub fn instance_mut(&mut self) -> Option<&mut ItemInstance> {
        self.instance.as_mut()
    }

    /// Held definition
    pub fn item(&self) -> Option<&Arc<ItemDefinition>> {
        self.instance.as_ref().map(ItemInstance::item)
    }

    /// ID of the held instance
    pub fn id(&self) -> Option<InstanceId> {
        self.instance.as_ref().map(ItemInstance::id)
    }

    /// Current quantity
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Set the quantity, clamped to the held item's stack limit
    pub fn set_quantity(&mut self, quantity: u32) {
        let limit = self.item().map_or(0, |item| item.stack_limit());
        self.quantity = quantity.min(limit);
    }

    /// Add a signed delta to the quantity, clamped to `[0, stack_limit]`
    pub fn update_quantity(&mut self, delta: i64) {
        let next = (self.quantity as i64 + delta).max(0);
        self.set_quantity(u32::try_from(next).unwrap_or(u32::MAX));
    }

    /// Take the instance out, leaving the slot empty
    pub fn take(&mut self) -> Option<(ItemInstance, u32)> {
        let quantity = std::mem::take(&mut self.quantity);
        self.instance.take().map(|instance| (instance, quantity))
    }

    /// Whether the slot belongs to an inventory
    pub fn is_valid(&self) -> bool {
        self.owner.is_some()
    }

    /// Valid and holding nothing
    pub fn is_empty(&self) -> bool {
        self.is_valid() && self.instance.is_none() && self.quantity == 0
    }

    /// Valid and holding at least one unit
    pub fn is_occupied(&self) -> bool {
        self.is_valid() && self.instance.is_some() && self.quantity > 0
    }

    /// Whether the held stack is full
    pub fn is_on_max_stack_size(&self) -> bool {
        self.item()
            .map_or(false, |item| self.quantity >= item.stack_limit())
    }

    /// Units still fitting on this slot
    pub fn missing_stack_quantity(&self) -> u32 {
        self.item()
            .map_or(0, |item| item.stack_limit().saturating_sub(self.quantity))
    }

    /// Whether the slot holds the given item
    pub fn holds(&self, item: &ItemDefinition) -> bool {
        self.item().map_or(false, |held| held.is_same_item(item))
    }

    /// Carried weight of the slot
    pub fn weight(&self) -> f32 {
        self.item()
            .map_or(0.0, |item| item.unit_weight() * self.quantity as f32)
    }
}
