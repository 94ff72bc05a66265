//! Change notifications raised by the inventory

use crate::equipment::EquipmentSlotType;
use crate::item::ItemDefinition;
use std::sync::Arc;

/// Raised after a mutation has been applied.
///
/// Observers should re-read inventory state on receipt. Only the
/// item-specific events carry a payload.
#[derive(Debug, Clone)]
pub enum InventoryEvent {
    /// Grid, weight and equipment were (re)initialized
    Initialized,
    /// Slots changed shape or position
    Updated,
    /// An addition ran out of space or carry weight
    InsufficientSpace,
    /// Current weight may have changed
    WeightChanged,
    /// Money balance changed
    MoneyChanged,
    /// Units were added to the grid
    ItemAdded {
        item: Arc<ItemDefinition>,
        quantity: u32,
    },
    /// Units were removed from the grid
    ItemRemoved {
        item: Arc<ItemDefinition>,
        quantity: u32,
    },
    /// An item moved from the grid into an equipment slot
    ItemEquipped {
        item: Arc<ItemDefinition>,
        quantity: u32,
        slot: EquipmentSlotType,
    },
    /// An item moved from an equipment slot back to the grid
    ItemUnequipped {
        item: Arc<ItemDefinition>,
        quantity: u32,
        slot: EquipmentSlotType,
    },
    /// Units were consumed
    ItemUsed {
        item: Arc<ItemDefinition>,
        quantity: u32,
    },
}

impl InventoryEvent {
    /// Short name, used for logging
    pub fn name(&self) -> &'static str {
        match self {
            Self::Initialized => "initialized",
            Self::Updated => "updated",
            Self::InsufficientSpace => "insufficient_space",
            Self::WeightChanged => "weight_changed",
            Self::MoneyChanged => "money_changed",
            Self::ItemAdded { .. } => "item_added",
            Self::ItemRemoved { .. } => "item_removed",
            Self::ItemEquipped { .. } => "item_equipped",
            Self::ItemUnequipped { .. } => "item_unequipped",
            Self::ItemUsed { .. } => "item_used",
        }
    }

    /// Item and quantity for item-specific events
    pub fn payload(&self) -> Option<(&Arc<ItemDefinition>, u32)> {
        match self {
            Self::ItemAdded { item, quantity }
            | Self::ItemRemoved { item, quantity }
            | Self::ItemUsed { item, quantity }
            | Self::ItemEquipped { item, quantity, .. }
            | Self::ItemUnequipped { item, quantity, .. } => Some((item, *quantity)),
            _ => None,
        }
    }
}
