//! Equipment slots

use crate::id::InventoryId;
use crate::slot::Slot;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Equipment slot types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentSlotType {
    /// Unconfigured slot
    None,
    /// Main weapon
    PrimaryWeapon,
    /// Sidearm / backup weapon
    SecondaryWeapon,
    /// Head armor (helmet, hat)
    Head,
    /// Chest armor
    Chest,
    /// Leg armor
    Legs,
    /// Foot armor (boots)
    Feet,
    /// Hand armor (gloves)
    Hands,
    /// Ring, amulet
    Accessory,
    /// Back slot (cape, backpack)
    Back,
    /// Custom slot
    Custom(u32),
}

impl Default for EquipmentSlotType {
    fn default() -> Self {
        Self::None
    }
}

impl EquipmentSlotType {
    /// Check if this is a weapon slot
    pub fn is_weapon(&self) -> bool {
        matches!(self, Self::PrimaryWeapon | Self::SecondaryWeapon)
    }

    /// Check if this is an armor slot
    pub fn is_armor(&self) -> bool {
        matches!(
            self,
            Self::Head | Self::Chest | Self::Legs | Self::Feet | Self::Hands
        )
    }
}

/// One equipment slot: a type tag plus the slot holding the equipped item
#[derive(Debug, Clone)]
pub struct EquipmentSlot {
    /// Slot type
    pub slot_type: EquipmentSlotType,
    /// Equipped item, if any
    pub data: Slot,
}

impl EquipmentSlot {
    /// Create an empty equipment slot
    pub fn new(slot_type: EquipmentSlotType, owner: InventoryId) -> Self {
        Self {
            slot_type,
            data: Slot::empty(owner),
        }
    }

    /// Configured type with a valid slot
    pub fn is_valid(&self) -> bool {
        self.slot_type != EquipmentSlotType::None && self.data.is_valid()
    }

    /// Whether an item is equipped here
    pub fn is_occupied(&self) -> bool {
        self.data.is_occupied()
    }
}

/// Fixed set of equipment slots, configured once per inventory
#[derive(Debug, Clone, Default)]
pub struct EquipmentSlots {
    slots: Vec<EquipmentSlot>,
}

impl EquipmentSlots {
    /// Create empty slots for each configured type
    pub fn new(types: &[EquipmentSlotType], owner: InventoryId) -> Self {
        Self {
            slots: types
                .iter()
                .map(|slot_type| EquipmentSlot::new(*slot_type, owner))
                .collect(),
        }
    }

    /// Clear every slot, keeping the configured types
    pub fn reset(&mut self, owner: InventoryId) {
        for slot in &mut self.slots {
            slot.data = Slot::empty(owner);
        }
    }

    /// Non-empty, no `None` tags and no duplicates
    pub fn is_valid_configuration(&self) -> bool {
        let mut seen = HashSet::new();
        !self.slots.is_empty()
            && self.slots.iter().all(|slot| {
                slot.slot_type != EquipmentSlotType::None && seen.insert(slot.slot_type)
            })
    }

    /// Number of configured slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if no slots are configured
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Index of the slot with the given type
    pub fn index_of(&self, slot_type: EquipmentSlotType) -> Option<usize> {
        if slot_type == EquipmentSlotType::None {
            return None;
        }
        self.slots.iter().position(|slot| slot.slot_type == slot_type)
    }

    /// Slot with the given type
    pub fn get(&self, slot_type: EquipmentSlotType) -> Option<&EquipmentSlot> {
        self.index_of(slot_type).map(|index| &self.slots[index])
    }

    /// Slot with the given type, mutably
    pub fn get_mut(&mut self, slot_type: EquipmentSlotType) -> Option<&mut EquipmentSlot> {
        self.index_of(slot_type).map(move |index| &mut self.slots[index])
    }

    /// Iterate over all slots
    pub fn iter(&self) -> impl Iterator<Item = &EquipmentSlot> {
        self.slots.iter()
    }
}
