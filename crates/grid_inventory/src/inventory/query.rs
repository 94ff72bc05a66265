//! Capacity and existence queries

use super::Inventory;
use crate::item::ItemDefinition;
use crate::point::Point2D;
use crate::slot::Slot;

// Float sums of fractional unit weights drift slightly.
const WEIGHT_EPSILON: f32 = 1e-4;

impl Inventory {
    /// Whether `quantity` more units stay within the carry limit
    pub fn can_carry_item(&self, item: &ItemDefinition, quantity: u32) -> bool {
        self.current_weight + item.unit_weight() * quantity as f32 <= self.max_weight + WEIGHT_EPSILON
    }

    /// Carry limit reached
    pub fn is_full(&self) -> bool {
        self.current_weight >= self.max_weight - WEIGHT_EPSILON
    }

    /// Whether any grid slot holds the item
    pub fn does_item_exist(&self, item: &ItemDefinition) -> bool {
        self.slots.iter().any(|slot| slot.holds(item))
    }

    /// Total units of the item across grid slots, saturating at `u32::MAX`
    pub fn count_item_quantity(&self, item: &ItemDefinition) -> u32 {
        self.slots
            .iter()
            .filter(|slot| slot.holds(item))
            .map(Slot::quantity)
            .fold(0, u32::saturating_add)
    }

    /// Slot whose footprint covers `coord`
    pub fn slot_by_coordinates(&self, coord: Point2D) -> Option<&Slot> {
        self.slot_index_by_coordinates(coord)
            .map(|index| &self.slots[index])
    }

    /// Index of the slot whose footprint covers `coord`
    pub fn slot_index_by_coordinates(&self, coord: Point2D) -> Option<usize> {
        if !self.is_within_boundaries(coord) {
            return None;
        }
        self.slots.iter().position(|slot| {
            slot.instance()
                .map_or(false, |instance| instance.covers(coord))
        })
    }
}
