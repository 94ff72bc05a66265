//! Item instances: one placed occurrence of an item definition

use crate::id::InstanceId;
use crate::item::ItemDefinition;
use crate::point::Point2D;
use std::sync::Arc;

/// A concrete occurrence of an [`ItemDefinition`] with its own rotation and
/// grid placement.
///
/// One instance backs one slot, never one unit: a stack of 10 arrows is a
/// single instance with quantity 10 stored on its slot.
#[derive(Debug, Clone)]
pub struct ItemInstance {
    id: InstanceId,
    item: Arc<ItemDefinition>,
    top_left: Point2D,
    size: Point2D,
    cells: Vec<Point2D>,
    rotated: bool,
}

impl ItemInstance {
    /// Create a fresh instance in the definition's native orientation.
    ///
    /// A misconfigured definition is reported through `log::warn!`; the
    /// instance is still returned.
    pub fn new(item: Arc<ItemDefinition>) -> Self {
        if let Some(issue) = item.configuration_issue() {
            log::warn!("Creating instance of misconfigured item '{}': {}", item.id, issue);
        }

        let instance = Self {
            id: InstanceId::next(),
            size: item.size,
            cells: item.size_in_cells(),
            item,
            top_left: Point2D::ZERO,
            rotated: false,
        };

        if let Some(behavior) = &instance.item.behavior {
            behavior.on_construct(&instance);
        }

        instance
    }

    /// Copy this instance's state under a new ID
    pub fn duplicate(&self) -> Self {
        Self {
            id: InstanceId::next(),
            ..self.clone()
        }
    }

    /// Instance ID
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// Shared definition
    pub fn item(&self) -> &Arc<ItemDefinition> {
        &self.item
    }

    /// Top-left grid coordinate
    pub fn top_left(&self) -> Point2D {
        self.top_left
    }

    /// Place the instance at a new top-left coordinate
    pub fn set_top_left(&mut self, top_left: Point2D) {
        self.top_left = top_left;
    }

    /// Current footprint size
    pub fn size(&self) -> Point2D {
        self.size
    }

    /// Current footprint as offsets from the top-left cell
    pub fn cells(&self) -> &[Point2D] {
        &self.cells
    }

    /// Whether the footprint is transposed from the native one
    pub fn is_rotated(&self) -> bool {
        self.rotated
    }

    /// Toggle between native and transposed footprint.
    ///
    /// Returns false and leaves the instance untouched when the definition
    /// cannot be rotated.
    pub fn rotate(&mut self) -> bool {
        if !self.item.can_be_rotated() {
            return false;
        }

        self.transpose();
        if let Some(behavior) = &self.item.behavior {
            behavior.on_rotated(self);
        }
        true
    }

    /// Force a specific rotation state without firing `on_rotated`
    pub fn set_rotation(&mut self, rotated: bool) {
        if self.rotated != rotated && self.item.can_be_rotated() {
            self.transpose();
        }
    }

    /// Return to the native footprint without firing `on_rotated`
    pub fn reset_rotation(&mut self) {
        self.set_rotation(false);
    }

    fn transpose(&mut self) {
        self.rotated = !self.rotated;
        self.size = self.size.transposed();
        for cell in &mut self.cells {
            *cell = cell.transposed();
        }
    }

    /// Absolute grid cells covered at the current placement
    pub fn occupied_cells(&self) -> impl Iterator<Item = Point2D> + '_ {
        self.cells.iter().map(move |offset| self.top_left + *offset)
    }

    /// Whether the footprint covers `coord` at the current placement
    pub fn covers(&self, coord: Point2D) -> bool {
        self.occupied_cells().any(|cell| cell == coord)
    }
}
