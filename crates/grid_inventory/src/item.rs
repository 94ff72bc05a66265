//! Item definitions and behavior hooks

use crate::equipment::EquipmentSlotType;
use crate::instance::ItemInstance;
use crate::point::Point2D;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Broad item type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    /// No particular type
    None,
    /// Weapons, armor and other gear
    Equipment,
    /// Potions, food, etc.
    Consumable,
    /// Ammunition
    Ammunition,
}

impl Default for ItemType {
    fn default() -> Self {
        Self::None
    }
}

/// Custom per-item behavior.
///
/// Every hook defaults to doing nothing, so implementors only override what
/// they need.
pub trait ItemBehavior: fmt::Debug + Send + Sync {
    /// Called once when a new instance of the item is created
    fn on_construct(&self, _instance: &ItemInstance) {}

    /// Called after an instance switched between native and rotated footprint
    fn on_rotated(&self, _instance: &ItemInstance) {}

    /// Called after `quantity` units were consumed from a slot
    fn on_used(&self, _instance: &ItemInstance, _quantity: u32) {}
}

/// How an item appears in the world when dropped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupSpec {
    /// Mesh/asset path for the world representation
    pub mesh: String,
    /// Scale applied to the spawned pickup
    pub scale: [f32; 3],
}

impl PickupSpec {
    /// Create a pickup spec with the default scale
    pub fn new(mesh: impl Into<String>) -> Self {
        Self {
            mesh: mesh.into(),
            ..Self::default()
        }
    }

    /// Set uniform scale
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = [scale; 3];
        self
    }
}

impl Default for PickupSpec {
    fn default() -> Self {
        Self {
            mesh: String::new(),
            scale: [0.25; 3],
        }
    }
}

/// Immutable template describing an item type.
///
/// Definitions are shared between instances through `Arc<ItemDefinition>`
/// and compared by `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemDefinition {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Description
    pub description: String,
    /// Item type
    pub item_type: ItemType,
    /// Footprint in cells (width, height)
    pub size: Point2D,
    /// Whether units of this item share a slot
    pub stackable: bool,
    /// Maximum units per slot when stackable
    pub max_stack_size: u32,
    /// Derive weight from footprint area instead of `weight`
    pub use_scaled_weight: bool,
    /// Flat weight per unit (ignored when `use_scaled_weight` is set)
    pub weight: f32,
    /// Allow rotating square items (non-square items can always rotate)
    pub rotatable: bool,
    /// Whether the item can be equipped
    pub equippable: bool,
    /// Preferred equipment slot
    pub primary_equipment_slot: EquipmentSlotType,
    /// Fallback equipment slot
    pub secondary_equipment_slot: EquipmentSlotType,
    /// Whether the item can be consumed
    pub consumable: bool,
    /// Units removed per use
    pub consumed_per_use: u32,
    /// Whether the item can be dropped into the world
    pub droppable: bool,
    /// World representation used when dropped
    pub pickup: Option<PickupSpec>,
    /// Text shown before the quantity (e.g. "x")
    pub unit_prefix: String,
    /// Text shown after the quantity (e.g. " rounds")
    pub unit_suffix: String,
    /// Custom hooks
    #[serde(skip)]
    pub behavior: Option<Arc<dyn ItemBehavior>>,
}

impl ItemDefinition {
    /// Create a new 1x1, non-stackable item definition
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            item_type: ItemType::default(),
            size: Point2D::new(1, 1),
            stackable: false,
            max_stack_size: 2,
            use_scaled_weight: true,
            weight: 0.0,
            rotatable: false,
            equippable: false,
            primary_equipment_slot: EquipmentSlotType::None,
            secondary_equipment_slot: EquipmentSlotType::None,
            consumable: false,
            consumed_per_use: 1,
            droppable: false,
            pickup: None,
            unit_prefix: String::new(),
            unit_suffix: String::new(),
            behavior: None,
        }
    }

    /// Set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Set item type
    pub fn with_type(mut self, item_type: ItemType) -> Self {
        self.item_type = item_type;
        self
    }

    /// Set footprint size in cells
    pub fn with_size(mut self, width: i32, height: i32) -> Self {
        self.size = Point2D::new(width, height);
        self
    }

    /// Make stackable with the given max stack size (at least 2)
    pub fn with_max_stack(mut self, max: u32) -> Self {
        self.stackable = true;
        self.max_stack_size = max.max(2);
        self
    }

    /// Use a flat per-unit weight instead of the area-derived one
    pub fn with_weight(mut self, weight: f32) -> Self {
        self.use_scaled_weight = false;
        self.weight = weight.max(0.0);
        self
    }

    /// Allow rotation even for square items
    pub fn rotatable(mut self) -> Self {
        self.rotatable = true;
        self
    }

    /// Make equippable into the given slots
    pub fn equippable(mut self, primary: EquipmentSlotType, secondary: EquipmentSlotType) -> Self {
        self.equippable = true;
        self.consumable = false;
        self.primary_equipment_slot = primary;
        self.secondary_equipment_slot = secondary;
        self
    }

    /// Make consumable, removing `per_use` units on each use
    pub fn consumable(mut self, per_use: u32) -> Self {
        self.consumable = true;
        self.equippable = false;
        self.consumed_per_use = per_use.max(1);
        self
    }

    /// Make droppable with the given world representation
    pub fn with_pickup(mut self, pickup: PickupSpec) -> Self {
        self.droppable = true;
        self.pickup = Some(pickup);
        self
    }

    /// Set quantity display affixes
    pub fn with_units(mut self, prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        self.unit_prefix = prefix.into();
        self.unit_suffix = suffix.into();
        self
    }

    /// Attach custom hooks
    pub fn with_behavior(mut self, behavior: Arc<dyn ItemBehavior>) -> Self {
        self.behavior = Some(behavior);
        self
    }

    /// Wrap in an `Arc` for sharing between instances
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Check if stackable
    pub fn is_stackable(&self) -> bool {
        self.stackable
    }

    /// Most units a single slot can hold
    pub fn stack_limit(&self) -> u32 {
        if self.stackable {
            self.max_stack_size
        } else {
            1
        }
    }

    /// Whether two definitions describe the same item
    pub fn is_same_item(&self, other: &ItemDefinition) -> bool {
        self.id == other.id
    }

    /// Native footprint as cell offsets from the top-left cell
    pub fn size_in_cells(&self) -> Vec<Point2D> {
        let mut cells = Vec::with_capacity(self.size.area() as usize);
        for y in 0..self.size.y {
            for x in 0..self.size.x {
                cells.push(Point2D::new(x, y));
            }
        }
        cells
    }

    /// Non-square items can always rotate; square ones only when flagged
    pub fn can_be_rotated(&self) -> bool {
        self.size.x != self.size.y || self.rotatable
    }

    /// Area-derived weight: area per unit of a full stack, or the full area
    pub fn scaled_weight(&self) -> f32 {
        let area = self.size.area() as f32;
        if self.stackable && self.max_stack_size > 0 {
            area / self.max_stack_size as f32
        } else {
            area
        }
    }

    /// Weight of a single unit
    pub fn unit_weight(&self) -> f32 {
        if self.use_scaled_weight {
            self.scaled_weight()
        } else {
            self.weight
        }
    }

    /// Whether a primary equipment slot is configured
    pub fn has_valid_equipment_slot(&self) -> bool {
        self.primary_equipment_slot != EquipmentSlotType::None
    }

    /// Format a quantity with the unit affixes
    pub fn format_quantity(&self, quantity: u32) -> String {
        format!("{}{}{}", self.unit_prefix, quantity, self.unit_suffix)
    }

    /// Describe the first configuration problem, if any
    pub fn configuration_issue(&self) -> Option<String> {
        if self.id.is_empty() {
            return Some("empty id".to_string());
        }
        if self.size.x <= 0 || self.size.y <= 0 {
            return Some(format!("footprint {} must be at least 1x1", self.size));
        }
        if self.stackable && self.max_stack_size < 2 {
            return Some(format!(
                "stackable items need a max stack size of at least 2, got {}",
                self.max_stack_size
            ));
        }
        if self.equippable && self.consumable {
            return Some("an item cannot be both equippable and consumable".to_string());
        }
        if self.consumable && self.consumed_per_use == 0 {
            return Some("consumed quantity per use must be at least 1".to_string());
        }
        None
    }
}

impl Default for ItemDefinition {
    fn default() -> Self {
        Self::new("unknown", "Unknown Item")
    }
}
