//! Grid Inventory - Spatial Inventory Engine
//!
//! This crate provides a grid-based inventory where items occupy multi-cell
//! footprints.
//!
//! # Features
//!
//! - Item definitions with footprint, stacking, weight and capability flags
//! - First-fit placement with rotate-and-retry
//! - Stack top-up, splitting and merging
//! - Equipment slots with primary/secondary affinity and swapping
//! - Carry weight and money
//! - Drop/loot through a world bridge trait
//! - Change events on a priority-ordered bus
//!
//! # Example
//!
//! ```
//! use grid_inventory::prelude::*;
//!
//! let arrows = ItemDefinition::new("arrow", "Arrow").with_max_stack(10).shared();
//! let mut inventory = Inventory::new(InventoryConfig::with_grid(4, 4));
//!
//! inventory.add_new_item(&arrows, 25).unwrap();
//! assert_eq!(inventory.slots().len(), 3);
//! assert_eq!(inventory.count_item_quantity(&arrows), 25);
//! ```

pub mod config;
pub mod equipment;
pub mod error;
pub mod events;
pub mod id;
pub mod instance;
pub mod inventory;
pub mod item;
pub mod pickup;
pub mod point;
pub mod slot;

pub mod prelude {
    pub use crate::config::{InventoryConfig, ItemCatalog, MaxWeightPolicy, StartupItem};
    pub use crate::equipment::{EquipmentSlot, EquipmentSlotType, EquipmentSlots};
    pub use crate::error::{ConfigError, InventoryError};
    pub use crate::events::InventoryEvent;
    pub use crate::id::{InstanceId, InventoryId};
    pub use crate::instance::ItemInstance;
    pub use crate::inventory::{spawn_item, InFlightSlot, Inventory};
    pub use crate::item::{ItemBehavior, ItemDefinition, ItemType, PickupSpec};
    pub use crate::pickup::{
        ActorPose, MemoryWorld, PickupBridge, PickupHandle, SpawnRequest, Transform, WorldPickup,
    };
    pub use crate::point::Point2D;
    pub use crate::slot::Slot;
    pub use grid_event::{Priority, SubscriberId};
}

pub use prelude::*;
