//! Error types for inventory operations and configuration loading

use crate::equipment::EquipmentSlotType;
use crate::id::InstanceId;
use crate::point::Point2D;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, InventoryError>;

/// Why an inventory operation was rejected.
///
/// Rejections never leave partial state behind except where noted:
/// `InsufficientSpace` reports the quantity that was committed before space or
/// weight ran out.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InventoryError {
    #[error("Quantity must be greater than zero")]
    InvalidQuantity,

    #[error("Item '{0}' is not in the inventory")]
    ItemNotFound(String),

    #[error("No slot holds item instance {0}")]
    SlotNotFound(InstanceId),

    #[error("Slot is empty")]
    SlotEmpty,

    #[error("Insufficient space or carry weight ({added} added before running out)")]
    InsufficientSpace { added: u32 },

    #[error("Coordinates {0} are outside the grid")]
    OutOfBounds(Point2D),

    #[error("Cell {0} is already occupied")]
    CellOccupied(Point2D),

    #[error("Cell {0} is empty")]
    CellEmpty(Point2D),

    #[error("Item does not fit at {0}")]
    DoesNotFit(Point2D),

    #[error("Item '{0}' cannot be stacked")]
    NotStackable(String),

    #[error("Cannot stack '{source_item}' onto '{destination_item}'")]
    DefinitionMismatch {
        source_item: String,
        destination_item: String,
    },

    #[error("Destination stack is already full")]
    StackFull,

    #[error("No equipment slots are configured, or the configuration has None/duplicate entries")]
    EquipmentNotConfigured,

    #[error("Invalid equipment slot {0:?}")]
    InvalidEquipmentSlot(EquipmentSlotType),

    #[error("Item '{0}' cannot be equipped")]
    ItemNotEquippable(String),

    #[error("Every equipment slot for '{0}' is taken and the equipped item cannot be swapped out")]
    EquipmentSlotBusy(String),

    #[error("Item '{0}' cannot be consumed")]
    ItemNotConsumable(String),

    #[error("Need {required} to use the item, slot holds {available}")]
    NotEnoughToUse { required: u32, available: u32 },

    #[error("Item '{0}' cannot be dropped")]
    ItemNotDroppable(String),

    #[error("Item '{0}' has no world pickup configured")]
    PickupNotConfigured(String),

    #[error("Spawn transform is not finite")]
    InvalidTransform,

    #[error("World refused to spawn a pickup for '{0}'")]
    SpawnFailed(String),

    #[error("Pickup {0} does not exist")]
    PickupNotFound(u64),
}

impl InventoryError {
    /// Quantity committed before the operation failed
    pub fn partial_quantity(&self) -> u32 {
        match self {
            Self::InsufficientSpace { added } => *added,
            _ => 0,
        }
    }
}

/// Errors raised while loading inventory or item configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown item '{0}'")]
    UnknownItem(String),

    #[error("Duplicate item '{0}' in catalog")]
    DuplicateItem(String),

    #[error("Invalid item '{id}': {reason}")]
    InvalidItem { id: String, reason: String },

    #[error("Invalid grid size {0}")]
    InvalidGridSize(Point2D),
}
