//! Load-time configuration: grid geometry, weight policy, equipment layout,
//! startup items and the item catalog.
//!
//! # Example
//!
//! ```toml
//! grid_size = { x = 8, y = 6 }
//! max_weight = "grid_area"          # or { fixed = 40.0 }
//! starting_money = 250
//! equipment_slots = ["PrimaryWeapon", "SecondaryWeapon"]
//!
//! [[startup_items]]
//! item = "bandage"
//! quantity = 3
//! ```

use crate::equipment::EquipmentSlotType;
use crate::error::ConfigError;
use crate::item::ItemDefinition;
use crate::point::Point2D;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// How the carry limit is determined
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxWeightPolicy {
    /// Fixed carry limit
    Fixed(f32),
    /// One weight unit per grid cell
    GridArea,
}

impl Default for MaxWeightPolicy {
    fn default() -> Self {
        Self::GridArea
    }
}

impl MaxWeightPolicy {
    /// Resolve the carry limit for a grid
    pub fn resolve(&self, grid_size: Point2D) -> f32 {
        match self {
            Self::Fixed(limit) => limit.max(0.0),
            Self::GridArea => grid_size.area() as f32,
        }
    }
}

/// An item granted when the inventory starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartupItem {
    /// Catalog id
    pub item: String,
    /// Units to add
    pub quantity: u32,
}

impl StartupItem {
    /// Create a startup entry
    pub fn new(item: impl Into<String>, quantity: u32) -> Self {
        Self {
            item: item.into(),
            quantity,
        }
    }
}

/// Inventory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// Grid size in cells (width, height)
    pub grid_size: Point2D,
    /// Carry limit policy
    pub max_weight: MaxWeightPolicy,
    /// Money granted by startup
    pub starting_money: u32,
    /// Items granted by startup
    pub startup_items: Vec<StartupItem>,
    /// Equipment slot layout
    pub equipment_slots: Vec<EquipmentSlotType>,
    /// Distance in front of the owner where dropped items spawn
    pub pickup_spawn_radius: f32,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            grid_size: Point2D::new(1, 1),
            max_weight: MaxWeightPolicy::default(),
            starting_money: 100,
            startup_items: Vec::new(),
            equipment_slots: Vec::new(),
            pickup_spawn_radius: 100.0,
        }
    }
}

impl InventoryConfig {
    /// Config with the given grid size and defaults elsewhere
    pub fn with_grid(width: i32, height: i32) -> Self {
        Self {
            grid_size: Point2D::new(width, height),
            ..Self::default()
        }
    }

    /// Set a fixed carry limit
    pub fn with_max_weight(mut self, limit: f32) -> Self {
        self.max_weight = MaxWeightPolicy::Fixed(limit);
        self
    }

    /// Set the equipment slot layout
    pub fn with_equipment(mut self, slots: Vec<EquipmentSlotType>) -> Self {
        self.equipment_slots = slots;
        self
    }

    /// Set starting money
    pub fn with_starting_money(mut self, money: u32) -> Self {
        self.starting_money = money;
        self
    }

    /// Add a startup item
    pub fn with_startup_item(mut self, item: impl Into<String>, quantity: u32) -> Self {
        self.startup_items.push(StartupItem::new(item, quantity));
        self
    }

    /// Parse and validate TOML
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate JSON
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load_toml(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Reject degenerate grids
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size.area() == 0 {
            return Err(ConfigError::InvalidGridSize(self.grid_size));
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    items: Vec<ItemDefinition>,
}

/// Item definitions by id, owned by the caller and handed to the inventory
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    items: HashMap<String, Arc<ItemDefinition>>,
}

impl ItemCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from definitions
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = ItemDefinition>,
    ) -> Result<Self, ConfigError> {
        let mut catalog = Self::new();
        for definition in definitions {
            catalog.insert(definition)?;
        }
        Ok(catalog)
    }

    /// Parse an `[[items]]` list from TOML
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let file: CatalogFile = toml::from_str(source)?;
        Self::from_definitions(file.items)
    }

    /// Parse an `{"items": [...]}` document from JSON
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        let file: CatalogFile = serde_json::from_str(source)?;
        Self::from_definitions(file.items)
    }

    /// Register a definition, rejecting duplicates and invalid shapes
    pub fn insert(&mut self, definition: ItemDefinition) -> Result<Arc<ItemDefinition>, ConfigError> {
        if let Some(reason) = definition.configuration_issue() {
            return Err(ConfigError::InvalidItem {
                id: definition.id,
                reason,
            });
        }
        if self.items.contains_key(&definition.id) {
            return Err(ConfigError::DuplicateItem(definition.id));
        }

        let shared = Arc::new(definition);
        self.items.insert(shared.id.clone(), shared.clone());
        Ok(shared)
    }

    /// Get a definition
    pub fn get(&self, id: &str) -> Option<&Arc<ItemDefinition>> {
        self.items.get(id)
    }

    /// Get a definition or fail with `UnknownItem`
    pub fn resolve(&self, id: &str) -> Result<Arc<ItemDefinition>, ConfigError> {
        self.get(id)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownItem(id.to_string()))
    }

    /// Number of definitions
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over definitions
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ItemDefinition>> {
        self.items.values()
    }
}
