//! Scenario files
//!
//! ```toml
//! [inventory]
//! grid_size = { x = 6, y = 4 }
//! equipment_slots = ["PrimaryWeapon", "SecondaryWeapon"]
//!
//! [actor]
//! location = [0.0, 0.0, 0.0]
//! forward = [1.0, 0.0, 0.0]
//!
//! [[items]]
//! id = "arrow"
//! name = "Arrow"
//! stackable = true
//! max_stack_size = 20
//!
//! [[actions]]
//! action = "add"
//! item = "arrow"
//! quantity = 45
//! ```

use grid_inventory::{ActorPose, ConfigError, InventoryConfig, ItemCatalog, ItemDefinition};
use grid_inventory::{EquipmentSlotType, Point2D};
use serde::Deserialize;
use std::path::Path;

/// Owner position used for drops and loot range
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ActorConfig {
    pub location: [f32; 3],
    pub forward: [f32; 3],
    /// Pickups within this distance can be looted
    pub reach: f32,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            location: [0.0; 3],
            forward: [1.0, 0.0, 0.0],
            reach: 150.0,
        }
    }
}

impl ActorConfig {
    pub fn pose(&self) -> ActorPose {
        ActorPose::new(self.location, self.forward)
    }
}

/// One scripted player action. Slots are addressed by a cell they cover.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Add {
        item: String,
        quantity: u32,
    },
    Remove {
        item: String,
        quantity: u32,
    },
    Move {
        from: Point2D,
        to: Point2D,
        #[serde(default)]
        rotate: bool,
    },
    Stack {
        from: Point2D,
        to: Point2D,
        quantity: u32,
    },
    Equip {
        at: Point2D,
    },
    Unequip {
        slot: EquipmentSlotType,
    },
    Use {
        at: Point2D,
    },
    Drop {
        at: Point2D,
    },
    /// Loot every pickup within the actor's reach
    Loot,
    Spawn {
        item: String,
        quantity: u32,
        location: [f32; 3],
    },
    /// Positive adds, negative removes
    Money {
        amount: i64,
    },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::Remove { .. } => "remove",
            Self::Move { .. } => "move",
            Self::Stack { .. } => "stack",
            Self::Equip { .. } => "equip",
            Self::Unequip { .. } => "unequip",
            Self::Use { .. } => "use",
            Self::Drop { .. } => "drop",
            Self::Loot => "loot",
            Self::Spawn { .. } => "spawn",
            Self::Money { .. } => "money",
        }
    }
}

/// A full scenario: inventory layout, catalog and actions
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub inventory: InventoryConfig,
    #[serde(default)]
    pub actor: ActorConfig,
    #[serde(default)]
    pub items: Vec<ItemDefinition>,
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl Scenario {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let scenario: Self = toml::from_str(source)?;
        scenario.inventory.validate()?;
        Ok(scenario)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Build the catalog and check that every referenced item exists
    pub fn catalog(&self) -> Result<ItemCatalog, ConfigError> {
        let catalog = ItemCatalog::from_definitions(self.items.iter().cloned())?;
        for action in &self.actions {
            match action {
                Action::Add { item, .. } | Action::Remove { item, .. } | Action::Spawn { item, .. } => {
                    catalog.resolve(item)?;
                }
                _ => {}
            }
        }
        Ok(catalog)
    }
}
