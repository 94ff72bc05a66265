//! The inventory engine
//!
//! An [`Inventory`] owns a cell grid, the slots placed on it, a fixed set of
//! equipment slots, carry weight and money. Slots are not indexed by cell:
//! a slot's cells are its instance's top-left coordinate plus its footprint
//! offsets, and the grid is scanned row-major when looking for space.
//!
//! Every successful mutation raises [`InventoryEvent`]s on the inventory's
//! own bus. Transactions that return an item to the grid as a sub-step
//! (equip swaps, unequip) use the silent internal add and notify once for
//! the whole operation.

mod add;
mod drag;
mod equip;
mod placement;
mod query;
mod remove;
mod world;

pub use drag::InFlightSlot;
pub use world::spawn_item;

use crate::config::{InventoryConfig, ItemCatalog};
use crate::equipment::{EquipmentSlot, EquipmentSlotType, EquipmentSlots};
use crate::error::ConfigError;
use crate::events::InventoryEvent;
use crate::id::{InstanceId, InventoryId};
use crate::point::Point2D;
use crate::slot::Slot;
use grid_event::{EventBus, EventChannel, Priority, SubscriberId};

/// Grid inventory
#[derive(Debug)]
pub struct Inventory {
    id: InventoryId,
    config: InventoryConfig,
    grid_size: Point2D,
    cells: Vec<Point2D>,
    slots: Vec<Slot>,
    equipment: EquipmentSlots,
    current_weight: f32,
    max_weight: f32,
    money: u32,
    events: EventBus<InventoryEvent>,
}

impl Inventory {
    /// Create an empty inventory laid out by `config`.
    ///
    /// No event is raised; call [`Inventory::initialize`] or
    /// [`Inventory::start`] once observers are subscribed.
    pub fn new(config: InventoryConfig) -> Self {
        let id = InventoryId::next();
        let mut inventory = Self {
            id,
            grid_size: config.grid_size,
            equipment: EquipmentSlots::new(&config.equipment_slots, id),
            config,
            cells: Vec::new(),
            slots: Vec::new(),
            current_weight: 0.0,
            max_weight: 0.0,
            money: 0,
            events: EventBus::new(),
        };
        inventory.reset();
        inventory
    }

    fn reset(&mut self) {
        self.grid_size = self.config.grid_size;
        self.max_weight = self.config.max_weight.resolve(self.grid_size);

        self.cells.clear();
        for y in 0..self.grid_size.y {
            for x in 0..self.grid_size.x {
                self.cells.push(Point2D::new(x, y));
            }
        }

        self.slots.clear();
        self.equipment.reset(self.id);
        self.current_weight = 0.0;
        self.money = 0;
    }

    /// Recompute max weight and the cell list, clear slots and equipment,
    /// then raise `Initialized`
    pub fn initialize(&mut self) {
        self.reset();
        log::debug!(
            "Inventory {:?} initialized: {}x{} grid, max weight {}",
            self.id,
            self.grid_size.x,
            self.grid_size.y,
            self.max_weight
        );
        self.notify(InventoryEvent::Initialized);
    }

    /// Add the configured startup items, then the starting money.
    ///
    /// Every startup id is resolved before anything is added. Items that do
    /// not fit are logged and skipped.
    pub fn add_startup_items(&mut self, catalog: &ItemCatalog) -> Result<(), ConfigError> {
        let resolved = self
            .config
            .startup_items
            .iter()
            .map(|entry| Ok((catalog.resolve(&entry.item)?, entry.quantity)))
            .collect::<Result<Vec<_>, ConfigError>>()?;

        for (item, quantity) in resolved {
            if let Err(err) = self.add_new_item(&item, quantity) {
                log::warn!("Startup item '{}' x{} not fully added: {}", item.id, quantity, err);
            }
        }

        let money = self.config.starting_money;
        self.add_money(money);
        Ok(())
    }

    /// [`Inventory::initialize`] followed by [`Inventory::add_startup_items`]
    pub fn start(&mut self, catalog: &ItemCatalog) -> Result<(), ConfigError> {
        self.initialize();
        self.add_startup_items(catalog)
    }

    /// Inventory ID
    pub fn id(&self) -> InventoryId {
        self.id
    }

    /// Configuration
    pub fn config(&self) -> &InventoryConfig {
        &self.config
    }

    /// Grid size in cells
    pub fn grid_size(&self) -> Point2D {
        self.grid_size
    }

    /// Every cell coordinate, row-major
    pub fn cells(&self) -> &[Point2D] {
        &self.cells
    }

    /// Placed slots in insertion order
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Slot holding the given instance
    pub fn slot(&self, id: InstanceId) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.id() == Some(id))
    }

    /// Index of the slot holding the given instance
    pub fn slot_index(&self, id: InstanceId) -> Option<usize> {
        self.slots.iter().position(|slot| slot.id() == Some(id))
    }

    /// Carried weight of the grid slots
    pub fn current_weight(&self) -> f32 {
        self.current_weight
    }

    /// Carry limit
    pub fn max_weight(&self) -> f32 {
        self.max_weight
    }

    /// Money balance
    pub fn money(&self) -> u32 {
        self.money
    }

    /// Equipment slots
    pub fn equipment_slots(&self) -> &EquipmentSlots {
        &self.equipment
    }

    /// Equipment slot with the given type
    pub fn equipment_slot(&self, slot_type: EquipmentSlotType) -> Option<&EquipmentSlot> {
        self.equipment.get(slot_type)
    }

    /// Index of the equipment slot with the given type
    pub fn equipment_slot_index(&self, slot_type: EquipmentSlotType) -> Option<usize> {
        self.equipment.index_of(slot_type)
    }

    /// Non-empty, without `None` tags or duplicates
    pub fn is_valid_equipment_slots(&self) -> bool {
        self.equipment.is_valid_configuration()
    }

    /// Add money, saturating at `u32::MAX`; returns the new balance
    pub fn add_money(&mut self, amount: u32) -> u32 {
        if amount > 0 {
            self.money = self.money.saturating_add(amount);
            self.notify(InventoryEvent::MoneyChanged);
        }
        self.money
    }

    /// Remove money, saturating at 0; returns the new balance
    pub fn remove_money(&mut self, amount: u32) -> u32 {
        if amount > 0 {
            self.money = self.money.saturating_sub(amount);
            self.notify(InventoryEvent::MoneyChanged);
        }
        self.money
    }

    /// Register an event handler
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriberId
    where
        F: Fn(&InventoryEvent) + Send + Sync + 'static,
    {
        self.events.subscribe(handler)
    }

    /// Register an event handler with priority
    pub fn subscribe_with_priority<F>(&mut self, handler: F, priority: Priority) -> SubscriberId
    where
        F: Fn(&InventoryEvent) + Send + Sync + 'static,
    {
        self.events.subscribe_with_priority(handler, priority)
    }

    /// Receive events through a channel drained by the caller
    pub fn subscribe_channel(&mut self) -> (SubscriberId, EventChannel<InventoryEvent>) {
        self.events.subscribe_channel(Priority::Normal)
    }

    /// Remove an event handler
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.events.unsubscribe(id)
    }

    pub(crate) fn notify(&mut self, event: InventoryEvent) {
        log::trace!("Inventory {:?} event: {}", self.id, event.name());
        self.events.emit(&event);
    }

    pub(crate) fn recompute_weight(&mut self) {
        self.current_weight = self.slots.iter().map(Slot::weight).sum();
    }

    /// Raise `Updated` then `WeightChanged`
    pub(crate) fn notify_changed(&mut self) {
        self.notify(InventoryEvent::Updated);
        self.notify(InventoryEvent::WeightChanged);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemDefinition;

    #[test]
    fn test_new_inventory() {
        let inventory = Inventory::new(InventoryConfig::with_grid(3, 2));

        assert_eq!(inventory.cells().len(), 6);
        assert_eq!(inventory.cells()[1], Point2D::new(1, 0));
        assert_eq!(inventory.cells()[3], Point2D::new(0, 1));
        assert_eq!(inventory.max_weight(), 6.0);
        assert_eq!(inventory.money(), 0);
        assert!(inventory.slots().is_empty());
    }

    #[test]
    fn test_initialize_emits() {
        let mut inventory = Inventory::new(InventoryConfig::with_grid(2, 2));
        let (_, channel) = inventory.subscribe_channel();

        inventory.initialize();
        assert!(matches!(channel.receive(), Some(InventoryEvent::Initialized)));
    }

    #[test]
    fn test_money() {
        let mut inventory = Inventory::new(InventoryConfig::default());
        let (_, channel) = inventory.subscribe_channel();

        assert_eq!(inventory.add_money(50), 50);
        assert_eq!(inventory.add_money(0), 50);
        assert_eq!(inventory.remove_money(80), 0);
        assert_eq!(inventory.add_money(u32::MAX), u32::MAX);
        assert_eq!(inventory.add_money(1), u32::MAX);

        // The zero call is ignored
        assert_eq!(channel.len(), 4);
    }

    #[test]
    fn test_start_with_catalog() {
        let catalog = ItemCatalog::from_definitions(vec![
            ItemDefinition::new("bandage", "Bandage").with_max_stack(5),
        ])
        .unwrap();
        let config = InventoryConfig::with_grid(4, 4)
            .with_startup_item("bandage", 7)
            .with_starting_money(250);

        let mut inventory = Inventory::new(config);
        inventory.start(&catalog).unwrap();

        assert_eq!(inventory.money(), 250);
        assert_eq!(inventory.slots().len(), 2);
    }

    #[test]
    fn test_start_unknown_item() {
        let config = InventoryConfig::with_grid(2, 2).with_startup_item("ghost", 1);
        let mut inventory = Inventory::new(config);

        let err = inventory.start(&ItemCatalog::new()).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownItem(_)));
        assert_eq!(inventory.money(), 0);
    }

    #[test]
    fn test_initialize_clears_equipment() {
        let config = InventoryConfig::with_grid(3, 3)
            .with_equipment(vec![EquipmentSlotType::PrimaryWeapon]);
        let mut inventory = Inventory::new(config);
        let sword = ItemDefinition::new("sword", "Sword")
            .with_size(1, 2)
            .equippable(EquipmentSlotType::PrimaryWeapon, EquipmentSlotType::None)
            .shared();
        inventory.add_new_item(&sword, 1).unwrap();
        let id = inventory.slots()[0].id().unwrap();
        inventory.equip_item_on_slot(id).unwrap();

        inventory.initialize();
        let primary = inventory.equipment_slot(EquipmentSlotType::PrimaryWeapon).unwrap();
        assert!(!primary.is_occupied());
        assert_eq!(primary.data.owner(), Some(inventory.id()));
        assert_eq!(inventory.equipment_slots().len(), 1);
        assert!(inventory.slots().is_empty());
    }

    #[test]
    fn test_equipment_lookup() {
        let config = InventoryConfig::with_grid(2, 2).with_equipment(vec![
            EquipmentSlotType::PrimaryWeapon,
            EquipmentSlotType::SecondaryWeapon,
        ]);
        let inventory = Inventory::new(config);

        assert!(inventory.is_valid_equipment_slots());
        assert_eq!(
            inventory.equipment_slot_index(EquipmentSlotType::SecondaryWeapon),
            Some(1)
        );
        assert!(inventory.equipment_slot(EquipmentSlotType::Head).is_none());
    }
}
