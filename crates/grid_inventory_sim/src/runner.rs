//! Runs scenario actions against an inventory and an in-memory world

use crate::scenario::{Action, Scenario};
use grid_inventory::{
    spawn_item, ConfigError, Inventory, InventoryError, ItemCatalog, MemoryWorld, Point2D,
    Transform,
};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::Arc;

/// Outcome counters for a run
#[derive(Debug, Default, Clone)]
pub struct RunReport {
    pub succeeded: usize,
    pub rejected: usize,
    pub events: BTreeMap<&'static str, usize>,
}

pub struct Runner {
    scenario: Scenario,
    catalog: ItemCatalog,
    inventory: Inventory,
    world: MemoryWorld,
    events: Arc<Mutex<BTreeMap<&'static str, usize>>>,
}

impl Runner {
    pub fn new(scenario: Scenario) -> Result<Self, ConfigError> {
        let catalog = scenario.catalog()?;
        let mut inventory = Inventory::new(scenario.inventory.clone());

        let events = Arc::new(Mutex::new(BTreeMap::new()));
        let counter = events.clone();
        inventory.subscribe(move |event| {
            log::debug!("event: {}", event.name());
            *counter.lock().entry(event.name()).or_insert(0) += 1;
        });

        inventory.start(&catalog)?;
        log::info!(
            "Inventory ready: {}x{} grid, {} money, weight {:.2}/{:.2}",
            inventory.grid_size().x,
            inventory.grid_size().y,
            inventory.money(),
            inventory.current_weight(),
            inventory.max_weight()
        );

        Ok(Self {
            scenario,
            catalog,
            inventory,
            world: MemoryWorld::new(),
            events,
        })
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn world(&self) -> &MemoryWorld {
        &self.world
    }

    /// Run every action in order. Rejected actions are logged and counted.
    pub fn run(&mut self) -> Result<RunReport, ConfigError> {
        let mut report = RunReport::default();
        let actions = self.scenario.actions.clone();

        for (step, action) in actions.iter().enumerate() {
            match self.apply(action)? {
                Ok(summary) => {
                    log::info!("[{}] {}: {}", step, action.name(), summary);
                    report.succeeded += 1;
                }
                Err(err) => {
                    log::warn!("[{}] {} rejected: {}", step, action.name(), err);
                    report.rejected += 1;
                }
            }
        }

        report.events = self.events.lock().clone();
        Ok(report)
    }

    fn slot_at(&self, at: Point2D) -> Result<grid_inventory::InstanceId, InventoryError> {
        self.inventory
            .slot_by_coordinates(at)
            .and_then(|slot| slot.id())
            .ok_or(InventoryError::CellEmpty(at))
    }

    fn apply(&mut self, action: &Action) -> Result<Result<String, InventoryError>, ConfigError> {
        let outcome = match action {
            Action::Add { item, quantity } => {
                let item = self.catalog.resolve(item)?;
                self.inventory
                    .add_new_item(&item, *quantity)
                    .map(|added| format!("added {} x '{}'", added, item.id))
            }
            Action::Remove { item, quantity } => {
                let item = self.catalog.resolve(item)?;
                self.inventory
                    .remove_item(&item, *quantity)
                    .map(|removed| format!("removed {} x '{}'", removed, item.id))
            }
            Action::Move { from, to, rotate } => self.slot_at(*from).and_then(|id| {
                let mut in_flight = self.inventory.pick_up_slot(id)?;
                if *rotate {
                    in_flight.rotate();
                }
                in_flight.move_to(*to)?;
                Ok(format!("moved {} to {}", from, to))
            }),
            Action::Stack { from, to, quantity } => self.slot_at(*from).and_then(|id| {
                self.inventory
                    .stack_item_stack_on_slot(id, *to, *quantity)
                    .map(|moved| format!("stacked {} onto {}", moved, to))
            }),
            Action::Equip { at } => self.slot_at(*at).and_then(|id| {
                self.inventory
                    .equip_item_on_slot(id)
                    .map(|slot| format!("equipped into {:?}", slot))
            }),
            Action::Unequip { slot } => self
                .inventory
                .unequip_item(*slot)
                .map(|quantity| format!("unequipped {} from {:?}", quantity, slot)),
            Action::Use { at } => self.slot_at(*at).and_then(|id| {
                self.inventory
                    .use_item_on_slot(id)
                    .map(|used| format!("used {}", used))
            }),
            Action::Drop { at } => self.slot_at(*at).and_then(|id| {
                let pose = self.scenario.actor.pose();
                self.inventory
                    .drop_item_on_slot(id, &pose, &mut self.world)
                    .map(|handle| format!("dropped as pickup {:?}", handle))
            }),
            Action::Loot => self.loot_in_reach(),
            Action::Spawn {
                item,
                quantity,
                location,
            } => {
                let item = self.catalog.resolve(item)?;
                let scale = item.pickup.as_ref().map_or([1.0; 3], |spec| spec.scale);
                spawn_item(
                    &mut self.world,
                    &item,
                    *quantity,
                    Transform::at(*location).with_scale(scale),
                )
                .map(|handle| format!("spawned {} x '{}' as {:?}", quantity, item.id, handle))
            }
            Action::Money { amount } => {
                let magnitude = u32::try_from(amount.unsigned_abs()).unwrap_or(u32::MAX);
                let balance = if *amount >= 0 {
                    self.inventory.add_money(magnitude)
                } else {
                    self.inventory.remove_money(magnitude)
                };
                Ok(format!("balance {}", balance))
            }
        };
        Ok(outcome)
    }

    fn loot_in_reach(&mut self) -> Result<String, InventoryError> {
        let actor = &self.scenario.actor;
        let handles = self.world.pickups_in_range(actor.location, actor.reach);

        let mut looted = 0;
        let mut last_error = None;
        for handle in handles {
            match self.inventory.loot_item(handle, &mut self.world) {
                Ok(quantity) => looted += quantity,
                Err(InventoryError::InsufficientSpace { added }) => {
                    looted += added;
                    last_error = Some(InventoryError::InsufficientSpace { added: looted });
                }
                Err(err) => last_error = Some(err),
            }
        }

        match last_error {
            Some(err) if looted == 0 => Err(err),
            Some(err) => Ok(format!("looted {} ({})", looted, err)),
            None => Ok(format!("looted {}", looted)),
        }
    }
}

/// Draw the grid with one letter per slot, plus a legend
pub fn render_grid(inventory: &Inventory) -> String {
    const SYMBOLS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

    let size = inventory.grid_size();
    let mut out = String::new();
    for y in 0..size.y {
        for x in 0..size.x {
            let symbol = inventory
                .slot_index_by_coordinates(Point2D::new(x, y))
                .map_or('.', |index| SYMBOLS[index % SYMBOLS.len()] as char);
            out.push(symbol);
        }
        out.push('\n');
    }

    for (index, slot) in inventory.slots().iter().enumerate() {
        if let Some(item) = slot.item() {
            let _ = writeln!(
                out,
                "{} {} {}",
                SYMBOLS[index % SYMBOLS.len()] as char,
                item.name,
                item.format_quantity(slot.quantity())
            );
        }
    }
    for (slot_type, slot) in inventory.equipped_items() {
        if let Some(item) = slot.item() {
            let _ = writeln!(out, "[{:?}] {}", slot_type, item.name);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r#"
        [inventory]
        grid_size = { x = 4, y = 3 }
        starting_money = 40
        equipment_slots = ["PrimaryWeapon"]

        [[inventory.startup_items]]
        item = "arrow"
        quantity = 5

        [[items]]
        id = "arrow"
        name = "Arrow"
        stackable = true
        max_stack_size = 10
        droppable = true
        pickup = { mesh = "arrow" }

        [[items]]
        id = "bow"
        name = "Bow"
        size = { x = 1, y = 3 }
        equippable = true
        primary_equipment_slot = "PrimaryWeapon"

        [[actions]]
        action = "add"
        item = "bow"
        quantity = 1

        [[actions]]
        action = "equip"
        at = { x = 1, y = 0 }

        [[actions]]
        action = "drop"
        at = { x = 0, y = 0 }

        [[actions]]
        action = "loot"

        [[actions]]
        action = "use"
        at = { x = 3, y = 2 }

        [[actions]]
        action = "money"
        amount = -15
    "#;

    #[test]
    fn test_run_scenario() {
        let scenario = Scenario::from_toml_str(SCENARIO).unwrap();
        let mut runner = Runner::new(scenario).unwrap();
        let report = runner.run().unwrap();

        assert_eq!(report.succeeded, 5);
        assert_eq!(report.rejected, 1);
        assert_eq!(runner.inventory().money(), 25);
        assert!(runner.world().is_empty());
        assert_eq!(report.events.get("item_equipped"), Some(&1));

        let equipped = runner.inventory().equipped_items().count();
        assert_eq!(equipped, 1);
    }

    #[test]
    fn test_render_grid() {
        let scenario = Scenario::from_toml_str(SCENARIO).unwrap();
        let runner = Runner::new(scenario).unwrap();

        let rendered = render_grid(runner.inventory());
        let mut lines = rendered.lines();
        assert_eq!(lines.next(), Some("A..."));
        assert_eq!(lines.next(), Some("...."));
        assert_eq!(lines.next(), Some("...."));
        assert_eq!(lines.next(), Some("A Arrow 5"));
    }
}
