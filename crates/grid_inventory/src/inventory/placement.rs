//! Placement queries over the occupancy grid

use super::Inventory;
use crate::instance::ItemInstance;
use crate::point::Point2D;

impl Inventory {
    /// Check if a coordinate lies inside the grid
    pub fn is_within_boundaries(&self, coord: Point2D) -> bool {
        coord.x >= 0 && coord.y >= 0 && coord.x < self.grid_size.x && coord.y < self.grid_size.y
    }

    /// Inside the grid and not covered by any placed item
    pub fn is_free_cell(&self, coord: Point2D) -> bool {
        self.is_within_boundaries(coord)
            && !self
                .slots
                .iter()
                .filter_map(|slot| slot.instance())
                .any(|instance| instance.covers(coord))
    }

    /// Every `top_left + offset` cell is free. Coordinates that overflow
    /// never fit.
    pub fn does_item_fit(&self, offsets: &[Point2D], top_left: Point2D) -> bool {
        offsets.iter().all(|offset| {
            top_left
                .checked_add(*offset)
                .map_or(false, |cell| self.is_free_cell(cell))
        })
    }

    /// First free cell in row-major order
    pub fn free_cell(&self) -> Option<Point2D> {
        self.cells.iter().copied().find(|cell| self.is_free_cell(*cell))
    }

    /// First free cell where the whole footprint fits (first-fit)
    pub fn free_cell_where_item_can_fit(&self, offsets: &[Point2D]) -> Option<Point2D> {
        self.cells
            .iter()
            .copied()
            .find(|cell| self.is_free_cell(*cell) && self.does_item_fit(offsets, *cell))
    }

    /// Find a spot for `instance`, rotating it once if the current
    /// orientation has none. The instance is left in whichever orientation
    /// was tried last.
    pub(crate) fn find_placement(&self, instance: &mut ItemInstance) -> Option<Point2D> {
        if let Some(cell) = self.free_cell_where_item_can_fit(instance.cells()) {
            return Some(cell);
        }
        if instance.rotate() {
            return self.free_cell_where_item_can_fit(instance.cells());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InventoryConfig;
    use crate::item::ItemDefinition;

    #[test]
    fn test_boundaries() {
        let inventory = Inventory::new(InventoryConfig::with_grid(4, 3));

        assert!(inventory.is_within_boundaries(Point2D::new(0, 0)));
        assert!(inventory.is_within_boundaries(Point2D::new(3, 2)));
        for coord in [(-1, 0), (0, -1), (4, 0), (0, 3), (10, 10)] {
            assert!(!inventory.is_within_boundaries(coord.into()));
            assert!(!inventory.is_free_cell(coord.into()));
        }
    }

    #[test]
    fn test_fit_rejects_out_of_bounds_offsets() {
        let inventory = Inventory::new(InventoryConfig::with_grid(3, 3));
        let offsets = [Point2D::new(0, 0), Point2D::new(-1, 0)];

        assert!(!inventory.does_item_fit(&offsets, Point2D::new(0, 0)));
        assert!(inventory.does_item_fit(&offsets, Point2D::new(1, 0)));
    }

    #[test]
    fn test_fit_far_away_coordinates() {
        let inventory = Inventory::new(InventoryConfig::with_grid(3, 3));

        assert!(!inventory.does_item_fit(&[Point2D::new(1, 0)], Point2D::new(i32::MAX, 0)));
        assert!(!inventory.does_item_fit(&[Point2D::new(0, -1)], Point2D::new(0, i32::MIN)));
        assert!(!inventory.is_free_cell(Point2D::new(i32::MIN, i32::MAX)));
    }

    #[test]
    fn test_free_cell_first_fit() {
        let mut inventory = Inventory::new(InventoryConfig::with_grid(3, 2));
        assert_eq!(inventory.free_cell(), Some(Point2D::new(0, 0)));

        let wide = ItemDefinition::new("plank", "Plank").with_size(2, 1).shared();
        inventory.add_new_item(&wide, 1).unwrap();
        assert_eq!(inventory.free_cell(), Some(Point2D::new(2, 0)));

        // Another 2x1 cannot start at (2, 0), so it goes on the next row
        let offsets = wide.size_in_cells();
        assert_eq!(
            inventory.free_cell_where_item_can_fit(&offsets),
            Some(Point2D::new(0, 1))
        );
    }

    #[test]
    fn test_find_placement_rotates() {
        let inventory = Inventory::new(InventoryConfig::with_grid(1, 3));
        let rifle = ItemDefinition::new("rifle", "Rifle").with_size(3, 1).shared();
        let mut instance = ItemInstance::new(rifle);

        assert_eq!(inventory.find_placement(&mut instance), Some(Point2D::ZERO));
        assert!(instance.is_rotated());
    }

    #[test]
    fn test_no_free_cell() {
        let mut inventory = Inventory::new(InventoryConfig::with_grid(1, 1));
        let gem = ItemDefinition::new("gem", "Gem").shared();
        inventory.add_new_item(&gem, 1).unwrap();

        assert_eq!(inventory.free_cell(), None);
        assert_eq!(inventory.free_cell_where_item_can_fit(&gem.size_in_cells()), None);
    }
}
