use serde::{Deserialize, Serialize};

use crate::grid::{GridGeometry, PlacedItem, PlacementGrid, PlacementId, Vec2f};
use crate::item::Item;
use crate::star_link::{self, ListenerId, StarLinkAnalyzer, StarLinkReport};

/// Live feedback for an item hovering over the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementPreview {
    pub row: i32,
    pub col: i32,
    pub valid: bool,
    /// Local star offsets that would bond at this position.
    pub active_stars: Vec<(i32, i32)>,
}

/// The grid plus its star-link analysis.
///
/// Every mutation goes through here so the analyzer is recomputed (and its
/// listeners notified) right after the grid changes.
#[derive(Debug, Default)]
pub struct Warehouse {
    grid: PlacementGrid,
    links: StarLinkAnalyzer,
}

impl Warehouse {
    pub fn new(rows: usize, columns: usize, geometry: GridGeometry) -> Self {
        Self::from_grid(PlacementGrid::new(rows, columns, geometry))
    }

    pub fn from_grid(grid: PlacementGrid) -> Self {
        let mut warehouse = Self {
            grid,
            links: StarLinkAnalyzer::new(),
        };
        warehouse.links.recompute(warehouse.grid.placed());
        warehouse
    }

    pub fn grid(&self) -> &PlacementGrid {
        &self.grid
    }

    pub fn placed(&self) -> &[PlacedItem] {
        self.grid.placed()
    }

    pub fn can_place(&self, item: &Item, row: i32, col: i32) -> bool {
        self.grid.can_place(item, row, col)
    }

    pub fn place(&mut self, item: Item, row: i32, col: i32) -> Option<PlacementId> {
        let id = self.grid.place(item, row, col)?;
        self.refresh();
        Some(id)
    }

    pub fn remove(&mut self, id: PlacementId) -> Option<PlacedItem> {
        let removed = self.grid.remove(id)?;
        self.refresh();
        Some(removed)
    }

    pub fn remove_where<F>(&mut self, pred: F) -> Option<PlacedItem>
    where
        F: FnMut(&PlacedItem) -> bool,
    {
        let removed = self.grid.remove_where(pred)?;
        self.refresh();
        Some(removed)
    }

    /// Lifts the item under `pointer` off the grid to start a drag.
    pub fn pick_up(&mut self, pointer: Vec2f, preferred: Option<PlacementId>) -> Option<PlacedItem> {
        let id = self.grid.placed_at_point(pointer, preferred)?.id;
        self.remove(id)
    }

    /// Puts a picked-up item back where it was, with its old id.
    pub fn restore(&mut self, placed: PlacedItem) -> bool {
        if !self.grid.reinsert(placed) {
            return false;
        }
        self.refresh();
        true
    }

    pub fn clear(&mut self) -> Vec<PlacedItem> {
        let removed = self.grid.clear();
        self.refresh();
        removed
    }

    pub fn resize(&mut self, rows: usize, columns: usize, geometry: GridGeometry) -> Vec<PlacedItem> {
        let evicted = self.grid.resize(rows, columns, geometry);
        self.refresh();
        evicted
    }

    pub(crate) fn replace_grid(&mut self, grid: PlacementGrid) {
        self.grid = grid;
        self.refresh();
    }

    /// Forces a full star-link recompute and broadcast.
    pub fn refresh(&mut self) -> &StarLinkReport {
        self.links.recompute(self.grid.placed())
    }

    pub fn star_links(&self) -> &StarLinkReport {
        self.links.last()
    }

    pub fn star_link_snapshot(&self) -> StarLinkReport {
        self.links.snapshot()
    }

    pub fn add_star_link_listener<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&StarLinkReport) + 'static,
    {
        self.links.add_listener(listener)
    }

    pub fn remove_star_link_listener(&mut self, id: ListenerId) -> bool {
        self.links.remove_listener(id)
    }

    pub fn pointer_to_anchored_cell(&self, pointer: Vec2f, item: &Item) -> Option<(i32, i32)> {
        self.grid.pointer_to_anchored_cell(pointer, item)
    }

    pub fn cell_to_top_left(&self, row: i32, col: i32) -> Vec2f {
        self.grid.cell_to_top_left(row, col)
    }

    pub fn placed_at_point(&self, pointer: Vec2f, preferred: Option<PlacementId>) -> Option<&PlacedItem> {
        self.grid.placed_at_point(pointer, preferred)
    }

    pub fn preview(&self, item: &Item, row: i32, col: i32) -> PlacementPreview {
        PlacementPreview {
            row,
            col,
            valid: self.grid.can_place(item, row, col),
            active_stars: star_link::candidate_active_star_cells(self.grid.placed(), item, row, col),
        }
    }

    /// Preview for `item` centered under `pointer`, if the pointer is over the grid.
    pub fn preview_at(&self, pointer: Vec2f, item: &Item) -> Option<PlacementPreview> {
        let (row, col) = self.pointer_to_anchored_cell(pointer, item)?;
        Some(self.preview(item, row, col))
    }

    pub fn active_star_cells(&self, id: PlacementId) -> Vec<(i32, i32)> {
        star_link::active_star_cells(self.grid.placed(), id)
    }

    /// Info panel text for a placed item, including its star-link bonus.
    pub fn info_lines(&self, id: PlacementId) -> Option<Vec<String>> {
        let placed = self.grid.get(id)?;
        Some(placed.item.info_lines(self.links.last().bonus_for(id)))
    }
}
