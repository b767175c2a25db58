use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GridError;
use crate::item::Item;

pub type PlacementId = u32;

pub const DEFAULT_ROWS: usize = 6;
pub const DEFAULT_COLUMNS: usize = 10;
pub const DEFAULT_CELL_SIZE: f32 = 80.0;
pub const DEFAULT_SPACING: f32 = 5.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2f {
    pub x: f32,
    pub y: f32,
}

impl Vec2f {
    pub const ZERO: Vec2f = Vec2f { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn distance_squared(self, other: Vec2f) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// Pixel metrics of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridGeometry {
    pub cell_size: f32,
    pub spacing: f32,
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            spacing: DEFAULT_SPACING,
        }
    }
}

impl GridGeometry {
    pub fn new(cell_size: f32, spacing: f32) -> Self {
        Self { cell_size, spacing }
    }

    /// Distance between the origins of two adjacent cells.
    pub fn step(&self) -> f32 {
        self.cell_size + self.spacing
    }

    /// Pixel extent of `cells` cells laid out with spacing between them.
    pub fn span(&self, cells: usize) -> f32 {
        cells as f32 * self.step() - self.spacing
    }

    /// Offset from the center of an item's pixel footprint to the center of
    /// its anchor cell, in grid-local axes (+y up).
    pub fn anchor_offset(&self, item: &Item) -> Vec2f {
        let step = self.step();
        let center_x = self.span(item.width()) * 0.5;
        let center_y = self.span(item.height()) * 0.5;
        let anchor_x = item.anchor_col() as f32 * step + self.cell_size * 0.5;
        let anchor_y = item.anchor_row() as f32 * step + self.cell_size * 0.5;
        // Shape rows grow downward while local y grows upward.
        Vec2f::new(anchor_x - center_x, -(anchor_y - center_y))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedItem {
    pub id: PlacementId,
    pub item: Item,
    /// Grid row of the shape's local cell `[0][0]`.
    pub row: i32,
    /// Grid column of the shape's local cell `[0][0]`.
    pub col: i32,
}

impl PlacedItem {
    pub fn covers(&self, row: i32, col: i32) -> bool {
        self.item.shape().is_occupied(row - self.row, col - self.col)
    }

    pub fn touches(&self, row: i32, col: i32) -> bool {
        self.item.shape().is_interactive(row - self.row, col - self.col)
    }

    /// World cells covered by this item's occupied cells.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.item
            .shape()
            .occupied_positions()
            .into_iter()
            .map(move |(r, c)| (self.row + r, self.col + c))
    }
}

/// Occupancy engine for the warehouse grid.
///
/// This is the only place placed items are added or removed. Star cells are
/// ignored by every occupancy check: they may overlap other items freely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GridRecord")]
pub struct PlacementGrid {
    rows: usize,
    columns: usize,
    geometry: GridGeometry,
    placed: Vec<PlacedItem>,
    next_id: PlacementId,
}

/// Wire form of [`PlacementGrid`]. Every entry is re-validated through
/// `reinsert`, so a snapshot can't smuggle in overlaps or duplicate ids.
#[derive(Deserialize)]
struct GridRecord {
    rows: usize,
    columns: usize,
    #[serde(default)]
    geometry: GridGeometry,
    #[serde(default)]
    placed: Vec<PlacedItem>,
    #[serde(default)]
    next_id: PlacementId,
}

impl TryFrom<GridRecord> for PlacementGrid {
    type Error = GridError;

    fn try_from(record: GridRecord) -> Result<Self, Self::Error> {
        let mut grid = PlacementGrid::new(record.rows, record.columns, record.geometry);
        for placed in record.placed {
            let (id, row, col) = (placed.id, placed.row, placed.col);
            if id == 0 || !grid.reinsert(placed) {
                return Err(GridError::Rejected {
                    placement_id: id,
                    row,
                    col,
                });
            }
        }
        grid.next_id = grid.next_id.max(record.next_id).max(1);
        Ok(grid)
    }
}

impl Default for PlacementGrid {
    fn default() -> Self {
        Self::new(DEFAULT_ROWS, DEFAULT_COLUMNS, GridGeometry::default())
    }
}

impl PlacementGrid {
    pub fn new(rows: usize, columns: usize, geometry: GridGeometry) -> Self {
        Self {
            rows,
            columns,
            geometry,
            placed: Vec::new(),
            next_id: 1,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn geometry(&self) -> GridGeometry {
        self.geometry
    }

    pub fn placed(&self) -> &[PlacedItem] {
        &self.placed
    }

    pub fn len(&self) -> usize {
        self.placed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }

    pub fn get(&self, id: PlacementId) -> Option<&PlacedItem> {
        self.placed.iter().find(|p| p.id == id)
    }

    pub fn in_bounds(&self, row: i32, col: i32) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.rows && (col as usize) < self.columns
    }

    /// The placed item whose occupied cell covers `(row, col)`, skipping `exclude`.
    pub fn occupant_at(
        &self,
        row: i32,
        col: i32,
        exclude: Option<PlacementId>,
    ) -> Option<&PlacedItem> {
        occupant_at(&self.placed, row, col, exclude)
    }

    pub fn is_cell_occupied(&self, row: i32, col: i32) -> bool {
        self.occupant_at(row, col, None).is_some()
    }

    pub fn can_place(&self, item: &Item, row: i32, col: i32) -> bool {
        self.can_place_excluding(item, row, col, None)
    }

    fn can_place_excluding(
        &self,
        item: &Item,
        row: i32,
        col: i32,
        exclude: Option<PlacementId>,
    ) -> bool {
        for (dr, dc) in item.shape().occupied_positions() {
            let grid_row = row + dr;
            let grid_col = col + dc;
            if !self.in_bounds(grid_row, grid_col) {
                return false;
            }
            if self.occupant_at(grid_row, grid_col, exclude).is_some() {
                return false;
            }
        }
        true
    }

    /// Places `item` with its local origin at `(row, col)`.
    ///
    /// Returns the new placement id, or `None` without touching the grid when
    /// the item would leave the grid or overlap another item.
    pub fn place(&mut self, item: Item, row: i32, col: i32) -> Option<PlacementId> {
        if !self.can_place(&item, row, col) {
            debug!(item_id = item.id(), row, col, "placement rejected");
            return None;
        }
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1).max(1);
        debug!(item_id = item.id(), placement_id = id, row, col, "item placed");
        self.placed.push(PlacedItem { id, item, row, col });
        Some(id)
    }

    /// Puts a previously removed entry back, keeping its id.
    pub fn reinsert(&mut self, placed: PlacedItem) -> bool {
        if self.get(placed.id).is_some() {
            return false;
        }
        if !self.can_place(&placed.item, placed.row, placed.col) {
            debug!(placement_id = placed.id, "reinsert rejected");
            return false;
        }
        self.next_id = self.next_id.max(placed.id.wrapping_add(1));
        self.placed.push(placed);
        true
    }

    pub fn remove(&mut self, id: PlacementId) -> Option<PlacedItem> {
        self.remove_where(|p| p.id == id)
    }

    /// Removes the first placed item matching `pred`. Other entries keep
    /// their ids and relative order.
    pub fn remove_where<F>(&mut self, pred: F) -> Option<PlacedItem>
    where
        F: FnMut(&PlacedItem) -> bool,
    {
        let index = self.placed.iter().position(pred)?;
        Some(self.placed.remove(index))
    }

    pub fn clear(&mut self) -> Vec<PlacedItem> {
        std::mem::take(&mut self.placed)
    }

    /// Changes grid dimensions and metrics. Placed items that no longer fit
    /// inside the new bounds are evicted and returned.
    pub fn resize(&mut self, rows: usize, columns: usize, geometry: GridGeometry) -> Vec<PlacedItem> {
        self.rows = rows;
        self.columns = columns;
        self.geometry = geometry;

        let (kept, evicted): (Vec<_>, Vec<_>) = std::mem::take(&mut self.placed)
            .into_iter()
            .partition(|p| {
                p.occupied_cells()
                    .all(|(r, c)| r >= 0 && c >= 0 && (r as usize) < rows && (c as usize) < columns)
            });
        self.placed = kept;
        evicted
    }

    /// Full occupancy map, `[row][col] -> owner`.
    pub fn occupancy(&self) -> Vec<Vec<Option<PlacementId>>> {
        let mut map = vec![vec![None; self.columns]; self.rows];
        for placed in &self.placed {
            for (r, c) in placed.occupied_cells() {
                if self.in_bounds(r, c) {
                    map[r as usize][c as usize] = Some(placed.id);
                }
            }
        }
        map
    }

    /// Top-left corner of the grid in grid-local pixels (+y up, origin at the
    /// grid center).
    pub fn top_left(&self) -> Vec2f {
        Vec2f::new(
            -self.geometry.span(self.columns) * 0.5,
            self.geometry.span(self.rows) * 0.5,
        )
    }

    /// Top-left pixel of cell `(row, col)`.
    pub fn cell_to_top_left(&self, row: i32, col: i32) -> Vec2f {
        let step = self.geometry.step();
        let top_left = self.top_left();
        Vec2f::new(
            top_left.x + col as f32 * step,
            top_left.y - row as f32 * step,
        )
    }

    /// Cell under `pointer`, snapping to the nearest cell center.
    pub fn pointer_to_cell(&self, pointer: Vec2f) -> Option<(i32, i32)> {
        let step = self.geometry.step();
        if step <= 0.0 || !pointer.is_finite() {
            return None;
        }
        let top_left = self.top_left();
        let width = self.geometry.span(self.columns);
        let height = self.geometry.span(self.rows);

        if pointer.x < top_left.x
            || pointer.x > top_left.x + width
            || pointer.y > top_left.y
            || pointer.y < top_left.y - height
        {
            return None;
        }

        let half_cell = self.geometry.cell_size * 0.5;
        let col = ((pointer.x - top_left.x + half_cell) / step).floor() as i32;
        let row = ((top_left.y - pointer.y + half_cell) / step).floor() as i32;
        if !self.in_bounds(row, col) {
            return None;
        }
        Some((row, col))
    }

    /// Shape-origin cell for `item` when its visual center is at `pointer`.
    ///
    /// The pointer is moved from the item's center to its anchor cell's
    /// center, snapped to a grid cell, and then shifted by the anchor so the
    /// result can be fed to `can_place`/`place`.
    pub fn pointer_to_anchored_cell(&self, pointer: Vec2f, item: &Item) -> Option<(i32, i32)> {
        let offset = self.geometry.anchor_offset(item);
        let anchor_center = Vec2f::new(pointer.x + offset.x, pointer.y + offset.y);
        let (anchor_row, anchor_col) = self.pointer_to_cell(anchor_center)?;
        Some((
            anchor_row - item.anchor_row() as i32,
            anchor_col - item.anchor_col() as i32,
        ))
    }

    /// Placed item whose occupied or star cell is under `pointer`.
    ///
    /// Empty corners of an item's bounding box do not count. When several
    /// items are hit, `preferred` wins if it is among them, otherwise the
    /// most recently placed one.
    pub fn placed_at_point(
        &self,
        pointer: Vec2f,
        preferred: Option<PlacementId>,
    ) -> Option<&PlacedItem> {
        let step = self.geometry.step();
        if step <= 0.0 || !pointer.is_finite() {
            return None;
        }
        let mut top = None;
        for placed in &self.placed {
            let origin = self.cell_to_top_left(placed.row, placed.col);
            let local_col = ((pointer.x - origin.x) / step).floor() as i32;
            let local_row = ((origin.y - pointer.y) / step).floor() as i32;
            if !placed.item.shape().is_interactive(local_row, local_col) {
                continue;
            }
            if preferred == Some(placed.id) {
                return Some(placed);
            }
            top = Some(placed);
        }
        top
    }
}

/// Linear scan for the item whose occupied cell covers `(row, col)`.
pub fn occupant_at(
    placed: &[PlacedItem],
    row: i32,
    col: i32,
    exclude: Option<PlacementId>,
) -> Option<&PlacedItem> {
    placed
        .iter()
        .filter(|p| Some(p.id) != exclude)
        .find(|p| p.covers(row, col))
}
