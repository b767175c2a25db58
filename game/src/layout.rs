use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::catalog::ItemCatalog;
use crate::error::LayoutError;
use crate::grid::PlacementGrid;
use crate::warehouse::Warehouse;

pub const LAYOUT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutEntry {
    pub item_id: String,
    pub row: i32,
    pub col: i32,
    /// Clockwise quarter turns from the catalog orientation.
    #[serde(default)]
    pub rotation: u8,
}

/// Serializable list of placed items, by catalog id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    #[serde(default = "default_version")]
    pub version: u32,
    pub rows: usize,
    pub columns: usize,
    #[serde(default)]
    pub placements: Vec<LayoutEntry>,
}

fn default_version() -> u32 {
    LAYOUT_VERSION
}

impl Layout {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            version: LAYOUT_VERSION,
            rows,
            columns,
            placements: Vec::new(),
        }
    }

    pub fn with_entry(mut self, item_id: impl Into<String>, row: i32, col: i32, rotation: u8) -> Self {
        self.placements.push(LayoutEntry {
            item_id: item_id.into(),
            row,
            col,
            rotation: rotation % 4,
        });
        self
    }
}

impl Warehouse {
    pub fn export_layout(&self) -> Layout {
        let grid = self.grid();
        let mut layout = Layout::new(grid.rows(), grid.columns());
        for placed in grid.placed() {
            layout = layout.with_entry(
                placed.item.id(),
                placed.row,
                placed.col,
                placed.item.rotation(),
            );
        }
        layout
    }

    /// Replaces the warehouse contents with `layout`.
    ///
    /// Entries are placed in order on a scratch grid first; if any of them is
    /// unknown or doesn't fit, the warehouse is left untouched.
    pub fn import_layout(
        &mut self,
        layout: &Layout,
        catalog: &ItemCatalog,
    ) -> Result<(), LayoutError> {
        let mut scratch = PlacementGrid::new(layout.rows, layout.columns, self.grid().geometry());
        for (index, entry) in layout.placements.iter().enumerate() {
            let item = catalog
                .create(&entry.item_id)
                .ok_or_else(|| LayoutError::UnknownItem(entry.item_id.clone()))?
                .rotated_by(entry.rotation);
            if scratch.place(item, entry.row, entry.col).is_none() {
                return Err(LayoutError::Blocked {
                    index,
                    item_id: entry.item_id.clone(),
                    row: entry.row,
                    col: entry.col,
                });
            }
        }
        self.replace_grid(scratch);
        Ok(())
    }
}

/// JSON file holding a saved layout.
#[derive(Debug, Clone)]
pub struct LayoutStore {
    path: PathBuf,
}

impl LayoutStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Layout, LayoutError> {
        let bytes = fs::read(&self.path)?;
        let mut layout: Layout = serde_json::from_slice(&bytes)?;
        if layout.version == 0 {
            layout.version = LAYOUT_VERSION;
        }
        Ok(layout)
    }

    pub fn save(&self, layout: &Layout) -> Result<(), LayoutError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(layout)?;
        atomic_write(&self.path, json.as_bytes())?;
        Ok(())
    }
}

fn atomic_write(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes)?;
    match fs::rename(&tmp, path) {
        Ok(()) => Ok(()),
        Err(_) => {
            fs::copy(&tmp, path)?;
            let _ = fs::remove_file(&tmp);
            Ok(())
        }
    }
}
