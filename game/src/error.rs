use std::io;

use thiserror::Error;

use crate::grid::PlacementId;
use crate::shape::Glyph;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("shape row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown shape glyph {glyph:?} at row {row}, col {col}")]
    UnknownGlyph { glyph: Glyph, row: usize, col: usize },
}

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("unknown item id {0:?}")]
    UnknownItem(String),

    #[error("layout entry {index} ({item_id} at {row},{col}) does not fit")]
    Blocked {
        index: usize,
        item_id: String,
        row: i32,
        col: i32,
    },

    #[error("layout I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("layout JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("settings JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("placement {placement_id} at {row},{col} overlaps, leaves the grid or reuses an id")]
    Rejected {
        placement_id: PlacementId,
        row: i32,
        col: i32,
    },
}
