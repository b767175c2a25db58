use serde::{Deserialize, Serialize};

use crate::grid::{PlacedItem, PlacementId, Vec2f};
use crate::item::Item;
use crate::junk::JunkId;

/// Where a dragged item came from, so a cancelled drag can put it back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragSource {
    Slot(usize),
    /// Lifted off the grid; carries the entry as it was placed.
    Placed(PlacedItem),
    Junk(JunkId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropOutcome {
    Placed(PlacementId),
    Junked(JunkId),
    /// The drop was rejected and the item went back to its source.
    Restored,
    NotDragging,
}

/// One in-flight drag.
///
/// The session works on its own clone of the item; rotating it never touches
/// a copy that is still placed or sitting in a slot.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    item: Item,
    original: Item,
    source: DragSource,
    start: Vec2f,
    pointer: Vec2f,
}

impl DragSession {
    pub fn new(item: Item, source: DragSource, pointer: Vec2f) -> Self {
        Self {
            original: item.clone(),
            item,
            source,
            start: pointer,
            pointer,
        }
    }

    pub fn item(&self) -> &Item {
        &self.item
    }

    /// The item as it was when the drag began.
    pub fn original(&self) -> &Item {
        &self.original
    }

    pub fn source(&self) -> &DragSource {
        &self.source
    }

    pub fn pointer(&self) -> Vec2f {
        self.pointer
    }

    pub fn start(&self) -> Vec2f {
        self.start
    }

    pub fn move_to(&mut self, pointer: Vec2f) {
        self.pointer = pointer;
    }

    pub fn rotate_clockwise(&mut self) {
        self.item = self.item.rotated_clockwise();
    }

    /// True while the pointer is still within `threshold` pixels of where the
    /// drag started.
    pub fn is_hovering(&self, threshold: f32) -> bool {
        self.pointer.distance_squared(self.start) <= threshold * threshold
    }

    /// Splits into `(dragged, original, source)`.
    pub fn into_parts(self) -> (Item, Item, DragSource) {
        (self.item, self.original, self.source)
    }
}
