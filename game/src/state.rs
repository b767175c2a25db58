use tracing::{debug, warn};

use crate::catalog::ItemCatalog;
use crate::drag::{DragSession, DragSource, DropOutcome};
use crate::grid::Vec2f;
use crate::item::Item;
use crate::junk::{JunkId, JunkPile};
use crate::panel::ItemPanel;
use crate::rng::Rng;
use crate::settings::StashSettings;
use crate::warehouse::{PlacementPreview, Warehouse};

/// Everything one stash screen owns: the grid, the item panel, the junk
/// pile and at most one drag in flight.
#[derive(Debug)]
pub struct StashState {
    catalog: ItemCatalog,
    rng: Rng,
    warehouse: Warehouse,
    panel: ItemPanel,
    junk: JunkPile,
    drag: Option<DragSession>,
}

impl StashState {
    pub fn new(settings: &StashSettings, catalog: ItemCatalog) -> Self {
        let settings = settings.clone().sanitized();
        let mut state = Self {
            catalog,
            rng: Rng::new(settings.seed),
            warehouse: Warehouse::new(settings.rows, settings.columns, settings.geometry()),
            panel: ItemPanel::new(settings.slot_count),
            junk: JunkPile::new(),
            drag: None,
        };
        state.refresh_panel();
        state
    }

    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    pub fn warehouse(&self) -> &Warehouse {
        &self.warehouse
    }

    pub fn warehouse_mut(&mut self) -> &mut Warehouse {
        &mut self.warehouse
    }

    pub fn panel(&self) -> &ItemPanel {
        &self.panel
    }

    pub fn junk(&self) -> &JunkPile {
        &self.junk
    }

    pub fn drag(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Re-rolls every panel slot.
    pub fn refresh_panel(&mut self) {
        self.panel.refresh(&self.catalog, &mut self.rng);
    }

    pub fn begin_drag_from_slot(&mut self, slot: usize, pointer: Vec2f) -> bool {
        if self.drag.is_some() {
            return false;
        }
        let Some(item) = self.panel.take(slot) else {
            return false;
        };
        debug!(slot, item_id = item.id(), "drag started from panel");
        self.drag = Some(DragSession::new(item, DragSource::Slot(slot), pointer));
        true
    }

    /// Lifts the placed item under `pointer`. Its bonds are recomputed
    /// without it for the duration of the drag.
    pub fn begin_drag_from_placed(&mut self, pointer: Vec2f) -> bool {
        if self.drag.is_some() {
            return false;
        }
        let Some(placed) = self.warehouse.pick_up(pointer, None) else {
            return false;
        };
        debug!(placement_id = placed.id, item_id = placed.item.id(), "drag started from grid");
        let item = placed.item.clone();
        self.drag = Some(DragSession::new(item, DragSource::Placed(placed), pointer));
        true
    }

    pub fn begin_drag_from_junk(&mut self, id: JunkId, pointer: Vec2f) -> bool {
        if self.drag.is_some() {
            return false;
        }
        let Some(item) = self.junk.take(id) else {
            return false;
        };
        debug!(junk_id = id, item_id = item.id(), "drag started from junk");
        self.drag = Some(DragSession::new(item, DragSource::Junk(id), pointer));
        true
    }

    pub fn drag_to(&mut self, pointer: Vec2f) -> bool {
        match self.drag.as_mut() {
            Some(drag) => {
                drag.move_to(pointer);
                true
            }
            None => false,
        }
    }

    pub fn rotate_drag(&mut self) -> bool {
        match self.drag.as_mut() {
            Some(drag) => {
                drag.rotate_clockwise();
                true
            }
            None => false,
        }
    }

    /// Placement feedback for the dragged item at the current pointer.
    pub fn drag_preview(&self) -> Option<PlacementPreview> {
        let drag = self.drag.as_ref()?;
        self.warehouse.preview_at(drag.pointer(), drag.item())
    }

    /// Drops the dragged item on the grid under `pointer`, or puts it back
    /// where it came from when it doesn't fit there.
    pub fn drop_on_grid(&mut self, pointer: Vec2f) -> DropOutcome {
        let Some(mut drag) = self.drag.take() else {
            return DropOutcome::NotDragging;
        };
        drag.move_to(pointer);

        let target = self
            .warehouse
            .pointer_to_anchored_cell(pointer, drag.item())
            .filter(|&(row, col)| self.warehouse.can_place(drag.item(), row, col));
        let Some((row, col)) = target else {
            debug!(item_id = drag.item().id(), "drop rejected, restoring source");
            self.restore(drag);
            return DropOutcome::Restored;
        };

        let (item, original, source) = drag.into_parts();
        match self.warehouse.place(item, row, col) {
            Some(id) => DropOutcome::Placed(id),
            None => {
                self.restore_source(original, source);
                DropOutcome::Restored
            }
        }
    }

    pub fn drop_on_junk(&mut self) -> DropOutcome {
        let Some(drag) = self.drag.take() else {
            return DropOutcome::NotDragging;
        };
        let (item, _, _) = drag.into_parts();
        let id = self.junk.add(item);
        debug!(junk_id = id, "item dropped on junk pile");
        DropOutcome::Junked(id)
    }

    /// Abandons the drag, returning the item to its source unchanged.
    pub fn cancel_drag(&mut self) -> bool {
        match self.drag.take() {
            Some(drag) => {
                self.restore(drag);
                true
            }
            None => false,
        }
    }

    fn restore(&mut self, drag: DragSession) {
        let (_, original, source) = drag.into_parts();
        self.restore_source(original, source);
    }

    fn restore_source(&mut self, original: Item, source: DragSource) {
        match source {
            DragSource::Slot(slot) => {
                if let Err(item) = self.panel.put(slot, original) {
                    warn!(slot, "panel slot refilled during drag, moving item to junk");
                    self.junk.add(item);
                }
            }
            DragSource::Placed(placed) => {
                let id = placed.id;
                let fallback = placed.item.clone();
                if !self.warehouse.restore(placed) {
                    warn!(placement_id = id, "original cell taken, moving item to junk");
                    self.junk.add(fallback);
                }
            }
            DragSource::Junk(id) => self.junk.restore(id, original),
        }
    }
}
