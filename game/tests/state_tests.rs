use warehouse::catalog::{ITEM_L_SHAPE_1, ITEM_SQUARE_2X2, ItemCatalog};
use warehouse::drag::{DragSource, DropOutcome};
use warehouse::grid::Vec2f;
use warehouse::item::Item;
use warehouse::settings::StashSettings;
use warehouse::state::StashState;
use warehouse::warehouse::Warehouse;

fn new_state() -> StashState {
    let settings = StashSettings {
        seed: 31,
        ..StashSettings::default()
    };
    StashState::new(&settings, ItemCatalog::with_defaults())
}

fn cell_center(warehouse: &Warehouse, row: i32, col: i32) -> Vec2f {
    let top_left = warehouse.cell_to_top_left(row, col);
    let half = warehouse.grid().geometry().cell_size * 0.5;
    Vec2f::new(top_left.x + half, top_left.y - half)
}

fn footprint_center(warehouse: &Warehouse, item: &Item, row: i32, col: i32) -> Vec2f {
    let top_left = warehouse.cell_to_top_left(row, col);
    let geometry = warehouse.grid().geometry();
    Vec2f::new(
        top_left.x + geometry.span(item.width()) * 0.5,
        top_left.y - geometry.span(item.height()) * 0.5,
    )
}

/// L block at (0,0) with a square under its star.
fn stocked_state() -> StashState {
    let mut state = new_state();
    let catalog = ItemCatalog::with_defaults();
    let warehouse = state.warehouse_mut();
    warehouse.place(catalog.create(ITEM_L_SHAPE_1).expect("l"), 0, 0);
    warehouse.place(catalog.create(ITEM_SQUARE_2X2).expect("square"), 2, 1);
    assert_eq!(state.warehouse().star_links().active_star_links, 1);
    state
}

#[test]
fn slot_item_drops_onto_the_grid() {
    let mut state = new_state();
    let item = state.panel().item(0).cloned().expect("panel is filled");
    let target = footprint_center(state.warehouse(), &item, 1, 1);

    assert!(state.begin_drag_from_slot(0, Vec2f::ZERO));
    assert!(state.panel().item(0).is_none());
    assert!(state.drag_to(target));
    let preview = state.drag_preview().expect("pointer is over the grid");
    assert!(preview.valid);
    assert_eq!((preview.row, preview.col), (1, 1));

    let DropOutcome::Placed(id) = state.drop_on_grid(target) else {
        panic!("drop over an empty grid should place");
    };
    let placed = state.warehouse().grid().get(id).expect("placed item");
    assert_eq!((placed.row, placed.col), (1, 1));
    assert_eq!(placed.item.id(), item.id());
    assert!(!state.is_dragging());
}

#[test]
fn rejected_drop_puts_slot_item_back_unrotated() {
    let mut state = new_state();
    let item = state.panel().item(0).cloned().expect("panel is filled");

    assert!(state.begin_drag_from_slot(0, Vec2f::ZERO));
    assert!(state.rotate_drag());
    assert_eq!(
        state.drop_on_grid(Vec2f::new(5000.0, 5000.0)),
        DropOutcome::Restored
    );
    assert_eq!(state.panel().item(0), Some(&item));
    assert!(state.warehouse().placed().is_empty());
}

#[test]
fn cancelled_grid_drag_restores_the_exact_prior_state() {
    let mut state = stocked_state();
    let grid_before = state.warehouse().grid().clone();
    let report_before = state.warehouse().star_link_snapshot();

    let grab = cell_center(state.warehouse(), 3, 2);
    assert!(state.begin_drag_from_placed(grab));
    assert_eq!(state.warehouse().placed().len(), 1);
    assert_eq!(state.warehouse().star_links().active_star_links, 0);

    assert!(state.rotate_drag());
    assert!(state.drag_to(cell_center(state.warehouse(), 4, 7)));
    assert!(state.cancel_drag());

    assert_eq!(state.warehouse().grid(), &grid_before);
    assert_eq!(state.warehouse().star_links(), &report_before);
}

#[test]
fn rotating_a_drag_leaves_the_lifted_copy_alone() {
    let mut state = stocked_state();
    assert!(state.begin_drag_from_placed(cell_center(state.warehouse(), 3, 2)));
    assert!(state.rotate_drag());

    let drag = state.drag().expect("drag in progress");
    assert_eq!(drag.item().rotation(), 1);
    let DragSource::Placed(lifted) = drag.source() else {
        panic!("drag should come from the grid");
    };
    assert_eq!(lifted.item.rotation(), 0);
    assert_eq!((lifted.row, lifted.col), (2, 1));
}

#[test]
fn grid_item_moves_to_a_new_cell_with_a_new_id() {
    let mut state = stocked_state();
    let square = state.warehouse().placed()[1].clone();

    assert!(state.begin_drag_from_placed(cell_center(state.warehouse(), 2, 2)));
    let target = footprint_center(state.warehouse(), &square.item, 4, 6);
    let DropOutcome::Placed(id) = state.drop_on_grid(target) else {
        panic!("open cells should accept the square");
    };
    assert_ne!(id, square.id);
    assert_eq!(
        state.warehouse().grid().get(id).map(|p| (p.row, p.col)),
        Some((4, 6))
    );
    assert_eq!(state.warehouse().star_links().active_star_links, 0);
}

#[test]
fn blocked_drop_reinserts_the_grid_item() {
    let mut state = stocked_state();
    let grid_before = state.warehouse().grid().clone();

    assert!(state.begin_drag_from_placed(cell_center(state.warehouse(), 3, 2)));
    // Overlaps the L block.
    let square = state.drag().expect("dragging").item().clone();
    let target = footprint_center(state.warehouse(), &square, 0, 0);
    assert_eq!(state.drop_on_grid(target), DropOutcome::Restored);
    assert_eq!(state.warehouse().grid(), &grid_before);
}

#[test]
fn junk_round_trip() {
    let mut state = new_state();
    let item = state.panel().item(1).cloned().expect("panel is filled");

    assert!(state.begin_drag_from_slot(1, Vec2f::ZERO));
    let DropOutcome::Junked(junk_id) = state.drop_on_junk() else {
        panic!("junk drops always succeed");
    };
    assert_eq!(state.junk().get(junk_id), Some(&item));
    assert!(state.panel().item(1).is_none());

    assert!(state.begin_drag_from_junk(junk_id, Vec2f::ZERO));
    assert!(state.junk().is_empty());
    assert!(state.cancel_drag());
    assert_eq!(state.junk().get(junk_id), Some(&item));

    assert!(state.begin_drag_from_junk(junk_id, Vec2f::ZERO));
    let target = footprint_center(state.warehouse(), &item, 0, 0);
    assert!(matches!(state.drop_on_grid(target), DropOutcome::Placed(_)));
    assert!(state.junk().is_empty());
}

#[test]
fn empty_spots_start_no_drag() {
    let mut state = stocked_state();
    // Nothing covers this cell.
    assert!(!state.begin_drag_from_placed(cell_center(state.warehouse(), 2, 3)));
    assert!(!state.begin_drag_from_junk(99, Vec2f::ZERO));
    assert!(!state.begin_drag_from_slot(42, Vec2f::ZERO));
    assert!(!state.is_dragging());
}

#[test]
fn refresh_panel_rerolls_every_slot() {
    let mut state = new_state();
    assert!(state.begin_drag_from_slot(0, Vec2f::ZERO));
    assert!(state.drop_on_junk() != DropOutcome::NotDragging);
    assert!(state.panel().item(0).is_none());
    state.refresh_panel();
    assert!(state.panel().slots().iter().all(Option::is_some));
}
