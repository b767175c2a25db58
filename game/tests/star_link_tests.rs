use std::cell::RefCell;
use std::rc::Rc;

use warehouse::catalog::{ITEM_L_SHAPE_1, ITEM_SQUARE_2X2, ItemCatalog};
use warehouse::item::{Item, ItemKind};
use warehouse::shape::Shape;
use warehouse::warehouse::Warehouse;

fn item(id: &str, rows: &[&str], kind: ItemKind, needs: Option<ItemKind>) -> Item {
    Item::new(id, id, Shape::parse(rows).expect("test shape should parse"))
        .with_kind(kind)
        .with_required_neighbor(needs)
}

#[test]
fn l_block_star_bonds_onto_food() {
    let catalog = ItemCatalog::with_defaults();
    let mut warehouse = Warehouse::default();
    let l = warehouse
        .place(catalog.create(ITEM_L_SHAPE_1).expect("l"), 0, 0)
        .expect("l fits");
    let square = warehouse
        .place(catalog.create(ITEM_SQUARE_2X2).expect("square"), 2, 1)
        .expect("square fits under the star");

    let report = warehouse.star_links();
    assert_eq!(report.total_stars, 1);
    assert_eq!(report.active_star_links, 1);
    assert_eq!(report.unique_linked_pairs, 1);
    assert_eq!(report.chain_count, 1);
    assert_eq!(report.bonus_for(square).map(|b| b.linked_neighbors), Some(1));
    assert_eq!(warehouse.active_star_cells(l), vec![(2, 1)]);
}

#[test]
fn bonding_is_decided_by_the_star_owner() {
    let mut warehouse = Warehouse::default();
    let a = item("a", &["#*"], ItemKind::Prop, Some(ItemKind::Food));
    let b = item("b", &["*#"], ItemKind::Food, None);
    warehouse.place(a, 0, 0).expect("a fits");
    let b_id = warehouse.place(b, 0, 0).expect("b interlocks with a");
    assert_eq!(warehouse.star_links().active_star_links, 1);

    // Give b a requirement a satisfies: both stars now bond, still one pair.
    warehouse.remove(b_id).expect("b was placed");
    let b = item("b", &["*#"], ItemKind::Food, Some(ItemKind::Prop));
    warehouse.place(b, 0, 0).expect("b fits again");
    let report = warehouse.star_links();
    assert_eq!(report.active_star_links, 2);
    assert_eq!(report.unique_linked_pairs, 1);
    assert!(report.item_bonuses.iter().all(|bonus| bonus.linked_neighbors == 1));

    // A requirement a doesn't satisfy bonds nothing on b's side.
    warehouse.remove_where(|p| p.item.id() == "b").expect("b was placed");
    let b = item("b", &["*#"], ItemKind::Food, Some(ItemKind::Summon));
    warehouse.place(b, 0, 0).expect("b fits again");
    assert_eq!(warehouse.star_links().active_star_links, 1);
}

#[test]
fn chain_of_three_forms_one_component() {
    let mut warehouse = Warehouse::default();
    let a = warehouse
        .place(item("a", &["#*"], ItemKind::Prop, Some(ItemKind::Food)), 0, 0)
        .expect("a fits");
    let b = warehouse
        .place(item("b", &["#*"], ItemKind::Food, Some(ItemKind::Summon)), 0, 1)
        .expect("b fits");
    let c = warehouse
        .place(item("c", &["#"], ItemKind::Summon, None), 0, 2)
        .expect("c fits");
    let lone = warehouse
        .place(item("d", &["#"], ItemKind::Summon, None), 4, 4)
        .expect("d fits");

    let report = warehouse.star_links();
    assert_eq!(report.total_stars, 2);
    assert_eq!(report.active_star_links, 2);
    assert_eq!(report.unique_linked_pairs, 2);
    assert_eq!(report.chain_count, 1);
    assert_eq!(report.max_chain_size, 3);
    for id in [a, b, c] {
        assert_eq!(report.bonus_for(id).map(|bonus| bonus.chain_size), Some(3));
    }
    assert_eq!(report.bonus_for(b).map(|bonus| bonus.linked_neighbors), Some(2));
    assert_eq!(report.bonus_for(lone).map(|bonus| bonus.chain_size), Some(1));
}

#[test]
fn removing_a_link_splits_the_chain() {
    let mut warehouse = Warehouse::default();
    warehouse
        .place(item("a", &["#*"], ItemKind::Prop, Some(ItemKind::Food)), 0, 0)
        .expect("a fits");
    let b = warehouse
        .place(item("b", &["#*"], ItemKind::Food, Some(ItemKind::Summon)), 0, 1)
        .expect("b fits");
    warehouse
        .place(item("c", &["#"], ItemKind::Summon, None), 0, 2)
        .expect("c fits");

    warehouse.remove(b).expect("b was placed");
    let report = warehouse.star_links();
    assert_eq!(report.active_star_links, 0);
    assert_eq!(report.chain_count, 0);
    assert_eq!(report.max_chain_size, 1);
}

#[test]
fn recompute_is_idempotent() {
    let catalog = ItemCatalog::with_defaults();
    let mut warehouse = Warehouse::default();
    warehouse.place(catalog.create(ITEM_L_SHAPE_1).expect("l"), 0, 0);
    warehouse.place(catalog.create(ITEM_SQUARE_2X2).expect("square"), 2, 1);

    let first = warehouse.star_link_snapshot();
    let second = warehouse.refresh().clone();
    assert_eq!(first, second);
    assert_eq!(warehouse.star_links(), &first);
}

#[test]
fn listeners_hear_successful_mutations_only() {
    let mut warehouse = Warehouse::default();
    let heard = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&heard);
    let listener = warehouse.add_star_link_listener(move |report| {
        sink.borrow_mut().push(report.item_bonuses.len());
    });

    let single = item("s", &["#"], ItemKind::Summon, None);
    let id = warehouse.place(single.clone(), 0, 0).expect("fits");
    assert!(warehouse.place(single.clone(), 0, 0).is_none());
    warehouse.remove(id);
    assert_eq!(*heard.borrow(), vec![1, 0]);

    assert!(warehouse.remove_star_link_listener(listener));
    warehouse.place(single, 1, 1);
    assert_eq!(heard.borrow().len(), 2);
}

#[test]
fn preview_reports_stars_that_would_bond() {
    let catalog = ItemCatalog::with_defaults();
    let mut warehouse = Warehouse::default();
    warehouse.place(catalog.create(ITEM_SQUARE_2X2).expect("square"), 2, 1);

    let l = catalog.create(ITEM_L_SHAPE_1).expect("l");
    let preview = warehouse.preview(&l, 0, 0);
    assert!(preview.valid);
    assert_eq!(preview.active_stars, vec![(2, 1)]);

    let blocked = warehouse.preview(&l, 1, 1);
    assert!(!blocked.valid);
}
