use std::collections::HashSet;

use warehouse::catalog::{ITEM_L_SHAPE_1, ITEM_SINGLE, ItemCatalog};
use warehouse::item::{Item, ItemKind};
use warehouse::rng::Rng;
use warehouse::shape::Shape;

fn ids(items: &[Item]) -> Vec<String> {
    items.iter().map(|item| item.id().to_string()).collect()
}

#[test]
fn defaults_register_ten_item_types() {
    let catalog = ItemCatalog::with_defaults();
    assert_eq!(catalog.len(), 10);
    for id in catalog.ids() {
        let item = catalog.create(id).expect("registered id should build");
        assert_eq!(item.id(), id);
        assert!(item.occupied_count() > 0);
    }

    let l = catalog
        .create(ITEM_L_SHAPE_1)
        .expect("l shape is registered");
    assert_eq!(l.kind(), ItemKind::Prop);
    assert_eq!(l.required_neighbor(), Some(ItemKind::Food));
    assert_eq!(l.star_count(), 1);
}

#[test]
fn unknown_ids_build_nothing() {
    let catalog = ItemCatalog::with_defaults();
    assert!(catalog.create("item_does_not_exist").is_none());
    assert!(!catalog.contains("item_does_not_exist"));
}

#[test]
fn sample_is_distinct_up_to_catalog_size() {
    let catalog = ItemCatalog::with_defaults();
    let mut rng = Rng::new(21);

    let three = ids(&catalog.sample(3, &mut rng));
    assert_eq!(three.len(), 3);
    assert_eq!(three.iter().collect::<HashSet<_>>().len(), 3);

    let all = ids(&catalog.sample(10, &mut rng));
    assert_eq!(all.iter().collect::<HashSet<_>>().len(), 10);
}

#[test]
fn sample_repeats_once_catalog_is_exhausted() {
    let catalog = ItemCatalog::with_defaults();
    let mut rng = Rng::new(4);
    let drawn = ids(&catalog.sample(14, &mut rng));
    assert_eq!(drawn.len(), 14);
    assert_eq!(drawn[..10].iter().collect::<HashSet<_>>().len(), 10);
    assert!(drawn[10..].iter().all(|id| catalog.contains(id)));
}

#[test]
fn same_seed_draws_same_sample() {
    let catalog = ItemCatalog::with_defaults();
    let first = ids(&catalog.sample(5, &mut Rng::new(99)));
    let second = ids(&catalog.sample(5, &mut Rng::new(99)));
    assert_eq!(first, second);
}

#[test]
fn empty_catalog_samples_nothing() {
    let catalog = ItemCatalog::new();
    let mut rng = Rng::new(1);
    assert!(catalog.is_empty());
    assert!(catalog.sample(3, &mut rng).is_empty());
    assert!(catalog.random(&mut rng).is_none());
}

#[test]
fn register_replaces_existing_entry_in_place() {
    let mut catalog = ItemCatalog::with_defaults();
    let order_before: Vec<String> = catalog.ids().iter().map(|id| id.to_string()).collect();

    catalog.register(ITEM_SINGLE, || {
        Item::new(
            ITEM_SINGLE,
            "Heavy Single",
            Shape::parse(&["#"]).expect("single shape"),
        )
    });
    let order_after: Vec<String> = catalog.ids().iter().map(|id| id.to_string()).collect();
    assert_eq!(order_before, order_after);
    assert_eq!(
        catalog.create(ITEM_SINGLE).map(|item| item.name().to_string()),
        Some("Heavy Single".to_string())
    );
}
