pub mod catalog;
pub mod drag;
pub mod error;
pub mod grid;
pub mod item;
pub mod junk;
pub mod layout;
pub mod panel;
pub mod rng;
pub mod settings;
pub mod shape;
pub mod star_link;
pub mod state;
pub mod warehouse;

pub use catalog::ItemCatalog;
pub use grid::{GridGeometry, PlacedItem, PlacementGrid, PlacementId, Vec2f};
pub use item::{Item, ItemKind};
pub use shape::{CellKind, Shape};
pub use star_link::{ItemBonus, StarLinkReport};
pub use state::StashState;
pub use warehouse::Warehouse;
