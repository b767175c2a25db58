use std::{fmt, sync::Arc};

use tracing::warn;

use crate::item::{Item, ItemKind, Rgba};
use crate::rng::Rng;
use crate::shape::Shape;

pub type ItemCtor = Arc<dyn Fn() -> Item + Send + Sync>;

pub const ITEM_SQUARE_2X2: &str = "item_square_2x2";
pub const ITEM_L_SHAPE_1: &str = "item_l_shape_1";
pub const ITEM_L_SHAPE_2: &str = "item_l_shape_2";
pub const ITEM_BAR_HORIZONTAL_3: &str = "item_bar_horizontal_3";
pub const ITEM_BAR_VERTICAL_3: &str = "item_bar_vertical_3";
pub const ITEM_T_SHAPE: &str = "item_t_shape";
pub const ITEM_T_SHAPE_INVERTED: &str = "item_t_shape_inverted";
pub const ITEM_Z_SHAPE: &str = "item_z_shape";
pub const ITEM_Z_SHAPE_INVERTED: &str = "item_z_shape_inverted";
pub const ITEM_SINGLE: &str = "item_single";

/// Registry of item constructors keyed by item-type id.
///
/// Registration order is preserved and drives `ids`, `create_all` and
/// sampling, so a seeded sample is reproducible.
#[derive(Clone, Default)]
pub struct ItemCatalog {
    entries: Vec<(String, ItemCtor)>,
}

impl fmt::Debug for ItemCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemCatalog")
            .field("ids", &self.ids())
            .finish()
    }
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The ten built-in item types.
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();
        for (id, def) in DEFAULT_ITEMS {
            catalog.register(*id, move || def.build(id));
        }
        catalog
    }

    /// Registers `ctor` under `id`, replacing an existing entry in place.
    pub fn register<F>(&mut self, id: impl Into<String>, ctor: F)
    where
        F: Fn() -> Item + Send + Sync + 'static,
    {
        let id = id.into();
        let ctor: ItemCtor = Arc::new(ctor);
        if let Some(entry) = self.entries.iter_mut().find(|(existing, _)| *existing == id) {
            entry.1 = ctor;
        } else {
            self.entries.push((id, ctor));
        }
    }

    pub fn create(&self, id: &str) -> Option<Item> {
        match self.entries.iter().find(|(existing, _)| existing == id) {
            Some((_, ctor)) => Some(ctor()),
            None => {
                warn!(item_id = id, "item id is not registered");
                None
            }
        }
    }

    pub fn create_all(&self) -> Vec<Item> {
        self.entries.iter().map(|(_, ctor)| ctor()).collect()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.entries.iter().map(|(id, _)| id.as_str()).collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|(existing, _)| existing == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn random(&self, rng: &mut Rng) -> Option<Item> {
        if self.entries.is_empty() {
            return None;
        }
        let (_, ctor) = &self.entries[rng.below(self.entries.len())];
        Some(ctor())
    }

    /// Draws `count` items: distinct types until the catalog is exhausted,
    /// then repeats are allowed.
    pub fn sample(&self, count: usize, rng: &mut Rng) -> Vec<Item> {
        let len = self.entries.len();
        if len == 0 {
            return Vec::new();
        }

        let mut order: Vec<usize> = (0..len).collect();
        let distinct = count.min(len);
        // Partial Fisher-Yates: the first `distinct` slots end up unique.
        for i in 0..distinct {
            let j = i + rng.below(len - i);
            order.swap(i, j);
        }

        let mut items: Vec<Item> = order[..distinct]
            .iter()
            .map(|&index| (self.entries[index].1)())
            .collect();
        while items.len() < count {
            let index = rng.below(len);
            items.push((self.entries[index].1)());
        }
        items
    }
}

struct ItemDef {
    name: &'static str,
    description: &'static str,
    rows: &'static [&'static str],
    color: Rgba,
    kind: ItemKind,
    required_neighbor: Option<ItemKind>,
}

impl ItemDef {
    fn build(&self, id: &str) -> Item {
        // The table below is static; a bad row would fall back to an empty shape.
        let shape = Shape::parse(self.rows).unwrap_or_default();
        Item::new(id, self.name, shape)
            .with_description(self.description)
            .with_color(self.color)
            .with_kind(self.kind)
            .with_required_neighbor(self.required_neighbor)
    }
}

const DEFAULT_ITEMS: &[(&str, ItemDef)] = &[
    (
        ITEM_SQUARE_2X2,
        ItemDef {
            name: "Square",
            description: "A 2x2 square crate.",
            rows: &["##", "##"],
            color: Rgba::RED,
            kind: ItemKind::Food,
            required_neighbor: None,
        },
    ),
    (
        ITEM_L_SHAPE_1,
        ItemDef {
            name: "L Block",
            description: "An L block missing its lower-right corner.",
            rows: &["##", "##", "#*"],
            color: Rgba::BLUE,
            kind: ItemKind::Prop,
            required_neighbor: Some(ItemKind::Food),
        },
    ),
    (
        ITEM_L_SHAPE_2,
        ItemDef {
            name: "Mirrored L Block",
            description: "An L block missing its lower-left corner.",
            rows: &["##", "##", "*#"],
            color: Rgba::GREEN,
            kind: ItemKind::Prop,
            required_neighbor: Some(ItemKind::Food),
        },
    ),
    (
        ITEM_BAR_HORIZONTAL_3,
        ItemDef {
            name: "Horizontal Bar",
            description: "A horizontal bar three cells long.",
            rows: &["###"],
            color: Rgba::YELLOW,
            kind: ItemKind::Food,
            required_neighbor: None,
        },
    ),
    (
        ITEM_BAR_VERTICAL_3,
        ItemDef {
            name: "Vertical Bar",
            description: "A vertical bar three cells long.",
            rows: &["#", "#", "#"],
            color: Rgba::PURPLE,
            kind: ItemKind::Food,
            required_neighbor: None,
        },
    ),
    (
        ITEM_T_SHAPE,
        ItemDef {
            name: "T Block",
            description: "A T block.",
            rows: &["###", "*#*"],
            color: Rgba::ORANGE,
            kind: ItemKind::Summon,
            required_neighbor: Some(ItemKind::Prop),
        },
    ),
    (
        ITEM_T_SHAPE_INVERTED,
        ItemDef {
            name: "Inverted T Block",
            description: "An upside-down T block.",
            rows: &["*#*", "###"],
            color: Rgba::CYAN,
            kind: ItemKind::Prop,
            required_neighbor: Some(ItemKind::Summon),
        },
    ),
    (
        ITEM_Z_SHAPE,
        ItemDef {
            name: "Z Block",
            description: "A Z block.",
            rows: &["##*", "*##"],
            color: Rgba::PINK,
            kind: ItemKind::Summon,
            required_neighbor: Some(ItemKind::Summon),
        },
    ),
    (
        ITEM_Z_SHAPE_INVERTED,
        ItemDef {
            name: "Inverted Z Block",
            description: "A mirrored Z block.",
            rows: &["*##", "##*"],
            color: Rgba::BROWN,
            kind: ItemKind::Prop,
            required_neighbor: Some(ItemKind::Prop),
        },
    ),
    (
        ITEM_SINGLE,
        ItemDef {
            name: "Single",
            description: "A single cell.",
            rows: &["#"],
            color: Rgba::GRAY,
            kind: ItemKind::Summon,
            required_neighbor: None,
        },
    ),
];
