use serde::{Deserialize, Serialize};

use crate::shape::Shape;
use crate::star_link::ItemBonus;

/// Item category. Doubles as the link type star cells bond against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemKind {
    #[default]
    Prop,
    Summon,
    Food,
}

impl ItemKind {
    pub const ALL: [ItemKind; 3] = [ItemKind::Prop, ItemKind::Summon, ItemKind::Food];

    pub const fn label(self) -> &'static str {
        match self {
            ItemKind::Prop => "Prop",
            ItemKind::Summon => "Summon",
            ItemKind::Food => "Food",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const RED: Rgba = Rgba::new(255, 100, 100, 255);
    pub const BLUE: Rgba = Rgba::new(100, 150, 255, 255);
    pub const GREEN: Rgba = Rgba::new(100, 255, 150, 255);
    pub const YELLOW: Rgba = Rgba::new(255, 255, 100, 255);
    pub const PURPLE: Rgba = Rgba::new(200, 100, 255, 255);
    pub const ORANGE: Rgba = Rgba::new(255, 180, 100, 255);
    pub const CYAN: Rgba = Rgba::new(100, 255, 255, 255);
    pub const PINK: Rgba = Rgba::new(255, 150, 200, 255);
    pub const BROWN: Rgba = Rgba::new(180, 140, 100, 255);
    pub const GRAY: Rgba = Rgba::new(150, 150, 150, 255);
}

impl Default for Rgba {
    fn default() -> Self {
        Rgba::GRAY
    }
}

/// An immutable item definition.
///
/// Items are plain values: dragging works on a clone, and rotation produces a
/// new item rather than mutating one that may already be placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "ItemRecord")]
pub struct Item {
    id: String,
    name: String,
    description: String,
    feature: Option<String>,
    color: Rgba,
    kind: ItemKind,
    required_neighbor: Option<ItemKind>,
    shape: Shape,
    anchor_row: usize,
    anchor_col: usize,
    /// Clockwise quarter turns applied since the catalog definition.
    rotation: u8,
}

/// Wire form of [`Item`]. Deserialized items go through the builder so the
/// anchor is clamped and the turn count stays below four.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemRecord {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    feature: Option<String>,
    #[serde(default)]
    color: Rgba,
    #[serde(default)]
    kind: ItemKind,
    #[serde(default)]
    required_neighbor: Option<ItemKind>,
    shape: Shape,
    #[serde(default)]
    anchor_row: usize,
    #[serde(default)]
    anchor_col: usize,
    #[serde(default)]
    rotation: u8,
}

impl From<ItemRecord> for Item {
    fn from(record: ItemRecord) -> Self {
        let mut item = Item::new(record.id, record.name, record.shape)
            .with_description(record.description)
            .with_color(record.color)
            .with_kind(record.kind)
            .with_required_neighbor(record.required_neighbor)
            .with_anchor(
                i32::try_from(record.anchor_row).unwrap_or(i32::MAX),
                i32::try_from(record.anchor_col).unwrap_or(i32::MAX),
            );
        item.feature = record.feature;
        item.rotation = record.rotation % 4;
        item
    }
}

impl Item {
    pub fn new(id: impl Into<String>, name: impl Into<String>, shape: Shape) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            feature: None,
            color: Rgba::default(),
            kind: ItemKind::default(),
            required_neighbor: None,
            shape,
            anchor_row: 0,
            anchor_col: 0,
            rotation: 0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.feature = Some(feature.into());
        self
    }

    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    pub fn with_kind(mut self, kind: ItemKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_required_neighbor(mut self, required: Option<ItemKind>) -> Self {
        self.required_neighbor = required;
        self
    }

    /// Sets the drag anchor. Out-of-range values are clamped into the shape's
    /// bounding box; an empty shape always anchors at `(0, 0)`.
    pub fn with_anchor(mut self, row: i32, col: i32) -> Self {
        let max_row = self.shape.height().saturating_sub(1) as i32;
        let max_col = self.shape.width().saturating_sub(1) as i32;
        self.anchor_row = row.clamp(0, max_row) as usize;
        self.anchor_col = col.clamp(0, max_col) as usize;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn feature(&self) -> Option<&str> {
        self.feature.as_deref()
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn required_neighbor(&self) -> Option<ItemKind> {
        self.required_neighbor
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn anchor_row(&self) -> usize {
        self.anchor_row
    }

    pub fn anchor_col(&self) -> usize {
        self.anchor_col
    }

    pub fn rotation(&self) -> u8 {
        self.rotation
    }

    pub fn width(&self) -> usize {
        self.shape.width()
    }

    pub fn height(&self) -> usize {
        self.shape.height()
    }

    pub fn occupied_count(&self) -> usize {
        self.shape.occupied_count()
    }

    pub fn star_count(&self) -> usize {
        self.shape.star_count()
    }

    /// Whether a star owned by `self` bonds with an occupied cell of `target`.
    ///
    /// Only the star owner's rule counts; `target` needs no matching setting.
    pub fn can_star_link_to(&self, target: &Item) -> bool {
        self.required_neighbor == Some(target.kind)
    }

    /// A copy rotated 90 degrees clockwise with the anchor remapped into the
    /// rotated local frame.
    pub fn rotated_clockwise(&self) -> Item {
        let old_height = self.height();
        let mut rotated = self.clone();
        rotated.shape = self.shape.rotated_clockwise();
        if old_height > 0 {
            rotated.anchor_row = self.anchor_col;
            rotated.anchor_col = old_height - 1 - self.anchor_row;
        }
        rotated.rotation = (self.rotation + 1) % 4;
        rotated
    }

    /// Applies `turns` clockwise quarter turns.
    pub fn rotated_by(&self, turns: u8) -> Item {
        let mut item = self.clone();
        for _ in 0..turns % 4 {
            item = item.rotated_clockwise();
        }
        item
    }

    /// Text lines for the info panel. `bonus` is the item's star-link result
    /// when it is placed on the grid.
    pub fn info_lines(&self, bonus: Option<&ItemBonus>) -> Vec<String> {
        let mut lines = vec![
            self.name.clone(),
            format!("ID: {}", self.id),
            format!("Kind: {}", self.kind.label()),
            format!(
                "Cells: {}  Stars: {}",
                self.occupied_count(),
                self.star_count()
            ),
        ];
        if let Some(required) = self.required_neighbor {
            lines.push(format!("Stars link to: {}", required.label()));
        }
        if let Some(feature) = &self.feature {
            lines.push(format!("Feature: {feature}"));
        }
        if !self.description.is_empty() {
            lines.push(self.description.clone());
        }
        if let Some(bonus) = bonus {
            lines.push(format!(
                "Linked neighbors: {}  Chain size: {}",
                bonus.linked_neighbors, bonus.chain_size
            ));
        }
        lines
    }
}
