use crate::item::Item;

pub type JunkId = u32;

/// Loose items dropped outside the grid. Only membership is tracked here;
/// where the pieces tumble to is up to the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JunkPile {
    items: Vec<(JunkId, Item)>,
    next_id: JunkId,
}

impl JunkPile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: Item) -> JunkId {
        self.next_id += 1;
        let id = self.next_id;
        self.items.push((id, item));
        id
    }

    pub fn get(&self, id: JunkId) -> Option<&Item> {
        self.items
            .iter()
            .find(|(existing, _)| *existing == id)
            .map(|(_, item)| item)
    }

    pub fn take(&mut self, id: JunkId) -> Option<Item> {
        let index = self.items.iter().position(|(existing, _)| *existing == id)?;
        Some(self.items.remove(index).1)
    }

    /// Returns a taken item under its old id.
    pub fn restore(&mut self, id: JunkId, item: Item) {
        self.next_id = self.next_id.max(id);
        self.items.push((id, item));
    }

    pub fn items(&self) -> &[(JunkId, Item)] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) -> Vec<Item> {
        self.items.drain(..).map(|(_, item)| item).collect()
    }
}
