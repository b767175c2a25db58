use crate::catalog::ItemCatalog;
use crate::item::Item;
use crate::rng::Rng;

pub const DEFAULT_SLOT_COUNT: usize = 3;

/// Row of item slots the player drags new items from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemPanel {
    slots: Vec<Option<Item>>,
}

impl Default for ItemPanel {
    fn default() -> Self {
        Self::new(DEFAULT_SLOT_COUNT)
    }
}

impl ItemPanel {
    pub fn new(slot_count: usize) -> Self {
        Self {
            slots: vec![None; slot_count],
        }
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn slots(&self) -> &[Option<Item>] {
        &self.slots
    }

    /// Fills every slot with a fresh sample from `catalog`.
    pub fn refresh(&mut self, catalog: &ItemCatalog, rng: &mut Rng) {
        let mut sampled = catalog.sample(self.slots.len(), rng).into_iter();
        for slot in &mut self.slots {
            *slot = sampled.next();
        }
    }

    pub fn item(&self, slot: usize) -> Option<&Item> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    pub fn take(&mut self, slot: usize) -> Option<Item> {
        self.slots.get_mut(slot).and_then(Option::take)
    }

    /// Puts `item` into an empty slot. Returns the item back if the slot is
    /// missing or already filled.
    pub fn put(&mut self, slot: usize, item: Item) -> Result<(), Item> {
        match self.slots.get_mut(slot) {
            Some(entry) if entry.is_none() => {
                *entry = Some(item);
                Ok(())
            }
            _ => Err(item),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}
