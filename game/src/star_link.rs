use std::{
    collections::{BTreeSet, HashMap, HashSet},
    fmt,
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::grid::{PlacedItem, PlacementId, occupant_at};
use crate::item::Item;

/// Per-item line of a star-link report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemBonus {
    pub placement_id: PlacementId,
    pub item_id: String,
    pub row: i32,
    pub col: i32,
    pub star_count: usize,
    /// Distinct items bonded with this one, in either direction.
    pub linked_neighbors: usize,
    /// Size of the bond component containing this item (1 when isolated).
    pub chain_size: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarLinkReport {
    pub total_stars: usize,
    /// Active stars; several stars onto the same neighbor each count.
    pub active_star_links: usize,
    pub unique_linked_pairs: usize,
    /// Components with at least two items.
    pub chain_count: usize,
    pub max_chain_size: usize,
    pub item_bonuses: Vec<ItemBonus>,
}

impl StarLinkReport {
    pub fn bonus_for(&self, id: PlacementId) -> Option<&ItemBonus> {
        self.item_bonuses.iter().find(|b| b.placement_id == id)
    }
}

pub type ListenerId = u64;

type Listener = Box<dyn FnMut(&StarLinkReport)>;

/// Derives bonding state from a placed-item list.
///
/// A star of placed item `P` at local offset `(sr, sc)` is active when the
/// world cell `(P.row + sr, P.col + sc)` is covered by an occupied cell of
/// another item whose kind equals `P`'s required neighbor kind.
#[derive(Default)]
pub struct StarLinkAnalyzer {
    last: StarLinkReport,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener_id: ListenerId,
}

impl fmt::Debug for StarLinkAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StarLinkAnalyzer")
            .field("last", &self.last)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl StarLinkAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&StarLinkReport) + 'static,
    {
        self.next_listener_id += 1;
        let id = self.next_listener_id;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// The most recent recompute result.
    pub fn last(&self) -> &StarLinkReport {
        &self.last
    }

    pub fn snapshot(&self) -> StarLinkReport {
        self.last.clone()
    }

    /// Full recompute over `placed`; stores the result and notifies every
    /// listener before returning.
    pub fn recompute(&mut self, placed: &[PlacedItem]) -> &StarLinkReport {
        self.last = compute(placed);
        debug!(
            placed = placed.len(),
            active_star_links = self.last.active_star_links,
            chain_count = self.last.chain_count,
            "star links recomputed"
        );
        for (_, listener) in &mut self.listeners {
            listener(&self.last);
        }
        &self.last
    }
}

/// Items that `owner`'s stars actively bond onto, one entry per active star.
pub fn active_bonds<'a>(placed: &'a [PlacedItem], owner: &PlacedItem) -> Vec<&'a PlacedItem> {
    let mut targets = Vec::new();
    if owner.item.required_neighbor().is_none() {
        return targets;
    }
    for (sr, sc) in owner.item.shape().star_positions() {
        let Some(target) = occupant_at(placed, owner.row + sr, owner.col + sc, Some(owner.id))
        else {
            continue;
        };
        if target.id != owner.id && owner.item.can_star_link_to(&target.item) {
            targets.push(target);
        }
    }
    targets
}

/// Local star offsets of placed item `id` that currently bond.
pub fn active_star_cells(placed: &[PlacedItem], id: PlacementId) -> Vec<(i32, i32)> {
    let Some(owner) = placed.iter().find(|p| p.id == id) else {
        return Vec::new();
    };
    owner
        .item
        .shape()
        .star_positions()
        .into_iter()
        .filter(|&(sr, sc)| {
            occupant_at(placed, owner.row + sr, owner.col + sc, Some(owner.id))
                .is_some_and(|target| owner.item.can_star_link_to(&target.item))
        })
        .collect()
}

/// Local star offsets of `item` that would bond if it were placed at
/// `(row, col)`. `item` is not part of `placed`, so nothing is excluded.
pub fn candidate_active_star_cells(
    placed: &[PlacedItem],
    item: &Item,
    row: i32,
    col: i32,
) -> Vec<(i32, i32)> {
    item.shape()
        .star_positions()
        .into_iter()
        .filter(|&(sr, sc)| {
            occupant_at(placed, row + sr, col + sc, None)
                .is_some_and(|target| item.can_star_link_to(&target.item))
        })
        .collect()
}

/// Pure star-link computation over `placed`.
pub fn compute(placed: &[PlacedItem]) -> StarLinkReport {
    let total_stars = placed.iter().map(|p| p.item.star_count()).sum();

    let mut neighbors: HashMap<PlacementId, BTreeSet<PlacementId>> = placed
        .iter()
        .map(|p| (p.id, BTreeSet::new()))
        .collect();
    let mut pairs: HashSet<(PlacementId, PlacementId)> = HashSet::new();
    let mut active_star_links = 0;

    for owner in placed {
        for target in active_bonds(placed, owner) {
            active_star_links += 1;
            pairs.insert((owner.id.min(target.id), owner.id.max(target.id)));
            neighbors.entry(owner.id).or_default().insert(target.id);
            neighbors.entry(target.id).or_default().insert(owner.id);
        }
    }

    let chains = compute_chains(placed, &neighbors);

    let item_bonuses = placed
        .iter()
        .map(|p| ItemBonus {
            placement_id: p.id,
            item_id: p.item.id().to_string(),
            row: p.row,
            col: p.col,
            star_count: p.item.star_count(),
            linked_neighbors: neighbors.get(&p.id).map_or(0, BTreeSet::len),
            chain_size: chains.size_by_item.get(&p.id).copied().unwrap_or(1),
        })
        .collect();

    StarLinkReport {
        total_stars,
        active_star_links,
        unique_linked_pairs: pairs.len(),
        chain_count: chains.chain_count,
        max_chain_size: chains.max_chain_size,
        item_bonuses,
    }
}

struct ChainInfo {
    chain_count: usize,
    max_chain_size: usize,
    size_by_item: HashMap<PlacementId, usize>,
}

fn compute_chains(
    placed: &[PlacedItem],
    neighbors: &HashMap<PlacementId, BTreeSet<PlacementId>>,
) -> ChainInfo {
    let mut visited: HashSet<PlacementId> = HashSet::new();
    let mut size_by_item = HashMap::new();
    let mut chain_count = 0;
    let mut max_chain_size = 0;

    for start in placed {
        if visited.contains(&start.id) {
            continue;
        }

        // Explicit stack so long chains never recurse.
        let mut stack = vec![start.id];
        let mut component = Vec::new();
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            component.push(current);
            if let Some(next) = neighbors.get(&current) {
                stack.extend(next.iter().filter(|id| !visited.contains(*id)));
            }
        }

        if component.len() >= 2 {
            chain_count += 1;
        }
        max_chain_size = max_chain_size.max(component.len());
        for id in &component {
            size_by_item.insert(*id, component.len());
        }
    }

    ChainInfo {
        chain_count,
        max_chain_size,
        size_by_item,
    }
}
