//! The host side of generation: what the world needs from the multiworld it is
//! generating into, plus a small in-memory multiworld for the CLI and tests.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use crate::constants::MENU_REGION_NAME;
use crate::items::Item;
use crate::regions::Region;
use crate::rules::{AccessRule, CollectionState};
use crate::{GenerationError, Result};

pub trait MultiWorld {
    fn add_region(&mut self, region: Region) -> Result<()>;

    /// Gives `item` to its player at the start, without placing it anywhere.
    fn push_precollected(&mut self, item: Item);

    fn extend_item_pool(&mut self, items: Vec<Item>);

    fn place_locked_item(&mut self, player: u32, location: &str, item: Item) -> Result<()>;

    fn set_completion_condition(&mut self, player: u32, rule: AccessRule);
}

/// Item counts collected by one player.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemState {
    counts: HashMap<String, u32>,
}

impl ItemState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collect(&mut self, item: &str, count: u32) {
        *self.counts.entry(item.to_string()).or_default() += count;
    }

    pub fn count(&self, item: &str) -> u32 {
        self.counts.get(item).copied().unwrap_or(0)
    }
}

impl CollectionState for ItemState {
    fn has(&self, item: &str, count: u32) -> bool {
        self.count(item) >= count
    }
}

#[derive(Debug, Default)]
pub struct MemoryWorld {
    pub regions: Vec<Region>,
    pub item_pool: Vec<Item>,
    pub precollected: BTreeMap<u32, Vec<Item>>,
    /// Location name to the item locked onto it.
    pub locked: BTreeMap<String, Item>,
    pub completion: BTreeMap<u32, AccessRule>,
}

impl MemoryWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn region(&self, player: u32, name: &str) -> Option<&Region> {
        self.regions
            .iter()
            .find(|r| r.player == player && r.name == name)
    }

    pub fn location_count(&self, player: u32) -> usize {
        self.regions
            .iter()
            .filter(|r| r.player == player)
            .map(|r| r.locations.len())
            .sum()
    }

    /// The player's starting inventory as a collection state.
    pub fn starting_state(&self, player: u32) -> ItemState {
        let mut state = ItemState::new();
        for item in self.precollected.get(&player).into_iter().flatten() {
            state.collect(&item.name, 1);
        }
        state
    }

    /// Regions reachable from the menu with `state`, by breadth-first search
    /// over entrances whose rule passes.
    pub fn reachable_regions(&self, player: u32, state: &dyn CollectionState) -> HashSet<String> {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::new();
        if self.region(player, MENU_REGION_NAME).is_some() {
            seen.insert(MENU_REGION_NAME.to_string());
            queue.push_back(MENU_REGION_NAME.to_string());
        }
        while let Some(name) = queue.pop_front() {
            let Some(region) = self.region(player, &name) else {
                continue;
            };
            for exit in region.exits.iter().filter(|e| e.rule.evaluate(state)) {
                if seen.insert(exit.target.clone()) {
                    queue.push_back(exit.target.clone());
                }
            }
        }
        seen
    }

    pub fn can_reach_region(&self, player: u32, name: &str, state: &dyn CollectionState) -> bool {
        self.reachable_regions(player, state).contains(name)
    }

    pub fn is_complete(&self, player: u32, state: &dyn CollectionState) -> bool {
        self.completion
            .get(&player)
            .is_some_and(|rule| rule.evaluate(state))
    }
}

impl MultiWorld for MemoryWorld {
    fn add_region(&mut self, region: Region) -> Result<()> {
        if self.region(region.player, &region.name).is_some() {
            return Err(GenerationError::Invariant(format!(
                "region '{}' was added twice for player {}",
                region.name, region.player
            )));
        }
        self.regions.push(region);
        Ok(())
    }

    fn push_precollected(&mut self, item: Item) {
        self.precollected.entry(item.player).or_default().push(item);
    }

    fn extend_item_pool(&mut self, items: Vec<Item>) {
        self.item_pool.extend(items);
    }

    fn place_locked_item(&mut self, player: u32, location: &str, item: Item) -> Result<()> {
        let exists = self
            .regions
            .iter()
            .filter(|r| r.player == player)
            .flat_map(|r| &r.locations)
            .any(|l| l.name == location);
        if !exists {
            return Err(GenerationError::UnknownLocation(location.to_string()));
        }
        if self.locked.contains_key(location) {
            return Err(GenerationError::Invariant(format!(
                "location '{location}' already holds an item"
            )));
        }
        self.locked.insert(location.to_string(), item);
        Ok(())
    }

    fn set_completion_condition(&mut self, player: u32, rule: AccessRule) {
        self.completion.insert(player, rule);
    }
}
