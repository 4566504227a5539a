use std::collections::BTreeMap;

use log::{debug, warn};
use rand::Rng;

use crate::items::{Item, ItemKind, ItemTable};
use crate::sampling::sample_without_replacement;
use crate::{GenerationError, Result};

/// Item counts for one player's pool.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemPool {
    counts: BTreeMap<ItemKind, u64>,
}

impl ItemPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, kind: ItemKind, count: u64) {
        if count > 0 {
            *self.counts.entry(kind).or_default() += count;
        }
    }

    pub fn count(&self, kind: ItemKind) -> u64 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ItemKind, u64)> + '_ {
        self.counts.iter().map(|(k, n)| (*k, *n))
    }

    /// Expands the counts into item instances, skipping `skip` kinds.
    pub fn create_items(
        &self,
        table: &ItemTable,
        player: u32,
        skip: impl Fn(ItemKind) -> bool,
    ) -> Result<Vec<Item>> {
        let mut items = Vec::with_capacity(self.total() as usize);
        for (kind, count) in self.iter().filter(|(k, _)| !skip(*k)) {
            let item = table.create_item(kind, player)?;
            items.extend(std::iter::repeat(item).take(count as usize));
        }
        Ok(items)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reconciled {
    pub non_essential: Vec<(ItemKind, u64)>,
    pub filler_count: u64,
}

/// Fits the non-essential items into the locations left over once every
/// claimed item has a spot.
///
/// Leftover locations become filler. When there are too few, items are removed
/// one at a time, each removal picking a kind in proportion to how many of it
/// are still in the pool.
pub fn reconcile<R: Rng + ?Sized>(
    total_locations: u64,
    claimed: u64,
    non_essential: &[(ItemKind, u64)],
    rng: &mut R,
) -> Result<Reconciled> {
    let requested: u64 = non_essential.iter().map(|(_, n)| n).sum();
    if claimed > total_locations {
        return Err(GenerationError::Config(format!(
            "{claimed} items must be placed but there are only {total_locations} locations; \
             lower 'waves_per_drop', add loot crates, start with more characters, shop slots \
             or lock buttons, or include fewer characters"
        )));
    }

    let free = total_locations - claimed;
    if requested <= free {
        return Ok(Reconciled {
            non_essential: non_essential.to_vec(),
            filler_count: free - requested,
        });
    }

    let excess = requested - free;
    warn!("item pool is {excess} items over the {total_locations} locations, removing some at random");
    let removed = sample_without_replacement(non_essential, excess, rng)
        .map_err(|err| GenerationError::Invariant(err.to_string()))?;
    let kept: Vec<(ItemKind, u64)> = non_essential
        .iter()
        .zip(&removed)
        .map(|((kind, n), (_, cut))| (*kind, n - cut))
        .collect();
    debug!("removed {removed:?}");

    Ok(Reconciled {
        non_essential: kept,
        filler_count: 0,
    })
}
