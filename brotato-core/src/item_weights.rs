use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{ItemRarity, RarityWeights, DEFAULT_ITEM_WEIGHTS, MAX_ITEM_WEIGHT};
use crate::items::{ItemKind, GOLD_AMOUNTS, XP_AMOUNTS};
use crate::sampling::{sample_with_refills, SamplingError};
use crate::{GenerationError, Result};

/// How the rarity weights for crate items are chosen.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "crate::options::ChoiceValue")]
pub enum ItemWeightMode {
    Default,
    /// Every tier gets an independent random weight in `0..=100`.
    Chaos,
    Custom,
}

pub fn rarity_weights<R: Rng + ?Sized>(
    mode: ItemWeightMode,
    custom: RarityWeights,
    rng: &mut R,
) -> RarityWeights {
    match mode {
        ItemWeightMode::Default => DEFAULT_ITEM_WEIGHTS,
        ItemWeightMode::Custom => custom,
        ItemWeightMode::Chaos => RarityWeights {
            common: rng.gen_range(0..=MAX_ITEM_WEIGHT),
            uncommon: rng.gen_range(0..=MAX_ITEM_WEIGHT),
            rare: rng.gen_range(0..=MAX_ITEM_WEIGHT),
            legendary: rng.gen_range(0..=MAX_ITEM_WEIGHT),
        },
    }
}

/// Crate items to put in the pool, one count per rarity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrateItemCounts {
    pub sampled: Vec<(ItemRarity, u64)>,
    /// Legendary items owed to the legendary crate locations, on top of
    /// whatever legendaries the weighted draw produced.
    pub guaranteed_legendary: u64,
}

impl CrateItemCounts {
    pub fn sampled(&self, rarity: ItemRarity) -> u64 {
        self.sampled
            .iter()
            .find(|(r, _)| *r == rarity)
            .map_or(0, |(_, n)| *n)
    }

    pub fn count(&self, rarity: ItemRarity) -> u64 {
        let guaranteed = if rarity == ItemRarity::Legendary {
            self.guaranteed_legendary
        } else {
            0
        };
        self.sampled(rarity) + guaranteed
    }

    pub fn total_sampled(&self) -> u64 {
        self.sampled.iter().map(|(_, n)| n).sum()
    }

    pub fn total(&self) -> u64 {
        self.total_sampled() + self.guaranteed_legendary
    }
}

/// Draws `target` crate items by rarity weight and adds the guaranteed
/// legendaries.
pub fn create_items_for_loot_crate_locations<R: Rng + ?Sized>(
    target: u64,
    guaranteed_legendary: u64,
    weights: RarityWeights,
    rng: &mut R,
) -> Result<CrateItemCounts> {
    let table: Vec<(ItemRarity, u64)> = ItemRarity::ALL
        .iter()
        .map(|r| (*r, u64::from(weights.get(*r))))
        .collect();
    let sampled = sample_with_refills(&table, target, rng).map_err(|err| match err {
        SamplingError::AllWeightsZero { .. } => GenerationError::Config(format!(
            "every item weight is zero but {target} crate items are needed; set at least one \
             of 'common_item_weight', 'uncommon_item_weight', 'rare_item_weight' or \
             'legendary_item_weight' above zero"
        )),
        other => GenerationError::Invariant(other.to_string()),
    })?;
    debug!("crate items {sampled:?} plus {guaranteed_legendary} guaranteed legendaries");
    Ok(CrateItemCounts {
        sampled,
        guaranteed_legendary,
    })
}

/// Splits `weight` evenly over `parts` items; the first `weight % parts`
/// items get one more.
pub fn split_group_weight(weight: u64, parts: usize) -> Vec<u64> {
    if parts == 0 {
        return Vec::new();
    }
    let parts_u64 = parts as u64;
    let (each, extra) = (weight / parts_u64, weight % parts_u64);
    (0..parts_u64)
        .map(|i| each + u64::from(i < extra))
        .collect()
}

/// Per-item weights for the gold and XP filler items.
pub fn filler_weights(gold_weight: u32, xp_weight: u32) -> Vec<(ItemKind, u64)> {
    let gold = GOLD_AMOUNTS
        .iter()
        .zip(split_group_weight(u64::from(gold_weight), GOLD_AMOUNTS.len()))
        .map(|(amount, w)| (ItemKind::Gold(*amount), w));
    let xp = XP_AMOUNTS
        .iter()
        .zip(split_group_weight(u64::from(xp_weight), XP_AMOUNTS.len()))
        .map(|(amount, w)| (ItemKind::Xp(*amount), w));
    gold.chain(xp).collect()
}

/// Picks `count` filler items from the gold/XP table.
pub fn create_filler_items<R: Rng + ?Sized>(
    count: u64,
    gold_weight: u32,
    xp_weight: u32,
    rng: &mut R,
) -> Result<Vec<(ItemKind, u64)>> {
    let table = filler_weights(gold_weight, xp_weight);
    let picked = sample_with_refills(&table, count, rng).map_err(|_| {
        GenerationError::Config(format!(
            "{count} filler items are needed but 'gold_weight' and 'xp_weight' are both zero; \
             raise one of them"
        ))
    })?;
    Ok(picked.into_iter().filter(|(_, n)| *n > 0).collect())
}
