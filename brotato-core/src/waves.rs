use std::collections::BTreeMap;

use crate::constants::{ItemRarity, NUM_WAVES};
use crate::item_weights::CrateItemCounts;

/// Waves which award a check, every `waves_per_check` waves up to the last.
pub fn waves_with_checks(waves_per_check: u32) -> Vec<u32> {
    let step = waves_per_check.max(1) as usize;
    (step as u32..=NUM_WAVES).step_by(step).collect()
}

/// Wave numbers the client uses to roll concrete items, one per item.
///
/// Cycles through 1..=20 and is sorted afterwards, so the n-th item of a tier
/// is never weaker than the one before it.
pub fn wave_indices(count: u64) -> Vec<u32> {
    let mut waves: Vec<u32> = (0..count)
        .map(|i| (i % u64::from(NUM_WAVES)) as u32 + 1)
        .collect();
    waves.sort_unstable();
    waves
}

/// Wave list per rarity, keyed by the rarity's numeric value.
pub fn wave_per_game_item(counts: &CrateItemCounts) -> BTreeMap<u8, Vec<u32>> {
    ItemRarity::ALL
        .iter()
        .map(|r| (r.value(), wave_indices(counts.count(*r))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_waves_for_every_cadence() {
        assert_eq!(waves_with_checks(1), (1..=20).collect::<Vec<_>>());
        assert_eq!(waves_with_checks(5), vec![5, 10, 15, 20]);
        assert_eq!(waves_with_checks(7), vec![7, 14]);
        assert_eq!(waves_with_checks(10), vec![10, 20]);
        assert_eq!(waves_with_checks(20), vec![20]);
        for per_check in 1..=NUM_WAVES {
            let waves = waves_with_checks(per_check);
            assert_eq!(waves.len() as u32, NUM_WAVES / per_check);
            assert!(waves.iter().all(|w| w % per_check == 0));
        }
    }

    #[test]
    fn fifty_items_cycle_through_every_wave() {
        let mut expected: Vec<u32> = Vec::new();
        for wave in 1..=20 {
            let copies = if wave <= 10 { 3 } else { 2 };
            expected.extend(std::iter::repeat(wave).take(copies));
        }
        assert_eq!(wave_indices(50), expected);
    }

    #[test]
    fn short_lists_are_increasing() {
        assert_eq!(wave_indices(0), Vec::<u32>::new());
        assert_eq!(wave_indices(5), vec![1, 2, 3, 4, 5]);
        assert_eq!(wave_indices(20), (1..=20).collect::<Vec<_>>());
    }

    #[test]
    fn every_tier_gets_a_list() {
        let counts = CrateItemCounts {
            sampled: vec![
                (ItemRarity::Common, 50),
                (ItemRarity::Uncommon, 0),
                (ItemRarity::Rare, 3),
                (ItemRarity::Legendary, 0),
            ],
            guaranteed_legendary: 20,
        };
        let waves = wave_per_game_item(&counts);
        assert_eq!(waves.len(), 4);
        assert_eq!(waves[&0].len(), 50);
        assert!(waves[&1].is_empty());
        assert_eq!(waves[&2], vec![1, 2, 3]);
        assert_eq!(waves[&3], (1..=20).collect::<Vec<_>>());
        for list in waves.values() {
            assert!(list.windows(2).all(|w| w[0] <= w[1]));
            assert!(list.iter().all(|w| (1..=20).contains(w)));
        }
    }
}
