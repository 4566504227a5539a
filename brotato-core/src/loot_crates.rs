use serde::{Deserialize, Serialize};

/// A run of consecutive crate locations which come into logic together once
/// the player has won `wins_to_unlock` runs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootCrateGroup {
    pub index: u32,
    pub num_crates: u32,
    pub wins_to_unlock: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CrateType {
    Common,
    Legendary,
}

/// Splits `num_crates` locations into near-equal groups spread out over
/// `num_victories` wins.
///
/// More groups than wins are never created: the group count is clamped to
/// `num_victories`, so every group is reachable by the time the goal is. When
/// the crates don't divide evenly the earlier groups get one extra each.
pub fn build_loot_crate_groups(
    num_crates: u32,
    num_groups: u32,
    num_victories: u32,
) -> Vec<LootCrateGroup> {
    let num_groups = num_groups.min(num_victories).max(1);

    let crates_per_group = num_crates / num_groups;
    let mut extra_crates = num_crates % num_groups;
    let wins_per_group = (num_victories / num_groups).max(1);

    let mut wins_to_unlock = 0;
    let mut groups = Vec::with_capacity(num_groups as usize);
    for index in 1..=num_groups {
        let mut crates_in_group = crates_per_group;
        if extra_crates > 0 {
            crates_in_group += 1;
            extra_crates -= 1;
        }

        groups.push(LootCrateGroup {
            index,
            num_crates: crates_in_group,
            wins_to_unlock,
        });
        // Set up the next group now, which keeps group 1 at zero wins.
        wins_to_unlock = (wins_to_unlock + wins_per_group).min(num_victories);
    }

    groups
}
