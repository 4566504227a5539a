use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::loot_crates::LootCrateGroup;

/// Everything the game client reads back from the multiworld. Field names are
/// the keys the client looks up, do not rename them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotData {
    pub waves_with_checks: Vec<u32>,
    pub num_wins_needed: u32,
    pub num_starting_shop_slots: u32,
    pub num_starting_lock_buttons: u32,
    pub num_common_crate_locations: u32,
    pub num_common_crate_drops_per_check: u32,
    pub common_crate_drop_groups: Vec<LootCrateGroup>,
    pub num_legendary_crate_locations: u32,
    pub num_legendary_crate_drops_per_check: u32,
    pub legendary_crate_drop_groups: Vec<LootCrateGroup>,
    /// Rarity value to wave list; serialized with string keys "0" to "3".
    pub wave_per_game_item: BTreeMap<u8, Vec<u32>>,
    pub gold_reward_mode: u8,
    pub xp_reward_mode: u8,
    pub enable_enemy_xp: bool,
    pub spawn_normal_loot_crates: bool,
}
