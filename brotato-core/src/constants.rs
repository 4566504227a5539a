use serde::{Deserialize, Serialize};

/// First id handed out to items and locations. The game client and existing
/// multiworld saves depend on these ids, so the base and the table ordering
/// must never change.
pub const BASE_ID: u64 = 0x7A70_0000;

pub const NUM_WAVES: u32 = 20;

pub const MAX_NORMAL_CRATE_DROPS: u32 = 50;
pub const MAX_LEGENDARY_CRATE_DROPS: u32 = 50;

pub const MAX_COMMON_UPGRADES: u32 = 50;
pub const MAX_UNCOMMON_UPGRADES: u32 = 50;
pub const MAX_RARE_UPGRADES: u32 = 50;
pub const MAX_LEGENDARY_UPGRADES: u32 = 50;

// Brotato default, the shop can't easily grow beyond this.
pub const MAX_SHOP_SLOTS: u32 = 4;

pub const MAX_ITEM_WEIGHT: u32 = 100;

/// Weights used by the "default" item weight mode, roughly the max chance of
/// each tier showing up in the vanilla shop.
pub const DEFAULT_ITEM_WEIGHTS: RarityWeights = RarityWeights {
    common: 100,
    uncommon: 60,
    rare: 25,
    legendary: 8,
};

/// Item tiers. The discriminants match the game's own constants, which the
/// client mod reads out of the slot data.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemRarity {
    Common = 0,
    Uncommon = 1,
    Rare = 2,
    Legendary = 3,
}

impl ItemRarity {
    pub const ALL: [ItemRarity; 4] = [
        ItemRarity::Common,
        ItemRarity::Uncommon,
        ItemRarity::Rare,
        ItemRarity::Legendary,
    ];

    pub const fn value(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            ItemRarity::Common => "Common",
            ItemRarity::Uncommon => "Uncommon",
            ItemRarity::Rare => "Rare",
            ItemRarity::Legendary => "Legendary",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RarityWeights {
    pub common: u32,
    pub uncommon: u32,
    pub rare: u32,
    pub legendary: u32,
}

impl RarityWeights {
    pub const fn get(&self, rarity: ItemRarity) -> u32 {
        match rarity {
            ItemRarity::Common => self.common,
            ItemRarity::Uncommon => self.uncommon,
            ItemRarity::Rare => self.rare,
            ItemRarity::Legendary => self.legendary,
        }
    }
}

pub fn crate_drop_location_name(num: u32) -> String {
    format!("Loot Crate {num}")
}

pub fn legendary_crate_drop_location_name(num: u32) -> String {
    format!("Legendary Loot Crate {num}")
}

pub fn wave_complete_location_name(wave: u32, character: &str) -> String {
    format!("Wave {wave} Completed ({character})")
}

pub fn run_complete_location_name(character: &str) -> String {
    format!("Run Won ({character})")
}

pub fn crate_drop_group_region_name(num: u32) -> String {
    format!("Loot Crate Group {num}")
}

pub fn legendary_crate_drop_group_region_name(num: u32) -> String {
    format!("Legendary Loot Crate Group {num}")
}

pub fn character_region_name(character: &str) -> String {
    format!("In-Game ({character})")
}

pub fn start_game_entrance_name(character: &str) -> String {
    format!("Start Game ({character})")
}

pub const MENU_REGION_NAME: &str = "Menu";
