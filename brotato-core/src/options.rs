use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::characters::{
    PackId, StartingCharacterMode, ABYSSAL_TERRORS_CHARACTERS, BASE_GAME_CHARACTERS,
};
use crate::constants::{
    RarityWeights, MAX_COMMON_UPGRADES, MAX_ITEM_WEIGHT, MAX_LEGENDARY_CRATE_DROPS,
    MAX_LEGENDARY_UPGRADES, MAX_NORMAL_CRATE_DROPS, MAX_RARE_UPGRADES, MAX_SHOP_SLOTS,
    MAX_UNCOMMON_UPGRADES, NUM_WAVES,
};
use crate::item_weights::ItemWeightMode;
use crate::{GenerationError, Result};

const TOTAL_CHARACTERS: u32 =
    (BASE_GAME_CHARACTERS.characters.len() + ABYSSAL_TERRORS_CHARACTERS.characters.len()) as u32;

/// Raw value of a choice option: the choice's name or its number.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ChoiceValue {
    Index(u64),
    Name(String),
}

/// A closed set of named choices numbered in declaration order.
pub trait ChoiceOption: Copy + 'static {
    const CHOICES: &'static [(&'static str, Self)];

    /// Resolves `value` for the option called `option`, which only feeds the
    /// error message.
    fn parse(option: &str, value: ChoiceValue) -> std::result::Result<Self, String> {
        let found = match &value {
            ChoiceValue::Index(i) => usize::try_from(*i)
                .ok()
                .and_then(|i| Self::CHOICES.get(i)),
            ChoiceValue::Name(name) => Self::CHOICES.iter().find(|(n, _)| *n == name.as_str()),
        };
        found.map(|(_, choice)| *choice).ok_or_else(|| {
            let names: Vec<&str> = Self::CHOICES.iter().map(|(n, _)| *n).collect();
            format!("unknown value {value:?} for option '{option}', expected one of {names:?}")
        })
    }
}

macro_rules! choice_from_value {
    ($ty:ty, $option:literal) => {
        impl TryFrom<ChoiceValue> for $ty {
            type Error = String;

            fn try_from(value: ChoiceValue) -> std::result::Result<Self, String> {
                <$ty as ChoiceOption>::parse($option, value)
            }
        }
    };
}

/// For choice types shared by several fields, so errors name the field.
fn choice_field<'de, D, T>(option: &str, deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: ChoiceOption,
{
    let value = ChoiceValue::deserialize(deserializer)?;
    T::parse(option, value).map_err(de::Error::custom)
}

fn gold_reward_mode<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<RewardMode, D::Error> {
    choice_field("gold_reward_mode", d)
}

fn xp_reward_mode<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<RewardMode, D::Error> {
    choice_field("xp_reward_mode", d)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "ChoiceValue")]
pub enum StartingCharacters {
    DefaultAll,
    RandomAll,
    DefaultBaseGame,
    RandomBaseGame,
    DefaultAbyssalTerrors,
    RandomAbyssalTerrors,
}

impl ChoiceOption for StartingCharacters {
    const CHOICES: &'static [(&'static str, Self)] = &[
        ("default_all", Self::DefaultAll),
        ("random_all", Self::RandomAll),
        ("default_base_game", Self::DefaultBaseGame),
        ("random_base_game", Self::RandomBaseGame),
        ("default_abyssal_terrors", Self::DefaultAbyssalTerrors),
        ("random_abyssal_terrors", Self::RandomAbyssalTerrors),
    ];
}
choice_from_value!(StartingCharacters, "starting_characters");

impl From<StartingCharacters> for StartingCharacterMode {
    fn from(value: StartingCharacters) -> Self {
        match value {
            StartingCharacters::DefaultAll => StartingCharacterMode::DefaultAll,
            StartingCharacters::RandomAll => StartingCharacterMode::RandomAll,
            StartingCharacters::DefaultBaseGame => StartingCharacterMode::DefaultPack(PackId::BaseGame),
            StartingCharacters::RandomBaseGame => StartingCharacterMode::RandomPack(PackId::BaseGame),
            StartingCharacters::DefaultAbyssalTerrors => {
                StartingCharacterMode::DefaultPack(PackId::AbyssalTerrors)
            }
            StartingCharacters::RandomAbyssalTerrors => {
                StartingCharacterMode::RandomPack(PackId::AbyssalTerrors)
            }
        }
    }
}

/// Whether gold/XP items are given once, or again in every run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardMode {
    OneTime = 0,
    AllEveryTime = 1,
}

impl ChoiceOption for RewardMode {
    const CHOICES: &'static [(&'static str, Self)] =
        &[("one_time", Self::OneTime), ("all_every_time", Self::AllEveryTime)];
}

impl ChoiceOption for ItemWeightMode {
    const CHOICES: &'static [(&'static str, Self)] = &[
        ("default", Self::Default),
        ("chaos", Self::Chaos),
        ("custom", Self::Custom),
    ];
}
choice_from_value!(ItemWeightMode, "item_weight_mode");

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "ChoiceValue")]
pub enum ShopLockButtonsMode {
    All,
    None,
    MatchShopSlots,
    Custom,
}

impl ChoiceOption for ShopLockButtonsMode {
    const CHOICES: &'static [(&'static str, Self)] = &[
        ("all", Self::All),
        ("none", Self::None),
        ("match_shop_slots", Self::MatchShopSlots),
        ("custom", Self::Custom),
    ];
}
choice_from_value!(ShopLockButtonsMode, "shop_lock_buttons_mode");

fn all_names(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Every option a player can set for one Brotato slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrotatoOptions {
    pub num_victories: u32,
    pub starting_characters: StartingCharacters,
    pub num_starting_characters: u32,
    pub num_include_characters: u32,
    pub include_base_game_characters: BTreeSet<String>,
    pub enable_abyssal_terrors_dlc: bool,
    pub include_abyssal_terrors_characters: BTreeSet<String>,
    pub waves_per_drop: u32,
    #[serde(deserialize_with = "gold_reward_mode")]
    pub gold_reward_mode: RewardMode,
    #[serde(deserialize_with = "xp_reward_mode")]
    pub xp_reward_mode: RewardMode,
    pub enable_enemy_xp: bool,
    pub spawn_normal_loot_crates: bool,
    pub num_common_crate_drops: u32,
    pub num_common_crate_drops_per_check: u32,
    pub num_common_crate_drop_groups: u32,
    pub num_legendary_crate_drops: u32,
    pub num_legendary_crate_drops_per_check: u32,
    pub num_legendary_crate_drop_groups: u32,
    pub item_weight_mode: ItemWeightMode,
    pub common_item_weight: u32,
    pub uncommon_item_weight: u32,
    pub rare_item_weight: u32,
    pub legendary_item_weight: u32,
    pub gold_weight: u32,
    pub xp_weight: u32,
    pub num_common_upgrades: u32,
    pub num_uncommon_upgrades: u32,
    pub num_rare_upgrades: u32,
    pub num_legendary_upgrades: u32,
    pub num_starting_shop_slots: u32,
    pub shop_lock_buttons_mode: ShopLockButtonsMode,
    pub num_starting_lock_buttons: u32,
}

impl Default for BrotatoOptions {
    fn default() -> Self {
        Self {
            num_victories: 10,
            starting_characters: StartingCharacters::DefaultAll,
            num_starting_characters: 5,
            num_include_characters: TOTAL_CHARACTERS,
            include_base_game_characters: all_names(BASE_GAME_CHARACTERS.characters),
            enable_abyssal_terrors_dlc: false,
            include_abyssal_terrors_characters: all_names(ABYSSAL_TERRORS_CHARACTERS.characters),
            waves_per_drop: 10,
            gold_reward_mode: RewardMode::OneTime,
            xp_reward_mode: RewardMode::OneTime,
            enable_enemy_xp: false,
            spawn_normal_loot_crates: false,
            num_common_crate_drops: 25,
            num_common_crate_drops_per_check: 2,
            num_common_crate_drop_groups: 1,
            num_legendary_crate_drops: 5,
            num_legendary_crate_drops_per_check: 1,
            num_legendary_crate_drop_groups: 1,
            item_weight_mode: ItemWeightMode::Default,
            common_item_weight: 100,
            uncommon_item_weight: 60,
            rare_item_weight: 25,
            legendary_item_weight: 8,
            gold_weight: 50,
            xp_weight: 50,
            num_common_upgrades: 15,
            num_uncommon_upgrades: 10,
            num_rare_upgrades: 5,
            num_legendary_upgrades: 5,
            num_starting_shop_slots: MAX_SHOP_SLOTS,
            shop_lock_buttons_mode: ShopLockButtonsMode::MatchShopSlots,
            num_starting_lock_buttons: 0,
        }
    }
}

fn check_range(option: &str, value: u32, range: RangeInclusive<u32>) -> Result<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(GenerationError::Config(format!(
            "'{option}' is {value}, it must be between {} and {}",
            range.start(),
            range.end()
        )))
    }
}

impl BrotatoOptions {
    pub fn from_json(text: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(text)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        let characters = 1..=TOTAL_CHARACTERS;
        let crate_drops = 1..=50;
        let weight = 0..=MAX_ITEM_WEIGHT;
        let shop = 0..=MAX_SHOP_SLOTS;
        let checks = [
            ("num_victories", self.num_victories, characters.clone()),
            ("num_starting_characters", self.num_starting_characters, characters.clone()),
            ("num_include_characters", self.num_include_characters, characters.clone()),
            ("waves_per_drop", self.waves_per_drop, 1..=NUM_WAVES),
            ("num_common_crate_drops", self.num_common_crate_drops, 0..=MAX_NORMAL_CRATE_DROPS),
            ("num_common_crate_drops_per_check", self.num_common_crate_drops_per_check, crate_drops.clone()),
            ("num_common_crate_drop_groups", self.num_common_crate_drop_groups, characters.clone()),
            ("num_legendary_crate_drops", self.num_legendary_crate_drops, 0..=MAX_LEGENDARY_CRATE_DROPS),
            ("num_legendary_crate_drops_per_check", self.num_legendary_crate_drops_per_check, crate_drops),
            ("num_legendary_crate_drop_groups", self.num_legendary_crate_drop_groups, characters),
            ("common_item_weight", self.common_item_weight, weight.clone()),
            ("uncommon_item_weight", self.uncommon_item_weight, weight.clone()),
            ("rare_item_weight", self.rare_item_weight, weight.clone()),
            ("legendary_item_weight", self.legendary_item_weight, weight.clone()),
            ("gold_weight", self.gold_weight, weight.clone()),
            ("xp_weight", self.xp_weight, weight),
            ("num_common_upgrades", self.num_common_upgrades, 0..=MAX_COMMON_UPGRADES),
            ("num_uncommon_upgrades", self.num_uncommon_upgrades, 0..=MAX_UNCOMMON_UPGRADES),
            ("num_rare_upgrades", self.num_rare_upgrades, 0..=MAX_RARE_UPGRADES),
            ("num_legendary_upgrades", self.num_legendary_upgrades, 0..=MAX_LEGENDARY_UPGRADES),
            ("num_starting_shop_slots", self.num_starting_shop_slots, shop.clone()),
            ("num_starting_lock_buttons", self.num_starting_lock_buttons, shop),
        ];
        for (option, value, range) in checks {
            check_range(option, value, range)?;
        }
        Ok(())
    }

    pub fn custom_item_weights(&self) -> RarityWeights {
        RarityWeights {
            common: self.common_item_weight,
            uncommon: self.uncommon_item_weight,
            rare: self.rare_item_weight,
            legendary: self.legendary_item_weight,
        }
    }

    pub fn num_starting_lock_buttons(&self) -> u32 {
        match self.shop_lock_buttons_mode {
            ShopLockButtonsMode::All => MAX_SHOP_SLOTS,
            ShopLockButtonsMode::None => 0,
            ShopLockButtonsMode::MatchShopSlots => self.num_starting_shop_slots,
            ShopLockButtonsMode::Custom => self.num_starting_lock_buttons,
        }
    }
}
