use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::characters::CharacterCatalog;
use crate::constants::{ItemRarity, BASE_ID};
use crate::{GenerationError, Result};

pub const GOLD_AMOUNTS: [u32; 5] = [10, 25, 50, 100, 200];
pub const XP_AMOUNTS: [u32; 6] = [5, 10, 25, 50, 100, 150];

pub const RUN_COMPLETE_ITEM_NAME: &str = "Run Won";

/// Every kind of item this world puts into the multiworld.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ItemKind {
    /// Unlocks a character.
    Character(&'static str),
    /// A weapon/item of the given tier, generated by the client when received.
    CrateItem(ItemRarity),
    Upgrade(ItemRarity),
    ShopSlot,
    ShopLockButton,
    /// Event item placed on every "Run Won" location; counts toward the goal.
    RunComplete,
    Gold(u32),
    Xp(u32),
}

impl ItemKind {
    pub fn name(&self) -> String {
        match self {
            ItemKind::Character(name) => (*name).to_string(),
            ItemKind::CrateItem(rarity) => format!("{} Item", rarity.name()),
            ItemKind::Upgrade(rarity) => format!("{} Upgrade", rarity.name()),
            ItemKind::ShopSlot => "Shop Slot".to_string(),
            ItemKind::ShopLockButton => "Shop Lock Button".to_string(),
            ItemKind::RunComplete => RUN_COMPLETE_ITEM_NAME.to_string(),
            ItemKind::Gold(amount) => format!("Gold ({amount})"),
            ItemKind::Xp(amount) => format!("XP ({amount})"),
        }
    }

    pub fn classification(&self) -> ItemClassification {
        match self {
            ItemKind::Character(_) | ItemKind::RunComplete => ItemClassification::Progression,
            ItemKind::CrateItem(_)
            | ItemKind::Upgrade(_)
            | ItemKind::ShopSlot
            | ItemKind::ShopLockButton => ItemClassification::Useful,
            ItemKind::Gold(_) | ItemKind::Xp(_) => ItemClassification::Filler,
        }
    }

    pub fn is_event(&self) -> bool {
        matches!(self, ItemKind::RunComplete)
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemClassification {
    Progression,
    Useful,
    Filler,
}

#[derive(Clone, Debug)]
pub struct ItemData {
    pub kind: ItemKind,
    pub name: String,
    pub code: Option<u64>,
}

/// An item instance handed over to the host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub code: Option<u64>,
    pub classification: ItemClassification,
    pub player: u32,
}

#[derive(Debug)]
pub struct ItemTable {
    entries: Vec<ItemData>,
}

impl ItemTable {
    fn build(catalog: &CharacterCatalog) -> Self {
        let mut kinds: Vec<ItemKind> = Vec::new();
        kinds.extend(ItemRarity::ALL.iter().map(|r| ItemKind::CrateItem(*r)));
        kinds.extend(ItemRarity::ALL.iter().map(|r| ItemKind::Upgrade(*r)));
        kinds.extend(GOLD_AMOUNTS.iter().map(|a| ItemKind::Gold(*a)));
        kinds.extend(XP_AMOUNTS.iter().map(|a| ItemKind::Xp(*a)));
        kinds.push(ItemKind::ShopSlot);
        kinds.push(ItemKind::ShopLockButton);
        kinds.extend(catalog.all_characters().map(ItemKind::Character));
        kinds.push(ItemKind::RunComplete);

        let mut next_id = BASE_ID;
        let entries = kinds
            .into_iter()
            .map(|kind| {
                let code = if kind.is_event() {
                    None
                } else {
                    next_id += 1;
                    Some(next_id - 1)
                };
                ItemData {
                    kind,
                    name: kind.name(),
                    code,
                }
            })
            .collect();
        Self { entries }
    }

    pub fn get(&self, kind: ItemKind) -> Result<&ItemData> {
        self.entries
            .iter()
            .find(|e| e.kind == kind)
            .ok_or_else(|| GenerationError::UnknownItem(kind.name()))
    }

    pub fn create_item(&self, kind: ItemKind, player: u32) -> Result<Item> {
        let data = self.get(kind)?;
        Ok(Item {
            name: data.name.clone(),
            code: data.code,
            classification: kind.classification(),
            player,
        })
    }

    /// Ids of every non-event item, as the host's data package expects them.
    pub fn name_to_id(&self) -> BTreeMap<String, u64> {
        self.entries
            .iter()
            .filter_map(|e| e.code.map(|code| (e.name.clone(), code)))
            .collect()
    }

    pub fn name_groups(&self) -> BTreeMap<String, Vec<String>> {
        let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for entry in &self.entries {
            let group = match entry.kind {
                ItemKind::Character(_) => "Characters",
                ItemKind::CrateItem(_) => "Items",
                ItemKind::Upgrade(_) => "Upgrades",
                ItemKind::ShopSlot | ItemKind::ShopLockButton => "Shop",
                ItemKind::Gold(_) => "Gold",
                ItemKind::Xp(_) => "XP",
                ItemKind::RunComplete => continue,
            };
            groups
                .entry(group.to_string())
                .or_default()
                .push(entry.name.clone());
        }
        groups
    }
}

/// The item table for the full Brotato character catalog.
pub fn item_table() -> Result<&'static ItemTable> {
    static TABLE: OnceLock<ItemTable> = OnceLock::new();
    if let Some(table) = TABLE.get() {
        return Ok(table);
    }
    let table = ItemTable::build(&CharacterCatalog::brotato()?);
    Ok(TABLE.get_or_init(|| table))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_start_at_base() {
        let ids = item_table().unwrap().name_to_id();
        let mut codes: Vec<u64> = ids.values().copied().collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), ids.len());
        assert_eq!(codes[0], BASE_ID);
        assert_eq!(ids["Common Item"], BASE_ID);
        assert_eq!(ids["Legendary Upgrade"], BASE_ID + 7);
    }

    #[test]
    fn run_complete_is_an_event() {
        let data = item_table().unwrap().get(ItemKind::RunComplete).unwrap();
        assert_eq!(data.code, None);
        assert!(!item_table().unwrap().name_to_id().contains_key(RUN_COMPLETE_ITEM_NAME));
    }

    #[test]
    fn characters_are_progression() {
        let item = item_table().unwrap()
            .create_item(ItemKind::Character("Mage"), 1)
            .unwrap();
        assert_eq!(item.name, "Mage");
        assert_eq!(item.classification, ItemClassification::Progression);
    }

    #[test]
    fn unknown_items_are_lookup_failures() {
        assert!(matches!(
            item_table().unwrap().get(ItemKind::Gold(7)),
            Err(GenerationError::UnknownItem(_))
        ));
    }

    #[test]
    fn groups_cover_every_character() {
        let groups = item_table().unwrap().name_groups();
        assert_eq!(groups["Characters"].len(), CharacterCatalog::brotato().unwrap().total_characters());
        assert_eq!(groups["Gold"].len(), GOLD_AMOUNTS.len());
        assert_eq!(groups["XP"].len(), XP_AMOUNTS.len());
    }
}
