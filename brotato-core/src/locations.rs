use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::characters::CharacterCatalog;
use crate::constants::{
    crate_drop_location_name, legendary_crate_drop_location_name, run_complete_location_name,
    wave_complete_location_name, BASE_ID, MAX_LEGENDARY_CRATE_DROPS, MAX_NORMAL_CRATE_DROPS,
    NUM_WAVES,
};
use crate::{GenerationError, Result};

pub const WAVE_COMPLETE_GROUP: &str = "Wave Complete Specific Character";
pub const RUN_WON_GROUP: &str = "Run Win Specific Character";
pub const NORMAL_CRATE_GROUP: &str = "Normal Crate Drops";
pub const LEGENDARY_CRATE_GROUP: &str = "Legendary Crate Drops";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LocationKind {
    WaveComplete { character: &'static str, wave: u32 },
    /// Event location, has no address.
    RunComplete { character: &'static str },
    LootCrate(u32),
    LegendaryLootCrate(u32),
}

#[derive(Clone, Debug)]
pub struct LocationData {
    pub kind: LocationKind,
    pub name: String,
    pub address: Option<u64>,
}

#[derive(Debug)]
pub struct LocationTable {
    entries: Vec<LocationData>,
}

impl LocationTable {
    fn build(catalog: &CharacterCatalog) -> Self {
        let mut kinds = Vec::new();
        for character in catalog.all_characters() {
            kinds.extend((1..=NUM_WAVES).map(|wave| LocationKind::WaveComplete { character, wave }));
        }
        kinds.extend(
            catalog
                .all_characters()
                .map(|character| LocationKind::RunComplete { character }),
        );
        kinds.extend((1..=MAX_NORMAL_CRATE_DROPS).map(LocationKind::LootCrate));
        kinds.extend((1..=MAX_LEGENDARY_CRATE_DROPS).map(LocationKind::LegendaryLootCrate));

        let mut next_address = BASE_ID;
        let entries = kinds
            .into_iter()
            .map(|kind| {
                let (name, is_event) = match kind {
                    LocationKind::WaveComplete { character, wave } => {
                        (wave_complete_location_name(wave, character), false)
                    }
                    LocationKind::RunComplete { character } => {
                        (run_complete_location_name(character), true)
                    }
                    LocationKind::LootCrate(num) => (crate_drop_location_name(num), false),
                    LocationKind::LegendaryLootCrate(num) => {
                        (legendary_crate_drop_location_name(num), false)
                    }
                };
                let address = (!is_event).then(|| {
                    next_address += 1;
                    next_address - 1
                });
                LocationData {
                    kind,
                    name,
                    address,
                }
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[LocationData] {
        &self.entries
    }

    pub fn by_name(&self, name: &str) -> Result<&LocationData> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| GenerationError::UnknownLocation(name.to_string()))
    }

    pub fn name_to_id(&self) -> BTreeMap<String, u64> {
        self.entries
            .iter()
            .filter_map(|e| e.address.map(|id| (e.name.clone(), id)))
            .collect()
    }

    /// Location groups players can name in their options. Run-won events are
    /// grouped too, even though they have no address.
    pub fn name_groups(&self) -> BTreeMap<String, Vec<String>> {
        let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for entry in &self.entries {
            let group = match entry.kind {
                LocationKind::WaveComplete { .. } => WAVE_COMPLETE_GROUP,
                LocationKind::RunComplete { .. } => RUN_WON_GROUP,
                LocationKind::LootCrate(_) => NORMAL_CRATE_GROUP,
                LocationKind::LegendaryLootCrate(_) => LEGENDARY_CRATE_GROUP,
            };
            groups
                .entry(group.to_string())
                .or_default()
                .push(entry.name.clone());
        }
        groups
    }
}

pub fn location_table() -> Result<&'static LocationTable> {
    static TABLE: OnceLock<LocationTable> = OnceLock::new();
    if let Some(table) = TABLE.get() {
        return Ok(table);
    }
    let table = LocationTable::build(&CharacterCatalog::brotato()?);
    Ok(TABLE.get_or_init(|| table))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_every_location() {
        let table = location_table().unwrap();
        let characters = CharacterCatalog::brotato().unwrap().total_characters() as u32;
        let expected = characters * (NUM_WAVES + 1) + MAX_NORMAL_CRATE_DROPS + MAX_LEGENDARY_CRATE_DROPS;
        assert_eq!(table.entries().len() as u32, expected);
        assert_eq!(table.name_to_id().len() as u32, expected - characters);
    }

    #[test]
    fn addresses_are_contiguous_and_skip_events() {
        let table = location_table().unwrap();
        assert_eq!(
            table.by_name("Wave 1 Completed (Well Rounded)").unwrap().address,
            Some(BASE_ID)
        );
        assert_eq!(
            table.by_name("Wave 20 Completed (Well Rounded)").unwrap().address,
            Some(BASE_ID + 19)
        );
        assert_eq!(table.by_name("Run Won (Mage)").unwrap().address, None);

        let first_crate = table.by_name("Loot Crate 1").unwrap().address.unwrap();
        let characters = CharacterCatalog::brotato().unwrap().total_characters() as u64;
        assert_eq!(first_crate, BASE_ID + characters * u64::from(NUM_WAVES));
        assert_eq!(
            table.by_name("Legendary Loot Crate 1").unwrap().address,
            Some(first_crate + u64::from(MAX_NORMAL_CRATE_DROPS))
        );
    }

    #[test]
    fn out_of_range_names_are_lookup_failures() {
        let table = location_table().unwrap();
        for name in ["Wave 21 Completed (Mage)", "Wave 0 Completed (Mage)", "Loot Crate 51"] {
            assert!(matches!(
                table.by_name(name),
                Err(GenerationError::UnknownLocation(_))
            ));
        }
    }

    #[test]
    fn groups_use_the_published_names() {
        let groups = location_table().unwrap().name_groups();
        let names: Vec<&str> = groups.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            vec![
                "Legendary Crate Drops",
                "Normal Crate Drops",
                "Run Win Specific Character",
                "Wave Complete Specific Character",
            ]
        );
        let characters = CharacterCatalog::brotato().unwrap().total_characters();
        assert_eq!(groups[NORMAL_CRATE_GROUP].len() as u32, MAX_NORMAL_CRATE_DROPS);
        assert_eq!(groups[LEGENDARY_CRATE_GROUP].len() as u32, MAX_LEGENDARY_CRATE_DROPS);
        assert_eq!(groups[WAVE_COMPLETE_GROUP].len(), characters * NUM_WAVES as usize);
        assert_eq!(groups[RUN_WON_GROUP].len(), characters);
        assert!(groups[RUN_WON_GROUP].contains(&"Run Won (Mage)".to_string()));
    }
}
