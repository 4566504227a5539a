use serde::{Deserialize, Serialize};

use crate::constants::{
    character_region_name, crate_drop_group_region_name, crate_drop_location_name,
    legendary_crate_drop_group_region_name, legendary_crate_drop_location_name,
    run_complete_location_name, wave_complete_location_name,
};
use crate::locations::location_table;
use crate::loot_crates::{CrateType, LootCrateGroup};
use crate::rules::AccessRule;
use crate::Result;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationProgressType {
    Default,
    /// Never holds progression items.
    Excluded,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub player: u32,
    pub address: Option<u64>,
    pub progress_type: LocationProgressType,
}

impl Location {
    /// Creates a location using the address from the location table.
    pub fn from_table(name: &str, player: u32) -> Result<Self> {
        let data = location_table()?.by_name(name)?;
        Ok(Self {
            name: data.name.clone(),
            player,
            address: data.address,
            progress_type: LocationProgressType::Default,
        })
    }

    pub fn is_event(&self) -> bool {
        self.address.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entrance {
    pub name: String,
    pub target: String,
    pub rule: AccessRule,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    pub player: u32,
    pub locations: Vec<Location>,
    pub exits: Vec<Entrance>,
}

impl Region {
    pub fn new(name: impl Into<String>, player: u32) -> Self {
        Self {
            name: name.into(),
            player,
            locations: Vec::new(),
            exits: Vec::new(),
        }
    }

    /// Adds an exit to `target`, named after the target unless a name is given.
    pub fn connect(&mut self, target: &Region, name: Option<String>, rule: AccessRule) {
        self.exits.push(Entrance {
            name: name.unwrap_or_else(|| target.name.clone()),
            target: target.name.clone(),
            rule,
        });
    }
}

/// Region holding one character's wave and run-won locations.
///
/// Waves outside 1..=20 have no location and fail the lookup.
pub fn create_character_region(player: u32, character: &str, waves: &[u32]) -> Result<Region> {
    let mut region = Region::new(character_region_name(character), player);
    for wave in waves {
        region.locations.push(Location::from_table(
            &wave_complete_location_name(*wave, character),
            player,
        )?);
    }
    region
        .locations
        .push(Location::from_table(&run_complete_location_name(character), player)?);
    Ok(region)
}

/// One region per group, in group order. Crate locations are numbered with a
/// counter running across all groups, so group `n` starts right after the
/// last crate of group `n - 1`.
pub fn create_loot_crate_group_regions(
    player: u32,
    groups: &[LootCrateGroup],
    crate_type: CrateType,
) -> Result<Vec<Region>> {
    let mut regions = Vec::with_capacity(groups.len());
    let mut crate_count = 0;
    for group in groups {
        let region_name = match crate_type {
            CrateType::Common => crate_drop_group_region_name(group.index),
            CrateType::Legendary => legendary_crate_drop_group_region_name(group.index),
        };
        let mut region = Region::new(region_name, player);
        for _ in 0..group.num_crates {
            crate_count += 1;
            let mut location = match crate_type {
                CrateType::Common => Location::from_table(&crate_drop_location_name(crate_count), player)?,
                CrateType::Legendary => Location::from_table(
                    &legendary_crate_drop_location_name(crate_count),
                    player,
                )?,
            };
            if crate_type == CrateType::Legendary {
                location.progress_type = LocationProgressType::Excluded;
            }
            region.locations.push(location);
        }
        regions.push(region);
    }
    Ok(regions)
}
