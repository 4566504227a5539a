use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::items::item_table;
use crate::locations::{location_table, RUN_WON_GROUP};
use crate::Result;

pub const GAME_NAME: &str = "Brotato";

/// Names, ids and groups the host shares with every client.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GameData {
    pub item_name_groups: BTreeMap<String, Vec<String>>,
    pub item_name_to_id: BTreeMap<String, u64>,
    pub location_name_groups: BTreeMap<String, Vec<String>>,
    pub location_name_to_id: BTreeMap<String, u64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DataPackage {
    pub games: BTreeMap<String, GameData>,
}

pub fn game_data() -> Result<GameData> {
    let items = item_table()?;
    let locations = location_table()?;
    Ok(GameData {
        item_name_groups: items.name_groups(),
        item_name_to_id: items.name_to_id(),
        location_name_groups: locations.name_groups(),
        location_name_to_id: locations.name_to_id(),
    })
}

pub fn data_package() -> Result<DataPackage> {
    Ok(DataPackage {
        games: BTreeMap::from([(GAME_NAME.to_string(), game_data()?)]),
    })
}
