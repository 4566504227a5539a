use std::collections::BTreeSet;

use brotato_core::characters::ABYSSAL_TERRORS_CHARACTERS;
use brotato_core::constants::{ItemRarity, MENU_REGION_NAME};
use brotato_core::item_weights::ItemWeightMode;
use brotato_core::items::{ItemKind, RUN_COMPLETE_ITEM_NAME};
use brotato_core::options::{ShopLockButtonsMode, StartingCharacters};
use brotato_core::regions::LocationProgressType;
use brotato_core::rules::CollectionState;
use brotato_core::{
    BrotatoOptions, BrotatoWorld, GenerationError, ItemState, MemoryWorld, SlotData,
};

fn generate(options: BrotatoOptions, seed: u64) -> (BrotatoWorld, MemoryWorld, SlotData) {
    let mut host = MemoryWorld::new();
    let mut world = BrotatoWorld::new(1, options, seed).unwrap();
    let slot_data = world.generate(&mut host).expect("generation failed");
    (world, host, slot_data)
}

fn names(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[test]
fn default_options_fill_every_location() {
    let (world, host, slot_data) = generate(BrotatoOptions::default(), 0x7A70);
    let ctx = world.context().unwrap();
    let pool = ctx.item_pool.as_ref().unwrap();

    // 44 characters with waves 10 and 20 plus a win each, 25 + 5 crates.
    assert_eq!(ctx.total_locations, 44 * 3 + 25 + 5);
    assert_eq!(pool.total(), ctx.total_locations);
    assert_eq!(host.location_count(1) as u64, ctx.total_locations);
    assert_eq!(host.item_pool.len() + host.locked.len(), host.location_count(1));
    assert_eq!(host.locked.len(), 44);
    assert!(host.locked.values().all(|i| i.name == RUN_COMPLETE_ITEM_NAME));

    assert_eq!(host.precollected[&1].len(), 5);
    assert_eq!(pool.count(ItemKind::Character("Mage")), 0);
    assert_eq!(pool.count(ItemKind::Character("Demon")), 1);
    assert_eq!(pool.count(ItemKind::ShopSlot), 0);
    assert_eq!(pool.count(ItemKind::ShopLockButton), 0);

    assert_eq!(slot_data.waves_with_checks, vec![10, 20]);
    assert_eq!(slot_data.num_wins_needed, 10);
    assert_eq!(slot_data.wave_per_game_item[&3].len() as u64, pool.count(ItemKind::CrateItem(ItemRarity::Legendary)));
}

#[test]
fn missing_shop_slots_and_lock_buttons_become_items() {
    let options = BrotatoOptions {
        num_starting_shop_slots: 1,
        shop_lock_buttons_mode: ShopLockButtonsMode::Custom,
        num_starting_lock_buttons: 2,
        ..Default::default()
    };
    let (world, _, slot_data) = generate(options, 1);
    let pool = world.context().unwrap().item_pool.as_ref().unwrap();
    assert_eq!(pool.count(ItemKind::ShopSlot), 3);
    assert_eq!(pool.count(ItemKind::ShopLockButton), 2);
    assert_eq!(slot_data.num_starting_shop_slots, 1);
    assert_eq!(slot_data.num_starting_lock_buttons, 2);
}

#[test]
fn legendary_only_weights_give_only_legendaries() {
    let options = BrotatoOptions {
        item_weight_mode: ItemWeightMode::Custom,
        common_item_weight: 0,
        uncommon_item_weight: 0,
        rare_item_weight: 0,
        legendary_item_weight: 100,
        num_common_crate_drops: 50,
        num_legendary_crate_drops: 20,
        waves_per_drop: 1,
        ..Default::default()
    };
    let (world, _, slot_data) = generate(options, 2);
    let pool = world.context().unwrap().item_pool.as_ref().unwrap();
    assert_eq!(pool.count(ItemKind::CrateItem(ItemRarity::Legendary)), 70);
    assert_eq!(pool.count(ItemKind::CrateItem(ItemRarity::Common)), 0);
    assert_eq!(slot_data.wave_per_game_item[&3].len(), 70);
    assert!(slot_data.wave_per_game_item[&0].is_empty());
}

#[test]
fn win_count_is_capped_by_available_characters() {
    let options = BrotatoOptions {
        num_victories: 10,
        include_base_game_characters: names(&["Well Rounded", "Brawler", "Knight"]),
        num_common_crate_drop_groups: 8,
        ..Default::default()
    };
    let (_, host, slot_data) = generate(options, 3);
    assert_eq!(slot_data.num_wins_needed, 3);
    assert_eq!(slot_data.common_crate_drop_groups.len(), 3);
    assert!(slot_data
        .common_crate_drop_groups
        .iter()
        .all(|g| g.wins_to_unlock <= 3));

    let mut state = ItemState::new();
    state.collect(RUN_COMPLETE_ITEM_NAME, 2);
    assert!(!host.is_complete(1, &state));
    state.collect(RUN_COMPLETE_ITEM_NAME, 1);
    assert!(host.is_complete(1, &state));
}

#[test]
fn crate_groups_open_as_runs_are_won() {
    let options = BrotatoOptions {
        num_common_crate_drop_groups: 2,
        ..Default::default()
    };
    let (_, host, slot_data) = generate(options, 4);
    let second = &slot_data.common_crate_drop_groups[1];
    assert_eq!(second.wins_to_unlock, 5);

    let mut state = host.starting_state(1);
    assert!(state.has("Mage", 1));
    assert!(host.can_reach_region(1, MENU_REGION_NAME, &state));
    assert!(host.can_reach_region(1, "In-Game (Mage)", &state));
    assert!(!host.can_reach_region(1, "In-Game (Demon)", &state));
    assert!(host.can_reach_region(1, "Loot Crate Group 1", &state));
    assert!(host.can_reach_region(1, "Legendary Loot Crate Group 1", &state));
    assert!(!host.can_reach_region(1, "Loot Crate Group 2", &state));

    state.collect(RUN_COMPLETE_ITEM_NAME, 5);
    assert!(host.can_reach_region(1, "Loot Crate Group 2", &state));

    let legendary = host.region(1, "Legendary Loot Crate Group 1").unwrap();
    assert!(legendary
        .locations
        .iter()
        .all(|l| l.progress_type == LocationProgressType::Excluded));
}

#[test]
fn overflowing_pool_is_trimmed_to_fit() {
    let options = BrotatoOptions {
        include_base_game_characters: names(&["Well Rounded", "Brawler", "Crazy", "Ranger", "Mage"]),
        waves_per_drop: 20,
        num_common_crate_drops: 10,
        num_legendary_crate_drops: 0,
        num_common_upgrades: 50,
        num_uncommon_upgrades: 50,
        num_rare_upgrades: 50,
        num_legendary_upgrades: 50,
        ..Default::default()
    };
    let (world, host, _) = generate(options, 5);
    let ctx = world.context().unwrap();
    let pool = ctx.item_pool.as_ref().unwrap();
    assert_eq!(ctx.total_locations, 5 * 2 + 10);
    assert_eq!(pool.total(), 20);
    assert_eq!(pool.count(ItemKind::RunComplete), 5);
    assert!(pool.iter().all(|(k, _)| !matches!(k, ItemKind::Gold(_) | ItemKind::Xp(_))));
    assert_eq!(host.item_pool.len(), 15);
}

#[test]
fn too_few_locations_is_a_config_error() {
    let options = BrotatoOptions {
        include_base_game_characters: names(&["Mage"]),
        waves_per_drop: 20,
        num_common_crate_drops: 0,
        num_legendary_crate_drops: 0,
        num_starting_shop_slots: 0,
        ..Default::default()
    };
    let mut host = MemoryWorld::new();
    let err = BrotatoWorld::new(1, options, 6)
        .unwrap()
        .generate(&mut host)
        .unwrap_err();
    assert!(matches!(err, GenerationError::Config(_)), "{err}");
    assert!(host.item_pool.is_empty());
}

#[test]
fn dlc_starting_characters_come_from_the_dlc() {
    let options = BrotatoOptions {
        enable_abyssal_terrors_dlc: true,
        starting_characters: StartingCharacters::RandomAbyssalTerrors,
        num_starting_characters: 3,
        ..Default::default()
    };
    let (world, host, _) = generate(options, 7);
    let starting = &world.context().unwrap().starting_characters;
    assert_eq!(starting.len(), 3);
    assert!(starting
        .iter()
        .all(|c| ABYSSAL_TERRORS_CHARACTERS.characters.contains(c)));
    assert_eq!(host.precollected[&1].len(), 3);
    assert_eq!(host.locked.len(), 62);
}

#[test]
fn dlc_starting_mode_needs_the_dlc() {
    let options = BrotatoOptions {
        starting_characters: StartingCharacters::DefaultAbyssalTerrors,
        ..Default::default()
    };
    let mut host = MemoryWorld::new();
    let err = BrotatoWorld::new(1, options, 8)
        .unwrap()
        .generate(&mut host)
        .unwrap_err();
    assert!(matches!(err, GenerationError::Config(_)));
}

#[test]
fn default_starters_with_include_limit_work_for_any_seed() {
    let options = BrotatoOptions {
        starting_characters: StartingCharacters::DefaultBaseGame,
        num_include_characters: 20,
        ..Default::default()
    };
    for seed in 0..200 {
        let mut host = MemoryWorld::new();
        let mut world = BrotatoWorld::new(1, options.clone(), seed).unwrap();
        if let Err(err) = world.generate(&mut host) {
            panic!("seed {seed}: {err}");
        }
        let ctx = world.context().unwrap();
        assert_eq!(ctx.available_characters.len(), 20, "seed {seed}");
        assert_eq!(
            ctx.starting_characters,
            vec!["Well Rounded", "Brawler", "Crazy", "Ranger", "Mage"],
            "seed {seed}"
        );
        assert!(ctx
            .starting_characters
            .iter()
            .all(|c| ctx.available_characters.contains(c)));
        assert_eq!(host.precollected[&1].len(), 5);
    }
}

#[test]
fn same_seed_same_world() {
    let options = BrotatoOptions {
        item_weight_mode: ItemWeightMode::Chaos,
        starting_characters: StartingCharacters::RandomAll,
        num_include_characters: 20,
        ..Default::default()
    };
    let (first_world, first_host, first) = generate(options.clone(), 99);
    let (second_world, second_host, second) = generate(options, 99);
    assert_eq!(first, second);
    assert_eq!(first_host.item_pool, second_host.item_pool);
    assert_eq!(
        first_world.context().unwrap().available_characters,
        second_world.context().unwrap().available_characters
    );
}
