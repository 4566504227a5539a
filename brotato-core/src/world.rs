use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::characters::{
    resolve_characters, CharacterCatalog, CharacterSelection, PackId, PackSelection,
};
use crate::constants::{
    run_complete_location_name, start_game_entrance_name, ItemRarity, RarityWeights,
    MAX_SHOP_SLOTS, MENU_REGION_NAME,
};
use crate::host::MultiWorld;
use crate::item_weights::{
    create_filler_items, create_items_for_loot_crate_locations, rarity_weights, CrateItemCounts,
};
use crate::items::{item_table, ItemKind, RUN_COMPLETE_ITEM_NAME};
use crate::loot_crates::{build_loot_crate_groups, CrateType, LootCrateGroup};
use crate::options::BrotatoOptions;
use crate::pool::{reconcile, ItemPool};
use crate::regions::{create_character_region, create_loot_crate_group_regions, Region};
use crate::rules::AccessRule;
use crate::slot_data::SlotData;
use crate::waves::{wave_per_game_item, waves_with_checks};
use crate::{GenerationError, Result};

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Phase {
    New,
    Early,
    Regions,
    Items,
    Rules,
}

impl Phase {
    fn name(self) -> &'static str {
        match self {
            Phase::New => "new",
            Phase::Early => "generate_early",
            Phase::Regions => "create_regions",
            Phase::Items => "create_items",
            Phase::Rules => "set_rules",
        }
    }
}

/// Per-player state for one generation run, filled in phase by phase.
#[derive(Clone, Debug)]
pub struct GenerationContext {
    pub available_characters: Vec<&'static str>,
    pub starting_characters: Vec<&'static str>,
    /// `num_victories`, capped at the number of available characters.
    pub num_wins_needed: u32,
    pub waves_with_checks: Vec<u32>,
    pub common_crate_groups: Vec<LootCrateGroup>,
    pub legendary_crate_groups: Vec<LootCrateGroup>,
    pub item_weights: RarityWeights,
    pub num_starting_lock_buttons: u32,
    pub total_locations: u64,
    pub crate_items: Option<CrateItemCounts>,
    pub item_pool: Option<ItemPool>,
}

pub struct BrotatoWorld {
    player: u32,
    options: BrotatoOptions,
    catalog: CharacterCatalog,
    rng: StdRng,
    phase: Phase,
    context: Option<GenerationContext>,
}

impl BrotatoWorld {
    /// A world over the built-in character catalog, which is checked here.
    pub fn new(player: u32, options: BrotatoOptions, seed: u64) -> Result<Self> {
        let catalog = CharacterCatalog::brotato()?;
        Ok(Self::with_catalog(player, options, seed, catalog))
    }

    pub fn with_catalog(
        player: u32,
        options: BrotatoOptions,
        seed: u64,
        catalog: CharacterCatalog,
    ) -> Self {
        Self {
            player,
            options,
            catalog,
            rng: StdRng::seed_from_u64(seed),
            phase: Phase::New,
            context: None,
        }
    }

    pub fn player(&self) -> u32 {
        self.player
    }

    pub fn options(&self) -> &BrotatoOptions {
        &self.options
    }

    pub fn context(&self) -> Option<&GenerationContext> {
        self.context.as_ref()
    }

    fn expect_phase(&self, phase: Phase, previous: Phase) -> Result<()> {
        if self.phase != previous {
            return Err(GenerationError::Lifecycle {
                phase: phase.name(),
                required: previous.name(),
            });
        }
        Ok(())
    }

    fn context_for(&self, phase: Phase) -> Result<&GenerationContext> {
        self.context.as_ref().ok_or(GenerationError::Lifecycle {
            phase: phase.name(),
            required: Phase::Early.name(),
        })
    }

    /// Resolves characters, lays out the crate groups and hands out the
    /// starting characters.
    pub fn generate_early(&mut self, world: &mut dyn MultiWorld) -> Result<()> {
        self.expect_phase(Phase::Early, Phase::New)?;
        self.options.validate()?;
        let options = &self.options;

        let selection = CharacterSelection {
            packs: vec![
                PackSelection {
                    pack: PackId::BaseGame,
                    enabled: true,
                    include: &options.include_base_game_characters,
                },
                PackSelection {
                    pack: PackId::AbyssalTerrors,
                    enabled: options.enable_abyssal_terrors_dlc,
                    include: &options.include_abyssal_terrors_characters,
                },
            ],
            starting_mode: options.starting_characters.into(),
            num_starting_characters: options.num_starting_characters as usize,
            num_include_characters: options.num_include_characters as usize,
        };
        let resolved = resolve_characters(&self.catalog, &selection, &mut self.rng)?;

        let num_available = resolved.available.len() as u32;
        let num_wins_needed = options.num_victories.min(num_available);
        if num_wins_needed < options.num_victories {
            warn!(
                "player {}: 'num_victories' is {} but only {num_available} characters are available, \
                 lowering it to {num_wins_needed}",
                self.player, options.num_victories
            );
        }

        let common_crate_groups = build_loot_crate_groups(
            options.num_common_crate_drops,
            options.num_common_crate_drop_groups,
            num_wins_needed,
        );
        let legendary_crate_groups = build_loot_crate_groups(
            options.num_legendary_crate_drops,
            options.num_legendary_crate_drop_groups,
            num_wins_needed,
        );
        let item_weights = rarity_weights(
            options.item_weight_mode,
            options.custom_item_weights(),
            &mut self.rng,
        );
        debug!("player {}: item weights {item_weights:?}", self.player);

        for &character in &resolved.starting {
            let item = item_table()?.create_item(ItemKind::Character(character), self.player)?;
            world.push_precollected(item);
        }

        info!(
            "player {}: {} characters ({} starting), {num_wins_needed} wins needed",
            self.player,
            resolved.available.len(),
            resolved.starting.len()
        );

        self.context = Some(GenerationContext {
            available_characters: resolved.available,
            starting_characters: resolved.starting,
            num_wins_needed,
            waves_with_checks: waves_with_checks(options.waves_per_drop),
            common_crate_groups,
            legendary_crate_groups,
            item_weights,
            num_starting_lock_buttons: options.num_starting_lock_buttons(),
            total_locations: 0,
            crate_items: None,
            item_pool: None,
        });
        self.phase = Phase::Early;
        Ok(())
    }

    /// Builds the menu, one region per character and one per crate group, and
    /// locks a run-won event onto every character's last location.
    pub fn create_regions(&mut self, world: &mut dyn MultiWorld) -> Result<()> {
        self.expect_phase(Phase::Regions, Phase::Early)?;
        let player = self.player;
        let ctx = self.context_for(Phase::Regions)?;

        let mut menu = Region::new(MENU_REGION_NAME, player);
        let mut regions = Vec::new();
        for &character in &ctx.available_characters {
            let region = create_character_region(player, character, &ctx.waves_with_checks)?;
            menu.connect(
                &region,
                Some(start_game_entrance_name(character)),
                AccessRule::has(character, 1),
            );
            regions.push(region);
        }

        let crate_pools = [
            (&ctx.common_crate_groups, CrateType::Common),
            (&ctx.legendary_crate_groups, CrateType::Legendary),
        ];
        for (groups, crate_type) in crate_pools {
            let group_regions = create_loot_crate_group_regions(player, groups, crate_type)?;
            for (region, group) in group_regions.into_iter().zip(groups.iter()) {
                menu.connect(
                    &region,
                    None,
                    AccessRule::has(RUN_COMPLETE_ITEM_NAME, group.wins_to_unlock),
                );
                regions.push(region);
            }
        }

        let num_regions = regions.len() + 1;
        world.add_region(menu)?;
        for region in regions {
            world.add_region(region)?;
        }
        for &character in &ctx.available_characters {
            let item = item_table()?.create_item(ItemKind::RunComplete, player)?;
            world.place_locked_item(player, &run_complete_location_name(character), item)?;
        }

        info!("player {player}: created {num_regions} regions");
        self.phase = Phase::Regions;
        Ok(())
    }

    /// Sizes the item pool to the location count and hands it to the host.
    pub fn create_items(&mut self, world: &mut dyn MultiWorld) -> Result<()> {
        self.expect_phase(Phase::Items, Phase::Regions)?;
        let player = self.player;
        let options = &self.options;
        let ctx = self.context.as_ref().ok_or(GenerationError::Lifecycle {
            phase: Phase::Items.name(),
            required: Phase::Early.name(),
        })?;

        let num_available = ctx.available_characters.len() as u64;
        let num_common_crates = u64::from(options.num_common_crate_drops);
        let num_legendary_crates = u64::from(options.num_legendary_crate_drops);
        let total_locations = num_available * (ctx.waves_with_checks.len() as u64 + 1)
            + num_common_crates
            + num_legendary_crates;

        let mut essential = vec![(ItemKind::RunComplete, num_available)];
        essential.extend(
            ctx.available_characters
                .iter()
                .copied()
                .filter(|c| !ctx.starting_characters.contains(c))
                .map(|c| (ItemKind::Character(c), 1)),
        );
        essential.push((
            ItemKind::ShopSlot,
            u64::from(MAX_SHOP_SLOTS.saturating_sub(options.num_starting_shop_slots)),
        ));
        essential.push((
            ItemKind::ShopLockButton,
            u64::from(MAX_SHOP_SLOTS.saturating_sub(ctx.num_starting_lock_buttons)),
        ));

        let crate_items = create_items_for_loot_crate_locations(
            num_common_crates,
            num_legendary_crates,
            ctx.item_weights,
            &mut self.rng,
        )?;
        let claimed =
            essential.iter().map(|(_, n)| n).sum::<u64>() + crate_items.guaranteed_legendary;

        let upgrades = [
            (ItemRarity::Common, options.num_common_upgrades),
            (ItemRarity::Uncommon, options.num_uncommon_upgrades),
            (ItemRarity::Rare, options.num_rare_upgrades),
            (ItemRarity::Legendary, options.num_legendary_upgrades),
        ];
        let mut candidates: Vec<(ItemKind, u64)> = crate_items
            .sampled
            .iter()
            .map(|(rarity, n)| (ItemKind::CrateItem(*rarity), *n))
            .collect();
        candidates.extend(
            upgrades
                .iter()
                .map(|(rarity, n)| (ItemKind::Upgrade(*rarity), u64::from(*n))),
        );

        let reconciled = reconcile(total_locations, claimed, &candidates, &mut self.rng)?;
        let filler = create_filler_items(
            reconciled.filler_count,
            options.gold_weight,
            options.xp_weight,
            &mut self.rng,
        )?;

        let mut pool = ItemPool::new();
        for (kind, count) in essential
            .iter()
            .chain(&reconciled.non_essential)
            .chain(&filler)
        {
            pool.add(*kind, *count);
        }
        pool.add(
            ItemKind::CrateItem(ItemRarity::Legendary),
            crate_items.guaranteed_legendary,
        );
        if pool.total() != total_locations {
            return Err(GenerationError::Invariant(format!(
                "item pool holds {} items for {total_locations} locations",
                pool.total()
            )));
        }

        let final_crate_items = CrateItemCounts {
            sampled: ItemRarity::ALL
                .iter()
                .map(|r| {
                    let kept = reconciled
                        .non_essential
                        .iter()
                        .find(|(k, _)| *k == ItemKind::CrateItem(*r))
                        .map_or(0, |(_, n)| *n);
                    (*r, kept)
                })
                .collect(),
            guaranteed_legendary: crate_items.guaranteed_legendary,
        };

        // Run-won events are already locked onto their locations.
        let items = pool.create_items(item_table()?, player, |k| k == ItemKind::RunComplete)?;
        info!(
            "player {player}: {} items for {total_locations} locations, {} filler",
            items.len(),
            reconciled.filler_count
        );
        world.extend_item_pool(items);

        if let Some(ctx) = self.context.as_mut() {
            ctx.total_locations = total_locations;
            ctx.crate_items = Some(final_crate_items);
            ctx.item_pool = Some(pool);
        }
        self.phase = Phase::Items;
        Ok(())
    }

    /// The goal: win `num_wins_needed` runs.
    pub fn set_rules(&mut self, world: &mut dyn MultiWorld) -> Result<()> {
        self.expect_phase(Phase::Rules, Phase::Items)?;
        let ctx = self.context_for(Phase::Rules)?;
        world.set_completion_condition(
            self.player,
            AccessRule::has(RUN_COMPLETE_ITEM_NAME, ctx.num_wins_needed),
        );
        self.phase = Phase::Rules;
        Ok(())
    }

    pub fn fill_slot_data(&self) -> Result<SlotData> {
        let lifecycle_error = GenerationError::Lifecycle {
            phase: "fill_slot_data",
            required: Phase::Items.name(),
        };
        if self.phase < Phase::Items {
            return Err(lifecycle_error);
        }
        let ctx = self.context_for(Phase::Items)?;
        let crate_items = ctx.crate_items.as_ref().ok_or(lifecycle_error)?;
        let options = &self.options;

        Ok(SlotData {
            waves_with_checks: ctx.waves_with_checks.clone(),
            num_wins_needed: ctx.num_wins_needed,
            num_starting_shop_slots: options.num_starting_shop_slots,
            num_starting_lock_buttons: ctx.num_starting_lock_buttons,
            num_common_crate_locations: options.num_common_crate_drops,
            num_common_crate_drops_per_check: options.num_common_crate_drops_per_check,
            common_crate_drop_groups: ctx.common_crate_groups.clone(),
            num_legendary_crate_locations: options.num_legendary_crate_drops,
            num_legendary_crate_drops_per_check: options.num_legendary_crate_drops_per_check,
            legendary_crate_drop_groups: ctx.legendary_crate_groups.clone(),
            wave_per_game_item: wave_per_game_item(crate_items),
            gold_reward_mode: options.gold_reward_mode as u8,
            xp_reward_mode: options.xp_reward_mode as u8,
            enable_enemy_xp: options.enable_enemy_xp,
            spawn_normal_loot_crates: options.spawn_normal_loot_crates,
        })
    }

    /// Runs every phase in order.
    pub fn generate(&mut self, world: &mut dyn MultiWorld) -> Result<SlotData> {
        self.generate_early(world)?;
        self.create_regions(world)?;
        self.create_items(world)?;
        self.set_rules(world)?;
        self.fill_slot_data()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryWorld;

    #[test]
    fn phases_must_run_in_order() {
        let mut host = MemoryWorld::new();
        let mut world = BrotatoWorld::new(1, BrotatoOptions::default(), 1).unwrap();
        assert!(matches!(
            world.create_regions(&mut host),
            Err(GenerationError::Lifecycle { phase: "create_regions", required: "generate_early" })
        ));
        assert!(world.fill_slot_data().is_err());
        world.generate_early(&mut host).unwrap();
        assert!(world.generate_early(&mut host).is_err());
        assert!(world.create_items(&mut host).is_err());
        world.create_regions(&mut host).unwrap();
        world.create_items(&mut host).unwrap();
        assert!(world.fill_slot_data().is_ok());
        world.set_rules(&mut host).unwrap();
    }

    #[test]
    fn starting_characters_are_precollected() {
        let mut host = MemoryWorld::new();
        let mut world = BrotatoWorld::new(3, BrotatoOptions::default(), 1).unwrap();
        world.generate_early(&mut host).unwrap();
        let names: Vec<&str> = host.precollected[&3].iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Well Rounded", "Brawler", "Crazy", "Ranger", "Mage"]);
    }

    #[test]
    fn crate_group_exits_carry_win_thresholds() {
        let options = BrotatoOptions {
            num_common_crate_drop_groups: 5,
            ..Default::default()
        };
        let mut host = MemoryWorld::new();
        let mut world = BrotatoWorld::new(1, options, 2).unwrap();
        world.generate_early(&mut host).unwrap();
        world.create_regions(&mut host).unwrap();
        let menu = host.region(1, MENU_REGION_NAME).unwrap();
        let thresholds: Vec<AccessRule> = menu
            .exits
            .iter()
            .filter(|e| e.name.starts_with("Loot Crate Group"))
            .map(|e| e.rule.clone())
            .collect();
        assert_eq!(
            thresholds,
            vec![
                AccessRule::Always,
                AccessRule::has("Run Won", 2),
                AccessRule::has("Run Won", 4),
                AccessRule::has("Run Won", 6),
                AccessRule::has("Run Won", 8),
            ]
        );
        assert_eq!(host.locked.len(), 44);
    }
}
