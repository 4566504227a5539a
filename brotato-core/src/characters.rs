use std::collections::{BTreeSet, HashSet};

use log::{debug, warn};
use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{GenerationError, Result};

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackId {
    BaseGame,
    AbyssalTerrors,
}

/// A group of characters shipped together (base game or a DLC).
#[derive(Debug)]
pub struct CharacterPack {
    pub id: PackId,
    pub name: &'static str,
    /// All characters in the pack, in the game's own order.
    pub characters: &'static [&'static str],
    /// The characters unlocked in a fresh save of the game.
    pub default_characters: &'static [&'static str],
}

impl CharacterPack {
    pub fn contains(&self, character: &str) -> bool {
        self.characters.contains(&character)
    }

    pub fn is_default(&self, character: &str) -> bool {
        self.default_characters.contains(&character)
    }
}

pub const BASE_GAME_CHARACTERS: CharacterPack = CharacterPack {
    id: PackId::BaseGame,
    name: "Base Game",
    characters: &[
        "Well Rounded",
        "Brawler",
        "Crazy",
        "Ranger",
        "Mage",
        "Chunky",
        "Old",
        "Lucky",
        "Mutant",
        "Generalist",
        "Loud",
        "Multitasker",
        "Wildling",
        "Pacifist",
        "Gladiator",
        "Saver",
        "Sick",
        "Farmer",
        "Ghost",
        "Speedy",
        "Entrepreneur",
        "Engineer",
        "Explorer",
        "Doctor",
        "Hunter",
        "Artificer",
        "Arms Dealer",
        "Streamer",
        "Cyborg",
        "Glutton",
        "Jack",
        "Lich",
        "Apprentice",
        "Cryptid",
        "Fisherman",
        "Golem",
        "King",
        "Renegade",
        "One Armed",
        "Bull",
        "Soldier",
        "Masochist",
        "Knight",
        "Demon",
    ],
    default_characters: &["Well Rounded", "Brawler", "Crazy", "Ranger", "Mage"],
};

pub const ABYSSAL_TERRORS_CHARACTERS: CharacterPack = CharacterPack {
    id: PackId::AbyssalTerrors,
    name: "Abyssal Terrors DLC",
    characters: &[
        "Baby",
        "Vagabond",
        "Technomage",
        "Vampire",
        "Sailor",
        "Curious",
        "Builder",
        "Captain",
        "Creature",
        "Chef",
        "Druid",
        "Dwarf",
        "Gangster",
        "Diver",
        "Hiker",
        "Buccaneer",
        "Ogre",
        "Romantic",
    ],
    default_characters: &["Sailor", "Curious", "Builder", "Captain", "Creature"],
};

static BROTATO_PACKS: [CharacterPack; 2] = [BASE_GAME_CHARACTERS, ABYSSAL_TERRORS_CHARACTERS];

/// Read-only registry of every character pack, in declaration order.
#[derive(Debug, Clone, Copy)]
pub struct CharacterCatalog {
    packs: &'static [CharacterPack],
}

impl CharacterCatalog {
    /// Builds a catalog after checking that character names are unique across
    /// all packs and that every default character belongs to its pack.
    pub fn new(packs: &'static [CharacterPack]) -> Result<Self> {
        let mut seen_packs = HashSet::new();
        let mut seen_names = HashSet::new();
        for pack in packs {
            if !seen_packs.insert(pack.id) {
                return Err(GenerationError::Invariant(format!(
                    "pack {:?} is declared more than once",
                    pack.id
                )));
            }
            for &character in pack.characters {
                if !seen_names.insert(character) {
                    return Err(GenerationError::Invariant(format!(
                        "character '{character}' is declared in more than one pack"
                    )));
                }
            }
            if let Some(stray) = pack.default_characters.iter().find(|c| !pack.contains(c)) {
                return Err(GenerationError::Invariant(format!(
                    "default character '{stray}' is not part of pack '{}'",
                    pack.name
                )));
            }
        }
        Ok(Self { packs })
    }

    /// The base game plus every released DLC.
    pub fn brotato() -> Result<Self> {
        Self::new(&BROTATO_PACKS)
    }

    pub fn packs(&self) -> &'static [CharacterPack] {
        self.packs
    }

    pub fn pack(&self, id: PackId) -> Option<&'static CharacterPack> {
        self.packs.iter().find(|p| p.id == id)
    }

    pub fn all_characters(&self) -> impl Iterator<Item = &'static str> {
        self.packs.iter().flat_map(|p| p.characters.iter().copied())
    }

    pub fn total_characters(&self) -> usize {
        self.packs.iter().map(|p| p.characters.len()).sum()
    }

    pub fn pack_of(&self, character: &str) -> Option<&'static CharacterPack> {
        self.packs.iter().find(|p| p.contains(character))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StartingCharacterMode {
    DefaultAll,
    RandomAll,
    DefaultPack(PackId),
    RandomPack(PackId),
}

/// Player choices for one pack. The base game is always enabled, whatever
/// `enabled` says.
#[derive(Debug, Clone, Copy)]
pub struct PackSelection<'a> {
    pub pack: PackId,
    pub enabled: bool,
    pub include: &'a BTreeSet<String>,
}

#[derive(Debug, Clone)]
pub struct CharacterSelection<'a> {
    pub packs: Vec<PackSelection<'a>>,
    pub starting_mode: StartingCharacterMode,
    pub num_starting_characters: usize,
    pub num_include_characters: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCharacters {
    /// Characters with checks this run, in catalog order.
    pub available: Vec<&'static str>,
    /// Characters unlocked from the start, always a subset of `available`.
    pub starting: Vec<&'static str>,
}

fn pack_enabled(selection: &CharacterSelection<'_>, pack: PackId) -> bool {
    pack == PackId::BaseGame
        || selection
            .packs
            .iter()
            .any(|s| s.pack == pack && s.enabled)
}

/// Random subset of `pool` keeping `pool`'s order.
fn sample_in_order<R: Rng + ?Sized>(
    pool: &[&'static str],
    amount: usize,
    rng: &mut R,
) -> Vec<&'static str> {
    let amount = amount.min(pool.len());
    let mut picked = index::sample(rng, pool.len(), amount).into_vec();
    picked.sort_unstable();
    picked.into_iter().map(|i| pool[i]).collect()
}

/// Works out which characters are playable this run and which of those the
/// player starts with.
pub fn resolve_characters<R: Rng + ?Sized>(
    catalog: &CharacterCatalog,
    selection: &CharacterSelection<'_>,
    rng: &mut R,
) -> Result<ResolvedCharacters> {
    let mut included: Vec<&'static str> = Vec::new();
    for pack in catalog.packs() {
        if !pack_enabled(selection, pack.id) {
            continue;
        }
        let Some(choice) = selection.packs.iter().find(|s| s.pack == pack.id) else {
            // No inclusion set given for an enabled pack means every character.
            included.extend(pack.characters.iter().copied());
            continue;
        };
        for name in choice.include.iter().filter(|n| !pack.contains(n)) {
            warn!("ignoring unknown {} character '{name}'", pack.name);
        }
        included.extend(
            pack.characters
                .iter()
                .copied()
                .filter(|c| choice.include.contains(*c)),
        );
    }

    if included.is_empty() {
        return Err(GenerationError::Config(
            "no characters are available: add characters to 'include_base_game_characters' \
             or enable a DLC and include its characters"
                .to_string(),
        ));
    }

    // Starting characters come out of the included set first, so the include
    // limit below can never drop them.
    let limit = selection.num_include_characters.max(1);
    let num_random = selection.num_starting_characters.min(limit);
    let mut starting = match selection.starting_mode {
        StartingCharacterMode::DefaultAll => included
            .iter()
            .copied()
            .filter(|c| catalog.pack_of(c).is_some_and(|p| p.is_default(c)))
            .collect(),
        StartingCharacterMode::RandomAll => sample_in_order(&included, num_random, rng),
        StartingCharacterMode::DefaultPack(id) | StartingCharacterMode::RandomPack(id) => {
            let pack = catalog
                .pack(id)
                .filter(|p| pack_enabled(selection, p.id))
                .ok_or_else(|| {
                    GenerationError::Config(format!(
                        "'starting_characters' uses the {id:?} characters but that pack is not \
                         enabled; enable it or pick a different starting character mode"
                    ))
                })?;
            let scope: Vec<&'static str> = included
                .iter()
                .copied()
                .filter(|c| pack.contains(c))
                .collect();
            if matches!(selection.starting_mode, StartingCharacterMode::DefaultPack(_)) {
                scope.into_iter().filter(|c| pack.is_default(c)).collect()
            } else {
                sample_in_order(&scope, num_random, rng)
            }
        }
    };

    if starting.is_empty() {
        return Err(GenerationError::Config(format!(
            "'starting_characters' ({:?}) selects no characters out of the {} included; \
             include more characters or pick a different starting character mode",
            selection.starting_mode,
            included.len()
        )));
    }
    if starting.len() > limit {
        starting = sample_in_order(&starting, limit, rng);
    }

    let others: Vec<&'static str> = included
        .iter()
        .copied()
        .filter(|c| !starting.contains(c))
        .collect();
    let budget = limit - starting.len();
    let extra = if others.len() > budget {
        sample_in_order(&others, budget, rng)
    } else {
        others
    };
    let available: Vec<&'static str> = included
        .into_iter()
        .filter(|c| starting.contains(c) || extra.contains(c))
        .collect();

    debug!(
        "{} available characters, starting with {:?}",
        available.len(),
        starting
    );

    Ok(ResolvedCharacters {
        available,
        starting,
    })
}
