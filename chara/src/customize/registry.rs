//! The full catalog: one [`CustomizationSet`] per valid clan/gender pair,
//! plus the shared display names that are not tied to a single set.

use super::{
    builder::{build_set, SharedPalettes},
    set::CustomizationSet,
    types::{Clan, Gender},
};
use crate::{error::CharaError, sheets::GameData};

/// Display names for pickers and values that sit outside any one option
/// menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CustomName {
    Clan,
    Gender,
    Reverse,
    OddEyes,
    IrisSmall,
    IrisLarge,
}

const LOBBY_CLAN: u32 = 102;
const LOBBY_GENDER: u32 = 103;
const LOBBY_REVERSE: u32 = 2135;
const LOBBY_ODD_EYES: u32 = 2125;
const LOBBY_IRIS_SMALL: u32 = 1076;
const LOBBY_IRIS_LARGE: u32 = 1075;

#[derive(Debug)]
pub struct NameTable {
    clan: String,
    gender: String,
    reverse: String,
    odd_eyes: String,
    iris_small: String,
    iris_large: String,
    /// `(masculine, feminine)` per clan, indexed by clan value - 1.
    clans: Vec<(String, String)>,
}

impl NameTable {
    fn load(data: &GameData) -> Self {
        let lobby = |row: u32, fallback: &str| {
            data.lobby
                .get(row)
                .map(|r| r.text.clone())
                .unwrap_or_else(|| fallback.to_string())
        };

        let clans = Clan::ALL
            .iter()
            .map(|&clan| match data.tribe.get(clan as u32) {
                Some(tribe) => (tribe.masculine.clone(), tribe.feminine.clone()),
                None => (clan.name().to_string(), clan.name().to_string()),
            })
            .collect();

        Self {
            clan: lobby(LOBBY_CLAN, "Clan"),
            gender: lobby(LOBBY_GENDER, "Gender"),
            reverse: lobby(LOBBY_REVERSE, "Reverse"),
            odd_eyes: lobby(LOBBY_ODD_EYES, "Odd Eyes"),
            iris_small: lobby(LOBBY_IRIS_SMALL, "Small"),
            iris_large: lobby(LOBBY_IRIS_LARGE, "Large"),
            clans,
        }
    }

    pub fn get(&self, name: CustomName) -> &str {
        match name {
            CustomName::Clan => &self.clan,
            CustomName::Gender => &self.gender,
            CustomName::Reverse => &self.reverse,
            CustomName::OddEyes => &self.odd_eyes,
            CustomName::IrisSmall => &self.iris_small,
            CustomName::IrisLarge => &self.iris_large,
        }
    }

    /// Gendered clan name. Unknown inputs fall back to the clan's English
    /// name rather than panicking; this table is for display only.
    pub fn clan_name(&self, clan: Clan, gender: Gender) -> &str {
        match self.clans.get(clan as usize - 1) {
            Some((masculine, feminine)) => {
                if gender == Gender::Female {
                    feminine
                } else {
                    masculine
                }
            }
            None => clan.name(),
        }
    }
}

/// Every customization set, built once from the loaded game data. Lookups
/// after construction are infallible for valid clan/gender pairs.
#[derive(Debug)]
pub struct CustomizeRegistry {
    sets: Vec<CustomizationSet>,
    names: NameTable,
}

impl CustomizeRegistry {
    pub fn new(data: &GameData) -> Result<Self, CharaError> {
        let palettes = SharedPalettes::new(&data.cmp)?;

        let mut sets = Vec::with_capacity(Clan::ALL.len() * Gender::ALL.len());
        for &clan in &Clan::ALL {
            for &gender in &Gender::ALL {
                sets.push(build_set(data, &palettes, clan, gender)?);
            }
        }

        Ok(Self {
            sets,
            names: NameTable::load(data),
        })
    }

    /// The set for one clan/gender pair.
    ///
    /// # Panics
    ///
    /// Panics on `Clan::Unknown` or a gender outside male/female; those are
    /// caller bugs, not data states.
    pub fn get(&self, clan: Clan, gender: Gender) -> &CustomizationSet {
        assert!(
            clan != Clan::Unknown && (gender == Gender::Male || gender == Gender::Female),
            "invalid customization requested for {clan:?} {gender:?}"
        );
        let idx = (clan as usize - 1) * 2 + (gender == Gender::Female) as usize;
        &self.sets[idx]
    }

    pub fn sets(&self) -> &[CustomizationSet] {
        &self.sets
    }

    pub fn names(&self) -> &NameTable {
        &self.names
    }
}
