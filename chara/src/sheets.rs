//! Typed rows for the sheets the customization engine consumes.
//!
//! Narrow sheets get dedicated row structs deserialized straight from the
//! exd columns. CharaMakeType and HairMakeType are too wide for that, so
//! their rows are parsed from raw [`Row`]s through a statically declared
//! column layout; no runtime name-based dispatch is involved.

use crate::{
    cmp::CmpFile,
    customize::{CustomizeIndex, MenuType},
    error::CharaError,
    excel::{Locale, Row, Sheet, Value},
    pack::Repository,
};
use nohash_hasher::IntMap;
use serde::Deserialize;
use std::sync::Arc;

/// One appearance choice row (faces, hairstyles, tails, face paints, fur
/// patterns all live in this sheet).
#[derive(Debug, Deserialize)]
pub struct CharaMakeCustomize {
    pub id: u32,
    pub feature_id: u8,
    pub icon: u32,
    pub data: u16,
}

#[derive(Debug, Deserialize)]
pub struct Tribe {
    pub id: u32,
    pub masculine: String,
    pub feminine: String,
    pub unk1: i8,
    pub unk2: i8,
}

#[derive(Debug, Deserialize)]
pub struct LobbyText {
    pub id: u32,
    pub text: String,
}

/// Column layout of one CharaMakeType row. Menu attributes are stored
/// struct-of-arrays: all ids, then all initial values, and so on, followed
/// by the per-menu parameter block and the per-face facial feature icons.
pub const MENU_COUNT: usize = 28;
pub const MENU_PARAM_COUNT: usize = 100;
pub const FEATURE_FACES: usize = 8;
pub const FEATURE_SLOTS: usize = 7;

const COL_RACE: usize = 0;
const COL_TRIBE: usize = 1;
const COL_GENDER: usize = 2;
const COL_MENU_ID: usize = 3;
const COL_MENU_INIT: usize = COL_MENU_ID + MENU_COUNT;
const COL_MENU_TYPE: usize = COL_MENU_INIT + MENU_COUNT;
const COL_MENU_SIZE: usize = COL_MENU_TYPE + MENU_COUNT;
const COL_MENU_LOOKAT: usize = COL_MENU_SIZE + MENU_COUNT;
const COL_MENU_MASK: usize = COL_MENU_LOOKAT + MENU_COUNT;
const COL_MENU_TARGET: usize = COL_MENU_MASK + MENU_COUNT;
const COL_MENU_PARAM: usize = COL_MENU_TARGET + MENU_COUNT;
const COL_FEATURE: usize = COL_MENU_PARAM + MENU_COUNT * MENU_PARAM_COUNT;

/// One menu definition within a CharaMakeType row.
#[derive(Debug, Clone)]
pub struct Menu {
    /// Lobby sheet row carrying the menu's localized label.
    pub id: u32,
    pub init: u8,
    pub menu_type: MenuType,
    /// The option this menu configures, when it is one the engine models.
    pub target: Option<CustomizeIndex>,
    pub size: u8,
    pub mask: u32,
    /// For icon selectors: CharaMakeCustomize row ids, one per choice.
    pub values: Vec<u32>,
}

/// One race/gender row of the appearance menu sheet.
#[derive(Debug, Clone)]
pub struct CharaMakeRow {
    pub race: u8,
    pub tribe: u8,
    pub gender: u8,
    pub menus: Vec<Menu>,
    /// Facial feature icons, `[face][slot]`.
    pub feature_icons: Vec<[u32; FEATURE_SLOTS]>,
}

fn col_u32(sheet: &str, id: u32, row: &Row, column: usize) -> Result<u32, CharaError> {
    row.get(column)
        .and_then(Value::as_u32)
        .ok_or_else(|| CharaError::SheetColumn {
            sheet: sheet.into(),
            row: id,
            column,
        })
}

fn col_u8(sheet: &str, id: u32, row: &Row, column: usize) -> Result<u8, CharaError> {
    row.get(column)
        .and_then(Value::as_u8)
        .ok_or_else(|| CharaError::SheetColumn {
            sheet: sheet.into(),
            row: id,
            column,
        })
}

impl CharaMakeRow {
    pub const SHEET: &'static str = "CharaMakeType";

    pub fn parse(id: u32, row: &Row) -> Result<Self, CharaError> {
        let sheet = Self::SHEET;
        let mut menus = Vec::with_capacity(MENU_COUNT);
        for i in 0..MENU_COUNT {
            let menu_type = MenuType::from_u8(col_u8(sheet, id, row, COL_MENU_TYPE + i)?)
                .unwrap_or(MenuType::ListSelector);
            let target = CustomizeIndex::from_u8(
                col_u32(sheet, id, row, COL_MENU_TARGET + i)?.min(u8::MAX as u32) as u8,
            );
            let size = col_u8(sheet, id, row, COL_MENU_SIZE + i)?;
            let values = (0..(size as usize).min(MENU_PARAM_COUNT))
                .map(|j| col_u32(sheet, id, row, COL_MENU_PARAM + i * MENU_PARAM_COUNT + j))
                .collect::<Result<Vec<_>, _>>()?;

            menus.push(Menu {
                id: col_u32(sheet, id, row, COL_MENU_ID + i)?,
                init: col_u8(sheet, id, row, COL_MENU_INIT + i)?,
                menu_type,
                target,
                size,
                mask: col_u32(sheet, id, row, COL_MENU_MASK + i)?,
                values,
            });
        }

        let mut feature_icons = Vec::with_capacity(FEATURE_FACES);
        for face in 0..FEATURE_FACES {
            let mut icons = [0u32; FEATURE_SLOTS];
            for (slot, icon) in icons.iter_mut().enumerate() {
                *icon = col_u32(sheet, id, row, COL_FEATURE + face * FEATURE_SLOTS + slot)?;
            }
            feature_icons.push(icons);
        }

        Ok(Self {
            race: col_u8(sheet, id, row, COL_RACE)?,
            tribe: col_u8(sheet, id, row, COL_TRIBE)?,
            gender: col_u8(sheet, id, row, COL_GENDER)?,
            menus,
            feature_icons,
        })
    }

    pub fn menu(&self, target: CustomizeIndex) -> Option<&Menu> {
        self.menus.iter().find(|m| m.target == Some(target))
    }

    /// Declared choice count of a menu, 0 when the menu does not exist for
    /// this race/gender.
    pub fn menu_size(&self, target: CustomizeIndex) -> usize {
        self.menu(target).map(|m| m.size as usize).unwrap_or(0)
    }

    pub fn feature_icon(&self, face: usize, slot: usize) -> u32 {
        self.feature_icons
            .get(face)
            .and_then(|icons| icons.get(slot))
            .copied()
            .unwrap_or(0)
    }
}

/// Layout of one HairMakeType row: a hairstyle count followed by fixed-width
/// slot blocks; each block starts with the CharaMakeCustomize row id and the
/// face the style is restricted to (0 = any face).
const COL_HAIR_COUNT: usize = 30;
const COL_HAIR_FIRST: usize = 66;
const HAIR_STRIDE: usize = 9;

/// Unused slots carry this sentinel in place of a row id.
const HAIR_SLOT_EMPTY: u32 = u32::MAX;

#[derive(Debug, Clone)]
pub struct HairSlot {
    pub row_id: u32,
    /// 1-based face value this style requires, or 0 for any face.
    pub face: u8,
}

#[derive(Debug, Clone, Default)]
pub struct HairMakeRow {
    pub slots: Vec<HairSlot>,
}

impl HairMakeRow {
    pub const SHEET: &'static str = "HairMakeType";

    pub fn parse(id: u32, row: &Row) -> Result<Self, CharaError> {
        let sheet = Self::SHEET;
        let count = col_u8(sheet, id, row, COL_HAIR_COUNT)? as usize;

        let mut slots = Vec::with_capacity(count);
        for i in 0..count {
            let base = COL_HAIR_FIRST + i * HAIR_STRIDE;
            let row_id = col_u32(sheet, id, row, base)?;
            if row_id == HAIR_SLOT_EMPTY {
                continue;
            }
            slots.push(HairSlot {
                row_id,
                face: col_u8(sheet, id, row, base + 1)?,
            });
        }

        Ok(Self { slots })
    }
}

/// Sheet row id shared by CharaMakeType and HairMakeType for one
/// (clan, gender) pair.
pub fn make_type_row(clan_value: u8, female: bool) -> u32 {
    (clan_value as u32 - 1) * 2 + female as u32
}

/// Everything the catalog builder reads, loaded once at startup.
#[derive(Debug)]
pub struct GameData {
    pub charamake: IntMap<u32, CharaMakeRow>,
    pub hair: IntMap<u32, HairMakeRow>,
    pub customize: Sheet<CharaMakeCustomize>,
    pub lobby: Sheet<LobbyText>,
    pub tribe: Sheet<Tribe>,
    pub cmp: CmpFile,
}

impl GameData {
    pub fn load(repo: &Arc<Repository>, locale: Locale) -> Result<Self, CharaError> {
        let charamake_raw: Sheet<Row> = Sheet::load(repo, CharaMakeRow::SHEET, locale)?;
        let mut charamake = IntMap::default();
        for (id, row) in charamake_raw.iter() {
            charamake.insert(id, CharaMakeRow::parse(id, row)?);
        }

        let hair_raw: Sheet<Row> = Sheet::load(repo, HairMakeRow::SHEET, locale)?;
        let mut hair = IntMap::default();
        for (id, row) in hair_raw.iter() {
            hair.insert(id, HairMakeRow::parse(id, row)?);
        }

        Ok(Self {
            charamake,
            hair,
            customize: Sheet::load(repo, "CharaMakeCustomize", locale)?,
            lobby: Sheet::load(repo, "Lobby", locale)?,
            tribe: Sheet::load(repo, "Tribe", locale)?,
            cmp: CmpFile::load(repo)?,
        })
    }

    pub fn charamake_row(&self, row: u32) -> Result<&CharaMakeRow, CharaError> {
        self.charamake.get(&row).ok_or_else(|| CharaError::SheetRow {
            sheet: CharaMakeRow::SHEET.into(),
            row,
        })
    }

    pub fn hair_row(&self, row: u32) -> Result<&HairMakeRow, CharaError> {
        self.hair.get(&row).ok_or_else(|| CharaError::SheetRow {
            sheet: HairMakeRow::SHEET.into(),
            row,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_row(width: usize) -> Row {
        vec![Value::UInt32(0); width]
    }

    #[test]
    fn charamake_row_parse() {
        let mut raw = blank_row(COL_FEATURE + FEATURE_FACES * FEATURE_SLOTS);
        raw[COL_RACE] = Value::UInt8(1);
        raw[COL_TRIBE] = Value::UInt8(2);
        raw[COL_GENDER] = Value::UInt8(1);

        // Menu 0: an icon selector for faces with two choices.
        raw[COL_MENU_ID] = Value::UInt32(100);
        raw[COL_MENU_TYPE] = Value::UInt8(MenuType::IconSelector as u8);
        raw[COL_MENU_SIZE] = Value::UInt8(2);
        raw[COL_MENU_TARGET] = Value::UInt32(CustomizeIndex::Face as u32);
        raw[COL_MENU_PARAM] = Value::UInt32(1000);
        raw[COL_MENU_PARAM + 1] = Value::UInt32(1001);

        raw[COL_FEATURE + FEATURE_SLOTS + 2] = Value::UInt32(42);

        let row = CharaMakeRow::parse(0, &raw).unwrap();
        assert_eq!(row.tribe, 2);
        let menu = row.menu(CustomizeIndex::Face).unwrap();
        assert_eq!(menu.id, 100);
        assert_eq!(menu.menu_type, MenuType::IconSelector);
        assert_eq!(menu.values, vec![1000, 1001]);
        assert_eq!(row.menu_size(CustomizeIndex::Face), 2);
        assert_eq!(row.menu_size(CustomizeIndex::BustSize), 0);
        assert_eq!(row.feature_icon(1, 2), 42);
        assert_eq!(row.feature_icon(20, 2), 0);
    }

    #[test]
    fn charamake_row_too_narrow() {
        let raw = blank_row(10);
        assert!(matches!(
            CharaMakeRow::parse(7, &raw),
            Err(CharaError::SheetColumn { row: 7, .. })
        ));
    }

    #[test]
    fn hair_row_parse_skips_empty_slots() {
        let mut raw = blank_row(COL_HAIR_FIRST + 3 * HAIR_STRIDE);
        raw[COL_HAIR_COUNT] = Value::UInt8(3);
        raw[COL_HAIR_FIRST] = Value::UInt32(2000);
        raw[COL_HAIR_FIRST + 1] = Value::UInt8(0);
        raw[COL_HAIR_FIRST + HAIR_STRIDE] = Value::UInt32(HAIR_SLOT_EMPTY);
        raw[COL_HAIR_FIRST + 2 * HAIR_STRIDE] = Value::UInt32(2002);
        raw[COL_HAIR_FIRST + 2 * HAIR_STRIDE + 1] = Value::UInt8(2);

        let row = HairMakeRow::parse(0, &raw).unwrap();
        assert_eq!(row.slots.len(), 2);
        assert_eq!(row.slots[0].row_id, 2000);
        assert_eq!(row.slots[1].row_id, 2002);
        assert_eq!(row.slots[1].face, 2);
    }

    #[test]
    fn make_type_rows_are_contiguous() {
        assert_eq!(make_type_row(1, false), 0);
        assert_eq!(make_type_row(1, true), 1);
        assert_eq!(make_type_row(16, true), 31);
    }
}
