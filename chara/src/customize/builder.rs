//! Catalog construction: turns the loaded game data into one
//! [`CustomizationSet`] per clan/gender combination.

use super::{
    set::CustomizationSet,
    types::{Clan, CustomizeData, CustomizeIndex, CustomizeValue, Gender, MenuType, Race},
};
use crate::{
    cmp::{range, CmpFile},
    error::CharaError,
    sheets::{make_type_row, CharaMakeRow, GameData, FEATURE_SLOTS},
};

/// Icon shown for the legacy tattoo bit. A fixed resource id; the game data
/// carries no row for it.
const LEGACY_TATTOO_ICON: u32 = 137905;

/// Lobby text rows used outside the menu id indirection.
const LOBBY_HIGHLIGHTS: u32 = 237;
const LOBBY_FACIAL_FEATURES: u32 = 1741;
const LOBBY_TATTOOS: u32 = 1742;

/// Skin and hair color offsets into the shared palette, keyed by clan and
/// gender. Most pairs are asymmetric between genders; zero marks a
/// combination that has no data in the game (Hrothgar are male-only,
/// Viera female-only as of this table's patch level).
fn skin_hair_offsets(clan: Clan, gender: Gender) -> (usize, usize) {
    let male = gender == Gender::Male;
    match clan {
        Clan::Midlander => {
            if male {
                (0x1200, 0x1300)
            } else {
                (0x0D00, 0x0E00)
            }
        }
        Clan::Highlander => {
            if male {
                (0x1C00, 0x1D00)
            } else {
                (0x1700, 0x1800)
            }
        }
        Clan::Wildwood => {
            if male {
                (0x2600, 0x2700)
            } else {
                (0x2100, 0x2200)
            }
        }
        Clan::Duskwight => {
            if male {
                (0x3000, 0x3100)
            } else {
                (0x2B00, 0x2C00)
            }
        }
        Clan::Plainsfolk => {
            if male {
                (0x3A00, 0x3B00)
            } else {
                (0x3500, 0x3600)
            }
        }
        Clan::Dunesfolk => {
            if male {
                (0x4400, 0x4500)
            } else {
                (0x3F00, 0x4000)
            }
        }
        Clan::SeekerOfTheSun => {
            if male {
                (0x4E00, 0x4F00)
            } else {
                (0x4900, 0x4A00)
            }
        }
        Clan::KeeperOfTheMoon => {
            if male {
                (0x5800, 0x5900)
            } else {
                (0x5300, 0x5400)
            }
        }
        Clan::Seawolf => {
            if male {
                (0x6200, 0x6300)
            } else {
                (0x5D00, 0x5E00)
            }
        }
        Clan::Hellsguard => {
            if male {
                (0x6C00, 0x6D00)
            } else {
                (0x6700, 0x6800)
            }
        }
        Clan::Raen => {
            if male {
                (0x7100, 0x7700)
            } else {
                (0x7600, 0x7200)
            }
        }
        Clan::Xaela => {
            if male {
                (0x7B00, 0x8100)
            } else {
                (0x8000, 0x7C00)
            }
        }
        Clan::Helion => {
            if male {
                (0x8500, 0x8600)
            } else {
                (0, 0)
            }
        }
        Clan::Lost => {
            if male {
                (0x8C00, 0x8F00)
            } else {
                (0, 0)
            }
        }
        Clan::Rava => {
            if male {
                (0, 0)
            } else {
                (0x9E00, 0x9F00)
            }
        }
        Clan::Veena => {
            if male {
                (0, 0)
            } else {
                (0xA800, 0xA900)
            }
        }
        Clan::Unknown => (0, 0),
    }
}

/// Palette slices shared by every set; extracted once per registry build.
pub(super) struct SharedPalettes {
    eye: Vec<CustomizeData>,
    highlight: Vec<CustomizeData>,
    tattoo: Vec<CustomizeData>,
    lip_dark: Vec<CustomizeData>,
    lip_light: Vec<CustomizeData>,
    face_paint_dark: Vec<CustomizeData>,
    face_paint_light: Vec<CustomizeData>,
}

impl SharedPalettes {
    pub(super) fn new(cmp: &CmpFile) -> Result<Self, CharaError> {
        use CustomizeIndex::*;
        Ok(Self {
            eye: cmp.color_picker(EyeColorLeft, range::EYE.0, range::EYE.1, false)?,
            highlight: cmp.color_picker(
                HighlightsColor,
                range::HIGHLIGHT.0,
                range::HIGHLIGHT.1,
                false,
            )?,
            tattoo: cmp.color_picker(TattooColor, range::TATTOO.0, range::TATTOO.1, false)?,
            lip_dark: cmp.color_picker(LipColor, range::LIP_DARK.0, range::LIP_DARK.1, false)?,
            lip_light: cmp.color_picker(LipColor, range::LIP_LIGHT.0, range::LIP_LIGHT.1, true)?,
            face_paint_dark: cmp.color_picker(
                FacePaintColor,
                range::FACE_PAINT_DARK.0,
                range::FACE_PAINT_DARK.1,
                false,
            )?,
            face_paint_light: cmp.color_picker(
                FacePaintColor,
                range::FACE_PAINT_LIGHT.0,
                range::FACE_PAINT_LIGHT.1,
                true,
            )?,
        })
    }
}

/// Builds one display record from a CharaMakeCustomize row id; a missing
/// row degrades to a synthetic entry keeping the slot position.
fn from_value_and_index(
    data: &GameData,
    index: CustomizeIndex,
    value: u32,
    i: usize,
) -> CustomizeData {
    match data.customize.get(value) {
        Some(row) => CustomizeData::new(
            index,
            CustomizeValue(row.feature_id),
            row.icon,
            row.id as u16,
        ),
        None => CustomizeData::new(index, CustomizeValue(i as u8 + 1), value, 0),
    }
}

fn menu_entries(
    data: &GameData,
    row: &CharaMakeRow,
    index: CustomizeIndex,
) -> Vec<CustomizeData> {
    row.menu(index)
        .map(|menu| {
            menu.values
                .iter()
                .enumerate()
                .map(|(i, &value)| from_value_and_index(data, index, value, i))
                .collect()
        })
        .unwrap_or_default()
}

fn hairstyles_from_sheet(
    data: &GameData,
    clan: Clan,
    gender: Gender,
) -> Result<Vec<(CustomizeData, u8)>, CharaError> {
    let row = data.hair_row(make_type_row(clan as u8, gender == Gender::Female))?;
    Ok(row
        .slots
        .iter()
        .enumerate()
        .map(|(i, slot)| {
            (
                from_value_and_index(data, CustomizeIndex::Hairstyle, slot.row_id, i),
                slot.face,
            )
        })
        .collect())
}

fn lobby_text<'a>(data: &'a GameData, row: u32, fallback: &'a str) -> &'a str {
    data.lobby.get(row).map(|r| r.text.as_str()).unwrap_or(fallback)
}

fn option_names(data: &GameData, row: &CharaMakeRow) -> Vec<String> {
    use CustomizeIndex::*;

    let features = format!(
        "{} & {}",
        lobby_text(data, LOBBY_FACIAL_FEATURES, "Facial Features"),
        lobby_text(data, LOBBY_TATTOOS, "Tattoos"),
    );

    CustomizeIndex::ALL
        .iter()
        .map(|&index| match index {
            FacialFeature1 | FacialFeature2 | FacialFeature3 | FacialFeature4
            | FacialFeature5 | FacialFeature6 | FacialFeature7 | LegacyTattoo => features.clone(),
            // Highlights has no menu of its own; its label sits at a fixed
            // lobby row.
            Highlights => lobby_text(data, LOBBY_HIGHLIGHTS, "Highlights").to_string(),
            _ => match row.menu(index) {
                Some(menu) => {
                    lobby_text(data, menu.id, index.default_name()).to_string()
                }
                None => index.default_name().to_string(),
            },
        })
        .collect()
}

fn option_types(row: &CharaMakeRow) -> Vec<MenuType> {
    use CustomizeIndex::*;

    CustomizeIndex::ALL
        .iter()
        .map(|&index| match index {
            // Most races take hairstyles from their own sheet, not a menu;
            // the list still resolves like any other icon selector.
            Hairstyle => MenuType::IconSelector,
            // These carry no menu entry; their widget kind is fixed.
            HighlightsColor | EyeColorLeft => MenuType::ColorPicker,
            Highlights | SmallIris | Lipstick | FacePaintReversed => MenuType::Checkmark,
            FacialFeature1 | FacialFeature2 | FacialFeature3 | FacialFeature4
            | FacialFeature5 | FacialFeature6 | FacialFeature7 | LegacyTattoo => {
                MenuType::IconCheckmark
            }
            _ => row
                .menu(index)
                .map(|m| m.menu_type)
                .unwrap_or(MenuType::ListSelector),
        })
        .collect()
}

/// Facial feature table: per face value, seven `(off, on)` pairs whose "on"
/// value is the feature's bit. Index 0 duplicates the first face as the
/// fallback row.
fn facial_features(
    row: &CharaMakeRow,
    count: usize,
) -> Vec<[(CustomizeData, CustomizeData); FEATURE_SLOTS]> {
    use CustomizeIndex::*;

    const SLOT_INDEX: [CustomizeIndex; FEATURE_SLOTS] = [
        FacialFeature1,
        FacialFeature2,
        FacialFeature3,
        FacialFeature4,
        FacialFeature5,
        FacialFeature6,
        FacialFeature7,
    ];

    if count == 0 {
        return Vec::new();
    }

    let row_for = |face: usize| {
        let mut pairs = [(CustomizeData::new(FacialFeature1, CustomizeValue::ZERO, 0, 0),
            CustomizeData::new(FacialFeature1, CustomizeValue::ZERO, 0, 0)); FEATURE_SLOTS];
        for (slot, pair) in pairs.iter_mut().enumerate() {
            let icon = row.feature_icon(face, slot);
            let index = SLOT_INDEX[slot];
            let display = (face * 8 + slot) as u16;
            *pair = (
                CustomizeData::new(index, CustomizeValue::ZERO, icon, display),
                CustomizeData::new(index, CustomizeValue(1 << slot), icon, display),
            );
        }
        pairs
    };

    let mut table = Vec::with_capacity(count + 1);
    table.push(row_for(0));
    for face in 0..count {
        table.push(row_for(face));
    }
    table
}

pub(super) fn build_set(
    data: &GameData,
    palettes: &SharedPalettes,
    clan: Clan,
    gender: Gender,
) -> Result<CustomizationSet, CharaError> {
    // A glob here would shadow the Race/Gender/Clan types with the
    // like-named variants.
    use CustomizeIndex::{
        BustSize, Eyebrows, EyeColorLeft, EyeColorRight, EyeShape, Face, FacePaint,
        FacePaintColor, FacePaintReversed, FacialFeature1, FacialFeature2, FacialFeature3,
        FacialFeature4, FacialFeature5, FacialFeature6, FacialFeature7, HairColor, Hairstyle,
        Height, Highlights, HighlightsColor, Jaw, LegacyTattoo, LipColor, Lipstick, Mouth,
        MuscleMass, Nose, SkinColor, SmallIris, TailShape, TattooColor,
    };

    let row = data.charamake_row(make_type_row(clan as u8, gender == Gender::Female))?;
    let race = clan.race();
    let hrothgar = race == Race::Hrothgar;

    let mut set = CustomizationSet::new(clan, gender);

    set.faces = menu_entries(data, row, Face);

    // Hrothgar repurpose two menu slots: the hairstyle menu enumerates
    // face variants and the lip color menu enumerates fur patterns, with
    // no light lip range at all. This is an identity swap specific to the
    // race, not a general parameter.
    let hair_with_faces = if hrothgar {
        menu_entries(data, row, Hairstyle)
            .into_iter()
            .map(|d| (d, 0u8))
            .collect()
    } else {
        hairstyles_from_sheet(data, clan, gender)?
    };
    set.hairstyles = hair_with_faces.iter().map(|(d, _)| *d).collect();

    let mut hair_by_face = Vec::with_capacity(set.faces.len() + 1);
    hair_by_face.push(set.hairstyles.clone());
    for face in 1..=set.faces.len() as u8 {
        hair_by_face.push(
            hair_with_faces
                .iter()
                .filter(|(_, f)| *f == 0 || *f == face)
                .map(|(d, _)| *d)
                .collect(),
        );
    }
    set.hair_by_face = hair_by_face;

    let (skin_offset, hair_offset) = skin_hair_offsets(clan, gender);
    // Zero offsets mark clan/gender combinations that do not exist in the
    // game data; they keep their (unusable) set rather than aliasing the
    // palette's first range.
    if skin_offset != 0 {
        set.skin_colors =
            data.cmp
                .color_picker(SkinColor, skin_offset, range::SKIN_HAIR_COUNT, false)?;
    }
    if hair_offset != 0 {
        set.hair_colors =
            data.cmp
                .color_picker(HairColor, hair_offset, range::SKIN_HAIR_COUNT, false)?;
    }

    set.eye_colors = palettes.eye.clone();
    set.highlight_colors = palettes.highlight.clone();
    set.tattoo_colors = palettes.tattoo.clone();
    if hrothgar {
        set.lip_colors_dark = menu_entries(data, row, LipColor);
        set.lip_colors_light = Vec::new();
    } else {
        set.lip_colors_dark = palettes.lip_dark.clone();
        set.lip_colors_light = palettes.lip_light.clone();
    }
    set.face_paint_colors_dark = palettes.face_paint_dark.clone();
    set.face_paint_colors_light = palettes.face_paint_light.clone();

    set.tail_ear_shapes = menu_entries(data, row, TailShape);
    set.face_paints = menu_entries(data, row, FacePaint);

    set.num_eyebrows = row.menu_size(Eyebrows);
    set.num_eye_shapes = row.menu_size(EyeShape);
    set.num_noses = row.menu_size(Nose);
    set.num_jaws = row.menu_size(Jaw);
    set.num_mouths = row.menu_size(Mouth);

    let feature_count = if hrothgar {
        set.hairstyles.len()
    } else {
        set.faces.len()
    };
    set.facial_features = facial_features(row, feature_count);
    set.legacy_tattoo = (
        CustomizeData::new(LegacyTattoo, CustomizeValue::ZERO, LEGACY_TATTOO_ICON, 8),
        CustomizeData::new(LegacyTattoo, CustomizeValue(0x80), LEGACY_TATTOO_ICON, 8),
    );

    set.option_names = option_names(data, row);
    set.types = option_types(row);

    // An option is available exactly when it resolved to data; zero counts
    // and empty lists stay excluded so callers can trust the gate.
    set.set_available(Height);
    set.set_available(Highlights);
    if !set.faces.is_empty() {
        set.set_available(Face);
    }
    if !set.hairstyles.is_empty() {
        set.set_available(Hairstyle);
    }
    if !set.skin_colors.is_empty() {
        set.set_available(SkinColor);
    }
    if !set.hair_colors.is_empty() {
        set.set_available(HairColor);
    }
    if !set.highlight_colors.is_empty() {
        set.set_available(HighlightsColor);
    }
    if !set.eye_colors.is_empty() {
        set.set_available(EyeColorLeft);
        set.set_available(EyeColorRight);
    }
    if !set.tattoo_colors.is_empty() {
        set.set_available(TattooColor);
    }
    if !set.lip_colors_dark.is_empty() || !set.lip_colors_light.is_empty() {
        set.set_available(LipColor);
        set.set_available(Lipstick);
    }
    if set.num_eyebrows > 0 {
        set.set_available(Eyebrows);
    }
    if set.num_eye_shapes > 0 {
        set.set_available(EyeShape);
        set.set_available(SmallIris);
    }
    if set.num_noses > 0 {
        set.set_available(Nose);
    }
    if set.num_jaws > 0 {
        set.set_available(Jaw);
    }
    if set.num_mouths > 0 {
        set.set_available(Mouth);
    }
    if !set.tail_ear_shapes.is_empty() {
        set.set_available(TailShape);
    }
    if !set.face_paints.is_empty() {
        set.set_available(FacePaint);
        set.set_available(FacePaintReversed);
        set.set_available(FacePaintColor);
    }
    if row.menu_size(BustSize) > 0 {
        set.set_available(BustSize);
    }
    if row.menu_size(MuscleMass) > 0 {
        set.set_available(MuscleMass);
    }
    if !set.facial_features.is_empty() {
        for index in [
            FacialFeature1,
            FacialFeature2,
            FacialFeature3,
            FacialFeature4,
            FacialFeature5,
            FacialFeature6,
            FacialFeature7,
            LegacyTattoo,
        ] {
            set.set_available(index);
        }
    }

    set.order = set.compute_order();

    Ok(set)
}
