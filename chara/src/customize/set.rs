//! Per-(clan, gender) customization catalog and its query operations.

use super::types::{
    Clan, CustomizeData, CustomizeFlags, CustomizeIndex, CustomizeValue, Gender, MenuType, Race,
    NUM_INDICES,
};
use std::collections::HashMap;

/// Number of choices every percentage slider exposes (0..=100).
const PERCENTAGE_COUNT: usize = 101;

/// Every available customization of one clan/gender combination: the
/// enumerated choice lists, per-option control types and display names, and
/// the availability mask gating all of it. Built once at startup and
/// immutable afterwards; reads never lock.
#[derive(Debug)]
pub struct CustomizationSet {
    pub(super) clan: Clan,
    pub(super) gender: Gender,
    pub(super) race: Race,

    pub(super) available: CustomizeFlags,
    pub(super) option_names: Vec<String>,
    pub(super) types: Vec<MenuType>,
    pub(super) order: HashMap<MenuType, Vec<CustomizeIndex>>,

    // Plain list selectors only carry a count.
    pub(super) num_eyebrows: usize,
    pub(super) num_eye_shapes: usize,
    pub(super) num_noses: usize,
    pub(super) num_jaws: usize,
    pub(super) num_mouths: usize,

    pub(super) faces: Vec<CustomizeData>,
    pub(super) hairstyles: Vec<CustomizeData>,
    /// Hairstyles keyed by face value; `[0]` is the context-free full list
    /// and doubles as the fallback for out-of-range face contexts.
    pub(super) hair_by_face: Vec<Vec<CustomizeData>>,
    pub(super) tail_ear_shapes: Vec<CustomizeData>,
    pub(super) face_paints: Vec<CustomizeData>,

    /// `(off, on)` pairs keyed by face value, one pair per feature slot;
    /// `[0]` is the fallback row.
    pub(super) facial_features: Vec<[(CustomizeData, CustomizeData); 7]>,
    pub(super) legacy_tattoo: (CustomizeData, CustomizeData),

    pub(super) skin_colors: Vec<CustomizeData>,
    pub(super) hair_colors: Vec<CustomizeData>,
    pub(super) highlight_colors: Vec<CustomizeData>,
    pub(super) eye_colors: Vec<CustomizeData>,
    pub(super) tattoo_colors: Vec<CustomizeData>,
    pub(super) lip_colors_dark: Vec<CustomizeData>,
    pub(super) lip_colors_light: Vec<CustomizeData>,
    pub(super) face_paint_colors_dark: Vec<CustomizeData>,
    pub(super) face_paint_colors_light: Vec<CustomizeData>,
}

impl CustomizationSet {
    pub(super) fn new(clan: Clan, gender: Gender) -> Self {
        let zero = CustomizeData::new(
            CustomizeIndex::LegacyTattoo,
            CustomizeValue::ZERO,
            0,
            0,
        );
        Self {
            clan,
            gender,
            race: clan.race(),
            available: CustomizeFlags::NONE,
            option_names: Vec::new(),
            types: vec![MenuType::ListSelector; NUM_INDICES],
            order: HashMap::new(),
            num_eyebrows: 0,
            num_eye_shapes: 0,
            num_noses: 0,
            num_jaws: 0,
            num_mouths: 0,
            faces: Vec::new(),
            hairstyles: Vec::new(),
            hair_by_face: Vec::new(),
            tail_ear_shapes: Vec::new(),
            face_paints: Vec::new(),
            facial_features: Vec::new(),
            legacy_tattoo: (zero, zero),
            skin_colors: Vec::new(),
            hair_colors: Vec::new(),
            highlight_colors: Vec::new(),
            eye_colors: Vec::new(),
            tattoo_colors: Vec::new(),
            lip_colors_dark: Vec::new(),
            lip_colors_light: Vec::new(),
            face_paint_colors_dark: Vec::new(),
            face_paint_colors_light: Vec::new(),
        }
    }

    pub(super) fn set_available(&mut self, index: CustomizeIndex) {
        self.available.insert(index);
    }

    pub fn clan(&self) -> Clan {
        self.clan
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn race(&self) -> Race {
        self.race
    }

    pub fn is_available(&self, index: CustomizeIndex) -> bool {
        self.available.contains(index)
    }

    pub fn option_name(&self, index: CustomizeIndex) -> &str {
        &self.option_names[index as usize]
    }

    pub fn menu_type(&self, index: CustomizeIndex) -> MenuType {
        self.types[index as usize]
    }

    /// Canonical UI layout: available options grouped by control type, in
    /// menu order (tattoo color rotated ahead of the two eye colors).
    /// Every control type is present, possibly with an empty group.
    pub fn order(&self) -> &HashMap<MenuType, Vec<CustomizeIndex>> {
        &self.order
    }

    pub fn faces(&self) -> &[CustomizeData] {
        &self.faces
    }

    pub fn hairstyles(&self) -> &[CustomizeData] {
        &self.hairstyles
    }

    pub fn tail_ear_shapes(&self) -> &[CustomizeData] {
        &self.tail_ear_shapes
    }

    pub fn face_paints(&self) -> &[CustomizeData] {
        &self.face_paints
    }

    pub fn skin_colors(&self) -> &[CustomizeData] {
        &self.skin_colors
    }

    pub fn hair_colors(&self) -> &[CustomizeData] {
        &self.hair_colors
    }

    pub fn highlight_colors(&self) -> &[CustomizeData] {
        &self.highlight_colors
    }

    pub fn eye_colors(&self) -> &[CustomizeData] {
        &self.eye_colors
    }

    pub fn tattoo_colors(&self) -> &[CustomizeData] {
        &self.tattoo_colors
    }

    pub fn lip_colors_dark(&self) -> &[CustomizeData] {
        &self.lip_colors_dark
    }

    pub fn lip_colors_light(&self) -> &[CustomizeData] {
        &self.lip_colors_light
    }

    pub fn face_paint_colors_dark(&self) -> &[CustomizeData] {
        &self.face_paint_colors_dark
    }

    pub fn face_paint_colors_light(&self) -> &[CustomizeData] {
        &self.face_paint_colors_light
    }

    /// Hrothgar faces 5..=8 are visual duplicates of 1..=4 and collapse to
    /// them for all face-keyed lookups.
    fn hrothgar_face_hack(&self, value: CustomizeValue) -> CustomizeValue {
        if self.race == Race::Hrothgar && (5..9).contains(&value.0) {
            value - 4
        } else {
            value
        }
    }

    /// The hairstyle list valid under `face`, falling back to the
    /// context-free list when the face is outside the known range.
    fn hair_list(&self, face: CustomizeValue) -> &[CustomizeData] {
        let face = self.hrothgar_face_hack(face).0 as usize;
        self.hair_by_face
            .get(face)
            .map(Vec::as_slice)
            .unwrap_or(&self.hairstyles)
    }

    fn feature_pair(
        &self,
        index: CustomizeIndex,
        face: CustomizeValue,
    ) -> &(CustomizeData, CustomizeData) {
        let slot = index as usize - CustomizeIndex::FacialFeature1 as usize;
        let row = self
            .facial_features
            .get(face.0 as usize)
            .unwrap_or(&self.facial_features[0]);
        &row[slot]
    }

    fn search(
        list: &[CustomizeData],
        value: CustomizeValue,
    ) -> Option<(usize, CustomizeData)> {
        list.iter()
            .enumerate()
            .find(|(_, d)| d.value == value)
            .map(|(i, d)| (i, *d))
    }

    fn search_dual(
        dark: &[CustomizeData],
        light: &[CustomizeData],
        value: CustomizeValue,
    ) -> Option<(usize, CustomizeData)> {
        Self::search(dark, value)
            .or_else(|| Self::search(light, value).map(|(i, d)| (i + dark.len(), d)))
    }

    /// Resolves a stored raw byte to its position in the option's choice
    /// list (and the matching display record). `None` means the value is
    /// not a known choice, e.g. stale data after a game update; callers
    /// substitute a placeholder.
    pub fn data_by_value(
        &self,
        index: CustomizeIndex,
        value: CustomizeValue,
        face: CustomizeValue,
    ) -> Option<(usize, CustomizeData)> {
        use CustomizeIndex::*;

        let integer = |value: CustomizeValue| {
            if (value.0 as usize) < self.count_with_face(index, face) {
                Some((
                    value.0 as usize,
                    CustomizeData::new(index, value, 0, value.0 as u16),
                ))
            } else {
                None
            }
        };

        let boolean = |value: CustomizeValue| {
            let (_, mask) = index.byte_and_mask();
            if value == CustomizeValue::ZERO {
                Some((0, CustomizeData::new(index, CustomizeValue::ZERO, 0, 0)))
            } else if value.0 == mask {
                Some((1, CustomizeData::new(index, CustomizeValue(mask), 0, 1)))
            } else {
                None
            }
        };

        match self.menu_type(index) {
            MenuType::ListSelector | MenuType::Percentage => integer(value),
            MenuType::Checkmark | MenuType::IconCheckmark => boolean(value),
            MenuType::IconSelector => match index {
                Face => Self::search(&self.faces, self.hrothgar_face_hack(value)),
                Hairstyle => Self::search(self.hair_list(face), value),
                TailShape => Self::search(&self.tail_ear_shapes, value),
                FacePaint => Self::search(&self.face_paints, value),
                // For Hrothgar the lip color slot enumerates fur patterns.
                LipColor => Self::search(&self.lip_colors_dark, value),
                _ => None,
            },
            MenuType::ColorPicker => match index {
                SkinColor => Self::search(&self.skin_colors, value),
                EyeColorLeft | EyeColorRight => Self::search(&self.eye_colors, value),
                HairColor => Self::search(&self.hair_colors, value),
                HighlightsColor => Self::search(&self.highlight_colors, value),
                TattooColor => Self::search(&self.tattoo_colors, value),
                LipColor => {
                    Self::search_dual(&self.lip_colors_dark, &self.lip_colors_light, value)
                }
                FacePaintColor => Self::search_dual(
                    &self.face_paint_colors_dark,
                    &self.face_paint_colors_light,
                    value,
                ),
                _ => None,
            },
            MenuType::DoubleColorPicker => match index {
                LipColor => {
                    Self::search_dual(&self.lip_colors_dark, &self.lip_colors_light, value)
                }
                FacePaintColor => Self::search_dual(
                    &self.face_paint_colors_dark,
                    &self.face_paint_colors_light,
                    value,
                ),
                _ => None,
            },
        }
    }

    /// [`Self::data_with_face`] without a face context.
    pub fn data(&self, index: CustomizeIndex, idx: usize) -> CustomizeData {
        self.data_with_face(index, idx, CustomizeValue::ZERO)
    }

    /// The `idx`-th choice of an option. Inverse of [`Self::data_by_value`]
    /// over the valid domain.
    ///
    /// # Panics
    ///
    /// Panics when `idx` is outside `0..count_with_face(index, face)`;
    /// callers must consult the count first.
    pub fn data_with_face(
        &self,
        index: CustomizeIndex,
        idx: usize,
        face: CustomizeValue,
    ) -> CustomizeData {
        use CustomizeIndex::*;

        let face = self.hrothgar_face_hack(face);
        let count = self.count_with_face(index, face);
        assert!(
            idx < count,
            "choice {idx} out of range for {index:?} ({count} available)"
        );

        match self.menu_type(index) {
            // Pure integer ranges have no stored list; synthesize the record.
            MenuType::Percentage | MenuType::ListSelector => {
                CustomizeData::new(index, CustomizeValue(idx as u8), 0, idx as u16)
            }
            MenuType::Checkmark => {
                let (_, mask) = index.byte_and_mask();
                let value = if idx == 0 { 0 } else { mask };
                CustomizeData::new(index, CustomizeValue(value), 0, idx as u16)
            }
            _ => match index {
                Face => self.faces[idx],
                Hairstyle => self.hair_list(face)[idx],
                TailShape => self.tail_ear_shapes[idx],
                FacePaint => self.face_paints[idx],
                FacialFeature1 | FacialFeature2 | FacialFeature3 | FacialFeature4
                | FacialFeature5 | FacialFeature6 | FacialFeature7 => {
                    let pair = self.feature_pair(index, face);
                    if idx == 0 {
                        pair.0
                    } else {
                        pair.1
                    }
                }
                LegacyTattoo => {
                    if idx == 0 {
                        self.legacy_tattoo.0
                    } else {
                        self.legacy_tattoo.1
                    }
                }
                SkinColor => self.skin_colors[idx],
                EyeColorLeft | EyeColorRight => self.eye_colors[idx],
                HairColor => self.hair_colors[idx],
                HighlightsColor => self.highlight_colors[idx],
                TattooColor => self.tattoo_colors[idx],
                LipColor => {
                    if idx < self.lip_colors_dark.len() {
                        self.lip_colors_dark[idx]
                    } else {
                        self.lip_colors_light[idx - self.lip_colors_dark.len()]
                    }
                }
                FacePaintColor => {
                    if idx < self.face_paint_colors_dark.len() {
                        self.face_paint_colors_dark[idx]
                    } else {
                        self.face_paint_colors_light[idx - self.face_paint_colors_dark.len()]
                    }
                }
                _ => CustomizeData::new(index, CustomizeValue::ZERO, 0, 0),
            },
        }
    }

    /// [`Self::count_with_face`] without a face context.
    pub fn count(&self, index: CustomizeIndex) -> usize {
        self.count_with_face(index, CustomizeValue::ZERO)
    }

    /// Number of valid choices for an option. Always 0 when the option is
    /// not available for this clan/gender, regardless of stored data.
    pub fn count_with_face(&self, index: CustomizeIndex, face: CustomizeValue) -> usize {
        use CustomizeIndex::*;

        if !self.is_available(index) {
            return 0;
        }

        match self.menu_type(index) {
            MenuType::Percentage => PERCENTAGE_COUNT,
            MenuType::IconCheckmark | MenuType::Checkmark => 2,
            _ => match index {
                Face => self.faces.len(),
                Hairstyle => self.hair_list(face).len(),
                SkinColor => self.skin_colors.len(),
                EyeColorLeft | EyeColorRight => self.eye_colors.len(),
                HairColor => self.hair_colors.len(),
                HighlightsColor => self.highlight_colors.len(),
                TattooColor => self.tattoo_colors.len(),
                Eyebrows => self.num_eyebrows,
                EyeShape => self.num_eye_shapes,
                Nose => self.num_noses,
                Jaw => self.num_jaws,
                Mouth => self.num_mouths,
                LipColor => self.lip_colors_dark.len() + self.lip_colors_light.len(),
                TailShape => self.tail_ear_shapes.len(),
                FacePaint => self.face_paints.len(),
                FacePaintColor => {
                    self.face_paint_colors_dark.len() + self.face_paint_colors_light.len()
                }
                _ => 0,
            },
        }
    }

    /// Groups the available options by control type in menu order. Race and
    /// gender are governed by dedicated pickers, not option groups, and are
    /// skipped; tattoo color and the two eye colors trade places relative
    /// to declaration order to match the in-game menu.
    pub(super) fn compute_order(&self) -> HashMap<MenuType, Vec<CustomizeIndex>> {
        use CustomizeIndex::*;

        let mut rotated = CustomizeIndex::ALL;
        rotated[TattooColor as usize] = EyeColorLeft;
        rotated[EyeColorLeft as usize] = EyeColorRight;
        rotated[EyeColorRight as usize] = TattooColor;

        let mut order: HashMap<MenuType, Vec<CustomizeIndex>> = HashMap::new();
        for &index in rotated.iter().skip(2).filter(|i| self.is_available(**i)) {
            order.entry(self.menu_type(index)).or_default().push(index);
        }
        for menu_type in MenuType::ALL {
            order.entry(menu_type).or_default();
        }
        order
    }
}
