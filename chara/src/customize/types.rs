//! Core identifiers of the customization model: races, clans, genders, the
//! option enumeration and its packed byte layout, and the display record
//! every lookup produces.

use std::{fmt, ops::Sub, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Race {
    Unknown = 0,
    Hyur,
    Elezen,
    Lalafell,
    Miqote,
    Roegadyn,
    AuRa,
    Hrothgar,
    Viera,
}

/// Sub-race. Combined with [`Gender`] this selects a customization set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Clan {
    Unknown = 0,
    Midlander,
    Highlander,
    Wildwood,
    Duskwight,
    Plainsfolk,
    Dunesfolk,
    SeekerOfTheSun,
    KeeperOfTheMoon,
    Seawolf,
    Hellsguard,
    Raen,
    Xaela,
    Helion,
    Lost,
    Rava,
    Veena,
}

impl Clan {
    pub const ALL: [Clan; 16] = [
        Clan::Midlander,
        Clan::Highlander,
        Clan::Wildwood,
        Clan::Duskwight,
        Clan::Plainsfolk,
        Clan::Dunesfolk,
        Clan::SeekerOfTheSun,
        Clan::KeeperOfTheMoon,
        Clan::Seawolf,
        Clan::Hellsguard,
        Clan::Raen,
        Clan::Xaela,
        Clan::Helion,
        Clan::Lost,
        Clan::Rava,
        Clan::Veena,
    ];

    pub fn race(self) -> Race {
        match self {
            Clan::Unknown => Race::Unknown,
            Clan::Midlander | Clan::Highlander => Race::Hyur,
            Clan::Wildwood | Clan::Duskwight => Race::Elezen,
            Clan::Plainsfolk | Clan::Dunesfolk => Race::Lalafell,
            Clan::SeekerOfTheSun | Clan::KeeperOfTheMoon => Race::Miqote,
            Clan::Seawolf | Clan::Hellsguard => Race::Roegadyn,
            Clan::Raen | Clan::Xaela => Race::AuRa,
            Clan::Helion | Clan::Lost => Race::Hrothgar,
            Clan::Rava | Clan::Veena => Race::Viera,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Clan::Unknown => "Unknown",
            Clan::Midlander => "Midlander",
            Clan::Highlander => "Highlander",
            Clan::Wildwood => "Wildwood",
            Clan::Duskwight => "Duskwight",
            Clan::Plainsfolk => "Plainsfolk",
            Clan::Dunesfolk => "Dunesfolk",
            Clan::SeekerOfTheSun => "Seeker of the Sun",
            Clan::KeeperOfTheMoon => "Keeper of the Moon",
            Clan::Seawolf => "Sea Wolf",
            Clan::Hellsguard => "Hellsguard",
            Clan::Raen => "Raen",
            Clan::Xaela => "Xaela",
            Clan::Helion => "Helion",
            Clan::Lost => "The Lost",
            Clan::Rava => "Rava",
            Clan::Veena => "Veena",
        }
    }
}

impl fmt::Display for Clan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Clan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Clan::ALL
            .iter()
            .copied()
            .find(|c| {
                c.name()
                    .chars()
                    .filter(|c| c.is_ascii_alphanumeric())
                    .map(|c| c.to_ascii_lowercase())
                    .eq(key.chars())
            })
            .ok_or_else(|| format!("unknown clan \"{s}\""))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Gender {
    Unknown = 0,
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Gender::Unknown => "Unknown",
            Gender::Male => "Male",
            Gender::Female => "Female",
        })
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "m" | "male" => Ok(Gender::Male),
            "f" | "female" => Ok(Gender::Female),
            _ => Err(format!("unknown gender \"{s}\"")),
        }
    }
}

/// One raw customization byte as stored in a character's appearance block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct CustomizeValue(pub u8);

impl CustomizeValue {
    pub const ZERO: CustomizeValue = CustomizeValue(0);

    pub fn new(value: u8) -> Self {
        Self(value)
    }
}

impl Sub<u8> for CustomizeValue {
    type Output = CustomizeValue;

    fn sub(self, rhs: u8) -> CustomizeValue {
        CustomizeValue(self.0 - rhs)
    }
}

impl fmt::Display for CustomizeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// UI widget category a customization option is presented with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MenuType {
    ListSelector = 0,
    IconSelector = 1,
    ColorPicker = 2,
    DoubleColorPicker = 3,
    IconCheckmark = 4,
    Percentage = 5,
    Checkmark = 6,
}

impl MenuType {
    pub const ALL: [MenuType; 7] = [
        MenuType::ListSelector,
        MenuType::IconSelector,
        MenuType::ColorPicker,
        MenuType::DoubleColorPicker,
        MenuType::IconCheckmark,
        MenuType::Percentage,
        MenuType::Checkmark,
    ];

    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|t| *t as u8 == value)
    }
}

/// One customization option. The declaration order is load-bearing: the
/// discriminant indexes the per-set name/type tables, and eye colors are
/// deliberately declared after tattoo color to match the in-game menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CustomizeIndex {
    Race = 0,
    Gender,
    BodyType,
    Height,
    Clan,
    Face,
    Hairstyle,
    Highlights,
    SkinColor,
    EyeColorRight,
    HairColor,
    HighlightsColor,
    FacialFeature1,
    FacialFeature2,
    FacialFeature3,
    FacialFeature4,
    FacialFeature5,
    FacialFeature6,
    FacialFeature7,
    LegacyTattoo,
    TattooColor,
    Eyebrows,
    EyeColorLeft,
    EyeShape,
    SmallIris,
    Nose,
    Jaw,
    Mouth,
    Lipstick,
    LipColor,
    MuscleMass,
    TailShape,
    BustSize,
    FacePaint,
    FacePaintReversed,
    FacePaintColor,
}

pub const NUM_INDICES: usize = 36;

impl CustomizeIndex {
    pub const ALL: [CustomizeIndex; NUM_INDICES] = [
        CustomizeIndex::Race,
        CustomizeIndex::Gender,
        CustomizeIndex::BodyType,
        CustomizeIndex::Height,
        CustomizeIndex::Clan,
        CustomizeIndex::Face,
        CustomizeIndex::Hairstyle,
        CustomizeIndex::Highlights,
        CustomizeIndex::SkinColor,
        CustomizeIndex::EyeColorRight,
        CustomizeIndex::HairColor,
        CustomizeIndex::HighlightsColor,
        CustomizeIndex::FacialFeature1,
        CustomizeIndex::FacialFeature2,
        CustomizeIndex::FacialFeature3,
        CustomizeIndex::FacialFeature4,
        CustomizeIndex::FacialFeature5,
        CustomizeIndex::FacialFeature6,
        CustomizeIndex::FacialFeature7,
        CustomizeIndex::LegacyTattoo,
        CustomizeIndex::TattooColor,
        CustomizeIndex::Eyebrows,
        CustomizeIndex::EyeColorLeft,
        CustomizeIndex::EyeShape,
        CustomizeIndex::SmallIris,
        CustomizeIndex::Nose,
        CustomizeIndex::Jaw,
        CustomizeIndex::Mouth,
        CustomizeIndex::Lipstick,
        CustomizeIndex::LipColor,
        CustomizeIndex::MuscleMass,
        CustomizeIndex::TailShape,
        CustomizeIndex::BustSize,
        CustomizeIndex::FacePaint,
        CustomizeIndex::FacePaintReversed,
        CustomizeIndex::FacePaintColor,
    ];

    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    /// Byte offset within a 26-byte appearance block, and the bit mask the
    /// option occupies within that byte.
    pub fn byte_and_mask(self) -> (usize, u8) {
        use CustomizeIndex::*;
        match self {
            Race => (0, 0xFF),
            Gender => (1, 0xFF),
            BodyType => (2, 0xFF),
            Height => (3, 0xFF),
            Clan => (4, 0xFF),
            Face => (5, 0xFF),
            Hairstyle => (6, 0xFF),
            Highlights => (7, 0x80),
            SkinColor => (8, 0xFF),
            EyeColorRight => (9, 0xFF),
            HairColor => (10, 0xFF),
            HighlightsColor => (11, 0xFF),
            FacialFeature1 => (12, 0x01),
            FacialFeature2 => (12, 0x02),
            FacialFeature3 => (12, 0x04),
            FacialFeature4 => (12, 0x08),
            FacialFeature5 => (12, 0x10),
            FacialFeature6 => (12, 0x20),
            FacialFeature7 => (12, 0x40),
            LegacyTattoo => (12, 0x80),
            TattooColor => (13, 0xFF),
            Eyebrows => (14, 0xFF),
            EyeColorLeft => (15, 0xFF),
            EyeShape => (16, 0x7F),
            SmallIris => (16, 0x80),
            Nose => (17, 0xFF),
            Jaw => (18, 0xFF),
            Mouth => (19, 0x7F),
            Lipstick => (19, 0x80),
            LipColor => (20, 0xFF),
            MuscleMass => (21, 0xFF),
            TailShape => (22, 0xFF),
            BustSize => (23, 0xFF),
            FacePaint => (24, 0x7F),
            FacePaintReversed => (24, 0x80),
            FacePaintColor => (25, 0xFF),
        }
    }

    pub fn to_flag(self) -> CustomizeFlags {
        CustomizeFlags(1u64 << self as u8)
    }

    /// Fallback display name when the menu sheet carries no localized text.
    pub fn default_name(self) -> &'static str {
        use CustomizeIndex::*;
        match self {
            Race => "Race",
            Gender => "Gender",
            BodyType => "Body Type",
            Height => "Height",
            Clan => "Clan",
            Face => "Face",
            Hairstyle => "Hairstyle",
            Highlights => "Highlights",
            SkinColor => "Skin Color",
            EyeColorRight => "Right Eye Color",
            HairColor => "Hair Color",
            HighlightsColor => "Highlights Color",
            FacialFeature1 | FacialFeature2 | FacialFeature3 | FacialFeature4
            | FacialFeature5 | FacialFeature6 | FacialFeature7 => "Facial Features",
            LegacyTattoo => "Legacy Tattoo",
            TattooColor => "Tattoo Color",
            Eyebrows => "Eyebrows",
            EyeColorLeft => "Left Eye Color",
            EyeShape => "Eye Shape",
            SmallIris => "Small Iris",
            Nose => "Nose",
            Jaw => "Jaw",
            Mouth => "Mouth",
            Lipstick => "Lipstick",
            LipColor => "Lip Color",
            MuscleMass => "Muscle Mass",
            TailShape => "Tail Shape",
            BustSize => "Bust Size",
            FacePaint => "Face Paint",
            FacePaintReversed => "Face Paint Reversed",
            FacePaintColor => "Face Paint Color",
        }
    }
}

/// Per-set availability bitmask over [`CustomizeIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CustomizeFlags(u64);

impl CustomizeFlags {
    pub const NONE: CustomizeFlags = CustomizeFlags(0);

    pub fn contains(self, index: CustomizeIndex) -> bool {
        self.0 & index.to_flag().0 != 0
    }

    pub fn insert(&mut self, index: CustomizeIndex) {
        self.0 |= index.to_flag().0;
    }
}

/// One resolvable customization choice: the raw byte value a character
/// stores, the icon (or packed RGBA color, for color pickers) the UI shows
/// for it, and the source sheet row it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomizeData {
    pub index: CustomizeIndex,
    pub value: CustomizeValue,
    pub icon: u32,
    pub display_index: u16,
}

impl CustomizeData {
    pub fn new(index: CustomizeIndex, value: CustomizeValue, icon: u32, display_index: u16) -> Self {
        Self {
            index,
            value,
            icon,
            display_index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clan_to_race() {
        assert_eq!(Clan::Midlander.race(), Race::Hyur);
        assert_eq!(Clan::Dunesfolk.race(), Race::Lalafell);
        assert_eq!(Clan::Helion.race(), Race::Hrothgar);
        assert_eq!(Clan::Lost.race(), Race::Hrothgar);
        assert_eq!(Clan::Veena.race(), Race::Viera);
        assert_eq!(Clan::Unknown.race(), Race::Unknown);
    }

    #[test]
    fn clan_from_str() {
        assert_eq!("midlander".parse::<Clan>().unwrap(), Clan::Midlander);
        assert_eq!("Seeker of the Sun".parse::<Clan>().unwrap(), Clan::SeekerOfTheSun);
        assert_eq!("sea-wolf".parse::<Clan>().unwrap(), Clan::Seawolf);
        assert!("hobbit".parse::<Clan>().is_err());
    }

    #[test]
    fn byte_layout() {
        assert_eq!(CustomizeIndex::Race.byte_and_mask(), (0, 0xFF));
        assert_eq!(CustomizeIndex::Highlights.byte_and_mask(), (7, 0x80));
        assert_eq!(CustomizeIndex::FacialFeature3.byte_and_mask(), (12, 0x04));
        assert_eq!(CustomizeIndex::LegacyTattoo.byte_and_mask(), (12, 0x80));
        assert_eq!(CustomizeIndex::FacePaintColor.byte_and_mask(), (25, 0xFF));

        // Every option of ALL keeps its own discriminant as position.
        for (i, index) in CustomizeIndex::ALL.iter().enumerate() {
            assert_eq!(*index as usize, i);
        }
    }

    #[test]
    fn flags() {
        let mut flags = CustomizeFlags::NONE;
        assert!(!flags.contains(CustomizeIndex::BustSize));
        flags.insert(CustomizeIndex::BustSize);
        flags.insert(CustomizeIndex::FacePaintColor);
        assert!(flags.contains(CustomizeIndex::BustSize));
        assert!(flags.contains(CustomizeIndex::FacePaintColor));
        assert!(!flags.contains(CustomizeIndex::Race));
    }
}
