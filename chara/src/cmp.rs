//! The shared character color table (`human.cmp`).
//!
//! A single fixed-layout resource holds every color picker's palette as one
//! flat RGBA list; individual pickers are slices identified by an entry
//! offset. Entries of "light" sub-ranges get their raw value offset by
//! +128 so that the dark and light halves of one option stay disjoint in
//! the same byte-sized value space.

use crate::{
    customize::{CustomizeData, CustomizeIndex, CustomizeValue},
    error::CharaError,
    pack::Repository,
};
use byteorder::{ByteOrder, LE};

pub const CMP_PATH: &str = "chara/xls/charamake/human.cmp";

/// Shared palette ranges as (entry offset, entry count). Eye and tattoo
/// colors are the same underlying range; skin and hair ranges are race- and
/// gender-specific and live in the catalog builder.
pub mod range {
    pub const EYE: (usize, usize) = (0, 192);
    pub const TATTOO: (usize, usize) = EYE;
    pub const HIGHLIGHT: (usize, usize) = (256, 192);
    pub const LIP_DARK: (usize, usize) = (512, 96);
    pub const LIP_LIGHT: (usize, usize) = (1024, 96);
    pub const FACE_PAINT_DARK: (usize, usize) = (640, 96);
    pub const FACE_PAINT_LIGHT: (usize, usize) = (1152, 96);

    pub const SKIN_HAIR_COUNT: usize = 192;

    /// Added to the raw value of every entry in a light sub-range.
    pub const LIGHT_VALUE_OFFSET: u8 = 128;
}

#[derive(Debug)]
pub struct CmpFile {
    colors: Box<[u32]>,
}

impl CmpFile {
    pub fn load(repo: &Repository) -> Result<Self, CharaError> {
        let raw = repo
            .find(CMP_PATH)?
            .ok_or(CharaError::ExhNotFound(CMP_PATH.into()))?
            .read()?;

        let colors = raw
            .chunks_exact(4)
            .map(LE::read_u32)
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Ok(Self { colors })
    }

    pub fn from_colors(colors: Vec<u32>) -> Self {
        Self {
            colors: colors.into_boxed_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Slices `count` entries starting at `offset` into display records for
    /// `index`. Raw order is display order. A table too short for the
    /// requested slice is a fatal data error.
    pub fn color_picker(
        &self,
        index: CustomizeIndex,
        offset: usize,
        count: usize,
        light: bool,
    ) -> Result<Vec<CustomizeData>, CharaError> {
        let end = offset + count;
        if end > self.colors.len() {
            return Err(CharaError::CmpTooShort {
                need: end,
                have: self.colors.len(),
            });
        }

        Ok(self.colors[offset..end]
            .iter()
            .enumerate()
            .map(|(i, &color)| {
                let value = if light {
                    range::LIGHT_VALUE_OFFSET + i as u8
                } else {
                    i as u8
                };
                CustomizeData::new(index, CustomizeValue(value), color, (offset + i) as u16)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> CmpFile {
        CmpFile::from_colors((0..2048u32).map(|i| 0xFF000000 | i).collect())
    }

    #[test]
    fn dark_range_slicing() {
        let picker = table()
            .color_picker(CustomizeIndex::LipColor, range::LIP_DARK.0, range::LIP_DARK.1, false)
            .unwrap();

        assert_eq!(picker.len(), 96);
        assert_eq!(picker[0].value, CustomizeValue(0));
        assert_eq!(picker[0].display_index, 512);
        assert_eq!(picker[0].icon, 0xFF000000 | 512);
        assert_eq!(picker[95].value, CustomizeValue(95));
        assert_eq!(picker[95].display_index, 607);
    }

    #[test]
    fn light_range_value_offset() {
        let picker = table()
            .color_picker(
                CustomizeIndex::LipColor,
                range::LIP_LIGHT.0,
                range::LIP_LIGHT.1,
                true,
            )
            .unwrap();

        assert_eq!(picker[0].value, CustomizeValue(128));
        assert_eq!(picker[0].display_index, 1024);
        assert_eq!(picker[95].value, CustomizeValue(223));
    }

    #[test]
    fn short_table_is_fatal() {
        let table = CmpFile::from_colors(vec![0; 100]);
        let err = table
            .color_picker(CustomizeIndex::EyeColorLeft, 0, 192, false)
            .unwrap_err();
        assert!(matches!(
            err,
            CharaError::CmpTooShort { need: 192, have: 100 }
        ));
    }
}
