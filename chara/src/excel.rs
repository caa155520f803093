//! Access to the game's Excel sheets (`.exh` headers + `.exd` data pages).
//!
//! Sheets are loaded eagerly into an id-indexed map because the
//! customization catalog needs random row access (menu rows, hair rows and
//! text rows are looked up by id), not a streaming pass. Rows deserialize
//! through serde, so callers declare plain structs mirroring the column
//! layout; the row id is always visited first.

use crate::{error::CharaError, pack::Repository};
use binrw::{binread, BinRead};
use nohash_hasher::IntMap;
use serde::{de, de::DeserializeOwned, forward_to_deserialize_any};
use std::{
    fmt,
    io::{Cursor, Seek, SeekFrom},
    sync::Arc,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[binread]
#[br(little, repr = u16)]
pub enum Locale {
    None = 0x0,
    Japanese,
    English,
    German,
    French,
    ChineseSimplified,
    ChineseTraditional,
    Korean,
}

impl Locale {
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Japanese => "_ja",
            Self::English => "_en",
            Self::German => "_de",
            Self::French => "_fr",
            Self::ChineseSimplified => "_chs",
            Self::ChineseTraditional => "_cht",
            Self::Korean => "_ko",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[binread]
#[br(big, repr = u16)]
pub enum ValueType {
    String = 0x0,
    Bool = 0x1,
    Int8 = 0x2,
    UInt8 = 0x3,
    Int16 = 0x4,
    UInt16 = 0x5,
    Int32 = 0x6,
    UInt32 = 0x7,
    Float32 = 0x9,
    Int64 = 0xA,
    UInt64 = 0xB,
    PackedBool0 = 0x19,
    PackedBool1 = 0x1A,
    PackedBool2 = 0x1B,
    PackedBool3 = 0x1C,
    PackedBool4 = 0x1D,
    PackedBool5 = 0x1E,
    PackedBool6 = 0x1F,
    PackedBool7 = 0x20,
}

/// One dynamically-typed cell. Used when a sheet is too wide or too
/// irregular for a dedicated row struct (CharaMakeType has thousands of
/// columns addressed by computed index).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float(f32),
    String(Box<str>),
}

impl Value {
    /// Widens any non-negative integer cell to u32.
    pub fn as_u32(&self) -> Option<u32> {
        match *self {
            Self::UInt8(v) => Some(v.into()),
            Self::UInt16(v) => Some(v.into()),
            Self::UInt32(v) => Some(v),
            Self::UInt64(v) => u32::try_from(v).ok(),
            Self::Int8(v) => u32::try_from(v).ok(),
            Self::Int16(v) => u32::try_from(v).ok(),
            Self::Int32(v) => u32::try_from(v).ok(),
            Self::Int64(v) => u32::try_from(v).ok(),
            _ => None,
        }
    }

    pub fn as_u8(&self) -> Option<u8> {
        self.as_u32().and_then(|v| u8::try_from(v).ok())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

struct ValueVisitor;

impl<'de> de::Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "exd row value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(Value::Bool(v))
    }
    fn visit_i8<E: de::Error>(self, v: i8) -> Result<Self::Value, E> {
        Ok(Value::Int8(v))
    }
    fn visit_i16<E: de::Error>(self, v: i16) -> Result<Self::Value, E> {
        Ok(Value::Int16(v))
    }
    fn visit_i32<E: de::Error>(self, v: i32) -> Result<Self::Value, E> {
        Ok(Value::Int32(v))
    }
    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Value::Int64(v))
    }
    fn visit_u8<E: de::Error>(self, v: u8) -> Result<Self::Value, E> {
        Ok(Value::UInt8(v))
    }
    fn visit_u16<E: de::Error>(self, v: u16) -> Result<Self::Value, E> {
        Ok(Value::UInt16(v))
    }
    fn visit_u32<E: de::Error>(self, v: u32) -> Result<Self::Value, E> {
        Ok(Value::UInt32(v))
    }
    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Value::UInt64(v))
    }
    fn visit_f32<E: de::Error>(self, v: f32) -> Result<Self::Value, E> {
        Ok(Value::Float(v))
    }
    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(Value::String(v.into()))
    }
}

impl<'de> de::Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor)
    }
}

pub type Row = Vec<Value>;

#[derive(Debug)]
#[binread]
#[br(big, magic = b"EXHF")]
struct Exh {
    _unk0: u16, // version?
    data_offset: u16,
    column_count: u16,
    page_count: u16,
    language_count: u16,
    _unk1: u16,
    _unk2: u8, // padding?
    variant: ExVariant,
    _unk3: u16,
    _row_count: u32,
    _unk4: u32,
    _unk5: u32,
    #[br(count = column_count)]
    columns: Vec<ExColumn>,
    #[br(count = page_count)]
    pages: Vec<ExPage>,
    #[br(count = language_count)]
    languages: Vec<Locale>,
}

#[derive(Debug, PartialEq, Eq)]
#[binread]
#[br(big, repr = u8)]
enum ExVariant {
    Normal = 1,
    SubRows = 2,
}

#[derive(Debug)]
#[binread]
#[br(big)]
struct ExColumn {
    vtype: ValueType,
    offset: u16,
}

#[derive(Debug)]
#[binread]
#[br(big)]
struct ExPage {
    start_id: u32,
    _row_count: u32,
}

#[binread]
#[br(big, magic = b"EXDF")]
struct ExdHeader {
    _version: u16,
    _unk0: u16,
    _index_size: u32,
    _unk1: u32,
    _unk2: u32,
    _unk3: u32,
    _unk4: u32,
    _unk5: u32,
    #[br(count = _index_size / 8)]
    rows: Vec<ExdRowPtr>,
}

#[binread]
#[br(big)]
struct ExdRowPtr {
    id: u32,
    offset: u32,
}

#[derive(Debug)]
struct RowError(Box<str>);

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for RowError {}

impl de::Error for RowError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self(msg.to_string().into_boxed_str())
    }
}

impl From<std::io::Error> for RowError {
    fn from(source: std::io::Error) -> Self {
        Self(source.to_string().into_boxed_str())
    }
}

impl From<binrw::Error> for RowError {
    fn from(source: binrw::Error) -> Self {
        Self(source.to_string().into_boxed_str())
    }
}

/// Serde deserializer over one row's cells. Visits the row id first, then
/// each column at its declared offset within the row data.
struct RowReader<'a> {
    exh: &'a Exh,
    exd_data: &'a [u8],
    id: u32,
    id_expected: bool,
    offset: u64,
    column_idx: usize,
}

impl<'a> RowReader<'a> {
    fn new(exh: &'a Exh, exd_data: &'a [u8], id: u32, offset: u64) -> Self {
        Self {
            exh,
            exd_data,
            id,
            id_expected: true,
            offset,
            column_idx: 0,
        }
    }
}

impl<'de, 'a> de::Deserializer<'de> for &mut RowReader<'a> {
    type Error = RowError;

    fn is_human_readable(&self) -> bool {
        false
    }

    fn deserialize_any<V: de::Visitor<'de>>(self, v: V) -> Result<V::Value, Self::Error> {
        if self.id_expected {
            self.id_expected = false;
            return v.visit_u32(self.id);
        }

        let column = self
            .exh
            .columns
            .get(self.column_idx)
            .ok_or_else(|| RowError("not enough columns in exd file".into()))?;

        let mut cursor = Cursor::new(self.exd_data);
        cursor.seek(SeekFrom::Start(self.offset + column.offset as u64))?;
        self.column_idx += 1;

        match column.vtype {
            ValueType::Int8 => v.visit_i8(i8::read_be(&mut cursor)?),
            ValueType::Int16 => v.visit_i16(i16::read_be(&mut cursor)?),
            ValueType::Int32 => v.visit_i32(i32::read_be(&mut cursor)?),
            ValueType::Int64 => v.visit_i64(i64::read_be(&mut cursor)?),
            ValueType::UInt8 => v.visit_u8(u8::read_be(&mut cursor)?),
            ValueType::UInt16 => v.visit_u16(u16::read_be(&mut cursor)?),
            ValueType::UInt32 => v.visit_u32(u32::read_be(&mut cursor)?),
            ValueType::UInt64 => v.visit_u64(u64::read_be(&mut cursor)?),
            ValueType::Float32 => v.visit_f32(f32::read_be(&mut cursor)?),
            ValueType::Bool => v.visit_bool(u8::read_be(&mut cursor)? != 0),
            ValueType::PackedBool0 => v.visit_bool(u8::read_be(&mut cursor)? & 0x01 != 0),
            ValueType::PackedBool1 => v.visit_bool(u8::read_be(&mut cursor)? & 0x02 != 0),
            ValueType::PackedBool2 => v.visit_bool(u8::read_be(&mut cursor)? & 0x04 != 0),
            ValueType::PackedBool3 => v.visit_bool(u8::read_be(&mut cursor)? & 0x08 != 0),
            ValueType::PackedBool4 => v.visit_bool(u8::read_be(&mut cursor)? & 0x10 != 0),
            ValueType::PackedBool5 => v.visit_bool(u8::read_be(&mut cursor)? & 0x20 != 0),
            ValueType::PackedBool6 => v.visit_bool(u8::read_be(&mut cursor)? & 0x40 != 0),
            ValueType::PackedBool7 => v.visit_bool(u8::read_be(&mut cursor)? & 0x80 != 0),
            ValueType::String => {
                let str_offset = u32::read_be(&mut cursor)?;
                let abs_offset = self.offset + self.exh.data_offset as u64 + str_offset as u64;
                cursor.seek(SeekFrom::Start(abs_offset))?;
                v.visit_string(binrw::NullString::read(&mut cursor)?.to_string())
            }
        }
    }

    #[inline]
    fn deserialize_seq<V: de::Visitor<'de>>(self, v: V) -> Result<V::Value, Self::Error> {
        v.visit_seq(self)
    }

    #[inline]
    fn deserialize_struct<V: de::Visitor<'de>>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        v: V,
    ) -> Result<V::Value, Self::Error> {
        self.deserialize_seq(v)
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct newtype_struct tuple
        tuple_struct map enum identifier ignored_any
    }
}

impl<'de, 'a> de::SeqAccess<'de> for RowReader<'a> {
    type Error = RowError;

    fn next_element_seed<T: de::DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> Result<Option<T::Value>, Self::Error> {
        if self.column_idx < self.exh.columns.len() {
            seed.deserialize(self).map(Some)
        } else {
            Ok(None)
        }
    }
}

fn read_exh(repo: &Repository, base_path: &str) -> Result<Exh, CharaError> {
    let exh_path = format!("exd/{base_path}.exh").into_boxed_str();
    let exh_file = repo
        .find(&exh_path)?
        .ok_or(CharaError::ExhNotFound(exh_path))?
        .read()?;

    Exh::read(&mut Cursor::new(exh_file)).map_err(CharaError::Exh)
}

/// One sheet, fully loaded and keyed by row id.
#[derive(Debug)]
pub struct Sheet<T> {
    name: Box<str>,
    rows: IntMap<u32, T>,
}

impl<T> Sheet<T> {
    /// Builds a sheet from already-typed rows. This is how tests and other
    /// non-SqPack data sources feed the engine.
    pub fn from_rows(name: impl Into<Box<str>>, rows: impl IntoIterator<Item = (u32, T)>) -> Self {
        Self {
            name: name.into(),
            rows: rows.into_iter().collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, id: u32) -> Option<&T> {
        self.rows.get(&id)
    }

    /// Like [`Self::get`], but a missing row is a data-integrity error.
    pub fn row(&self, id: u32) -> Result<&T, CharaError> {
        self.rows.get(&id).ok_or_else(|| CharaError::SheetRow {
            sheet: self.name.clone(),
            row: id,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &T)> {
        self.rows.iter().map(|(id, row)| (*id, row))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<T: DeserializeOwned> Sheet<T> {
    /// Loads and indexes every page of a sheet, preferring `locale` and
    /// falling back to the sheet's first declared language.
    pub fn load(repo: &Arc<Repository>, name: &str, locale: Locale) -> Result<Self, CharaError> {
        let base_path = name.to_lowercase();
        let exh = read_exh(repo, &base_path)?;
        if exh.variant != ExVariant::Normal {
            return Err(CharaError::ExdVariant(name.into()));
        }

        let exd_locale = exh
            .languages
            .iter()
            .copied()
            .find(|l| *l == locale)
            .or(exh.languages.first().copied())
            .unwrap_or(Locale::None);

        let mut rows = IntMap::default();
        for page in &exh.pages {
            let start_id = page.start_id;
            let exd_path = format!("exd/{base_path}_{start_id}{exd_locale}.exd").into_boxed_str();
            let exd_data = repo
                .find(&exd_path)?
                .ok_or(CharaError::ExdNotFound(exd_path))?
                .read()?;

            let header = ExdHeader::read(&mut Cursor::new(&exd_data))
                .map_err(CharaError::ExdFileHeader)?;
            for row_ptr in &header.rows {
                // Row data starts after a 6-byte header (u32 size, u16 count).
                let row = T::deserialize(&mut RowReader::new(
                    &exh,
                    &exd_data,
                    row_ptr.id,
                    row_ptr.offset as u64 + 6,
                ))
                .map_err(|e| CharaError::ExdDeserialization(e.0))?;
                rows.insert(row_ptr.id, row);
            }
        }

        Ok(Self {
            name: name.into(),
            rows,
        })
    }
}
