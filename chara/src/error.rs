use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CharaError {
    #[error("SqPack repository file name is invalid")]
    PackIdRepoFile,
    #[error("SqPack inner file path is invalid")]
    PackIdInnerPath,
    #[error("SqPack inner file path contains invalid category identifier")]
    PackIdCategory,
    #[error("SqPack inner file path contains invalid expansion identifier")]
    PackIdExpansion,
    #[error("SqPack inner file path contains invalid patch identifier")]
    PackIdPatch,

    #[error("Failed to seek within .index2 file")]
    IndexSeek(#[source] io::Error),
    #[error("Failed to read .index2 header")]
    IndexHeader(#[source] io::Error),
    #[error("Failed to read .index2 entry")]
    IndexEntry(#[source] io::Error),

    #[error("Failed to seek within .dat file")]
    DatSeek(#[source] io::Error),
    #[error("Failed to read .dat inner file header")]
    DatFileHeader(#[source] binrw::Error),
    #[error("Inner file is not a plain data file (type {0})")]
    DatNotPlain(u32),
    #[error("Failed to read .dat inner file block header")]
    DatBlockHeader(#[source] binrw::Error),
    #[error("Failed to decode .dat inner file block")]
    DatBlockDecoding(#[source] io::Error),

    #[error("Failed to read .exh file")]
    Exh(#[source] binrw::Error),
    #[error("Unable to find {0}")]
    ExhNotFound(Box<str>),
    #[error("Unable to find {0}")]
    ExdNotFound(Box<str>),
    #[error("Sheet {0} uses sub-rows, which are not supported")]
    ExdVariant(Box<str>),
    #[error("Failed to read .exd file header")]
    ExdFileHeader(#[source] binrw::Error),
    #[error("Failed to deserialize .exd row ({0})")]
    ExdDeserialization(Box<str>),

    #[error("Sheet {sheet} is missing row {row}")]
    SheetRow { sheet: Box<str>, row: u32 },
    #[error("Sheet {sheet} row {row} column {column} is missing or mistyped")]
    SheetColumn {
        sheet: Box<str>,
        row: u32,
        column: usize,
    },

    #[error("Color table is too short: need {need} entries, found {have}")]
    CmpTooShort { need: usize, have: usize },

    #[error(transparent)]
    IO(io::Error),
}
