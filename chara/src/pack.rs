//! Read-only access to SqPack repositories.
//!
//! A repository maps inner paths like `exd/charamaketype.exh` to entries in
//! hashed `.index2` files, which in turn point into block-compressed `.dat`
//! files. Only plain data files are read here; the customization engine
//! consumes sheets and the color table, never models or textures.

use crate::error::CharaError;
use binrw::{binread, BinRead};
use byteorder::{ReadBytesExt, LE};
use crc::{Crc, CRC_32_JAMCRC};
use flate2::read::DeflateDecoder;
use lazy_static::lazy_static;
use nohash_hasher::IntMap;
use once_cell::sync::OnceCell;
use regex::Regex;
use std::{
    collections::HashMap,
    fmt::Debug,
    fs::File,
    io::{self, BufReader, Cursor, Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

lazy_static! {
    static ref CATEGORY_NAME_TO_ID: HashMap<&'static str, u8> = {
        let mut m = HashMap::new();
        m.insert("common", 0x00);
        m.insert("bgcommon", 0x01);
        m.insert("bg", 0x02);
        m.insert("cut", 0x03);
        m.insert("chara", 0x04);
        m.insert("shader", 0x05);
        m.insert("ui", 0x06);
        m.insert("sound", 0x07);
        m.insert("vfx", 0x08);
        m.insert("ui_script", 0x09);
        m.insert("exd", 0x0a);
        m.insert("game_script", 0x0b);
        m.insert("music", 0x0c);
        m.insert("_sqpack_test", 0x12);
        m.insert("_debug", 0x13);
        m.shrink_to_fit();
        m
    };
    static ref EXPANSION_REGEX: Regex = Regex::new(r"^ex([1-9])$").unwrap();
    static ref PATCH_REGEX: Regex = Regex::new(r"^([0-9a-f]{2})_").unwrap();
    static ref SQPACK_NAME_REGEX: Regex =
        Regex::new(r"^([0-9a-f]{2})([0-9a-f]{2})([0-9a-f]{2}).win32.(dat\d|index|index2)$")
            .unwrap();
}

/// Identifies one physical pack (category/expansion/patch triple).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PackId {
    pub category: u8,
    pub expansion: u8,
    pub patch: u8,
}

impl PackId {
    pub fn new(category: u8, expansion: u8, patch: u8) -> Self {
        Self {
            category,
            expansion,
            patch,
        }
    }

    /// Classifies an inner file path (e.g. `chara/xls/charamake/human.cmp`).
    pub fn from_inner_path(path: impl AsRef<str>) -> Result<Self, CharaError> {
        let mut nodes = path.as_ref().split('/');
        let mut next_node = || nodes.next().ok_or(CharaError::PackIdInnerPath);

        let category = *CATEGORY_NAME_TO_ID
            .get(next_node()?)
            .ok_or(CharaError::PackIdCategory)?;
        // Expansion 0 implies the base "ffxiv" directory, where patch is always 0.
        let mut expansion = 0u8;
        let mut patch = 0u8;

        if let Some(cap) = EXPANSION_REGEX.captures(next_node()?) {
            expansion = cap[1].parse().map_err(|_| CharaError::PackIdExpansion)?;

            if let Some(cap) = PATCH_REGEX.captures(next_node()?) {
                patch = u8::from_str_radix(&cap[1], 16).map_err(|_| CharaError::PackIdPatch)?;
            }
        }

        Ok(Self::new(category, expansion, patch))
    }

    /// Classifies a repository file name (e.g. `040000.win32.index2`).
    pub fn from_repo_path(path: impl AsRef<Path>) -> Result<Self, CharaError> {
        let file_name = path.as_ref().file_name().ok_or(CharaError::PackIdRepoFile)?;
        let file_name = file_name.to_string_lossy();
        let cap = SQPACK_NAME_REGEX
            .captures(&file_name)
            .ok_or(CharaError::PackIdRepoFile)?;

        let category = u8::from_str_radix(&cap[1], 16).map_err(|_| CharaError::PackIdCategory)?;
        let expansion = u8::from_str_radix(&cap[2], 16).map_err(|_| CharaError::PackIdExpansion)?;
        let patch = u8::from_str_radix(&cap[3], 16).map_err(|_| CharaError::PackIdPatch)?;

        Ok(Self::new(category, expansion, patch))
    }

    fn repo_path(&self) -> PathBuf {
        let mut path = PathBuf::new();
        if self.expansion == 0 {
            path.push("ffxiv");
        } else {
            path.push(format!("ex{}", self.expansion));
        }
        path.push(format!(
            "{:02x}{:02x}{:02x}",
            self.category, self.expansion, self.patch
        ));
        path
    }

    pub fn index2_path(&self) -> PathBuf {
        let mut path = self.repo_path();
        path.set_extension("win32.index2");
        path
    }

    pub fn dat_path(&self, num: u8) -> PathBuf {
        let mut path = self.repo_path();
        path.set_extension(format!("win32.dat{num}"));
        path
    }
}

impl Debug for PackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "PackId({:02x}{:02x}{:02x})",
            self.category, self.expansion, self.patch
        ))
    }
}

#[derive(Clone, Copy)]
struct IndexEntry {
    datnum: u8,
    offset: u64,
}

/// Hash index over one pack's inner files (`.index2` flavor, full-path CRC).
struct Index {
    entries: IntMap<u32, IndexEntry>,
}

impl Index {
    fn load(path: impl AsRef<Path>) -> Result<Self, CharaError> {
        const MAGIC: &[u8] = b"SqPack\0\0";

        let mut r = File::open(path.as_ref()).map_err(CharaError::IO)?;

        let mut magic = [0u8; MAGIC.len()];
        r.read_exact(&mut magic).map_err(CharaError::IndexHeader)?;
        if magic != MAGIC {
            return Err(CharaError::IndexHeader(io::ErrorKind::Other.into()));
        }

        r.seek(SeekFrom::Start(0x0C)).map_err(CharaError::IndexSeek)?;
        let header_offset = r.read_u32::<LE>().map_err(CharaError::IndexHeader)? as u64;

        r.seek(SeekFrom::Start(header_offset + 8))
            .map_err(CharaError::IndexSeek)?;
        let entries_offset = r.read_u32::<LE>().map_err(CharaError::IndexHeader)? as u64;
        let entries_count = (r.read_u32::<LE>().map_err(CharaError::IndexHeader)? / 8) as usize;

        r.seek(SeekFrom::Start(entries_offset))
            .map_err(CharaError::IndexSeek)?;
        let mut r = BufReader::new(r);
        let mut entries = IntMap::with_capacity_and_hasher(entries_count, Default::default());
        for _ in 0..entries_count {
            let hash = r.read_u32::<LE>().map_err(CharaError::IndexEntry)?;
            let location = r.read_u32::<LE>().map_err(CharaError::IndexEntry)?;

            entries.insert(
                hash,
                IndexEntry {
                    datnum: ((location & 0x00000007) >> 1) as u8,
                    offset: ((location & 0xFFFFFFF8) as u64) << 3,
                },
            );
        }

        Ok(Self { entries })
    }

    fn find(&self, path: impl AsRef<[u8]>) -> Option<IndexEntry> {
        const HASHER: Crc<u32> = Crc::<u32>::new(&CRC_32_JAMCRC);

        let hash = HASHER.checksum(path.as_ref());
        self.entries.get(&hash).copied()
    }
}

fn read_block(mut input: impl Read + Seek, mut output: impl Write) -> Result<(), CharaError> {
    const BLOCK_HEADER_LEN: u64 = 16;
    const BLOCK_PADDING: u64 = 128;
    const COMPRESSION_THRESHOLD: u32 = 32000;

    #[binread]
    #[br(little, magic = 0x00000010u32)]
    struct BlockHeader {
        _unk0: u32,
        size_compressed: u32,
        size_uncompressed: u32,
    }

    let header = BlockHeader::read(&mut input).map_err(CharaError::DatBlockHeader)?;
    let is_compressed = header.size_compressed < COMPRESSION_THRESHOLD;
    let read_size = if is_compressed {
        header.size_compressed
    } else {
        header.size_uncompressed
    } as u64;

    let mut block = input.take(read_size);
    if is_compressed {
        let mut decoder = DeflateDecoder::new(&mut block);
        io::copy(&mut decoder, &mut output).map_err(CharaError::DatBlockDecoding)?;
    } else {
        io::copy(&mut block, &mut output).map_err(CharaError::DatBlockDecoding)?;
    }
    input = block.into_inner();

    let padding = BLOCK_PADDING - (BLOCK_HEADER_LEN + read_size) % BLOCK_PADDING;
    input
        .seek(SeekFrom::Current(padding as i64))
        .map_err(CharaError::DatSeek)?;

    Ok(())
}

fn read_plain_file(mut input: impl Read + Seek) -> Result<Box<[u8]>, CharaError> {
    const FILE_TYPE_PLAIN: u32 = 2;

    #[binread]
    #[br(little)]
    struct FileHeader {
        len: u32,
        file_type: u32,
        data_len: u32,
        _unk0: u32,
        _unk1: u32,
        #[allow(dead_code)] // linter false positive
        chunks_num: u32,
        #[br(count = chunks_num)]
        chunks: Vec<ChunkHeader>,
    }

    #[binread]
    #[br(little)]
    struct ChunkHeader {
        offset: u32,
        _unk0: u32,
    }

    let offset = input.stream_position().map_err(CharaError::DatSeek)?;
    let header = FileHeader::read(&mut input).map_err(CharaError::DatFileHeader)?;
    if header.file_type != FILE_TYPE_PLAIN {
        return Err(CharaError::DatNotPlain(header.file_type));
    }

    let mut data = Cursor::new(Vec::with_capacity(header.data_len as usize));
    for chunk in header.chunks {
        let chunk_offset = offset + header.len as u64 + chunk.offset as u64;
        input
            .seek(SeekFrom::Start(chunk_offset))
            .map_err(CharaError::DatSeek)?;
        read_block(&mut input, &mut data)?;
    }

    Ok(data.into_inner().into_boxed_slice())
}

/// Location of one inner file within a `.dat` file.
pub struct FilePtr {
    path: PathBuf,
    offset: u64,
}

impl FilePtr {
    pub fn read(&self) -> Result<Box<[u8]>, CharaError> {
        let mut fd = File::open(&self.path).map_err(CharaError::IO)?;
        fd.seek(SeekFrom::Start(self.offset))
            .map_err(CharaError::DatSeek)?;
        read_plain_file(fd)
    }
}

/// A game install's `sqpack` directory. Indexes are loaded lazily, once.
#[derive(Debug)]
pub struct Repository {
    base_path: PathBuf,
    indexes: HashMap<PackId, OnceCell<Arc<Index>>>,
}

impl Debug for Index {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("Index {{ {} entries }}", self.entries.len()))
    }
}

impl Repository {
    pub fn open(base_path: impl AsRef<Path>) -> Result<Arc<Self>, CharaError> {
        let base_path = base_path.as_ref().to_owned();
        let mut indexes = HashMap::new();

        for repo_entry in std::fs::read_dir(&base_path).map_err(CharaError::IO)? {
            let repo_entry = repo_entry.map_err(CharaError::IO)?;
            if !repo_entry.file_type().map_err(CharaError::IO)?.is_dir() {
                continue;
            }
            for exp_entry in std::fs::read_dir(repo_entry.path()).map_err(CharaError::IO)? {
                let exp_entry = exp_entry.map_err(CharaError::IO)?;
                let file_name = exp_entry
                    .file_name()
                    .into_string()
                    .map_err(|_| CharaError::PackIdRepoFile)?;
                if file_name.ends_with(".index2") {
                    if let Ok(packid) = PackId::from_repo_path(file_name) {
                        indexes.insert(packid, OnceCell::new());
                    }
                }
            }
        }

        Ok(Arc::new(Self { base_path, indexes }))
    }

    fn index_for(&self, packid: PackId) -> Result<Option<Arc<Index>>, CharaError> {
        self.indexes
            .get(&packid)
            .map(|cell| {
                cell.get_or_try_init(|| {
                    let index = Index::load(self.base_path.join(packid.index2_path()))?;
                    Ok(Arc::new(index))
                })
                .cloned()
            })
            .transpose()
    }

    pub fn find(&self, path: &str) -> Result<Option<FilePtr>, CharaError> {
        let packid = PackId::from_inner_path(path)?;
        let index = self.index_for(packid)?;

        Ok(index.and_then(|index| {
            index.find(path).map(|entry| FilePtr {
                path: self.base_path.join(packid.dat_path(entry.datnum)),
                offset: entry.offset,
            })
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packid_from_inner_path() {
        assert!(PackId::from_inner_path("foobar/ffxiv/file").is_err());

        assert_eq!(
            PackId::from_inner_path("exd/charamaketype.exh").unwrap(),
            PackId::new(0x0a, 0, 0)
        );
        assert_eq!(
            PackId::from_inner_path("chara/xls/charamake/human.cmp").unwrap(),
            PackId::new(0x04, 0, 0)
        );
        assert_eq!(
            PackId::from_inner_path("common/ex2/testdir/testfile").unwrap(),
            PackId::new(0, 2, 0)
        );
        assert_eq!(
            PackId::from_inner_path("sound/ex1/1f_testfile").unwrap(),
            PackId::new(0x07, 1, 0x1f)
        );
    }

    #[test]
    fn packid_from_repo_path() {
        let id = PackId::from_repo_path("0a0000.win32.index2").unwrap();
        assert_eq!(id, PackId::new(0x0a, 0, 0));
        assert_eq!(id.index2_path(), PathBuf::from("ffxiv/0a0000.win32.index2"));
        assert_eq!(id.dat_path(0), PathBuf::from("ffxiv/0a0000.win32.dat0"));

        assert!(PackId::from_repo_path("readme.txt").is_err());
    }
}
