// Copyright 2023 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The binary GNU Gettext MO format.
//!
//! A MO file starts with a header of seven 32-bit integers, followed
//! by a table of (length, offset) pairs for the original strings and
//! a second table for the translations. The strings themselves follow
//! the tables, each terminated by a NUL byte. We never write the
//! optional hash table: runtimes fall back to a binary search over
//! the sorted original strings.

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use byteorder::{BigEndian, ByteOrder, LittleEndian, WriteBytesExt};
use log::debug;

/// The magic number at the start of every MO file.
pub const MAGIC: u32 = 0x950412de;

/// Size of the fixed header in bytes.
pub const HEADER_SIZE: usize = 7 * 4;

/// Size of one (length, offset) pair in the string tables.
const TABLE_ENTRY_SIZE: usize = 2 * 4;

/// Serialize a catalog into the little-endian MO format.
///
/// The entries are written in the order of [`Catalog::iter`], which
/// sorts them by the bytes of their keys.
///
/// # Examples
///
/// ```
/// use gettext_msgfmt::catalog::Catalog;
/// use gettext_msgfmt::mo::{serialize, MoCatalog};
///
/// let mut catalog = Catalog::new();
/// catalog.insert(String::from("Hello"), String::from("Bonjour"));
/// let bytes = serialize(&catalog).unwrap();
///
/// let mo = MoCatalog::parse(&bytes).unwrap();
/// assert_eq!(mo.len(), 2);
/// assert_eq!(mo.get("Hello"), Some("Bonjour"));
/// ```
pub fn serialize(catalog: &Catalog) -> Result<Vec<u8>> {
    let count = catalog.len();
    let table_size = count * TABLE_ENTRY_SIZE;
    let originals_offset = HEADER_SIZE;
    let translations_offset = originals_offset + table_size;
    let pool_offset = translations_offset + table_size;

    let mut pool = Vec::new();
    let mut add_string = |text: &str| {
        let entry = (text.len(), pool_offset + pool.len());
        pool.extend_from_slice(text.as_bytes());
        pool.push(0);
        entry
    };
    let originals = catalog
        .iter()
        .map(|(key, _)| add_string(key))
        .collect::<Vec<_>>();
    let translations = catalog
        .iter()
        .map(|(_, value)| add_string(value))
        .collect::<Vec<_>>();

    // Every length and offset is bounded by the total size.
    let total_size = pool_offset + pool.len();
    let field = |value: usize| u32::try_from(value).map_err(|_| Error::TooLarge(total_size));

    let mut output = Vec::with_capacity(total_size);
    output.write_u32::<LittleEndian>(MAGIC)?;
    output.write_u32::<LittleEndian>(0)?; // revision
    output.write_u32::<LittleEndian>(field(count)?)?;
    output.write_u32::<LittleEndian>(field(originals_offset)?)?;
    output.write_u32::<LittleEndian>(field(translations_offset)?)?;
    output.write_u32::<LittleEndian>(0)?; // hash table size
    output.write_u32::<LittleEndian>(0)?; // hash table offset
    for (length, offset) in originals.into_iter().chain(translations) {
        output.write_u32::<LittleEndian>(field(length)?)?;
        output.write_u32::<LittleEndian>(field(offset)?)?;
    }
    output.extend_from_slice(&pool);

    debug!("Serialized {count} entries into {} bytes", output.len());
    Ok(output)
}

/// The contents of a MO file.
///
/// Entries are kept in the order of the file's tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoCatalog {
    entries: Vec<(String, String)>,
}

impl MoCatalog {
    /// Decode a MO file in either byte order.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let magic = data
            .get(..4)
            .ok_or_else(|| Error::InvalidMo(String::from("file is too short")))?;
        if LittleEndian::read_u32(magic) == MAGIC {
            Self::parse_with::<LittleEndian>(data)
        } else if BigEndian::read_u32(magic) == MAGIC {
            Self::parse_with::<BigEndian>(data)
        } else {
            Err(Error::InvalidMo(format!(
                "bad magic number {:#010x}",
                LittleEndian::read_u32(magic)
            )))
        }
    }

    fn parse_with<B: ByteOrder>(data: &[u8]) -> Result<Self> {
        let revision = read_u32::<B>(data, 4)?;
        if revision >> 16 != 0 {
            return Err(Error::InvalidMo(format!(
                "unsupported revision {}.{}",
                revision >> 16,
                revision & 0xffff
            )));
        }
        let count = read_u32::<B>(data, 8)? as usize;
        let originals_offset = read_u32::<B>(data, 12)? as usize;
        let translations_offset = read_u32::<B>(data, 16)? as usize;
        for table_offset in [originals_offset, translations_offset] {
            let table_end = count
                .checked_mul(TABLE_ENTRY_SIZE)
                .and_then(|size| size.checked_add(table_offset));
            if !table_end.is_some_and(|end| end <= data.len()) {
                return Err(Error::InvalidMo(format!(
                    "table of {count} strings at offset {table_offset} exceeds the file"
                )));
            }
        }

        let entries = (0..count)
            .map(|idx| {
                let original = read_string::<B>(data, originals_offset + idx * TABLE_ENTRY_SIZE)?;
                let translation =
                    read_string::<B>(data, translations_offset + idx * TABLE_ENTRY_SIZE)?;
                Ok((original, translation))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { entries })
    }

    /// The catalog metadata, stored as the translation of the empty
    /// string.
    pub fn header(&self) -> Option<&str> {
        self.get("")
    }

    /// Find the translation of a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.iter()
            .find(|(original, _)| *original == key)
            .map(|(_, translation)| translation)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the entries in the order of the file.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(original, translation)| (original.as_str(), translation.as_str()))
    }
}

fn read_u32<B: ByteOrder>(data: &[u8], offset: usize) -> Result<u32> {
    offset
        .checked_add(4)
        .and_then(|end| data.get(offset..end))
        .map(B::read_u32)
        .ok_or_else(|| Error::InvalidMo(format!("unexpected end of file at offset {offset}")))
}

/// Read the string described by the table entry at `entry_offset`.
fn read_string<B: ByteOrder>(data: &[u8], entry_offset: usize) -> Result<String> {
    let length = read_u32::<B>(data, entry_offset)? as usize;
    let offset = read_u32::<B>(data, entry_offset + 4)? as usize;
    let out_of_range = || {
        Error::InvalidMo(format!(
            "string of {length} bytes at offset {offset} exceeds the file"
        ))
    };
    let end = offset.checked_add(length).ok_or_else(out_of_range)?;
    let bytes = data.get(offset..end).ok_or_else(out_of_range)?;
    if data.get(end) != Some(&0) {
        return Err(Error::InvalidMo(format!(
            "string at offset {offset} is not NUL-terminated"
        )));
    }
    String::from_utf8(bytes.to_vec()).map_err(|err| {
        Error::InvalidMo(format!("string at offset {offset} is not UTF-8: {err}"))
    })
}
