//! Offset-indexed parser for the FileWrapper metadata blob.
//!
//! The blob opens with a table-of-contents flag and a list of region offsets, all relative to
//! the blob start. Six regions follow the NUL-delimited name table:
//!
//! 1. class descriptors (16 bytes each, one zero entry ahead of class id 1),
//! 2. type-1 property blocks,
//! 3. object descriptors (24 bytes each, one zero entry ahead of object id 1),
//! 4. type-2 property blocks,
//! 5. handle-attachment blocks,
//! 6. region end.
//!
//! Property and handle blocks share one scheme: a `u32` entry count followed by the entries,
//! padded to an 8-byte boundary.

use binrw::io::Cursor;
use binrw::{BinReaderExt, Endian, binrw};

use crate::interface::error::MatObjError;

/// 16-byte class table record.
#[binrw]
#[derive(Debug, Clone)]
pub struct ClassDescriptor {
    pub handle_name_idx: u32,
    pub class_name_idx: u32,
    _f0: u32,
    _f1: u32,
}

/// 24-byte object table record.
#[binrw]
#[derive(Debug, Clone)]
pub struct ObjectDescriptor {
    pub class_id: u32,
    _f0: u32,
    _f1: u32,
    pub type1_id: u32,
    pub type2_id: u32,
    pub dep_id: u32,
}

/// 12-byte property block entry.
#[binrw]
#[derive(Debug, Clone)]
pub struct PropertyEntry {
    pub name_idx: u32,
    pub kind: u32,
    pub value: u32,
}

/// The two parallel property-block regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyRegion {
    Type1,
    Type2,
}

const CLASS_ENTRY_BYTES: u64 = 16;
const OBJECT_ENTRY_BYTES: u64 = 24;
const PROPERTY_ENTRY_BYTES: u64 = 12;
const HANDLE_ENTRY_BYTES: u64 = 4;

/// Parsed FileWrapper blob: name table plus the region offsets needed for random access into
/// the descriptor tables and block streams.
#[derive(Debug)]
pub struct FileWrapper {
    data: Vec<u8>,
    endian: Endian,
    names: Vec<String>,
    offsets: [u32; 6],
}

impl FileWrapper {
    /// Parse the blob header: table-of-contents flag, region offsets and the name table.
    pub fn parse(data: Vec<u8>, endian: Endian) -> Result<Self, MatObjError> {
        let mut cursor = Cursor::new(data.as_slice());
        let toc_flag: u32 = cursor.read_type(endian)?;
        if !(2..=4).contains(&toc_flag) {
            return Err(MatObjError::UnsupportedVersion(format!(
                "FileWrapper table-of-contents flag {}",
                toc_flag
            )));
        }
        let num_offsets: u32 = if toc_flag == 4 { 8 } else { 6 };

        cursor.set_position(8);
        let mut offsets = [0u32; 6];
        for offset in offsets.iter_mut() {
            *offset = cursor.read_type(endian)?;
        }

        let names_start = (8 + num_offsets * 4) as usize;
        let names_end = offsets[0] as usize;
        if names_start > names_end || names_end > data.len() {
            return Err(MatObjError::Malformed(format!(
                "Name table range {}..{} exceeds blob of {} bytes",
                names_start,
                names_end,
                data.len()
            )));
        }

        let names = data[names_start..names_end]
            .split(|&b| b == 0)
            .filter(|s| !s.is_empty())
            .map(|s| {
                if !s.is_ascii() {
                    return Err(MatObjError::Malformed(
                        "Name table contains non-ASCII bytes".to_string(),
                    ));
                }
                Ok(String::from_utf8_lossy(s).into_owned())
            })
            .collect::<Result<Vec<String>, MatObjError>>()?;

        Ok(Self {
            data,
            endian,
            names,
            offsets,
        })
    }

    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Resolve a 1-based name index; index 0 means "absent" and is rejected here.
    pub fn name(&self, idx: u32) -> Result<&str, MatObjError> {
        if idx == 0 || idx as usize > self.names.len() {
            return Err(MatObjError::LookupFailure(format!(
                "Name index {} out of range (1..={})",
                idx,
                self.names.len()
            )));
        }
        Ok(&self.names[idx as usize - 1])
    }

    /// Class descriptor for a 1-based class id. The region starts with a zero entry, so the id
    /// doubles as the record index.
    pub fn class_descriptor(&self, class_id: u32) -> Result<ClassDescriptor, MatObjError> {
        let offset = self.offsets[0] as u64 + class_id as u64 * CLASS_ENTRY_BYTES;
        let mut cursor = self.cursor_at(offset, CLASS_ENTRY_BYTES)?;
        Ok(cursor.read_type(self.endian)?)
    }

    /// Class name for a 1-based class id, `handle.class` for handle classes.
    pub fn class_name(&self, class_id: u32) -> Result<String, MatObjError> {
        let desc = self.class_descriptor(class_id)?;
        let class_name = self.name(desc.class_name_idx)?;
        if desc.handle_name_idx > 0 {
            let handle_name = self.name(desc.handle_name_idx)?;
            Ok(format!("{}.{}", handle_name, class_name))
        } else {
            Ok(class_name.to_string())
        }
    }

    /// Object descriptor for a 1-based object id.
    pub fn object_descriptor(&self, object_id: u32) -> Result<ObjectDescriptor, MatObjError> {
        let offset = self.offsets[2] as u64 + object_id as u64 * OBJECT_ENTRY_BYTES;
        let mut cursor = self.cursor_at(offset, OBJECT_ENTRY_BYTES)?;
        Ok(cursor.read_type(self.endian)?)
    }

    /// Property entries of the block `block_id` in the chosen region.
    pub fn property_entries(
        &self,
        block_id: u32,
        region: PropertyRegion,
    ) -> Result<Vec<PropertyEntry>, MatObjError> {
        let region_start = match region {
            PropertyRegion::Type1 => self.offsets[1],
            PropertyRegion::Type2 => self.offsets[3],
        };
        let (offset, nblocks) =
            self.block_position(block_id, region_start as u64, PROPERTY_ENTRY_BYTES)?;

        let mut cursor = self.cursor_at(offset, nblocks as u64 * PROPERTY_ENTRY_BYTES)?;
        let mut entries = Vec::with_capacity(nblocks as usize);
        for _ in 0..nblocks {
            entries.push(cursor.read_type(self.endian)?);
        }
        Ok(entries)
    }

    /// Handle type-2 ids attached under a 1-based dependency id.
    pub fn handle_entries(&self, dep_id: u32) -> Result<Vec<u32>, MatObjError> {
        let (offset, nblocks) =
            self.block_position(dep_id, self.offsets[4] as u64, HANDLE_ENTRY_BYTES)?;

        let mut cursor = self.cursor_at(offset, nblocks as u64 * HANDLE_ENTRY_BYTES)?;
        let mut entries = Vec::with_capacity(nblocks as usize);
        for _ in 0..nblocks {
            entries.push(cursor.read_type::<u32>(self.endian)?);
        }
        Ok(entries)
    }

    /// Scan the object table for the first descriptor carrying `type2_id`; the hit's record
    /// index is the handle's object id.
    pub fn find_handle_object(&self, type2_id: u32) -> Result<(u32, u32), MatObjError> {
        let start = self.offsets[2] as u64;
        let end = self.offsets[3] as u64;

        let mut idx = 0u32;
        let mut offset = start;
        while offset + OBJECT_ENTRY_BYTES <= end {
            let mut cursor = self.cursor_at(offset, OBJECT_ENTRY_BYTES)?;
            let desc: ObjectDescriptor = cursor.read_type(self.endian)?;
            if desc.type2_id == type2_id {
                return Ok((desc.class_id, idx));
            }
            idx += 1;
            offset += OBJECT_ENTRY_BYTES;
        }

        Err(MatObjError::LookupFailure(format!(
            "Handle class instance not found for type2 id {}",
            type2_id
        )))
    }

    /// Walk `block_id` length-prefixed blocks from `region_start` and return the position and
    /// entry count of the addressed block. Block 0 is the padding block at the region start.
    fn block_position(
        &self,
        block_id: u32,
        region_start: u64,
        entry_bytes: u64,
    ) -> Result<(u64, u32), MatObjError> {
        let mut remaining = block_id;
        let mut offset = region_start;
        loop {
            let mut cursor = self.cursor_at(offset, 4)?;
            let nblocks: u32 = cursor.read_type(self.endian)?;
            if remaining == 0 {
                return Ok((offset + 4, nblocks));
            }
            offset += 4 + nblocks as u64 * entry_bytes;
            // Blocks are padded to 8-byte boundaries
            if (nblocks as u64 * entry_bytes + 4) % 8 != 0 {
                offset += 4;
            }
            remaining -= 1;
        }
    }

    fn cursor_at(&self, offset: u64, size: u64) -> Result<Cursor<&[u8]>, MatObjError> {
        if offset + size > self.data.len() as u64 {
            return Err(MatObjError::Malformed(format!(
                "Read of {} bytes at offset {} exceeds blob of {} bytes",
                size,
                offset,
                self.data.len()
            )));
        }
        let mut cursor = Cursor::new(self.data.as_slice());
        cursor.set_position(offset);
        Ok(cursor)
    }
}
