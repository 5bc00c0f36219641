//! Shared fixture builder: assembles FileWrapper blobs and the surrounding function
//! workspace value the way a primitive MAT reader would hand them over.

#![allow(dead_code)]

use binrw::Endian;

use matobj::{
    CellArray, LoadOptions, MatFile, MatObjError, MatVariable, MatlabType, NumericArray,
    OpaqueVariable, PrimitiveReader, Structure, StructureArray,
};

/// One object table row: `(class_id, type1_id, type2_id, dep_id)`.
pub type ObjectSpec = (u32, u32, u32, u32);

/// One property block: `(field_name_idx, field_kind, field_value)` triples.
pub type PropertyBlock = Vec<(u32, u32, u32)>;

/// Everything needed to assemble a subsystem workspace.
#[derive(Default)]
pub struct SubsystemFixture {
    pub names: Vec<String>,
    /// Per class id 1..: `(handle_name_idx, class_name_idx)` into the name table.
    pub classes: Vec<(u32, u32)>,
    pub objects: Vec<ObjectSpec>,
    pub type1_blocks: Vec<PropertyBlock>,
    pub type2_blocks: Vec<PropertyBlock>,
    pub handle_blocks: Vec<Vec<u32>>,
    /// The property-value array (cells 2..len-3 of the metadata cell).
    pub prop_values: Vec<MatVariable>,
    /// Default property maps per class id 1..; missing classes get an empty map.
    pub defaults: Vec<Structure>,
}

impl SubsystemFixture {
    pub fn new(names: &[&str]) -> Self {
        Self {
            names: names.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    /// 1-based name index of `name`.
    pub fn name_idx(&self, name: &str) -> u32 {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|p| p as u32 + 1)
            .expect("fixture name not registered")
    }

    fn push_u32(buf: &mut Vec<u8>, value: u32, endian: Endian) {
        match endian {
            Endian::Little => buf.extend(value.to_le_bytes()),
            Endian::Big => buf.extend(value.to_be_bytes()),
        }
    }

    fn push_blocks(buf: &mut Vec<u8>, blocks: &[Vec<u32>], entry_words: usize, endian: Endian) {
        // Padding block at the region start
        Self::push_u32(buf, 0, endian);
        Self::push_u32(buf, 0, endian);

        for block in blocks {
            let nblocks = (block.len() / entry_words) as u32;
            Self::push_u32(buf, nblocks, endian);
            for &word in block {
                Self::push_u32(buf, word, endian);
            }
            if (nblocks as usize * entry_words * 4 + 4) % 8 != 0 {
                Self::push_u32(buf, 0, endian);
            }
        }
    }

    /// Assemble the FileWrapper blob (table-of-contents version 4).
    pub fn build_blob(&self, endian: Endian) -> Vec<u8> {
        let mut names_bytes: Vec<u8> = Vec::new();
        for name in &self.names {
            names_bytes.extend(name.as_bytes());
            names_bytes.push(0);
        }
        while names_bytes.len() % 8 != 0 {
            names_bytes.push(0);
        }

        let mut class_region: Vec<u8> = Vec::new();
        for _ in 0..4 {
            Self::push_u32(&mut class_region, 0, endian);
        }
        for &(handle_idx, class_idx) in &self.classes {
            Self::push_u32(&mut class_region, handle_idx, endian);
            Self::push_u32(&mut class_region, class_idx, endian);
            Self::push_u32(&mut class_region, 0, endian);
            Self::push_u32(&mut class_region, 0, endian);
        }

        let flatten = |blocks: &[PropertyBlock]| -> Vec<Vec<u32>> {
            blocks
                .iter()
                .map(|block| {
                    block
                        .iter()
                        .flat_map(|&(name, kind, value)| [name, kind, value])
                        .collect()
                })
                .collect()
        };

        let mut type1_region: Vec<u8> = Vec::new();
        Self::push_blocks(&mut type1_region, &flatten(&self.type1_blocks), 3, endian);

        let mut object_region: Vec<u8> = Vec::new();
        for _ in 0..6 {
            Self::push_u32(&mut object_region, 0, endian);
        }
        for &(class_id, type1_id, type2_id, dep_id) in &self.objects {
            for word in [class_id, 0, 0, type1_id, type2_id, dep_id] {
                Self::push_u32(&mut object_region, word, endian);
            }
        }

        let mut type2_region: Vec<u8> = Vec::new();
        Self::push_blocks(&mut type2_region, &flatten(&self.type2_blocks), 3, endian);

        let mut handle_region: Vec<u8> = Vec::new();
        let handle_blocks: Vec<Vec<u32>> = self.handle_blocks.clone();
        Self::push_blocks(&mut handle_region, &handle_blocks, 1, endian);

        let names_end = 8 + 8 * 4 + names_bytes.len() as u32;
        let type1_start = names_end + class_region.len() as u32;
        let object_start = type1_start + type1_region.len() as u32;
        let type2_start = object_start + object_region.len() as u32;
        let handle_start = type2_start + type2_region.len() as u32;
        let end = handle_start + handle_region.len() as u32;

        let mut blob: Vec<u8> = Vec::new();
        Self::push_u32(&mut blob, 4, endian);
        Self::push_u32(&mut blob, 0, endian);
        for offset in [
            names_end,
            type1_start,
            object_start,
            type2_start,
            handle_start,
            end,
            0,
            0,
        ] {
            Self::push_u32(&mut blob, offset, endian);
        }
        blob.extend(names_bytes);
        blob.extend(class_region);
        blob.extend(type1_region);
        blob.extend(object_region);
        blob.extend(type2_region);
        blob.extend(handle_region);

        blob
    }

    /// Assemble the decoded function workspace value.
    pub fn workspace(&self, endian: Endian) -> MatVariable {
        let blob = self.build_blob(endian);
        let blob_len = blob.len();
        let blob_array = NumericArray::new(vec![blob_len, 1], MatlabType::from(blob), None)
            .expect("fixture blob array");

        let mut cells: Vec<MatVariable> = Vec::new();
        cells.push(MatVariable::NumericArray(blob_array));
        cells.push(MatVariable::NumericArray(NumericArray::empty()));
        cells.extend(self.prop_values.iter().cloned());
        cells.push(MatVariable::NumericArray(NumericArray::empty()));
        cells.push(MatVariable::NumericArray(NumericArray::empty()));

        let mut default_elements: Vec<MatVariable> =
            vec![MatVariable::Structure(Structure::empty())];
        for class_idx in 0..self.classes.len() {
            let defaults = self
                .defaults
                .get(class_idx)
                .cloned()
                .unwrap_or_else(Structure::empty);
            default_elements.push(MatVariable::Structure(defaults));
        }
        let defaults_array = StructureArray::from_structures(
            vec![default_elements.len(), 1],
            default_elements,
        )
        .expect("fixture defaults array");
        cells.push(MatVariable::StructureArray(defaults_array));

        let n_cells = cells.len();
        let metadata = CellArray::new(vec![n_cells, 1], cells).expect("fixture metadata cell");

        let opaque = OpaqueVariable {
            type_system: "MCOS".to_string(),
            class_name: "FileWrapper__".to_string(),
            metadata: Box::new(MatVariable::CellArray(metadata)),
        };

        let mut workspace = Structure::empty();
        workspace.insert("MCOS", MatVariable::Opaque(opaque));
        MatVariable::Structure(workspace)
    }
}

/// Build a u32 reference sentinel for an object array.
pub fn object_reference(dims: &[usize], object_ids: &[u32], class_id: u32) -> MatVariable {
    let mut data = vec![0xDD00_0000u32, dims.len() as u32];
    data.extend(dims.iter().map(|&d| d as u32));
    data.extend_from_slice(object_ids);
    data.push(class_id);

    let rows = data.len();
    MatVariable::NumericArray(
        NumericArray::new(vec![rows, 1], MatlabType::from(data), None).unwrap(),
    )
}

/// Wrap a reference sentinel as a top-level opaque variable.
pub fn opaque_variable(class_name: &str, metadata: MatVariable) -> MatVariable {
    MatVariable::Opaque(OpaqueVariable {
        type_system: "MCOS".to_string(),
        class_name: class_name.to_string(),
        metadata: Box::new(metadata),
    })
}

/// Pack strings into the u64 `string`-class payload.
pub fn string_payload(dims: &[usize], strings: &[&str], endian: Endian) -> MatVariable {
    let mut words = vec![1u64, dims.len() as u64];
    words.extend(dims.iter().map(|&d| d as u64));

    let units: Vec<Vec<u16>> = strings.iter().map(|s| s.encode_utf16().collect()).collect();
    words.extend(units.iter().map(|u| u.len() as u64));

    let mut bytes: Vec<u8> = Vec::new();
    for u in &units {
        for unit in u {
            match endian {
                Endian::Little => bytes.extend(unit.to_le_bytes()),
                Endian::Big => bytes.extend(unit.to_be_bytes()),
            }
        }
    }
    while bytes.len() % 8 != 0 {
        bytes.push(0);
    }
    words.extend(bytes.chunks_exact(8).map(|chunk| {
        let chunk: [u8; 8] = chunk.try_into().unwrap();
        match endian {
            Endian::Little => u64::from_le_bytes(chunk),
            Endian::Big => u64::from_be_bytes(chunk),
        }
    }));

    let cols = words.len();
    MatVariable::NumericArray(
        NumericArray::new(vec![1, cols], MatlabType::from(words), None).unwrap(),
    )
}

/// The 8-byte workspace header in front of the embedded variable stream.
pub fn workspace_header(endian: Endian) -> Vec<u8> {
    match endian {
        Endian::Little => vec![0x00, 0x01, b'I', b'M', 0, 0, 0, 0],
        Endian::Big => vec![0x01, 0x00, b'M', b'I', 0, 0, 0, 0],
    }
}

/// Primitive-reader stand-in handing out canned values.
pub struct StubReader {
    pub matfile: Option<MatFile>,
    pub workspace_bytes: Option<Vec<u8>>,
    pub workspace_value: Option<MatVariable>,
}

impl StubReader {
    pub fn without_subsystem(matfile: MatFile) -> Self {
        Self {
            matfile: Some(matfile),
            workspace_bytes: None,
            workspace_value: None,
        }
    }

    pub fn with_subsystem(matfile: MatFile, endian: Endian, workspace: MatVariable) -> Self {
        Self {
            matfile: Some(matfile),
            workspace_bytes: Some(workspace_header(endian)),
            workspace_value: Some(workspace),
        }
    }
}

impl PrimitiveReader for StubReader {
    fn read_matfile(
        &mut self,
        _path: &str,
        _opts: &LoadOptions,
    ) -> Result<(MatFile, Option<Vec<u8>>), MatObjError> {
        Ok((
            self.matfile.take().expect("matfile already taken"),
            self.workspace_bytes.clone(),
        ))
    }

    fn read_workspace(
        &mut self,
        _data: &[u8],
        _endian: Endian,
        _opts: &LoadOptions,
    ) -> Result<MatVariable, MatObjError> {
        Ok(self
            .workspace_value
            .take()
            .expect("workspace value already taken"))
    }
}
