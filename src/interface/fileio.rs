use binrw::Endian;

use crate::interface::error::MatObjError;
use crate::interface::matfile::MatFile;
use crate::interface::variable::MatVariable;
use crate::parser::subsystem::Subsystem;

/// Options controlling a load.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Skip the well-known class converters and return every resolved object as a raw
    /// `{class, properties}` pair.
    pub raw_data: bool,
    /// Keep sparse variables in the map; their coordinate-list form is available through
    /// [`crate::SparseArray::to_triplets`].
    pub spmatrix: bool,
    /// Restrict the result to the named variables.
    pub variable_names: Option<Vec<String>>,
    /// Ask the primitive reader to collapse character rows into strings.
    pub chars_as_strings: bool,
    /// Codec hint for `u16` character data in the primitive reader.
    pub uint16_codec: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            raw_data: false,
            spmatrix: true,
            variable_names: None,
            chars_as_strings: true,
            uint16_codec: "utf-16".to_string(),
        }
    }
}

/// Collaborator seam to a MAT v5 / v7.3 primitive reader.
///
/// The primitive reader owns everything below the object layer: file access, decompression,
/// numeric/cell/struct/sparse decoding. This crate only asks it for two things.
pub trait PrimitiveReader {
    /// Read all top-level variables of the MAT-file at `path`, together with the raw bytes of
    /// the `__function_workspace__` variable when the file carries one.
    fn read_matfile(
        &mut self,
        path: &str,
        opts: &LoadOptions,
    ) -> Result<(MatFile, Option<Vec<u8>>), MatObjError>;

    /// Parse the variable stream embedded in the function workspace. `data` starts after the
    /// 8-byte workspace header.
    fn read_workspace(
        &mut self,
        data: &[u8],
        endian: Endian,
        opts: &LoadOptions,
    ) -> Result<MatVariable, MatObjError>;
}

/// Recover the byte order of the subsystem stream from its first four bytes.
///
/// Bytes 2..4 spell `IM` on little-endian files and `MI` on big-endian files; the major
/// version byte next to them must be 1.
pub fn subsystem_byte_order(data: &[u8]) -> Result<Endian, MatObjError> {
    if data.len() < 8 {
        return Err(MatObjError::Malformed(
            "Subsystem stream shorter than its header".to_string(),
        ));
    }

    let (endian, v_major) = match data[2] {
        b'I' => (Endian::Little, data[1]),
        b'M' => (Endian::Big, data[0]),
        _ => {
            return Err(MatObjError::Malformed(
                "Subsystem stream carries no byte-order mark".to_string(),
            ));
        }
    };

    if v_major != 1 {
        return Err(MatObjError::UnsupportedVersion(format!(
            "subsystem stream version {}",
            v_major
        )));
    }

    Ok(endian)
}

/// Load MAT-file data from file and resolve every MCOS class instance in it.
///
/// Drives `reader` for the primitive layers, then decodes the object subsystem:
/// - without a `__function_workspace__` variable the primitive result is returned unchanged;
/// - opaque placeholders with type system `MCOS` are replaced by resolved objects, other type
///   systems are warned about and skipped;
/// - the remaining variables are scanned for object references nested in cells and structs.
pub fn load_matfile_objects<R: PrimitiveReader>(
    path: &str,
    reader: &mut R,
    opts: &LoadOptions,
) -> Result<MatFile, MatObjError> {
    let (mut matfile, workspace) = reader.read_matfile(path, opts)?;

    if let Some(names) = &opts.variable_names {
        matfile.retain_names(names);
    }

    let Some(ssdata) = workspace else {
        return Ok(matfile);
    };

    let endian = subsystem_byte_order(&ssdata)?;
    let workspace_value = reader.read_workspace(&ssdata[8..], endian, opts)?;
    resolve_opaque_variables(&mut matfile, workspace_value, endian, opts)?;

    Ok(matfile)
}

/// Resolve the opaque variables of an already-read variable map against a decoded function
/// workspace.
pub fn resolve_opaque_variables(
    matfile: &mut MatFile,
    workspace: MatVariable,
    endian: Endian,
    opts: &LoadOptions,
) -> Result<(), MatObjError> {
    let Some(subsystem) = Subsystem::from_workspace(workspace, endian, opts)? else {
        log::warn!("Function workspace carries no MCOS member; leaving variables unresolved");
        return Ok(());
    };

    for (name, value) in matfile.iter_mut() {
        match value {
            MatVariable::Opaque(op) => {
                if op.type_system != "MCOS" {
                    log::warn!(
                        "Type system {} of variable {} is not supported. Skipping.",
                        op.type_system,
                        name
                    );
                    continue;
                }
                *value = subsystem.read_mcos_object(&op.metadata)?;
            }
            _ => {
                let taken = std::mem::replace(value, MatVariable::Null);
                *value = subsystem.resolve_references(taken)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_order_probe() {
        assert_eq!(
            subsystem_byte_order(&[0x00, 0x01, b'I', b'M', 0, 0, 0, 0]).unwrap(),
            Endian::Little
        );
        assert_eq!(
            subsystem_byte_order(&[0x01, 0x00, b'M', b'I', 0, 0, 0, 0]).unwrap(),
            Endian::Big
        );

        assert!(matches!(
            subsystem_byte_order(&[0x00, 0x02, b'I', b'M', 0, 0, 0, 0]),
            Err(MatObjError::UnsupportedVersion(_))
        ));
        assert!(matches!(
            subsystem_byte_order(&[0, 0, 0, 0, 0, 0, 0, 0]),
            Err(MatObjError::Malformed(_))
        ));
        assert!(matches!(
            subsystem_byte_order(&[b'I']),
            Err(MatObjError::Malformed(_))
        ));
    }
}
