//! Decoder for the MCOS object subsystem.
//!
//! The subsystem arrives as the decoded `__function_workspace__` value: a scalar structure
//! whose `MCOS` member holds an opaque FileWrapper. Its metadata is a cell array with
//!
//! - cell 0: the FileWrapper blob ([`filewrapper::FileWrapper`]),
//! - cells `2 .. len-3`: the property-value array, indexed by property blocks,
//! - the last three cells: two parallel per-class arrays (unused) and the default-property
//!   table.
//!
//! All tables are built once and shared immutably for the duration of a load.

pub mod filewrapper;
pub mod resolver;
pub mod walker;

use std::cell::RefCell;
use std::collections::HashSet;

use binrw::Endian;

use crate::interface::error::MatObjError;
use crate::interface::fileio::LoadOptions;
use crate::interface::helper::as_scalar_struct;
use crate::interface::variable::MatVariable;
use crate::parser::subsystem::filewrapper::FileWrapper;

/// Decoded subsystem state: the FileWrapper tables, the property-value array and the
/// default-property table.
#[derive(Debug)]
pub struct Subsystem {
    pub(crate) wrapper: FileWrapper,
    pub(crate) prop_values: Vec<MatVariable>,
    defaults: MatVariable,
    pub(crate) opts: LoadOptions,
    /// Object ids currently being resolved, for cycle breaking.
    pub(crate) in_flight: RefCell<HashSet<u32>>,
}

impl Subsystem {
    /// Build the decoder from a decoded function workspace.
    ///
    /// Returns `Ok(None)` when the workspace carries no `MCOS` member (e.g. a file holding
    /// only Java objects); such a file is left unresolved by the caller.
    pub fn from_workspace(
        workspace: MatVariable,
        endian: Endian,
        opts: &LoadOptions,
    ) -> Result<Option<Self>, MatObjError> {
        let Some(ws) = as_scalar_struct(&workspace) else {
            return Err(MatObjError::Malformed(
                "Function workspace is not a scalar structure".to_string(),
            ));
        };

        let Some(mcos) = ws.get("MCOS") else {
            return Ok(None);
        };

        let metadata = match mcos {
            MatVariable::Opaque(op) => op.metadata.as_ref(),
            // Some primitive readers hand the metadata cell array over directly
            MatVariable::CellArray(_) => mcos,
            _ => {
                return Err(MatObjError::Malformed(
                    "MCOS member is neither opaque nor a cell array".to_string(),
                ));
            }
        };

        let MatVariable::CellArray(cells) = metadata else {
            return Err(MatObjError::Malformed(
                "FileWrapper metadata is not a cell array".to_string(),
            ));
        };
        if cells.value.len() < 5 {
            return Err(MatObjError::Malformed(format!(
                "FileWrapper cell array has {} cells, expected at least 5",
                cells.value.len()
            )));
        }

        let blob = match &cells.value[0] {
            MatVariable::NumericArray(arr) => arr.real_to_vec::<u8>().ok_or_else(|| {
                MatObjError::Malformed("FileWrapper blob is not u8 data".to_string())
            })?,
            _ => {
                return Err(MatObjError::Malformed(
                    "FileWrapper blob cell is not a numeric array".to_string(),
                ));
            }
        };

        let wrapper = FileWrapper::parse(blob, endian)?;
        let prop_values = cells.value[2..cells.value.len() - 3].to_vec();
        let defaults = cells.value[cells.value.len() - 1].clone();

        Ok(Some(Self {
            wrapper,
            prop_values,
            defaults,
            opts: opts.clone(),
            in_flight: RefCell::new(HashSet::new()),
        }))
    }

    /// Default property map for a 1-based class id, if the class has one.
    ///
    /// The default table carries one row per class including the zero row, so the class id
    /// doubles as the linear index.
    pub(crate) fn default_properties(&self, class_id: u32) -> Option<MatVariable> {
        match &self.defaults {
            MatVariable::StructureArray(sa) => sa.value.get(class_id as usize).cloned(),
            _ => None,
        }
    }

    /// Resolve one opaque metadata payload: a u32 reference sentinel or an
    /// enumeration-instance structure. Unknown payload shapes warn and are returned
    /// unchanged.
    pub fn read_mcos_object(&self, metadata: &MatVariable) -> Result<MatVariable, MatObjError> {
        if let Some(s) = as_scalar_struct(metadata) {
            if walker::is_enumeration_instance(s) {
                return self.read_mcos_enumeration(s);
            }
            log::warn!("Couldn't read MCOS object type, returning object metadata");
            return Ok(metadata.clone());
        }

        if let MatVariable::NumericArray(arr) = metadata {
            if walker::check_object_reference(arr) {
                return self.read_normal_mcos(arr);
            }
        }

        log::warn!("Couldn't read MCOS object type, returning object metadata");
        Ok(metadata.clone())
    }
}
