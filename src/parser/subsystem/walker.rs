//! Reference discovery: structural sentinel checks and the recursive walker that replaces
//! object references nested in decoded values.

use crate::interface::error::MatObjError;
use crate::interface::types::matlab_types::MatlabType;
use crate::interface::types::numeric_array::NumericArray;
use crate::interface::types::structure::Structure;
use crate::interface::variable::MatVariable;
use crate::parser::subsystem::Subsystem;

/// Magic heading every MCOS reference payload.
pub const OBJECT_REFERENCE_MAGIC: u32 = 0xDD00_0000;

/// Structural check for the u32 reference sentinel.
///
/// The magic alone is not sufficient: plain u32 data may start with it. The full layout
/// `[magic, ndims, dims.., object_ids.., class_id]` in a u32 column must be consistent,
/// including the trailing-length equation.
pub fn check_object_reference(arr: &NumericArray) -> bool {
    let MatlabType::U32(data) = &arr.value else {
        return false;
    };

    if data.len() < 6 {
        return false;
    }
    if arr.dim.len() != 2 || arr.dim[1] != 1 {
        return false;
    }
    if data[0] != OBJECT_REFERENCE_MAGIC {
        return false;
    }

    let ndims = data[1] as usize;
    if ndims <= 1 || data.len() < 2 + ndims {
        return false;
    }

    let dims = &data[2..2 + ndims];
    let total = dims.iter().try_fold(1usize, |acc, &d| {
        acc.checked_mul(d as usize).filter(|&t| t <= data.len())
    });
    let Some(total) = total else {
        return false;
    };
    if total == 0 || data.len() < 2 + ndims + total {
        return false;
    }

    let object_ids = &data[2 + ndims..2 + ndims + total];
    if object_ids.iter().any(|&id| id == 0) {
        return false;
    }
    if total + ndims + 3 != data.len() {
        return false;
    }

    let class_id = data[data.len() - 1];
    class_id > 0
}

/// Split a validated reference sentinel into `(dims, object_ids, class_id)`.
pub fn parse_object_reference(arr: &NumericArray) -> Option<(Vec<usize>, Vec<u32>, u32)> {
    if !check_object_reference(arr) {
        return None;
    }
    let MatlabType::U32(data) = &arr.value else {
        return None;
    };

    let ndims = data[1] as usize;
    let dims: Vec<usize> = data[2..2 + ndims].iter().map(|&d| d as usize).collect();
    let total: usize = dims.iter().product();
    let object_ids = data[2 + ndims..2 + ndims + total].to_vec();
    let class_id = data[data.len() - 1];

    Some((dims, object_ids, class_id))
}

/// Whether a scalar structure is the enumeration-instance metadata form. Dispatch is by
/// field presence; the upstream reader strips any type tag.
pub fn is_enumeration_instance(s: &Structure) -> bool {
    match s.get("EnumerationInstanceTag") {
        Some(MatVariable::NumericArray(tag)) => {
            tag.real_to_scalar::<u32>() == Some(OBJECT_REFERENCE_MAGIC)
        }
        _ => false,
    }
}

impl Subsystem {
    /// Recursively replace object references inside a decoded value.
    ///
    /// Cells, scalar structures and structure arrays are walked element by element; uniform
    /// u32 arrays matching the full sentinel layout are resolved in place. Everything else
    /// passes through unchanged.
    pub fn resolve_references(&self, value: MatVariable) -> Result<MatVariable, MatObjError> {
        match value {
            MatVariable::NumericArray(arr) => {
                if check_object_reference(&arr) {
                    self.read_normal_mcos(&arr)
                } else {
                    Ok(MatVariable::NumericArray(arr))
                }
            }
            MatVariable::Structure(s) => {
                if is_enumeration_instance(&s) {
                    return self.read_mcos_enumeration(&s);
                }
                let mut s = s;
                for (_, field) in s.iter_mut() {
                    let taken = std::mem::replace(field, MatVariable::Null);
                    *field = self.resolve_references(taken)?;
                }
                Ok(MatVariable::Structure(s))
            }
            MatVariable::StructureArray(mut sa) => {
                // A 1x1 struct array may itself be an enumeration payload
                let enumeration = sa.value.first().and_then(|element| match element {
                    MatVariable::Structure(s)
                        if sa.value.len() == 1 && is_enumeration_instance(s) =>
                    {
                        Some(s.clone())
                    }
                    _ => None,
                });
                if let Some(s) = enumeration {
                    return self.read_mcos_enumeration(&s);
                }

                for element in sa.value.iter_mut() {
                    let taken = std::mem::replace(element, MatVariable::Null);
                    *element = self.resolve_references(taken)?;
                }
                Ok(MatVariable::StructureArray(sa))
            }
            MatVariable::CellArray(mut cells) => {
                for element in cells.value.iter_mut() {
                    let taken = std::mem::replace(element, MatVariable::Null);
                    *element = self.resolve_references(taken)?;
                }
                Ok(MatVariable::CellArray(cells))
            }
            other => Ok(other),
        }
    }
}
