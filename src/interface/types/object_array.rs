//! Module defining the decoded shapes of MCOS class instances.
//!
//! An opaque variable arrives from the primitive reader as a `(_TypeSystem, _Metadata)` pair.
//! Resolution turns it into an [`ObjectArray`], a class-tagged N-dimensional array of property
//! maps, or an [`EnumerationInstance`] for the enumeration metadata form.

use crate::MatObjError;
use crate::interface::types::structure::Structure;
use crate::interface::variable::MatVariable;

/// Unresolved opaque placeholder as handed over by the primitive reader.
#[derive(Debug, Clone, PartialEq)]
pub struct OpaqueVariable {
    /// Type system tag, e.g. `"MCOS"` or `"java"`.
    pub type_system: String,
    /// Class name as recorded in the variable header.
    pub class_name: String,
    /// Reference metadata: a u32 reference sentinel or an enumeration-instance structure.
    pub metadata: Box<MatVariable>,
}

/// A resolved class instance array: class name plus one property map per element,
/// stored column-major.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectArray {
    pub class_name: String,
    pub dim: Vec<usize>,
    pub props: Vec<Structure>,
}

impl ObjectArray {
    pub fn new(
        class_name: String,
        dim: Vec<usize>,
        props: Vec<Structure>,
    ) -> Result<Self, MatObjError> {
        let elem_from_dim = dim.iter().product::<usize>();
        if elem_from_dim != props.len() {
            return Err(MatObjError::TypeConstruction(format!(
                "Specified dimension {} does not match number of elements {}.",
                elem_from_dim,
                props.len()
            )));
        }

        Ok(Self {
            class_name,
            dim,
            props,
        })
    }

    pub fn is_scalar(&self) -> bool {
        self.props.len() == 1
    }

    /// Property map at a column-major index.
    pub fn prop(&self, index: usize) -> Option<&Structure> {
        self.props.get(index)
    }

    /// Property map at a multi-dimensional index.
    pub fn prop_multidim(&self, idx: &[usize]) -> Option<&Structure> {
        if idx.len() != self.dim.len() {
            return None;
        }
        let mut v_idx = 0;
        let mut stride = 1;
        for (i, dim) in idx.iter().zip(self.dim.iter()) {
            if i >= dim {
                return None;
            }
            v_idx += i * stride;
            stride *= dim;
        }
        self.props.get(v_idx)
    }
}

/// A resolved enumeration instance: the member names of an enumeration class,
/// optionally paired with the resolved member values.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumerationInstance {
    pub class_name: String,
    pub builtin_class_name: Option<String>,
    pub dim: Vec<usize>,
    pub value_names: Vec<String>,
    /// Resolved values, shaped like `value_names`; empty when the file carries none.
    pub values: Vec<MatVariable>,
}
