use crate::MatObjError;
use crate::impl_Array_for;
use crate::interface::types::array::ArrayType;
use crate::interface::variable::MatVariable;

/// [`CellArray`] contains any kind of MatVariable in multidimensional arrays.
///
#[derive(Debug, Clone, PartialEq)]
pub struct CellArray {
    pub dim: Vec<usize>,
    pub value: Vec<MatVariable>,
}

impl CellArray {
    pub fn new(dim: Vec<usize>, value: Vec<MatVariable>) -> Result<Self, MatObjError> {
        if !dim.is_empty() {
            let elem_from_dim = dim.iter().product::<usize>();
            let elem_provided = value.len();
            if elem_from_dim != elem_provided {
                return Err(MatObjError::TypeConstruction(format!(
                    "Specified dimension {} does not match number of elements {}.",
                    elem_from_dim, elem_provided
                )));
            }
        }

        Ok(Self { dim, value })
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl_Array_for!(CellArray);
