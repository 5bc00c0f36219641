use indexmap::IndexMap;

use crate::interface::types::array::ArrayType;
use crate::interface::types::structure::Structure;
use crate::interface::variable::MatVariable;
use crate::{MatObjError, impl_Array_for};

#[derive(Debug, Clone, PartialEq)]
pub struct StructureArray {
    pub dim: Vec<usize>,
    fieldnames: Vec<String>,
    pub value: Vec<MatVariable>,
}

impl_Array_for!(StructureArray);

impl StructureArray {
    pub fn new(
        dim: Vec<usize>,
        fieldnames: Vec<String>,
        value: Vec<MatVariable>,
    ) -> Result<Self, MatObjError> {
        if !dim.is_empty() {
            let elem_from_dim = dim.iter().product::<usize>() * fieldnames.len();
            let elem_provided = value.len();
            if elem_from_dim != elem_provided {
                return Err(MatObjError::TypeConstruction(format!(
                    "Specified dimension {} does not match number of elements {}.",
                    elem_from_dim, elem_provided
                )));
            }
        }

        let mut val = Vec::new();
        let mut v = value.into_iter();
        while v.len() != 0 {
            let mut map = IndexMap::new();
            for f in fieldnames.iter() {
                map.insert(f.to_string(), v.next().unwrap());
            }
            val.push(MatVariable::Structure(Structure::new(map)));
        }

        Ok(Self {
            dim,
            fieldnames,
            value: val,
        })
    }

    /// Build from ready-made scalar structures, all sharing the same field names.
    pub fn from_structures(dim: Vec<usize>, value: Vec<MatVariable>) -> Result<Self, MatObjError> {
        let fieldnames = match value.first() {
            Some(first) => first.fieldnames().ok_or_else(|| {
                MatObjError::TypeConstruction("Cannot read field names".to_string())
            })?,
            None => Vec::new(),
        };

        Ok(Self {
            dim,
            fieldnames,
            value,
        })
    }

    pub fn fieldnames(&self) -> Vec<String> {
        self.fieldnames.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}
