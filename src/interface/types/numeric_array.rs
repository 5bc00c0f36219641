//! Module numeric_array
//!
//! This module defines the struct [`NumericArray`] which describes multidimensional dense arrays of complex numeric data.
//!

use std::fmt::Display;

use crate::MatObjError;
use crate::interface::types::array::ArrayType;
use crate::interface::types::matlab_types::{MatlabType, MatlabTypeMarker};
use crate::interface::variable::MatVariable;

/// Contains vectors, matrices or multidimensional arrays of complex numeric data.
///
/// Examples
/// ```
/// use matobj::{NumericArray, MatlabType, MatVariable};
///
/// let data = vec![1, 2, 3];
/// let m = NumericArray::new(
///     vec![1, 3],
///     MatlabType::from(data),
///     None,
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NumericArray {
    pub dim: Vec<usize>,
    pub value: MatlabType,
    pub value_cmp: Option<MatlabType>,
}

impl ArrayType for NumericArray {
    /// Get the dimension of the array
    fn dim(&self) -> &Vec<usize> {
        &self.dim
    }

    /// Get a borrowed value from a column-major index
    fn get_ref_colmaj(&self, _index: usize) -> Option<&MatVariable> {
        unimplemented!("It is not possible to receive NumericArray as reference.")
    }

    /// Get a cloned value from a column-major index
    fn get_clone_colmaj(&self, index: usize) -> Option<MatVariable> {
        if index >= self.value.len() {
            return None;
        }
        Some(MatVariable::NumericArray(
            NumericArray::new(
                vec![1, 1],
                self.value.clone_at_index(index),
                self.value_cmp.as_ref().map(|x| x.clone_at_index(index)),
            )
            .ok()?,
        ))
    }
}

impl NumericArray {
    /// Constructs a new `NumericArray`.
    ///
    /// The data is interpreted in column-major order. The vector `dim` specifies the dimensions
    /// of the array; an empty or 1D `dim` is normalized to a row vector.
    pub fn new(
        dim: Vec<usize>,
        value: MatlabType,
        value_cmp: Option<MatlabType>,
    ) -> Result<Self, MatObjError> {
        // Assert that dimensions match to number of values
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

        let dim = if dim.is_empty() || dim.len() == 1 {
            // Normalize the dimension vector. Even 1D arrays are treated as 2D matrices in
            // MAT-files.
            vec![1, value.len()]
        } else {
            dim
        };

        Ok(Self {
            dim,
            value,
            value_cmp,
        })
    }

    /// The canonical 0x0 empty double array.
    pub fn empty() -> Self {
        Self {
            dim: vec![0, 0],
            value: MatlabType::new(),
            value_cmp: None,
        }
    }

    /// Clone out real data into `Vec<T>`
    pub fn real_to_vec<T: MatlabTypeMarker>(&self) -> Option<Vec<T>> {
        self.value.clone().inner()
    }

    /// Clone out complex data into `Vec<T>`
    pub fn comp_to_vec<T: MatlabTypeMarker>(&self) -> Option<Vec<T>> {
        self.value_cmp.clone()?.inner()
    }

    pub fn real_to_scalar<T: MatlabTypeMarker>(&self) -> Option<T> {
        self.value.get(0).copied()
    }

    pub fn comp_to_scalar<T: MatlabTypeMarker>(&self) -> Option<T> {
        self.value_cmp.as_ref()?.get(0).copied()
    }

    pub fn is_scalar(&self) -> bool {
        self.dim.iter().product::<usize>() == 1
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn is_complex(&self) -> bool {
        self.value_cmp.is_some()
    }

    pub fn numeric_type(&self) -> &MatlabType {
        &self.value
    }

    /// Read the character content as a `String`, in storage order.
    pub fn chars_to_string(&self) -> Option<String> {
        match &self.value {
            MatlabType::UTF8(chars) | MatlabType::UTF16(chars) => Some(chars.iter().collect()),
            _ => None,
        }
    }
}

impl From<&str> for NumericArray {
    fn from(value: &str) -> Self {
        let value = MatlabType::from(value);
        Self {
            dim: vec![1, value.len()],
            value,
            value_cmp: None,
        }
    }
}

impl Display for NumericArray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} {:?}", self.dim, self.value)
    }
}
