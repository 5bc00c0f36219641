use crate::MatObjError;
use crate::interface::types::array::ArrayType;
use crate::interface::types::matlab_types::MatlabType;
use crate::interface::types::numeric_array::NumericArray;
use crate::interface::variable::MatVariable;

/// 2-D sparse arrays in compressed-sparse-column form.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseArray {
    pub dim: Vec<usize>,
    pub ir: Vec<usize>,
    pub jc: Vec<usize>,
    pub value: MatlabType,
    pub value_cmp: Option<MatlabType>,
}

impl ArrayType for SparseArray {
    /// Get the dimension of the array
    fn dim(&self) -> &Vec<usize> {
        &self.dim
    }

    /// Get a borrowed value from a column-major index
    fn get_ref_colmaj(&self, _index: usize) -> Option<&MatVariable> {
        unimplemented!("It is not possible to receive SparseArray as reference.")
    }

    /// Get a cloned value from a multi-dimensional index
    fn get_clone_multidim(&self, idx: &[usize]) -> Option<MatVariable> {
        if idx.len() != 2 || idx[0] >= self.dim[0] || idx[1] >= self.dim[1] {
            return None;
        }

        match self.column_index(idx) {
            Some(v) => self.get_clone_colmaj(v),
            // Zero fill-in for positions without a stored value
            None => Some(MatVariable::NumericArray(
                NumericArray::new(vec![1, 1], MatlabType::from(vec![0.0]), None).unwrap(),
            )),
        }
    }

    /// Get a cloned value from a column-major index into the stored values
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

    /// Get storage index from multi-dimensional index
    fn column_index(&self, idx: &[usize]) -> Option<usize> {
        let jc = self.jc[idx[1]];
        let nc = self.jc[idx[1] + 1] - jc;

        (jc..jc + nc).find(|&f| self.ir[f] == idx[0])
    }
}

impl SparseArray {
    pub fn new(
        dim: Vec<usize>,
        ir: Vec<usize>,
        jc: Vec<usize>,
        value: MatlabType,
        value_cmp: Option<MatlabType>,
    ) -> Result<Self, MatObjError> {
        if ir.len() != value.len() {
            return Err(MatObjError::TypeConstruction(format!(
                "Row index count {} does not match number of stored values {}.",
                ir.len(),
                value.len()
            )));
        }
        if dim.len() != 2 || jc.len() != dim[1] + 1 {
            return Err(MatObjError::TypeConstruction(
                "Sparse arrays must be 2-D with one column pointer per column.".to_string(),
            ));
        }

        Ok(Self {
            dim,
            ir,
            jc,
            value,
            value_cmp,
        })
    }

    pub fn is_complex(&self) -> bool {
        self.value_cmp.is_some()
    }

    pub fn numeric_type(&self) -> &MatlabType {
        &self.value
    }

    /// Coordinate-list view: `(rows, cols, values)` of the stored entries.
    pub fn to_triplets(&self) -> (Vec<usize>, Vec<usize>, MatlabType) {
        let mut cols = Vec::with_capacity(self.ir.len());
        for j in 0..self.dim[1] {
            for _ in self.jc[j]..self.jc[j + 1] {
                cols.push(j);
            }
        }
        (self.ir.clone(), cols, self.value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triplets_from_csc() {
        // [[1, 0], [0, 2]]
        let s = SparseArray::new(
            vec![2, 2],
            vec![0, 1],
            vec![0, 1, 2],
            MatlabType::from(vec![1.0, 2.0]),
            None,
        )
        .unwrap();

        let (rows, cols, vals) = s.to_triplets();
        assert_eq!(rows, vec![0, 1]);
        assert_eq!(cols, vec![0, 1]);
        assert_eq!(vals, MatlabType::from(vec![1.0, 2.0]));

        assert_eq!(s.get_clone_multidim(&[0, 1]).unwrap().to_f64(), Some(0.0));
        assert_eq!(s.get_clone_multidim(&[1, 1]).unwrap().to_f64(), Some(2.0));
    }
}
