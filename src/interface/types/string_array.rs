/// Decoded MATLAB `string` arrays: native strings stored column-major.
#[derive(Debug, Clone, PartialEq)]
pub struct StringArray {
    pub dim: Vec<usize>,
    pub value: Vec<String>,
}

impl StringArray {
    pub fn empty() -> Self {
        Self {
            dim: vec![0, 0],
            value: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// String at a multi-dimensional index.
    pub fn get_multidim(&self, idx: &[usize]) -> Option<&str> {
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
        self.value.get(v_idx).map(|s| s.as_str())
    }
}
