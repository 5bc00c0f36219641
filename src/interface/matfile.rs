use std::ops::Index;

use indexmap::IndexMap;
use indexmap::map::{Iter, IterMut};

use crate::interface::helper::is_valid_variable_name;
use crate::interface::variable::MatVariable;

///
/// MAT-file container
///
/// Stores MAT-file variables using a variable name as unique key.
///
#[derive(Debug, Default)]
pub struct MatFile {
    data: IndexMap<String, MatVariable>,
}

impl MatFile {
    ///
    /// Create empty `MatFile`.
    ///
    pub fn new() -> Self {
        Self {
            data: IndexMap::new(),
        }
    }

    ///
    /// Insert a `MatVariable` called `name`.
    ///
    /// A valid MATLAB variable
    /// - has a length between 1 and 64 characters,
    /// - starts with a ascii alphabetic character,
    /// - contains only ascii alpha-numeric or underscore characters,
    /// - does not match any reserved keyword.
    ///
    /// # Panics
    ///
    /// Panics, if `name` does not meet the criteria for a valid MATLAB variable
    /// name.
    ///
    pub fn insert(&mut self, name: &str, value: MatVariable) {
        if !is_valid_variable_name(name) {
            panic!("Invalid variable name");
        }
        self.data.insert(name.to_string(), value);
    }

    ///
    /// Take variable out of container.
    ///
    /// Returns `MatVariable` stored under `name`. If not existing, returns `None`.
    ///
    pub fn take(&mut self, name: &str) -> Option<MatVariable> {
        self.data.shift_remove(name)
    }

    ///
    /// Return if variable `name` exists.
    ///
    pub fn contains(&self, name: &str) -> bool {
        self.data.contains_key(name)
    }

    ///
    /// Keep only the variables whose name appears in `names`.
    ///
    pub fn retain_names(&mut self, names: &[String]) {
        self.data.retain(|k, _| names.iter().any(|n| n == k));
    }

    ///
    /// Return iterator over variables.
    ///
    pub fn iter(&self) -> Iter<'_, String, MatVariable> {
        self.data.iter()
    }

    ///
    /// Return mutable iterator over variables.
    ///
    pub fn iter_mut(&mut self) -> IterMut<'_, String, MatVariable> {
        self.data.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl IntoIterator for MatFile {
    type Item = (String, MatVariable);
    type IntoIter = indexmap::map::IntoIter<String, MatVariable>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl Index<&str> for MatFile {
    type Output = MatVariable;

    fn index(&self, index: &str) -> &Self::Output {
        self.data.get(index).unwrap_or(&MatVariable::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn false_index() {
        let mat = MatFile::new();
        assert_eq!(mat["some_index"], MatVariable::Null);
    }

    #[test]
    fn retain() {
        let mut mat = MatFile::new();
        mat.insert("a", MatVariable::from(1.0));
        mat.insert("b", MatVariable::from(2.0));
        mat.retain_names(&["b".to_string()]);

        assert!(!mat.contains("a"));
        assert!(mat.contains("b"));
    }
}
