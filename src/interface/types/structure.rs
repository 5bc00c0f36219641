use indexmap::IndexMap;

use crate::interface::variable::MatVariable;

#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    pub value: IndexMap<String, MatVariable>,
}

impl Structure {
    pub fn new(map: IndexMap<String, MatVariable>) -> Self {
        Self { value: map }
    }
    pub fn empty() -> Self {
        Self {
            value: IndexMap::new(),
        }
    }
    pub fn fieldnames(&self) -> Vec<String> {
        self.value.keys().cloned().collect()
    }
    pub fn get(&self, field: &str) -> Option<&MatVariable> {
        self.value.get(field)
    }
    pub fn contains(&self, field: &str) -> bool {
        self.value.contains_key(field)
    }
    pub fn insert(&mut self, field: &str, value: MatVariable) {
        self.value.insert(field.to_string(), value);
    }
    pub fn take(&mut self, field: &str) -> Option<MatVariable> {
        self.value.shift_remove(field)
    }
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, MatVariable> {
        self.value.iter()
    }
    pub fn iter_mut(&mut self) -> indexmap::map::IterMut<'_, String, MatVariable> {
        self.value.iter_mut()
    }
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

/// Check if every `Structure` has the same field names
///
pub fn check_same_fields(vec: &[MatVariable]) -> bool {
    if vec.is_empty() {
        return false;
    }

    let first = vec.first().unwrap().fieldnames();

    vec.iter().all(|x| x.fieldnames() == first)
}
