use indexmap::IndexMap;

use crate::interface::variable::MatVariable;

/// Decoded `containers.Map` values: an ordered mapping from stringified key
/// items to values.
#[derive(Debug, Clone, PartialEq)]
pub struct MatMap {
    pub entries: IndexMap<String, MatVariable>,
}

impl MatMap {
    pub fn new(entries: IndexMap<String, MatVariable>) -> Self {
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&MatVariable> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, MatVariable> {
        self.entries.iter()
    }
}
