use chrono::{DateTime, Utc};

/// Decoded `datetime` values: UTC instants at microsecond precision.
#[derive(Debug, Clone, PartialEq)]
pub struct DatetimeArray {
    pub dim: Vec<usize>,
    pub value: Vec<DateTime<Utc>>,
    /// Timezone string as stored in the file, if any.
    pub tz: Option<String>,
}

impl DatetimeArray {
    pub fn empty() -> Self {
        Self {
            dim: vec![0, 0],
            value: Vec::new(),
            tz: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}
