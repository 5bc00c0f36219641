/// Unit a [`DurationArray`] is scaled to, derived from the stored `fmt` property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DurationUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
    #[default]
    Milliseconds,
}

impl DurationUnit {
    /// Map a MATLAB duration format string to its unit. Composite formats
    /// such as `hh:mm:ss` and unrecognized strings keep milliseconds.
    pub fn from_fmt(fmt: &str) -> Self {
        match fmt {
            "s" => DurationUnit::Seconds,
            "m" => DurationUnit::Minutes,
            "h" => DurationUnit::Hours,
            "d" => DurationUnit::Days,
            _ => DurationUnit::Milliseconds,
        }
    }

    /// Milliseconds per unit.
    pub fn millis(&self) -> f64 {
        match self {
            DurationUnit::Seconds => 1_000.0,
            DurationUnit::Minutes => 60_000.0,
            DurationUnit::Hours => 3_600_000.0,
            DurationUnit::Days => 86_400_000.0,
            DurationUnit::Milliseconds => 1.0,
        }
    }
}

/// Decoded `duration` values, rescaled to `unit`.
#[derive(Debug, Clone, PartialEq)]
pub struct DurationArray {
    pub dim: Vec<usize>,
    pub value: Vec<f64>,
    pub unit: DurationUnit,
}

impl DurationArray {
    pub fn empty() -> Self {
        Self {
            dim: vec![0, 0],
            value: Vec::new(),
            unit: DurationUnit::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}
