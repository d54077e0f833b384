use crate::validators::{Validator, bound};
use std::fmt::{self, Display};

pub const PORT_MINIMUM: i64 = 1;
pub const PORT_MAXIMUM: i64 = 65535;

/// Bounds check for number properties. Both bounds are inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RangeValidator {
    min: Option<i64>,
    max: Option<i64>,
}

impl RangeValidator {
    pub const fn new(min: Option<i64>, max: Option<i64>) -> Self {
        Self { min, max }
    }

    pub const fn between(min: i64, max: i64) -> Self {
        Self::new(Some(min), Some(max))
    }

    /// Looks up a named preset such as `port`.
    pub fn known(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "port" | "ipport" | "tcpport" | "udpport" => {
                Some(Self::between(PORT_MINIMUM, PORT_MAXIMUM))
            }
            _ => None,
        }
    }

    pub fn min(&self) -> Option<i64> {
        self.min
    }

    pub fn max(&self) -> Option<i64> {
        self.max
    }
}

impl Validator for RangeValidator {
    type Subject = i64;

    fn test(&self, _value: &str, n: &i64) -> bool {
        if let Some(min) = self.min
            && *n < min
        {
            return false;
        }
        if let Some(max) = self.max
            && *n > max
        {
            return false;
        }
        true
    }

    fn fail_message(&self, value: &str) -> String {
        format!(
            "value {} is not in the range {}-{}",
            value,
            bound(self.min),
            bound(self.max)
        )
    }
}

impl Display for RangeValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (None, None) => write!(f, "[...]"),
            (None, Some(max)) => write!(f, "[..., {}]", max),
            (Some(min), None) => write!(f, "[{}, ...]", min),
            (Some(min), Some(max)) => write!(f, "[{}, ..., {}]", min, max),
        }
    }
}
