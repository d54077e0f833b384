use crate::validators::{Validator, bound};
use std::fmt::{self, Display};

/// Length check for text (in chars), list and map properties.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LengthValidator {
    min: Option<usize>,
    max: Option<usize>,
}

impl LengthValidator {
    pub const fn new(min: Option<usize>, max: Option<usize>) -> Self {
        Self { min, max }
    }

    fn is_exact(&self) -> bool {
        self.min.is_some() && self.min == self.max
    }
}

impl Validator for LengthValidator {
    type Subject = usize;

    fn test(&self, _value: &str, len: &usize) -> bool {
        self.min.is_none_or(|min| *len >= min) && self.max.is_none_or(|max| *len <= max)
    }

    fn fail_message(&self, value: &str) -> String {
        if self.is_exact() {
            format!(
                "value {:?} is not the correct length ({})",
                value,
                bound(self.min)
            )
        } else {
            format!(
                "value {:?} length is not in the range {}-{}",
                value,
                bound(self.min),
                bound(self.max)
            )
        }
    }
}

impl Display for LengthValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_exact() {
            return write!(f, "len == {}", bound(self.min));
        }
        write!(f, "len in [{}, {}]", bound(self.min), bound(self.max))
    }
}
