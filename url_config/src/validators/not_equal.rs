use crate::validators::Validator;
use std::fmt::{self, Display};

/// Rejects a value that is already used by another property.
///
/// The subject is the other property's formatted value. Two empty values
/// never collide.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NotEqualValidator {
    other: &'static str,
}

impl NotEqualValidator {
    pub const fn new(other: &'static str) -> Self {
        Self { other }
    }
}

impl Validator for NotEqualValidator {
    type Subject = str;

    fn test(&self, value: &str, other_value: &str) -> bool {
        value.is_empty() || value != other_value
    }

    fn fail_message(&self, value: &str) -> String {
        format!("value {} is already used for {}", value, self.other)
    }
}

impl Display for NotEqualValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "!= {}", self.other)
    }
}
