use crate::validators::Validator;
use std::fmt::{self, Display};

/// Fails when a required property is still empty. The subject is the
/// result of the property type's emptiness test.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RequiredValidator;

impl Validator for RequiredValidator {
    type Subject = bool;

    fn test(&self, _value: &str, is_empty: &bool) -> bool {
        !*is_empty
    }

    fn fail_message(&self, _value: &str) -> String {
        "missing from config URL".to_string()
    }
}

impl Display for RequiredValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "required")
    }
}
