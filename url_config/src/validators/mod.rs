use crate::ConfigError;
use std::fmt::Display;

pub(crate) mod length;
pub(crate) mod not_equal;
pub(crate) mod pattern;
pub(crate) mod range;
pub(crate) mod required;

pub use length::LengthValidator;
pub use not_equal::NotEqualValidator;
pub use pattern::RegexValidator;
pub use range::RangeValidator;
pub use required::RequiredValidator;

/// A check run against the live value of one property after a URL has been
/// applied.
///
/// `value` is always the formatted property value, which is what failure
/// messages quote. `subject` is the thing actually tested: the number for a
/// range, the item count for a length, the other property's value for a
/// not-equal check, and so on.
///
/// Validators are const-constructible so generated code can keep them in
/// `static`s. They must be `Send + Sync` for that.
pub trait Validator: Display + Send + Sync {
    type Subject: ?Sized;

    /// Returns `true` when the property passes.
    fn test(&self, value: &str, subject: &Self::Subject) -> bool;

    fn fail_message(&self, value: &str) -> String;

    fn validate(
        &self,
        name: &str,
        value: &str,
        subject: &Self::Subject,
    ) -> Result<(), ConfigError> {
        if self.test(value, subject) {
            Ok(())
        } else {
            Err(ConfigError::validation_failed(name, self.fail_message(value)))
        }
    }
}

/// Renders an optional bound, `*` meaning unbounded.
fn bound<T: Display>(bound: Option<T>) -> String {
    bound.map_or_else(|| "*".to_string(), |b| b.to_string())
}
