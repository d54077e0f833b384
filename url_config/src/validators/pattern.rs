use crate::validators::Validator;
use once_cell::sync::OnceCell;
use regex::Regex;
use std::fmt::{self, Display};

pub const UUID4_PATTERN: &str =
    "[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}";
pub const HEX32_PATTERN: &str = "[A-Za-z0-9]{32}";

/// Matches the whole formatted value against a pattern.
///
/// The pattern is compiled on first use and cached, so a validator kept in a
/// `static` compiles exactly once per process.
#[derive(Debug)]
pub struct RegexValidator {
    pattern: &'static str,
    compiled: OnceCell<Option<Regex>>,
}

impl RegexValidator {
    pub const fn new(pattern: &'static str) -> Self {
        Self {
            pattern,
            compiled: OnceCell::new(),
        }
    }

    /// Looks up a named preset such as `uuid`.
    pub fn known_pattern(name: &str) -> Option<&'static str> {
        match name.to_lowercase().as_str() {
            "uuid" | "uuid4" | "guid" => Some(UUID4_PATTERN),
            "hex32" => Some(HEX32_PATTERN),
            _ => None,
        }
    }

    /// Compiles `pattern` the way it will be matched: anchored at both ends.
    pub fn compile(pattern: &str) -> Result<Regex, regex::Error> {
        Regex::new(&format!("^(?:{pattern})$"))
    }

    pub fn pattern(&self) -> &'static str {
        self.pattern
    }

    fn regex(&self) -> Option<&Regex> {
        self.compiled
            .get_or_init(|| Self::compile(self.pattern).ok())
            .as_ref()
    }
}

impl Validator for RegexValidator {
    type Subject = str;

    fn test(&self, _value: &str, subject: &str) -> bool {
        self.regex().is_some_and(|re| re.is_match(subject))
    }

    fn fail_message(&self, value: &str) -> String {
        format!("value {} does not match the expected format", value)
    }
}

impl Display for RegexValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.pattern)
    }
}
