use crate::types::ENUM_INVALID;
use indexmap::IndexMap;

/// Translates option ordinals to and from their declared names.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnumFormatter {
    names: &'static [&'static str],
}

impl EnumFormatter {
    pub const fn new(names: &'static [&'static str]) -> Self {
        Self { names }
    }

    pub fn names(&self) -> &'static [&'static str] {
        self.names
    }

    /// Returns the name for `ordinal`, or `"Invalid"` when it is out of range.
    pub fn print(&self, ordinal: usize) -> &'static str {
        self.names.get(ordinal).copied().unwrap_or(ENUM_INVALID)
    }

    /// Case-insensitive lookup of `name`.
    pub fn parse(&self, name: &str) -> Option<usize> {
        let target = name.to_lowercase();
        self.names
            .iter()
            .position(|candidate| candidate.to_lowercase() == target)
    }
}

/// The option formatters of one generated configuration, keyed by property
/// name in property order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnumRegistry {
    formatters: IndexMap<&'static str, EnumFormatter>,
}

impl EnumRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, prop_name: &'static str, formatter: EnumFormatter) -> Self {
        self.formatters.insert(prop_name, formatter);
        self
    }

    pub fn get(&self, prop_name: &str) -> Option<&EnumFormatter> {
        self.formatters.get(prop_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &EnumFormatter)> {
        self.formatters.iter().map(|(name, formatter)| (*name, formatter))
    }

    pub fn len(&self) -> usize {
        self.formatters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formatters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRIORITY: EnumFormatter = EnumFormatter::new(&["Min", "Low", "Default", "High"]);

    #[test]
    fn test_parse_is_case_insensitive_and_total() {
        for (ordinal, name) in PRIORITY.names().iter().enumerate() {
            assert_eq!(PRIORITY.parse(name), Some(ordinal));
            assert_eq!(PRIORITY.parse(&name.to_uppercase()), Some(ordinal));
            assert_eq!(PRIORITY.print(ordinal), *name);
        }
        assert_eq!(PRIORITY.parse("urgent"), None);
        assert_eq!(PRIORITY.parse(""), None);
    }

    #[test]
    fn test_print_out_of_range() {
        assert_eq!(PRIORITY.print(4), "Invalid");
        assert_eq!(PRIORITY.print(usize::MAX), "Invalid");
    }

    #[test]
    fn test_registry_keeps_insertion_order() {
        let registry = EnumRegistry::new()
            .with("Priority", PRIORITY)
            .with("Color", EnumFormatter::new(&["Red", "Green"]));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("Priority"), Some(&PRIORITY));
        assert!(registry.get("priority").is_none());
        let names: Vec<_> = registry.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Priority", "Color"]);
    }
}
