//! Runtime for service configurations that live in a single URL.
//!
//! A service is described once, declaratively (see [`spec`]). The
//! `url-config-gen` crate turns that description into a plain struct with
//! one typed field per property and an implementation of
//! [`GeneratedConfig`]. Everything the generated code does at run time
//! happens through the helpers in this crate: the value codecs in
//! [`types`], the URL assembly in [`support`], and the checks in
//! [`validators`].

use std::collections::BTreeMap;

pub use errors::{ConfigError, SchemaError};
pub use support::UrlLayout;
pub use types::{ConfigValue, EnumFormatter, EnumRegistry, QueryVars};
pub use url::Url;

pub mod prelude;
pub mod spec;
pub mod support;
pub mod types;
pub mod url_part;
pub mod validators;

mod errors;

/// A batch of raw values keyed by property index.
///
/// The map is ordered so a batch is always applied in ascending index order.
pub type Updates = BTreeMap<usize, String>;

/// The contract every generated configuration fulfils.
pub trait GeneratedConfig {
    fn scheme(&self) -> &'static str;

    /// Parses and stores every value in `updates`.
    ///
    /// All entries are attempted even if one fails to parse, and the error of
    /// the lowest failing index is returned. An index with no property is a
    /// programming error and aborts the batch with
    /// [`ConfigError::UnknownProperty`].
    fn update(&mut self, updates: &Updates) -> Result<(), ConfigError>;

    /// The formatted value of a property, or an empty string for an unknown
    /// index.
    fn prop_value(&self, index: usize) -> String;

    fn get_url(&self) -> Result<Url, ConfigError>;

    /// Replaces the URL-backed state with the values in `url`, then
    /// validates the result.
    fn set_url(&mut self, url: &Url) -> Result<(), ConfigError>;

    fn validate(&self) -> Result<(), ConfigError>;

    fn enums(&self) -> EnumRegistry;

    fn prop_info(&self) -> &'static ConfigPropInfo;

    /// Query variables kept verbatim because no property claims them.
    fn custom_query_vars(&self) -> Option<&QueryVars> {
        None
    }
}

/// Static metadata of a generated configuration, indexed by property index.
#[derive(Debug, PartialEq, Eq)]
pub struct ConfigPropInfo {
    pub prop_names: &'static [&'static str],
    pub default_values: &'static [&'static str],
    /// Every query key of every property, lower-case and sorted.
    pub keys: &'static [&'static str],
    /// The property each entry of `keys` belongs to.
    pub key_props: &'static [usize],
    /// Index into `keys` of the key a property is written under. `None` for
    /// properties that only live in the URL structure.
    pub primary_keys: &'static [Option<usize>],
    pub credentials: &'static [bool],
}

impl ConfigPropInfo {
    pub fn prop_count(&self) -> usize {
        self.prop_names.len()
    }

    /// Resolves a query key, ignoring case.
    pub fn prop_index_for(&self, key: &str) -> Option<usize> {
        let key = key.to_lowercase();
        self.keys
            .binary_search_by(|probe| (*probe).cmp(key.as_str()))
            .ok()
            .map(|found| self.key_props[found])
    }

    /// Resolves a property name, ignoring case.
    pub fn prop_index_by_name(&self, name: &str) -> Option<usize> {
        self.prop_names
            .iter()
            .position(|prop| prop.eq_ignore_ascii_case(name))
    }

    pub fn primary_key(&self, index: usize) -> Option<&'static str> {
        self.primary_keys
            .get(index)
            .copied()
            .flatten()
            .map(|key| self.keys[key])
    }

    pub fn is_credential(&self, index: usize) -> bool {
        self.credentials.get(index).copied().unwrap_or(false)
    }

    /// Whether `key` is claimed by any property.
    pub fn is_reserved_key(&self, key: &str) -> bool {
        self.prop_index_for(key).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static INFO: ConfigPropInfo = ConfigPropInfo {
        prop_names: &["Host", "Stream", "Topic"],
        default_values: &["", "", ""],
        keys: &["stream", "title", "topic"],
        key_props: &[1, 2, 2],
        primary_keys: &[None, Some(0), Some(2)],
        credentials: &[false, false, false],
    };

    #[test]
    fn test_key_lookup_ignores_case() {
        assert_eq!(INFO.prop_index_for("Topic"), Some(2));
        assert_eq!(INFO.prop_index_for("TITLE"), Some(2));
        assert_eq!(INFO.prop_index_for("stream"), Some(1));
        assert_eq!(INFO.prop_index_for("host"), None);
        assert_eq!(INFO.prop_index_by_name("host"), Some(0));
    }

    #[test]
    fn test_primary_keys() {
        assert_eq!(INFO.primary_key(0), None);
        assert_eq!(INFO.primary_key(2), Some("topic"));
        assert_eq!(INFO.primary_key(9), None);
        assert_eq!(INFO.prop_count(), 3);
    }
}
