//! Type-agnostic routines shared by every generated configuration.
//!
//! Generated code only knows how to move one property between its typed
//! field and a string. Everything that works across properties lives here
//! and goes through the [`GeneratedConfig`] contract: batching updates,
//! applying defaults, rebuilding the query string, and splitting a URL into
//! property values.

use crate::errors::ConfigError;
use crate::{ConfigPropInfo, GeneratedConfig, Updates};
use std::collections::{BTreeMap, HashMap};
use tracing::trace;
use url::Url;

mod layout;

#[cfg(test)]
pub(crate) mod fixture;

pub use layout::UrlLayout;

/// Message parameter that senders accept next to the config keys. It is
/// skipped, not rejected, when no property claims it.
pub const TITLE_KEY: &str = "title";

const CUSTOM_KEY_PREFIX: &str = "__";

/// Applies query-string pairs. The first occurrence of a property wins.
pub fn update_from_query<C, I, K, V>(config: &mut C, pairs: I) -> Result<(), ConfigError>
where
    C: GeneratedConfig + ?Sized,
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let info = config.prop_info();
    let mut updates = Updates::new();
    for (key, value) in pairs {
        let key = key.as_ref();
        match info.prop_index_for(key) {
            Some(index) => {
                updates.entry(index).or_insert_with(|| value.into());
            }
            None if key.eq_ignore_ascii_case(TITLE_KEY) => {}
            None => return Err(ConfigError::UnknownKey(key.to_string())),
        }
    }
    config.update(&updates)
}

/// Applies send-time parameters keyed by query key.
pub fn update_from_params<C: GeneratedConfig + ?Sized>(
    config: &mut C,
    params: &HashMap<String, String>,
) -> Result<(), ConfigError> {
    let sorted: BTreeMap<&str, &str> = params
        .iter()
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect();
    update_from_query(config, sorted)
}

/// Sets every property to its default.
pub fn set_defaults<C: GeneratedConfig + ?Sized>(config: &mut C) -> Result<(), ConfigError> {
    let info = config.prop_info();
    let updates: Updates = info
        .default_values
        .iter()
        .enumerate()
        .map(|(index, default)| (index, default.to_string()))
        .collect();
    config.update(&updates)
}

/// Sets only the properties that are still unset, i.e. format as `""` or
/// `"0"`.
pub fn set_partial_defaults<C: GeneratedConfig + ?Sized>(
    config: &mut C,
) -> Result<(), ConfigError> {
    let info = config.prop_info();
    let updates: Updates = (0..info.prop_count())
        .filter(|index| matches!(config.prop_value(*index).as_str(), "" | "0"))
        .map(|index| (index, info.default_values[index].to_string()))
        .collect();
    config.update(&updates)
}

/// Resets `config` to its defaults, then applies `url`.
pub fn init<C: GeneratedConfig + ?Sized>(config: &mut C, url: &Url) -> Result<(), ConfigError> {
    set_defaults(config)?;
    config.set_url(url)
}

pub fn from_url<C: GeneratedConfig + Default>(url: &Url) -> Result<C, ConfigError> {
    let mut config = C::default();
    init(&mut config, url)?;
    Ok(config)
}

/// The query parameters `config` serializes to: every keyed property whose
/// value differs from its default, plus the custom query variables.
pub fn query_values<C: GeneratedConfig + ?Sized>(config: &C) -> BTreeMap<String, String> {
    let info = config.prop_info();
    let mut values = BTreeMap::new();
    for index in 0..info.prop_count() {
        let Some(key) = info.primary_key(index) else {
            continue;
        };
        let value = config.prop_value(index);
        if value == info.default_values[index] {
            continue;
        }
        values.insert(key.to_string(), value);
    }
    if let Some(vars) = config.custom_query_vars() {
        for (key, value) in vars {
            values.insert(escape_custom_query_key(info, key), value.clone());
        }
    }
    values
}

pub fn encode_query(values: &BTreeMap<String, String>) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(values.iter())
        .finish()
}

/// Splits a URL path into segments, ignoring leading and trailing slashes.
pub fn split_path(path: &str) -> Vec<String> {
    let path = path.trim_matches('/');
    if path.is_empty() {
        return Vec::new();
    }
    path.split('/').map(str::to_string).collect()
}

pub fn join_path<S: AsRef<str>>(parts: &[S]) -> String {
    parts
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("/")
}

/// Prefixes a custom query key that would otherwise be read back as a
/// declared key. The key keeps its case.
pub fn escape_custom_query_key(info: &ConfigPropInfo, key: &str) -> String {
    if info.is_reserved_key(key) {
        format!("{CUSTOM_KEY_PREFIX}{key}")
    } else {
        key.to_string()
    }
}

pub fn unescape_custom_query_key(key: &str) -> &str {
    key.strip_prefix(CUSTOM_KEY_PREFIX).unwrap_or(key)
}

/// The body of every generated `set_url`: split, update, validate.
pub fn apply_url<C: GeneratedConfig + ?Sized>(
    config: &mut C,
    layout: &UrlLayout,
    url: &Url,
) -> Result<(), ConfigError> {
    let updates = layout.updates_from_url(config.prop_info(), url)?;
    trace!(scheme = layout.scheme, count = updates.len(), "applying config URL");
    config.update(&updates)?;
    config.validate()
}
