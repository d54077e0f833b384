//! The closed set of property value kinds and their string codecs.
//!
//! Every generated configuration stores its properties as typed fields, but
//! moves them in and out of the URL as strings. The functions in this module
//! are that bridge: one `parse_*`/`format_*` pair per kind. The generator
//! picks the pair for each property once, when the code is generated, so at
//! run time no dispatch on the kind happens.
//!
//! Parse failures are reported as [`ConfigError::InvalidValue`] carrying the
//! property name, which is how [`update`](crate::GeneratedConfig::update)
//! surfaces them to callers.

use crate::errors::ConfigError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::time::Duration;

pub(crate) mod custom;
pub(crate) mod enums;
mod macros;

pub use custom::ConfigValue;
pub use enums::{EnumFormatter, EnumRegistry};

/// Key/value pairs carried verbatim in the query string.
pub type QueryVars = BTreeMap<String, String>;

pub const DEFAULT_ITEM_SEPARATOR: &str = ",";
pub const DEFAULT_VALUE_SEPARATOR: &str = ":";
pub const DEFAULT_NUMBER_BASE: u32 = 10;

/// Rendered by [`EnumFormatter::print`] for an ordinal without a name.
pub const ENUM_INVALID: &str = "Invalid";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropType {
    Number,
    Text,
    List,
    Color,
    Duration,
    Option,
    Toggle,
    Map,
    Custom,
}

impl PropType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropType::Number => "number",
            PropType::Text => "text",
            PropType::List => "list",
            PropType::Color => "color",
            PropType::Duration => "duration",
            PropType::Option => "option",
            PropType::Toggle => "toggle",
            PropType::Map => "map",
            PropType::Custom => "custom",
        }
    }

    /// Whether values of this kind have a notion of "empty", which is what the
    /// implicit `required` check tests.
    pub fn has_emptiness(&self) -> bool {
        matches!(
            self,
            PropType::Number | PropType::Text | PropType::List | PropType::Option | PropType::Custom
        )
    }

    /// Whether a length validator can be applied to values of this kind.
    pub fn has_length(&self) -> bool {
        matches!(self, PropType::Text | PropType::List | PropType::Map)
    }
}

impl Display for PropType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn parse_number(name: &str, value: &str, base: u32) -> Result<i64, ConfigError> {
    if !(2..=36).contains(&base) {
        return Err(ConfigError::invalid_value(
            name,
            format!("unsupported number base {base}"),
        ));
    }
    if value.is_empty() {
        return Ok(0);
    }
    i64::from_str_radix(value, base).map_err(|e| ConfigError::invalid_value(name, e.to_string()))
}

pub fn format_number(value: i64, base: u32) -> String {
    if base == DEFAULT_NUMBER_BASE || !(2..=36).contains(&base) {
        return value.to_string();
    }
    let mut digits = Vec::new();
    let mut rest = value.unsigned_abs();
    loop {
        let digit = (rest % u64::from(base)) as u32;
        digits.push(char::from_digit(digit, base).unwrap_or('0'));
        rest /= u64::from(base);
        if rest == 0 {
            break;
        }
    }
    if value < 0 {
        digits.push('-');
    }
    digits.iter().rev().collect()
}

pub fn parse_text(_name: &str, value: &str) -> Result<String, ConfigError> {
    Ok(value.to_string())
}

pub fn format_text(value: &str) -> String {
    value.to_string()
}

/// Reads a boolean word. Returns `None` for anything outside the vocabulary.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => Some(true),
        "false" | "0" | "no" | "n" => Some(false),
        _ => None,
    }
}

pub fn parse_toggle(name: &str, value: &str) -> Result<bool, ConfigError> {
    parse_bool(value)
        .ok_or_else(|| ConfigError::invalid_value(name, format!("invalid toggle value {value:?}")))
}

pub fn format_toggle(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}

pub fn parse_color(name: &str, value: &str) -> Result<u32, ConfigError> {
    let hex = value.strip_prefix('#').unwrap_or(value);
    let hex = hex.strip_prefix("0x").unwrap_or(hex);
    u32::from_str_radix(hex, 16).map_err(|e| {
        ConfigError::invalid_value(name, format!("invalid color value {value:?}: {e}"))
    })
}

pub fn format_color(value: u32) -> String {
    format!("0x{value:06x}")
}

pub fn parse_duration(name: &str, value: &str) -> Result<Duration, ConfigError> {
    if value.is_empty() {
        return Ok(Duration::ZERO);
    }
    humantime::parse_duration(value).map_err(|e| {
        ConfigError::invalid_value(name, format!("invalid duration {value:?}: {e}"))
    })
}

pub fn format_duration(value: Duration) -> String {
    humantime::format_duration(value).to_string()
}

pub fn parse_list(_name: &str, value: &str, separator: &str) -> Result<Vec<String>, ConfigError> {
    if value.is_empty() {
        return Ok(Vec::new());
    }
    Ok(value.split(separator).map(str::to_string).collect())
}

/// Parses a property that owns every remaining path segment.
pub fn parse_path_list(name: &str, value: &str) -> Result<Vec<String>, ConfigError> {
    parse_list(name, value.strip_prefix('/').unwrap_or(value), "/")
}

pub fn format_list(value: &[String], separator: &str) -> String {
    value.join(separator)
}

pub fn parse_custom_list<T: ConfigValue>(
    name: &str,
    value: &str,
    separator: &str,
) -> Result<Vec<T>, ConfigError> {
    parse_list(name, value, separator)?
        .iter()
        .map(|item| T::parse(name, item))
        .collect()
}

pub fn format_custom_list<T: ConfigValue>(value: &[T], separator: &str) -> String {
    value
        .iter()
        .map(ConfigValue::to_config_string)
        .collect::<Vec<_>>()
        .join(separator)
}

pub fn parse_map(
    name: &str,
    value: &str,
    item_separator: &str,
    value_separator: &str,
) -> Result<BTreeMap<String, String>, ConfigError> {
    let mut map = BTreeMap::new();
    if value.is_empty() {
        return Ok(map);
    }
    for pair in value.split(item_separator) {
        let (key, val) = pair.split_once(value_separator).ok_or_else(|| {
            ConfigError::invalid_value(name, format!("invalid key/value pair {pair:?}"))
        })?;
        map.insert(key.to_string(), val.to_string());
    }
    Ok(map)
}

/// Keys come out sorted, so equal maps always format identically.
pub fn format_map(
    value: &BTreeMap<String, String>,
    item_separator: &str,
    value_separator: &str,
) -> String {
    value
        .iter()
        .map(|(key, val)| format!("{key}{value_separator}{val}"))
        .collect::<Vec<_>>()
        .join(item_separator)
}

/// Parses a map bound to the query part, which uses form encoding instead of
/// the custom separators. The first value of a repeated key wins.
pub fn parse_query_map(_name: &str, value: &str) -> Result<QueryVars, ConfigError> {
    let mut vars = QueryVars::new();
    for (key, val) in url::form_urlencoded::parse(value.as_bytes()) {
        vars.entry(key.into_owned()).or_insert_with(|| val.into_owned());
    }
    Ok(vars)
}

pub fn format_query_map(value: &QueryVars) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(value.iter())
        .finish()
}

/// An empty value selects the first declared option.
pub fn parse_option(
    name: &str,
    value: &str,
    formatter: &EnumFormatter,
) -> Result<usize, ConfigError> {
    if value.is_empty() {
        return Ok(0);
    }
    formatter
        .parse(value)
        .ok_or_else(|| ConfigError::invalid_value(name, format!("invalid option {value:?}")))
}

pub fn format_option(ordinal: usize, formatter: &EnumFormatter) -> String {
    formatter.print(ordinal).to_string()
}
