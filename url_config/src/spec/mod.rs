//! The declarative description of a service.
//!
//! A service is described by a YAML document such as
//!
//! ```yaml
//! version: 1
//! scheme: x
//! options:
//!   customQueryVars: no
//! props:
//!   Host:
//!     type: text
//!     required: yes
//!     urlParts: [host]
//!   Count:
//!     type: number
//!     default: 0
//!     keys: [count]
//! ```
//!
//! [`ServiceSpec::from_yaml`] parses and verifies such a document. Once it
//! returns, every structural rule the generator relies on holds, so code generation
//! itself cannot fail on a schema problem.

use crate::errors::SchemaError;
use crate::types::{self, PropType};
use crate::url_part::UrlPart;
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

mod validation;

pub use validation::{LengthRule, RangeRule, RegexRule, Validation, ValidatorSpec};

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSpec {
    #[serde(default)]
    pub version: u32,
    pub scheme: String,
    #[serde(default)]
    pub options: SpecOptions,
    #[serde(default)]
    pub props: IndexMap<String, PropertySpec>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecOptions {
    /// Fixed path slots take the tail of the path and the rest-of-path
    /// property takes the head.
    #[serde(default, deserialize_with = "de::flag")]
    pub reverse_path_prio: bool,
    /// Unknown query keys are kept instead of rejected.
    #[serde(default, deserialize_with = "de::flag")]
    pub custom_query_vars: bool,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySpec {
    #[serde(rename = "type")]
    pub prop_type: PropType,
    #[serde(default)]
    pub description: String,
    #[serde(skip)]
    pub name: String,
    #[serde(default, rename = "default", deserialize_with = "de::scalar")]
    pub default_value: String,
    #[serde(default, deserialize_with = "de::flag")]
    pub required: bool,
    #[serde(default, alias = "urlparts")]
    pub url_parts: Vec<UrlPart>,
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub base: Option<u32>,
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default)]
    pub custom_type: Option<String>,
    #[serde(default)]
    pub item_separator: Option<String>,
    #[serde(default)]
    pub value_separator: Option<String>,
    #[serde(default, deserialize_with = "de::flag")]
    pub credential: bool,
    #[serde(default)]
    pub validation: Validation,
}

impl ServiceSpec {
    /// Parses a spec document, then verifies it.
    pub fn from_yaml(source: &str) -> Result<Self, SchemaError> {
        let mut spec: ServiceSpec = serde_yaml_ng::from_str(source)?;
        for (name, prop) in spec.props.iter_mut() {
            prop.name = name.clone();
            for key in prop.keys.iter_mut() {
                *key = key.to_lowercase();
            }
        }
        spec.verify()?;
        debug!(
            scheme = %spec.scheme,
            props = spec.props.len(),
            "verified service spec"
        );
        Ok(spec)
    }

    /// Dense index of the property called `name`, in declaration order.
    pub fn prop_index(&self, name: &str) -> Option<usize> {
        self.props.get_index_of(name)
    }

    /// Checks the cross-property rules that serde cannot express.
    pub fn verify(&self) -> Result<(), SchemaError> {
        let valid_scheme = self.scheme.starts_with(|c: char| c.is_ascii_lowercase())
            && self
                .scheme
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || "+-.".contains(c));
        if !valid_scheme {
            return Err(SchemaError::InvalidScheme(self.scheme.clone()));
        }

        let mut claimed: HashMap<UrlPart, &str> = HashMap::new();
        let mut keys: HashMap<&str, &str> = HashMap::new();

        for prop in self.props.values() {
            prop.verify()?;

            for part in &prop.url_parts {
                if let Some(first) = claimed.insert(*part, &prop.name) {
                    return Err(SchemaError::DuplicateUrlPart {
                        part: part.to_string(),
                        first: first.to_string(),
                        second: prop.name.clone(),
                    });
                }
            }
            for key in &prop.keys {
                if let Some(first) = keys.insert(key, &prop.name) {
                    return Err(SchemaError::DuplicateKey {
                        key: key.clone(),
                        first: first.to_string(),
                        second: prop.name.clone(),
                    });
                }
            }
            for validator in prop.validators()? {
                if let ValidatorSpec::NotEqual { other } = validator
                    && self.prop_index(&other).is_none()
                {
                    return Err(SchemaError::validator(
                        &prop.name,
                        "notEqual",
                        format!("unknown property '{other}'"),
                    ));
                }
            }
        }

        for (slot, part) in UrlPart::PATH_SLOTS.iter().enumerate() {
            if !claimed.contains_key(part) {
                continue;
            }
            if let Some(missing) = UrlPart::PATH_SLOTS[..slot]
                .iter()
                .find(|lower| !claimed.contains_key(*lower))
            {
                return Err(SchemaError::PathGap {
                    part: part.to_string(),
                    missing: missing.to_string(),
                });
            }
        }

        let carriers = self
            .props
            .values()
            .filter(|prop| prop.is_query_carrier())
            .count();
        match (self.options.custom_query_vars, carriers) {
            (true, 1) | (false, 0) => Ok(()),
            (true, n) => Err(SchemaError::InvalidOptions(format!(
                "customQueryVars requires exactly one map property in the query part, found {n}"
            ))),
            (false, _) => Err(SchemaError::InvalidOptions(
                "the query part can only be claimed when customQueryVars is enabled".to_string(),
            )),
        }
    }
}

impl PropertySpec {
    /// Resolved validators in evaluation order: regex, range, length,
    /// notEqual, required.
    pub fn validators(&self) -> Result<Vec<ValidatorSpec>, SchemaError> {
        validation::resolve(&self.name, self.prop_type, self.required, &self.validation)
    }

    pub fn base(&self) -> u32 {
        self.base.unwrap_or(types::DEFAULT_NUMBER_BASE)
    }

    pub fn item_separator(&self) -> &str {
        self.item_separator
            .as_deref()
            .unwrap_or(types::DEFAULT_ITEM_SEPARATOR)
    }

    pub fn value_separator(&self) -> &str {
        self.value_separator
            .as_deref()
            .unwrap_or(types::DEFAULT_VALUE_SEPARATOR)
    }

    pub fn claims(&self, part: UrlPart) -> bool {
        self.url_parts.contains(&part)
    }

    /// A map in the query part holds the custom query variables.
    pub fn is_query_carrier(&self) -> bool {
        self.prop_type == PropType::Map && self.claims(UrlPart::Query)
    }

    /// The property owns every path segment not taken by a fixed slot.
    pub fn is_rest_path(&self) -> bool {
        self.claims(UrlPart::Path)
    }

    /// The default in the form the property formats it, so that it can be
    /// compared with a live value.
    pub fn canonical_default(&self) -> Result<String, SchemaError> {
        let name = self.name.as_str();
        let raw = self.default_value.as_str();
        let invalid = |e: crate::ConfigError| {
            SchemaError::property(name, format!("invalid default {raw:?}: {e}"))
        };

        let canonical = match self.prop_type {
            PropType::Number => {
                let number = types::parse_number(name, raw, self.base()).map_err(invalid)?;
                types::format_number(number, self.base())
            }
            PropType::Toggle if raw.is_empty() => types::format_toggle(false).to_string(),
            PropType::Toggle => {
                types::format_toggle(types::parse_toggle(name, raw).map_err(invalid)?).to_string()
            }
            PropType::Color if raw.is_empty() => types::format_color(0),
            PropType::Color => types::format_color(types::parse_color(name, raw).map_err(invalid)?),
            PropType::Duration => {
                types::format_duration(types::parse_duration(name, raw).map_err(invalid)?)
            }
            PropType::Map if self.is_query_carrier() => {
                types::format_query_map(&types::parse_query_map(name, raw).map_err(invalid)?)
            }
            PropType::Map => {
                let map = types::parse_map(name, raw, self.item_separator(), self.value_separator())
                    .map_err(invalid)?;
                types::format_map(&map, self.item_separator(), self.value_separator())
            }
            PropType::Option if raw.is_empty() => self.values.first().cloned().unwrap_or_default(),
            PropType::Option => self
                .values
                .iter()
                .find(|value| value.eq_ignore_ascii_case(raw))
                .cloned()
                .ok_or_else(|| {
                    SchemaError::property(
                        name,
                        format!("invalid default {raw:?}: not one of the declared values"),
                    )
                })?,
            PropType::Text | PropType::List | PropType::Custom => raw.to_string(),
        };
        Ok(canonical)
    }

    fn verify(&self) -> Result<(), SchemaError> {
        let name = self.name.as_str();
        if name.is_empty() {
            return Err(SchemaError::property(name, "property name cannot be empty"));
        }

        match self.url_parts.as_slice() {
            [] | [_] => {}
            [UrlPart::Host, UrlPart::Port] => {}
            parts => {
                let parts: Vec<_> = parts.iter().map(UrlPart::as_str).collect();
                return Err(SchemaError::property(
                    name,
                    format!("cannot claim URL parts [{}]", parts.join(", ")),
                ));
            }
        }
        for part in &self.url_parts {
            let allowed = match part {
                UrlPart::Scheme => false,
                UrlPart::Query => self.prop_type == PropType::Map,
                UrlPart::Path => matches!(self.prop_type, PropType::List | PropType::Text),
                _ => true,
            };
            if !allowed {
                return Err(SchemaError::property(
                    name,
                    format!("{} properties cannot claim the {part} part", self.prop_type),
                ));
            }
        }

        if let Some(base) = self.base
            && (self.prop_type != PropType::Number || !(2..=36).contains(&base))
        {
            return Err(SchemaError::property(
                name,
                format!("base {base} is only valid for number properties, within 2..=36"),
            ));
        }

        if self.prop_type == PropType::Option {
            if self.values.is_empty() {
                return Err(SchemaError::property(
                    name,
                    "option properties need at least one value",
                ));
            }
            for (i, value) in self.values.iter().enumerate() {
                if value.is_empty() {
                    return Err(SchemaError::property(name, "option values cannot be empty"));
                }
                if self.values[..i].iter().any(|prev| prev.eq_ignore_ascii_case(value)) {
                    return Err(SchemaError::property(
                        name,
                        format!("option value {value:?} is declared twice"),
                    ));
                }
            }
        } else if !self.values.is_empty() {
            return Err(SchemaError::property(name, "values are only valid for option properties"));
        }

        match (self.prop_type, &self.custom_type) {
            (PropType::Custom, None) => {
                return Err(SchemaError::property(name, "custom properties need a customType"));
            }
            (PropType::Custom | PropType::List, _) | (_, None) => {}
            (_, Some(_)) => {
                return Err(SchemaError::property(
                    name,
                    "customType is only valid for custom and list properties",
                ));
            }
        }

        let separators = [
            (
                &self.item_separator,
                matches!(self.prop_type, PropType::List | PropType::Map),
                "itemSeparator",
            ),
            (&self.value_separator, self.prop_type == PropType::Map, "valueSeparator"),
        ];
        for (separator, applicable, field) in separators {
            match separator {
                Some(_) if !applicable => {
                    return Err(SchemaError::property(
                        name,
                        format!("{field} is not valid for {} properties", self.prop_type),
                    ));
                }
                Some(sep) if sep.is_empty() => {
                    return Err(SchemaError::property(name, format!("{field} cannot be empty")));
                }
                _ => {}
            }
        }

        if self.is_query_carrier() && !self.keys.is_empty() {
            return Err(SchemaError::property(name, "the query part cannot also have keys"));
        }

        if self.credential && !self.default_value.is_empty() {
            return Err(SchemaError::property(name, "credentials cannot have a default value"));
        }

        self.canonical_default()?;
        Ok(())
    }
}

mod de {
    use crate::types::parse_bool;
    use serde::Deserializer;
    use serde::de::{self, Unexpected, Visitor};
    use std::fmt;

    /// Accepts `true`/`false` as well as `yes`/`no` and `1`/`0`.
    pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        deserializer.deserialize_any(FlagVisitor)
    }

    /// Accepts any scalar and keeps its textual form, so `default: 443`
    /// reads as `"443"`.
    pub fn scalar<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        deserializer.deserialize_any(ScalarVisitor)
    }

    struct FlagVisitor;

    impl Visitor<'_> for FlagVisitor {
        type Value = bool;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("true, false, yes or no")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            match v {
                0 => Ok(false),
                1 => Ok(true),
                _ => Err(E::invalid_value(Unexpected::Signed(v), &self)),
            }
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            match v {
                0 => Ok(false),
                1 => Ok(true),
                _ => Err(E::invalid_value(Unexpected::Unsigned(v), &self)),
            }
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            parse_bool(v).ok_or_else(|| E::invalid_value(Unexpected::Str(v), &self))
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(false)
        }
    }

    struct ScalarVisitor;

    impl Visitor<'_> for ScalarVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string, number or boolean")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(String::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COUNT_SPEC: &str = r#"
version: 1
scheme: x
props:
  Host:
    type: text
    description: Server host
    required: yes
    urlParts: [host]
  Count:
    type: number
    default: 0
    keys: [Count, n]
"#;

    fn prop(yaml: &str) -> String {
        format!("scheme: x\nprops:\n  Prop:\n{}", indent(yaml))
    }

    fn indent(yaml: &str) -> String {
        yaml.lines().map(|line| format!("    {line}\n")).collect()
    }

    fn assert_property_error(yaml: &str, expected: &str) {
        let res = ServiceSpec::from_yaml(&prop(yaml));
        assert!(
            matches!(&res, Err(SchemaError::InvalidProperty { message, .. })
                if message.contains(expected)),
            "Expected InvalidProperty error containing {expected:?}, but got {:?}",
            res
        );
    }

    #[test]
    fn test_parse_count_spec() {
        let spec = ServiceSpec::from_yaml(COUNT_SPEC).unwrap();
        assert_eq!(spec.scheme, "x");
        assert_eq!(spec.version, 1);
        assert_eq!(spec.prop_index("Host"), Some(0));
        assert_eq!(spec.prop_index("Count"), Some(1));

        let host = &spec.props["Host"];
        assert_eq!(host.name, "Host");
        assert!(host.required);
        assert_eq!(host.url_parts, vec![UrlPart::Host]);
        assert_eq!(host.validators().unwrap(), vec![ValidatorSpec::Required]);

        let count = &spec.props["Count"];
        assert_eq!(count.default_value, "0");
        assert_eq!(count.keys, vec!["count", "n"]);
        assert_eq!(count.canonical_default().unwrap(), "0");
    }

    #[test]
    fn test_flag_vocabulary() {
        let yaml = "scheme: x\noptions:\n  reversePathPrio: yes\n  customQueryVars: 0\n";
        let spec = ServiceSpec::from_yaml(yaml).unwrap();
        assert!(spec.options.reverse_path_prio);
        assert!(!spec.options.custom_query_vars);

        let res = ServiceSpec::from_yaml("scheme: x\noptions:\n  reversePathPrio: maybe\n");
        assert!(matches!(res, Err(SchemaError::Yaml(_))), "{res:?}");
    }

    #[test]
    fn test_canonical_defaults() {
        let yaml = r##"
scheme: x
props:
  Color:
    type: color
    default: "#FF0000"
  Timeout:
    type: duration
    default: 90s
  Enabled:
    type: toggle
    default: true
  Level:
    type: option
    values: [Low, High]
    default: high
  Mask:
    type: number
    base: 16
    default: 255
  Tags:
    type: map
    default: b:2,a:1
"##;
        let spec = ServiceSpec::from_yaml(yaml).unwrap();
        let defaults: Vec<_> = spec
            .props
            .values()
            .map(|prop| prop.canonical_default().unwrap())
            .collect();
        assert_eq!(defaults, vec!["0xff0000", "1m 30s", "Yes", "High", "255", "a:1,b:2"]);
    }

    #[test]
    fn test_invalid_defaults() {
        assert_property_error("type: number\ndefault: ten", "invalid default");
        assert_property_error("type: option\nvalues: [A]\ndefault: B", "invalid default");
        assert_property_error("type: toggle\ndefault: maybe", "invalid default");
        assert_property_error(
            "type: text\ncredential: yes\ndefault: hunter2",
            "credentials cannot have a default value",
        );
    }

    #[test]
    fn test_invalid_properties() {
        assert_property_error("type: text\nurlParts: [scheme]", "cannot claim the scheme part");
        assert_property_error("type: text\nurlParts: [query]", "cannot claim the query part");
        assert_property_error("type: number\nurlParts: [path]", "cannot claim the path part");
        assert_property_error("type: text\nurlParts: [path1, path2]", "cannot claim URL parts");
        assert_property_error("type: option", "at least one value");
        assert_property_error("type: option\nvalues: [a, A]", "declared twice");
        assert_property_error("type: text\nbase: 16", "base 16");
        assert_property_error("type: custom", "need a customType");
        assert_property_error("type: text\nitemSeparator: ';'", "itemSeparator");
        assert_property_error("type: list\nvalueSeparator: '='", "valueSeparator");
    }

    #[test]
    fn test_duplicate_claims() {
        let yaml = "scheme: x\nprops:\n  A:\n    type: text\n    urlParts: [host]\n  \
                    B:\n    type: text\n    urlParts: [host]\n";
        let res = ServiceSpec::from_yaml(yaml);
        assert!(
            matches!(&res, Err(SchemaError::DuplicateUrlPart { part, first, second })
                if part == "host" && first == "A" && second == "B"),
            "Expected DuplicateUrlPart error, but got {:?}",
            res
        );

        let yaml = "scheme: x\nprops:\n  A:\n    type: text\n    keys: [Token]\n  \
                    B:\n    type: text\n    keys: [token]\n";
        let res = ServiceSpec::from_yaml(yaml);
        assert!(
            matches!(&res, Err(SchemaError::DuplicateKey { key, .. }) if key == "token"),
            "Expected DuplicateKey error, but got {:?}",
            res
        );
    }

    #[test]
    fn test_path_gap() {
        let yaml = "scheme: x\nprops:\n  A:\n    type: text\n    urlParts: [path1]\n  \
                    B:\n    type: text\n    urlParts: [path3]\n";
        let res = ServiceSpec::from_yaml(yaml);
        assert!(
            matches!(&res, Err(SchemaError::PathGap { part, missing })
                if part == "path3" && missing == "path2"),
            "Expected PathGap error, but got {:?}",
            res
        );
    }

    #[test]
    fn test_custom_query_vars_carrier() {
        let res = ServiceSpec::from_yaml("scheme: x\noptions:\n  customQueryVars: yes\n");
        assert!(matches!(res, Err(SchemaError::InvalidOptions(_))), "{res:?}");

        let yaml = "scheme: x\nprops:\n  Extra:\n    type: map\n    urlParts: [query]\n";
        let res = ServiceSpec::from_yaml(yaml);
        assert!(matches!(res, Err(SchemaError::InvalidOptions(_))), "{res:?}");

        let yaml = format!("{yaml}options:\n  customQueryVars: yes\n");
        let spec = ServiceSpec::from_yaml(&yaml).unwrap();
        assert!(spec.props["Extra"].is_query_carrier());
    }

    #[test]
    fn test_not_equal_target_must_exist() {
        let yaml =
            "scheme: x\nprops:\n  To:\n    type: text\n    validation:\n      notEqual: From\n";
        let res = ServiceSpec::from_yaml(yaml);
        assert!(
            matches!(&res, Err(SchemaError::InvalidValidator { kind: "notEqual", .. })),
            "Expected InvalidValidator error, but got {:?}",
            res
        );
    }

    #[test]
    fn test_invalid_scheme() {
        for scheme in ["", "X", "1x", "x y"] {
            let res = ServiceSpec::from_yaml(&format!("scheme: '{scheme}'\n"));
            assert!(matches!(res, Err(SchemaError::InvalidScheme(_))), "{scheme}: {res:?}");
        }
    }
}
