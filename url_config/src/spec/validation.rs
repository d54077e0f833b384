use crate::errors::SchemaError;
use crate::types::PropType;
use crate::validators::pattern::RegexValidator;
use crate::validators::range::RangeValidator;
use serde::Deserialize;
use std::fmt::{self, Display};

/// The `validation` block of a property.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Validation {
    #[serde(default)]
    pub range: Option<RangeRule>,
    #[serde(default)]
    pub length: Option<LengthRule>,
    #[serde(default)]
    pub regex: Option<RegexRule>,
    #[serde(default)]
    pub not_equal: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct RangeRule {
    #[serde(default)]
    pub minimum: Option<i64>,
    #[serde(default)]
    pub maximum: Option<i64>,
    #[serde(default)]
    pub known: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct LengthRule {
    #[serde(default)]
    pub minimum: Option<usize>,
    #[serde(default)]
    pub maximum: Option<usize>,
    #[serde(default)]
    pub equals: Option<usize>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct RegexRule {
    #[serde(default, rename = "matches")]
    pub pattern: Option<String>,
    #[serde(default)]
    pub known: Option<String>,
}

/// A validator with its presets resolved and its parameters checked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidatorSpec {
    Regex {
        pattern: String,
    },
    Range {
        minimum: Option<i64>,
        maximum: Option<i64>,
    },
    Length {
        minimum: Option<usize>,
        maximum: Option<usize>,
    },
    NotEqual {
        other: String,
    },
    Required,
}

impl ValidatorSpec {
    pub fn kind(&self) -> &'static str {
        match self {
            ValidatorSpec::Regex { .. } => "regex",
            ValidatorSpec::Range { .. } => "range",
            ValidatorSpec::Length { .. } => "length",
            ValidatorSpec::NotEqual { .. } => "notEqual",
            ValidatorSpec::Required => "required",
        }
    }
}

impl Display for ValidatorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidatorSpec::Regex { pattern } => write!(f, "matches /{pattern}/"),
            ValidatorSpec::Range { minimum, maximum } => {
                write!(f, "in {}", RangeValidator::new(*minimum, *maximum))
            }
            ValidatorSpec::Length { minimum, maximum } => {
                let min = minimum.map_or_else(|| "*".to_string(), |m| m.to_string());
                let max = maximum.map_or_else(|| "*".to_string(), |m| m.to_string());
                write!(f, "length {min}-{max}")
            }
            ValidatorSpec::NotEqual { other } => write!(f, "not equal to {other}"),
            ValidatorSpec::Required => write!(f, "required"),
        }
    }
}

/// Resolves the validators of one property, in evaluation order.
pub(crate) fn resolve(
    name: &str,
    prop_type: PropType,
    required: bool,
    validation: &Validation,
) -> Result<Vec<ValidatorSpec>, SchemaError> {
    let mut validators = Vec::new();

    if let Some(rule) = &validation.regex {
        validators.push(resolve_regex(name, rule)?);
    }
    if let Some(rule) = &validation.range {
        if prop_type != PropType::Number {
            return Err(SchemaError::validator(
                name,
                "range",
                format!("not applicable to {prop_type} properties"),
            ));
        }
        validators.push(resolve_range(name, rule)?);
    }
    if let Some(rule) = &validation.length {
        if !prop_type.has_length() {
            return Err(SchemaError::validator(
                name,
                "length",
                format!("not applicable to {prop_type} properties"),
            ));
        }
        validators.push(resolve_length(name, rule)?);
    }
    if let Some(other) = &validation.not_equal {
        if other.is_empty() || other == name {
            return Err(SchemaError::validator(
                name,
                "notEqual",
                "must name another property",
            ));
        }
        validators.push(ValidatorSpec::NotEqual {
            other: other.clone(),
        });
    }
    if required {
        if !prop_type.has_emptiness() {
            return Err(SchemaError::validator(
                name,
                "required",
                format!("{prop_type} properties cannot be empty"),
            ));
        }
        validators.push(ValidatorSpec::Required);
    }

    Ok(validators)
}

fn resolve_regex(name: &str, rule: &RegexRule) -> Result<ValidatorSpec, SchemaError> {
    let pattern = match (&rule.known, &rule.pattern) {
        (Some(known), _) => RegexValidator::known_pattern(known)
            .ok_or_else(|| {
                SchemaError::validator(name, "regex", format!("unknown pattern {known:?}"))
            })?
            .to_string(),
        (None, Some(pattern)) => pattern.clone(),
        (None, None) => {
            return Err(SchemaError::validator(name, "regex", "no pattern specified"));
        }
    };
    RegexValidator::compile(&pattern)
        .map_err(|e| SchemaError::validator(name, "regex", e.to_string()))?;
    Ok(ValidatorSpec::Regex { pattern })
}

fn resolve_range(name: &str, rule: &RangeRule) -> Result<ValidatorSpec, SchemaError> {
    let (minimum, maximum) = match &rule.known {
        Some(known) => {
            let preset = RangeValidator::known(known).ok_or_else(|| {
                SchemaError::validator(name, "range", format!("unknown range {known:?}"))
            })?;
            (preset.min(), preset.max())
        }
        None => (rule.minimum, rule.maximum),
    };
    check_bounds(name, "range", minimum, maximum)?;
    Ok(ValidatorSpec::Range { minimum, maximum })
}

fn resolve_length(name: &str, rule: &LengthRule) -> Result<ValidatorSpec, SchemaError> {
    let (minimum, maximum) = match rule.equals {
        Some(_) if rule.minimum.is_some() || rule.maximum.is_some() => {
            return Err(SchemaError::validator(
                name,
                "length",
                "minimum/maximum cannot be specified together with equals",
            ));
        }
        Some(equals) => (Some(equals), Some(equals)),
        None => (rule.minimum, rule.maximum),
    };
    check_bounds(name, "length", minimum, maximum)?;
    Ok(ValidatorSpec::Length { minimum, maximum })
}

fn check_bounds<T: PartialOrd + Display>(
    name: &str,
    kind: &'static str,
    minimum: Option<T>,
    maximum: Option<T>,
) -> Result<(), SchemaError> {
    match (minimum, maximum) {
        (None, None) => Err(SchemaError::validator(
            name,
            kind,
            "no minimum or maximum specified",
        )),
        (Some(min), Some(max)) if max < min => Err(SchemaError::validator(
            name,
            kind,
            format!("invalid range {min}-{max}, minimum cannot be larger than maximum"),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::pattern::UUID4_PATTERN;

    fn validation(yaml: &str) -> Validation {
        serde_yaml_ng::from_str(yaml).unwrap()
    }

    #[test]
    fn test_evaluation_order() {
        let v = validation(
            "regex: { matches: '[a-z]+' }\nlength: { maximum: 8 }\nnotEqual: Other\n",
        );
        let resolved = resolve("Name", PropType::Text, true, &v).unwrap();
        let kinds: Vec<_> = resolved.iter().map(ValidatorSpec::kind).collect();
        assert_eq!(kinds, vec!["regex", "length", "notEqual", "required"]);
    }

    #[test]
    fn test_presets() {
        let v = validation("range: { known: port }\nregex: { known: uuid }\n");
        let resolved = resolve("Port", PropType::Number, false, &v).unwrap();
        assert_eq!(
            resolved,
            vec![
                ValidatorSpec::Regex {
                    pattern: UUID4_PATTERN.to_string()
                },
                ValidatorSpec::Range {
                    minimum: Some(1),
                    maximum: Some(65535)
                },
            ]
        );
        assert_eq!(resolved[1].to_string(), "in [1, ..., 65535]");
    }

    #[test]
    fn test_invalid_validators() {
        let cases = [
            ("range: { minimum: 10, maximum: 1 }", PropType::Number, "range"),
            ("range: {}", PropType::Number, "range"),
            ("range: { known: socket }", PropType::Number, "range"),
            ("range: { minimum: 1 }", PropType::Text, "range"),
            ("length: { equals: 4, minimum: 1 }", PropType::Text, "length"),
            ("length: { minimum: 1 }", PropType::Toggle, "length"),
            ("regex: { matches: '[a-' }", PropType::Text, "regex"),
            ("regex: {}", PropType::Text, "regex"),
            ("notEqual: Name", PropType::Text, "notEqual"),
        ];
        for (yaml, prop_type, expected_kind) in cases {
            let res = resolve("Name", prop_type, false, &validation(yaml));
            assert!(
                matches!(&res, Err(SchemaError::InvalidValidator { kind, .. })
                    if *kind == expected_kind),
                "Expected InvalidValidator error for {yaml:?}, but got {:?}",
                res
            );
        }
    }

    #[test]
    fn test_required_needs_emptiness() {
        let res = resolve("Cache", PropType::Toggle, true, &Validation::default());
        assert!(
            matches!(&res, Err(SchemaError::InvalidValidator { kind: "required", .. })),
            "Expected InvalidValidator error, but got {:?}",
            res
        );
    }
}
