use crate::errors::ConfigError;

/// The hook a service implements for properties of kind `custom`.
///
/// A property declared as
///
/// ```yaml
/// Responders:
///   type: list
///   customType: Entity
/// ```
///
/// is stored as a `Vec<Entity>`, and every item goes through
/// `Entity::parse` on the way in and `Entity::to_config_string` on the way
/// out. A plain `custom` property is stored as the custom type itself.
///
/// The flow for a value read from a URL is:
/// **Raw String** -> **`ConfigValue::parse`** -> **Typed Field**
///
/// `Default` provides the value a freshly constructed configuration holds
/// before any defaults or URL values are applied.
pub trait ConfigValue: Sized + Clone + Default + PartialEq {
    /// Parses a raw string into the custom type.
    ///
    /// `key` is the name of the property being set so that errors can point
    /// at it, e.g. `"failed to set value for Responders: unknown team"`.
    fn parse(key: &str, value_str: &str) -> Result<Self, ConfigError>;

    /// Converts the value back into its canonical string representation.
    ///
    /// This is what ends up in the URL, and what is compared against the
    /// declared default to decide whether the property is emitted at all.
    fn to_config_string(&self) -> String;

    /// Emptiness test used by the implicit `required` validator.
    fn is_empty_value(&self) -> bool {
        self.to_config_string().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impl_config_value_for_fromstr;
    use crate::types::{format_custom_list, parse_custom_list};
    use std::fmt;
    use std::str::FromStr;

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Team(String);

    impl FromStr for Team {
        type Err = String;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s.strip_prefix("team:") {
                Some(name) if !name.is_empty() => Ok(Team(name.to_string())),
                _ => Err(format!("{s:?} is not a team")),
            }
        }
    }

    impl fmt::Display for Team {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "team:{}", self.0)
        }
    }

    impl_config_value_for_fromstr!(Team);

    #[test]
    fn test_custom_list_round_trip() {
        let teams: Vec<Team> = parse_custom_list("Responders", "team:ops,team:dev", ",").unwrap();
        assert_eq!(teams, vec![Team("ops".into()), Team("dev".into())]);
        assert_eq!(format_custom_list(&teams, ","), "team:ops,team:dev");
    }

    #[test]
    fn test_custom_parse_error_names_property() {
        let res: Result<Vec<Team>, _> = parse_custom_list("Responders", "team:ops,ops", ",");
        assert!(
            matches!(&res, Err(ConfigError::InvalidValue { name, message })
                if name == "Responders" && message == "\"ops\" is not a team"),
            "Expected InvalidValue error, but got {:?}",
            res
        );
    }
}
