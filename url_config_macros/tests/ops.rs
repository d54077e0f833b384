use std::fmt;
use std::str::FromStr;
use url_config::prelude::*;
use url_config_macros::service_config;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Team(String);

impl FromStr for Team {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err("team name cannot be empty".to_string());
        }
        Ok(Team(s.to_string()))
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Level {
    #[default]
    Info,
    Warn,
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(Level::Info),
            "warn" => Ok(Level::Warn),
            _ => Err(format!("unknown level {s:?}")),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Info => f.write_str("info"),
            Level::Warn => f.write_str("warn"),
        }
    }
}

impl_config_value_for_fromstr!(Team, Level);

service_config!(pub OpsConfig, file = "tests/specs/ops.yml");
service_config!(
    pub FilesConfig,
    yaml = "scheme: files
props:
  Host:
    type: text
    urlParts: [host]
  Bucket:
    type: text
    urlParts: [path1]
  Key:
    type: list
    urlParts: [path]
",
);

fn parse(s: &str) -> Result<OpsConfig, ConfigError> {
    from_url(&Url::parse(s).unwrap())
}

#[test]
fn test_reverse_path_priority() {
    let config = parse(
        "ops://api.ops.example/v1/teams/abcd1234?responders=ops,dev&region=us-east&level=warn",
    )
    .unwrap();
    assert_eq!(config.api_key, "abcd1234");
    assert_eq!(config.prefix, vec!["v1", "teams"]);
    assert_eq!(
        config.responders,
        vec![Team("ops".to_string()), Team("dev".to_string())]
    );
    assert_eq!(config.region, "us-east");
    assert_eq!(config.level, Level::Warn);

    let url = config.get_url().unwrap();
    assert_eq!(
        url.as_str(),
        "ops://api.ops.example/v1/teams/abcd1234?level=warn&region=us-east&responders=ops%2Cdev"
    );
    assert_eq!(from_url::<OpsConfig>(&url), Ok(config));
}

#[test]
fn test_path_without_prefix() {
    let config = parse("ops://api.ops.example/abcd1234").unwrap();
    assert_eq!(config.api_key, "abcd1234");
    assert!(config.prefix.is_empty());
    assert_eq!(config.region, "eu-west");
    assert_eq!(config.level, Level::Info);
    assert_eq!(config.port, 443);
    assert_eq!(
        config.get_url().unwrap().as_str(),
        "ops://api.ops.example/abcd1234"
    );
}

#[test]
fn test_length_validation() {
    let res = parse("ops://api.ops.example/abc");
    assert!(
        matches!(&res, Err(ConfigError::ValidationFailed { name, .. }) if name == "ApiKey"),
        "Expected ValidationFailed error, but got {:?}",
        res
    );
}

#[test]
fn test_regex_validation() {
    let res = parse("ops://api.ops.example/abcd1234?region=EU");
    assert!(
        matches!(&res, Err(ConfigError::ValidationFailed { name, message })
            if name == "Region" && message == "value EU does not match the expected format"),
        "Expected ValidationFailed error, but got {:?}",
        res
    );
}

#[test]
fn test_not_equal_validation() {
    let res = parse("ops://api.ops.example/abcd1234?backup=eu-west");
    assert!(
        matches!(&res, Err(ConfigError::ValidationFailed { name, message })
            if name == "Backup" && message == "value eu-west is already used for Region"),
        "Expected ValidationFailed error, but got {:?}",
        res
    );

    let config = parse("ops://api.ops.example/abcd1234?backup=us-east").unwrap();
    assert_eq!(config.backup, "us-east");
}

#[test]
fn test_known_port_range() {
    let res = parse("ops://api.ops.example/abcd1234?port=0");
    assert!(
        matches!(&res, Err(ConfigError::ValidationFailed { name, message })
            if name == "Port" && message == "value 0 is not in the range 1-65535"),
        "Expected ValidationFailed error, but got {:?}",
        res
    );
}

#[test]
fn test_custom_type_errors() {
    let res = parse("ops://api.ops.example/abcd1234?responders=ops,,dev");
    assert!(
        matches!(&res, Err(ConfigError::InvalidValue { name, message })
            if name == "Responders" && message == "team name cannot be empty"),
        "Expected InvalidValue error, but got {:?}",
        res
    );

    let res = parse("ops://api.ops.example/abcd1234?level=debug");
    assert!(
        matches!(&res, Err(ConfigError::InvalidValue { name, .. }) if name == "Level"),
        "Expected InvalidValue error, but got {:?}",
        res
    );
}

#[test]
fn test_api_key_is_hidden() {
    let config = parse("ops://api.ops.example/abcd1234").unwrap();
    let debug = format!("{config:?}");
    assert!(!debug.contains("abcd1234"), "{debug}");
    assert!(debug.starts_with("OpsConfig {"), "{debug}");
}

#[test]
fn test_path_segments_are_escaped() {
    let mut config = parse("ops://api.ops.example/abcd1234").unwrap();
    config.prefix = vec!["a b".to_string(), "c".to_string()];
    let url = config.get_url().unwrap();
    assert_eq!(url.as_str(), "ops://api.ops.example/a%20b/c/abcd1234");
    assert_eq!(from_url::<OpsConfig>(&url), Ok(config));
}

#[test]
fn test_empty_rest_items_survive_reverse_path() {
    let config = parse("ops://api.ops.example/v1//abcd1234").unwrap();
    assert_eq!(config.prefix, vec!["v1", ""]);
    assert_eq!(config.api_key, "abcd1234");

    let url = config.get_url().unwrap();
    assert_eq!(url.as_str(), "ops://api.ops.example/v1//abcd1234");
    assert_eq!(from_url::<OpsConfig>(&url), Ok(config));

    let config = parse("ops://api.ops.example/v1//teams/abcd1234").unwrap();
    assert_eq!(config.prefix, vec!["v1", "", "teams"]);
    let url = config.get_url().unwrap();
    assert_eq!(url.as_str(), "ops://api.ops.example/v1//teams/abcd1234");
    assert_eq!(from_url::<OpsConfig>(&url), Ok(config));
}

#[test]
fn test_empty_rest_items_survive_forward_path() {
    let config: FilesConfig = from_url(&Url::parse("files://store/docs/a//b").unwrap()).unwrap();
    assert_eq!(config.bucket, "docs");
    assert_eq!(config.key, vec!["a", "", "b"]);

    let url = config.get_url().unwrap();
    assert_eq!(url.as_str(), "files://store/docs/a//b");
    assert_eq!(from_url::<FilesConfig>(&url), Ok(config));
}
