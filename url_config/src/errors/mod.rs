/// Errors raised while applying values to a generated configuration.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("failed to set value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("validation failed for {name}: {message}")]
    ValidationFailed { name: String, message: String },
    #[error("invalid key {0:?}")]
    UnknownKey(String),
    #[error("no property with index {0}")]
    UnknownProperty(usize),
    #[error("too many path items: {found}, expected {expected}")]
    TooManyPathItems { found: usize, expected: usize },
    #[error("unexpected path in config URL: {0}")]
    UnexpectedPath(String),
    #[error("URL scheme {found:?} does not match {expected:?}")]
    SchemeMismatch { expected: String, found: String },
    #[error("failed to assemble config URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ConfigError {
    pub(crate) fn invalid_value(name: &str, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            name: name.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn validation_failed(name: &str, message: impl Into<String>) -> Self {
        ConfigError::ValidationFailed {
            name: name.to_string(),
            message: message.into(),
        }
    }
}

/// Errors in a service specification. These are detected before any code is
/// generated and are fatal to the build.
#[derive(thiserror::Error, Debug)]
pub enum SchemaError {
    #[error("failed to parse service spec: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
    #[error("invalid scheme {0:?}: expected a lower-case identifier")]
    InvalidScheme(String),
    #[error("invalid property '{name}': {message}")]
    InvalidProperty { name: String, message: String },
    #[error("invalid {kind} validation for '{name}': {message}")]
    InvalidValidator {
        name: String,
        kind: &'static str,
        message: String,
    },
    #[error("URL part '{part}' is claimed by both '{first}' and '{second}'")]
    DuplicateUrlPart {
        part: String,
        first: String,
        second: String,
    },
    #[error("path slots must be contiguous: '{part}' is claimed but '{missing}' is not")]
    PathGap { part: String, missing: String },
    #[error("key {key:?} is used by both '{first}' and '{second}'")]
    DuplicateKey {
        key: String,
        first: String,
        second: String,
    },
    #[error("{0}")]
    InvalidOptions(String),
}

impl SchemaError {
    pub(crate) fn property(name: &str, message: impl Into<String>) -> Self {
        SchemaError::InvalidProperty {
            name: name.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn validator(name: &str, kind: &'static str, message: impl Into<String>) -> Self {
        SchemaError::InvalidValidator {
            name: name.to_string(),
            kind,
            message: message.into(),
        }
    }
}
