//! Positions a property can occupy in a service URL.

use serde::Deserialize;
use std::fmt::{self, Display};
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
pub enum UrlPart {
    Scheme,
    User,
    Password,
    Host,
    Port,
    Path1,
    Path2,
    Path3,
    Path4,
    /// Every path segment not taken by `path1`..`path4`.
    Path,
    Query,
}

impl UrlPart {
    pub const PATH_SLOTS: [UrlPart; 4] = [
        UrlPart::Path1,
        UrlPart::Path2,
        UrlPart::Path3,
        UrlPart::Path4,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UrlPart::Scheme => "scheme",
            UrlPart::User => "user",
            UrlPart::Password => "password",
            UrlPart::Host => "host",
            UrlPart::Port => "port",
            UrlPart::Path1 => "path1",
            UrlPart::Path2 => "path2",
            UrlPart::Path3 => "path3",
            UrlPart::Path4 => "path4",
            UrlPart::Path => "path",
            UrlPart::Query => "query",
        }
    }

    /// The separator written between this part and the next one.
    pub fn suffix(&self) -> char {
        match self {
            UrlPart::User | UrlPart::Host => ':',
            UrlPart::Password => '@',
            _ => '/',
        }
    }

    /// Zero-based slot number for `path1`..`path4`.
    pub fn path_slot(&self) -> Option<usize> {
        UrlPart::PATH_SLOTS.iter().position(|slot| slot == self)
    }
}

impl Display for UrlPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UrlPart {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "scheme" => Ok(UrlPart::Scheme),
            "user" => Ok(UrlPart::User),
            "pass" | "password" => Ok(UrlPart::Password),
            "host" => Ok(UrlPart::Host),
            "port" => Ok(UrlPart::Port),
            "path1" => Ok(UrlPart::Path1),
            "path2" => Ok(UrlPart::Path2),
            "path3" => Ok(UrlPart::Path3),
            "path4" => Ok(UrlPart::Path4),
            "path" => Ok(UrlPart::Path),
            "query" | "" => Ok(UrlPart::Query),
            other => Err(format!("unknown URL part {other:?}")),
        }
    }
}

impl TryFrom<String> for UrlPart {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
