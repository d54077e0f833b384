//! A hand-written configuration shaped like generated code, for exercising
//! the support routines without the generator.

use crate::types::{format_list, format_number, format_text, parse_list, parse_number, parse_text};
use crate::validators::{RequiredValidator, Validator};
use crate::{ConfigError, ConfigPropInfo, EnumRegistry, GeneratedConfig, Updates, UrlLayout};
use url::Url;

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct MailConfig {
    pub user: String,
    pub password: String,
    pub host: String,
    pub subject: String,
    pub port: i64,
    pub folder: String,
    pub labels: Vec<String>,
}

pub(crate) static LAYOUT: UrlLayout = UrlLayout {
    scheme: "mail",
    user: Some(0),
    password: Some(1),
    host: Some(2),
    port: Some(4),
    path_slots: &[],
    path_rest: None,
    query_vars: None,
    reverse_path_prio: false,
    custom_query_vars: false,
};

static PROP_INFO: ConfigPropInfo = ConfigPropInfo {
    prop_names: &["User", "Password", "Host", "Subject", "Port", "Folder", "Labels"],
    default_values: &["", "", "", "Hello", "0", "", ""],
    keys: &["folder", "labels", "subject"],
    key_props: &[5, 6, 3],
    primary_keys: &[None, None, None, Some(2), None, Some(0), Some(1)],
    credentials: &[false, true, false, false, false, false, false],
};

impl GeneratedConfig for MailConfig {
    fn scheme(&self) -> &'static str {
        LAYOUT.scheme
    }

    fn update(&mut self, updates: &Updates) -> Result<(), ConfigError> {
        let mut first_err = None;
        for (&index, value) in updates {
            let res = match index {
                0 => parse_text("User", value).map(|v| self.user = v),
                1 => parse_text("Password", value).map(|v| self.password = v),
                2 => parse_text("Host", value).map(|v| self.host = v),
                3 => parse_text("Subject", value).map(|v| self.subject = v),
                4 => parse_number("Port", value, 10).map(|v| self.port = v),
                5 => parse_text("Folder", value).map(|v| self.folder = v),
                6 => parse_list("Labels", value, ",").map(|v| self.labels = v),
                _ => return Err(ConfigError::UnknownProperty(index)),
            };
            if let Err(e) = res {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    fn prop_value(&self, index: usize) -> String {
        match index {
            0 => format_text(&self.user),
            1 => format_text(&self.password),
            2 => format_text(&self.host),
            3 => format_text(&self.subject),
            4 => format_number(self.port, 10),
            5 => format_text(&self.folder),
            6 => format_list(&self.labels, ","),
            _ => String::new(),
        }
    }

    fn get_url(&self) -> Result<Url, ConfigError> {
        LAYOUT.build_url(self)
    }

    fn set_url(&mut self, url: &Url) -> Result<(), ConfigError> {
        crate::support::apply_url(self, &LAYOUT, url)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        RequiredValidator.validate("Host", &self.prop_value(2), &self.host.is_empty())
    }

    fn enums(&self) -> EnumRegistry {
        EnumRegistry::new()
    }

    fn prop_info(&self) -> &'static ConfigPropInfo {
        &PROP_INFO
    }
}
