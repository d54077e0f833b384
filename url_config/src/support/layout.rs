use crate::errors::ConfigError;
use crate::support::{
    TITLE_KEY, encode_query, join_path, query_values, split_path, unescape_custom_query_key,
};
use crate::types::{QueryVars, format_query_map};
use crate::url_part::UrlPart;
use crate::{ConfigPropInfo, GeneratedConfig, Updates};
use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use tracing::{debug, trace};
use url::Url;

const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

const USERINFO: &AsciiSet = &PATH_SEGMENT
    .add(b':')
    .add(b';')
    .add(b'=')
    .add(b'@')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'|');

/// Where each property of a generated configuration sits in its URL.
///
/// When `host` and `port` hold the same index, one property carries the
/// whole `host:port` authority.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UrlLayout {
    pub scheme: &'static str,
    pub user: Option<usize>,
    pub password: Option<usize>,
    pub host: Option<usize>,
    pub port: Option<usize>,
    /// Properties of `path1`.. in slot order.
    pub path_slots: &'static [usize],
    /// The property that owns every remaining path segment.
    pub path_rest: Option<usize>,
    /// The map that collects custom query variables.
    pub query_vars: Option<usize>,
    pub reverse_path_prio: bool,
    pub custom_query_vars: bool,
}

impl UrlLayout {
    fn combined_host(&self) -> Option<usize> {
        match (self.host, self.port) {
            (Some(host), Some(port)) if host == port => Some(host),
            _ => None,
        }
    }

    /// Assembles the URL from the current property values.
    pub fn build_url<C: GeneratedConfig + ?Sized>(&self, config: &C) -> Result<Url, ConfigError> {
        let value = |index: Option<usize>| index.map(|i| config.prop_value(i)).unwrap_or_default();

        let mut url = format!("{}://", self.scheme);

        let user = value(self.user);
        let password = value(self.password);
        if !user.is_empty() || !password.is_empty() {
            url.extend(utf8_percent_encode(&user, USERINFO));
            if !password.is_empty() {
                url.push(UrlPart::User.suffix());
                url.extend(utf8_percent_encode(&password, USERINFO));
            }
            url.push(UrlPart::Password.suffix());
        }

        if let Some(host) = self.combined_host() {
            url.push_str(&config.prop_value(host));
        } else {
            url.push_str(&value(self.host));
            let port = value(self.port);
            if !port.is_empty() && port != "0" {
                url.push(UrlPart::Host.suffix());
                url.push_str(&port);
            }
        }

        let mut fixed: Vec<String> = self
            .path_slots
            .iter()
            .map(|i| config.prop_value(*i))
            .collect();
        let rest = value(self.path_rest);
        let rest: Vec<&str> = if rest.is_empty() {
            Vec::new()
        } else {
            rest.split(UrlPart::Path.suffix()).collect()
        };
        // Unfilled slots at the end of the path are not written. Empty items
        // inside the rest stay as empty segments.
        let segments: Vec<&str> = if self.reverse_path_prio {
            while fixed.last().is_some_and(String::is_empty) {
                fixed.pop();
            }
            rest.into_iter().chain(fixed.iter().map(String::as_str)).collect()
        } else {
            if rest.is_empty() {
                while fixed.last().is_some_and(String::is_empty) {
                    fixed.pop();
                }
            }
            fixed.iter().map(String::as_str).chain(rest).collect()
        };
        for segment in segments {
            url.push(UrlPart::Port.suffix());
            url.extend(utf8_percent_encode(segment, PATH_SEGMENT));
        }

        let query = encode_query(&query_values(config));
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }

        trace!(scheme = self.scheme, "assembled config URL");
        Ok(Url::parse(&url)?)
    }

    /// Splits `url` into a batch of raw values.
    ///
    /// Query keys are resolved through `info`. Keys nobody claims are an
    /// error unless custom query variables are enabled, in which case they
    /// are collected into the carrier property.
    pub fn updates_from_url(
        &self,
        info: &ConfigPropInfo,
        url: &Url,
    ) -> Result<Updates, ConfigError> {
        if url.scheme() != self.scheme {
            return Err(ConfigError::SchemeMismatch {
                expected: self.scheme.to_string(),
                found: url.scheme().to_string(),
            });
        }

        let mut updates = Updates::new();

        if let Some(user) = self.user {
            updates.insert(user, decode(url.username()));
        }
        if let Some(password) = self.password
            && let Some(value) = url.password()
        {
            updates.insert(password, decode(value));
        }

        let host = url.host_str().unwrap_or_default();
        if let Some(index) = self.combined_host() {
            let authority = match url.port() {
                Some(port) => format!("{host}:{port}"),
                None => host.to_string(),
            };
            updates.insert(index, authority);
        } else {
            if let Some(index) = self.host {
                updates.insert(index, host.to_string());
            }
            if let Some(index) = self.port
                && let Some(port) = url.port()
            {
                updates.insert(index, port.to_string());
            }
        }

        self.path_updates(url.path(), &mut updates)?;

        let mut custom_vars = QueryVars::new();
        let mut seen = Vec::new();
        for (key, value) in url.query_pairs() {
            if let Some(index) = info.prop_index_for(&key) {
                if !seen.contains(&index) {
                    seen.push(index);
                    updates.insert(index, value.into_owned());
                }
            } else if self.custom_query_vars {
                custom_vars
                    .entry(unescape_custom_query_key(&key).to_string())
                    .or_insert_with(|| value.into_owned());
            } else if !key.eq_ignore_ascii_case(TITLE_KEY) {
                return Err(ConfigError::UnknownKey(key.into_owned()));
            }
        }
        if let Some(carrier) = self.query_vars {
            if !custom_vars.is_empty() {
                debug!(count = custom_vars.len(), "captured custom query variables");
            }
            updates.insert(carrier, format_query_map(&custom_vars));
        }

        trace!(count = updates.len(), "split config URL into updates");
        Ok(updates)
    }

    fn path_updates(&self, path: &str, updates: &mut Updates) -> Result<(), ConfigError> {
        let segments: Vec<String> = split_path(path).iter().map(|s| decode(s)).collect();
        let slots = self.path_slots.len();

        let Some(rest) = self.path_rest else {
            if slots == 0 && !segments.is_empty() {
                return Err(ConfigError::UnexpectedPath(path.to_string()));
            }
            if segments.len() > slots {
                return Err(ConfigError::TooManyPathItems {
                    found: segments.len(),
                    expected: slots,
                });
            }
            updates.extend(self.path_slots.iter().copied().zip(segments));
            return Ok(());
        };

        let split = segments.len().saturating_sub(slots);
        let (fixed, remainder) = if split == 0 {
            (&segments[..], &segments[..0])
        } else if self.reverse_path_prio {
            (&segments[split..], &segments[..split])
        } else {
            (&segments[..slots], &segments[slots..])
        };
        updates.extend(self.path_slots.iter().copied().zip(fixed.iter().cloned()));
        updates.insert(rest, join_path(remainder));
        Ok(())
    }
}

fn decode(value: &str) -> String {
    percent_decode_str(value).decode_utf8_lossy().into_owned()
}
