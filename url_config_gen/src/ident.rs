//! Mapping spec names onto Rust identifiers.

use crate::error::GenError;
use proc_macro2::{Ident, Span};

/// Splits a name into words at separators and case boundaries, so that
/// `APIKey`, `api_key` and `api-key` all read as `["API", "Key"]`-like
/// sequences.
fn words(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();
    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower)
            {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

pub(crate) fn snake_case(name: &str) -> String {
    words(name)
        .iter()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

pub(crate) fn pascal_case(name: &str) -> String {
    words(name)
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect()
}

/// Builds an identifier, appending `_` to keywords.
fn ident(candidate: String, name: &str) -> Result<Ident, GenError> {
    if candidate.is_empty() || candidate.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(GenError::InvalidIdent {
            name: name.to_string(),
            message: format!("{candidate:?} does not start with a letter"),
        });
    }
    if syn::parse_str::<Ident>(&candidate).is_ok() {
        return Ok(Ident::new(&candidate, Span::call_site()));
    }
    let escaped = format!("{candidate}_");
    syn::parse_str::<Ident>(&escaped).map_err(|e| GenError::InvalidIdent {
        name: name.to_string(),
        message: e.to_string(),
    })
}

pub(crate) fn field_ident(prop_name: &str) -> Result<Ident, GenError> {
    ident(snake_case(prop_name), prop_name)
}

pub(crate) fn const_ident(prop_name: &str) -> Result<Ident, GenError> {
    ident(format!("PROP_{}", snake_case(prop_name).to_uppercase()), prop_name)
}

pub(crate) fn option_type_ident(prop_name: &str) -> Result<Ident, GenError> {
    ident(format!("{}Option", pascal_case(prop_name)), prop_name)
}

pub(crate) fn variant_ident(value: &str) -> Result<Ident, GenError> {
    ident(pascal_case(value), value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("APIKey"), "api_key");
        assert_eq!(snake_case("BotMail"), "bot_mail");
        assert_eq!(snake_case("host"), "host");
        assert_eq!(snake_case("VisibleTo"), "visible_to");
        assert_eq!(snake_case("path-prefix"), "path_prefix");
        assert_eq!(snake_case("Token2FA"), "token2_fa");
    }

    #[test]
    fn test_pascal_case() {
        assert_eq!(pascal_case("markdown"), "Markdown");
        assert_eq!(pascal_case("HTML"), "Html");
        assert_eq!(pascal_case("max-priority"), "MaxPriority");
        assert_eq!(pascal_case("ParseMode"), "ParseMode");
    }

    #[test]
    fn test_keywords_are_escaped() {
        assert_eq!(field_ident("Type").unwrap().to_string(), "type_");
        assert_eq!(field_ident("Match").unwrap().to_string(), "match_");
        assert_eq!(variant_ident("self").unwrap().to_string(), "Self_");
        assert!(variant_ident("1st").is_err());
        assert!(field_ident("--").is_err());
    }

    #[test]
    fn test_derived_names() {
        assert_eq!(option_type_ident("Priority").unwrap().to_string(), "PriorityOption");
        assert_eq!(const_ident("APIKey").unwrap().to_string(), "PROP_API_KEY");
    }
}
