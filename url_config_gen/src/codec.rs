//! Per-kind code fragments: the field type, and the expressions that parse,
//! format, measure and test a property for emptiness.
//!
//! The kind of a property is resolved here, once, so the emitted code calls
//! straight into the matching `url_config::types` function.

use crate::error::GenError;
use crate::plan::PropPlan;
use proc_macro2::TokenStream;
use quote::quote;
use url_config::types::PropType;

pub(crate) struct Codec {
    pub field_type: TokenStream,
    kind: Kind,
}

enum Kind {
    Number { base: u32 },
    Text,
    Toggle,
    Color,
    Duration,
    List { separator: String },
    PathList,
    CustomList { item: syn::Type, separator: String, rest: bool },
    Map { item_separator: String, value_separator: String },
    QueryMap,
    Option { ident: syn::Ident },
    Custom { ty: syn::Type },
}

fn custom_type(prop: &PropPlan<'_>) -> Result<Option<syn::Type>, GenError> {
    prop.spec
        .custom_type
        .as_deref()
        .map(|ty| {
            syn::parse_str::<syn::Type>(ty).map_err(|source| GenError::InvalidCustomType {
                name: prop.spec.name.clone(),
                source,
            })
        })
        .transpose()
}

impl Codec {
    pub fn new(prop: &PropPlan<'_>) -> Result<Self, GenError> {
        let spec = prop.spec;
        let kind = match spec.prop_type {
            PropType::Number => Kind::Number { base: spec.base() },
            PropType::Text => Kind::Text,
            PropType::Toggle => Kind::Toggle,
            PropType::Color => Kind::Color,
            PropType::Duration => Kind::Duration,
            PropType::List => match custom_type(prop)? {
                Some(item) if spec.is_rest_path() => Kind::CustomList {
                    item,
                    separator: "/".to_string(),
                    rest: true,
                },
                Some(item) => Kind::CustomList {
                    item,
                    separator: spec.item_separator().to_string(),
                    rest: false,
                },
                None if spec.is_rest_path() => Kind::PathList,
                None => Kind::List {
                    separator: spec.item_separator().to_string(),
                },
            },
            PropType::Map if spec.is_query_carrier() => Kind::QueryMap,
            PropType::Map => Kind::Map {
                item_separator: spec.item_separator().to_string(),
                value_separator: spec.value_separator().to_string(),
            },
            PropType::Option => match &prop.option {
                Some(option) => Kind::Option {
                    ident: option.ident.clone(),
                },
                None => unreachable!("option properties are verified to declare values"),
            },
            PropType::Custom => match custom_type(prop)? {
                Some(ty) => Kind::Custom { ty },
                None => unreachable!("custom properties are verified to declare a customType"),
            },
        };

        let field_type = match &kind {
            Kind::Number { .. } => quote!(i64),
            Kind::Text => quote!(::std::string::String),
            Kind::Toggle => quote!(bool),
            Kind::Color => quote!(u32),
            Kind::Duration => quote!(::std::time::Duration),
            Kind::List { .. } | Kind::PathList => quote!(::std::vec::Vec<::std::string::String>),
            Kind::CustomList { item, .. } => quote!(::std::vec::Vec<#item>),
            Kind::Map { .. } => {
                quote!(::std::collections::BTreeMap<::std::string::String, ::std::string::String>)
            }
            Kind::QueryMap => quote!(::url_config::QueryVars),
            Kind::Option { ident } => quote!(#ident),
            Kind::Custom { ty } => quote!(#ty),
        };

        Ok(Self { field_type, kind })
    }

    /// An expression of type `Result<FieldType, ConfigError>` reading `value`.
    pub fn parse(&self, name: &str, value: &TokenStream) -> TokenStream {
        match &self.kind {
            Kind::Number { base } => {
                quote!(::url_config::types::parse_number(#name, #value, #base))
            }
            Kind::Text => quote!(::url_config::types::parse_text(#name, #value)),
            Kind::Toggle => quote!(::url_config::types::parse_toggle(#name, #value)),
            Kind::Color => quote!(::url_config::types::parse_color(#name, #value)),
            Kind::Duration => quote!(::url_config::types::parse_duration(#name, #value)),
            Kind::List { separator } => {
                quote!(::url_config::types::parse_list(#name, #value, #separator))
            }
            Kind::PathList => quote!(::url_config::types::parse_path_list(#name, #value)),
            Kind::CustomList {
                item,
                separator,
                rest: true,
            } => quote! {
                ::url_config::types::parse_custom_list::<#item>(
                    #name,
                    #value.strip_prefix('/').unwrap_or(#value),
                    #separator,
                )
            },
            Kind::CustomList {
                item, separator, ..
            } => quote!(::url_config::types::parse_custom_list::<#item>(#name, #value, #separator)),
            Kind::Map {
                item_separator,
                value_separator,
            } => quote! {
                ::url_config::types::parse_map(#name, #value, #item_separator, #value_separator)
            },
            Kind::QueryMap => quote!(::url_config::types::parse_query_map(#name, #value)),
            Kind::Option { ident } => quote! {
                ::url_config::types::parse_option(#name, #value, &#ident::FORMATTER)
                    .map(|ordinal| #ident::from_ordinal(ordinal).unwrap_or_default())
            },
            Kind::Custom { ty } => quote!(<#ty as ::url_config::ConfigValue>::parse(#name, #value)),
        }
    }

    /// An expression of type `String` formatting `field`.
    pub fn format(&self, field: &TokenStream) -> TokenStream {
        match &self.kind {
            Kind::Number { base } => quote!(::url_config::types::format_number(#field, #base)),
            Kind::Text => quote!(::url_config::types::format_text(&#field)),
            Kind::Toggle => quote!(::url_config::types::format_toggle(#field).to_string()),
            Kind::Color => quote!(::url_config::types::format_color(#field)),
            Kind::Duration => quote!(::url_config::types::format_duration(#field)),
            Kind::List { separator } => {
                quote!(::url_config::types::format_list(&#field, #separator))
            }
            Kind::PathList => quote!(::url_config::types::format_list(&#field, "/")),
            Kind::CustomList { separator, .. } => {
                quote!(::url_config::types::format_custom_list(&#field, #separator))
            }
            Kind::Map {
                item_separator,
                value_separator,
            } => quote! {
                ::url_config::types::format_map(&#field, #item_separator, #value_separator)
            },
            Kind::QueryMap => quote!(::url_config::types::format_query_map(&#field)),
            Kind::Option { ident } => {
                quote!(::url_config::types::format_option(#field.ordinal(), &#ident::FORMATTER))
            }
            Kind::Custom { .. } => quote!(::url_config::ConfigValue::to_config_string(&#field)),
        }
    }

    /// A `bool` expression, for the kinds that can be empty.
    pub fn is_empty(&self, field: &TokenStream) -> Option<TokenStream> {
        match &self.kind {
            Kind::Number { .. } => Some(quote!(#field == 0)),
            Kind::Text | Kind::List { .. } | Kind::PathList | Kind::CustomList { .. } => {
                Some(quote!(#field.is_empty()))
            }
            Kind::Option { .. } => Some(quote!(#field.ordinal() == 0)),
            Kind::Custom { .. } => Some(quote!(::url_config::ConfigValue::is_empty_value(&#field))),
            _ => None,
        }
    }

    /// A `usize` expression, for the kinds a length check applies to.
    pub fn length(&self, field: &TokenStream) -> Option<TokenStream> {
        match &self.kind {
            Kind::Text => Some(quote!(#field.chars().count())),
            Kind::List { .. }
            | Kind::PathList
            | Kind::CustomList { .. }
            | Kind::Map { .. }
            | Kind::QueryMap => Some(quote!(#field.len())),
            _ => None,
        }
    }
}
