//! Turns a [`ConfigPlan`] into the tokens of the generated module.

use crate::GenOptions;
use crate::codec::Codec;
use crate::error::GenError;
use crate::plan::{ConfigPlan, OptionPlan, PropPlan};
use proc_macro2::{Ident, TokenStream};
use quote::quote;
use url_config::spec::ValidatorSpec;

fn opt_index(index: Option<usize>) -> TokenStream {
    match index {
        Some(index) => quote!(::std::option::Option::Some(#index)),
        None => quote!(::std::option::Option::None),
    }
}

fn opt_i64(bound: Option<i64>) -> TokenStream {
    match bound {
        Some(bound) => quote!(::std::option::Option::Some(#bound)),
        None => quote!(::std::option::Option::None),
    }
}

fn opt_usize(bound: Option<usize>) -> TokenStream {
    opt_index(bound)
}

pub(crate) fn config(plan: &ConfigPlan<'_>, opts: &GenOptions) -> Result<TokenStream, GenError> {
    let codecs = plan
        .props
        .iter()
        .map(Codec::new)
        .collect::<Result<Vec<_>, _>>()?;

    let name = &opts.type_name;
    let vis = &opts.vis;

    let fields = plan.props.iter().zip(&codecs).map(|(prop, codec)| {
        let field = &prop.field;
        let ty = &codec.field_type;
        let doc = prop.spec.description.trim();
        let doc = format!(" {doc}");
        if doc.trim().is_empty() {
            quote!(pub #field: #ty)
        } else {
            quote! {
                #[doc = #doc]
                pub #field: #ty
            }
        }
    });

    let options = plan
        .props
        .iter()
        .filter_map(|prop| prop.option.as_ref().map(|option| option_enum(prop, option, opts)));

    let inherent = inherent_impl(plan, opts);
    let debug = debug_impl(plan, opts);
    let generated = generated_impl(plan, &codecs, opts);

    Ok(quote! {
        #[derive(Clone, Default, PartialEq)]
        #vis struct #name {
            #(#fields,)*
        }

        #inherent
        #debug
        #generated
        #(#options)*
    })
}

fn inherent_impl(plan: &ConfigPlan<'_>, opts: &GenOptions) -> TokenStream {
    let name = &opts.type_name;
    let scheme = &plan.spec.scheme;
    let consts = plan.props.iter().map(|prop| {
        let ident = &prop.index_const;
        let index = prop.index;
        let doc = format!(" Index of `{}`.", prop.spec.name);
        quote! {
            #[doc = #doc]
            pub const #ident: usize = #index;
        }
    });

    let layout = &plan.layout;
    let user = opt_index(layout.user);
    let password = opt_index(layout.password);
    let host = opt_index(layout.host);
    let port = opt_index(layout.port);
    let path_slots = &layout.path_slots;
    let path_rest = opt_index(layout.path_rest);
    let query_vars = opt_index(layout.query_vars);
    let reverse_path_prio = plan.spec.options.reverse_path_prio;
    let custom_query_vars = plan.spec.options.custom_query_vars;

    quote! {
        impl #name {
            pub const SCHEME: &'static str = #scheme;
            #(#consts)*

            pub fn url_layout() -> &'static ::url_config::UrlLayout {
                static LAYOUT: ::url_config::UrlLayout = ::url_config::UrlLayout {
                    scheme: #scheme,
                    user: #user,
                    password: #password,
                    host: #host,
                    port: #port,
                    path_slots: &[#(#path_slots),*],
                    path_rest: #path_rest,
                    query_vars: #query_vars,
                    reverse_path_prio: #reverse_path_prio,
                    custom_query_vars: #custom_query_vars,
                };
                &LAYOUT
            }
        }
    }
}

/// Prints formatted values, with credentials hidden.
fn debug_impl(plan: &ConfigPlan<'_>, opts: &GenOptions) -> TokenStream {
    let name = &opts.type_name;
    let type_name = name.to_string();
    let fields = plan.props.iter().map(|prop| {
        let field = prop.field.to_string();
        let index = &prop.index_const;
        if prop.spec.credential {
            quote!(.field(#field, &"[hidden]"))
        } else {
            quote!(.field(#field, &::url_config::GeneratedConfig::prop_value(self, Self::#index)))
        }
    });
    quote! {
        impl ::std::fmt::Debug for #name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.debug_struct(#type_name)
                    #(#fields)*
                    .finish()
            }
        }
    }
}

fn generated_impl(plan: &ConfigPlan<'_>, codecs: &[Codec], opts: &GenOptions) -> TokenStream {
    let name = &opts.type_name;

    let update = update_fn(plan, codecs);

    let values = plan.props.iter().zip(codecs).map(|(prop, codec)| {
        let index = &prop.index_const;
        let field = &prop.field;
        let format = codec.format(&quote!(self.#field));
        quote!(Self::#index => #format,)
    });

    let validate = plan
        .props
        .iter()
        .zip(codecs)
        .filter(|(prop, _)| !prop.validators.is_empty())
        .map(|(prop, codec)| validate_block(plan, prop, codec));

    let enums = plan.props.iter().filter_map(|prop| {
        let option = prop.option.as_ref()?;
        let prop_name = &prop.spec.name;
        let ident = &option.ident;
        Some(quote!(.with(#prop_name, #ident::FORMATTER)))
    });

    let prop_info = prop_info(plan);

    let custom_query_vars = match (plan.spec.options.custom_query_vars, plan.layout.query_vars) {
        (true, Some(carrier)) => {
            let field = &plan.props[carrier].field;
            quote! {
                fn custom_query_vars(&self) -> ::std::option::Option<&::url_config::QueryVars> {
                    ::std::option::Option::Some(&self.#field)
                }
            }
        }
        _ => TokenStream::new(),
    };

    quote! {
        impl ::url_config::GeneratedConfig for #name {
            fn scheme(&self) -> &'static str {
                Self::SCHEME
            }

            #update

            fn prop_value(&self, index: usize) -> ::std::string::String {
                match index {
                    #(#values)*
                    _ => ::std::string::String::new(),
                }
            }

            fn get_url(
                &self,
            ) -> ::std::result::Result<::url_config::Url, ::url_config::ConfigError> {
                Self::url_layout().build_url(self)
            }

            fn set_url(
                &mut self,
                url: &::url_config::Url,
            ) -> ::std::result::Result<(), ::url_config::ConfigError> {
                ::url_config::support::apply_url(self, Self::url_layout(), url)
            }

            fn validate(&self) -> ::std::result::Result<(), ::url_config::ConfigError> {
                #(#validate)*
                ::std::result::Result::Ok(())
            }

            fn enums(&self) -> ::url_config::EnumRegistry {
                ::url_config::EnumRegistry::new()
                    #(#enums)*
            }

            #prop_info

            #custom_query_vars
        }
    }
}

fn update_fn(plan: &ConfigPlan<'_>, codecs: &[Codec]) -> TokenStream {
    let signature = quote! {
        fn update(
            &mut self,
            updates: &::url_config::Updates,
        ) -> ::std::result::Result<(), ::url_config::ConfigError>
    };

    if plan.props.is_empty() {
        return quote! {
            #signature {
                match updates.keys().next() {
                    ::std::option::Option::Some(&index) => ::std::result::Result::Err(
                        ::url_config::ConfigError::UnknownProperty(index),
                    ),
                    ::std::option::Option::None => ::std::result::Result::Ok(()),
                }
            }
        };
    }

    let arms = plan.props.iter().zip(codecs).map(|(prop, codec)| {
        let index = &prop.index_const;
        let field = &prop.field;
        let parse = codec.parse(&prop.spec.name, &quote!(value));
        quote! {
            Self::#index => #parse.map(|parsed| {
                self.#field = parsed;
            }),
        }
    });

    quote! {
        #signature {
            let mut first_err: ::std::option::Option<::url_config::ConfigError> =
                ::std::option::Option::None;
            for (&index, value) in updates {
                let value = value.as_str();
                let res: ::std::result::Result<(), ::url_config::ConfigError> = match index {
                    #(#arms)*
                    _ => {
                        return ::std::result::Result::Err(
                            ::url_config::ConfigError::UnknownProperty(index),
                        );
                    }
                };
                if let ::std::result::Result::Err(err) = res {
                    first_err.get_or_insert(err);
                }
            }
            first_err.map_or(::std::result::Result::Ok(()), ::std::result::Result::Err)
        }
    }
}

fn validate_block(plan: &ConfigPlan<'_>, prop: &PropPlan<'_>, codec: &Codec) -> TokenStream {
    let prop_name = &prop.spec.name;
    let index = &prop.index_const;
    let field = &prop.field;
    let this = quote!(self.#field);

    let checks = prop.validators.iter().filter_map(|validator| {
        let check = |validator: TokenStream, subject: TokenStream| {
            quote! {
                ::url_config::validators::Validator::validate(
                    &#validator,
                    #prop_name,
                    value.as_str(),
                    #subject,
                )?;
            }
        };
        match validator {
            ValidatorSpec::Regex { pattern } => {
                let call = check(quote!(PATTERN), quote!(value.as_str()));
                Some(quote! {
                    {
                        static PATTERN: ::url_config::validators::RegexValidator =
                            ::url_config::validators::RegexValidator::new(#pattern);
                        #call
                    }
                })
            }
            ValidatorSpec::Range { minimum, maximum } => {
                let (min, max) = (opt_i64(*minimum), opt_i64(*maximum));
                Some(check(
                    quote!(::url_config::validators::RangeValidator::new(#min, #max)),
                    quote!(&#this),
                ))
            }
            ValidatorSpec::Length { minimum, maximum } => {
                let length = codec.length(&this)?;
                let (min, max) = (opt_usize(*minimum), opt_usize(*maximum));
                Some(check(
                    quote!(::url_config::validators::LengthValidator::new(#min, #max)),
                    quote!(&(#length)),
                ))
            }
            ValidatorSpec::NotEqual { other } => {
                let other_index = plan.spec.prop_index(other)?;
                Some(check(
                    quote!(::url_config::validators::NotEqualValidator::new(#other)),
                    quote!(::url_config::GeneratedConfig::prop_value(self, #other_index).as_str()),
                ))
            }
            ValidatorSpec::Required => {
                let empty = codec.is_empty(&this)?;
                Some(check(
                    quote!(::url_config::validators::RequiredValidator),
                    quote!(&(#empty)),
                ))
            }
        }
    });

    quote! {
        {
            let value = ::url_config::GeneratedConfig::prop_value(self, Self::#index);
            #(#checks)*
        }
    }
}

fn prop_info(plan: &ConfigPlan<'_>) -> TokenStream {
    let names = plan.props.iter().map(|prop| prop.spec.name.as_str());
    let defaults = plan.props.iter().map(|prop| prop.default.as_str());
    let keys = plan.keys.iter().map(|(key, _)| key.as_str());
    let key_props = plan.keys.iter().map(|(_, index)| *index);
    let primary_keys = plan.props.iter().map(|prop| opt_index(prop.primary_key));
    let credentials = plan.props.iter().map(|prop| prop.spec.credential);

    quote! {
        fn prop_info(&self) -> &'static ::url_config::ConfigPropInfo {
            static PROP_INFO: ::url_config::ConfigPropInfo = ::url_config::ConfigPropInfo {
                prop_names: &[#(#names),*],
                default_values: &[#(#defaults),*],
                keys: &[#(#keys),*],
                key_props: &[#(#key_props),*],
                primary_keys: &[#(#primary_keys),*],
                credentials: &[#(#credentials),*],
            };
            &PROP_INFO
        }
    }
}

fn option_enum(prop: &PropPlan<'_>, option: &OptionPlan, opts: &GenOptions) -> TokenStream {
    let vis = &opts.vis;
    let ident = &option.ident;
    let prop_name = &prop.spec.name;
    let names = &option.names;
    let count = option.variants.len();
    let first = &option.variants[0];
    let rest = &option.variants[1..];
    let all: Vec<&Ident> = option.variants.iter().collect();
    let doc = format!(" Values of `{prop_name}`.");

    quote! {
        #[doc = #doc]
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
        #vis enum #ident {
            #[default]
            #first,
            #(#rest,)*
        }

        impl #ident {
            pub const FORMATTER: ::url_config::EnumFormatter =
                ::url_config::EnumFormatter::new(&[#(#names),*]);

            const VARIANTS: [Self; #count] = [#(Self::#all),*];

            pub fn ordinal(self) -> usize {
                self as usize
            }

            pub fn from_ordinal(ordinal: usize) -> ::std::option::Option<Self> {
                Self::VARIANTS.get(ordinal).copied()
            }
        }

        impl ::std::fmt::Display for #ident {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(Self::FORMATTER.print(self.ordinal()))
            }
        }

        impl ::std::str::FromStr for #ident {
            type Err = ::url_config::ConfigError;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                Self::FORMATTER
                    .parse(s)
                    .and_then(Self::from_ordinal)
                    .ok_or_else(|| ::url_config::ConfigError::InvalidValue {
                        name: #prop_name.to_string(),
                        message: ::std::format!("invalid option {:?}", s),
                    })
            }
        }
    }
}
