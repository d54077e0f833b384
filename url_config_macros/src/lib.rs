extern crate proc_macro;

use proc_macro::TokenStream;
use quote::quote;
use std::path::PathBuf;
use syn::parse::{Parse, ParseStream};
use syn::{Ident, LitStr, Token, Visibility, parse_macro_input};
use url_config_gen::{GenOptions, generate_from_yaml};

/// Generates a configuration type from a service spec.
///
/// ```ignore
/// url_config_macros::service_config!(pub ZulipConfig, file = "specs/zulip.yml");
/// url_config_macros::service_config!(pub(crate) TestConfig, yaml = "scheme: test\n");
/// ```
///
/// `file` paths are resolved against the manifest directory of the calling
/// crate, and the crate is rebuilt when the file changes. Spec errors are
/// reported at the spec argument.
#[proc_macro]
pub fn service_config(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as ServiceConfigInput);
    expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

struct ServiceConfigInput {
    vis: Visibility,
    name: Ident,
    source: SpecSource,
}

enum SpecSource {
    File(LitStr),
    Yaml(LitStr),
}

impl Parse for ServiceConfigInput {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let vis: Visibility = input.parse()?;
        let name: Ident = input.parse()?;
        input.parse::<Token![,]>()?;
        let kind: Ident = input.parse()?;
        input.parse::<Token![=]>()?;
        let value: LitStr = input.parse()?;
        if input.peek(Token![,]) {
            input.parse::<Token![,]>()?;
        }
        let source = match kind.to_string().as_str() {
            "file" => SpecSource::File(value),
            "yaml" => SpecSource::Yaml(value),
            other => {
                return Err(syn::Error::new_spanned(
                    &kind,
                    format!("Unknown spec source `{other}`, expected `file` or `yaml`"),
                ));
            }
        };
        Ok(Self { vis, name, source })
    }
}

fn expand(input: ServiceConfigInput) -> syn::Result<proc_macro2::TokenStream> {
    let opts = GenOptions::new(&input.name.to_string())
        .map_err(|e| syn::Error::new_spanned(&input.name, e.to_string()))?
        .with_visibility(input.vis);

    let (yaml, lit, tracked) = match &input.source {
        SpecSource::Yaml(lit) => (lit.value(), lit, None),
        SpecSource::File(lit) => {
            let path = spec_path(&lit.value());
            let yaml = std::fs::read_to_string(&path).map_err(|e| {
                syn::Error::new_spanned(lit, format!("Failed to read {}: {e}", path.display()))
            })?;
            (yaml, lit, Some(path))
        }
    };

    let generated =
        generate_from_yaml(&yaml, &opts).map_err(|e| syn::Error::new_spanned(lit, e.to_string()))?;

    let tracked = tracked.map(|path| {
        let path = path.to_string_lossy().into_owned();
        quote!(const _: &str = include_str!(#path);)
    });

    Ok(quote! {
        #tracked
        #generated
    })
}

fn spec_path(path: &str) -> PathBuf {
    let path = PathBuf::from(path);
    if path.is_absolute() {
        return path;
    }
    match std::env::var_os("CARGO_MANIFEST_DIR") {
        Some(dir) => PathBuf::from(dir).join(path),
        None => path,
    }
}
