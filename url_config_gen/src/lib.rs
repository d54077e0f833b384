//! Generates Rust configuration types from service spec documents.
//!
//! The output is a struct with one typed field per declared property, an
//! enum per option property, and an implementation of
//! [`url_config::GeneratedConfig`]. It can be produced as tokens for a
//! procedural macro, or as formatted source for checking into a tree.
//!
//! Generation is deterministic: the same spec and options always produce the
//! same output, byte for byte.

use proc_macro2::{Ident, Span, TokenStream};
use tracing::info;
use url_config::spec::ServiceSpec;

pub use error::GenError;

mod codec;
mod emit;
mod error;
mod ident;
mod plan;

/// Placed at the top of every generated source file.
pub const GENERATED_HEADER: &str = "// Code generated by url-config-gen; DO NOT EDIT.\n\n";

#[derive(Clone)]
pub struct GenOptions {
    pub type_name: Ident,
    pub vis: syn::Visibility,
}

impl GenOptions {
    /// Options for a `pub` type called `type_name`.
    pub fn new(type_name: &str) -> Result<Self, GenError> {
        let type_name = syn::parse_str::<Ident>(type_name).map_err(|e| GenError::InvalidIdent {
            name: type_name.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            type_name,
            vis: syn::Visibility::Public(syn::token::Pub(Span::call_site())),
        })
    }

    pub fn with_visibility(mut self, vis: syn::Visibility) -> Self {
        self.vis = vis;
        self
    }
}

/// Generates the tokens for `spec`.
pub fn generate(spec: &ServiceSpec, opts: &GenOptions) -> Result<TokenStream, GenError> {
    let plan = plan::ConfigPlan::new(spec)?;
    let tokens = emit::config(&plan, opts)?;
    info!(
        scheme = %spec.scheme,
        type_name = %opts.type_name,
        props = plan.props.len(),
        "generated config type"
    );
    Ok(tokens)
}

/// Generates formatted source for `spec`, starting with [`GENERATED_HEADER`].
pub fn generate_source(spec: &ServiceSpec, opts: &GenOptions) -> Result<String, GenError> {
    let tokens = generate(spec, opts)?;
    let file = syn::parse2::<syn::File>(tokens)?;
    Ok(format!("{GENERATED_HEADER}{}", prettyplease::unparse(&file)))
}

/// Parses and verifies a spec document, then generates its tokens.
pub fn generate_from_yaml(source: &str, opts: &GenOptions) -> Result<TokenStream, GenError> {
    let spec = ServiceSpec::from_yaml(source)?;
    generate(&spec, opts)
}
