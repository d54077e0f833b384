use url_config::SchemaError;

#[derive(thiserror::Error, Debug)]
pub enum GenError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("'{name}' cannot be used as a Rust identifier: {message}")]
    InvalidIdent { name: String, message: String },
    #[error("'{first}' and '{second}' map to the same identifier `{ident}`")]
    IdentClash {
        ident: String,
        first: String,
        second: String,
    },
    #[error("invalid customType for '{name}': {source}")]
    InvalidCustomType {
        name: String,
        #[source]
        source: syn::Error,
    },
    #[error("generated code does not parse: {0}")]
    Syntax(#[from] syn::Error),
}
