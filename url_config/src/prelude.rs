//! The `url_config` prelude.

pub use crate::errors::{ConfigError, SchemaError};
pub use crate::spec::{PropertySpec, ServiceSpec};
pub use crate::support::{
    from_url, init, set_defaults, set_partial_defaults, update_from_params, update_from_query,
};
pub use crate::types::{ConfigValue, EnumFormatter, EnumRegistry, PropType, QueryVars};
pub use crate::url_part::UrlPart;
pub use crate::validators::{
    LengthValidator, NotEqualValidator, RangeValidator, RegexValidator, RequiredValidator,
    Validator,
};
pub use crate::{ConfigPropInfo, GeneratedConfig, Updates, UrlLayout, impl_config_value_for_fromstr};
pub use url::Url;
