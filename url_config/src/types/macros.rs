#[macro_export]
/// Implements [`ConfigValue`](crate::ConfigValue) for custom property types
/// that already implement `FromStr` and `Display`.
macro_rules! impl_config_value_for_fromstr {
    ($($t:ty),* $(,)?) => {
        $(
            impl $crate::ConfigValue for $t {
                fn parse(key: &str, s: &str) -> Result<Self, $crate::ConfigError> {
                    s.parse::<$t>()
                    .map_err(|e| $crate::ConfigError::InvalidValue {
                        name: key.to_string(),
                        message: format!("{}", e),
                    })
                }
                fn to_config_string(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}
