//! Resolves a verified spec into the dense, index-based shape the emitted
//! code is built from.

use crate::error::GenError;
use crate::ident;
use proc_macro2::Ident;
use std::collections::HashMap;
use tracing::debug;
use url_config::spec::{PropertySpec, ServiceSpec, ValidatorSpec};
use url_config::url_part::UrlPart;

pub(crate) struct ConfigPlan<'a> {
    pub spec: &'a ServiceSpec,
    pub props: Vec<PropPlan<'a>>,
    /// Every query key with its owning property, sorted by key.
    pub keys: Vec<(String, usize)>,
    pub layout: LayoutPlan,
}

pub(crate) struct PropPlan<'a> {
    pub index: usize,
    pub spec: &'a PropertySpec,
    pub field: Ident,
    pub index_const: Ident,
    pub default: String,
    /// Position of the primary key in [`ConfigPlan::keys`].
    pub primary_key: Option<usize>,
    pub validators: Vec<ValidatorSpec>,
    pub option: Option<OptionPlan>,
}

pub(crate) struct OptionPlan {
    pub ident: Ident,
    pub variants: Vec<Ident>,
    pub names: Vec<String>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct LayoutPlan {
    pub user: Option<usize>,
    pub password: Option<usize>,
    pub host: Option<usize>,
    pub port: Option<usize>,
    pub path_slots: Vec<usize>,
    pub path_rest: Option<usize>,
    pub query_vars: Option<usize>,
}

impl<'a> ConfigPlan<'a> {
    pub fn new(spec: &'a ServiceSpec) -> Result<Self, GenError> {
        let mut keys: Vec<(String, usize)> = spec
            .props
            .values()
            .enumerate()
            .flat_map(|(index, prop)| prop.keys.iter().map(move |key| (key.clone(), index)))
            .collect();
        keys.sort();

        let mut fields: HashMap<String, &str> = HashMap::new();
        let mut props = Vec::with_capacity(spec.props.len());
        for (index, prop) in spec.props.values().enumerate() {
            let field = ident::field_ident(&prop.name)?;
            if let Some(first) = fields.insert(field.to_string(), &prop.name) {
                return Err(GenError::IdentClash {
                    ident: field.to_string(),
                    first: first.to_string(),
                    second: prop.name.clone(),
                });
            }

            let primary_key = prop
                .keys
                .first()
                .and_then(|primary| keys.iter().position(|(key, _)| key == primary));

            let plan = PropPlan {
                index,
                spec: prop,
                field,
                index_const: ident::const_ident(&prop.name)?,
                default: prop.canonical_default()?,
                primary_key,
                validators: prop.validators()?,
                option: OptionPlan::new(prop)?,
            };
            let validators: Vec<_> = plan.validators.iter().map(ValidatorSpec::kind).collect();
            debug!(
                index,
                name = %prop.name,
                prop_type = %prop.prop_type,
                ?validators,
                "planned property"
            );
            props.push(plan);
        }

        let layout = LayoutPlan::new(spec);
        debug!(?layout, "planned URL layout");

        Ok(Self {
            spec,
            props,
            keys,
            layout,
        })
    }
}

impl OptionPlan {
    fn new(prop: &PropertySpec) -> Result<Option<Self>, GenError> {
        if prop.values.is_empty() {
            return Ok(None);
        }
        let mut variants: Vec<Ident> = Vec::with_capacity(prop.values.len());
        for (i, value) in prop.values.iter().enumerate() {
            let variant = ident::variant_ident(value)?;
            if let Some(clash) = variants.iter().position(|v| *v == variant) {
                return Err(GenError::IdentClash {
                    ident: variant.to_string(),
                    first: prop.values[clash].clone(),
                    second: prop.values[i].clone(),
                });
            }
            variants.push(variant);
        }
        Ok(Some(Self {
            ident: ident::option_type_ident(&prop.name)?,
            variants,
            names: prop.values.clone(),
        }))
    }
}

impl LayoutPlan {
    fn new(spec: &ServiceSpec) -> Self {
        let mut layout = LayoutPlan::default();
        let mut slots: Vec<(usize, usize)> = Vec::new();
        for (index, prop) in spec.props.values().enumerate() {
            for part in &prop.url_parts {
                match part {
                    UrlPart::User => layout.user = Some(index),
                    UrlPart::Password => layout.password = Some(index),
                    UrlPart::Host => layout.host = Some(index),
                    UrlPart::Port => layout.port = Some(index),
                    UrlPart::Path => layout.path_rest = Some(index),
                    UrlPart::Query => layout.query_vars = Some(index),
                    UrlPart::Scheme => {}
                    slot => {
                        if let Some(slot) = slot.path_slot() {
                            slots.push((slot, index));
                        }
                    }
                }
            }
        }
        slots.sort();
        layout.path_slots = slots.into_iter().map(|(_, index)| index).collect();
        layout
    }
}
