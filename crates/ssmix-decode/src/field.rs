//! Decomposition of field values into components and subcomponents.

use ssmix_model::{
    DecodedValue, DeidentificationPolicy, DiagnosticKind, NameStyle, SchemaTables, ValueMap,
};

use crate::context::{FieldLocation, MessageContext};
use crate::primitive::{convert, is_primitive};

/// Decodes field values of a given data type against the component tables.
#[derive(Debug, Clone, Copy)]
pub struct FieldDecoder<'a> {
    schema: &'a SchemaTables,
    policy: Option<&'a DeidentificationPolicy>,
    names: NameStyle,
}

impl<'a> FieldDecoder<'a> {
    /// `policy` is `None` when de-identification is disabled.
    pub fn new(
        schema: &'a SchemaTables,
        policy: Option<&'a DeidentificationPolicy>,
        names: NameStyle,
    ) -> Self {
        Self {
            schema,
            policy,
            names,
        }
    }

    /// Decode a field value, splitting repetitions when the field repeats.
    ///
    /// Empty repetitions are dropped, so a repeatable field holding only
    /// repetition separators decodes to an empty list.
    pub fn decode(
        &self,
        value: &str,
        data_type: &str,
        repeatable: bool,
        ctx: &mut MessageContext,
        location: FieldLocation<'_>,
    ) -> DecodedValue {
        if !repeatable {
            return self.decode_single(value, data_type, ctx, location);
        }
        let repetition = ctx.delimiters().repetition;
        let repetitions = value
            .split(repetition)
            .filter(|item| !item.is_empty())
            .map(|item| self.decode_single(item, data_type, ctx, location))
            .collect();
        DecodedValue::Repeated(repetitions)
    }

    /// Decode one occurrence of a value.
    pub fn decode_single(
        &self,
        value: &str,
        data_type: &str,
        ctx: &mut MessageContext,
        location: FieldLocation<'_>,
    ) -> DecodedValue {
        if is_primitive(data_type) {
            return convert(data_type, value, ctx, location);
        }

        let separator = ctx.delimiters().component;
        let mut components = ValueMap::new();
        for (index, component) in value.split(separator).enumerate() {
            if component.is_empty() {
                continue;
            }
            let def = self.schema.component(data_type, index);
            if self
                .policy
                .is_some_and(|policy| policy.redacts_component(data_type, index))
            {
                let resolved = def.and_then(|def| def.names.resolve(self.names));
                components.insert(
                    element_name(resolved, data_type, index),
                    DecodedValue::Redacted,
                );
                continue;
            }
            let Some(def) = def else {
                components.insert(
                    unknown_element(data_type, index, ctx, location),
                    DecodedValue::text(component),
                );
                continue;
            };
            let name = element_name(def.names.resolve(self.names), data_type, index);
            let decoded = if is_primitive(&def.data_type) {
                convert(&def.data_type, component, ctx, location)
            } else {
                DecodedValue::Composite(self.decode_subcomponents(
                    component,
                    &def.data_type,
                    ctx,
                    location,
                ))
            };
            components.insert(name, decoded);
        }
        DecodedValue::Composite(components)
    }

    /// Subcomponents are the deepest level: a complex subcomponent type is
    /// not decomposed further and keeps its raw text.
    fn decode_subcomponents(
        &self,
        component: &str,
        data_type: &str,
        ctx: &mut MessageContext,
        location: FieldLocation<'_>,
    ) -> ValueMap {
        let separator = ctx.delimiters().subcomponent;
        let mut subcomponents = ValueMap::new();
        for (index, subcomponent) in component.split(separator).enumerate() {
            if subcomponent.is_empty() {
                continue;
            }
            let Some(def) = self.schema.component(data_type, index) else {
                subcomponents.insert(
                    unknown_element(data_type, index, ctx, location),
                    DecodedValue::text(subcomponent),
                );
                continue;
            };
            let name = element_name(def.names.resolve(self.names), data_type, index);
            let decoded = if is_primitive(&def.data_type) {
                convert(&def.data_type, subcomponent, ctx, location)
            } else {
                ctx.report(location.diagnostic(
                    DiagnosticKind::NestedSubcomponent,
                    format!(
                        "{name} declares complex type {} below subcomponent level",
                        def.data_type
                    ),
                ));
                DecodedValue::text(subcomponent)
            };
            subcomponents.insert(name, decoded);
        }
        subcomponents
    }
}

fn element_name(resolved: Option<&str>, data_type: &str, index: usize) -> String {
    resolved.map_or_else(|| fallback_name(data_type, index), str::to_string)
}

/// Name used for an element the component tables do not describe, e.g. `CX.7`.
fn fallback_name(data_type: &str, index: usize) -> String {
    format!("{data_type}.{}", index + 1)
}

fn unknown_element(
    data_type: &str,
    index: usize,
    ctx: &mut MessageContext,
    location: FieldLocation<'_>,
) -> String {
    let name = fallback_name(data_type, index);
    ctx.report(location.diagnostic(
        DiagnosticKind::UnknownComponent,
        format!("no component definition for {name}"),
    ));
    name
}
