//! Turning one raw segment into an ordered map of named field values.

use ssmix_model::{
    DecodedValue, DeidentificationPolicy, DiagnosticKind, JsonizerOptions, NameStyle, NestNaming,
    Result, SchemaTables, Usage, ValueMap,
};

use crate::context::{FieldLocation, MessageContext};
use crate::delimiters::{DelimiterSet, HEADER_TAG};
use crate::field::FieldDecoder;
use crate::primitive::is_primitive;
use crate::source::segment_tag;

/// Value types allowed in OBX-2 (HL7 table 0125 plus the Japanese `ZRD`).
pub const OBSERVATION_VALUE_TYPES: &[&str] = &[
    "AD", "CWE", "CF", "CK", "CN", "CP", "CX", "DT", "ED", "FT", "MO", "NM", "PN", "RP", "SN",
    "ST", "TM", "TN", "TS", "TX", "XAD", "XCN", "XON", "XPN", "XTN", "ZRD",
];

const OBSERVATION_TAG: &str = "OBX";
const OBSERVATION_VALUE_SEQ: usize = 5;
const OBSERVATION_TYPE_SEQ: usize = 2;

/// A decoded segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub tag: String,
    pub fields: ValueMap,
}

impl Segment {
    pub fn field(&self, name: &str) -> Option<&DecodedValue> {
        self.fields.get(name)
    }

    /// True when the whole segment was replaced by the redaction sentinel.
    pub fn is_redacted(&self) -> bool {
        self.fields.len() == 1 && self.fields.get(&self.tag).is_some_and(DecodedValue::is_redacted)
    }
}

/// Builds [`Segment`]s for one category with one set of options.
#[derive(Debug, Clone, Copy)]
pub struct SegmentBuilder<'a> {
    schema: &'a SchemaTables,
    policy: Option<&'a DeidentificationPolicy>,
    field_names: NameStyle,
    nesting: &'a NestNaming,
    usage_key: Option<&'a str>,
    decoder: FieldDecoder<'a>,
}

impl<'a> SegmentBuilder<'a> {
    /// `usage_key` selects the usage table consulted when strict usage
    /// filtering is on; `policy` is ignored when de-identification is off.
    pub fn new(
        schema: &'a SchemaTables,
        policy: &'a DeidentificationPolicy,
        options: &'a JsonizerOptions,
        usage_key: &'a str,
    ) -> Self {
        let policy = options.deidentify.then_some(policy);
        Self {
            schema,
            policy,
            field_names: options.field_names,
            nesting: &options.nesting,
            usage_key: options.strict_usage_filtering.then_some(usage_key),
            decoder: FieldDecoder::new(schema, policy, options.element_names),
        }
    }

    /// Decode one raw segment.
    ///
    /// A header segment replaces the context's delimiters before its fields
    /// are split. Fails only when the header is too short to carry them.
    pub fn build(&self, raw: &str, ctx: &mut MessageContext) -> Result<Segment> {
        let tag = segment_tag(raw);
        let mut fields = ValueMap::new();

        if self.policy.is_some_and(|policy| policy.redacts_segment(tag)) {
            fields.insert(tag.to_string(), DecodedValue::Redacted);
            return Ok(Segment {
                tag: tag.to_string(),
                fields,
            });
        }

        let values: Vec<&str> = if tag == HEADER_TAG {
            let delimiters = DelimiterSet::from_header(raw)?;
            ctx.set_delimiters(delimiters);
            // MSH-1 is the field separator itself, so the header has one more
            // field than splitting suggests.
            let separator_end = HEADER_TAG.len() + delimiters.field.len_utf8();
            let mut values = vec![tag, &raw[HEADER_TAG.len()..separator_end]];
            values.extend(raw.split(delimiters.field).skip(1));
            values
        } else {
            raw.split(ctx.delimiters().field).collect()
        };

        for (sequence, value) in values.iter().copied().enumerate().skip(1) {
            let location = FieldLocation::new(tag, sequence);
            if tag == HEADER_TAG && sequence <= 2 {
                // separator and encoding characters, taken literally
                fields.insert(self.field_name(tag, sequence), DecodedValue::text(value));
                continue;
            }
            if value.is_empty() {
                continue;
            }
            if let Some(key) = self.usage_key
                && self.schema.usage(key, tag, sequence) == Some(Usage::NotUsed)
            {
                continue;
            }

            if self
                .policy
                .is_some_and(|policy| policy.redacts_field(tag, sequence))
            {
                fields.insert(self.redacted_name(tag, sequence), DecodedValue::Redacted);
                continue;
            }

            let Some(def) = self.schema.field(tag, sequence) else {
                ctx.report(location.diagnostic(
                    DiagnosticKind::UnknownField,
                    format!("no field definition for {tag}-{sequence}"),
                ));
                fields.insert(fallback_name(tag, sequence), DecodedValue::text(value));
                continue;
            };

            let mut name = self.field_name(tag, sequence);
            let data_type = if tag == OBSERVATION_TAG && sequence == OBSERVATION_VALUE_SEQ {
                let value_type = values.get(OBSERVATION_TYPE_SEQ).copied().unwrap_or_default();
                if !OBSERVATION_VALUE_TYPES.contains(&value_type) {
                    ctx.report(location.diagnostic(
                        DiagnosticKind::UnknownObservationValueType,
                        format!("OBX-2 value type '{value_type}' is not in HL7 table 0125"),
                    ));
                    continue;
                }
                // one index per value type: NM and TX values never share a key
                name = format!("{name}_{value_type}");
                value_type
            } else {
                def.data_type.as_str()
            };

            if def.repeatable && !is_primitive(data_type) {
                name = self.nesting.nested(&name);
            }

            let decoded = self
                .decoder
                .decode(value, data_type, def.repeatable, ctx, location);
            fields.insert(name, decoded);
        }

        Ok(Segment {
            tag: tag.to_string(),
            fields,
        })
    }

    /// Key of a redacted field; fields the tables do not describe get the
    /// positional name.
    fn redacted_name(&self, tag: &str, sequence: usize) -> String {
        match self.schema.field(tag, sequence) {
            Some(def) if def.repeatable && !is_primitive(&def.data_type) => {
                self.nesting.nested(&self.field_name(tag, sequence))
            }
            Some(_) => self.field_name(tag, sequence),
            None => fallback_name(tag, sequence),
        }
    }

    fn field_name(&self, tag: &str, sequence: usize) -> String {
        self.schema
            .field(tag, sequence)
            .and_then(|def| def.names.resolve(self.field_names))
            .map_or_else(|| fallback_name(tag, sequence), str::to_string)
    }
}

/// Name used for a field the segment tables do not describe, e.g. `ZE1-3`.
fn fallback_name(tag: &str, sequence: usize) -> String {
    format!("{tag}-{sequence}")
}
