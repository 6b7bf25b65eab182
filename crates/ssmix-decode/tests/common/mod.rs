#![allow(dead_code)]

use ssmix_decode::{MessageContext, Segment, SegmentBuilder};
use ssmix_model::{DeidentificationPolicy, Diagnostic, JsonizerOptions, SchemaTables};

pub fn schema() -> SchemaTables {
    SchemaTables::from_json(
        include_str!("../../../../standards/SEGMENT_STRUCTURE.json"),
        include_str!("../../../../standards/DATATYPE_STRUCTURE.json"),
        include_str!("../../../../standards/SSMIX2_FIELD_OPTIONS.json"),
    )
    .expect("sample dictionaries parse")
}

/// Decode `lines` as one message, returning the segments and diagnostics.
pub fn decode(
    lines: &[&str],
    options: &JsonizerOptions,
    usage_key: &str,
) -> (Vec<Segment>, Vec<Diagnostic>) {
    let schema = schema();
    let policy = DeidentificationPolicy::ssmix2();
    let builder = SegmentBuilder::new(&schema, &policy, options, usage_key);
    let mut ctx = MessageContext::new();
    let segments = lines
        .iter()
        .map(|line| builder.build(line, &mut ctx).expect("segment decodes"))
        .collect();
    (segments, ctx.into_diagnostics())
}

pub fn decode_one(line: &str, options: &JsonizerOptions) -> (Segment, Vec<Diagnostic>) {
    let (mut segments, diagnostics) = decode(&[line], options, "ADT");
    (segments.remove(0), diagnostics)
}

pub fn to_json(segment: &Segment) -> serde_json::Value {
    serde_json::to_value(&segment.fields).expect("segment serializes")
}
