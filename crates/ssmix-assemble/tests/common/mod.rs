#![allow(dead_code)]

use serde_json::Value;
use ssmix_assemble::{Group, Jsonized, Jsonizer};
use ssmix_model::{DiagnosticKind, JsonizerOptions, NestNaming, SchemaTables};

pub const HEADER: &str = "MSH|^~\\&|HIS|HOSP|SSMIX|HOSP|20210805120000||OMP^O09^OMP_O09|MSG0001|P|2.5";
pub const PATIENT: &str = "PID|1||1234567^^^^PI||山田^太郎";
pub const VISIT: &str = "PV1|1|I|W3^301^1";

pub fn schema() -> SchemaTables {
    SchemaTables::from_json(
        include_str!("../../../../standards/SEGMENT_STRUCTURE.json"),
        include_str!("../../../../standards/DATATYPE_STRUCTURE.json"),
        include_str!("../../../../standards/SSMIX2_FIELD_OPTIONS.json"),
    )
    .expect("sample dictionaries parse")
}

pub fn jsonizer() -> Jsonizer {
    Jsonizer::new(schema(), JsonizerOptions::default())
}

/// Jsonize `lines` (joined with carriage returns) as a message of `category`.
pub fn jsonize(category: &str, lines: &[&str]) -> Jsonized {
    jsonizer()
        .jsonize(category, &lines.join("\r"))
        .expect("message jsonizes")
}

pub fn document(result: &Jsonized) -> Value {
    serde_json::to_value(&result.document).expect("document serializes")
}

/// Rendered keys of `group` in document order.
pub fn keys(group: &Group) -> Vec<String> {
    let naming = NestNaming::default();
    group.keys().map(|key| key.render(&naming)).collect()
}

pub fn kinds(result: &Jsonized) -> Vec<DiagnosticKind> {
    result.diagnostics.iter().map(|d| d.kind).collect()
}
