pub mod category;
pub mod deid;
pub mod diagnostic;
pub mod error;
pub mod logdata;
pub mod options;
pub mod ordered;
pub mod schema;
pub mod value;

pub use category::Category;
pub use deid::DeidentificationPolicy;
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use error::{JsonizeError, Result};
pub use logdata::{REDACTED_VALUE, log_data_enabled, redact_value, set_log_data};
pub use options::{JsonizerOptions, Language, NameStyle, NestNaming};
pub use ordered::OrderedMap;
pub use schema::{
    ComponentDef, DataTypeStructure, NameVariants, SchemaTables, SegmentFieldDef,
    SegmentStructure, Usage, UsageTable,
};
pub use value::{DecodedValue, REDACTED, ValueMap};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_display_prefers_field() {
        let diagnostic = Diagnostic::new(DiagnosticKind::MalformedNumericValue, "'abc' is not numeric")
            .at_field("OBX", 5);
        assert_eq!(
            diagnostic.to_string(),
            "[malformed_numeric_value] OBX-5: 'abc' is not numeric"
        );
    }

    #[test]
    fn diagnostic_serializes() {
        let diagnostic =
            Diagnostic::new(DiagnosticKind::UnknownSegmentForCategory, "ZZZ is not part of OMD")
                .in_segment("ZZZ");
        let json = serde_json::to_value(&diagnostic).expect("serialize diagnostic");
        assert_eq!(json["kind"], "unknown_segment_for_category");
        assert_eq!(json["segment"], "ZZZ");
        assert!(json.get("field").is_none());
    }
}
