//! Segment decoding against the sample SS-MIX2 dictionaries.

mod common;

use common::{decode, decode_one, schema, to_json};
use serde_json::json;
use ssmix_decode::{MessageContext, SegmentBuilder};
use ssmix_model::{
    DeidentificationPolicy, DiagnosticKind, JsonizeError, JsonizerOptions, Language, NameStyle,
    REDACTED,
};

const MSH: &str = "MSH|^~\\&|HIS123|SEND|GW|RCV|20110414123030||ADT^A08^ADT_A01|20110414000000001|P|2.5||||||~ISO IR87||ISO 2022-1994";
const PID: &str = "PID|1||1234567^^^^PI||山田^太郎^^^^^L^I~ヤマダ^タロウ^^^^^L^P||19600101|M|||^^^^1000001^JPN^H^東京都千代田区||^PRN^PH^^^^^^^^^03-1234-5678";

#[test]
fn header_fields() {
    let (segment, diagnostics) = decode_one(MSH, &JsonizerOptions::default());
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert_eq!(
        to_json(&segment),
        json!({
            "MSH-1 Field Separator": "|",
            "MSH-2 Encoding Characters": "^~\\&",
            "MSH-3 Sending Application": {"HD.1 Namespace ID": "HIS123"},
            "MSH-4 Sending Facility": {"HD.1 Namespace ID": "SEND"},
            "MSH-5 Receiving Application": {"HD.1 Namespace ID": "GW"},
            "MSH-6 Receiving Facility": {"HD.1 Namespace ID": "RCV"},
            "MSH-7 Date/Time Of Message": {"TS.1 Time": "20110414123030"},
            "MSH-9 Message Type": {
                "MSG.1 Message Code": "ADT",
                "MSG.2 Trigger Event": "A08",
                "MSG.3 Message Structure": "ADT_A01"
            },
            "MSH-10 Message Control ID": "20110414000000001",
            "MSH-11 Processing ID": {"PT.1 Processing ID": "P"},
            "MSH-12 Version ID": {"VID.1 Version ID": "2.5"},
            "MSH-18 Character Set": ["ISO IR87"],
            "MSH-20 Alternate Character Set Handling Scheme": "ISO 2022-1994"
        })
    );
}

#[test]
fn fields_keep_sequence_order() {
    let (segment, _) = decode_one(MSH, &JsonizerOptions::default());
    let keys: Vec<&str> = segment.fields.keys().map(String::as_str).take(4).collect();
    assert_eq!(
        keys,
        vec![
            "MSH-1 Field Separator",
            "MSH-2 Encoding Characters",
            "MSH-3 Sending Application",
            "MSH-4 Sending Facility"
        ]
    );
}

#[test]
fn patient_identity_is_redacted() {
    let (segment, diagnostics) = decode_one(PID, &JsonizerOptions::default());
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert_eq!(
        to_json(&segment),
        json!({
            "PID-1 Set ID - PID": "1",
            "PID-3 Patient Identifier List_Nested": [
                {"CX.1 ID Number": "1234567", "CX.5 Identifier Type Code": "PI"}
            ],
            "PID-5 Patient Name_Nested": [
                {
                    "XPN.1 Family Name": REDACTED,
                    "XPN.2 Given Name": REDACTED,
                    "XPN.7 Name Type Code": "L",
                    "XPN.8 Name Representation Code": "I"
                },
                {
                    "XPN.1 Family Name": REDACTED,
                    "XPN.2 Given Name": REDACTED,
                    "XPN.7 Name Type Code": "L",
                    "XPN.8 Name Representation Code": "P"
                }
            ],
            "PID-7 Date/Time of Birth": {"TS.1 Time": "19600101"},
            "PID-8 Administrative Sex": "M",
            "PID-11 Patient Address_Nested": [
                {
                    "XAD.5 Zip or Postal Code": "1000001",
                    "XAD.6 Country": "JPN",
                    "XAD.7 Address Type": "H",
                    "XAD.8 Other Geographic Designation": REDACTED
                }
            ],
            "PID-13 Phone Number - Home_Nested": [
                {
                    "XTN.2 Telecommunication Use Code": "PRN",
                    "XTN.3 Telecommunication Equipment Type": "PH",
                    "XTN.12 Unformatted Telephone number": REDACTED
                }
            ]
        })
    );
}

#[test]
fn disabled_deidentification_keeps_names() {
    let options = JsonizerOptions::default().with_deidentify(false);
    let (segment, _) = decode_one(PID, &options);
    let names = to_json(&segment)["PID-5 Patient Name_Nested"].clone();
    assert_eq!(
        names[0],
        json!({
            "XPN.1 Family Name": {"FN.1 Surname": "山田"},
            "XPN.2 Given Name": "太郎",
            "XPN.7 Name Type Code": "L",
            "XPN.8 Name Representation Code": "I"
        })
    );
}

#[test]
fn japanese_names_without_sequence() {
    let japanese = NameStyle {
        sequence_prefixed: false,
        language: Language::Ja,
    };
    let options = JsonizerOptions::default()
        .with_deidentify(false)
        .with_field_names(japanese)
        .with_element_names(japanese);
    let (segment, _) = decode_one("PID|1||||山田^太郎", &options);
    assert_eq!(
        to_json(&segment),
        json!({
            "セットID": "1",
            "患者氏名_Nested": [{"姓": {"Surname": "山田"}, "名": "太郎"}]
        })
    );
}

#[test]
fn redacted_fields_and_segments() {
    let (segments, _) = decode(
        &["PID|1||||||||||||||||||123-45-6789", "NK1|1|山田^花子|SPO"],
        &JsonizerOptions::default(),
        "ADT",
    );
    assert_eq!(to_json(&segments[0])["PID-19 SSN Number - Patient"], REDACTED);
    assert!(segments[1].is_redacted());
    assert_eq!(to_json(&segments[1]), json!({"NK1": REDACTED}));

    let (segments, _) = decode(
        &["NK1|1|山田^花子|SPO"],
        &JsonizerOptions::default().with_deidentify(false),
        "ADT",
    );
    assert!(!segments[0].is_redacted());
    assert_eq!(
        to_json(&segments[0])["NK1-3 Relationship"],
        json!({"CE.1 Identifier": "SPO"})
    );
}

#[test]
fn policy_fields_beyond_the_dictionary_are_redacted() {
    let (segments, diagnostics) = decode(
        &[
            "IN1|1|PLAN|INSCO|NAME|ADDR|CONTACT|555-1234|GRP-SECRET-ID",
            "ZI1|1|PLAN|INSURED-SECRET|X",
        ],
        &JsonizerOptions::default(),
        "PPR-01",
    );
    assert_eq!(
        to_json(&segments[0]),
        json!({
            "IN1-1 Set ID - IN1": "1",
            "IN1-2 Insurance Plan ID": {"CE.1 Identifier": "PLAN"},
            "IN1-3 Insurance Company ID_Nested": REDACTED,
            "IN1-4 Insurance Company Name_Nested": REDACTED,
            "IN1-5": REDACTED,
            "IN1-6": REDACTED,
            "IN1-7": REDACTED,
            "IN1-8": REDACTED
        })
    );
    assert_eq!(
        to_json(&segments[1]),
        json!({
            "ZI1-1": "1",
            "ZI1-2": "PLAN",
            "ZI1-3": REDACTED,
            "ZI1-4": REDACTED
        })
    );
    // ZI1-1 and ZI1-2; redacted fields are never looked up
    assert_eq!(diagnostics.len(), 2, "{diagnostics:?}");
    assert!(diagnostics.iter().all(|d| d.kind == DiagnosticKind::UnknownField));
}

#[test]
fn policy_components_beyond_the_type_table_are_redacted() {
    let schema = schema();
    let policy = DeidentificationPolicy::empty().with_components("XPN", [9]);
    let options = JsonizerOptions::default();
    let builder = SegmentBuilder::new(&schema, &policy, &options, "ADT");
    let mut ctx = MessageContext::new();

    let segment = builder
        .build("PID|1||||a^^^^^^^^i^SECRET", &mut ctx)
        .expect("segment decodes");
    assert_eq!(
        to_json(&segment)["PID-5 Patient Name_Nested"],
        json!([{
            "XPN.1 Family Name": {"FN.1 Surname": "a"},
            "XPN.9": "i",
            "XPN.10": REDACTED
        }])
    );
    let diagnostics = ctx.into_diagnostics();
    assert_eq!(diagnostics.len(), 1, "{diagnostics:?}");
    assert_eq!(diagnostics[0].kind, DiagnosticKind::UnknownComponent);
}

#[test]
fn usage_filtering_drops_unused_fields() {
    let line = "PID|1|||||||M||||13101";
    let (strict, _) = decode_one(line, &JsonizerOptions::default());
    assert!(strict.field("PID-12 County Code").is_none());

    let relaxed = JsonizerOptions::default().with_strict_usage_filtering(false);
    let (segment, _) = decode_one(line, &relaxed);
    assert_eq!(
        segment.field("PID-12 County Code").and_then(|v| v.as_text()),
        Some("13101")
    );
}

#[test]
fn usage_filtering_ignores_other_categories() {
    let (segments, _) = decode(&["PID|1|||||||M||||13101"], &JsonizerOptions::default(), "OMD");
    assert!(segments[0].field("PID-12 County Code").is_some());
}

#[test]
fn repeatable_field_of_separators_is_empty_list() {
    let (segment, _) = decode_one("PID|1||~", &JsonizerOptions::default());
    assert_eq!(
        to_json(&segment)["PID-3 Patient Identifier List_Nested"],
        json!([])
    );
}

#[test]
fn observation_value_takes_type_from_value_type_field() {
    let (segments, diagnostics) = decode(
        &[
            "OBX|1|NM|3A010000002327101^WBC^JC10||6.5|10*3/uL^^ANSI|3.3-8.6|N|||F",
            "OBX|2|CWE|5H010000001999911^HBs抗原^JC10||01^陽性^99XYZ||||||F",
            "OBX|3|FT|9N001000000000001^所見^JC10||所見1\\.br\\所見2||||||F",
        ],
        &JsonizerOptions::default(),
        "ADT",
    );
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert_eq!(to_json(&segments[0])["OBX-5 Observation Value_NM"], json!(["6.5"]));
    assert_eq!(
        to_json(&segments[1])["OBX-5 Observation Value_CWE_Nested"],
        json!([{
            "CWE.1 Identifier": "01",
            "CWE.2 Text": "陽性",
            "CWE.3 Name of Coding System": "99XYZ"
        }])
    );
    assert_eq!(
        to_json(&segments[2])["OBX-5 Observation Value_FT"],
        json!(["所見1所見2"])
    );
}

#[test]
fn unknown_observation_type_drops_value() {
    let (segment, diagnostics) = decode_one("OBX|1|XX|CODE||value||||||F", &JsonizerOptions::default());
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::UnknownObservationValueType);
    assert_eq!(diagnostics[0].field.as_deref(), Some("OBX-5"));
    assert!(segment.fields.keys().all(|key| !key.starts_with("OBX-5")));
    assert!(segment.field("OBX-11 Observation Result Status").is_some());
}

#[test]
fn malformed_values_degrade_with_diagnostics() {
    let (segments, diagnostics) = decode(
        &["PID|1||||||1960-01-01", "OBX|1|NM|CODE||abc||||||F"],
        &JsonizerOptions::default(),
        "ADT",
    );
    assert_eq!(
        to_json(&segments[0])["PID-7 Date/Time of Birth"],
        json!({"TS.1 Time": ""})
    );
    assert_eq!(to_json(&segments[1])["OBX-5 Observation Value_NM"], json!([null]));
    let kinds: Vec<DiagnosticKind> = diagnostics.iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        vec![
            DiagnosticKind::MalformedTemporalValue,
            DiagnosticKind::MalformedNumericValue
        ]
    );
}

#[test]
fn unknown_fields_keep_raw_text() {
    let (segments, diagnostics) = decode(
        &["PV2||||| extra", "ZE1|a^b"],
        &JsonizerOptions::default(),
        "ADT",
    );
    assert_eq!(to_json(&segments[0]), json!({"PV2-5": " extra"}));
    assert_eq!(to_json(&segments[1]), json!({"ZE1-1": "a^b"}));
    assert_eq!(diagnostics.len(), 2);
    assert!(diagnostics.iter().all(|d| d.kind == DiagnosticKind::UnknownField));
}

#[test]
fn complex_subcomponent_is_not_decomposed() {
    let (segment, diagnostics) = decode_one("ORC|NW||||||1&TAB", &JsonizerOptions::default());
    assert_eq!(
        to_json(&segment)["ORC-7 Quantity/Timing_Nested"],
        json!([{"TQ.1 Quantity": {"CQ.1 Quantity": "1", "CQ.2 Units": "TAB"}}])
    );
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::NestedSubcomponent);
}

#[test]
fn header_delimiters_apply_to_following_segments() {
    let (segments, diagnostics) = decode(
        &["MSH#$*!%#HIS", "PID#1##1234567$$$$PI*7654321$$$$PT#"],
        &JsonizerOptions::default(),
        "ADT",
    );
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert_eq!(to_json(&segments[0])["MSH-2 Encoding Characters"], "$*!%");
    assert_eq!(
        to_json(&segments[1])["PID-3 Patient Identifier List_Nested"],
        json!([
            {"CX.1 ID Number": "1234567", "CX.5 Identifier Type Code": "PI"},
            {"CX.1 ID Number": "7654321", "CX.5 Identifier Type Code": "PT"}
        ])
    );
}

#[test]
fn short_header_is_fatal() {
    let schema = schema();
    let policy = DeidentificationPolicy::ssmix2();
    let options = JsonizerOptions::default();
    let builder = SegmentBuilder::new(&schema, &policy, &options, "ADT");
    let mut ctx = MessageContext::new();
    let error = builder.build("MSH|^", &mut ctx).unwrap_err();
    assert!(matches!(error, JsonizeError::Structural { .. }));
}

#[test]
fn nested_naming_is_configurable() {
    let options = JsonizerOptions::default().with_nesting("L_", "s");
    let (segment, _) = decode_one("PID|1||1234567^^^^PI", &options);
    assert!(segment.field("L_PID-3 Patient Identifier Lists").is_some());
}
