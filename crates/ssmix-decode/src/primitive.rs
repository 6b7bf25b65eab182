//! Conversion of primitive-typed values.
//!
//! Temporal types are checked against their HL7 shape, numbers must parse,
//! text types get their escape sequences resolved. Nothing here fails: a bad
//! value degrades to an empty string (temporal) or null (numeric) and a
//! diagnostic is recorded.

use std::sync::LazyLock;

use regex::Regex;
use ssmix_model::{DecodedValue, DiagnosticKind};

use crate::context::{FieldLocation, MessageContext};
use crate::escape::resolve_escapes;

/// Data types decoded as a single value rather than split into components.
/// The empty type covers schema entries that declare none.
pub const PRIMITIVE_TYPES: &[&str] = &[
    "", "DT", "DTM", "FT", "GTS", "ID", "IS", "NM", "SI", "ST", "TM", "TX",
];

/// Text types whose escape sequences are resolved.
const ESCAPED_TYPES: &[&str] = &["FT", "ST", "TX"];

/// `YYYY[MM[DD]]`
static DATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}((0[1-9]|1[0-2])(0[1-9]|[12][0-9]|3[01])?)?$").expect("Invalid DT regex")
});

/// `YYYY[MM[DD[HH[MM[SS[.S[S[S[S]]]]]]]]][+/-ZZZZ]`
static DATETIME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\d{4}((0[1-9]|1[0-2])((0[1-9]|[12][0-9]|3[01])(([01][0-9]|2[0-4])(([0-5][0-9])(([0-5][0-9])(\.[0-9]{1,4})?)?)?)?)?)?([+-](0[0-9]|1[0-3])[0-5][0-9])?$",
    )
    .expect("Invalid DTM regex")
});

/// `HH[MM[SS[.S[S[S[S]]]]]][+/-ZZZZ]`
static TIME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(([01][0-9]|2[0-4])(([0-5][0-9])(([0-5][0-9])(\.[0-9]{1,4})?)?)?)?([+-](0[0-9]|1[0-3])[0-5][0-9])?$",
    )
    .expect("Invalid TM regex")
});

pub fn is_primitive(data_type: &str) -> bool {
    PRIMITIVE_TYPES.contains(&data_type)
}

pub fn is_valid_date(value: &str) -> bool {
    DATE_REGEX.is_match(value)
}

pub fn is_valid_datetime(value: &str) -> bool {
    DATETIME_REGEX.is_match(value)
}

pub fn is_valid_time(value: &str) -> bool {
    TIME_REGEX.is_match(value)
}

pub fn is_valid_number(value: &str) -> bool {
    value.trim().parse::<f64>().is_ok()
}

/// Convert `value` according to `data_type`.
///
/// Types outside the temporal, numeric and escaped-text sets pass through
/// unchanged, which is also how complex types reaching this point are handled.
pub fn convert(
    data_type: &str,
    value: &str,
    ctx: &mut MessageContext,
    location: FieldLocation<'_>,
) -> DecodedValue {
    match data_type {
        "DT" => temporal(value, is_valid_date, "date", ctx, location),
        "DTM" => temporal(value, is_valid_datetime, "date/time", ctx, location),
        "TM" => temporal(value, is_valid_time, "time", ctx, location),
        "NM" => {
            if is_valid_number(value) {
                DecodedValue::text(value)
            } else {
                ctx.report(location.diagnostic(
                    DiagnosticKind::MalformedNumericValue,
                    format!("'{value}' is not a number"),
                ));
                DecodedValue::Null
            }
        }
        escaped if ESCAPED_TYPES.contains(&escaped) => {
            DecodedValue::text(resolve_escapes(value, ctx, location))
        }
        _ => DecodedValue::text(value),
    }
}

fn temporal(
    value: &str,
    is_valid: fn(&str) -> bool,
    what: &str,
    ctx: &mut MessageContext,
    location: FieldLocation<'_>,
) -> DecodedValue {
    if is_valid(value) {
        DecodedValue::text(value)
    } else {
        ctx.report(location.diagnostic(
            DiagnosticKind::MalformedTemporalValue,
            format!("'{value}' is not a valid {what}"),
        ));
        DecodedValue::text("")
    }
}
