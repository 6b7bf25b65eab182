//! Resolution of HL7 escape sequences (`\F\`, `\S\`, `\T\`, `\R\`, `\E\`).

use std::borrow::Cow;

use ssmix_model::DiagnosticKind;

use crate::context::{FieldLocation, MessageContext};
use crate::delimiters::DelimiterSet;

/// Replace the delimiter escape codes in `value` using the message's delimiters.
///
/// Unrecognized codes (formatting codes such as `.br` or hex escapes) resolve
/// to nothing. An empty code (`\\`) stands for the escape character itself.
/// A trailing escape character with no closing partner is reported and kept,
/// together with the rest of the value, as literal text.
pub fn resolve_escapes<'v>(
    value: &'v str,
    ctx: &mut MessageContext,
    location: FieldLocation<'_>,
) -> Cow<'v, str> {
    let delimiters = ctx.delimiters();
    let escape = delimiters.escape;
    if !value.contains(escape) {
        return Cow::Borrowed(value);
    }

    let mut resolved = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(open) = rest.find(escape) {
        resolved.push_str(&rest[..open]);
        let after_open = &rest[open + escape.len_utf8()..];
        let Some(close) = after_open.find(escape) else {
            ctx.report(location.diagnostic(
                DiagnosticKind::UnclosedEscapeSequence,
                format!("escape character '{escape}' is never closed in '{value}'"),
            ));
            resolved.push_str(&rest[open..]);
            return Cow::Owned(resolved);
        };
        if let Some(replacement) = replacement(&after_open[..close], &delimiters) {
            resolved.push(replacement);
        }
        rest = &after_open[close + escape.len_utf8()..];
    }
    resolved.push_str(rest);
    Cow::Owned(resolved)
}

fn replacement(code: &str, delimiters: &DelimiterSet) -> Option<char> {
    match code {
        "F" => Some(delimiters.field),
        "S" => Some(delimiters.component),
        "T" => Some(delimiters.subcomponent),
        "R" => Some(delimiters.repetition),
        "E" | "" => Some(delimiters.escape),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(value: &str) -> (String, usize) {
        let mut ctx = MessageContext::new();
        let resolved = resolve_escapes(value, &mut ctx, FieldLocation::new("OBX", 5)).into_owned();
        (resolved, ctx.diagnostics().len())
    }

    #[test]
    fn replaces_delimiter_codes() {
        assert_eq!(resolve(r"a\F\b\S\c\T\d\R\e\E\f"), (r"a|b^c&d~e\f".to_string(), 0));
    }

    #[test]
    fn plain_text_is_borrowed() {
        let mut ctx = MessageContext::new();
        let resolved = resolve_escapes("plain", &mut ctx, FieldLocation::new("OBX", 5));
        assert!(matches!(resolved, Cow::Borrowed("plain")));
    }

    #[test]
    fn unknown_codes_resolve_to_nothing() {
        assert_eq!(resolve(r"line1\.br\line2\X0D\"), ("line1line2".to_string(), 0));
    }

    #[test]
    fn empty_code_is_literal_escape() {
        assert_eq!(resolve(r"C:\\temp"), (r"C:\temp".to_string(), 0));
    }

    #[test]
    fn unclosed_escape_is_kept_and_reported() {
        assert_eq!(resolve(r"a\F\b\c"), (r"a|b\c".to_string(), 1));
    }

    #[test]
    fn honours_custom_escape_character() {
        let mut ctx = MessageContext::with_delimiters(DelimiterSet {
            escape: '!',
            ..DelimiterSet::default()
        });
        let resolved = resolve_escapes("x!F!y", &mut ctx, FieldLocation::new("NTE", 3));
        assert_eq!(resolved, "x|y");
    }
}
