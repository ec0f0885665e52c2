//! Decoding of statement lines into typed entries.
//!
//! Three statement shapes occur inside data sections:
//!
//! * `   0 = number of items` opens a counted list,
//! * `Soil=1005` is a setting,
//! * `  1 : Is rigid = TRUE` is a key-value line with an optional
//!   secondary value after the last `=`.
//!
//! Every piece of whitespace around the tokens is kept so that the
//! serializer can reproduce the line exactly.

use crate::ast::{Format, KeyValue, KeyValueLayout, ListLayout, Scalar, ScalarValue, Setting};
use crate::utils::{split_indent, width_of};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

static LIST_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\s*)(0|[1-9]\d*)(\s*=\s*)((?i:number of items))(\s*)$").unwrap()
});
static SETTING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([^\s=:]+)(=)(.*)$").unwrap());
static INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?(0|[1-9]\d*)$").unwrap());
static DECIMAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?\d+\.(\d+)$").unwrap());

const TRUE_LITERAL: &str = "TRUE";
const FALSE_LITERAL: &str = "FALSE";

/// What a single statement line turned out to be.
#[derive(Debug, PartialEq, Clone)]
pub enum Statement {
    ListHeader { count: usize, layout: ListLayout },
    KeyValue(KeyValue),
    Setting(Setting),
}

/// Decodes a statement line from a data section.
///
/// On failure the error names the shape that was expected.
pub fn decode_statement(text: &str) -> Result<Statement, String> {
    if let Some(caps) = LIST_HEADER.captures(text) {
        let count = caps[2]
            .parse::<usize>()
            .map_err(|_| "an item count that fits in memory".to_string())?;
        return Ok(Statement::ListHeader {
            count,
            layout: ListLayout {
                indent: caps[1].to_string(),
                separator: caps[3].to_string(),
                label: format!("{}{}", &caps[4], &caps[5]),
            },
        });
    }

    if let Some(caps) = SETTING.captures(text) {
        let raw = &caps[3];
        return Ok(Statement::Setting(Setting {
            key: caps[1].to_string(),
            separator: caps[2].to_string(),
            value: decode_token(raw, width_of(raw)),
        }));
    }

    decode_key_value(text).map(Statement::KeyValue)
}

fn decode_key_value(text: &str) -> Result<KeyValue, String> {
    let Some((left, right)) = text.split_once(':') else {
        return Err("`<value> : <label>`, `Name=Value` or `N = number of items`".to_string());
    };

    let token = left.trim();
    if token.is_empty() {
        return Err("a value before ':'".to_string());
    }
    let (indent, _) = split_indent(left);
    let before_colon = &left[indent.len() + token.len()..];

    let (after_colon, rest) = split_indent(right);
    let body = rest.trim_end();
    let trailing = &rest[body.len()..];

    let mut layout = KeyValueLayout {
        indent: indent.to_string(),
        colon: format!("{before_colon}:{after_colon}"),
        trailing: trailing.to_string(),
        ..KeyValueLayout::default()
    };

    let (label, secondary) = match split_secondary(body) {
        Some((label, equals, secondary)) => {
            layout.equals = equals.to_string();
            (label, Some(secondary))
        }
        None => (body, None),
    };

    let mut value = decode_token(token, width_of(token));
    let flag_or_value = secondary.map(|s| {
        if let Some(flag) = boolean_literal(s) {
            if value.as_i64() == Some(i64::from(flag)) {
                value.value = ScalarValue::Boolean(flag);
            }
            Scalar::text(s).with_format(Format::new(width_of(s), None))
        } else {
            decode_token(s, width_of(s))
        }
    });

    log::trace!("decoded key-value `{label}` = {:?}", value.value);
    Ok(KeyValue {
        layout,
        value,
        label: label.to_string(),
        flag_or_value,
    })
}

/// Splits `Is rigid = TRUE` into label, `=` separator and secondary token.
/// The secondary must be a single token and the label must be non-empty.
fn split_secondary(body: &str) -> Option<(&str, &str, &str)> {
    let eq = body.rfind('=')?;
    let label = body[..eq].trim_end();
    let secondary = body[eq + 1..].trim_start();
    if label.is_empty() || secondary.is_empty() || secondary.contains(char::is_whitespace) {
        return None;
    }
    let equals = &body[label.len()..body.len() - secondary.len()];
    Some((label, equals, secondary))
}

fn boolean_literal(token: &str) -> Option<bool> {
    match token {
        TRUE_LITERAL => Some(true),
        FALSE_LITERAL => Some(false),
        _ => None,
    }
}

/// Decodes one token, right-aligned in `width` columns.
///
/// Numbers are only recognized when rendering them back gives the same
/// text; anything else (`19.1.1.23743`, `+1`, `007`) stays text.
pub fn decode_token(token: &str, width: usize) -> Scalar {
    if INTEGER.is_match(token) {
        if let Ok(n) = token.parse::<i64>() {
            let scalar = Scalar::integer(n).with_format(Format::new(width, None));
            if scalar.render_bare() == token {
                return scalar;
            }
        }
    }

    if let Some(caps) = DECIMAL.captures(token) {
        let precision = caps[1].len();
        if let Ok(d) = Decimal::from_str(token) {
            let scalar = Scalar::decimal(d).with_format(Format::new(width, Some(precision)));
            if scalar.render_bare() == token {
                return scalar;
            }
        }
    }

    Scalar::text(token).with_format(Format::new(width, None))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_value(text: &str) -> KeyValue {
        match decode_statement(text) {
            Ok(Statement::KeyValue(kv)) => kv,
            other => panic!("expected key-value, got {other:?}"),
        }
    }

    #[test]
    fn test_plain_key_value() {
        let kv = key_value("  0 : Main calculationtype");
        assert_eq!(kv.layout.indent, "  ");
        assert_eq!(kv.layout.colon, " : ");
        assert_eq!(kv.label, "Main calculationtype");
        assert_eq!(kv.value.as_i64(), Some(0));
        assert!(kv.flag_or_value.is_none());
    }

    #[test]
    fn test_width_is_counted_in_characters() {
        let kv = key_value("  é : Pile label = Pål");
        assert_eq!(kv.value.format, Some(Format::new(1, None)));
        assert_eq!(kv.flag_or_value.unwrap().format, Some(Format::new(3, None)));
    }

    #[test]
    fn test_boolean_flag() {
        let kv = key_value("1 : Is rigid = TRUE");
        assert_eq!(kv.value.as_bool(), Some(true));
        assert_eq!(kv.label, "Is rigid");
        assert_eq!(kv.flag_or_value.unwrap().as_str(), Some("TRUE"));
    }

    #[test]
    fn test_disagreeing_flag_keeps_integer() {
        let kv = key_value("0 : Odd flag = TRUE");
        assert_eq!(kv.value.as_i64(), Some(0));
        assert_eq!(kv.flag_or_value.unwrap().as_str(), Some("TRUE"));
    }

    #[test]
    fn test_decimal_secondary() {
        let kv = key_value("   1 : Factor = 1.25");
        let secondary = kv.flag_or_value.unwrap();
        assert_eq!(secondary.as_decimal(), Some(Decimal::new(125, 2)));
        assert_eq!(secondary.format.unwrap().precision, Some(2));
    }

    #[test]
    fn test_label_with_several_words_after_equals_is_not_split() {
        let kv = key_value("2 : Mode = verify design");
        assert_eq!(kv.label, "Mode = verify design");
        assert!(kv.flag_or_value.is_none());
    }

    #[test]
    fn test_list_header() {
        match decode_statement("   3 = Number of items").unwrap() {
            Statement::ListHeader { count, layout } => {
                assert_eq!(count, 3);
                assert_eq!(layout.indent, "   ");
                assert_eq!(layout.label, "Number of items");
            }
            other => panic!("expected list header, got {other:?}"),
        }
    }

    #[test]
    fn test_setting() {
        match decode_statement("DGSCPTipCalc.dll=19.1.1.23743").unwrap() {
            Statement::Setting(s) => {
                assert_eq!(s.key, "DGSCPTipCalc.dll");
                assert_eq!(s.value.as_str(), Some("19.1.1.23743"));
            }
            other => panic!("expected setting, got {other:?}"),
        }
        match decode_statement("Soil=1005").unwrap() {
            Statement::Setting(s) => assert_eq!(s.value.as_i64(), Some(1005)),
            other => panic!("expected setting, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_colon_is_an_error() {
        assert!(decode_statement("just some words").is_err());
        assert!(decode_statement("  : no value").is_err());
    }

    #[test]
    fn test_token_fidelity() {
        let d = decode_token("-1.500", 9);
        assert_eq!(d.format, Some(Format::new(9, Some(3))));
        assert_eq!(d.render(None).unwrap(), "   -1.500");

        assert_eq!(decode_token("007", 3).as_str(), Some("007"));
        assert_eq!(decode_token("+1", 2).as_str(), Some("+1"));
        assert_eq!(decode_token("1.0E-03", 7).as_str(), Some("1.0E-03"));
        assert_eq!(decode_token("42", 5).as_i64(), Some(42));
    }
}
