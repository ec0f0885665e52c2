// Parser error path tests
// Each malformed document must be rejected with the matching error kind

use foi_core::error::{FoiError, ParseError};
use foi_core::parse;

fn parse_error(source: &str) -> ParseError {
    match parse(source) {
        Err(FoiError::Parser(err)) => err,
        other => panic!("Expected a parse error, got {other:?}"),
    }
}

#[test]
fn test_parser_error_close_without_open() {
    let err = parse_error("[END OF MODEL]\n");
    assert!(
        matches!(&err, ParseError::Structural { message, .. }
            if message == "[END OF MODEL] without a matching [MODEL]"),
        "unexpected error: {err:?}"
    );
}

#[test]
fn test_parser_error_crossed_markers() {
    let source = "[A]\n[B]\n[END OF A]\n[END OF B]\n";
    let err = parse_error(source);
    assert!(
        matches!(&err, ParseError::Structural { message, .. }
            if message == "expected [END OF B], found [END OF A]"),
        "unexpected error: {err:?}"
    );
}

#[test]
fn test_parser_error_never_closed() {
    let err = parse_error("[INPUT DATA]\n[MODEL]\n   0 : Bearing piles\n[END OF MODEL]\n");
    assert!(
        matches!(&err, ParseError::Structural { message, .. }
            if message == "[INPUT DATA] is never closed"),
        "unexpected error: {err:?}"
    );
}

#[test]
fn test_parser_error_stray_table_marker() {
    let err = parse_error("[POSITIONS]\n[DATA]\n[END OF POSITIONS]\n");
    assert!(matches!(err, ParseError::Structural { .. }));
}

#[test]
fn test_parser_error_table_without_columns() {
    let err = parse_error("[POSITIONS]\n[TABLE]\n[DATA]\n[END OF DATA]\n[END OF TABLE]\n[END OF POSITIONS]\n");
    assert!(
        matches!(&err, ParseError::Structural { message, .. }
            if message == "expected [COLUMN INDICATION]"),
        "unexpected error: {err:?}"
    );
}

#[test]
fn test_parser_error_table_runs_out() {
    let err = parse_error("[POSITIONS]\n[TABLE]\n[COLUMN INDICATION]\nindex\n");
    assert!(
        matches!(&err, ParseError::Structural { message, .. }
            if message == "input ended before [END OF COLUMN INDICATION]"),
        "unexpected error: {err:?}"
    );
}

#[test]
fn test_parser_error_list_closed_early() {
    let source = "[LOADS]\n2 = number of items\n     -250.00 : Load 1\n[END OF LOADS]\n";
    assert!(matches!(
        parse_error(source),
        ParseError::CountMismatch {
            expected: 2,
            found: 1,
            ..
        }
    ));
}

#[test]
fn test_parser_error_list_runs_out() {
    let source = "[LOADS]\n1 = number of items\n";
    assert!(matches!(
        parse_error(source),
        ParseError::CountMismatch {
            expected: 1,
            found: 0,
            ..
        }
    ));
}

#[test]
fn test_parser_error_blank_line_inside_list() {
    let source = "[LOADS]\n2 = number of items\n     -250.00 : Load 1\n\n     -300.00 : Load 2\n[END OF LOADS]\n";
    assert!(matches!(
        parse_error(source),
        ParseError::CountMismatch {
            expected: 2,
            found: 1,
            ..
        }
    ));
}

#[test]
fn test_parser_error_nested_list_short() {
    let source = "[PROFILES]\n1 = number of items\n[PROFILE]\n2 = number of items\n[LAYER]\n[END OF LAYER]\n[END OF PROFILE]\n[END OF PROFILES]\n";
    assert!(matches!(
        parse_error(source),
        ParseError::CountMismatch {
            expected: 2,
            found: 1,
            ..
        }
    ));
}

#[test]
fn test_parser_error_missing_colon() {
    let err = parse_error("[MODEL]\n   0   Bearing piles\n[END OF MODEL]\n");
    assert!(matches!(err, ParseError::ValueFormat { .. }));
}

#[test]
fn test_parser_error_missing_value() {
    let err = parse_error("[MODEL]\n   : Bearing piles\n[END OF MODEL]\n");
    assert!(
        matches!(&err, ParseError::ValueFormat { expected, .. } if expected == "a value before ':'"),
        "unexpected error: {err:?}"
    );
}

#[test]
fn test_parser_error_column_name_with_space() {
    let source = "[POSITIONS]\n[TABLE]\n[COLUMN INDICATION]\nPile Name\n[END OF COLUMN INDICATION]\n[DATA]\n[END OF DATA]\n[END OF TABLE]\n[END OF POSITIONS]\n";
    assert!(matches!(parse_error(source), ParseError::ValueFormat { .. }));
}

#[test]
fn test_parser_error_long_row() {
    let source = "[POSITIONS]\n[TABLE]\n[COLUMN INDICATION]\nindex\nX\n[END OF COLUMN INDICATION]\n[DATA]\n     1      0.000      2.000\n[END OF DATA]\n[END OF TABLE]\n[END OF POSITIONS]\n";
    assert!(matches!(
        parse_error(source),
        ParseError::ColumnMismatch {
            expected: 2,
            found: 3,
            ..
        }
    ));
}

#[test]
fn test_text_section_accepts_free_text() {
    let source = "[RUN IDENTIFICATION]\nno colon here\n  : nor a value here\n[END OF RUN IDENTIFICATION]\n";
    assert!(parse(source).is_ok());
}

#[test]
fn test_error_span_points_at_the_line() {
    let source = "[MODEL]\n   0   Bearing piles\n[END OF MODEL]\n";
    match parse_error(source) {
        ParseError::ValueFormat { span, .. } => {
            assert_eq!(span.offset(), "[MODEL]\n".len());
            assert_eq!(span.len(), "   0   Bearing piles".len());
        }
        other => panic!("Expected a value format error, got {other:?}"),
    }
}
