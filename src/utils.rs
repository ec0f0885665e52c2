/// Splits a string into its leading whitespace and the remainder.
pub fn split_indent(text: &str) -> (&str, &str) {
    let rest = text.trim_start();
    (&text[..text.len() - rest.len()], rest)
}

/// Width of `text` in columns, as counted by `format!` padding.
pub fn width_of(text: &str) -> usize {
    text.chars().count()
}

/// Splits a whitespace-delimited row into `(separator, token)` pairs, where
/// the separator is the whitespace in front of the token, plus the
/// whitespace after the last token.
pub fn split_cells(text: &str) -> (Vec<(&str, &str)>, &str) {
    let mut cells = Vec::new();
    let mut field_start = 0;
    let mut token_start: Option<usize> = None;

    for (i, c) in text.char_indices() {
        match (c.is_whitespace(), token_start) {
            (true, Some(start)) => {
                cells.push((&text[field_start..start], &text[start..i]));
                field_start = i;
                token_start = None;
            }
            (false, None) => token_start = Some(i),
            _ => {}
        }
    }
    match token_start {
        Some(start) => {
            cells.push((&text[field_start..start], &text[start..]));
            (cells, "")
        }
        None => (cells, &text[field_start..]),
    }
}
