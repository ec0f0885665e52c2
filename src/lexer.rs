/// Classification of one physical line of a `.foi` document.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum LineKind<'a> {
    /// `[NAME]` for any name other than the table sub-block names.
    SectionOpen(&'a str),
    /// `[END OF NAME]`
    SectionClose(&'a str),
    TableOpen,
    TableClose,
    ColumnIndicationOpen,
    ColumnIndicationClose,
    DataOpen,
    DataClose,
    /// Empty or whitespace-only line.
    Blank,
    /// Anything else. Content is interpreted later, by the decoder.
    Statement,
}

/// A line with its position in the source.
#[derive(Debug, Clone)]
pub struct Line<'a> {
    /// 1-based line number.
    pub number: usize,
    /// Byte offset of the first character.
    pub offset: usize,
    /// Line content without the terminator.
    pub text: &'a str,
    pub kind: LineKind<'a>,
    /// Whether the line was terminated by `\r\n`.
    pub crlf: bool,
    /// Whether the line was terminated at all (the last line may not be).
    pub terminated: bool,
}

impl Line<'_> {
    pub fn is_marker(&self) -> bool {
        !matches!(self.kind, LineKind::Blank | LineKind::Statement)
    }
}

/// Lazily splits text into classified lines.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
    line_number: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            line_number: 0,
        }
    }

    pub fn lex(self) -> Vec<Line<'a>> {
        self.collect()
    }

    fn next_line(&mut self) -> Option<Line<'a>> {
        if self.position >= self.input.len() {
            return None;
        }
        let start = self.position;
        let rest = &self.input[start..];
        let (raw, terminated) = match rest.find('\n') {
            Some(end) => {
                self.position = start + end + 1;
                (&rest[..end], true)
            }
            None => {
                self.position = self.input.len();
                (rest, false)
            }
        };
        let (text, crlf) = match raw.strip_suffix('\r') {
            Some(stripped) if terminated => (stripped, true),
            _ => (raw, false),
        };
        self.line_number += 1;

        Some(Line {
            number: self.line_number,
            offset: start,
            text,
            kind: classify(text),
            crlf,
            terminated,
        })
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Line<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line()
    }
}

/// Classifies a line by exact bracket patterns.
pub fn classify(text: &str) -> LineKind<'_> {
    if text.trim().is_empty() {
        return LineKind::Blank;
    }
    let Some(inner) = text
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .filter(|inner| !inner.is_empty() && !inner.contains(['[', ']']))
    else {
        return LineKind::Statement;
    };

    if let Some(name) = inner.strip_prefix("END OF ") {
        return match name {
            "" => LineKind::Statement,
            "TABLE" => LineKind::TableClose,
            "COLUMN INDICATION" => LineKind::ColumnIndicationClose,
            "DATA" => LineKind::DataClose,
            _ => LineKind::SectionClose(name),
        };
    }

    match inner {
        "TABLE" => LineKind::TableOpen,
        "COLUMN INDICATION" => LineKind::ColumnIndicationOpen,
        "DATA" => LineKind::DataOpen,
        _ => LineKind::SectionOpen(inner),
    }
}
