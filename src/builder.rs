//! Assembly of the final [`Document`]: the header micro-grammar and the
//! document-wide layout facts gathered while lines stream past.

use crate::ast::{Document, Entry, Header, HeaderLine, LineEnding, HEADER_FIELDS};
use crate::lexer::{Line, LineKind};

#[derive(Debug, Default)]
pub struct DocumentBuilder {
    header: Header,
    line_ending: Option<LineEnding>,
    final_newline: bool,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records layout facts of every line, in order.
    pub fn observe(&mut self, line: &Line) {
        if self.line_ending.is_none() && line.terminated {
            self.line_ending = Some(if line.crlf {
                LineEnding::CrLf
            } else {
                LineEnding::Lf
            });
        }
        self.final_newline = line.terminated;
    }

    pub fn push_header_line(&mut self, line: &Line) {
        let header_line = match line.kind {
            LineKind::Blank if line.text.is_empty() => HeaderLine::Blank,
            _ => decode_header_line(line.text),
        };
        self.header.lines.push(header_line);
    }

    pub fn finish(self, body: Vec<Entry>) -> Document {
        log::debug!(
            "built document: {} header lines, {} top-level entries",
            self.header.lines.len(),
            body.len()
        );
        Document {
            header: self.header,
            body,
            line_ending: self.line_ending.unwrap_or_default(),
            final_newline: self.final_newline,
        }
    }
}

/// `COMPANY    : Deltares` becomes a field; titles and banners stay text.
pub fn decode_header_line(text: &str) -> HeaderLine {
    if let Some((left, right)) = text.split_once(':') {
        let name = left.trim_end();
        if HEADER_FIELDS.contains(&name) {
            let value = right.trim_start();
            return HeaderLine::Field {
                name: name.to_string(),
                separator: format!("{}:{}", &left[name.len()..], &right[..right.len() - value.len()]),
                value: value.to_string(),
            };
        }
    }
    HeaderLine::Text(text.to_string())
}
