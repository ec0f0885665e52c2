use crate::ast::*;
use crate::builder::DocumentBuilder;
use crate::decoder::{decode_statement, decode_token, Statement};
use crate::error::{FoiError, ParseError};
use crate::lexer::{Lexer, Line, LineKind};
use crate::utils::{split_cells, split_indent, width_of};
use miette::{NamedSource, SourceSpan};
use std::iter::Peekable;
use std::sync::Arc;

/// Sections whose bodies are free text rather than key-value data.
pub const DEFAULT_TEXT_SECTIONS: [&str; 1] = ["RUN IDENTIFICATION"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Names of sections whose lines are kept verbatim, without decoding.
    pub text_sections: Vec<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            text_sections: DEFAULT_TEXT_SECTIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyMode {
    Structured,
    Text,
}

/// One open block on the parse stack.
#[derive(Debug)]
enum Frame {
    Section {
        section: Section,
        mode: BodyMode,
        opened: SourceSpan,
    },
    List {
        list: CountedList,
        opened: SourceSpan,
    },
}

impl Frame {
    fn attach(&mut self, entry: Entry) {
        match self {
            Frame::Section { section, .. } => section.entries.push(entry),
            Frame::List { list, .. } => list.items.push(entry),
        }
    }

    fn is_complete_list(&self) -> bool {
        matches!(self, Frame::List { list, .. } if list.items.len() == list.count)
    }

    fn into_entry(self) -> Entry {
        match self {
            Frame::Section { section, .. } => Entry::Section(section),
            Frame::List { list, .. } => Entry::CountedList(list),
        }
    }
}

/// A line-driven parser for `.foi` documents.
///
/// Sections, tables and counted lists are tracked on an explicit stack;
/// a block is attached to its parent only once its closing marker (or,
/// for lists, its last record) has been read.
#[derive(Debug)]
pub struct Parser<'a> {
    source: Arc<NamedSource<String>>,
    lines: Peekable<Lexer<'a>>,
    options: ParseOptions,
    stack: Vec<Frame>,
    builder: DocumentBuilder,
}

impl<'a> Parser<'a> {
    pub fn new(source_text: &'a str) -> Self {
        Self::new_with_name(source_text, "input.foi".to_string())
    }

    pub fn new_with_name(source_text: &'a str, name: String) -> Self {
        Self::with_options(source_text, name, ParseOptions::default())
    }

    pub fn with_options(source_text: &'a str, name: String, options: ParseOptions) -> Self {
        Self {
            source: Arc::new(NamedSource::new(name, source_text.to_string())),
            lines: Lexer::new(source_text).peekable(),
            options,
            stack: Vec::new(),
            builder: DocumentBuilder::new(),
        }
    }

    // === Main Parsing Methods ===

    /// Document ::= { HeaderLine } { Entry }
    pub fn parse_document(mut self) -> Result<Document, FoiError> {
        self.parse_header();

        self.stack.push(Frame::Section {
            section: Section::new(""),
            mode: BodyMode::Text,
            opened: (0, 0).into(),
        });
        while let Some(line) = self.next_line() {
            self.close_complete_lists();
            self.parse_line(line)?;
        }
        self.close_complete_lists();

        match self.stack.pop() {
            Some(Frame::Section { section, .. }) if self.stack.is_empty() => {
                Ok(self.builder.finish(section.entries))
            }
            Some(Frame::Section { section, opened, .. }) => self.err_structural(
                opened,
                format!("[{}] is never closed", section.name),
            ),
            Some(Frame::List { list, opened }) => {
                self.err_count_mismatch(opened, list.count, list.items.len())
            }
            None => unreachable!("the root frame is only popped here"),
        }
    }

    /// HeaderLine ::= any line before the first block marker
    fn parse_header(&mut self) {
        while let Some(line) = self.lines.next_if(|line| !line.is_marker()) {
            self.builder.observe(&line);
            self.builder.push_header_line(&line);
        }
    }

    fn parse_line(&mut self, line: Line<'a>) -> Result<(), FoiError> {
        let span = span_of(&line);
        let (mode, open_list) = match self.stack.last() {
            Some(Frame::Section { mode, .. }) => (*mode, None),
            Some(Frame::List { list, opened }) => {
                (BodyMode::Structured, Some((list.count, list.items.len(), *opened)))
            }
            None => (BodyMode::Text, None),
        };

        // Inside an unfinished list only records may follow.
        if let Some((count, found, opened)) = open_list {
            return match line.kind {
                LineKind::SectionOpen(name) => {
                    self.open_section(name, span);
                    Ok(())
                }
                LineKind::Statement => self.parse_statement(&line, mode),
                _ => self.err_count_mismatch(opened, count, found),
            };
        }

        match line.kind {
            LineKind::SectionOpen(name) => {
                self.open_section(name, span);
                Ok(())
            }
            LineKind::SectionClose(name) => self.close_section(name, span),
            LineKind::TableOpen => {
                let table = self.parse_table(span)?;
                self.attach(Entry::Table(table));
                Ok(())
            }
            LineKind::TableClose
            | LineKind::ColumnIndicationOpen
            | LineKind::ColumnIndicationClose
            | LineKind::DataOpen
            | LineKind::DataClose => {
                self.err_structural(span, format!("`{}` outside a [TABLE] block", line.text))
            }
            LineKind::Blank if line.text.is_empty() => {
                self.attach(Entry::Blank);
                Ok(())
            }
            LineKind::Blank => {
                self.attach(Entry::Text(line.text.to_string()));
                Ok(())
            }
            LineKind::Statement => self.parse_statement(&line, mode),
        }
    }

    fn parse_statement(&mut self, line: &Line<'a>, mode: BodyMode) -> Result<(), FoiError> {
        if mode == BodyMode::Text {
            self.attach(Entry::Text(line.text.to_string()));
            return Ok(());
        }
        match decode_statement(line.text) {
            Ok(Statement::ListHeader { count, layout }) => {
                log::trace!("line {}: list of {count} items", line.number);
                self.stack.push(Frame::List {
                    list: CountedList {
                        count,
                        layout,
                        items: Vec::with_capacity(count.min(1024)),
                    },
                    opened: span_of(line),
                });
            }
            Ok(Statement::KeyValue(kv)) => self.attach(Entry::KeyValue(kv)),
            Ok(Statement::Setting(setting)) => self.attach(Entry::Setting(setting)),
            Err(expected) => return self.err_value_format(span_of(line), expected),
        }
        Ok(())
    }

    fn open_section(&mut self, name: &str, span: SourceSpan) {
        log::debug!("open [{name}]");
        let mode = if self.options.text_sections.iter().any(|s| s == name) {
            BodyMode::Text
        } else {
            BodyMode::Structured
        };
        self.stack.push(Frame::Section {
            section: Section::new(name),
            mode,
            opened: span,
        });
    }

    fn close_section(&mut self, name: &str, span: SourceSpan) -> Result<(), FoiError> {
        let open_name = match self.stack.last() {
            Some(Frame::Section { section, .. }) if self.stack.len() > 1 => &section.name,
            _ => {
                return self.err_structural(
                    span,
                    format!("[END OF {name}] without a matching [{name}]"),
                )
            }
        };
        if open_name != name {
            let message = format!("expected [END OF {open_name}], found [END OF {name}]");
            return self.err_structural(span, message);
        }

        log::debug!("close [{name}]");
        if let Some(frame) = self.stack.pop() {
            self.attach(frame.into_entry());
        }
        Ok(())
    }

    /// Pops every counted list that has received all of its records.
    fn close_complete_lists(&mut self) {
        while self.stack.last().is_some_and(Frame::is_complete_list) {
            if let Some(frame) = self.stack.pop() {
                self.attach(frame.into_entry());
            }
        }
    }

    fn attach(&mut self, entry: Entry) {
        if let Some(frame) = self.stack.last_mut() {
            frame.attach(entry);
        }
    }

    // === Table Sub-Grammar ===

    /// Table ::= "[TABLE]" Columns Data "[END OF TABLE]"
    /// Columns ::= "[COLUMN INDICATION]" { Identifier } "[END OF COLUMN INDICATION]"
    /// Data ::= "[DATA]" { Row } "[END OF DATA]"
    fn parse_table(&mut self, opened: SourceSpan) -> Result<Table, FoiError> {
        self.expect(LineKind::ColumnIndicationOpen, "[COLUMN INDICATION]", opened)?;

        let mut columns = Vec::new();
        let mut column_layouts = Vec::new();
        loop {
            let line = self.require_line("[END OF COLUMN INDICATION]", opened)?;
            match line.kind {
                LineKind::ColumnIndicationClose => break,
                LineKind::Statement if !line.text.trim().contains(char::is_whitespace) => {
                    let (leading, rest) = split_indent(line.text);
                    let name = rest.trim_end();
                    columns.push(name.to_string());
                    column_layouts.push(ColumnLayout {
                        leading: leading.to_string(),
                        trailing: rest[name.len()..].to_string(),
                    });
                }
                LineKind::Statement | LineKind::Blank => {
                    return self.err_value_format(span_of(&line), "a single column name")
                }
                _ => {
                    return self.err_structural(
                        span_of(&line),
                        "expected a column name or [END OF COLUMN INDICATION]",
                    )
                }
            }
        }

        self.expect(LineKind::DataOpen, "[DATA]", opened)?;

        let mut rows = Vec::new();
        loop {
            let line = self.require_line("[END OF DATA]", opened)?;
            match line.kind {
                LineKind::DataClose => break,
                LineKind::Statement | LineKind::Blank => {
                    let (cells, trailing) = split_cells(line.text);
                    if cells.len() != columns.len() {
                        return self.err_column_mismatch(span_of(&line), columns.len(), cells.len());
                    }
                    let mut row = Row::new(Vec::with_capacity(cells.len()));
                    row.layout.trailing = trailing.to_string();
                    for (column, (separator, token)) in columns.iter().zip(cells) {
                        // runs of plain spaces become part of the right-aligned width
                        let (separator, width) = if separator.chars().all(|c| c == ' ') {
                            ("", width_of(separator) + width_of(token))
                        } else {
                            (separator, width_of(token))
                        };
                        row.layout.separators.push(separator.to_string());
                        row.fields.push((column.clone(), decode_token(token, width)));
                    }
                    rows.push(row);
                }
                _ => {
                    return self.err_structural(
                        span_of(&line),
                        "expected a data row or [END OF DATA]",
                    )
                }
            }
        }

        self.expect(LineKind::TableClose, "[END OF TABLE]", opened)?;
        log::debug!("table: {} columns, {} rows", columns.len(), rows.len());
        Ok(Table {
            columns,
            column_layouts,
            rows,
        })
    }

    // === Helper Methods ===

    fn next_line(&mut self) -> Option<Line<'a>> {
        let line = self.lines.next()?;
        self.builder.observe(&line);
        Some(line)
    }

    /// Next line of a table; running out of input is reported at the table marker.
    fn require_line(&mut self, expected: &str, opened: SourceSpan) -> Result<Line<'a>, FoiError> {
        match self.next_line() {
            Some(line) => Ok(line),
            None => self.err_structural(opened, format!("input ended before {expected}")),
        }
    }

    fn expect(
        &mut self,
        kind: LineKind<'a>,
        expected: &str,
        opened: SourceSpan,
    ) -> Result<(), FoiError> {
        let line = self.require_line(expected, opened)?;
        if line.kind == kind {
            Ok(())
        } else {
            self.err_structural(span_of(&line), format!("expected {expected}"))
        }
    }

    fn named_source(&self) -> NamedSource<String> {
        (*self.source).clone()
    }

    fn err_structural<T>(&self, span: SourceSpan, message: impl Into<String>) -> Result<T, FoiError> {
        Err(ParseError::Structural {
            src: self.named_source(),
            span,
            message: message.into(),
        }
        .into())
    }

    fn err_count_mismatch<T>(
        &self,
        span: SourceSpan,
        expected: usize,
        found: usize,
    ) -> Result<T, FoiError> {
        Err(ParseError::CountMismatch {
            src: self.named_source(),
            span,
            expected,
            found,
        }
        .into())
    }

    fn err_value_format<T>(&self, span: SourceSpan, expected: impl Into<String>) -> Result<T, FoiError> {
        Err(ParseError::ValueFormat {
            src: self.named_source(),
            span,
            expected: expected.into(),
        }
        .into())
    }

    fn err_column_mismatch<T>(
        &self,
        span: SourceSpan,
        expected: usize,
        found: usize,
    ) -> Result<T, FoiError> {
        Err(ParseError::ColumnMismatch {
            src: self.named_source(),
            span,
            expected,
            found,
        }
        .into())
    }
}

fn span_of(line: &Line) -> SourceSpan {
    (line.offset, line.text.len()).into()
}
