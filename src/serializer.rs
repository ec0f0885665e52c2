use crate::ast::*;
use crate::error::{FoiError, SerializationError};
use crate::validator::validate;

/// How to write scalars that carry no formatting of their own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Used for integer and decimal scalars whose `format` is `None`.
    /// Without it such scalars are an error.
    pub default_format: Option<Format>,
}

/// Writes a [`Document`] back into `.foi` text.
pub struct Serializer<'o> {
    options: &'o SerializeOptions,
    newline: &'static str,
    out: String,
    lines: usize,
    path: Vec<String>,
}

impl<'o> Serializer<'o> {
    pub fn new(options: &'o SerializeOptions) -> Self {
        Self {
            options,
            newline: LineEnding::default().as_str(),
            out: String::new(),
            lines: 0,
            path: Vec::new(),
        }
    }

    pub fn serialize(mut self, document: &Document) -> Result<String, FoiError> {
        validate(document)?;
        self.newline = document.line_ending.as_str();

        for line in &document.header.lines {
            match line {
                HeaderLine::Field {
                    name,
                    separator,
                    value,
                } => self.line(&format!("{name}{separator}{value}")),
                HeaderLine::Text(text) => self.line(text),
                HeaderLine::Blank => self.line(""),
            }
        }
        self.write_entries(&document.body)?;

        if document.final_newline && self.lines > 0 {
            self.out.push_str(self.newline);
        }
        log::debug!("serialized {} lines", self.lines);
        Ok(self.out)
    }

    fn write_entries(&mut self, entries: &[Entry]) -> Result<(), FoiError> {
        for entry in entries {
            self.write_entry(entry)?;
        }
        Ok(())
    }

    fn write_entry(&mut self, entry: &Entry) -> Result<(), FoiError> {
        match entry {
            Entry::KeyValue(kv) => self.write_key_value(kv)?,
            Entry::Setting(setting) => {
                let value = self.scalar(&setting.value, &setting.key)?;
                self.line(&format!("{}{}{}", setting.key, setting.separator, value));
            }
            Entry::CountedList(list) => {
                let layout = &list.layout;
                self.line(&format!(
                    "{}{}{}{}",
                    layout.indent, list.count, layout.separator, layout.label
                ));
                self.write_entries(&list.items)?;
            }
            Entry::Table(table) => self.write_table(table)?,
            Entry::Section(section) => {
                self.line(&format!("[{}]", section.name));
                self.path.push(section.name.clone());
                self.write_entries(&section.entries)?;
                self.path.pop();
                self.line(&format!("[END OF {}]", section.name));
            }
            Entry::Text(text) => self.line(text),
            Entry::Blank => self.line(""),
        }
        Ok(())
    }

    fn write_key_value(&mut self, kv: &KeyValue) -> Result<(), FoiError> {
        let layout = &kv.layout;
        let mut text = format!(
            "{}{}{}{}",
            layout.indent,
            self.scalar(&kv.value, &kv.label)?,
            layout.colon,
            kv.label
        );
        if let Some(secondary) = &kv.flag_or_value {
            text.push_str(&layout.equals);
            text.push_str(&self.scalar(secondary, &kv.label)?);
        }
        text.push_str(&layout.trailing);
        self.line(&text);
        Ok(())
    }

    fn write_table(&mut self, table: &Table) -> Result<(), FoiError> {
        self.line("[TABLE]");
        self.line("[COLUMN INDICATION]");
        for (index, column) in table.columns.iter().enumerate() {
            match table.column_layouts.get(index) {
                Some(layout) => self.line(&format!("{}{column}{}", layout.leading, layout.trailing)),
                None => self.line(column),
            }
        }
        self.line("[END OF COLUMN INDICATION]");
        self.line("[DATA]");
        for row in &table.rows {
            let mut text = String::new();
            for (index, (column, value)) in row.fields.iter().enumerate() {
                let separator = row.layout.separators.get(index).map_or("", String::as_str);
                let cell = self.scalar(value, column)?;
                text.push_str(separator);
                // cells must stay apart even when their width is too small
                if separator.is_empty() && !text.is_empty() && !cell.starts_with(char::is_whitespace) {
                    text.push(' ');
                }
                text.push_str(&cell);
            }
            text.push_str(&row.layout.trailing);
            self.line(&text);
        }
        self.line("[END OF DATA]");
        self.line("[END OF TABLE]");
        Ok(())
    }

    fn scalar(&self, scalar: &Scalar, name: &str) -> Result<String, FoiError> {
        scalar.render(self.options.default_format).ok_or_else(|| {
            let mut path = self.path.join("/");
            path.push('/');
            path.push_str(name);
            SerializationError::MissingFormat { path }.into()
        })
    }

    fn line(&mut self, text: &str) {
        if self.lines > 0 {
            self.out.push_str(self.newline);
        }
        self.out.push_str(text);
        self.lines += 1;
    }
}
