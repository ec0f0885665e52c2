use crate::ast::{CountedList, Document, Entry, Section, Table};
use crate::error::ValidationError;

/// Block names the lexer reserves for the table sub-grammar.
const RESERVED_NAMES: [&str; 3] = ["TABLE", "COLUMN INDICATION", "DATA"];

/// Checks the structural invariants of a document before it is written.
///
/// A parsed document always passes; these checks catch documents that were
/// assembled or edited in code: list counts that disagree with their
/// records, table rows that disagree with their columns, and names that
/// would not survive a trip through the lexer.
pub fn validate(document: &Document) -> Result<(), ValidationError> {
    validate_entries(&document.body, "")
}

fn validate_entries(entries: &[Entry], section: &str) -> Result<(), ValidationError> {
    for entry in entries {
        match entry {
            Entry::Section(s) => validate_section(s)?,
            Entry::CountedList(list) => validate_list(list, section)?,
            Entry::Table(table) => validate_table(table, section)?,
            Entry::KeyValue(_) | Entry::Setting(_) | Entry::Text(_) | Entry::Blank => {}
        }
    }
    Ok(())
}

fn validate_section(section: &Section) -> Result<(), ValidationError> {
    let name = &section.name;
    let reserved = RESERVED_NAMES.contains(&name.as_str()) || name.starts_with("END OF ");
    if name.is_empty() || reserved || name.contains(['[', ']', '\n', '\r']) {
        return Err(ValidationError::InvalidName { name: name.clone() });
    }
    validate_entries(&section.entries, name)
}

fn validate_list(list: &CountedList, section: &str) -> Result<(), ValidationError> {
    if list.count != list.items.len() {
        return Err(ValidationError::CountMismatch {
            section: section.to_string(),
            declared: list.count,
            actual: list.items.len(),
        });
    }
    for item in &list.items {
        match item {
            Entry::KeyValue(_) | Entry::Setting(_) => {}
            Entry::Section(s) => validate_section(s)?,
            Entry::CountedList(nested) => validate_list(nested, section)?,
            Entry::Table(_) | Entry::Text(_) | Entry::Blank => {
                return Err(ValidationError::InvalidListItem {
                    section: section.to_string(),
                })
            }
        }
    }
    Ok(())
}

fn validate_table(table: &Table, section: &str) -> Result<(), ValidationError> {
    for column in &table.columns {
        if column.is_empty() || column.contains(char::is_whitespace) {
            return Err(ValidationError::InvalidName {
                name: column.clone(),
            });
        }
    }
    let column_padding = table
        .column_layouts
        .iter()
        .flat_map(|layout| [&layout.leading, &layout.trailing]);
    let row_padding = table
        .rows
        .iter()
        .flat_map(|row| row.layout.separators.iter().chain([&row.layout.trailing]));
    if !column_padding.chain(row_padding).all(|pad| is_padding(pad)) {
        return Err(ValidationError::InvalidPadding {
            section: section.to_string(),
        });
    }

    for (index, row) in table.rows.iter().enumerate() {
        if row.len() != table.columns.len() {
            return Err(ValidationError::ColumnMismatch {
                section: section.to_string(),
                row: index,
                expected: table.columns.len(),
                found: row.len(),
            });
        }
        for ((name, _), column) in row.fields.iter().zip(&table.columns) {
            if name != column {
                return Err(ValidationError::ColumnOrder {
                    section: section.to_string(),
                    row: index,
                    expected: column.clone(),
                    found: name.clone(),
                });
            }
        }
    }
    Ok(())
}

fn is_padding(text: &str) -> bool {
    text.chars().all(|c| c.is_whitespace() && c != '\n' && c != '\r')
}
