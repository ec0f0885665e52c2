use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum FoiError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parser(#[from] ParseError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Serialization(#[from] SerializationError),

    #[error("I/O error on {path}: {message}")]
    #[diagnostic(code(foi::io))]
    Io { path: String, message: String },
}

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum ParseError {
    #[error("Unbalanced block markers: {message}")]
    #[diagnostic(
        code(parser::structural),
        help("Every [NAME] must be closed by [END OF NAME], innermost block first.")
    )]
    Structural {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: SourceSpan,
        message: String,
    },

    #[error("Declared {expected} items, but found {found}")]
    #[diagnostic(
        code(parser::count_mismatch),
        help("The number in `N = number of items` must equal the records that follow it.")
    )]
    CountMismatch {
        #[source_code]
        src: NamedSource<String>,
        #[label("list declared here")]
        span: SourceSpan,
        expected: usize,
        found: usize,
    },

    #[error("Malformed statement: expected {expected}")]
    #[diagnostic(
        code(parser::value_format),
        help("Statements in a data section look like `<value> : <label>` or `Name=Value`.")
    )]
    ValueFormat {
        #[source_code]
        src: NamedSource<String>,
        #[label("this line")]
        span: SourceSpan,
        expected: String,
    },

    #[error("Row has {found} fields, but the table declares {expected} columns")]
    #[diagnostic(
        code(parser::column_mismatch),
        help("Each line in [DATA] needs one value per entry of [COLUMN INDICATION].")
    )]
    ColumnMismatch {
        #[source_code]
        src: NamedSource<String>,
        #[label("this row")]
        span: SourceSpan,
        expected: usize,
        found: usize,
    },
}

/// Invariant violations in a document that was built or edited in code.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum ValidationError {
    #[error("List in [{section}] declares {declared} items but holds {actual}")]
    #[diagnostic(code(validation::count_mismatch))]
    CountMismatch {
        section: String,
        declared: usize,
        actual: usize,
    },

    #[error("Row {row} of the table in [{section}] has {found} fields, expected {expected}")]
    #[diagnostic(code(validation::column_mismatch))]
    ColumnMismatch {
        section: String,
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Row {row} of the table in [{section}] names column `{found}` where `{expected}` belongs")]
    #[diagnostic(code(validation::column_order))]
    ColumnOrder {
        section: String,
        row: usize,
        expected: String,
        found: String,
    },

    #[error("List in [{section}] holds an item that cannot be read back as a record")]
    #[diagnostic(
        code(validation::invalid_list_item),
        help("List records are key-value lines, settings, sections or nested lists.")
    )]
    InvalidListItem { section: String },

    #[error("Table in [{section}] has padding that is not plain whitespace")]
    #[diagnostic(
        code(validation::invalid_padding),
        help("Column and row padding may hold spaces and tabs, but no line breaks or text.")
    )]
    InvalidPadding { section: String },

    #[error("Block name `{name}` cannot be written as a marker")]
    #[diagnostic(
        code(validation::invalid_name),
        help("Names must be non-empty and must not contain brackets or line breaks.")
    )]
    InvalidName { name: String },
}

#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum SerializationError {
    #[error("Numeric value at {path} has no width/precision")]
    #[diagnostic(
        code(serializer::missing_format),
        help("Give the scalar a Format, or set SerializeOptions::default_format.")
    )]
    MissingFormat { path: String },
}
