use crate::ast::Document;
use crate::error::FoiError;
use crate::parser::{ParseOptions, Parser};
use crate::serialization::{document_to_value, Value};
use crate::serializer::{SerializeOptions, Serializer};
use std::fs;
use std::path::Path;

impl Document {
    /// A layout-free view of the document: header fields, and per section
    /// the decoded values keyed by label.
    #[must_use]
    pub fn to_value(&self) -> Value {
        document_to_value(self)
    }

    /// Renders [`Document::to_value`] as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns a `serde_json::Error` if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.to_value())
    }

    /// Renders [`Document::to_value`] as YAML.
    ///
    /// # Errors
    /// Returns a `serde_yaml::Error` if serialization fails.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self.to_value())
    }
}

/// Parses `.foi` text into a [`Document`].
///
/// This is the primary entry point. Parsing is all-or-nothing: either the
/// whole text is understood, or an error describes the first problem.
///
/// # Errors
///
/// Returns a `FoiError::Parser` for unbalanced markers, list counts that
/// disagree with their records, malformed statements, or table rows with
/// the wrong number of fields.
pub fn parse(source: &str) -> Result<Document, FoiError> {
    parse_named(source, "input.foi")
}

/// Like [`parse`], with `file_name` shown in diagnostics.
///
/// # Errors
///
/// See [`parse`].
pub fn parse_named(source: &str, file_name: &str) -> Result<Document, FoiError> {
    parse_with(source, file_name, &ParseOptions::default())
}

/// Like [`parse_named`], with explicit parse options.
///
/// # Errors
///
/// See [`parse`].
pub fn parse_with(
    source: &str,
    file_name: &str,
    options: &ParseOptions,
) -> Result<Document, FoiError> {
    Parser::with_options(source, file_name.to_string(), options.clone()).parse_document()
}

/// Writes a [`Document`] back to text.
///
/// # Errors
///
/// Returns a `FoiError::Validation` if the document breaks a structural
/// invariant, or a `FoiError::Serialization` if a number has no format.
pub fn serialize(document: &Document) -> Result<String, FoiError> {
    serialize_with(document, &SerializeOptions::default())
}

/// Like [`serialize`], with a fallback format for unformatted numbers.
///
/// # Errors
///
/// See [`serialize`].
pub fn serialize_with(document: &Document, options: &SerializeOptions) -> Result<String, FoiError> {
    Serializer::new(options).serialize(document)
}

/// Reads and parses a `.foi` file.
///
/// # Errors
///
/// Returns `FoiError::Io` if the file cannot be read, otherwise see [`parse`].
pub fn read_document(path: impl AsRef<Path>) -> Result<Document, FoiError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    log::info!("read {} ({} bytes)", path.display(), source.len());
    parse_named(&source, &path.to_string_lossy())
}

/// Serializes a document and writes it to `path`.
///
/// # Errors
///
/// Returns `FoiError::Io` if the file cannot be written, otherwise see [`serialize`].
pub fn write_document(document: &Document, path: impl AsRef<Path>) -> Result<(), FoiError> {
    let path = path.as_ref();
    let text = serialize(document)?;
    fs::write(path, text).map_err(|e| io_error(path, e))
}

fn io_error(path: &Path, err: std::io::Error) -> FoiError {
    FoiError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}
