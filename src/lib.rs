pub mod api;
pub mod ast;
pub mod builder;
pub mod decoder;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod serializer;
pub mod utils;
pub mod validator;
mod serialization;

pub use api::{parse, parse_named, parse_with, read_document, serialize, serialize_with, write_document};
pub use ast::Document;
pub use error::FoiError;
pub use parser::ParseOptions;
pub use serialization::Value;
pub use serializer::SerializeOptions;
