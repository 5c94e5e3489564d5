//! Event-driven XML parsing for dialect documents.

mod parser;

pub(crate) use parser::parse_document;
