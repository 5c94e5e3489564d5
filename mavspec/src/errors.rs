//! # Dialect loading, compiling, and catalog errors

use thiserror::Error;

pub use mavspec_types::TypeParseError;

/// Errors raised while resolving a dialect's XML source.
#[derive(Debug, Error)]
pub enum ResolverError {
    /// No dialect by this name could be found.
    #[error("dialect not found: {0}")]
    NotFound(String),
    /// The resolver's underlying I/O failed.
    #[error("I/O error resolving dialect {0:?}: {1}")]
    Io(String, #[source] std::io::Error),
}

/// Errors raised while parsing a single XML document.
#[derive(Debug, Error)]
pub enum XmlParseError {
    /// Underlying `quick-xml` error.
    #[error("XML syntax error: {0}")]
    Xml(#[from] quick_xml::Error),
    /// An attribute value could not be decoded as UTF-8.
    #[error("invalid attribute encoding: {0}")]
    Encoding(#[from] std::str::Utf8Error),
    /// A `<message>` is missing its required `id` or `name` attribute.
    #[error("message is missing required attribute {0:?}")]
    MissingMessageAttribute(&'static str),
    /// A `<field>` is missing its required `type` or `name` attribute.
    #[error("field is missing required attribute {0:?}")]
    MissingFieldAttribute(&'static str),
    /// An `<enum>` is missing its required `name` attribute.
    #[error("enum is missing required name attribute")]
    MissingEnumName,
    /// An `<entry>` is missing its required `name` or `value` attribute.
    #[error("enum entry is missing required attribute {0:?}")]
    MissingEntryAttribute(&'static str),
    /// Numeric attribute (`id`, `value`, `index`, ...) failed to parse.
    #[error("invalid integer in attribute {0:?}: {1}")]
    InvalidInteger(&'static str, std::num::ParseIntError),
    /// A field's declared type string could not be parsed.
    #[error(transparent)]
    BadType(#[from] TypeParseError),
    /// Root element was not `<mavlink>`.
    #[error("root element is not <mavlink>")]
    NotAMavlinkDocument,
    /// A `<deprecated since="...">` attribute was not a `YYYY-MM` pair.
    #[error("invalid `since` attribute on <deprecated>: {0:?}")]
    InvalidDeprecatedSince(String),
}

/// Errors raised while loading a dialect and its transitive includes.
#[derive(Debug, Error)]
pub enum DialectLoadError {
    /// Resolving one of the XML sources failed.
    #[error(transparent)]
    Resolver(#[from] ResolverError),
    /// Parsing one of the XML sources failed.
    #[error("failed to parse dialect {0:?}: {1}")]
    Parse(String, #[source] XmlParseError),
}

/// Errors raised while compiling a raw dialect bundle into the [`crate::Catalog`].
#[derive(Debug, Error)]
pub enum CompileError {
    /// Two messages (possibly from different included dialects) declare the same `id`.
    #[error("duplicate message id {id}: {first:?} and {second:?}")]
    DuplicateMessageId {
        /// Colliding message id.
        id: u32,
        /// Name of the message already registered under `id`.
        first: String,
        /// Name of the message that collided with it.
        second: String,
    },
    /// A field's declared type string could not be resolved.
    #[error(transparent)]
    BadType(#[from] TypeParseError),
}

/// Errors raised while loading and compiling a root dialect in one step.
#[derive(Debug, Error)]
pub enum InitError {
    /// See [`DialectLoadError`].
    #[error(transparent)]
    Load(#[from] DialectLoadError),
    /// See [`CompileError`].
    #[error(transparent)]
    Compile(#[from] CompileError),
}

/// Raised by [`crate::Catalog::include_messages`] / [`crate::Catalog::exclude_messages`] when
/// asked about a message id the catalog does not know.
#[derive(Debug, Clone, Copy, Error)]
#[error("unknown message id: {0}")]
pub struct UnknownMessageId(pub u32);

/// Raised when a codec call is made before [`crate::Catalog::initialize`].
#[derive(Debug, Clone, Copy, Error)]
#[error("catalog has not been initialized")]
pub struct NotInitialized;
