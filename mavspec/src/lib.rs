//! **mavspec** loads MAVLink dialect XML
//! [definitions](https://mavlink.io/en/guide/xml_schema.html) and compiles them into a
//! runtime catalog of message and enum schemas: field layout, byte offsets and `CRC_EXTRA` are
//! all derived here rather than generated into source code.
//!
//! Dialect XML is resolved, loaded, and compiled independently of any particular transport —
//! see [`resolver`] for how a caller supplies dialect sources.
//!
//! # Features
//!
//! * `serde` — add [Serde](https://serde.rs) support to schema types.

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod catalog;
mod compiler;
mod dialect;
mod enums;
mod loader;
mod message;
mod xml;

/// Error types for dialect resolution, XML parsing, compilation and catalog access.
pub mod errors;
/// Dialect XML source resolution (filesystem, in-memory, or custom).
pub mod resolver;
/// Builder-pattern traits used throughout the schema types.
pub mod traits;

pub use catalog::Catalog;
pub use dialect::Dialect;
pub use enums::{EnumEntry, EnumEntryParam, EnumSchema};
pub use message::{FieldSchema, MessageSchema};

pub use mavspec_types::consts::{MESSAGE_ID_V1_MAX, MESSAGE_ID_V2_MAX, PAYLOAD_MAX_SIZE};
pub use mavspec_types::{MavLinkVersion, MavType, Value};

/// Type of a MAVLink message id (24 bits on the wire, stored as `u32`).
pub type MessageId = mavspec_types::MessageId;
