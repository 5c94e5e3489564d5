//! # Raw dialect bundles
//!
//! A [`Dialect`] is the uncompiled result of parsing one XML document: its own declared messages
//! and enums, plus whichever dialects it transitively includes. The [`crate::loader`] produces
//! these; the [`crate::compiler`] flattens a root dialect and its includes into a [`crate::Catalog`].

use std::collections::HashMap;

use crate::enums::EnumSchema;
use crate::message::MessageSchema;
use crate::MessageId;

/// Uncompiled dialect: the direct result of parsing a single `<mavlink>` XML document.
#[derive(Debug, Clone, Default)]
pub struct Dialect {
    name: String,
    version: Option<u32>,
    dialect: Option<u32>,
    messages: HashMap<MessageId, MessageSchema>,
    enums: HashMap<String, EnumSchema>,
    /// Names of `<include>`d dialects, in declaration order.
    includes: Vec<String>,
}

impl Dialect {
    /// Creates a dialect from its parsed parts.
    pub fn new(
        name: String,
        version: Option<u32>,
        dialect: Option<u32>,
        messages: HashMap<MessageId, MessageSchema>,
        enums: HashMap<String, EnumSchema>,
        includes: Vec<String>,
    ) -> Self {
        Self {
            name,
            version,
            dialect,
            messages,
            enums,
            includes,
        }
    }

    /// Dialect name — the file name of its XML definition, without extension.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `<version>` element content, if declared.
    pub fn version(&self) -> Option<u32> {
        self.version
    }

    /// `<dialect>` element content, if declared.
    pub fn dialect(&self) -> Option<u32> {
        self.dialect
    }

    /// Messages declared directly in this document (not its includes).
    pub fn messages(&self) -> &HashMap<MessageId, MessageSchema> {
        &self.messages
    }

    /// Enums declared directly in this document (not its includes).
    pub fn enums(&self) -> &HashMap<String, EnumSchema> {
        &self.enums
    }

    /// Names of dialects this one directly includes.
    pub fn includes(&self) -> &[String] {
        &self.includes
    }
}
