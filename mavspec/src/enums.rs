//! # Enum schemas
//!
//! Enums are metadata-only: the codec never interprets a field's numeric value against its
//! declared enum, it only carries the association through for downstream tooling.

use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::traits::{Buildable, Builder};

/// Parameter metadata for a `MAV_CMD` enum entry (a `<param>` child of `<entry>`).
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EnumEntryParam {
    /// Parameter index, `1..=7`.
    pub index: u8,
    /// Human-readable label.
    pub label: Option<String>,
    /// Units string, verbatim from XML (e.g. `"m"`, `"deg"`).
    pub units: Option<String>,
    /// Minimum value, verbatim from XML (not parsed against a type — commands vary).
    pub min_value: Option<String>,
    /// Maximum value, verbatim from XML.
    pub max_value: Option<String>,
    /// Parameter description (content of the `<param>` element).
    pub description: String,
}

/// One entry (`<entry>`) of an [`EnumSchema`].
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EnumEntry {
    /// Entry's integer value. 64-bit signed to cover the full range dialects declare, including
    /// enums that use the high bit of a 32-bit value.
    value: i64,
    /// Entry name (expected unique within its enum).
    name: String,
    /// Entry description.
    description: String,
    /// `<param>` children, present on `MAV_CMD` entries.
    params: Vec<EnumEntryParam>,
}

impl Buildable for EnumEntry {
    type Builder = EnumEntryBuilder;

    fn to_builder(&self) -> EnumEntryBuilder {
        EnumEntryBuilder { entry: self.clone() }
    }
}

impl EnumEntry {
    /// Initiates builder.
    pub fn builder() -> EnumEntryBuilder {
        EnumEntryBuilder::default()
    }

    /// Entry's integer value.
    pub fn value(&self) -> i64 {
        self.value
    }

    /// Entry name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entry description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// `<param>` metadata, present on `MAV_CMD` entries.
    pub fn params(&self) -> &[EnumEntryParam] {
        &self.params
    }
}

/// Builder for [`EnumEntry`].
#[derive(Debug, Clone, Default)]
pub struct EnumEntryBuilder {
    entry: EnumEntry,
}

impl Builder for EnumEntryBuilder {
    type Buildable = EnumEntry;

    fn build(&self) -> EnumEntry {
        self.entry.clone()
    }
}

impl EnumEntryBuilder {
    /// Sets entry value.
    pub fn set_value(&mut self, value: i64) -> &mut Self {
        self.entry.value = value;
        self
    }

    /// Sets entry name.
    pub fn set_name(&mut self, name: String) -> &mut Self {
        self.entry.name = name;
        self
    }

    /// Sets entry description.
    pub fn set_description(&mut self, description: String) -> &mut Self {
        self.entry.description = description;
        self
    }

    /// Sets `<param>` metadata.
    pub fn set_params(&mut self, params: Vec<EnumEntryParam>) -> &mut Self {
        self.entry.params = params;
        self
    }
}

/// MAVLink enum schema (`<enum>`).
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EnumSchema {
    name: String,
    description: String,
    bitmask: bool,
    entries: Vec<EnumEntry>,
}

impl Buildable for EnumSchema {
    type Builder = EnumSchemaBuilder;

    fn to_builder(&self) -> EnumSchemaBuilder {
        EnumSchemaBuilder { schema: self.clone() }
    }
}

impl EnumSchema {
    /// Initiates builder.
    pub fn builder() -> EnumSchemaBuilder {
        EnumSchemaBuilder::default()
    }

    /// Enum name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Enum description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// `true` if this enum is declared `bitmask="true"`.
    pub fn bitmask(&self) -> bool {
        self.bitmask
    }

    /// Enum entries, in declaration order.
    pub fn entries(&self) -> &[EnumEntry] {
        &self.entries
    }

    /// Entries keyed by their integer value.
    ///
    /// Used to build the catalog's `commands_by_value` view for `MAV_CMD`.
    pub fn entries_by_value(&self) -> HashMap<i64, &EnumEntry> {
        self.entries.iter().map(|e| (e.value(), e)).collect()
    }
}

/// Builder for [`EnumSchema`].
#[derive(Debug, Clone, Default)]
pub struct EnumSchemaBuilder {
    schema: EnumSchema,
}

impl Builder for EnumSchemaBuilder {
    type Buildable = EnumSchema;

    fn build(&self) -> EnumSchema {
        self.schema.clone()
    }
}

impl EnumSchemaBuilder {
    /// Sets enum name.
    pub fn set_name(&mut self, name: String) -> &mut Self {
        self.schema.name = name;
        self
    }

    /// Sets enum description.
    pub fn set_description(&mut self, description: String) -> &mut Self {
        self.schema.description = description;
        self
    }

    /// Sets bitmask flag.
    pub fn set_bitmask(&mut self, bitmask: bool) -> &mut Self {
        self.schema.bitmask = bitmask;
        self
    }

    /// Sets enum entries.
    pub fn set_entries(&mut self, entries: Vec<EnumEntry>) -> &mut Self {
        self.schema.entries = entries;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_entry_and_schema() {
        let entry = EnumEntry::builder()
            .set_value(3)
            .set_name("MAV_CMD_DO_FOO".to_string())
            .build();
        let schema = EnumSchema::builder()
            .set_name("MAV_CMD".to_string())
            .set_entries(vec![entry])
            .build();

        assert_eq!(schema.entries().len(), 1);
        assert_eq!(schema.entries_by_value().get(&3).unwrap().name(), "MAV_CMD_DO_FOO");
    }
}
