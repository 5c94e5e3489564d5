//! # Message schemas
//!
//! [`FieldSchema`] mirrors a single declared `<field>`; [`MessageSchema`] mirrors a `<message>`.
//! Both carry their raw, declaration-order data plus a set of values only the schema compiler
//! (see [`crate::compiler`]) fills in: field byte offsets, payload lengths and `CRC_EXTRA`.
//! Until compiled, those derived values read as zero — callers only ever see compiled schemas,
//! since [`crate::Catalog::initialize`] is the sole path that constructs one.

use std::sync::atomic::{AtomicBool, Ordering};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use mavspec_types::MavType;

use crate::traits::{Buildable, Builder};
use crate::MessageId;

/// A single declared field of a [`MessageSchema`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldSchema {
    name: String,
    description: String,
    r#type: MavType,
    r#enum: Option<String>,
    units: Option<String>,
    extension: bool,
    /// Byte offset within the message payload. Assigned by the schema compiler; `0` until then.
    offset: usize,
}

impl Buildable for FieldSchema {
    type Builder = FieldSchemaBuilder;

    fn to_builder(&self) -> FieldSchemaBuilder {
        FieldSchemaBuilder { field: self.clone() }
    }
}

impl Default for FieldSchema {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            r#type: MavType::UInt8,
            r#enum: None,
            units: None,
            extension: false,
            offset: 0,
        }
    }
}

impl FieldSchema {
    /// Initiates builder.
    pub fn builder() -> FieldSchemaBuilder {
        FieldSchemaBuilder::default()
    }

    /// Field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Field's declared wire type.
    pub fn r#type(&self) -> &MavType {
        &self.r#type
    }

    /// Name of the enum this field's values are drawn from, if declared.
    pub fn r#enum(&self) -> Option<&str> {
        self.r#enum.as_deref()
    }

    /// Units string, verbatim from XML.
    pub fn units(&self) -> Option<&str> {
        self.units.as_deref()
    }

    /// `true` if this field was declared after the message's `<extensions/>` marker.
    pub fn extension(&self) -> bool {
        self.extension
    }

    /// Byte size of a single element (1, 2, 4 or 8).
    pub fn element_size(&self) -> usize {
        self.r#type.base_type().size()
    }

    /// Number of array elements, or `0` for a scalar field.
    pub fn array_length(&self) -> usize {
        match &self.r#type {
            MavType::Array(_, len) => *len,
            _ => 0,
        }
    }

    /// Total byte length of this field on the wire (`element_size * max(array_length, 1)`).
    pub fn byte_length(&self) -> usize {
        self.r#type.size()
    }

    /// Byte offset within the payload. Only meaningful once compiled by the catalog.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub(crate) fn set_offset(&mut self, offset: usize) {
        self.offset = offset;
    }
}

/// Builder for [`FieldSchema`].
#[derive(Debug, Clone, Default)]
pub struct FieldSchemaBuilder {
    field: FieldSchema,
}

impl Builder for FieldSchemaBuilder {
    type Buildable = FieldSchema;

    fn build(&self) -> FieldSchema {
        self.field.clone()
    }
}

impl FieldSchemaBuilder {
    /// Sets field name.
    pub fn set_name(&mut self, name: String) -> &mut Self {
        self.field.name = name;
        self
    }

    /// Sets field description.
    pub fn set_description(&mut self, description: String) -> &mut Self {
        self.field.description = description;
        self
    }

    /// Sets field's declared wire type.
    pub fn set_type(&mut self, r#type: MavType) -> &mut Self {
        self.field.r#type = r#type;
        self
    }

    /// Sets enum name.
    pub fn set_enum(&mut self, r#enum: Option<String>) -> &mut Self {
        self.field.r#enum = r#enum;
        self
    }

    /// Sets units string.
    pub fn set_units(&mut self, units: Option<String>) -> &mut Self {
        self.field.units = units;
        self
    }

    /// Sets extension flag.
    pub fn set_extension(&mut self, extension: bool) -> &mut Self {
        self.field.extension = extension;
        self
    }
}

/// MAVLink message schema (`<message>`), resolved field layout and `CRC_EXTRA` included.
///
/// `ordered_fields`, `base_field_payload_length`, `max_payload_length` and `crc_extra` are
/// zero-valued on a freshly built schema — they only become meaningful once the schema has
/// passed through the compiler.
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MessageSchema {
    id: MessageId,
    name: String,
    description: String,
    fields: Vec<FieldSchema>,
    wip: bool,
    deprecated_since: Option<(u16, u8)>,

    ordered_fields: Vec<FieldSchema>,
    base_field_payload_length: usize,
    max_payload_length: usize,
    crc_extra: u8,

    // Toggled by Catalog::include_messages/exclude_messages on a schema sitting behind a
    // `static RwLock`, so this needs Sync; Cell<bool> isn't.
    #[cfg_attr(feature = "serde", serde(skip, default = "default_included"))]
    included: AtomicBool,
}

fn default_included() -> AtomicBool {
    AtomicBool::new(true)
}

impl Default for MessageSchema {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            description: String::new(),
            fields: Vec::new(),
            wip: false,
            deprecated_since: None,
            ordered_fields: Vec::new(),
            base_field_payload_length: 0,
            max_payload_length: 0,
            crc_extra: 0,
            included: default_included(),
        }
    }
}

impl Clone for MessageSchema {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            fields: self.fields.clone(),
            wip: self.wip,
            deprecated_since: self.deprecated_since,
            ordered_fields: self.ordered_fields.clone(),
            base_field_payload_length: self.base_field_payload_length,
            max_payload_length: self.max_payload_length,
            crc_extra: self.crc_extra,
            included: AtomicBool::new(self.included.load(Ordering::Relaxed)),
        }
    }
}

impl Buildable for MessageSchema {
    type Builder = MessageSchemaBuilder;

    fn to_builder(&self) -> MessageSchemaBuilder {
        MessageSchemaBuilder { message: self.clone() }
    }
}

impl MessageSchema {
    /// Initiates builder.
    pub fn builder() -> MessageSchemaBuilder {
        MessageSchemaBuilder::default()
    }

    /// Unique 24-bit wire message id.
    pub fn id(&self) -> MessageId {
        self.id
    }

    /// Message name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Message description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Fields in declaration order, as they appeared in the dialect XML.
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    /// Work-in-progress status.
    pub fn wip(&self) -> bool {
        self.wip
    }

    /// `(year, month)` this message was deprecated, if any.
    pub fn deprecated_since(&self) -> Option<(u16, u8)> {
        self.deprecated_since
    }

    /// Index of the first extension field, if this message has one.
    pub fn extension_fields_idx(&self) -> Option<usize> {
        self.fields.iter().position(|f| f.extension())
    }

    /// Fields in wire order: non-extension fields sorted by descending element byte size
    /// (stable with respect to declaration order on ties), followed by extension fields in
    /// declaration order. Populated by the schema compiler.
    pub fn ordered_fields(&self) -> &[FieldSchema] {
        &self.ordered_fields
    }

    /// Sum of the byte lengths of non-extension fields. Populated by the schema compiler.
    pub fn base_field_payload_length(&self) -> usize {
        self.base_field_payload_length
    }

    /// Sum of the byte lengths of all fields, extension fields included. Populated by the
    /// schema compiler.
    pub fn max_payload_length(&self) -> usize {
        self.max_payload_length
    }

    /// `CRC_EXTRA` byte, derived from the curated field type/name string. Populated by the
    /// schema compiler.
    pub fn crc_extra(&self) -> u8 {
        self.crc_extra
    }

    /// Whether this message currently participates in decode/encode.
    ///
    /// Controlled by [`crate::Catalog::include_messages`] / [`crate::Catalog::exclude_messages`].
    pub fn included(&self) -> bool {
        self.included.load(Ordering::Relaxed)
    }

    pub(crate) fn set_included(&self, included: bool) {
        self.included.store(included, Ordering::Relaxed);
    }

    pub(crate) fn set_compiled(
        &mut self,
        ordered_fields: Vec<FieldSchema>,
        base_field_payload_length: usize,
        max_payload_length: usize,
        crc_extra: u8,
    ) {
        self.ordered_fields = ordered_fields;
        self.base_field_payload_length = base_field_payload_length;
        self.max_payload_length = max_payload_length;
        self.crc_extra = crc_extra;
    }
}

/// Builder for [`MessageSchema`].
#[derive(Debug, Clone, Default)]
pub struct MessageSchemaBuilder {
    message: MessageSchema,
}

impl Builder for MessageSchemaBuilder {
    type Buildable = MessageSchema;

    fn build(&self) -> MessageSchema {
        self.message.clone()
    }
}

impl MessageSchemaBuilder {
    /// Sets message id.
    pub fn set_id(&mut self, id: MessageId) -> &mut Self {
        self.message.id = id;
        self
    }

    /// Sets message name.
    pub fn set_name(&mut self, name: String) -> &mut Self {
        self.message.name = name;
        self
    }

    /// Sets message description.
    pub fn set_description(&mut self, description: String) -> &mut Self {
        self.message.description = description;
        self
    }

    /// Sets declared fields, in declaration order.
    pub fn set_fields(&mut self, fields: Vec<FieldSchema>) -> &mut Self {
        self.message.fields = fields;
        self
    }

    /// Sets work-in-progress status.
    pub fn set_wip(&mut self, wip: bool) -> &mut Self {
        self.message.wip = wip;
        self
    }

    /// Sets deprecation `(year, month)`.
    pub fn set_deprecated_since(&mut self, deprecated_since: Option<(u16, u8)>) -> &mut Self {
        self.message.deprecated_since = deprecated_since;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, t: MavType, extension: bool) -> FieldSchema {
        FieldSchema::builder()
            .set_name(name.to_string())
            .set_type(t)
            .set_extension(extension)
            .build()
    }

    #[test]
    fn extension_fields_idx_finds_first_extension() {
        let message = MessageSchema::builder()
            .set_fields(vec![
                field("a", MavType::UInt8, false),
                field("b", MavType::UInt16, true),
                field("c", MavType::UInt32, true),
            ])
            .build();

        assert_eq!(message.extension_fields_idx(), Some(1));
    }

    #[test]
    fn included_defaults_true_and_is_independently_mutable_on_clone() {
        let message = MessageSchema::builder().build();
        assert!(message.included());

        let clone = message.clone();
        clone.set_included(false);
        assert!(message.included());
        assert!(!clone.included());
    }
}
