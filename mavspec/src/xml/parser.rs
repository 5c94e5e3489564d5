//! Single-document XML parser: turns one `<mavlink>` document into a [`Dialect`].
//!
//! Recursive `<include>` resolution happens one layer up, in [`crate::loader`] — this module
//! only ever sees one document's bytes and returns the include file names it declared.

use std::collections::HashMap;

use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::reader::Reader;

use crate::dialect::Dialect;
use crate::enums::{EnumEntry, EnumEntryParam, EnumSchema};
use crate::errors::XmlParseError;
use crate::message::{FieldSchema, MessageSchema};
use crate::traits::Builder;
use crate::MessageId;

fn attr_str(tag: &BytesStart, key: &str) -> Result<Option<String>, XmlParseError> {
    for attr in tag.attributes() {
        let attr = attr.map_err(|e| XmlParseError::Xml(e.into()))?;
        if attr.key.as_ref() == key.as_bytes() {
            return Ok(Some(std::str::from_utf8(&attr.value)?.to_string()));
        }
    }
    Ok(None)
}

fn parse_u32(attr: &'static str, value: &str) -> Result<u32, XmlParseError> {
    value
        .parse::<u32>()
        .map_err(|e| XmlParseError::InvalidInteger(attr, e))
}

fn parse_i64(attr: &'static str, value: &str) -> Result<i64, XmlParseError> {
    // `<entry value="...">` accepts hex (`0x...`) and decimal literals in real-world dialects.
    let trimmed = value.trim();
    let parsed = if let Some(hex) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16)
    } else {
        trimmed.parse::<i64>()
    };
    parsed.map_err(|e| XmlParseError::InvalidInteger(attr, e))
}

#[derive(Default)]
struct RawParam {
    index: String,
    label: Option<String>,
    units: Option<String>,
    min_value: Option<String>,
    max_value: Option<String>,
    description: String,
}

#[derive(Default)]
struct RawEntry {
    value: String,
    name: String,
    description: String,
    params: Vec<RawParam>,
}

#[derive(Default)]
struct RawEnum {
    name: String,
    description: String,
    bitmask: bool,
    entries: Vec<RawEntry>,
}

#[derive(Default)]
struct RawField {
    name: String,
    description: String,
    r#type: String,
    r#enum: Option<String>,
    units: Option<String>,
    extension: bool,
}

#[derive(Default)]
struct RawMessage {
    id: String,
    name: String,
    description: String,
    fields: Vec<RawField>,
    in_extension_section: bool,
    wip: bool,
    deprecated_since: Option<(u16, u8)>,
}

/// Parses a `<deprecated since="YYYY-MM" ...>` tag's `since` attribute into `(year, month)`.
fn parse_deprecated_since(since: &str) -> Result<(u16, u8), XmlParseError> {
    let (year, month) = since
        .split_once('-')
        .ok_or(XmlParseError::InvalidDeprecatedSince(since.to_string()))?;
    let year = year
        .parse::<u16>()
        .map_err(|_| XmlParseError::InvalidDeprecatedSince(since.to_string()))?;
    let month = month
        .parse::<u8>()
        .map_err(|_| XmlParseError::InvalidDeprecatedSince(since.to_string()))?;
    Ok((year, month))
}

/// One open element whose content is still being accumulated.
enum Ctx {
    Include(String),
    Version(String),
    Dialect(String),
    Enum(RawEnum),
    Entry(RawEntry),
    Param(RawParam),
    Message(RawMessage),
    Field(RawField),
    /// A bare `<description>` element; text goes to whichever context is below it on the stack.
    Description(String),
    /// A `<deprecated since="YYYY-MM">` element, parsed and applied to the context below it.
    Deprecated(Option<(u16, u8)>),
    Other,
}

/// Parses one `<mavlink>` document into a [`Dialect`]. `name` becomes the dialect's identity.
pub(crate) fn parse_document(name: &str, xml: &str) -> Result<Dialect, XmlParseError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut stack: Vec<Ctx> = Vec::new();
    let mut saw_root = false;

    let mut includes: Vec<String> = Vec::new();
    let mut version: Option<u32> = None;
    let mut dialect_id: Option<u32> = None;
    let mut messages: HashMap<MessageId, MessageSchema> = HashMap::new();
    let mut enums: HashMap<String, EnumSchema> = HashMap::new();

    let mut buf = Vec::new();
    loop {
        let event = reader.read_event_into(&mut buf)?;
        match event {
            Event::Eof => break,
            Event::Start(tag) => {
                let tag_name = std::str::from_utf8(tag.name().as_ref())?.to_string();
                match tag_name.as_str() {
                    "mavlink" => saw_root = true,
                    "include" => stack.push(Ctx::Include(String::new())),
                    "version" => stack.push(Ctx::Version(String::new())),
                    "dialect" => stack.push(Ctx::Dialect(String::new())),
                    "enums" | "messages" => stack.push(Ctx::Other),
                    "enum" => {
                        let name = attr_str(&tag, "name")?.ok_or(XmlParseError::MissingEnumName)?;
                        let description = attr_str(&tag, "description")?.unwrap_or_default();
                        let bitmask = attr_str(&tag, "bitmask")?.as_deref() == Some("true");
                        stack.push(Ctx::Enum(RawEnum {
                            name,
                            description,
                            bitmask,
                            entries: Vec::new(),
                        }));
                    }
                    "entry" => {
                        let value = attr_str(&tag, "value")?
                            .ok_or(XmlParseError::MissingEntryAttribute("value"))?;
                        let name = attr_str(&tag, "name")?
                            .ok_or(XmlParseError::MissingEntryAttribute("name"))?;
                        let description = attr_str(&tag, "description")?.unwrap_or_default();
                        stack.push(Ctx::Entry(RawEntry {
                            value,
                            name,
                            description,
                            params: Vec::new(),
                        }));
                    }
                    "param" => {
                        let index = attr_str(&tag, "index")?.unwrap_or_default();
                        stack.push(Ctx::Param(RawParam {
                            index,
                            label: attr_str(&tag, "label")?,
                            units: attr_str(&tag, "units")?,
                            min_value: attr_str(&tag, "minValue")?,
                            max_value: attr_str(&tag, "maxValue")?,
                            description: String::new(),
                        }));
                    }
                    "message" => {
                        let id = attr_str(&tag, "id")?
                            .ok_or(XmlParseError::MissingMessageAttribute("id"))?;
                        let name = attr_str(&tag, "name")?
                            .ok_or(XmlParseError::MissingMessageAttribute("name"))?;
                        let description = attr_str(&tag, "description")?.unwrap_or_default();
                        stack.push(Ctx::Message(RawMessage {
                            id,
                            name,
                            description,
                            fields: Vec::new(),
                            in_extension_section: false,
                            wip: false,
                            deprecated_since: None,
                        }));
                    }
                    "field" => {
                        let r#type = attr_str(&tag, "type")?
                            .ok_or(XmlParseError::MissingFieldAttribute("type"))?;
                        let name = attr_str(&tag, "name")?
                            .ok_or(XmlParseError::MissingFieldAttribute("name"))?;
                        let extension = matches!(
                            stack.last(),
                            Some(Ctx::Message(m)) if m.in_extension_section
                        );
                        stack.push(Ctx::Field(RawField {
                            name,
                            description: String::new(),
                            r#type,
                            r#enum: attr_str(&tag, "enum")?,
                            units: attr_str(&tag, "units")?,
                            extension,
                        }));
                    }
                    "description" => stack.push(Ctx::Description(String::new())),
                    "deprecated" => {
                        let since = attr_str(&tag, "since")?
                            .map(|s| parse_deprecated_since(&s))
                            .transpose()?;
                        stack.push(Ctx::Deprecated(since));
                    }
                    _ => stack.push(Ctx::Other),
                }
            }
            Event::Empty(tag) => {
                let tag_name = std::str::from_utf8(tag.name().as_ref())?.to_string();
                match tag_name.as_str() {
                    "extensions" => {
                        if let Some(Ctx::Message(m)) = stack.last_mut() {
                            m.in_extension_section = true;
                        }
                    }
                    "wip" => match stack.last_mut() {
                        Some(Ctx::Message(m)) => m.wip = true,
                        _ => {}
                    },
                    "deprecated" => {
                        let since = attr_str(&tag, "since")?
                            .map(|s| parse_deprecated_since(&s))
                            .transpose()?;
                        if let Some(Ctx::Message(m)) = stack.last_mut() {
                            m.deprecated_since = since;
                        }
                    }
                    _ => {}
                }
            }
            Event::Text(text) => {
                let text = decode_text(&text)?;
                if text.trim().is_empty() {
                    continue;
                }
                match stack.last_mut() {
                    Some(Ctx::Include(s)) => *s = text,
                    Some(Ctx::Version(s)) => *s = text,
                    Some(Ctx::Dialect(s)) => *s = text,
                    Some(Ctx::Description(s)) => *s = text,
                    Some(Ctx::Field(f)) => f.description = text,
                    Some(Ctx::Param(p)) => p.description = text,
                    _ => {}
                }
            }
            Event::End(_) => {
                let closed = stack.pop().unwrap_or(Ctx::Other);
                match closed {
                    Ctx::Include(value) => includes.push(value),
                    Ctx::Version(value) => version = Some(parse_u32("version", &value)?),
                    Ctx::Dialect(value) => dialect_id = Some(parse_u32("dialect", &value)?),
                    Ctx::Description(text) => match stack.last_mut() {
                        Some(Ctx::Enum(e)) => e.description = text,
                        Some(Ctx::Entry(e)) => e.description = text,
                        Some(Ctx::Message(m)) => m.description = text,
                        _ => {}
                    },
                    Ctx::Deprecated(since) => {
                        if let Some(Ctx::Message(m)) = stack.last_mut() {
                            m.deprecated_since = since;
                        }
                    }
                    Ctx::Param(param) => {
                        if let Some(Ctx::Entry(entry)) = stack.last_mut() {
                            entry.params.push(param);
                        }
                    }
                    Ctx::Entry(entry) => {
                        if let Some(Ctx::Enum(e)) = stack.last_mut() {
                            e.entries.push(entry);
                        }
                    }
                    Ctx::Enum(raw) => {
                        let schema = finish_enum(raw)?;
                        enums.insert(schema.name().to_string(), schema);
                    }
                    Ctx::Field(field) => {
                        if let Some(Ctx::Message(m)) = stack.last_mut() {
                            m.fields.push(field);
                        }
                    }
                    Ctx::Message(raw) => {
                        let (id, schema) = finish_message(raw)?;
                        messages.insert(id, schema);
                    }
                    Ctx::Other => {}
                }
            }
            _ => {}
        }
        buf.clear();
    }

    if !saw_root {
        return Err(XmlParseError::NotAMavlinkDocument);
    }

    Ok(Dialect::new(name.to_string(), version, dialect_id, messages, enums, includes))
}

fn decode_text(text: &BytesText) -> Result<String, XmlParseError> {
    Ok(text.unescape()?.into_owned())
}

fn finish_enum(raw: RawEnum) -> Result<EnumSchema, XmlParseError> {
    let mut entries = Vec::with_capacity(raw.entries.len());
    for entry in raw.entries {
        let value = parse_i64("value", &entry.value)?;
        let mut params = Vec::with_capacity(entry.params.len());
        for p in entry.params {
            let index = p
                .index
                .parse::<u8>()
                .map_err(|e| XmlParseError::InvalidInteger("index", e))?;
            params.push(EnumEntryParam {
                index,
                label: p.label,
                units: p.units,
                min_value: p.min_value,
                max_value: p.max_value,
                description: p.description,
            });
        }
        entries.push(
            EnumEntry::builder()
                .set_value(value)
                .set_name(entry.name)
                .set_description(entry.description)
                .set_params(params)
                .build(),
        );
    }

    Ok(EnumSchema::builder()
        .set_name(raw.name)
        .set_description(raw.description)
        .set_bitmask(raw.bitmask)
        .set_entries(entries)
        .build())
}

fn finish_message(raw: RawMessage) -> Result<(MessageId, MessageSchema), XmlParseError> {
    let id = parse_u32("id", &raw.id)?;
    let mut fields = Vec::with_capacity(raw.fields.len());
    for f in raw.fields {
        let r#type = mavspec_types::MavType::parse(&f.r#type)?;
        fields.push(
            FieldSchema::builder()
                .set_name(f.name)
                .set_description(f.description)
                .set_type(r#type)
                .set_enum(f.r#enum)
                .set_units(f.units)
                .set_extension(f.extension)
                .build(),
        );
    }

    let schema = MessageSchema::builder()
        .set_id(id)
        .set_name(raw.name)
        .set_description(raw.description)
        .set_fields(fields)
        .set_wip(raw.wip)
        .set_deprecated_since(raw.deprecated_since)
        .build();

    Ok((id, schema))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_closing_deprecated_tag_sets_deprecated_since() {
        let dialect = parse_document(
            "test",
            r#"<mavlink><messages><message id="0" name="OLD">
                <deprecated since="2015-06" replaced_by="NEW"/>
                <field type="uint8_t" name="x"></field>
            </message></messages></mavlink>"#,
        )
        .unwrap();

        let schema = dialect.messages().get(&0).unwrap();
        assert_eq!(schema.deprecated_since(), Some((2015, 6)));
    }

    #[test]
    fn open_close_deprecated_tag_sets_deprecated_since() {
        let dialect = parse_document(
            "test",
            r#"<mavlink><messages><message id="0" name="OLD">
                <deprecated since="2020-01"></deprecated>
                <field type="uint8_t" name="x"></field>
            </message></messages></mavlink>"#,
        )
        .unwrap();

        let schema = dialect.messages().get(&0).unwrap();
        assert_eq!(schema.deprecated_since(), Some((2020, 1)));
    }

    #[test]
    fn message_without_deprecated_tag_has_none() {
        let dialect = parse_document(
            "test",
            r#"<mavlink><messages><message id="0" name="FRESH">
                <field type="uint8_t" name="x"></field>
            </message></messages></mavlink>"#,
        )
        .unwrap();

        let schema = dialect.messages().get(&0).unwrap();
        assert_eq!(schema.deprecated_since(), None);
    }

    #[test]
    fn malformed_since_attribute_is_rejected() {
        let err = parse_document(
            "test",
            r#"<mavlink><messages><message id="0" name="OLD">
                <deprecated since="not-a-date"/>
                <field type="uint8_t" name="x"></field>
            </message></messages></mavlink>"#,
        )
        .unwrap_err();

        assert!(matches!(err, XmlParseError::InvalidDeprecatedSince(_)));
    }
}
