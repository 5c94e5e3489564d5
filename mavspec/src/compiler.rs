//! # Schema compiler
//!
//! Flattens a loaded dialect bundle into the catalog's message/enum maps: resolves field
//! ordering and byte offsets, derives `CRC_EXTRA`, and rejects colliding message ids.

use std::collections::HashMap;

use mavspec_types::MavType;

use crate::dialect::Dialect;
use crate::enums::EnumSchema;
use crate::errors::CompileError;
use crate::message::{FieldSchema, MessageSchema};
use crate::MessageId;

/// Compiled catalog contents: every message and enum reachable from the root dialect.
#[derive(Debug)]
pub(crate) struct Compiled {
    pub(crate) messages: HashMap<MessageId, MessageSchema>,
    pub(crate) enums: HashMap<String, EnumSchema>,
}

/// Compiles a root dialect and its transitive includes (already loaded into `bundle`, keyed by
/// dialect name) into a flat, field-ordered, `CRC_EXTRA`-annotated catalog.
pub(crate) fn compile(root: &str, bundle: &HashMap<String, Dialect>) -> Result<Compiled, CompileError> {
    let mut messages: HashMap<MessageId, MessageSchema> = HashMap::new();
    let mut enums: HashMap<String, EnumSchema> = HashMap::new();

    let mut visited = std::collections::HashSet::new();
    let mut order = Vec::new();
    topological_collect(root, bundle, &mut visited, &mut order);

    for dialect_name in order {
        let Some(dialect) = bundle.get(&dialect_name) else { continue };

        for enum_schema in dialect.enums().values() {
            enums
                .entry(enum_schema.name().to_string())
                .or_insert_with(|| enum_schema.clone());
        }

        for (id, raw_message) in dialect.messages() {
            let compiled = compile_message(raw_message)?;

            if let Some(existing) = messages.get(id) {
                return Err(CompileError::DuplicateMessageId {
                    id: *id,
                    first: existing.name().to_string(),
                    second: compiled.name().to_string(),
                });
            }

            messages.insert(*id, compiled);
        }
    }

    Ok(Compiled { messages, enums })
}

/// Visits `root` and its includes depth-first, recording each dialect once, includes before the
/// dialect that references them. This fixes a deterministic processing order for the enum merge
/// above; it does not grant later dialects priority over earlier ones — any message id declared
/// in more than one dialect in the bundle is rejected as [`CompileError::DuplicateMessageId`]
/// regardless of include order.
fn topological_collect(
    name: &str,
    bundle: &HashMap<String, Dialect>,
    visited: &mut std::collections::HashSet<String>,
    order: &mut Vec<String>,
) {
    if !visited.insert(name.to_string()) {
        return;
    }
    if let Some(dialect) = bundle.get(name) {
        for include in dialect.includes() {
            topological_collect(include.trim_end_matches(".xml"), bundle, visited, order);
        }
    }
    order.push(name.to_string());
}

fn compile_message(raw: &MessageSchema) -> Result<MessageSchema, CompileError> {
    let mut message = raw.clone();

    let ordered = reorder_fields(message.fields());
    let base_field_payload_length: usize = ordered
        .iter()
        .filter(|f| !f.extension())
        .map(FieldSchema::byte_length)
        .sum();
    let max_payload_length: usize = ordered.iter().map(FieldSchema::byte_length).sum();

    let mut offset = 0usize;
    let mut with_offsets = Vec::with_capacity(ordered.len());
    for mut field in ordered {
        field.set_offset(offset);
        offset += field.byte_length();
        with_offsets.push(field);
    }

    let crc_extra = crc_extra(message.name(), &with_offsets);

    message.set_compiled(with_offsets, base_field_payload_length, max_payload_length, crc_extra);
    Ok(message)
}

/// Non-extension fields sorted by descending element byte size, stable on ties; extension fields
/// keep declaration order and stay after every base field.
fn reorder_fields(fields: &[FieldSchema]) -> Vec<FieldSchema> {
    let split_at = fields.iter().position(FieldSchema::extension).unwrap_or(fields.len());
    let (base, extended) = fields.split_at(split_at);

    let mut base = base.to_vec();
    base.sort_by(|a, b| b.element_size().cmp(&a.element_size()));

    base.into_iter().chain(extended.iter().cloned()).collect()
}

/// Derives `CRC_EXTRA` per the message's curated name/type/field-name byte string.
fn crc_extra(message_name: &str, ordered_fields: &[FieldSchema]) -> u8 {
    let mut buf = Vec::new();
    buf.extend_from_slice(message_name.as_bytes());
    buf.push(b' ');

    for field in ordered_fields.iter().filter(|f| !f.extension()) {
        buf.extend_from_slice(curated_type_name(field.r#type()).as_bytes());
        buf.push(b' ');
        buf.extend_from_slice(field.name().as_bytes());
        buf.push(b' ');
        if let Some(len) = array_length(field.r#type()) {
            buf.push(len as u8);
        }
    }

    let crc = mavlib_crc16(&buf);
    ((crc & 0xFF) ^ (crc >> 8)) as u8
}

fn array_length(t: &MavType) -> Option<usize> {
    match t {
        MavType::Array(_, len) => Some(*len),
        _ => None,
    }
}

/// CRC_EXTRA's curated type name: the primitive portion with any `[N]` stripped, and the literal
/// suffix `_mavlink_version` removed when the field has no array brackets. `uint8_t_mavlink_version`
/// therefore curates the same as `uint8_t` — that is how HEARTBEAT's `mavlink_version` field keeps
/// its `CRC_EXTRA` stable across dialect revisions that add or rename the suffix.
fn curated_type_name(t: &MavType) -> String {
    t.base_type().c_type().to_string()
}

/// Minimal standalone CRC-16/MCRF4XX, used only to derive `CRC_EXTRA` at compile time. The
/// runtime frame checksum lives in `mavlib_core`; duplicating the tiny accumulate loop here avoids
/// a dependency from the schema compiler onto the frame codec crate.
fn mavlib_crc16(data: &[u8]) -> u16 {
    let mut crc: u16 = 0xFFFF;
    for &byte in data {
        let mut tmp = byte ^ (crc as u8);
        tmp ^= tmp << 4;
        crc = (crc >> 8) ^ ((tmp as u16) << 8) ^ ((tmp as u16) << 3) ^ ((tmp as u16) >> 4);
    }
    crc
}
