//! # Payload codec (§4.5)
//!
//! Reads and writes a message payload at the byte offsets the schema compiler assigned. Every
//! primitive is little-endian on the wire; `char[N]` is read and written as raw ASCII bytes with
//! no null-trimming.

use std::collections::HashMap;

use mavspec::{FieldSchema, MavType, MessageSchema, Value};

use crate::errors::EncodeError;

/// Decodes every field of `schema` out of `buf`.
///
/// `buf` is expected to already be the zero-padded buffer the scanner prepared (§4.6.3 step 5):
/// `maxPayloadLength` bytes for v2, `baseFieldPayloadLength` for v1. Fields whose byte range falls
/// outside `buf` — extension fields on a v1 frame, or an extension field truncated off a v2
/// frame's declared `len` — decode to their type's zero value, per §4.6 boundary rules.
pub fn decode(schema: &MessageSchema, buf: &[u8], include_extensions: bool) -> HashMap<String, Value> {
    let mut fields = HashMap::with_capacity(schema.ordered_fields().len());
    for field in schema.ordered_fields() {
        if field.extension() && !include_extensions {
            continue;
        }
        fields.insert(field.name().to_string(), read_field(buf, field));
    }
    fields
}

/// Encodes `values` against `schema` into a fresh buffer.
///
/// The buffer is `schema.max_payload_length()` bytes when `include_extensions` is set (v2),
/// `schema.base_field_payload_length()` otherwise (v1) — matching §4.7 step 1. Fields absent from
/// `values` encode as their type's zero value; keys that don't name a declared field are an error.
pub fn encode(
    schema: &MessageSchema,
    values: &HashMap<String, Value>,
    include_extensions: bool,
) -> Result<Vec<u8>, EncodeError> {
    for key in values.keys() {
        if !schema.fields().iter().any(|f| f.name() == key) {
            return Err(EncodeError::UnknownField {
                message: schema.name().to_string(),
                field: key.clone(),
            });
        }
    }

    let len = if include_extensions {
        schema.max_payload_length()
    } else {
        schema.base_field_payload_length()
    };
    let mut buf = vec![0u8; len];

    for field in schema.ordered_fields() {
        if field.extension() && !include_extensions {
            continue;
        }
        match values.get(field.name()) {
            Some(value) => write_field(&mut buf, field, value)?,
            None => {} // buffer is already zeroed — the type's zero value.
        }
    }

    Ok(buf)
}

fn read_field(buf: &[u8], field: &FieldSchema) -> Value {
    let offset = field.offset();
    let len = field.byte_length();
    if offset + len > buf.len() {
        return zero_value(field.r#type());
    }
    read_value(field.r#type(), &buf[offset..offset + len])
}

fn write_field(buf: &mut [u8], field: &FieldSchema, value: &Value) -> Result<(), EncodeError> {
    let bytes = encode_value(field.r#type(), value).ok_or_else(|| EncodeError::TypeMismatch {
        field: field.name().to_string(),
        expected: field.r#type().definition_name(),
        actual: type_name(value),
    })?;

    let offset = field.offset();
    buf[offset..offset + bytes.len()].copy_from_slice(&bytes);
    Ok(())
}

/// The type's zero value: `0`/`0.0` for scalars, an all-zero array of the declared length for
/// arrays, `N` zero bytes for `char[N]`.
pub fn zero_value(t: &MavType) -> Value {
    match t {
        MavType::Int8 => Value::Int8(0),
        MavType::Int16 => Value::Int16(0),
        MavType::Int32 => Value::Int32(0),
        MavType::Int64 => Value::Int64(0),
        MavType::UInt8 => Value::UInt8(0),
        MavType::UInt16 => Value::UInt16(0),
        MavType::UInt32 => Value::UInt32(0),
        MavType::UInt64 => Value::UInt64(0),
        MavType::Float => Value::Float(0.0),
        MavType::Double => Value::Double(0.0),
        MavType::Char => Value::UInt8(0),
        MavType::Array(base, len) => match base.as_ref() {
            MavType::Char => Value::CharArray(vec![0u8; *len]),
            MavType::Int8 => Value::Int8Array(vec![0; *len]),
            MavType::Int16 => Value::Int16Array(vec![0; *len]),
            MavType::Int32 => Value::Int32Array(vec![0; *len]),
            MavType::Int64 => Value::Int64Array(vec![0; *len]),
            MavType::UInt8 => Value::UInt8Array(vec![0; *len]),
            MavType::UInt16 => Value::UInt16Array(vec![0; *len]),
            MavType::UInt32 => Value::UInt32Array(vec![0; *len]),
            MavType::UInt64 => Value::UInt64Array(vec![0; *len]),
            MavType::Float => Value::FloatArray(vec![0.0; *len]),
            MavType::Double => Value::DoubleArray(vec![0.0; *len]),
            MavType::Array(..) => unreachable!("nested arrays are rejected at parse time"),
        },
    }
}

fn read_value(t: &MavType, bytes: &[u8]) -> Value {
    match t {
        MavType::Int8 => Value::Int8(bytes[0] as i8),
        MavType::Int16 => Value::Int16(i16::from_le_bytes(bytes.try_into().unwrap())),
        MavType::Int32 => Value::Int32(i32::from_le_bytes(bytes.try_into().unwrap())),
        MavType::Int64 => Value::Int64(i64::from_le_bytes(bytes.try_into().unwrap())),
        MavType::UInt8 => Value::UInt8(bytes[0]),
        MavType::UInt16 => Value::UInt16(u16::from_le_bytes(bytes.try_into().unwrap())),
        MavType::UInt32 => Value::UInt32(u32::from_le_bytes(bytes.try_into().unwrap())),
        MavType::UInt64 => Value::UInt64(u64::from_le_bytes(bytes.try_into().unwrap())),
        MavType::Float => Value::Float(f32::from_le_bytes(bytes.try_into().unwrap())),
        MavType::Double => Value::Double(f64::from_le_bytes(bytes.try_into().unwrap())),
        MavType::Char => Value::UInt8(bytes[0]),
        MavType::Array(base, len) => read_array(base, *len, bytes),
    }
}

fn read_array(base: &MavType, len: usize, bytes: &[u8]) -> Value {
    let elem_size = base.element_size();
    macro_rules! collect {
        ($read:expr) => {
            (0..len).map(|i| $read(&bytes[i * elem_size..(i + 1) * elem_size])).collect()
        };
    }
    match base {
        MavType::Char => Value::CharArray(bytes[..len].to_vec()),
        MavType::Int8 => Value::Int8Array(collect!(|b: &[u8]| b[0] as i8)),
        MavType::Int16 => Value::Int16Array(collect!(|b: &[u8]| i16::from_le_bytes(b.try_into().unwrap()))),
        MavType::Int32 => Value::Int32Array(collect!(|b: &[u8]| i32::from_le_bytes(b.try_into().unwrap()))),
        MavType::Int64 => Value::Int64Array(collect!(|b: &[u8]| i64::from_le_bytes(b.try_into().unwrap()))),
        MavType::UInt8 => Value::UInt8Array(collect!(|b: &[u8]| b[0])),
        MavType::UInt16 => Value::UInt16Array(collect!(|b: &[u8]| u16::from_le_bytes(b.try_into().unwrap()))),
        MavType::UInt32 => Value::UInt32Array(collect!(|b: &[u8]| u32::from_le_bytes(b.try_into().unwrap()))),
        MavType::UInt64 => Value::UInt64Array(collect!(|b: &[u8]| u64::from_le_bytes(b.try_into().unwrap()))),
        MavType::Float => Value::FloatArray(collect!(|b: &[u8]| f32::from_le_bytes(b.try_into().unwrap()))),
        MavType::Double => Value::DoubleArray(collect!(|b: &[u8]| f64::from_le_bytes(b.try_into().unwrap()))),
        MavType::Array(..) => unreachable!("nested arrays are rejected at parse time"),
    }
}

fn encode_value(t: &MavType, value: &Value) -> Option<Vec<u8>> {
    Some(match (t, value) {
        (MavType::Int8, Value::Int8(v)) => vec![*v as u8],
        (MavType::Int16, Value::Int16(v)) => v.to_le_bytes().to_vec(),
        (MavType::Int32, Value::Int32(v)) => v.to_le_bytes().to_vec(),
        (MavType::Int64, Value::Int64(v)) => v.to_le_bytes().to_vec(),
        (MavType::UInt8, Value::UInt8(v)) => vec![*v],
        (MavType::UInt16, Value::UInt16(v)) => v.to_le_bytes().to_vec(),
        (MavType::UInt32, Value::UInt32(v)) => v.to_le_bytes().to_vec(),
        (MavType::UInt64, Value::UInt64(v)) => v.to_le_bytes().to_vec(),
        (MavType::Float, Value::Float(v)) => v.to_le_bytes().to_vec(),
        (MavType::Double, Value::Double(v)) => v.to_le_bytes().to_vec(),
        (MavType::Char, Value::UInt8(v)) => vec![*v],
        (MavType::Array(base, len), value) => encode_array(base, *len, value)?,
        _ => return None,
    })
}

fn encode_array(base: &MavType, len: usize, value: &Value) -> Option<Vec<u8>> {
    match (base, value) {
        (MavType::Char, Value::CharArray(v)) if v.len() == len => Some(v.clone()),
        (MavType::Int8, Value::Int8Array(v)) if v.len() == len => {
            Some(v.iter().map(|x| *x as u8).collect())
        }
        (MavType::Int16, Value::Int16Array(v)) if v.len() == len => {
            Some(v.iter().flat_map(|x| x.to_le_bytes()).collect())
        }
        (MavType::Int32, Value::Int32Array(v)) if v.len() == len => {
            Some(v.iter().flat_map(|x| x.to_le_bytes()).collect())
        }
        (MavType::Int64, Value::Int64Array(v)) if v.len() == len => {
            Some(v.iter().flat_map(|x| x.to_le_bytes()).collect())
        }
        (MavType::UInt8, Value::UInt8Array(v)) if v.len() == len => Some(v.clone()),
        (MavType::UInt16, Value::UInt16Array(v)) if v.len() == len => {
            Some(v.iter().flat_map(|x| x.to_le_bytes()).collect())
        }
        (MavType::UInt32, Value::UInt32Array(v)) if v.len() == len => {
            Some(v.iter().flat_map(|x| x.to_le_bytes()).collect())
        }
        (MavType::UInt64, Value::UInt64Array(v)) if v.len() == len => {
            Some(v.iter().flat_map(|x| x.to_le_bytes()).collect())
        }
        (MavType::Float, Value::FloatArray(v)) if v.len() == len => {
            Some(v.iter().flat_map(|x| x.to_le_bytes()).collect())
        }
        (MavType::Double, Value::DoubleArray(v)) if v.len() == len => {
            Some(v.iter().flat_map(|x| x.to_le_bytes()).collect())
        }
        _ => None,
    }
}

fn type_name(value: &Value) -> String {
    value.mav_type().definition_name()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mavspec::resolver::MapResolver;
    use mavspec::Catalog;
    use std::sync::Mutex;

    // Catalog is process-global; serialize tests that touch it.
    static TEST_LOCK: Mutex<()> = Mutex::new(());

    const ATTITUDE_XML: &str = r#"<mavlink>
        <messages>
            <message id="30" name="ATTITUDE">
                <field type="uint32_t" name="time_boot_ms"></field>
                <field type="float" name="roll"></field>
                <extensions/>
                <field type="char[4]" name="label"></field>
            </message>
        </messages>
    </mavlink>"#;

    fn schema() -> MessageSchema {
        let _guard = TEST_LOCK.lock().unwrap();
        let resolver = MapResolver::new().with("test", ATTITUDE_XML);
        Catalog::initialize("test", &resolver, &[]).unwrap();
        Catalog::message(30).unwrap()
    }

    #[test]
    fn decode_reads_base_and_extension_fields() {
        let schema = schema();
        let mut buf = vec![0u8; 12];
        buf[0..4].copy_from_slice(&42u32.to_le_bytes());
        buf[4..8].copy_from_slice(&1.5f32.to_le_bytes());
        buf[8..12].copy_from_slice(b"abcd");

        let fields = decode(&schema, &buf, true);
        assert_eq!(fields["time_boot_ms"], Value::UInt32(42));
        assert_eq!(fields["roll"], Value::Float(1.5));
        assert_eq!(fields["label"], Value::CharArray(b"abcd".to_vec()));
    }

    #[test]
    fn decode_zero_fills_extension_fields_outside_the_buffer() {
        let schema = schema();
        let buf = vec![0u8; 8]; // v1-style: base fields only, extension offset is out of range.

        let fields = decode(&schema, &buf, false);
        assert!(!fields.contains_key("label"));

        let fields = decode(&schema, &buf, true);
        assert_eq!(fields["label"], Value::CharArray(vec![0, 0, 0, 0]));
    }

    #[test]
    fn encode_rejects_unknown_field_names() {
        let schema = schema();
        let mut values = HashMap::new();
        values.insert("bogus".to_string(), Value::UInt8(1));

        let err = encode(&schema, &values, true).unwrap_err();
        assert!(matches!(err, EncodeError::UnknownField { .. }));
    }

    #[test]
    fn encode_round_trips_with_decode() {
        let schema = schema();
        let mut values = HashMap::new();
        values.insert("time_boot_ms".to_string(), Value::UInt32(12345678));
        values.insert("roll".to_string(), Value::Float(1.5));
        values.insert("label".to_string(), Value::CharArray(b"mav0".to_vec()));

        let buf = encode(&schema, &values, true).unwrap();
        let decoded = decode(&schema, &buf, true);
        assert_eq!(decoded["time_boot_ms"], Value::UInt32(12345678));
        assert_eq!(decoded["roll"], Value::Float(1.5));
        assert_eq!(decoded["label"], Value::CharArray(b"mav0".to_vec()));
    }
}
