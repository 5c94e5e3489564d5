//! End-to-end scenarios and quantified properties (S5, S6, and properties #2/#5/#6/#7).

use std::collections::HashMap;
use std::sync::Mutex;

use mavspec::resolver::MapResolver;
use mavspec::{Catalog, MavLinkVersion, Value};
use mavlib_core::{DecodeError, Frame, HeaderFields};

// The catalog is process-wide; serialize every test in this binary that touches it.
static TEST_LOCK: Mutex<()> = Mutex::new(());

const DIALECT_XML: &str = r#"<mavlink>
    <messages>
        <message id="30" name="ATTITUDE">
            <field type="uint32_t" name="time_boot_ms"></field>
            <field type="float" name="roll"></field>
            <field type="float" name="pitch"></field>
            <field type="float" name="yaw"></field>
            <field type="float" name="rollspeed"></field>
            <field type="float" name="pitchspeed"></field>
            <field type="float" name="yawspeed"></field>
        </message>
        <message id="0" name="HEARTBEAT">
            <field type="uint32_t" name="custom_mode"></field>
            <field type="uint8_t" name="type"></field>
            <field type="uint8_t" name="autopilot"></field>
            <field type="uint8_t" name="base_mode"></field>
            <field type="uint8_t" name="system_status"></field>
            <field type="uint8_t_mavlink_version" name="mavlink_version"></field>
        </message>
        <message id="100" name="ORDERING_TEST">
            <field type="uint8_t" name="a"></field>
            <field type="uint32_t" name="b"></field>
            <field type="uint16_t" name="c"></field>
            <extensions/>
            <field type="uint8_t" name="ext1"></field>
            <field type="uint32_t" name="ext2"></field>
        </message>
    </messages>
</mavlink>"#;

fn init_catalog() -> std::sync::MutexGuard<'static, ()> {
    let guard = TEST_LOCK.lock().unwrap();
    let resolver = MapResolver::new().with("test", DIALECT_XML);
    Catalog::initialize("test", &resolver, &[]).unwrap();
    guard
}

#[test]
fn s5_attitude_round_trips_within_tolerance() {
    let _guard = init_catalog();
    let schema = Catalog::message(30).unwrap();

    let mut values = HashMap::new();
    values.insert("time_boot_ms".to_string(), Value::UInt32(12345678));
    values.insert("roll".to_string(), Value::Float(1.5));
    values.insert("pitch".to_string(), Value::Float(-0.5));
    values.insert("yaw".to_string(), Value::Float(2.0));
    values.insert("rollspeed".to_string(), Value::Float(0.1));
    values.insert("pitchspeed".to_string(), Value::Float(-0.1));
    values.insert("yawspeed".to_string(), Value::Float(0.05));

    let frame =
        Frame::encode(&schema, MavLinkVersion::V2, HeaderFields::default(), values.clone()).unwrap();
    let bytes = frame.to_bytes();

    let scanned = mavlib_core::try_parse(&bytes).unwrap();
    assert_eq!(scanned.consumed, bytes.len());

    for (name, expected) in &values {
        let Value::Float(expected) = expected else { unreachable!() };
        let Value::Float(actual) = scanned.frame.field(name).unwrap() else { panic!("not a float") };
        assert!((actual - expected).abs() < 1e-4, "{name}: {actual} vs {expected}");
    }
}

#[test]
fn property_encode_decode_round_trip_modulo_trailing_zero_truncation() {
    let _guard = init_catalog();
    let schema = Catalog::message(0).unwrap();

    let mut values = HashMap::new();
    values.insert("custom_mode".to_string(), Value::UInt32(42));
    values.insert("type".to_string(), Value::UInt8(8));
    values.insert("autopilot".to_string(), Value::UInt8(3));
    values.insert("base_mode".to_string(), Value::UInt8(0));
    values.insert("system_status".to_string(), Value::UInt8(0));
    values.insert("mavlink_version".to_string(), Value::UInt8(3));

    let frame =
        Frame::encode(&schema, MavLinkVersion::V2, HeaderFields::default(), values.clone()).unwrap();
    let bytes = frame.to_bytes();
    let scanned = mavlib_core::try_parse(&bytes).unwrap();

    for (name, expected) in &values {
        assert_eq!(scanned.frame.field(name), Some(expected));
    }
}

#[test]
fn property_ordering_is_descending_size_then_extension_declaration_order() {
    let _guard = init_catalog();
    let schema = Catalog::message(100).unwrap();

    let names: Vec<&str> = schema.ordered_fields().iter().map(|f| f.name()).collect();
    assert_eq!(names, vec!["b", "c", "a", "ext1", "ext2"]);

    let total: usize = schema.ordered_fields().iter().map(|f| f.byte_length()).sum();
    assert_eq!(total, schema.max_payload_length());
    assert_eq!(schema.base_field_payload_length(), 4 + 2 + 1);
}

#[test]
fn property_truncated_v2_extension_fields_decode_to_zero() {
    let _guard = init_catalog();
    let schema = Catalog::message(100).unwrap();

    // Declare only the base fields plus ext1 on the wire; ext2 (4 bytes) falls entirely outside.
    let mut values = HashMap::new();
    values.insert("a".to_string(), Value::UInt8(9));
    values.insert("b".to_string(), Value::UInt32(100));
    values.insert("c".to_string(), Value::UInt16(7));
    values.insert("ext1".to_string(), Value::UInt8(1));

    let full = mavlib_core::payload::encode(&schema, &values, true).unwrap();
    let truncated_len = schema.base_field_payload_length() + 1; // base fields + ext1 only
    let wire_payload = &full[..truncated_len];

    let header = mavlib_core::Header::v2(truncated_len as u8, 0, 0, 0, 1, 1, schema.id());
    let mut digest = header.crc_data();
    digest.extend_from_slice(wire_payload);
    digest.push(schema.crc_extra());
    let checksum = mavlib_core::crc::calculate(&digest);

    let mut bytes = header.encode();
    bytes.extend_from_slice(wire_payload);
    bytes.extend_from_slice(&checksum.to_le_bytes());

    let scanned = mavlib_core::try_parse(&bytes).unwrap();
    assert_eq!(scanned.frame.field("ext1"), Some(&Value::UInt8(1)));
    assert_eq!(scanned.frame.field("ext2"), Some(&Value::UInt32(0)));
}

#[test]
fn property_filtering_excludes_and_includes_messages() {
    let _guard = init_catalog();
    Catalog::exclude_messages(&[0]).unwrap(); // excluding HEARTBEAT is a silent no-op
    Catalog::exclude_messages(&[30]).unwrap();

    let schema = Catalog::message(0).unwrap();
    let mut values = HashMap::new();
    values.insert("custom_mode".to_string(), Value::UInt32(0));
    values.insert("type".to_string(), Value::UInt8(0));
    values.insert("autopilot".to_string(), Value::UInt8(0));
    values.insert("base_mode".to_string(), Value::UInt8(0));
    values.insert("system_status".to_string(), Value::UInt8(0));
    values.insert("mavlink_version".to_string(), Value::UInt8(3));
    let heartbeat_bytes =
        Frame::encode(&schema, MavLinkVersion::V2, HeaderFields::default(), values).unwrap().to_bytes();
    assert!(mavlib_core::try_parse(&heartbeat_bytes).is_ok());

    let attitude_schema = Catalog::message(30).unwrap();
    let attitude_bytes = Frame::encode(
        &attitude_schema,
        MavLinkVersion::V2,
        HeaderFields::default(),
        HashMap::new(),
    )
    .unwrap()
    .to_bytes();
    let err = mavlib_core::try_parse(&attitude_bytes).unwrap_err();
    assert!(matches!(err, DecodeError::MessageExcluded(30)));

    Catalog::include_messages(&[]).unwrap();
    assert!(mavlib_core::try_parse(&attitude_bytes).is_ok());
}

#[test]
fn s6_resync_skips_junk_before_a_valid_frame() {
    let _guard = init_catalog();
    let schema = Catalog::message(0).unwrap();

    let mut values = HashMap::new();
    values.insert("custom_mode".to_string(), Value::UInt32(0));
    values.insert("type".to_string(), Value::UInt8(8));
    values.insert("autopilot".to_string(), Value::UInt8(0));
    values.insert("base_mode".to_string(), Value::UInt8(0));
    values.insert("system_status".to_string(), Value::UInt8(0));
    values.insert("mavlink_version".to_string(), Value::UInt8(3));

    let frame = Frame::encode(&schema, MavLinkVersion::V2, HeaderFields::default(), values).unwrap();
    let frame_bytes = frame.to_bytes();

    let mut bytes = vec![0xAA, 0xFE, 0x01, 0xFD, 0x00, 0xBB];
    let junk_len = bytes.len();
    bytes.extend_from_slice(&frame_bytes);

    let scanned = mavlib_core::try_parse(&bytes).unwrap();
    assert_eq!(scanned.consumed, junk_len + frame_bytes.len());
}
