//! # MAVLink frame
//!
//! A decoded frame, or one built from a schema and a field map and ready for [`Frame::to_bytes`].

use std::collections::HashMap;
use std::time::SystemTime;

use mavspec::{MavLinkVersion, MessageId, MessageSchema, Value};

use crate::consts::CHECKSUM_SIZE;
use crate::errors::EncodeError;
use crate::header::Header;
use crate::payload;
use crate::signature::Signature;
use crate::{crc, Checksum};

/// Header fields a caller supplies when encoding a frame. Payload-derived fields
/// (`payload_length`, `message_id`) come from the schema and field map instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderFields {
    /// Packet sequence number.
    pub sequence: u8,
    /// Sending system id.
    pub system_id: u8,
    /// Sending component id.
    pub component_id: u8,
    /// `MAVLink 2`-only incompatibility flags. Ignored when encoding a `MAVLink 1` frame.
    pub incompat_flags: u8,
    /// `MAVLink 2`-only compatibility flags. Ignored when encoding a `MAVLink 1` frame.
    pub compat_flags: u8,
}

/// A MAVLink frame, decoded off the wire or built from a schema and field map.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    header: Header,
    payload: Vec<u8>,
    checksum: Checksum,
    signature: Option<Signature>,
    fields: HashMap<String, Value>,
    timestamp: SystemTime,
}

impl Frame {
    /// Generic MAVLink header. See [`Header`].
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Protocol version this frame was decoded as / will be encoded as.
    pub fn version(&self) -> MavLinkVersion {
        self.header.version()
    }

    /// On-wire payload bytes, possibly shorter than the schema's `max_payload_length` (v2
    /// trailing-zero truncation).
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// On-wire payload length.
    pub fn payload_length(&self) -> u8 {
        self.header.payload_length()
    }

    /// Packet sequence number.
    pub fn sequence(&self) -> u8 {
        self.header.sequence()
    }

    /// Sending system id.
    pub fn system_id(&self) -> u8 {
        self.header.system_id()
    }

    /// Sending component id.
    pub fn component_id(&self) -> u8 {
        self.header.component_id()
    }

    /// Message id this frame carries.
    pub fn message_id(&self) -> MessageId {
        self.header.message_id()
    }

    /// `CRC-16/MCRF4XX` checksum over `[header without STX][payload][crcExtra]`, little-endian on
    /// the wire.
    ///
    /// See [MAVLink's checksum definition](https://mavlink.io/en/guide/serialization.html#checksum).
    pub fn checksum(&self) -> Checksum {
        self.checksum
    }

    /// Trailing 13-byte signature, present only on a signed `MAVLink 2` frame. Carried verbatim —
    /// this crate performs no cryptographic validation.
    pub fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }

    /// Decoded field values, keyed by field name.
    pub fn fields(&self) -> &HashMap<String, Value> {
        &self.fields
    }

    /// A single decoded field by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Wall-clock time this `Frame` value was constructed, not when the bytes hit the wire.
    pub fn timestamp(&self) -> SystemTime {
        self.timestamp
    }

    /// Assembles a [`Frame`] decoded off the wire. Only [`crate::scanner`] constructs frames this
    /// way; callers that want to send a message use [`Frame::encode`] instead.
    pub(crate) fn from_decoded(
        header: Header,
        payload: Vec<u8>,
        checksum: Checksum,
        signature: Option<Signature>,
        fields: HashMap<String, Value>,
    ) -> Self {
        Self {
            header,
            payload,
            checksum,
            signature,
            fields,
            timestamp: SystemTime::now(),
        }
    }

    /// Builds a frame for `schema` from a field-name-keyed value map (§4.7).
    ///
    /// Encodes the payload into a buffer sized `schema.base_field_payload_length()` (v1) or
    /// `schema.max_payload_length()` (v2), trims trailing zero bytes on v2 only, composes the
    /// header, and computes the checksum. Never emits a signature — callers that need message
    /// signing append their own 13 bytes and set `MAVLINK_IFLAG_SIGNED` via `header_fields`.
    pub fn encode(
        schema: &MessageSchema,
        version: MavLinkVersion,
        header_fields: HeaderFields,
        fields: HashMap<String, Value>,
    ) -> Result<Self, EncodeError> {
        let include_extensions = matches!(version, MavLinkVersion::V2);
        let mut payload_bytes = payload::encode(schema, &fields, include_extensions)?;
        if include_extensions {
            trim_trailing_zeros(&mut payload_bytes);
        }

        let header = match version {
            MavLinkVersion::V1 => Header::v1(
                payload_bytes.len() as u8,
                header_fields.sequence,
                header_fields.system_id,
                header_fields.component_id,
                schema.id(),
            ),
            MavLinkVersion::V2 => Header::v2(
                payload_bytes.len() as u8,
                header_fields.incompat_flags,
                header_fields.compat_flags,
                header_fields.sequence,
                header_fields.system_id,
                header_fields.component_id,
                schema.id(),
            ),
        };

        let checksum = calculate_crc(&header, &payload_bytes, schema.crc_extra());

        Ok(Self {
            header,
            payload: payload_bytes,
            checksum,
            signature: None,
            fields,
            timestamp: SystemTime::now(),
        })
    }

    /// Serializes this frame to its wire bytes: header, payload, little-endian checksum, and the
    /// signature if one is set.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = self.header.encode();
        bytes.extend_from_slice(&self.payload);
        bytes.extend_from_slice(&self.checksum.to_le_bytes());
        if let Some(signature) = self.signature {
            bytes.extend_from_slice(&signature.to_bytes());
        }
        bytes
    }
}

/// `crc.calculate(header_without_stx || payload)`, then folded with `schema.crc_extra()` — the
/// digest §4.6.3 step 7 and §4.7 step 3 both specify.
pub(crate) fn calculate_crc(header: &Header, payload: &[u8], crc_extra: u8) -> Checksum {
    let mut data = header.crc_data();
    data.extend_from_slice(payload);
    data.push(crc_extra);
    crc::calculate(&data)
}

fn trim_trailing_zeros(payload: &mut Vec<u8>) {
    while payload.last() == Some(&0) {
        payload.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mavspec::resolver::MapResolver;
    use mavspec::Catalog;
    use std::sync::Mutex;

    static TEST_LOCK: Mutex<()> = Mutex::new(());

    const ATTITUDE_XML: &str = r#"<mavlink>
        <messages>
            <message id="30" name="ATTITUDE">
                <field type="uint32_t" name="time_boot_ms"></field>
                <field type="float" name="roll"></field>
                <field type="float" name="pitch"></field>
            </message>
        </messages>
    </mavlink>"#;

    fn attitude_schema() -> MessageSchema {
        let _guard = TEST_LOCK.lock().unwrap();
        let resolver = MapResolver::new().with("test", ATTITUDE_XML);
        Catalog::initialize("test", &resolver, &[]).unwrap();
        Catalog::message(30).unwrap()
    }

    fn fields() -> HashMap<String, Value> {
        let mut fields = HashMap::new();
        fields.insert("time_boot_ms".to_string(), Value::UInt32(12345678));
        fields.insert("roll".to_string(), Value::Float(1.5));
        fields.insert("pitch".to_string(), Value::Float(-0.5));
        fields
    }

    #[test]
    fn v2_encode_trims_trailing_zero_payload_bytes() {
        let schema = attitude_schema();
        let mut values = fields();
        values.insert("pitch".to_string(), Value::Float(0.0));

        let frame = Frame::encode(&schema, MavLinkVersion::V2, HeaderFields::default(), values).unwrap();
        // pitch (the last field by wire order) encodes to 4 zero bytes and gets trimmed.
        assert_eq!(frame.payload().len(), 8);
        assert_eq!(frame.payload_length(), 8);
    }

    #[test]
    fn v1_encode_never_trims() {
        let schema = attitude_schema();
        let mut values = fields();
        values.insert("pitch".to_string(), Value::Float(0.0));

        let frame = Frame::encode(&schema, MavLinkVersion::V1, HeaderFields::default(), values).unwrap();
        assert_eq!(frame.payload().len(), schema.base_field_payload_length());
    }

    #[test]
    fn to_bytes_appends_checksum_and_no_signature_by_default() {
        let schema = attitude_schema();
        let frame = Frame::encode(&schema, MavLinkVersion::V2, HeaderFields::default(), fields()).unwrap();

        let bytes = frame.to_bytes();
        assert_eq!(bytes.len(), frame.header().size() + frame.payload().len() + CHECKSUM_SIZE);
        assert_eq!(&bytes[bytes.len() - CHECKSUM_SIZE..], &frame.checksum().to_le_bytes());
    }
}
