//! # Frame scanner/parser (§4.6)
//!
//! Scans raw bytes for a `MAVLink 1`/`MAVLink 2` frame, resynchronizing past noise: a start
//! marker that fails validation is skipped, and scanning resumes one byte later. Two entry
//! points cover the two callers this is meant to serve: [`try_parse`] for a discrete datagram
//! (UDP-style), [`try_parse_streaming`] for a fragmented byte stream (serial/TCP-style) that may
//! not yet hold a complete frame.

use mavspec::{Catalog, MavLinkVersion, MessageSchema};

use crate::consts::{
    CHECKSUM_SIZE, HEADER_V1_SIZE, HEADER_V2_SIZE, MIN_PACKET_V1_SIZE, MIN_PACKET_V2_SIZE,
    SIGNATURE_LENGTH, STX_V1, STX_V2,
};
use crate::errors::{DecodeError, NotInitialized};
use crate::frame::{calculate_crc, Frame};
use crate::header::Header;
use crate::payload;
use crate::signature::Signature;

/// A frame parsed out of a discrete buffer, and how many leading bytes it consumed.
#[derive(Debug)]
pub struct Scanned {
    /// The decoded frame.
    pub frame: Frame,
    /// Number of bytes from the start of the input this frame occupied, start marker included.
    pub consumed: usize,
}

/// Result of one streaming scan attempt.
#[derive(Debug)]
pub struct StreamOutcome {
    /// The decoded frame, or `None` if the buffer holds no complete frame yet.
    pub frame: Option<Frame>,
    /// Bytes the caller may drop from the front of its buffer on the next call.
    pub consumed: usize,
    /// How far into the buffer this scan looked. Equal to `consumed` on success; equal to the
    /// buffer length when more data is needed to make progress.
    pub examined: usize,
}

/// Parses a single frame out of a discrete buffer (e.g. one UDP datagram).
///
/// Skips leading garbage and any start marker that fails validation, advancing one byte at a
/// time. Returns [`DecodeError::StartMarkerNotFound`] if the buffer has no marker at all;
/// otherwise returns the error from the last candidate tried, once every marker has been
/// exhausted.
pub fn try_parse(bytes: &[u8]) -> Result<Scanned, DecodeError> {
    if !Catalog::is_initialized() {
        return Err(DecodeError::NotInitialized(NotInitialized));
    }

    let mut search_from = 0;
    let mut last_err = None;
    while let Some((offset, version)) = find_marker(bytes, search_from) {
        match try_parse_at(bytes, offset, version) {
            Ok((frame, local_consumed)) => {
                return Ok(Scanned { frame, consumed: offset + local_consumed });
            }
            Err(err) => {
                last_err = Some(err);
                search_from = offset + 1;
            }
        }
    }
    Err(last_err.unwrap_or(DecodeError::StartMarkerNotFound))
}

/// Parses as much of a streaming buffer as currently possible.
///
/// On success, `frame` is `Some` and `consumed`/`examined` both point just past the parsed
/// frame — the caller drops that many bytes and may call again for the next one. When no
/// complete frame is available yet, `frame` is `None`; `consumed` marks how much of the buffer
/// is safe to drop (garbage before the first still-viable marker) and `examined` is always the
/// full buffer length, signaling "more data needed" to the caller. Any marker that fails
/// validation (not just "too short") is skipped internally before returning, guaranteeing the
/// scan makes forward progress on every call instead of looping forever on injected noise.
pub fn try_parse_streaming(bytes: &[u8]) -> Result<StreamOutcome, DecodeError> {
    if !Catalog::is_initialized() {
        return Err(DecodeError::NotInitialized(NotInitialized));
    }

    let mut search_from = 0;
    loop {
        let Some((offset, version)) = find_marker(bytes, search_from) else {
            return Ok(StreamOutcome { frame: None, consumed: bytes.len(), examined: bytes.len() });
        };

        match try_parse_at(bytes, offset, version) {
            Ok((frame, local_consumed)) => {
                let consumed = offset + local_consumed;
                return Ok(StreamOutcome { frame: Some(frame), consumed, examined: consumed });
            }
            Err(DecodeError::FrameTooShort) => {
                return Ok(StreamOutcome { frame: None, consumed: offset, examined: bytes.len() });
            }
            Err(_) => {
                search_from = offset + 1;
            }
        }
    }
}

/// Finds the next start marker at or after `from`. A single byte can only ever be `STX_V1` or
/// `STX_V2`, never both, so there is no real ambiguity to break — `MAVLink 2`'s marker would only
/// need to be preferred over `MAVLink 1`'s at an identical offset, which cannot happen here.
fn find_marker(bytes: &[u8], from: usize) -> Option<(usize, MavLinkVersion)> {
    if from >= bytes.len() {
        return None;
    }
    bytes[from..].iter().position(|&b| b == STX_V1 || b == STX_V2).map(|i| {
        let offset = from + i;
        let version = if bytes[offset] == STX_V2 { MavLinkVersion::V2 } else { MavLinkVersion::V1 };
        (offset, version)
    })
}

/// Runs §4.6.3 steps 1-9 at a candidate marker. Returns the decoded frame and how many bytes
/// (from `offset`) it occupied.
fn try_parse_at(bytes: &[u8], offset: usize, version: MavLinkVersion) -> Result<(Frame, usize), DecodeError> {
    let remaining = &bytes[offset..];

    let header_size = match version {
        MavLinkVersion::V1 => HEADER_V1_SIZE,
        MavLinkVersion::V2 => HEADER_V2_SIZE,
    };
    let min_packet = match version {
        MavLinkVersion::V1 => MIN_PACKET_V1_SIZE,
        MavLinkVersion::V2 => MIN_PACKET_V2_SIZE,
    };
    if remaining.len() < min_packet {
        return Err(DecodeError::FrameTooShort);
    }

    let len = remaining[1] as usize;
    if remaining.len() < header_size + len + CHECKSUM_SIZE {
        return Err(DecodeError::FrameTooShort);
    }

    let header = Header::decode(version, &remaining[..header_size]);
    let message_id = header.message_id();

    let schema: MessageSchema =
        Catalog::message(message_id).ok_or(DecodeError::MessageNotFound(message_id))?;
    if !schema.included() {
        return Err(DecodeError::MessageExcluded(message_id));
    }

    // §9 open question: v1's decode buffer is baseFieldPayloadLength, not maxPayloadLength — a v1
    // `len` past the base fields is invalid rather than silently truncated.
    let buf_len = match version {
        MavLinkVersion::V1 => schema.base_field_payload_length(),
        MavLinkVersion::V2 => schema.max_payload_length(),
    };
    if len > buf_len {
        return Err(DecodeError::PayloadLengthInvalid { len, max: buf_len });
    }

    let wire_payload = &remaining[header_size..header_size + len];
    let mut payload_buf = vec![0u8; buf_len];
    payload_buf[..len].copy_from_slice(wire_payload);

    let checksum_offset = header_size + len;
    let on_wire_checksum =
        u16::from_le_bytes([remaining[checksum_offset], remaining[checksum_offset + 1]]);

    let computed_checksum = calculate_crc(&header, wire_payload, schema.crc_extra());
    if computed_checksum != on_wire_checksum {
        return Err(DecodeError::BadChecksum);
    }

    let mut consumed = checksum_offset + CHECKSUM_SIZE;
    let mut signature = None;
    if header.is_signed() {
        if remaining.len() < consumed + SIGNATURE_LENGTH {
            return Err(DecodeError::SignatureLengthInvalid);
        }
        signature = Some(Signature::from_bytes(&remaining[consumed..consumed + SIGNATURE_LENGTH]));
        consumed += SIGNATURE_LENGTH;
    }

    let fields = payload::decode(&schema, &payload_buf, matches!(version, MavLinkVersion::V2));
    let frame = Frame::from_decoded(header, payload_buf, on_wire_checksum, signature, fields);

    Ok((frame, consumed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mavspec::resolver::MapResolver;
    use mavspec::Value;
    use std::sync::Mutex;

    static TEST_LOCK: Mutex<()> = Mutex::new(());

    const COMMON_XML: &str = r#"<mavlink>
        <messages>
            <message id="0" name="HEARTBEAT">
                <field type="uint32_t" name="custom_mode"></field>
                <field type="uint8_t" name="type"></field>
                <field type="uint8_t" name="autopilot"></field>
                <field type="uint8_t" name="base_mode"></field>
                <field type="uint8_t" name="system_status"></field>
                <field type="uint8_t_mavlink_version" name="mavlink_version"></field>
            </message>
        </messages>
    </mavlink>"#;

    fn init_catalog() -> MessageSchema {
        let _guard = TEST_LOCK.lock().unwrap();
        let resolver = MapResolver::new().with("test", COMMON_XML);
        Catalog::initialize("test", &resolver, &[]).unwrap();
        Catalog::message(0).unwrap()
    }

    fn heartbeat_bytes(checksum: [u8; 2]) -> Vec<u8> {
        let mut bytes = vec![0xFD, 0x09, 0x00, 0x00, 0x00, 0x01, 0x01, 0x00, 0x00, 0x00];
        bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x00, 0x08, 0x00, 0x00, 0x00, 0x03]);
        bytes.extend_from_slice(&checksum);
        bytes
    }

    fn valid_heartbeat_checksum(schema: &MessageSchema) -> [u8; 2] {
        let header = Header::decode(MavLinkVersion::V2, &heartbeat_bytes([0, 0])[..HEADER_V2_SIZE]);
        let payload = &heartbeat_bytes([0, 0])[HEADER_V2_SIZE..HEADER_V2_SIZE + 9];
        calculate_crc(&header, payload, schema.crc_extra()).to_le_bytes()
    }

    #[test]
    fn s1_heartbeat_decodes_with_expected_fields() {
        let schema = init_catalog();
        let checksum = valid_heartbeat_checksum(&schema);
        let bytes = heartbeat_bytes(checksum);

        let scanned = try_parse(&bytes).unwrap();
        assert_eq!(scanned.consumed, bytes.len());
        assert_eq!(scanned.frame.system_id(), 1);
        assert_eq!(scanned.frame.component_id(), 1);
        assert_eq!(scanned.frame.sequence(), 0);
        assert_eq!(scanned.frame.message_id(), 0);
        assert_eq!(scanned.frame.field("type"), Some(&Value::UInt8(8)));
        assert_eq!(scanned.frame.field("mavlink_version"), Some(&Value::UInt8(3)));
    }

    #[test]
    fn s2_bad_checksum_is_reported() {
        init_catalog();
        let bytes = heartbeat_bytes([0x00, 0x00]);

        let err = try_parse(&bytes).unwrap_err();
        assert!(matches!(err, DecodeError::BadChecksum));
    }

    #[test]
    fn s3_empty_input_reports_no_start_marker() {
        init_catalog();
        let err = try_parse(&[]).unwrap_err();
        assert!(matches!(err, DecodeError::StartMarkerNotFound));
    }

    #[test]
    fn s6_resync_skips_leading_junk() {
        let schema = init_catalog();
        let checksum = valid_heartbeat_checksum(&schema);
        let mut bytes = vec![0x01, 0x02, 0xFE, 0x03, 0xFD, 0x00, 0xFF];
        let junk_len = bytes.len();
        bytes.extend_from_slice(&heartbeat_bytes(checksum));

        let scanned = try_parse(&bytes).unwrap();
        assert_eq!(scanned.frame.message_id(), 0);
        assert_eq!(scanned.consumed, junk_len + heartbeat_bytes(checksum).len());
    }

    #[test]
    fn streaming_reports_need_more_data_on_a_truncated_frame() {
        init_catalog();
        let bytes = [0xFD, 0x09, 0x00, 0x00, 0x00, 0x01, 0x01, 0x00, 0x00, 0x00];

        let outcome = try_parse_streaming(&bytes).unwrap();
        assert!(outcome.frame.is_none());
        assert_eq!(outcome.consumed, 0);
        assert_eq!(outcome.examined, bytes.len());
    }

    #[test]
    fn streaming_decodes_once_the_full_frame_arrives() {
        let schema = init_catalog();
        let checksum = valid_heartbeat_checksum(&schema);
        let bytes = heartbeat_bytes(checksum);

        let outcome = try_parse_streaming(&bytes).unwrap();
        let frame = outcome.frame.unwrap();
        assert_eq!(frame.message_id(), 0);
        assert_eq!(outcome.consumed, bytes.len());
        assert_eq!(outcome.examined, outcome.consumed);
    }
}
