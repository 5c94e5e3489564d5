//! # MAVLink frame header
//!
//! Covers both wire layouts (§4.6.2): `MAVLink 1`'s 6-byte header and `MAVLink 2`'s 10-byte one,
//! including the incompat/compat flags and the 3-byte little-endian message id `MAVLink 2`
//! introduced.

use mavspec::{MavLinkVersion, MessageId};

use crate::consts::{HEADER_V1_SIZE, HEADER_V2_SIZE, MAVLINK_IFLAG_SIGNED, STX_V1, STX_V2};

/// Fields only present on a `MAVLink 2` header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeaderV2Fields {
    /// Incompatibility flags — a receiver that doesn't understand a set bit must discard the
    /// packet.
    pub incompat_flags: u8,
    /// Compatibility flags — safe to ignore if unrecognized.
    pub compat_flags: u8,
}

/// Decoded or about-to-be-encoded frame header.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Header {
    version: MavLinkVersion,
    payload_length: u8,
    sequence: u8,
    system_id: u8,
    component_id: u8,
    message_id: MessageId,
    v2_fields: Option<HeaderV2Fields>,
}

impl Header {
    /// Builds a `MAVLink 1` header.
    pub fn v1(payload_length: u8, sequence: u8, system_id: u8, component_id: u8, message_id: MessageId) -> Self {
        Self {
            version: MavLinkVersion::V1,
            payload_length,
            sequence,
            system_id,
            component_id,
            message_id,
            v2_fields: None,
        }
    }

    /// Builds a `MAVLink 2` header.
    #[allow(clippy::too_many_arguments)]
    pub fn v2(
        payload_length: u8,
        incompat_flags: u8,
        compat_flags: u8,
        sequence: u8,
        system_id: u8,
        component_id: u8,
        message_id: MessageId,
    ) -> Self {
        Self {
            version: MavLinkVersion::V2,
            payload_length,
            sequence,
            system_id,
            component_id,
            message_id,
            v2_fields: Some(HeaderV2Fields { incompat_flags, compat_flags }),
        }
    }

    /// Protocol version this header was decoded as / will be encoded as.
    pub fn version(&self) -> MavLinkVersion {
        self.version
    }

    /// On-wire payload length. May be smaller than the schema's `maxPayloadLength` (v2 trailing
    /// zero truncation).
    pub fn payload_length(&self) -> u8 {
        self.payload_length
    }

    /// Packet sequence number.
    pub fn sequence(&self) -> u8 {
        self.sequence
    }

    /// Sending system id.
    pub fn system_id(&self) -> u8 {
        self.system_id
    }

    /// Sending component id.
    pub fn component_id(&self) -> u8 {
        self.component_id
    }

    /// Message id this frame carries.
    pub fn message_id(&self) -> MessageId {
        self.message_id
    }

    /// `MAVLink 2`-only incompat/compat flags.
    pub fn v2_fields(&self) -> Option<HeaderV2Fields> {
        self.v2_fields
    }

    /// `true` for a `MAVLink 2` header with `MAVLINK_IFLAG_SIGNED` set.
    pub fn is_signed(&self) -> bool {
        match self.v2_fields {
            Some(fields) => fields.incompat_flags & MAVLINK_IFLAG_SIGNED != 0,
            None => false,
        }
    }

    /// Header length on the wire, magic byte included.
    pub fn size(&self) -> usize {
        match self.version {
            MavLinkVersion::V1 => HEADER_V1_SIZE,
            MavLinkVersion::V2 => HEADER_V2_SIZE,
        }
    }

    /// Decodes a header from exactly [`Header::size`] bytes for `version`, magic byte included.
    ///
    /// Header decoding never fails: every byte position is a raw field with no validity
    /// constraint of its own. Callers are responsible for having already identified `version`
    /// from the magic byte and for having enough bytes available.
    pub fn decode(version: MavLinkVersion, bytes: &[u8]) -> Self {
        match version {
            MavLinkVersion::V1 => Self::v1(bytes[1], bytes[2], bytes[3], bytes[4], bytes[5] as MessageId),
            MavLinkVersion::V2 => {
                let message_id = MessageId::from_le_bytes([bytes[7], bytes[8], bytes[9], 0]);
                Self::v2(bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], message_id)
            }
        }
    }

    /// Encodes this header to its wire bytes, magic byte included.
    pub fn encode(&self) -> Vec<u8> {
        match self.version {
            MavLinkVersion::V1 => vec![
                STX_V1,
                self.payload_length,
                self.sequence,
                self.system_id,
                self.component_id,
                self.message_id as u8,
            ],
            MavLinkVersion::V2 => {
                let fields = self.v2_fields.unwrap_or_default();
                let id = self.message_id.to_le_bytes();
                vec![
                    STX_V2,
                    self.payload_length,
                    fields.incompat_flags,
                    fields.compat_flags,
                    self.sequence,
                    self.system_id,
                    self.component_id,
                    id[0],
                    id[1],
                    id[2],
                ]
            }
        }
    }

    /// Header bytes that feed the checksum: everything except the magic byte (§4.6: `CRC-16/MCRF4XX`
    /// over `[header without STX][payload][crcExtra]`).
    pub fn crc_data(&self) -> Vec<u8> {
        let encoded = self.encode();
        encoded[1..].to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v1_round_trips() {
        let header = Header::v1(9, 0, 1, 1, 0);
        let bytes = header.encode();
        assert_eq!(bytes.len(), HEADER_V1_SIZE);
        assert_eq!(bytes[0], STX_V1);

        let decoded = Header::decode(MavLinkVersion::V1, &bytes);
        assert_eq!(decoded, header);
    }

    #[test]
    fn v2_round_trips_with_3_byte_message_id() {
        let header = Header::v2(9, 0, 0, 0, 1, 1, 0x0102_0304 & 0x00FF_FFFF);
        let bytes = header.encode();
        assert_eq!(bytes.len(), HEADER_V2_SIZE);
        assert_eq!(bytes[0], STX_V2);

        let decoded = Header::decode(MavLinkVersion::V2, &bytes);
        assert_eq!(decoded, header);
        assert_eq!(decoded.message_id(), 0x0002_0304 & 0x00FF_FFFF);
    }

    #[test]
    fn signed_flag_is_read_from_incompat_flags() {
        let header = Header::v2(0, MAVLINK_IFLAG_SIGNED, 0, 0, 0, 0, 0);
        assert!(header.is_signed());

        let header = Header::v2(0, 0, 0, 0, 0, 0, 0);
        assert!(!header.is_signed());
    }
}
