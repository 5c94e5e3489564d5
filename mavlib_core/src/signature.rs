//! # `MAVLink 2` packet signature
//!
//! Carried verbatim; this crate performs no cryptographic validation. See [message
//! signing](https://mavlink.io/en/guide/message_signing.html) in the MAVLink docs.

use crate::consts::SIGNATURE_LENGTH;

const LINK_ID_LEN: usize = 1;
const TIMESTAMP_LEN: usize = 6;
const VALUE_LEN: usize = 6;

/// 13 trailing bytes on a signed `MAVLink 2` frame: link id, timestamp, signature value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Signature {
    link_id: u8,
    timestamp: [u8; TIMESTAMP_LEN],
    value: [u8; VALUE_LEN],
}

impl Signature {
    /// Signature link id.
    pub fn link_id(&self) -> u8 {
        self.link_id
    }

    /// 48-bit signing timestamp, little-endian bytes verbatim.
    pub fn timestamp(&self) -> [u8; TIMESTAMP_LEN] {
        self.timestamp
    }

    /// 48-bit truncated SHA-256 signature value, verbatim.
    pub fn value(&self) -> [u8; VALUE_LEN] {
        self.value
    }

    /// Reads a signature from exactly [`SIGNATURE_LENGTH`] bytes. Callers are expected to have
    /// already checked the length; this only asserts it.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        assert_eq!(bytes.len(), SIGNATURE_LENGTH);

        let mut timestamp = [0u8; TIMESTAMP_LEN];
        timestamp.copy_from_slice(&bytes[LINK_ID_LEN..LINK_ID_LEN + TIMESTAMP_LEN]);

        let mut value = [0u8; VALUE_LEN];
        value.copy_from_slice(&bytes[LINK_ID_LEN + TIMESTAMP_LEN..SIGNATURE_LENGTH]);

        Self {
            link_id: bytes[0],
            timestamp,
            value,
        }
    }

    /// Encodes back to the 13-byte wire form.
    pub fn to_bytes(self) -> [u8; SIGNATURE_LENGTH] {
        let mut bytes = [0u8; SIGNATURE_LENGTH];
        bytes[0] = self.link_id;
        bytes[LINK_ID_LEN..LINK_ID_LEN + TIMESTAMP_LEN].copy_from_slice(&self.timestamp);
        bytes[LINK_ID_LEN + TIMESTAMP_LEN..].copy_from_slice(&self.value);
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_bytes() {
        let raw: [u8; SIGNATURE_LENGTH] = [
            7, 1, 2, 3, 4, 5, 6, 10, 11, 12, 13, 14, 15,
        ];
        let signature = Signature::from_bytes(&raw);
        assert_eq!(signature.link_id(), 7);
        assert_eq!(signature.timestamp(), [1, 2, 3, 4, 5, 6]);
        assert_eq!(signature.value(), [10, 11, 12, 13, 14, 15]);
        assert_eq!(signature.to_bytes(), raw);
    }
}
