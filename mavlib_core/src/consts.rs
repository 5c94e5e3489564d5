//! # Wire constants

/// `MAVLink 1` start-of-frame marker.
pub const STX_V1: u8 = 0xFE;
/// `MAVLink 2` start-of-frame marker.
pub const STX_V2: u8 = 0xFD;

/// `MAVLink 1` header length, magic byte included.
pub const HEADER_V1_SIZE: usize = 6;
/// `MAVLink 2` header length, magic byte included.
pub const HEADER_V2_SIZE: usize = 10;

/// Checksum length, identical for both protocol versions.
pub const CHECKSUM_SIZE: usize = 2;
/// `MAVLink 2` signature length.
pub const SIGNATURE_LENGTH: usize = 13;

/// `MAVLINK_IFLAG_SIGNED` incompatibility flag bit.
pub const MAVLINK_IFLAG_SIGNED: u8 = 0x01;

/// Smallest number of bytes that could possibly hold a header: enough to read the magic byte and
/// the payload length regardless of version.
pub const HEADER_MIN_SIZE: usize = HEADER_V1_SIZE;

/// Minimum complete `MAVLink 1` packet: header + zero-byte payload + checksum.
pub const MIN_PACKET_V1_SIZE: usize = HEADER_V1_SIZE + CHECKSUM_SIZE;
/// Minimum complete `MAVLink 2` packet: header + zero-byte payload + checksum.
pub const MIN_PACKET_V2_SIZE: usize = HEADER_V2_SIZE + CHECKSUM_SIZE;

/// Largest possible `MAVLink 1` packet: header + max payload + checksum.
pub const MAX_PACKET_V1_SIZE: usize =
    HEADER_V1_SIZE + mavspec_types::consts::PAYLOAD_MAX_SIZE + CHECKSUM_SIZE;
/// Largest possible `MAVLink 2` packet: header + max payload + checksum + signature.
pub const MAX_PACKET_V2_SIZE: usize =
    HEADER_V2_SIZE + mavspec_types::consts::PAYLOAD_MAX_SIZE + CHECKSUM_SIZE + SIGNATURE_LENGTH;
