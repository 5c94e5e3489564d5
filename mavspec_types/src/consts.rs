//! # Constants

/// Maximum size of a payload, regardless of protocol version.
///
/// `MAVLink 1` and `MAVLink 2` both encode payload length in a single byte.
pub const PAYLOAD_MAX_SIZE: usize = 255;

/// Maximum value of a message `id` under `MAVLink 1` (8-bit wire field).
pub const MESSAGE_ID_V1_MAX: u32 = u8::MAX as u32;

/// Maximum value of a message `id` under `MAVLink 2` (24-bit wire field).
pub const MESSAGE_ID_V2_MAX: u32 = 2u32.pow(24) - 1;
