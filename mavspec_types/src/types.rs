//! # Tiny types and type aliases
//!
//! Type aliases and tiny types (that require a few lines of code) used across the `mavspec_types`
//! library.

/// MAVLink message ID regardless of protocol.
///
/// * For `MAVLink 1` message ID is an 8-bit unsigned integer.
/// * For `MAVLink 2` message ID is a 24-bit unsigned integer.
pub type MessageId = u32;

/// `CRC_EXTRA` byte folded into every frame checksum to detect dialect drift between peers.
///
/// # Links
///
///  * [CRC_EXTRA calculation](https://mavlink.io/en/guide/serialization.html#crc_extra) in MAVLink docs.
pub type ExtraCrc = u8;
