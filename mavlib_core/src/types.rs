//! # Common types

/// Frame checksum: `CRC-16/MCRF4XX`, little-endian on the wire.
///
/// See [`crate::frame::Frame::checksum`] and [`crate::crc`].
pub type Checksum = u16;
