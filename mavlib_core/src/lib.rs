//! # MAVLib Core
//!
//! `MAVLink 1`/`MAVLink 2` wire codec: `CRC-16/MCRF4XX` checksum, payload field encode/decode, and
//! a resynchronizing frame scanner, all driven by schemas compiled from dialect XML via
//! `mavspec::Catalog`.
#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

// Common constants
pub mod consts;

// Common types
pub mod types;
pub use types::Checksum;

// CRC-16/MCRF4XX checksum
pub mod crc;

// Errors
pub mod errors;
pub use errors::{DecodeError, EncodeError};

// Header
pub mod header;
pub use header::{Header, HeaderV2Fields};

// MAVLink 2 signature
pub mod signature;
pub use signature::Signature;

// Payload field codec
pub mod payload;

// MAVLink frame
pub mod frame;
pub use frame::{Frame, HeaderFields};

// Frame scanner
pub mod scanner;
pub use scanner::{try_parse, try_parse_streaming, Scanned, StreamOutcome};
